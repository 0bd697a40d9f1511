// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_shared_events --heading-base-level=0

//! Trellis Shared Events: one coordinator for the interaction state of a
//! composite visual tree.
//!
//! ## Overview
//!
//! The parts of a composite chart — bars, lines, axes, labels — need to
//! share a single source of truth for interaction state (hover, click,
//! focus) without each part managing its own event wiring. The
//! [`SharedEventCoordinator`](coordinator::SharedEventCoordinator) owns that
//! state for one tree root and, on every render, hands each participating
//! child a name-bound bundle through which the child lazily resolves its own
//! handlers and reads applied patches back into its props.
//!
//! The pipeline per render:
//!
//! 1. Base props for every participating child are extracted with
//!    `trellis_tree` and kept as an insertion-ordered map.
//! 2. The tree rewriter rebuilds the child collection, injecting
//!    `{event key, name, bundle}` into participating leaves and recursing
//!    into groups. Bundles are cached per child and reused while their
//!    fingerprint — name, base props, filtered events, serialized state
//!    slice — is unchanged.
//! 3. The container aggregator resolves `Parent`-targeted events, layers the
//!    parent props, and produces the rendered root with its handler binding.
//!
//! Declarative mutations run outside rendering: initial mutations once at
//! [`mount`](coordinator::SharedEventCoordinator::mount), external mutations
//! inside [`update`](coordinator::SharedEventCoordinator::update) whenever
//! the owning props change by deep comparison.
//!
//! ## Minimal example
//!
//! Two bar series share a hover highlight: hovering either one also dims the
//! other.
//!
//! ```
//! use std::rc::Rc;
//!
//! use serde_json::json;
//! use trellis_events::{
//!     attributes_of, base_props_from, event_handler, BaseProps, ChildSelector, EventDescriptor,
//!     EventKey, InteractionEvent, StateChange, Target,
//! };
//! use trellis_shared_events::coordinator::{CoordinatorProps, SharedEventCoordinator};
//! use trellis_tree::{Element, Props, Renderable};
//!
//! struct Bars;
//!
//! impl Renderable for Bars {
//!     fn base_props(&self, _props: &Props) -> Option<BaseProps> {
//!         Some(base_props_from([(
//!             EventKey::Index(0),
//!             Target::Data,
//!             attributes_of(json!({ "fill": "grey" })),
//!         )]))
//!     }
//! }
//!
//! let hover = EventDescriptor::new(ChildSelector::many(["north", "south"]), Target::Data).on(
//!     "pointerover",
//!     event_handler(|_, scope, _| {
//!         let other = if scope.child_name == Some("north") { "south" } else { "north" };
//!         vec![
//!             StateChange::patch(attributes_of(json!({ "fill": "tomato" }))),
//!             StateChange::patch(attributes_of(json!({ "opacity": 0.4 })))
//!                 .for_child(other)
//!                 .for_key(EventKey::All),
//!         ]
//!     }),
//! );
//!
//! let props = CoordinatorProps::new(vec![
//!     Element::new(Rc::new(Bars), Props::named("north")),
//!     Element::new(Rc::new(Bars), Props::named("south")),
//! ])
//! .with_events(vec![hover]);
//!
//! let mut coordinator = SharedEventCoordinator::new(props);
//! coordinator.mount();
//!
//! // Render: each series gets its bundle; fire a hover on `north`.
//! let rendered = coordinator.render();
//! let north = rendered.element.children()[0].props.shared.clone().unwrap();
//! let handlers = north.resolve(north.events(), &Target::Data);
//! handlers["pointerover"].call(&InteractionEvent::new().on_key(EventKey::Index(0)));
//!
//! // Both series now carry state, fed back into props on the next render.
//! let rendered = coordinator.render();
//! let north = rendered.element.children()[0].props.shared.clone().unwrap();
//! let south = rendered.element.children()[1].props.shared.clone().unwrap();
//! assert_eq!(
//!     north.event_state(&EventKey::Index(0), &Target::Data),
//!     attributes_of(json!({ "fill": "tomato" })),
//! );
//! assert_eq!(
//!     south.event_state(&EventKey::All, &Target::Data),
//!     attributes_of(json!({ "opacity": 0.4 })),
//! );
//! ```
//!
//! ## Error handling
//!
//! Everything here is total and synchronous. Missing capabilities are
//! silent pass-through, cache misses are recomputation, and an empty
//! effective event list short-circuits to the container with unchanged
//! children. A panicking mutation or handler closure is not caught; it
//! propagates to the host lifecycle.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point
//!   math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod cache;
pub mod container;
pub mod coordinator;
pub mod rewrite;

pub use cache::{Fingerprint, SharedEventsCache};
pub use container::{build_container, EventBinding, RenderedContainer};
pub use coordinator::{CoordinatorProps, SharedEventCoordinator, UpdateEffects};
pub use rewrite::rewrite_children;
