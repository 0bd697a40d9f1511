// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_events --heading-base-level=0

//! Trellis Events: declarative interaction events and shared mutation state.
//!
//! ## Overview
//!
//! This crate holds the event half of the Trellis coordination model: the
//! declarative descriptors a caller writes, the shared keyed state the
//! coordinator owns, and the scoped resolution that turns descriptors into
//! bound handlers for one child. It does not know about element trees — that
//! is `trellis_tree` — and it performs no rendering.
//!
//! - [`EventDescriptor`](descriptor::EventDescriptor) binds interaction
//!   handlers to a `(child selector, target)` scope.
//! - [`MutationDescriptor`](descriptor::MutationDescriptor) describes how a
//!   mount or an external trigger patches shared state, without any
//!   interaction firing.
//! - [`EventState`](state::EventState) is the keyed store
//!   (child → event key → target → patch) behind a
//!   [`StateHandle`](state::StateHandle); one coordinator owns it per tree.
//! - [`SharedEvents`](scope::SharedEvents) is the name-bound bundle a
//!   participating child receives: filtered descriptors,
//!   [`resolve`](scope::SharedEvents::resolve) for lazy handler resolution,
//!   and [`event_state`](scope::SharedEvents::event_state) to read applied
//!   patches back into props.
//!
//! ## Minimal example
//!
//! Declare a hover event for one child, resolve it, fire it, and read the
//! patch back:
//!
//! ```
//! use std::rc::Rc;
//!
//! use serde_json::json;
//! use trellis_events::descriptor::{event_handler, EventDescriptor, StateChange};
//! use trellis_events::scope::SharedEvents;
//! use trellis_events::state::EventState;
//! use trellis_events::types::{
//!     attributes_of, ChildSelector, EventKey, InteractionEvent, Target,
//! };
//! use trellis_events::BasePropsMap;
//!
//! let hover = EventDescriptor::new(ChildSelector::one("bars"), Target::Data).on(
//!     "pointerover",
//!     event_handler(|_, _, _| {
//!         vec![StateChange::patch(attributes_of(json!({ "fill": "tomato" })))]
//!     }),
//! );
//!
//! let state = EventState::shared();
//! let bundle = SharedEvents::new(
//!     Some("bars".into()),
//!     Rc::new(BasePropsMap::new()),
//!     vec![hover],
//!     state.clone(),
//! );
//!
//! // The child resolves its own handlers at render time…
//! let handlers = bundle.resolve(bundle.events(), &Target::Data);
//! handlers["pointerover"].call(&InteractionEvent::new().on_key(EventKey::Index(0)));
//!
//! // …and the next render reads the applied patch back.
//! assert_eq!(
//!     bundle.event_state(&EventKey::Index(0), &Target::Data),
//!     attributes_of(json!({ "fill": "tomato" })),
//! );
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`
//!   and `serde_json`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point
//!   math in `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod base_props;
pub mod descriptor;
pub mod mutation;
pub mod scope;
pub mod state;
pub mod types;

pub use base_props::{base_props_from, BaseProps, BasePropsMap};
pub use descriptor::{
    event_handler, mutation_fn, EventDescriptor, EventHandler, HandlerScope, MutationCallback,
    MutationDescriptor, MutationFn, StateChange,
};
pub use mutation::{compute_mutations, has_callbacks, run_callbacks};
pub use scope::{descriptor_applies, filter_events, BoundHandler, ResolvedHandlers, SharedEvents};
pub use state::{ChildState, EventState, StateHandle, StatePatch};
pub use types::{
    attributes_of, merge_attributes, Attributes, ChildSelector, EventKey, InteractionEvent,
    KeySelector, Target, TargetSelector, PARENT,
};
