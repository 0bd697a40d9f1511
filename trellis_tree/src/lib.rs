// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_tree --heading-base-level=0

//! Trellis Tree: the renderable element tree and base-props extraction.
//!
//! ## Overview
//!
//! An [`Element`] is a node in a tree of visual components: a shared
//! component value, its [`Props`], and nested children. Components are
//! polymorphic over one capability — producing base props — expressed as the
//! [`Renderable`] trait. A component that returns `Some` from
//! [`Renderable::base_props`] participates in shared-event coordination; one
//! that keeps the default is an opaque pass-through.
//!
//! [`extract_base_props`] walks a child collection and produces the
//! name → base-props map the coordinator and the mutation engine work from.
//! Child names come from an explicit `name` prop or from the position among
//! participating leaves, with groups flattened in traversal order.
//!
//! ```
//! use std::rc::Rc;
//!
//! use serde_json::json;
//! use trellis_events::{attributes_of, base_props_from, BaseProps, EventKey, Target};
//! use trellis_tree::{extract_base_props, group, Element, Props, Renderable};
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
//! let children = vec![
//!     Element::new(Rc::new(Bars), Props::named("bars")),
//!     group(), // opaque: skipped
//!     Element::new(Rc::new(Bars), Props::new()),
//! ];
//! let map = extract_base_props(&children);
//! assert_eq!(map.names().collect::<Vec<_>>(), ["bars", "1"]);
//! ```
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

pub mod element;
pub mod extract;

pub use element::{group, Element, Group, Props, Renderable, Role};
pub use extract::{extract_base_props, participant_name};
