// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fingerprint-keyed cache of per-child shared-event bundles.
//!
//! The cache exists purely to avoid rebuilding bundles on every render when
//! neither a child's inputs nor its tracked state changed. It is not a
//! correctness mechanism: correctness comes from the fingerprint comparison,
//! and a miss is always resolved by recomputation, never by an error.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use trellis_events::{BasePropsMap, EventDescriptor, SharedEvents, StateHandle};

/// Everything that can invalidate a cached bundle.
///
/// Compares deeply: the base-props snapshot by value, the filtered event
/// list by descriptor equality (handlers by identity), and the state slice
/// by its deterministic serialization — which gives well-defined equality
/// even when patches hold non-trivial structures.
#[derive(Clone, Debug, PartialEq)]
pub struct Fingerprint {
    name: String,
    base_props: Rc<BasePropsMap>,
    events: Vec<EventDescriptor>,
    state_json: Option<String>,
}

impl Fingerprint {
    /// Fingerprint for `name` over the inputs its bundle is built from.
    pub fn new(
        name: impl Into<String>,
        base_props: Rc<BasePropsMap>,
        events: Vec<EventDescriptor>,
        state_json: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_props,
            events,
            state_json,
        }
    }

    /// Fingerprint capturing the current state of `state` for `name`.
    pub fn capture(
        name: impl Into<String>,
        base_props: Rc<BasePropsMap>,
        events: Vec<EventDescriptor>,
        state: &StateHandle,
    ) -> Self {
        let name = name.into();
        let state_json = state.borrow().serialize_child(&name);
        Self::new(name, base_props, events, state_json)
    }

    /// The child name this fingerprint belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The filtered event list captured by this fingerprint.
    pub fn events(&self) -> &[EventDescriptor] {
        &self.events
    }
}

/// One bundle per child name; a hit requires a deep-equal fingerprint.
#[derive(Debug, Default)]
pub struct SharedEventsCache {
    entries: HashMap<String, (Rc<SharedEvents>, Fingerprint)>,
}

impl SharedEventsCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached bundle for `name`, only when the stored fingerprint
    /// deep-equals `fingerprint`.
    pub fn get(&self, name: &str, fingerprint: &Fingerprint) -> Option<Rc<SharedEvents>> {
        let (bundle, stored) = self.entries.get(name)?;
        (stored == fingerprint).then(|| Rc::clone(bundle))
    }

    /// Store a bundle, overwriting any stale entry for `name`.
    pub fn put(&mut self, name: impl Into<String>, bundle: Rc<SharedEvents>, fingerprint: Fingerprint) {
        self.entries.insert(name.into(), (bundle, fingerprint));
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
