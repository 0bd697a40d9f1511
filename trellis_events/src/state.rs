// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared mutable interaction state owned by one coordinator.
//!
//! The store is keyed child name → event key → target → patch, mirroring how
//! patches are addressed everywhere else. It is owned by exactly one
//! coordinator per tree root and reached through a [`StateHandle`]; handlers
//! bound by that coordinator are the only other writers, and they run
//! synchronously inside the host lifecycle, so no locking is involved.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

use crate::types::{Attributes, EventKey, Target};

/// One child's state slice: event key → target → patch.
pub type ChildState = BTreeMap<EventKey, BTreeMap<Target, Attributes>>;

/// Shared handle to a coordinator's state.
///
/// Write ownership stays with the coordinator and the handlers it bound;
/// everything else should treat the handle as read-only.
pub type StateHandle = Rc<RefCell<EventState>>;

/// Keyed store of interaction-state patches for one coordinated tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventState {
    children: BTreeMap<String, ChildState>,
}

impl EventState {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store behind a fresh [`StateHandle`].
    pub fn shared() -> StateHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    /// True when no slot holds a patch.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Current patch at a slot, if any.
    pub fn get(&self, child: &str, key: &EventKey, target: &Target) -> Option<&Attributes> {
        self.children.get(child)?.get(key)?.get(target)
    }

    /// A child's full state slice, if any slot of it is set.
    pub fn child(&self, child: &str) -> Option<&ChildState> {
        self.children.get(child)
    }

    /// Replace the patch at a slot.
    pub fn set(&mut self, child: impl Into<String>, key: EventKey, target: Target, patch: Attributes) {
        self.children
            .entry(child.into())
            .or_default()
            .entry(key)
            .or_default()
            .insert(target, patch);
    }

    /// Clear the patch at a slot, pruning emptied branches so cleared state
    /// serializes the same as never-set state.
    pub fn clear(&mut self, child: &str, key: &EventKey, target: &Target) {
        let Some(keys) = self.children.get_mut(child) else {
            return;
        };
        if let Some(targets) = keys.get_mut(key) {
            targets.remove(target);
            if targets.is_empty() {
                keys.remove(key);
            }
        }
        if keys.is_empty() {
            self.children.remove(child);
        }
    }

    /// Apply a computed [`StatePatch`]: `Some` slots replace, `None` slots
    /// clear.
    pub fn apply(&mut self, patch: &StatePatch) {
        for (child, keys) in &patch.slots {
            for (key, targets) in keys {
                for (target, value) in targets {
                    match value {
                        Some(attrs) => {
                            self.set(child.clone(), key.clone(), target.clone(), attrs.clone());
                        }
                        None => self.clear(child, key, target),
                    }
                }
            }
        }
    }

    /// Deterministic serialization of one child's slice, used as the
    /// state component of a bundle fingerprint. `None` when the child has no
    /// tracked state (distinct from an empty serialized map).
    pub fn serialize_child(&self, child: &str) -> Option<String> {
        let slice = self.children.get(child)?;
        serde_json::to_string(slice).ok()
    }
}

/// A computed batch of state changes, keyed like the store itself.
///
/// `None` at a slot means "clear"; this is how mutation functions reset
/// state. Distinguishing an empty patch from "no descriptor applied" is the
/// mutation engine's job, not this type's.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatePatch {
    slots: BTreeMap<String, BTreeMap<EventKey, BTreeMap<Target, Option<Attributes>>>>,
}

impl StatePatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the patch carries no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Record a slot: `Some` replaces, `None` clears.
    pub fn set(
        &mut self,
        child: impl Into<String>,
        key: EventKey,
        target: Target,
        patch: Option<Attributes>,
    ) {
        self.slots
            .entry(child.into())
            .or_default()
            .entry(key)
            .or_default()
            .insert(target, patch);
    }

    /// The recorded value at a slot: `None` for absent, `Some(None)` for a
    /// clear, `Some(Some(_))` for a replacement.
    pub fn get(&self, child: &str, key: &EventKey, target: &Target) -> Option<Option<&Attributes>> {
        self.slots
            .get(child)?
            .get(key)?
            .get(target)
            .map(Option::as_ref)
    }
}
