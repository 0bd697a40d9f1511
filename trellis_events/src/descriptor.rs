// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative event and mutation descriptors.
//!
//! Descriptors are plain values: selectors plus shared closures. Closure
//! fields compare by [`Rc::ptr_eq`], so two descriptors are equal only when
//! they share the same handler instances. Deep prop comparison in the
//! coordinator relies on this.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::state::EventState;
use crate::types::{
    Attributes, ChildSelector, EventKey, InteractionEvent, KeySelector, Target, TargetSelector,
};

/// Scope a handler was resolved for, passed back into descriptor handlers.
#[derive(Clone, Copy, Debug)]
pub struct HandlerScope<'a> {
    /// Target surface the handler was resolved for.
    pub target: &'a Target,
    /// Child the handler was resolved for; `None` is the parent scope.
    pub child_name: Option<&'a str>,
}

/// Handler declared on an [`EventDescriptor`].
///
/// Invoked with the interaction payload, the resolved scope, and a read-only
/// view of the current shared state; returns the state changes to merge.
pub type EventHandler =
    Rc<dyn Fn(&InteractionEvent, HandlerScope<'_>, &EventState) -> Vec<StateChange>>;

/// Wrap a closure as an [`EventHandler`].
pub fn event_handler<F>(f: F) -> EventHandler
where
    F: Fn(&InteractionEvent, HandlerScope<'_>, &EventState) -> Vec<StateChange> + 'static,
{
    Rc::new(f)
}

/// One requested state mutation produced by an event handler.
///
/// Coordinates left `None` default to the scope the handler was resolved
/// for (the payload's key for `event_key`, then [`EventKey::All`]). A
/// `patch` of `None` clears the slot, so handlers can implement toggles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateChange {
    /// Child to patch; defaults to the handler's own child scope.
    pub child_name: Option<String>,
    /// Event key to patch; defaults to the payload's key, then `All`.
    pub event_key: Option<EventKey>,
    /// Target to patch; defaults to the handler's own target.
    pub target: Option<Target>,
    /// New patch for the slot; `None` clears it.
    pub patch: Option<Attributes>,
}

impl StateChange {
    /// Patch the handler's own scope.
    pub fn patch(patch: Attributes) -> Self {
        Self {
            patch: Some(patch),
            ..Self::default()
        }
    }

    /// Clear the handler's own scope.
    pub fn clear() -> Self {
        Self::default()
    }

    /// Redirect the change to another child.
    pub fn for_child(mut self, name: impl Into<String>) -> Self {
        self.child_name = Some(name.into());
        self
    }

    /// Pin the change to a specific event key.
    pub fn for_key(mut self, key: EventKey) -> Self {
        self.event_key = Some(key);
        self
    }

    /// Redirect the change to another target.
    pub fn for_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }
}

/// Declarative binding of interaction handlers to a child/target scope.
#[derive(Clone)]
pub struct EventDescriptor {
    /// Children this descriptor applies to.
    pub child_name: ChildSelector,
    /// Surface this descriptor applies to.
    pub target: Target,
    /// Optional datum filter: when set, bound handlers ignore payloads whose
    /// key the selector rejects.
    pub event_key: Option<KeySelector>,
    /// Interaction name → handler.
    pub handlers: BTreeMap<String, EventHandler>,
}

impl EventDescriptor {
    /// A descriptor with no handlers yet.
    pub fn new(child_name: ChildSelector, target: Target) -> Self {
        Self {
            child_name,
            target,
            event_key: None,
            handlers: BTreeMap::new(),
        }
    }

    /// Restrict the descriptor to keys covered by `selector`.
    pub fn with_key(mut self, selector: KeySelector) -> Self {
        self.event_key = Some(selector);
        self
    }

    /// Attach a handler for `interaction`, replacing any previous one.
    pub fn on(mut self, interaction: impl Into<String>, handler: EventHandler) -> Self {
        self.handlers.insert(interaction.into(), handler);
        self
    }
}

impl fmt::Debug for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDescriptor")
            .field("child_name", &self.child_name)
            .field("target", &self.target)
            .field("event_key", &self.event_key)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PartialEq for EventDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.child_name == other.child_name
            && self.target == other.target
            && self.event_key == other.event_key
            && self.handlers.len() == other.handlers.len()
            && self
                .handlers
                .iter()
                .zip(&other.handlers)
                .all(|((ka, ha), (kb, hb))| ka == kb && Rc::ptr_eq(ha, hb))
    }
}

/// Mutation function: (base attributes at the coordinate, current patch) →
/// new patch. Returning `None` clears the slot.
pub type MutationFn = Rc<dyn Fn(&Attributes, Option<&Attributes>) -> Option<Attributes>>;

/// Wrap a closure as a [`MutationFn`].
pub fn mutation_fn<F>(f: F) -> MutationFn
where
    F: Fn(&Attributes, Option<&Attributes>) -> Option<Attributes> + 'static,
{
    Rc::new(f)
}

/// Callback run after an external-mutation pass merges its patch.
pub type MutationCallback = Rc<dyn Fn()>;

/// Declarative rule describing how a mount or external trigger updates
/// shared state.
#[derive(Clone)]
pub struct MutationDescriptor {
    /// Children the rule applies to (the reserved parent name included).
    pub child_name: ChildSelector,
    /// Targets the rule applies to.
    pub target: TargetSelector,
    /// Event keys the rule applies to.
    pub event_key: KeySelector,
    /// The mutation itself.
    pub mutation: MutationFn,
    /// Invoked once after an external-mutation merge. Ignored at mount.
    pub callback: Option<MutationCallback>,
}

impl MutationDescriptor {
    /// A rule over the given scope.
    pub fn new(
        child_name: ChildSelector,
        target: TargetSelector,
        event_key: KeySelector,
        mutation: MutationFn,
    ) -> Self {
        Self {
            child_name,
            target,
            event_key,
            mutation,
            callback: None,
        }
    }

    /// Attach a post-merge callback.
    pub fn with_callback(mut self, callback: MutationCallback) -> Self {
        self.callback = Some(callback);
        self
    }
}

impl fmt::Debug for MutationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationDescriptor")
            .field("child_name", &self.child_name)
            .field("target", &self.target)
            .field("event_key", &self.event_key)
            .field("callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

impl PartialEq for MutationDescriptor {
    fn eq(&self, other: &Self) -> bool {
        let callbacks_match = match (&self.callback, &other.callback) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        self.child_name == other.child_name
            && self.target == other.target
            && self.event_key == other.event_key
            && Rc::ptr_eq(&self.mutation, &other.mutation)
            && callbacks_match
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use serde_json::json;

    use super::*;
    use crate::types::attributes_of;

    fn noop_handler() -> EventHandler {
        event_handler(|_, _, _| vec![StateChange::patch(attributes_of(json!({ "hover": true })))])
    }

    #[test]
    fn descriptors_compare_handlers_by_identity() {
        let handler = noop_handler();
        let a = EventDescriptor::new(ChildSelector::All, Target::Data)
            .on("pointerover", handler.clone());
        let b = EventDescriptor::new(ChildSelector::All, Target::Data)
            .on("pointerover", handler.clone());
        assert_eq!(a, b);

        // Same shape, different closure instance: not equal.
        let c =
            EventDescriptor::new(ChildSelector::All, Target::Data).on("pointerover", noop_handler());
        assert_ne!(a, c);
    }

    #[test]
    fn descriptors_compare_interaction_names() {
        let handler = noop_handler();
        let a = EventDescriptor::new(ChildSelector::All, Target::Data)
            .on("pointerover", handler.clone());
        let b = EventDescriptor::new(ChildSelector::All, Target::Data)
            .on("pointerout", handler.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn mutation_descriptors_compare_by_identity_and_selectors() {
        let m = mutation_fn(|_, _| None);
        let a = MutationDescriptor::new(
            ChildSelector::one("bars"),
            TargetSelector::one(Target::Data),
            KeySelector::All,
            m.clone(),
        );
        let b = MutationDescriptor::new(
            ChildSelector::one("bars"),
            TargetSelector::one(Target::Data),
            KeySelector::All,
            m.clone(),
        );
        assert_eq!(a, b);

        let c = MutationDescriptor::new(
            ChildSelector::one("axis"),
            TargetSelector::one(Target::Data),
            KeySelector::All,
            m,
        );
        assert_ne!(a, c);
    }

    #[test]
    fn state_change_builders_set_coordinates() {
        let change = StateChange::patch(attributes_of(json!({ "fill": "red" })))
            .for_child("axis")
            .for_key(EventKey::Index(2))
            .for_target(Target::Labels);
        assert_eq!(change.child_name.as_deref(), Some("axis"));
        assert_eq!(change.event_key, Some(EventKey::Index(2)));
        assert_eq!(change.target, Some(Target::Labels));
        assert!(change.patch.is_some());

        assert!(StateChange::clear().patch.is_none());
    }
}
