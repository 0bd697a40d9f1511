// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped event access: filtering descriptors and binding handlers.
//!
//! A [`SharedEvents`] bundle is the name-bound interface one participating
//! child receives. It is a small value type constructed once per cache miss
//! and shared from then on; children call [`SharedEvents::resolve`] at their
//! own render time (lazy resolution) and read already-applied patches back
//! with [`SharedEvents::event_state`].
//!
//! ## Matching
//!
//! An event descriptor applies to a child when its child selector names the
//! child, contains it, or is the `All` wildcard. Descriptors targeting
//! [`Target::Parent`] never apply to a child; they apply exactly to the
//! parent scope (`child_name = None`). Matching is literal, never
//! pattern-based.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::base_props::{BaseProps, BasePropsMap};
use crate::descriptor::{EventDescriptor, EventHandler, HandlerScope};
use crate::state::StateHandle;
use crate::types::{Attributes, EventKey, InteractionEvent, KeySelector, Target, PARENT};

/// Does `descriptor` apply to the child `name` (`None` is the parent scope)?
pub fn descriptor_applies(descriptor: &EventDescriptor, name: Option<&str>) -> bool {
    match name {
        None => descriptor.target == Target::Parent,
        Some(name) => descriptor.target != Target::Parent && descriptor.child_name.matches(name),
    }
}

/// Filter a descriptor list to those applicable to one scope.
pub fn filter_events(events: &[EventDescriptor], name: Option<&str>) -> Vec<EventDescriptor> {
    events
        .iter()
        .filter(|descriptor| descriptor_applies(descriptor, name))
        .cloned()
        .collect()
}

/// Interaction name → bound handler, as handed to a child or the container.
pub type ResolvedHandlers = BTreeMap<String, BoundHandler>;

/// A descriptor handler bound to a concrete `(child, target)` scope.
///
/// Invoking it computes the handler's state changes against the current
/// shared state and merges them back in, all synchronously.
#[derive(Clone)]
pub struct BoundHandler {
    handler: EventHandler,
    child_name: Option<String>,
    target: Target,
    key_filter: Option<KeySelector>,
    state: StateHandle,
}

impl BoundHandler {
    /// Invoke with an interaction payload.
    pub fn call(&self, event: &InteractionEvent) {
        if let (Some(filter), Some(key)) = (&self.key_filter, &event.event_key) {
            if !filter.matches(key) {
                return;
            }
        }

        // Let the handler observe state before any of its changes land.
        let changes = {
            let state = self.state.borrow();
            let scope = HandlerScope {
                target: &self.target,
                child_name: self.child_name.as_deref(),
            };
            (self.handler)(event, scope, &state)
        };

        let mut state = self.state.borrow_mut();
        for change in changes {
            let child = change
                .child_name
                .or_else(|| self.child_name.clone())
                .unwrap_or_else(|| String::from(PARENT));
            let key = change
                .event_key
                .or_else(|| event.event_key.clone())
                .unwrap_or(EventKey::All);
            let target = change.target.unwrap_or_else(|| self.target.clone());
            match change.patch {
                Some(patch) => state.set(child, key, target, patch),
                None => state.clear(&child, &key, &target),
            }
        }
    }

    /// The scope this handler was bound for; `None` is the parent scope.
    pub fn child_name(&self) -> Option<&str> {
        self.child_name.as_deref()
    }

    /// The target this handler was bound for.
    pub fn target(&self) -> &Target {
        &self.target
    }
}

impl fmt::Debug for BoundHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundHandler")
            .field("child_name", &self.child_name)
            .field("target", &self.target)
            .field("key_filter", &self.key_filter)
            .finish_non_exhaustive()
    }
}

impl PartialEq for BoundHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.handler, &other.handler)
            && self.child_name == other.child_name
            && self.target == other.target
            && self.key_filter == other.key_filter
            && Rc::ptr_eq(&self.state, &other.state)
    }
}

/// The resolved, name-bound shared-event bundle handed to one child.
///
/// Holds the descriptors filtered for the child, the base-props map snapshot
/// it was resolved against, and a handle to the coordinator's state.
#[derive(Clone, Debug)]
pub struct SharedEvents {
    events: Vec<EventDescriptor>,
    child_name: Option<String>,
    base_props: Rc<BasePropsMap>,
    state: StateHandle,
}

impl SharedEvents {
    /// Bundle for `child_name` (`None` is the parent scope) over an already
    /// filtered descriptor list.
    pub fn new(
        child_name: Option<String>,
        base_props: Rc<BasePropsMap>,
        events: Vec<EventDescriptor>,
        state: StateHandle,
    ) -> Self {
        Self {
            events,
            child_name,
            base_props,
            state,
        }
    }

    /// The descriptors filtered for this scope.
    pub fn events(&self) -> &[EventDescriptor] {
        &self.events
    }

    /// The bound child name; `None` is the parent scope.
    pub fn child_name(&self) -> Option<&str> {
        self.child_name.as_deref()
    }

    /// The base-props map snapshot this bundle was resolved against.
    pub fn base_props_map(&self) -> &BasePropsMap {
        &self.base_props
    }

    /// This child's own base props, when extraction produced any.
    pub fn base_props(&self) -> Option<&BaseProps> {
        self.base_props.child(self.child_name.as_deref()?)
    }

    /// Resolve the effective handlers for `target` out of `descriptors`.
    ///
    /// Filters to descriptors applicable to this scope and target, then
    /// binds each interaction handler. When several descriptors bind the
    /// same interaction name the later declaration wins.
    pub fn resolve(&self, descriptors: &[EventDescriptor], target: &Target) -> ResolvedHandlers {
        let mut resolved = ResolvedHandlers::new();
        for descriptor in descriptors {
            if !descriptor_applies(descriptor, self.child_name.as_deref()) {
                continue;
            }
            if &descriptor.target != target {
                continue;
            }
            for (interaction, handler) in &descriptor.handlers {
                resolved.insert(
                    interaction.clone(),
                    BoundHandler {
                        handler: handler.clone(),
                        child_name: self.child_name.clone(),
                        target: target.clone(),
                        key_filter: descriptor.event_key.clone(),
                        state: self.state.clone(),
                    },
                );
            }
        }
        resolved
    }

    /// The already-applied patch for `(key, target)` in this scope,
    /// defaulting to the empty record. State persists across renders; it is
    /// not reset by re-resolution.
    pub fn event_state(&self, key: &EventKey, target: &Target) -> Attributes {
        let name = self.child_name.as_deref().unwrap_or(PARENT);
        self.state
            .borrow()
            .get(name, key, target)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use serde_json::json;

    use super::*;
    use crate::descriptor::{event_handler, StateChange};
    use crate::state::EventState;
    use crate::types::{attributes_of, ChildSelector};

    fn hover_descriptor(selector: ChildSelector) -> EventDescriptor {
        EventDescriptor::new(selector, Target::Data).on(
            "pointerover",
            event_handler(|_, _, _| {
                vec![StateChange::patch(attributes_of(json!({ "hover": true })))]
            }),
        )
    }

    #[test]
    fn parent_events_never_apply_to_children() {
        let parent = EventDescriptor::new(ChildSelector::All, Target::Parent);
        assert!(!descriptor_applies(&parent, Some("bars")));
        assert!(descriptor_applies(&parent, None));

        let data = hover_descriptor(ChildSelector::All);
        assert!(descriptor_applies(&data, Some("bars")));
        assert!(!descriptor_applies(&data, None));
    }

    #[test]
    fn selector_filtering_matches_exactly_the_listed_names() {
        let events = vec![
            hover_descriptor(ChildSelector::many(["bars", "axis"])),
            hover_descriptor(ChildSelector::one("line")),
            EventDescriptor::new(ChildSelector::All, Target::Parent),
        ];
        assert_eq!(filter_events(&events, Some("bars")).len(), 1);
        assert_eq!(filter_events(&events, Some("line")).len(), 1);
        assert_eq!(filter_events(&events, Some("pie")).len(), 0);
        assert_eq!(filter_events(&events, None).len(), 1);
    }

    #[test]
    fn invoking_a_bound_handler_merges_state() {
        let state = EventState::shared();
        let bundle = SharedEvents::new(
            Some(String::from("bars")),
            Rc::new(BasePropsMap::new()),
            vec![hover_descriptor(ChildSelector::All)],
            state.clone(),
        );

        let handlers = bundle.resolve(bundle.events(), &Target::Data);
        let over = handlers.get("pointerover").expect("handler resolved");
        over.call(&InteractionEvent::new().on_key(EventKey::Index(2)));

        assert_eq!(
            state.borrow().get("bars", &EventKey::Index(2), &Target::Data),
            Some(&attributes_of(json!({ "hover": true })))
        );
        // And the bundle reads it back as the current event state.
        assert_eq!(
            bundle.event_state(&EventKey::Index(2), &Target::Data),
            attributes_of(json!({ "hover": true }))
        );
    }

    #[test]
    fn payload_without_a_key_lands_on_the_all_slot() {
        let state = EventState::shared();
        let bundle = SharedEvents::new(
            Some(String::from("bars")),
            Rc::new(BasePropsMap::new()),
            vec![hover_descriptor(ChildSelector::All)],
            state.clone(),
        );
        let handlers = bundle.resolve(bundle.events(), &Target::Data);
        handlers["pointerover"].call(&InteractionEvent::new());

        assert!(state.borrow().get("bars", &EventKey::All, &Target::Data).is_some());
    }

    #[test]
    fn clearing_changes_remove_the_slot() {
        let state = EventState::shared();
        let toggle = EventDescriptor::new(ChildSelector::one("bars"), Target::Data).on(
            "click",
            event_handler(|event, scope, state| {
                // Toggle: clear when a patch is already present.
                let key = event.event_key.clone().unwrap_or(EventKey::All);
                let set = scope
                    .child_name
                    .and_then(|name| state.get(name, &key, scope.target))
                    .is_some();
                if set {
                    vec![StateChange::clear()]
                } else {
                    vec![StateChange::patch(attributes_of(json!({ "selected": true })))]
                }
            }),
        );
        let bundle = SharedEvents::new(
            Some(String::from("bars")),
            Rc::new(BasePropsMap::new()),
            vec![toggle],
            state.clone(),
        );
        let handlers = bundle.resolve(bundle.events(), &Target::Data);
        let click = &handlers["click"];
        let event = InteractionEvent::new().on_key(EventKey::Index(0));

        click.call(&event);
        assert!(state.borrow().get("bars", &EventKey::Index(0), &Target::Data).is_some());
        click.call(&event);
        assert!(state.borrow().get("bars", &EventKey::Index(0), &Target::Data).is_none());
        assert_eq!(
            bundle.event_state(&EventKey::Index(0), &Target::Data),
            Attributes::new()
        );
    }

    #[test]
    fn descriptor_key_filter_gates_invocation() {
        let state = EventState::shared();
        let descriptor = hover_descriptor(ChildSelector::All)
            .with_key(KeySelector::one(EventKey::Index(0)));
        let bundle = SharedEvents::new(
            Some(String::from("bars")),
            Rc::new(BasePropsMap::new()),
            vec![descriptor],
            state.clone(),
        );
        let handlers = bundle.resolve(bundle.events(), &Target::Data);

        handlers["pointerover"].call(&InteractionEvent::new().on_key(EventKey::Index(3)));
        assert!(state.borrow().is_empty());

        handlers["pointerover"].call(&InteractionEvent::new().on_key(EventKey::Index(0)));
        assert!(!state.borrow().is_empty());
    }

    #[test]
    fn later_descriptors_override_earlier_for_the_same_interaction() {
        let state = EventState::shared();
        let first = EventDescriptor::new(ChildSelector::All, Target::Data).on(
            "click",
            event_handler(|_, _, _| {
                vec![StateChange::patch(attributes_of(json!({ "from": "first" })))]
            }),
        );
        let second = EventDescriptor::new(ChildSelector::All, Target::Data).on(
            "click",
            event_handler(|_, _, _| {
                vec![StateChange::patch(attributes_of(json!({ "from": "second" })))]
            }),
        );
        let bundle = SharedEvents::new(
            Some(String::from("bars")),
            Rc::new(BasePropsMap::new()),
            vec![first, second],
            state.clone(),
        );
        let handlers = bundle.resolve(bundle.events(), &Target::Data);
        assert_eq!(handlers.len(), 1);
        handlers["click"].call(&InteractionEvent::new());
        assert_eq!(
            state.borrow().get("bars", &EventKey::All, &Target::Data),
            Some(&attributes_of(json!({ "from": "second" })))
        );
    }

    #[test]
    fn cross_child_changes_land_on_the_named_child() {
        let state = EventState::shared();
        let descriptor = EventDescriptor::new(ChildSelector::one("bars"), Target::Data).on(
            "pointerover",
            event_handler(|_, _, _| {
                vec![
                    StateChange::patch(attributes_of(json!({ "hover": true }))),
                    StateChange::patch(attributes_of(json!({ "dim": true })))
                        .for_child("axis")
                        .for_target(Target::Labels)
                        .for_key(EventKey::All),
                ]
            }),
        );
        let bundle = SharedEvents::new(
            Some(String::from("bars")),
            Rc::new(BasePropsMap::new()),
            vec![descriptor],
            state.clone(),
        );
        let handlers = bundle.resolve(bundle.events(), &Target::Data);
        handlers["pointerover"].call(&InteractionEvent::new().on_key(EventKey::Index(1)));

        let state = state.borrow();
        assert!(state.get("bars", &EventKey::Index(1), &Target::Data).is_some());
        assert!(state.get("axis", &EventKey::All, &Target::Labels).is_some());
    }

    #[test]
    fn resolve_ignores_other_targets() {
        let state = EventState::shared();
        let bundle = SharedEvents::new(
            Some(String::from("bars")),
            Rc::new(BasePropsMap::new()),
            vec![hover_descriptor(ChildSelector::All)],
            state,
        );
        assert!(bundle.resolve(bundle.events(), &Target::Labels).is_empty());
    }
}
