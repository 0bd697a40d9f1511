// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mutation engine: computing declarative state patches.
//!
//! Mutation descriptors are resolved against the known child names (the
//! participating children plus the reserved parent name) and the base-props
//! coordinates of each matched child. The engine only computes a patch; the
//! coordinator decides when to merge it and when to run callbacks.

use alloc::vec::Vec;

use crate::base_props::BasePropsMap;
use crate::descriptor::MutationDescriptor;
use crate::state::{EventState, StatePatch};
use crate::types::{EventKey, Target, PARENT};

/// Compute the patch produced by one mutation pass.
///
/// For every known name matched by a descriptor's child selector, the
/// descriptor's mutation runs once per `(event key, target)` coordinate of
/// that child's base props covered by its key and target selectors. The
/// mutation receives the base attributes at the coordinate and the current
/// state patch there; `Some` results replace the slot, `None` clears it.
///
/// Returns `None` when no descriptor applied at all — distinct from a patch
/// of clears, which is `Some` and still worth merging.
pub fn compute_mutations(
    descriptors: &[MutationDescriptor],
    base_props: &BasePropsMap,
    state: &EventState,
    known_names: &[&str],
) -> Option<StatePatch> {
    let mut patch = StatePatch::new();
    let mut applied = false;

    for name in known_names {
        for descriptor in descriptors {
            if !descriptor.child_name.matches(name) {
                continue;
            }
            if *name == PARENT {
                applied |= apply_parent(descriptor, base_props, state, &mut patch);
            } else {
                applied |= apply_child(descriptor, name, base_props, state, &mut patch);
            }
        }
    }

    applied.then_some(patch)
}

/// Run every descriptor's callback once, in declaration order.
pub fn run_callbacks(descriptors: &[MutationDescriptor]) {
    for descriptor in descriptors {
        if let Some(callback) = &descriptor.callback {
            callback();
        }
    }
}

/// True when any descriptor carries a callback.
pub fn has_callbacks(descriptors: &[MutationDescriptor]) -> bool {
    descriptors.iter().any(|d| d.callback.is_some())
}

fn apply_parent(
    descriptor: &MutationDescriptor,
    base_props: &BasePropsMap,
    state: &EventState,
    patch: &mut StatePatch,
) -> bool {
    // The parent scope has a single coordinate.
    let key = EventKey::parent();
    if !descriptor.target.matches(&Target::Parent) || !descriptor.event_key.matches(&key) {
        return false;
    }
    let current = state.get(PARENT, &key, &Target::Parent);
    let next = (descriptor.mutation)(base_props.parent(), current);
    patch.set(PARENT, key, Target::Parent, next);
    true
}

fn apply_child(
    descriptor: &MutationDescriptor,
    name: &str,
    base_props: &BasePropsMap,
    state: &EventState,
    patch: &mut StatePatch,
) -> bool {
    let Some(props) = base_props.child(name) else {
        return false;
    };
    let mut applied = false;
    for (key, targets) in props {
        if !descriptor.event_key.matches(key) {
            continue;
        }
        for (target, attrs) in targets {
            if !descriptor.target.matches(target) {
                continue;
            }
            let current = state.get(name, key, target);
            let next = (descriptor.mutation)(attrs, current);
            patch.set(name, key.clone(), target.clone(), next);
            applied = true;
        }
    }
    applied
}

/// Coordinates a descriptor would touch, for diagnostics and tests.
pub fn matched_coordinates<'a>(
    descriptor: &MutationDescriptor,
    name: &str,
    base_props: &'a BasePropsMap,
) -> Vec<(&'a EventKey, &'a Target)> {
    let Some(props) = base_props.child(name) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (key, targets) in props {
        if !descriptor.event_key.matches(key) {
            continue;
        }
        for target in targets.keys() {
            if descriptor.target.matches(target) {
                out.push((key, target));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use core::cell::Cell;

    use serde_json::json;

    use super::*;
    use crate::base_props::base_props_from;
    use crate::descriptor::mutation_fn;
    use crate::types::{attributes_of, ChildSelector, KeySelector, TargetSelector};

    fn sample_map() -> BasePropsMap {
        let mut map = BasePropsMap::new();
        map.insert(
            "bars",
            base_props_from([
                (
                    EventKey::Index(0),
                    Target::Data,
                    attributes_of(json!({ "fill": "grey" })),
                ),
                (
                    EventKey::Index(1),
                    Target::Data,
                    attributes_of(json!({ "fill": "grey" })),
                ),
                (
                    EventKey::Index(0),
                    Target::Labels,
                    attributes_of(json!({ "text": "a" })),
                ),
            ]),
        );
        map.set_parent(attributes_of(json!({ "width": 400 })));
        map
    }

    #[test]
    fn spec_initial_mutation_lands_on_the_named_slot() {
        // initialEventMutations = [{childName:"data", target:"data",
        // eventKey:0, mutation: () => ({style:{fill:"red"}})}]
        let mut map = BasePropsMap::new();
        map.insert(
            "data",
            base_props_from([(
                EventKey::Index(0),
                Target::Data,
                attributes_of(json!({})),
            )]),
        );
        let descriptors = vec![MutationDescriptor::new(
            ChildSelector::one("data"),
            TargetSelector::one(Target::Data),
            KeySelector::one(EventKey::Index(0)),
            mutation_fn(|_, _| Some(attributes_of(json!({ "style": { "fill": "red" } })))),
        )];

        let state = EventState::new();
        let patch = compute_mutations(&descriptors, &map, &state, &map.known_names())
            .expect("descriptor applied");
        assert_eq!(
            patch.get("data", &EventKey::Index(0), &Target::Data),
            Some(Some(&attributes_of(json!({ "style": { "fill": "red" } }))))
        );
    }

    #[test]
    fn selectors_restrict_the_touched_coordinates() {
        let map = sample_map();
        let descriptors = vec![MutationDescriptor::new(
            ChildSelector::one("bars"),
            TargetSelector::one(Target::Data),
            KeySelector::one(EventKey::Index(1)),
            mutation_fn(|_, _| Some(attributes_of(json!({ "active": true })))),
        )];

        let state = EventState::new();
        let patch = compute_mutations(&descriptors, &map, &state, &map.known_names()).unwrap();
        assert!(patch.get("bars", &EventKey::Index(1), &Target::Data).is_some());
        assert!(patch.get("bars", &EventKey::Index(0), &Target::Data).is_none());
        assert!(patch.get("bars", &EventKey::Index(0), &Target::Labels).is_none());
    }

    #[test]
    fn no_matching_descriptor_is_a_no_op_not_an_empty_patch() {
        let map = sample_map();
        let descriptors = vec![MutationDescriptor::new(
            ChildSelector::one("line"),
            TargetSelector::All,
            KeySelector::All,
            mutation_fn(|_, _| Some(attributes_of(json!({ "x": 1 })))),
        )];
        let state = EventState::new();
        assert!(compute_mutations(&descriptors, &map, &state, &map.known_names()).is_none());
    }

    #[test]
    fn mutations_see_base_attributes_and_current_patch() {
        let map = sample_map();
        let mut state = EventState::new();
        state.set(
            "bars",
            EventKey::Index(0),
            Target::Data,
            attributes_of(json!({ "fill": "red" })),
        );

        let descriptors = vec![MutationDescriptor::new(
            ChildSelector::one("bars"),
            TargetSelector::one(Target::Data),
            KeySelector::one(EventKey::Index(0)),
            mutation_fn(|base, current| {
                assert_eq!(base.get("fill").and_then(|v| v.as_str()), Some("grey"));
                assert_eq!(
                    current.and_then(|c| c.get("fill")).and_then(|v| v.as_str()),
                    Some("red")
                );
                None
            }),
        )];
        let patch = compute_mutations(&descriptors, &map, &state, &map.known_names()).unwrap();
        // The `None` result is a recorded clear, not an absent slot.
        assert_eq!(
            patch.get("bars", &EventKey::Index(0), &Target::Data),
            Some(None)
        );
    }

    #[test]
    fn all_selector_reaches_the_parent_scope() {
        let map = sample_map();
        let descriptors = vec![MutationDescriptor::new(
            ChildSelector::All,
            TargetSelector::All,
            KeySelector::All,
            mutation_fn(|base, _| {
                let mut attrs = base.clone();
                attrs.insert(String::from("seen"), json!(true));
                Some(attrs)
            }),
        )];
        let state = EventState::new();
        let patch = compute_mutations(&descriptors, &map, &state, &map.known_names()).unwrap();
        let parent = patch
            .get(PARENT, &EventKey::parent(), &Target::Parent)
            .expect("parent slot recorded")
            .expect("parent slot set");
        // The parent mutation saw the container's own props.
        assert_eq!(parent.get("width").and_then(|v| v.as_u64()), Some(400));
        assert_eq!(parent.get("seen"), Some(&json!(true)));
    }

    #[test]
    fn parent_key_selector_gates_the_parent_coordinate() {
        let map = sample_map();
        let descriptors = vec![MutationDescriptor::new(
            ChildSelector::All,
            TargetSelector::All,
            KeySelector::one(EventKey::Index(0)),
            mutation_fn(|_, _| Some(attributes_of(json!({ "seen": true })))),
        )];
        let state = EventState::new();
        let patch = compute_mutations(&descriptors, &map, &state, &map.known_names()).unwrap();
        assert!(patch.get(PARENT, &EventKey::parent(), &Target::Parent).is_none());
        assert!(patch.get("bars", &EventKey::Index(0), &Target::Data).is_some());
    }

    #[test]
    fn callbacks_run_in_declaration_order() {
        let order = alloc::rc::Rc::new(Cell::new(0_u32));
        let first = {
            let order = order.clone();
            MutationDescriptor::new(
                ChildSelector::All,
                TargetSelector::All,
                KeySelector::All,
                mutation_fn(|_, _| None),
            )
            .with_callback(alloc::rc::Rc::new(move || {
                assert_eq!(order.get(), 0, "first callback runs first");
                order.set(1);
            }))
        };
        let second = {
            let order = order.clone();
            MutationDescriptor::new(
                ChildSelector::All,
                TargetSelector::All,
                KeySelector::All,
                mutation_fn(|_, _| None),
            )
            .with_callback(alloc::rc::Rc::new(move || {
                assert_eq!(order.get(), 1, "second callback runs second");
                order.set(2);
            }))
        };
        let descriptors = vec![first, second];
        assert!(has_callbacks(&descriptors));
        run_callbacks(&descriptors);
        assert_eq!(order.get(), 2);
    }

    #[test]
    fn matched_coordinates_reports_the_cartesian_scope() {
        let map = sample_map();
        let descriptor = MutationDescriptor::new(
            ChildSelector::one("bars"),
            TargetSelector::All,
            KeySelector::one(EventKey::Index(0)),
            mutation_fn(|_, _| None),
        );
        let coords = matched_coordinates(&descriptor, "bars", &map);
        assert_eq!(coords.len(), 2);
    }
}
