// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree rewriting: injecting shared-event bundles into participating leaves.
//!
//! The rewriter walks the child collection and produces a fresh tree — the
//! input is never mutated. Groups are recursed into first and re-attached
//! with their rewritten sequence; participating leaves are cloned with the
//! coordination slots injected; everything else passes through unchanged.
//! Leaves resolve their own handlers lazily through the injected bundle at
//! their own render time, not here.

use alloc::rc::Rc;
use alloc::vec::Vec;

use trellis_events::{
    filter_events, BasePropsMap, EventDescriptor, KeySelector, SharedEvents, StateHandle,
};
use trellis_tree::{participant_name, Element};

use crate::cache::{Fingerprint, SharedEventsCache};

/// Rebuild `children`, attaching a shared-event bundle to every
/// participating leaf.
///
/// `events` is the full effective descriptor list; each leaf receives only
/// the descriptors applicable to it, with `Parent`-targeted ones always
/// excluded. Bundles come from `cache` when the leaf's fingerprint is
/// unchanged, so an undisturbed child keeps its exact bundle across renders.
pub fn rewrite_children(
    children: &[Element],
    events: &[EventDescriptor],
    event_key: Option<&KeySelector>,
    base_props: &Rc<BasePropsMap>,
    state: &StateHandle,
    cache: &mut SharedEventsCache,
) -> Vec<Element> {
    let mut index = 0_usize;
    rewrite(children, events, event_key, base_props, state, cache, &mut index)
}

fn rewrite(
    children: &[Element],
    events: &[EventDescriptor],
    event_key: Option<&KeySelector>,
    base_props: &Rc<BasePropsMap>,
    state: &StateHandle,
    cache: &mut SharedEventsCache,
    index: &mut usize,
) -> Vec<Element> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        if child.has_children() {
            let inner = rewrite(
                child.children(),
                events,
                event_key,
                base_props,
                state,
                cache,
                index,
            );
            out.push(child.clone_with(child.props.clone(), inner));
        } else if child.base_props().is_some() {
            let name = participant_name(child, *index);
            *index += 1;

            let child_events = filter_events(events, Some(&name));
            let fingerprint = Fingerprint::capture(
                name.clone(),
                Rc::clone(base_props),
                child_events.clone(),
                state,
            );
            let bundle = cache.get(&name, &fingerprint).unwrap_or_else(|| {
                Rc::new(SharedEvents::new(
                    Some(name.clone()),
                    Rc::clone(base_props),
                    child_events,
                    state.clone(),
                ))
            });
            cache.put(name.clone(), Rc::clone(&bundle), fingerprint);

            // Inject the coordination slots; explicit child props win.
            let mut props = child.props.clone();
            if props.name.is_none() {
                props.name = Some(name);
            }
            if props.event_key.is_none() {
                props.event_key = event_key.cloned();
            }
            if props.shared.is_none() {
                props.shared = Some(bundle);
            }
            out.push(child.clone_with(props, Vec::new()));
        } else {
            out.push(child.clone());
        }
    }
    out
}
