// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root-container aggregation of parent-targeted events and props.

use alloc::rc::Rc;
use alloc::vec::Vec;

use trellis_events::{
    merge_attributes, BasePropsMap, EventDescriptor, EventKey, ResolvedHandlers, SharedEvents,
    StateHandle, Target, PARENT,
};
use trellis_tree::{Element, Role};

/// How the computed handlers are attached to the rendered root.
#[derive(Clone, Debug)]
pub enum EventBinding {
    /// The container has [`Role::Container`]: the handler set is handed over
    /// as a single deferred value for the container to resolve itself.
    Deferred(ResolvedHandlers),
    /// An ordinary root: the handlers are bound directly.
    Direct(ResolvedHandlers),
}

impl EventBinding {
    /// The handler set, whichever way it is attached.
    pub fn handlers(&self) -> &ResolvedHandlers {
        match self {
            Self::Deferred(handlers) | Self::Direct(handlers) => handlers,
        }
    }
}

/// The rendered root: a container clone carrying the merged parent props and
/// the rewritten children, plus the handler binding for the host to attach.
#[derive(Clone, Debug)]
pub struct RenderedContainer {
    /// Container clone with merged props and rewritten children.
    pub element: Element,
    /// Handler attachment mode, per the container's role.
    pub binding: EventBinding,
}

impl RenderedContainer {
    /// The computed handler set, whichever way it is bound.
    pub fn handlers(&self) -> &ResolvedHandlers {
        self.binding.handlers()
    }
}

/// Aggregate `Parent`-targeted events and layered props onto the container.
///
/// `children` is the already-rewritten child sequence. Parent props layer,
/// weakest to strongest: the parent event-state patch, the parent entry of
/// the base-props map, then the container's own props — container props
/// override both. The resolved parent handlers layer under any handlers the
/// container itself already carries.
pub fn build_container(
    container: &Element,
    children: Vec<Element>,
    base_props: &Rc<BasePropsMap>,
    events: &[EventDescriptor],
    state: &StateHandle,
) -> RenderedContainer {
    let parent_events: Vec<EventDescriptor> = events
        .iter()
        .filter(|event| event.target == Target::Parent)
        .cloned()
        .collect();

    let resolved = if parent_events.is_empty() {
        ResolvedHandlers::new()
    } else {
        let bundle = SharedEvents::new(
            None,
            Rc::clone(base_props),
            parent_events,
            state.clone(),
        );
        bundle.resolve(bundle.events(), &Target::Parent)
    };

    let mut attrs = state
        .borrow()
        .get(PARENT, &EventKey::parent(), &Target::Parent)
        .cloned()
        .unwrap_or_default();
    merge_attributes(&mut attrs, base_props.parent());
    merge_attributes(&mut attrs, &container.props.attrs);

    let mut handlers = resolved;
    for (interaction, handler) in &container.props.handlers {
        handlers.insert(interaction.clone(), handler.clone());
    }

    let mut props = container.props.clone();
    props.attrs = attrs;
    let element = container.clone_with(props, children);

    let binding = match container.role() {
        Role::Container => EventBinding::Deferred(handlers),
        Role::Component => EventBinding::Direct(handlers),
    };
    RenderedContainer { element, binding }
}
