// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The coordinator: prop ownership, lifecycle hooks, render pipeline.

use alloc::rc::Rc;
use alloc::vec::Vec;

use trellis_events::{
    compute_mutations, has_callbacks, run_callbacks, BasePropsMap, EventDescriptor, EventState,
    KeySelector, MutationDescriptor, ResolvedHandlers, StateHandle,
};
use trellis_tree::{extract_base_props, group, Element};

use crate::cache::SharedEventsCache;
use crate::container::{build_container, EventBinding, RenderedContainer};
use crate::rewrite::rewrite_children;

bitflags::bitflags! {
    /// Summary of what an update pass touched.
    ///
    /// Returned from [`SharedEventCoordinator::update`] so hosts can decide
    /// what follow-up work a prop change actually requires.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct UpdateEffects: u8 {
        /// The base-props map was rebuilt.
        const BASE_PROPS = 1 << 0;
        /// Shared state received a mutation patch.
        const STATE = 1 << 1;
        /// External-mutation callbacks ran.
        const CALLBACKS = 1 << 2;
    }
}

/// Configuration of one coordinated tree.
///
/// Deep equality over these props gates the external-mutation pass. Closure
/// fields (handlers, mutations, callbacks) compare by identity, so the usual
/// way to produce the next props is to clone the previous value and change
/// what changed.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinatorProps {
    /// The child collection to coordinate.
    pub children: Vec<Element>,
    /// Root container element; the group component stands in when `None`.
    pub container: Option<Element>,
    /// Default wrapping element used when no container is supplied.
    pub group_component: Element,
    /// Caller-declared event descriptors.
    pub events: Vec<EventDescriptor>,
    /// Key selector injected into participating children.
    pub event_key: Option<KeySelector>,
    /// Mutations recomputed whenever the owning props change.
    pub external_event_mutations: Vec<MutationDescriptor>,
    /// Mutations applied exactly once at mount.
    pub initial_event_mutations: Vec<MutationDescriptor>,
}

impl CoordinatorProps {
    /// Props over a child collection, with a bare group as the default
    /// wrapper and everything else empty.
    pub fn new(children: Vec<Element>) -> Self {
        Self {
            children,
            container: None,
            group_component: group(),
            events: Vec::new(),
            event_key: None,
            external_event_mutations: Vec::new(),
            initial_event_mutations: Vec::new(),
        }
    }

    /// Attach a root container.
    pub fn with_container(mut self, container: Element) -> Self {
        self.container = Some(container);
        self
    }

    /// Attach caller-declared event descriptors.
    pub fn with_events(mut self, events: Vec<EventDescriptor>) -> Self {
        self.events = events;
        self
    }

    /// Attach the key selector to inject into participating children.
    pub fn with_event_key(mut self, event_key: KeySelector) -> Self {
        self.event_key = Some(event_key);
        self
    }

    /// Attach mount-time mutations.
    pub fn with_initial_mutations(mut self, mutations: Vec<MutationDescriptor>) -> Self {
        self.initial_event_mutations = mutations;
        self
    }

    /// Attach externally triggered mutations.
    pub fn with_external_mutations(mut self, mutations: Vec<MutationDescriptor>) -> Self {
        self.external_event_mutations = mutations;
        self
    }
}

impl Default for CoordinatorProps {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Coordinates event handling and state mutation for one tree root.
///
/// The coordinator exclusively owns the shared state and the bundle cache;
/// both live and die with it. All work is synchronous inside the host's
/// lifecycle: [`mount`](Self::mount) once, strictly before the first render;
/// [`update`](Self::update) before any render whose props may have changed;
/// [`render`](Self::render) for every pass.
#[derive(Debug)]
pub struct SharedEventCoordinator {
    props: CoordinatorProps,
    state: StateHandle,
    base_props: Rc<BasePropsMap>,
    cache: SharedEventsCache,
    mounted: bool,
}

impl SharedEventCoordinator {
    /// A coordinator over `props`. Shared state starts empty; the base-props
    /// map reflects the given props immediately.
    pub fn new(props: CoordinatorProps) -> Self {
        let base_props = Rc::new(collect_base_props(&props));
        Self {
            props,
            state: EventState::shared(),
            base_props,
            cache: SharedEventsCache::new(),
            mounted: false,
        }
    }

    /// The current props.
    pub fn props(&self) -> &CoordinatorProps {
        &self.props
    }

    /// The current base-props map.
    pub fn base_props(&self) -> &BasePropsMap {
        &self.base_props
    }

    /// A handle to the shared state. Treat it as read-only: writes belong to
    /// the coordinator and the handlers it bound.
    pub fn state(&self) -> StateHandle {
        self.state.clone()
    }

    /// Apply initial mutations, exactly once.
    ///
    /// Call strictly before the first render that should reflect them.
    /// Subsequent calls are no-ops.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        if self.props.initial_event_mutations.is_empty() {
            return;
        }
        let patch = {
            let state = self.state.borrow();
            let names = self.base_props.known_names();
            compute_mutations(
                &self.props.initial_event_mutations,
                &self.base_props,
                &state,
                &names,
            )
        };
        if let Some(patch) = patch {
            self.state.borrow_mut().apply(&patch);
        }
    }

    /// Take the next props and run the external-mutation pass when they are
    /// deep-unequal to the current ones.
    ///
    /// On inequality the base-props map is rebuilt first, then external
    /// mutations are recomputed against it; a non-empty patch is merged into
    /// state and every descriptor callback runs exactly once afterwards, in
    /// declaration order. Deep-equal props leave everything untouched.
    pub fn update(&mut self, next: CoordinatorProps) -> UpdateEffects {
        if next == self.props {
            return UpdateEffects::empty();
        }
        self.props = next;
        self.base_props = Rc::new(collect_base_props(&self.props));
        let mut effects = UpdateEffects::BASE_PROPS;

        if self.props.external_event_mutations.is_empty() {
            return effects;
        }
        let patch = {
            let state = self.state.borrow();
            let names = self.base_props.known_names();
            compute_mutations(
                &self.props.external_event_mutations,
                &self.base_props,
                &state,
                &names,
            )
        };
        if let Some(patch) = patch
            && !patch.is_empty()
        {
            self.state.borrow_mut().apply(&patch);
            effects |= UpdateEffects::STATE;
            if has_callbacks(&self.props.external_event_mutations) {
                run_callbacks(&self.props.external_event_mutations);
                effects |= UpdateEffects::CALLBACKS;
            }
        }
        effects
    }

    /// The effective descriptor list: events contributed by the container
    /// and the group component themselves, in that order, then the caller's.
    pub fn all_events(&self) -> Vec<EventDescriptor> {
        let mut events = Vec::new();
        if let Some(container) = &self.props.container {
            events.extend_from_slice(&container.props.events);
        }
        events.extend_from_slice(&self.props.group_component.props.events);
        events.extend_from_slice(&self.props.events);
        events
    }

    /// Produce the rendered root for the current props and state.
    ///
    /// With no effective events at all this short-circuits to the container
    /// with the children unchanged; nothing is resolved, rewritten, or
    /// cached. Otherwise the children are rewritten with their bundles and
    /// the container aggregates the `Parent`-targeted remainder.
    pub fn render(&mut self) -> RenderedContainer {
        let events = self.all_events();
        let container = self
            .props
            .container
            .clone()
            .unwrap_or_else(|| self.props.group_component.clone());

        if events.is_empty() {
            let element =
                container.clone_with(container.props.clone(), self.props.children.clone());
            return RenderedContainer {
                element,
                binding: EventBinding::Direct(ResolvedHandlers::new()),
            };
        }

        let children = rewrite_children(
            &self.props.children,
            &events,
            self.props.event_key.as_ref(),
            &self.base_props,
            &self.state,
            &mut self.cache,
        );
        build_container(&container, children, &self.base_props, &events, &self.state)
    }
}

fn collect_base_props(props: &CoordinatorProps) -> BasePropsMap {
    let mut map = extract_base_props(&props.children);
    if let Some(container) = &props.container {
        map.set_parent(container.props.attrs.clone());
    }
    map
}
