// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderable elements and the coordination capability.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use trellis_events::{
    Attributes, BaseProps, EventDescriptor, KeySelector, ResolvedHandlers, SharedEvents,
};

/// Role tag a component may carry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// An ordinary component.
    #[default]
    Component,
    /// A container: computed events are handed over as a single deferred
    /// value instead of being bound directly.
    Container,
}

/// A node in the renderable tree, polymorphic over the coordination
/// capability.
///
/// A component opts into shared-event coordination by returning `Some` from
/// [`Renderable::base_props`]. Components that keep the default are opaque
/// pass-throughs: extraction skips them and rewriting leaves them untouched.
/// Dispatch is by what the implementation returns, never by type inspection.
pub trait Renderable {
    /// Structural attributes for coordination, independent of interaction
    /// state.
    fn base_props(&self, props: &Props) -> Option<BaseProps> {
        let _ = props;
        None
    }

    /// Role tag; [`Role::Container`] changes how computed events are
    /// threaded to the rendered root.
    fn role(&self) -> Role {
        Role::Component
    }

    /// Name used in `Debug` output.
    fn type_name(&self) -> &str {
        "component"
    }
}

/// Properties attached to an [`Element`].
///
/// The `event_key` and `shared` slots are normally injected by the tree
/// rewriter; explicit values win over injected ones.
#[derive(Clone, Debug, Default)]
pub struct Props {
    /// Explicit child name; wins over the positional name.
    pub name: Option<String>,
    /// Flat attribute record.
    pub attrs: Attributes,
    /// Event descriptors this element declares on its own behalf.
    pub events: Vec<EventDescriptor>,
    /// Handlers already bound on this element.
    pub handlers: ResolvedHandlers,
    /// Key selector in play for this element's data.
    pub event_key: Option<KeySelector>,
    /// The child's shared-event bundle.
    pub shared: Option<Rc<SharedEvents>>,
}

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Props carrying an explicit child name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Attach a flat attribute record.
    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// Attach self-declared event descriptors.
    pub fn with_events(mut self, events: Vec<EventDescriptor>) -> Self {
        self.events = events;
        self
    }
}

impl PartialEq for Props {
    fn eq(&self, other: &Self) -> bool {
        let shared_matches = match (&self.shared, &other.shared) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        self.name == other.name
            && self.attrs == other.attrs
            && self.events == other.events
            && self.handlers == other.handlers
            && self.event_key == other.event_key
            && shared_matches
    }
}

/// A node in the renderable tree: a component, its props, its children.
#[derive(Clone)]
pub struct Element {
    component: Rc<dyn Renderable>,
    /// Own properties.
    pub props: Props,
    children: Vec<Element>,
}

impl Element {
    /// An element with no children.
    pub fn new(component: Rc<dyn Renderable>, props: Props) -> Self {
        Self {
            component,
            props,
            children: Vec::new(),
        }
    }

    /// Attach children.
    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    /// The component behind this element.
    pub fn component(&self) -> &Rc<dyn Renderable> {
        &self.component
    }

    /// Nested children.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// True when this element nests children (a group).
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// This element's base props via its component, when it participates.
    pub fn base_props(&self) -> Option<BaseProps> {
        self.component.base_props(&self.props)
    }

    /// The component's role tag.
    pub fn role(&self) -> Role {
        self.component.role()
    }

    /// Clone with different props and children. The input element is never
    /// mutated; rewriting always builds fresh nodes.
    pub fn clone_with(&self, props: Props, children: Vec<Element>) -> Self {
        Self {
            component: Rc::clone(&self.component),
            props,
            children,
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("component", &self.component.type_name())
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.component, &other.component)
            && self.props == other.props
            && self.children == other.children
    }
}

/// A plain wrapping group with no capabilities, the default
/// `group_component`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Group;

impl Renderable for Group {
    fn type_name(&self) -> &str {
        "group"
    }
}

/// A bare group element.
pub fn group() -> Element {
    Element::new(Rc::new(Group), Props::new())
}
