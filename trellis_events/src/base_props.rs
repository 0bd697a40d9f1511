// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural base-props records and the per-tree map.
//!
//! Base props are a child's structural attributes independent of interaction
//! state, keyed by datum event key and target. The map over all children is
//! insertion-ordered because positional child names are derived from it.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap;

use crate::types::{Attributes, EventKey, Target, PARENT};

/// One child's structural attributes: event key → target → attributes.
pub type BaseProps = BTreeMap<EventKey, BTreeMap<Target, Attributes>>;

/// Build a [`BaseProps`] record from flat `(key, target, attributes)` rows.
pub fn base_props_from<I>(rows: I) -> BaseProps
where
    I: IntoIterator<Item = (EventKey, Target, Attributes)>,
{
    let mut props = BaseProps::new();
    for (key, target, attrs) in rows {
        props.entry(key).or_default().insert(target, attrs);
    }
    props
}

type ChildMap = IndexMap<String, BaseProps, hashbrown::DefaultHashBuilder>;

/// Base props for every participating child, in extraction order, plus the
/// reserved parent entry holding the root container's own props.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasePropsMap {
    children: ChildMap,
    parent: Attributes,
}

impl BasePropsMap {
    /// An empty map with no parent props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a child's base props. Insertion order is the naming order.
    pub fn insert(&mut self, name: impl Into<String>, props: BaseProps) {
        self.children.insert(name.into(), props);
    }

    /// A child's base props, if it participated.
    pub fn child(&self, name: &str) -> Option<&BaseProps> {
        self.children.get(name)
    }

    /// True when `name` names a participating child.
    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Number of participating children (the parent entry not counted).
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when no child participated.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The reserved parent entry.
    pub fn parent(&self) -> &Attributes {
        &self.parent
    }

    /// Set the reserved parent entry.
    pub fn set_parent(&mut self, attrs: Attributes) {
        self.parent = attrs;
    }

    /// Child names in extraction order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Child names plus the reserved parent name, the name universe mutation
    /// selectors resolve against.
    pub fn known_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.children.keys().map(String::as_str).collect();
        names.push(PARENT);
        names
    }

    /// Iterate children in extraction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BaseProps)> {
        self.children.iter().map(|(name, props)| (name.as_str(), props))
    }
}
