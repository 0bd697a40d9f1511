// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core vocabulary shared by the event and mutation models.

use alloc::string::{String, ToString};
use core::fmt;

use kurbo::Point;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// Arbitrary attribute record attached to a child or merged into state.
///
/// Deep equality is value equality of the underlying JSON values, so two
/// records compare equal when their contents do, regardless of how they were
/// built.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Reserved child name for the root container scope.
pub const PARENT: &str = "parent";

/// Convert a JSON object value into an [`Attributes`] record.
///
/// Non-object values yield an empty record. Convenient together with
/// `serde_json::json!`:
///
/// ```
/// use serde_json::json;
/// use trellis_events::types::attributes_of;
///
/// let attrs = attributes_of(json!({ "fill": "red" }));
/// assert_eq!(attrs.get("fill").and_then(|v| v.as_str()), Some("red"));
/// ```
pub fn attributes_of(value: serde_json::Value) -> Attributes {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// Shallow-merge `over` into `base`, letting `over` win on key collisions.
pub fn merge_attributes(base: &mut Attributes, over: &Attributes) {
    for (key, value) in over {
        base.insert(key.clone(), value.clone());
    }
}

/// Interaction surface within a child that an event or patch applies to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// The child's data marks.
    Data,
    /// The child's labels.
    Labels,
    /// The root container itself. Events with this target are aggregated on
    /// the container and never resolve on a non-parent child.
    Parent,
    /// Any other surface a component defines.
    Other(String),
}

impl Target {
    /// String form used for state keys and serialization.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Data => "data",
            Self::Labels => "labels",
            Self::Parent => "parent",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Identifies a datum (or the whole child) within a participating child.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKey {
    /// A positional datum index.
    Index(u32),
    /// An explicit string key.
    Named(String),
    /// The whole child. This is an ordinary state slot, not a broadcast:
    /// lookups are exact.
    All,
}

impl EventKey {
    /// The conventional key for parent-scope state.
    pub fn parent() -> Self {
        Self::Named(String::from(PARENT))
    }

    /// String form used for state keys and serialization.
    pub fn key_string(&self) -> String {
        match self {
            Self::Index(i) => i.to_string(),
            Self::Named(name) => name.clone(),
            Self::All => String::from("all"),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_string())
    }
}

impl Serialize for EventKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key_string())
    }
}

/// Which children an event or mutation descriptor applies to.
///
/// Matching is literal: equality, membership, or the `All` wildcard. There
/// is deliberately no pattern syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChildSelector {
    /// Every participating child (and the reserved parent scope, for
    /// mutation descriptors).
    All,
    /// A single named child.
    One(String),
    /// An explicit list of names.
    Many(SmallVec<[String; 4]>),
}

impl ChildSelector {
    /// Select a single named child.
    pub fn one(name: impl Into<String>) -> Self {
        Self::One(name.into())
    }

    /// Select an explicit list of names.
    pub fn many<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Many(names.into_iter().map(Into::into).collect())
    }

    /// Does this selector name `name`?
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::One(n) => n == name,
            Self::Many(names) => names.iter().any(|n| n == name),
        }
    }
}

impl Default for ChildSelector {
    fn default() -> Self {
        Self::All
    }
}

/// Which event keys a descriptor applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySelector {
    /// Every key.
    All,
    /// A single key.
    One(EventKey),
    /// An explicit list of keys.
    Many(SmallVec<[EventKey; 4]>),
}

impl KeySelector {
    /// Select a single key.
    pub fn one(key: EventKey) -> Self {
        Self::One(key)
    }

    /// Select an explicit list of keys.
    pub fn many<I: IntoIterator<Item = EventKey>>(keys: I) -> Self {
        Self::Many(keys.into_iter().collect())
    }

    /// Does this selector cover `key`?
    pub fn matches(&self, key: &EventKey) -> bool {
        match self {
            Self::All => true,
            Self::One(k) => k == key,
            Self::Many(keys) => keys.contains(key),
        }
    }
}

impl Default for KeySelector {
    fn default() -> Self {
        Self::All
    }
}

/// Which targets a mutation descriptor applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSelector {
    /// Every target present in the child's base props.
    All,
    /// A single target.
    One(Target),
    /// An explicit list of targets.
    Many(SmallVec<[Target; 2]>),
}

impl TargetSelector {
    /// Select a single target.
    pub fn one(target: Target) -> Self {
        Self::One(target)
    }

    /// Select an explicit list of targets.
    pub fn many<I: IntoIterator<Item = Target>>(targets: I) -> Self {
        Self::Many(targets.into_iter().collect())
    }

    /// Does this selector cover `target`?
    pub fn matches(&self, target: &Target) -> bool {
        match self {
            Self::All => true,
            Self::One(t) => t == target,
            Self::Many(targets) => targets.contains(target),
        }
    }
}

impl Default for TargetSelector {
    fn default() -> Self {
        Self::All
    }
}

/// Payload delivered when an interaction fires on a child's surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionEvent {
    /// Pointer position in the host's coordinate space, when the interaction
    /// has one.
    pub position: Option<Point>,
    /// Datum the interaction hit, when the surface is per-datum.
    pub event_key: Option<EventKey>,
    /// Extra host-defined payload.
    pub detail: Attributes,
}

impl InteractionEvent {
    /// An empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// A payload carrying a pointer position.
    pub fn at(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Attach the datum key the interaction hit.
    pub fn on_key(mut self, key: EventKey) -> Self {
        self.event_key = Some(key);
        self
    }
}
