// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Base-props extraction over a child collection.
//!
//! Extraction is a pure function of the current children and their own
//! props. A node with nested children is a group: it is traversed into and
//! its participating leaves flatten into the parent sequence in traversal
//! order; the group itself is never a participant. Leaves without the
//! base-props capability are skipped entirely.
//!
//! Positional names count participating leaves only. The tree rewriter runs
//! the identical walk, so extraction and rewriting always agree on names
//! even with non-participating siblings interleaved.

use alloc::string::{String, ToString};

use trellis_events::BasePropsMap;

use crate::element::Element;

/// Walk `children` and collect per-name base props.
///
/// The returned map holds the children part only; the caller attaches the
/// reserved parent entry from the container's own props.
pub fn extract_base_props(children: &[Element]) -> BasePropsMap {
    let mut map = BasePropsMap::new();
    let mut index = 0_usize;
    collect(children, &mut map, &mut index);
    map
}

/// Name for a participating leaf: the explicit `name` prop or the positional
/// index among participants.
pub fn participant_name(child: &Element, index: usize) -> String {
    child
        .props
        .name
        .clone()
        .unwrap_or_else(|| index.to_string())
}

fn collect(children: &[Element], map: &mut BasePropsMap, index: &mut usize) {
    for child in children {
        if child.has_children() {
            collect(child.children(), map, index);
            continue;
        }
        if let Some(props) = child.base_props() {
            let name = participant_name(child, *index);
            *index += 1;
            map.insert(name, props);
        }
    }
}
