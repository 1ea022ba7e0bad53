// SPDX-License-Identifier: PMPL-1.0-or-later

//! Deep merge of the fallback language under the applied language

use crate::types::{Node, TranslationMap};

/// Merge `fallback` underneath `primary`, primary values winning.
///
/// Sections present on both sides are merged recursively. Where one side
/// has a leaf and the other a section, the primary's node replaces the
/// fallback's. Keys keep the fallback's order with primary-only keys
/// appended, so repeated merges of the same inputs are identical.
pub fn merge(primary: &TranslationMap, fallback: &TranslationMap) -> TranslationMap {
    let mut merged = fallback.clone();
    for (key, node) in primary {
        let replacement = match (merged.get(key), node) {
            (Some(Node::Section(base)), Node::Section(overlay)) => Node::Section(merge(overlay, base)),
            _ => node.clone(),
        };
        merged.insert(key.clone(), replacement);
    }
    merged
}
