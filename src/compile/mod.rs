// SPDX-License-Identifier: PMPL-1.0-or-later

//! Key compiler: flattens nested translation data into named literals.
//!
//! Section names are joined with the configured separator, e.g. with `_`
//! the source
//!
//! ```yaml
//! greeting: Hi %1
//! menu:
//!   save: Save
//! ```
//!
//! compiles to the entries `greeting` and `menu_save`. Every flattened name
//! must be a valid identifier (`[A-Za-z_\x7f-\xff][A-Za-z0-9_\x7f-\xff]*`
//! over UTF-8 bytes, so any non-ASCII character is accepted).

use crate::error::{I18nError, Result};
use crate::types::{CompiledEntry, Node, TranslationMap};
use regex::bytes::Regex;
use std::sync::LazyLock;

/// Deepest section nesting accepted before compilation gives up.
pub const MAX_SECTION_DEPTH: usize = 64;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^[A-Za-z_\x7f-\xff][A-Za-z0-9_\x7f-\xff]*$")
        .expect("identifier pattern is valid")
});

pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name.as_bytes())
}

/// Flatten `map` depth-first in source order.
pub fn compile(map: &TranslationMap, separator: &str) -> Result<Vec<CompiledEntry>> {
    let mut entries = Vec::new();
    compile_into(map, "", separator, 0, &mut entries)?;
    Ok(entries)
}

fn compile_into(
    map: &TranslationMap,
    prefix: &str,
    separator: &str,
    depth: usize,
    entries: &mut Vec<CompiledEntry>,
) -> Result<()> {
    for (key, node) in map {
        match node {
            Node::Section(section) => {
                if depth + 1 > MAX_SECTION_DEPTH {
                    return Err(I18nError::NestingTooDeep {
                        key: format!("{}{}", prefix, key),
                        limit: MAX_SECTION_DEPTH,
                    });
                }
                let nested = format!("{}{}{}", prefix, key, separator);
                compile_into(section, &nested, separator, depth + 1, entries)?;
            }
            Node::Leaf(value) => {
                let name = format!("{}{}", prefix, key);
                if !is_valid_identifier(&name) {
                    return Err(I18nError::InvalidIdentifier { key: name });
                }
                entries.push(CompiledEntry {
                    name,
                    literal: escape_literal(value),
                });
            }
        }
    }
    Ok(())
}

/// Escape a value for embedding between double quotes.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
