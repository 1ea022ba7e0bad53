// SPDX-License-Identifier: PMPL-1.0-or-later

//! Minimal INI / properties parser.
//!
//! Keys before the first `[section]` header land at the top level; every
//! header opens a section that later keys are added to. A repeated header
//! reopens the earlier section.

use crate::types::{Node, TranslationMap};
use indexmap::IndexMap;

pub(super) fn parse(text: &str) -> Result<TranslationMap, String> {
    let mut root = TranslationMap::new();
    let mut sections: IndexMap<String, TranslationMap> = IndexMap::new();
    let mut current: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .map(str::trim)
                .ok_or_else(|| format!("line {}: unterminated section header", line_no))?;
            if name.is_empty() {
                return Err(format!("line {}: empty section name", line_no));
            }
            if root.contains_key(name) {
                return Err(format!(
                    "line {}: section [{}] clashes with the top-level key `{}`",
                    line_no, name, name
                ));
            }
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        let (key, raw_value) = split_pair(line)
            .ok_or_else(|| format!("line {}: expected `key = value`", line_no))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("line {}: missing key", line_no));
        }
        let value = parse_value(raw_value.trim()).map_err(|e| format!("line {}: {}", line_no, e))?;

        let target = match &current {
            Some(name) => sections.entry(name.clone()).or_default(),
            None => &mut root,
        };
        target.insert(key.to_string(), Node::Leaf(value));
    }

    for (name, map) in sections {
        root.insert(name, Node::Section(map));
    }
    Ok(root)
}

/// Split on whichever of `=` or `:` comes first.
fn split_pair(line: &str) -> Option<(&str, &str)> {
    let at = line.find(['=', ':'])?;
    Some((&line[..at], &line[at + 1..]))
}

fn parse_value(raw: &str) -> Result<String, String> {
    let mut chars = raw.chars();
    match chars.next() {
        Some('"') => {
            let mut value = String::new();
            while let Some(ch) = chars.next() {
                match ch {
                    '"' => return trailing_comment_only(chars.as_str()).map(|_| value),
                    '\\' => match chars.next() {
                        Some(esc @ ('"' | '\\')) => value.push(esc),
                        Some(other) => {
                            value.push('\\');
                            value.push(other);
                        }
                        None => value.push('\\'),
                    },
                    other => value.push(other),
                }
            }
            Err("unterminated double-quoted value".to_string())
        }
        Some('\'') => {
            let rest = chars.as_str();
            let end = rest
                .find('\'')
                .ok_or_else(|| "unterminated single-quoted value".to_string())?;
            trailing_comment_only(&rest[end + 1..])?;
            Ok(rest[..end].to_string())
        }
        _ => Ok(strip_inline_comment(raw).trim_end().to_string()),
    }
}

fn trailing_comment_only(rest: &str) -> Result<(), String> {
    let rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with(';') || rest.starts_with('#') {
        Ok(())
    } else {
        Err(format!("unexpected text after quoted value: {:?}", rest))
    }
}

/// An unquoted value ends at a `;` that starts the value or follows
/// whitespace.
fn strip_inline_comment(raw: &str) -> &str {
    let mut previous: Option<char> = None;
    for (at, ch) in raw.char_indices() {
        if ch == ';' && previous.is_none_or(char::is_whitespace) {
            return &raw[..at];
        }
        previous = Some(ch);
    }
    raw
}
