// SPDX-License-Identifier: PMPL-1.0-or-later

//! Compiled artifacts and the runtime catalog built from them.
//!
//! An artifact is a small S-expression document:
//!
//! ```text
//! # generated by langforge; do not edit
//! (langforge
//!   (meta
//!     (compiler "langforge-artifact/1+0.3.0")
//!     (prefix "L")
//!     (language "de")
//!   )
//!   (entry "greeting" "Hallo %1")
//!   (entry "menu_save" "Speichern")
//! )
//! ```
//!
//! Entry literals are embedded exactly as the key compiler escaped them, so
//! the same inputs always produce the same bytes.

mod sexpr;

use crate::error::{I18nError, Result};
use crate::storage::Storage;
use crate::types::CompiledEntry;
use indexmap::IndexMap;
use sexpr::Sexpr;
use std::borrow::Cow;
use std::path::Path;

const ROOT: &str = "langforge";
const HEADER: &str = "# generated by langforge; do not edit";

/// Descriptive fields stored alongside the entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMeta {
    pub compiler: String,
    pub prefix: String,
    pub language: String,
    pub namespace: Option<String>,
}

/// Render an artifact. Entry literals must already be escaped.
pub fn emit(entries: &[CompiledEntry], meta: &ArtifactMeta) -> Vec<u8> {
    let mut lines = Vec::with_capacity(entries.len() + 8);
    lines.push(HEADER.to_string());
    lines.push(format!("({}", ROOT));
    lines.push("  (meta".to_string());
    lines.push(format!("    (compiler {})", quote(&meta.compiler)));
    lines.push(format!("    (prefix {})", quote(&meta.prefix)));
    lines.push(format!("    (language {})", quote(&meta.language)));
    if let Some(namespace) = &meta.namespace {
        lines.push(format!("    (namespace {})", quote(namespace)));
    }
    lines.push("  )".to_string());
    for entry in entries {
        lines.push(format!("  (entry \"{}\" \"{}\")", entry.name, entry.literal));
    }
    lines.push(")".to_string());
    let mut text = lines.join("\n");
    text.push('\n');
    text.into_bytes()
}

fn quote(value: &str) -> String {
    format!("\"{}\"", crate::compile::escape_literal(value))
}

/// Name → value table loaded from an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    meta: ArtifactMeta,
    entries: IndexMap<String, String>,
}

impl Catalog {
    /// Read and parse the artifact at `path`.
    pub fn load<S: Storage>(storage: &S, path: &Path) -> Result<Self> {
        let bytes = storage
            .read(path)
            .map_err(|source| I18nError::CacheUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        let corrupt = |reason: String| I18nError::CorruptArtifact {
            path: path.to_path_buf(),
            reason,
        };
        let text = String::from_utf8(bytes).map_err(|e| corrupt(e.to_string()))?;
        Self::parse(&text).map_err(corrupt)
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let tree = sexpr::parse(raw)?;
        let Sexpr::List(items) = tree else {
            return Err("artifact root must be a list".to_string());
        };
        let mut items = items.into_iter();
        match items.next() {
            Some(Sexpr::Atom(root)) if root == ROOT => {}
            _ => return Err(format!("artifact root must be `{}`", ROOT)),
        }

        let mut fields: IndexMap<String, String> = IndexMap::new();
        let mut entries = IndexMap::new();
        for item in items {
            match head(&item) {
                Some(("meta", rest)) => {
                    for field in rest {
                        match head(field) {
                            Some((name, [Sexpr::String(value)])) => {
                                fields.insert(name.to_string(), value.clone());
                            }
                            _ => return Err("meta fields must be `(name \"value\")`".to_string()),
                        }
                    }
                }
                Some(("entry", [Sexpr::String(name), Sexpr::String(value)])) => {
                    entries.insert(name.clone(), value.clone());
                }
                _ => return Err("expected `(meta …)` or `(entry \"name\" \"value\")`".to_string()),
            }
        }

        let mut required = |name: &str| {
            fields
                .shift_remove(name)
                .ok_or_else(|| format!("meta field `{}` missing", name))
        };
        let meta = ArtifactMeta {
            compiler: required("compiler")?,
            prefix: required("prefix")?,
            language: required("language")?,
            namespace: fields.shift_remove("namespace"),
        };
        Ok(Self { meta, entries })
    }

    /// Look up `name` and substitute `%1`, `%2`, … from `args`.
    ///
    /// With no arguments the literal is returned unchanged.
    pub fn get(&self, name: &str, args: &[&str]) -> Option<Cow<'_, str>> {
        self.literal(name).map(|literal| interpolate(literal, args))
    }

    pub fn literal(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn meta(&self) -> &ArtifactMeta {
        &self.meta
    }

    pub fn prefix(&self) -> &str {
        &self.meta.prefix
    }

    pub fn language(&self) -> &str {
        &self.meta.language
    }

    pub fn namespace(&self) -> Option<&str> {
        self.meta.namespace.as_deref()
    }
}

fn head(expr: &Sexpr) -> Option<(&str, &[Sexpr])> {
    match expr {
        Sexpr::List(list) => match list.split_first() {
            Some((Sexpr::Atom(name), rest)) => Some((name.as_str(), rest)),
            _ => None,
        },
        _ => None,
    }
}

/// Replace `%N` placeholders (N ≥ 1) with the N-th argument.
///
/// `%%` yields a literal `%`. Placeholders without a matching argument and
/// a `%` not followed by a digit are kept as written.
pub fn interpolate<'a>(literal: &'a str, args: &[&str]) -> Cow<'a, str> {
    if args.is_empty() || !literal.contains('%') {
        return Cow::Borrowed(literal);
    }
    let mut out = String::with_capacity(literal.len());
    let mut rest = literal;
    while let Some(at) = rest.find('%') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        if let Some(stripped) = after.strip_prefix('%') {
            out.push('%');
            rest = stripped;
            continue;
        }
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let argument = after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| args.get(index));
        match argument {
            Some(arg) => {
                out.push_str(arg);
                rest = &after[digits..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
