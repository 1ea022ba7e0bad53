// SPDX-License-Identifier: PMPL-1.0-or-later

//! Extension-based dispatch to the INI, YAML and JSON parsers.
//!
//! Every parser yields a [`TranslationMap`] whose leaves are already coerced
//! to strings: numbers use their textual form, booleans become
//! `true`/`false`, null becomes the empty string and sequences become
//! sections keyed by index.

use super::ini;
use crate::error::{I18nError, Result};
use crate::types::{Node, TranslationMap};
use std::borrow::Cow;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Ini,
    Yaml,
    Json,
}

impl SourceFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ini" | "properties" => Some(SourceFormat::Ini),
            "yml" | "yaml" => Some(SourceFormat::Yaml),
            "json" => Some(SourceFormat::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&extension).ok_or_else(|| I18nError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Ini => "ini",
            SourceFormat::Yaml => "yaml",
            SourceFormat::Json => "json",
        }
    }

    /// Decode and parse raw source bytes. The error is a human-readable
    /// reason; the caller attaches the path.
    pub fn parse(self, bytes: &[u8]) -> std::result::Result<TranslationMap, String> {
        let text = decode(bytes)?;
        match self {
            SourceFormat::Ini => ini::parse(&text),
            SourceFormat::Yaml => {
                let value: serde_yaml::Value =
                    serde_yaml::from_str(&text).map_err(|e| e.to_string())?;
                yaml_document(value)
            }
            SourceFormat::Json => {
                let value: serde_json::Value =
                    serde_json::from_str(&text).map_err(|e| e.to_string())?;
                json_document(value)
            }
        }
    }
}

fn decode(bytes: &[u8]) -> std::result::Result<Cow<'_, str>, String> {
    let (encoding, body) = match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (encoding_rs::UTF_8, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| format!("source is not valid {}", encoding.name()))
}

fn yaml_document(value: serde_yaml::Value) -> std::result::Result<TranslationMap, String> {
    use serde_yaml::Value;
    match value {
        Value::Null => Ok(TranslationMap::new()),
        Value::Mapping(mapping) => yaml_mapping(mapping),
        Value::Tagged(tagged) => yaml_document(tagged.value),
        other => Err(format!(
            "expected a mapping at the top level, found {}",
            yaml_kind(&other)
        )),
    }
}

fn yaml_mapping(mapping: serde_yaml::Mapping) -> std::result::Result<TranslationMap, String> {
    let mut map = TranslationMap::with_capacity(mapping.len());
    for (key, value) in mapping {
        map.insert(yaml_key(key)?, yaml_node(value)?);
    }
    Ok(map)
}

fn yaml_node(value: serde_yaml::Value) -> std::result::Result<Node, String> {
    use serde_yaml::Value;
    Ok(match value {
        Value::Null => Node::leaf(""),
        Value::Bool(flag) => Node::Leaf(flag.to_string()),
        Value::Number(number) => Node::Leaf(number.to_string()),
        Value::String(text) => Node::Leaf(text),
        Value::Sequence(items) => {
            let mut map = TranslationMap::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                map.insert(index.to_string(), yaml_node(item)?);
            }
            Node::Section(map)
        }
        Value::Mapping(mapping) => Node::Section(yaml_mapping(mapping)?),
        Value::Tagged(tagged) => yaml_node(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    use serde_yaml::Value;
    match key {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(format!("mapping keys must be scalars, found {}", yaml_kind(&other))),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    use serde_yaml::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn json_document(value: serde_json::Value) -> std::result::Result<TranslationMap, String> {
    match value {
        serde_json::Value::Object(object) => Ok(json_object(object)),
        other => Err(format!(
            "expected an object at the top level, found {}",
            json_kind(&other)
        )),
    }
}

fn json_object(object: serde_json::Map<String, serde_json::Value>) -> TranslationMap {
    object
        .into_iter()
        .map(|(key, value)| (key, json_node(value)))
        .collect()
}

fn json_node(value: serde_json::Value) -> Node {
    use serde_json::Value;
    match value {
        Value::Null => Node::leaf(""),
        Value::Bool(flag) => Node::Leaf(flag.to_string()),
        Value::Number(number) => Node::Leaf(number.to_string()),
        Value::String(text) => Node::Leaf(text),
        Value::Array(items) => Node::Section(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), json_node(item)))
                .collect(),
        ),
        Value::Object(object) => Node::Section(json_object(object)),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
