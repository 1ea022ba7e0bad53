// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for langforge

use indexmap::IndexMap;

/// Nested translation data as produced by a format parser.
///
/// Insertion order is preserved end to end so that identical sources
/// always compile to identical artifacts.
pub type TranslationMap = IndexMap<String, Node>;

/// A value inside a [`TranslationMap`]: a leaf already coerced to its
/// string form, or a nested section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(String),
    Section(TranslationMap),
}

impl Node {
    pub fn leaf(value: impl Into<String>) -> Self {
        Node::Leaf(value.into())
    }

    pub fn as_section(&self) -> Option<&TranslationMap> {
        match self {
            Node::Section(map) => Some(map),
            Node::Leaf(_) => None,
        }
    }
}

/// One flattened translation key.
///
/// `literal` is already escaped for embedding between double quotes in
/// a generated artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEntry {
    pub name: String,
    pub literal: String,
}

/// Raw language hints taken from the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Explicit request parameter (`?lang=de`)
    pub request_lang: Option<String>,
    /// Language remembered in the user's session
    pub session_lang: Option<String>,
    /// Raw `Accept-Language` header value
    pub accept_language: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_lang(mut self, lang: impl Into<String>) -> Self {
        self.request_lang = Some(lang.into());
        self
    }

    pub fn with_session_lang(mut self, lang: impl Into<String>) -> Self {
        self.session_lang = Some(lang.into());
        self
    }

    pub fn with_accept_language(mut self, header: impl Into<String>) -> Self {
        self.accept_language = Some(header.into());
        self
    }
}
