// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error taxonomy for the resolution/compile/cache pipeline.
//!
//! Every variant aborts the current `init` call. Nothing is retried
//! internally; each variant carries the path, key or language needed to
//! diagnose the failure.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("translator already initialized; settings are frozen")]
    AlreadyInitialized,

    #[error("no language file found for candidates [{}] using template {template}", .candidates.join(", "))]
    NoLanguageFileFound {
        candidates: Vec<String>,
        template: String,
    },

    #[error("unsupported translation format {extension:?} for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("malformed translation source {}: {reason}", .path.display())]
    MalformedSource { path: PathBuf, reason: String },

    #[error("fallback language {code:?} is not a legal language code")]
    IllegalFallback { code: String },

    #[error("{key:?} is not a valid identifier")]
    InvalidIdentifier { key: String },

    #[error("section nesting under {key:?} exceeds {limit} levels")]
    NestingTooDeep { key: String, limit: usize },

    #[error("reading translation source {}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading cache artifact {}", .path.display())]
    CacheUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cache artifact {} is corrupt: {reason}", .path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    #[error("creating cache directory {}", .path.display())]
    CacheDirUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("writing cache artifact {}", .path.display())]
    CacheWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = I18nError> = std::result::Result<T, E>;
