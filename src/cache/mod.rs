// SPDX-License-Identifier: PMPL-1.0-or-later

//! Cache identity and staleness decisions for compiled artifacts.
//!
//! An artifact's file name is derived from a hash of the absolute source
//! path, the compiler tag and every setting that changes the compiled
//! output (namespace, section separator, fallback merging), followed by the
//! prefix and applied language. Changing any of them yields a different
//! artifact instead of reusing a mismatched one.

use crate::config::Settings;
use crate::error::{I18nError, Result};
use crate::storage::Storage;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bumped whenever the artifact layout changes.
pub const ARTIFACT_SCHEMA: u32 = 1;

/// Tag recorded in every artifact and mixed into the cache key.
pub fn compiler_tag() -> String {
    format!(
        "langforge-artifact/{}+{}",
        ARTIFACT_SCHEMA,
        env!("CARGO_PKG_VERSION")
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub digest: String,
    pub prefix: String,
    pub language: String,
}

impl CacheKey {
    /// Key for `source` compiled under `settings` for `language`.
    pub fn new(source: &Path, settings: &Settings, language: &str) -> Self {
        let absolute = std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf());
        let absolute = absolute.to_string_lossy();
        let tag = compiler_tag();
        let merge = if settings.merge_fallback { "merge" } else { "plain" };
        let parts: [&str; 5] = [
            &absolute,
            &tag,
            settings.namespace.as_deref().unwrap_or_default(),
            &settings.section_separator,
            merge,
        ];
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();
        Self {
            digest: hex::encode(&digest[..16]),
            prefix: settings.prefix.clone(),
            language: language.to_string(),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "langforge_{}_{}_{}.cache",
            self.digest, self.prefix, self.language
        )
    }

    pub fn artifact_path(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(self.file_name())
    }
}

/// Decide whether the artifact at `cache` must be regenerated.
///
/// Stale when the artifact is missing, or strictly older than the source,
/// or (when given) strictly older than the fallback source. Equal
/// timestamps count as fresh.
pub fn is_stale<S: Storage>(
    storage: &S,
    cache: &Path,
    source: &Path,
    fallback: Option<&Path>,
) -> Result<bool> {
    if !storage.exists(cache) {
        debug!(cache = %cache.display(), "cache artifact missing");
        return Ok(true);
    }
    let cached_at = storage
        .last_modified(cache)
        .map_err(|source| I18nError::CacheUnreadable {
            path: cache.to_path_buf(),
            source,
        })?;

    let mut inputs = vec![source];
    inputs.extend(fallback);
    for input in inputs {
        let modified = storage
            .last_modified(input)
            .map_err(|err| I18nError::SourceUnreadable {
                path: input.to_path_buf(),
                source: err,
            })?;
        if cached_at < modified {
            debug!(cache = %cache.display(), newer = %input.display(), "cache artifact is stale");
            return Ok(true);
        }
    }
    Ok(false)
}
