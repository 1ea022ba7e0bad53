// SPDX-License-Identifier: PMPL-1.0-or-later

//! The translator: resolves a language, reuses or regenerates the compiled
//! artifact, and hands back the loaded [`Catalog`].
//!
//! Settings may be changed only until the first [`I18n::init`] call. That
//! call freezes the instance whether or not it succeeds.

use crate::artifact::{self, ArtifactMeta, Catalog};
use crate::cache::{self, CacheKey};
use crate::compile::{self, is_valid_identifier};
use crate::config::Settings;
use crate::error::{I18nError, Result};
use crate::merge::merge;
use crate::resolve::{is_legal_code, resolve_candidates};
use crate::source::{self, LocatedSource};
use crate::storage::{FsStorage, Storage};
use crate::types::RequestContext;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Initialized,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Resolution {
    user_langs: Vec<String>,
    applied_lang: String,
    source_path: PathBuf,
    cache_path: PathBuf,
}

#[derive(Debug)]
pub struct I18n<S: Storage = FsStorage> {
    storage: S,
    settings: Settings,
    state: State,
    resolution: Option<Resolution>,
}

impl I18n<FsStorage> {
    /// Translator over the local filesystem with default settings.
    pub fn with_defaults() -> Self {
        Self::new(FsStorage)
    }
}

impl<S: Storage> I18n<S> {
    pub fn new(storage: S) -> Self {
        Self::with_settings(storage, Settings::default())
    }

    pub fn with_settings(storage: S, settings: Settings) -> Self {
        Self {
            storage,
            settings,
            state: State::Unconfigured,
            resolution: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == State::Initialized
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn settings_mut(&mut self) -> Result<&mut Settings> {
        match self.state {
            State::Unconfigured => Ok(&mut self.settings),
            State::Initialized => Err(I18nError::AlreadyInitialized),
        }
    }

    pub fn set_file_path(&mut self, template: impl Into<String>) -> Result<()> {
        self.settings_mut()?.file_path = template.into();
        Ok(())
    }

    pub fn set_cache_path(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        self.settings_mut()?.cache_path = dir.into();
        Ok(())
    }

    /// The fallback is substituted into the path template unfiltered, so it
    /// must be a legal language code.
    pub fn set_fallback_lang(&mut self, lang: impl Into<String>) -> Result<()> {
        let settings = self.settings_mut()?;
        let lang = lang.into();
        check_fallback(&lang)?;
        settings.fallback_lang = lang;
        Ok(())
    }

    /// The prefix names the artifact, so it must be a valid identifier.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> Result<()> {
        let settings = self.settings_mut()?;
        let prefix = prefix.into();
        if !is_valid_identifier(&prefix) {
            return Err(I18nError::InvalidIdentifier { key: prefix });
        }
        settings.prefix = prefix;
        Ok(())
    }

    pub fn set_forced_lang(&mut self, lang: Option<String>) -> Result<()> {
        self.settings_mut()?.forced_lang = lang;
        Ok(())
    }

    pub fn set_merge_fallback(&mut self, merge_fallback: bool) -> Result<()> {
        self.settings_mut()?.merge_fallback = merge_fallback;
        Ok(())
    }

    pub fn set_section_separator(&mut self, separator: impl Into<String>) -> Result<()> {
        self.settings_mut()?.section_separator = separator.into();
        Ok(())
    }

    pub fn set_namespace(&mut self, namespace: Option<String>) -> Result<()> {
        self.settings_mut()?.namespace = namespace;
        Ok(())
    }

    /// Candidate languages tried for the last `init`, highest priority first.
    pub fn user_langs(&self) -> Option<&[String]> {
        self.resolution.as_ref().map(|r| r.user_langs.as_slice())
    }

    pub fn applied_lang(&self) -> Option<&str> {
        self.resolution.as_ref().map(|r| r.applied_lang.as_str())
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.resolution.as_ref().map(|r| r.source_path.as_path())
    }

    pub fn cache_file_path(&self) -> Option<&Path> {
        self.resolution.as_ref().map(|r| r.cache_path.as_path())
    }

    /// Source file of the fallback language.
    pub fn fallback_path(&self) -> PathBuf {
        source::source_path(&self.settings.file_path, &self.settings.fallback_lang)
    }

    /// Candidate list for `request` under the current settings.
    pub fn candidates(&self, request: &RequestContext) -> Vec<String> {
        resolve_candidates(
            self.settings.forced_lang.as_deref(),
            request.request_lang.as_deref(),
            request.session_lang.as_deref(),
            request.accept_language.as_deref(),
            &self.settings.fallback_lang,
        )
    }

    /// Resolve the language for `request` and load its compiled catalog,
    /// regenerating the cached artifact when a source is newer.
    pub fn init(&mut self, request: &RequestContext) -> Result<Catalog> {
        if self.state == State::Initialized {
            return Err(I18nError::AlreadyInitialized);
        }
        self.state = State::Initialized;

        // Settings handed to `with_settings` never went through the setters.
        check_fallback(&self.settings.fallback_lang)?;
        if !is_valid_identifier(&self.settings.prefix) {
            return Err(I18nError::InvalidIdentifier {
                key: self.settings.prefix.clone(),
            });
        }

        let user_langs = self.candidates(request);
        let LocatedSource { applied_lang, path } =
            source::locate(&self.storage, &user_langs, &self.settings.file_path)?;
        let cache_path = CacheKey::new(&path, &self.settings, &applied_lang)
            .artifact_path(&self.settings.cache_path);

        self.resolution = Some(Resolution {
            user_langs,
            applied_lang: applied_lang.clone(),
            source_path: path.clone(),
            cache_path: cache_path.clone(),
        });

        let fallback_path = self.fallback_path();
        let fallback = (self.settings.merge_fallback && fallback_path != path)
            .then_some(fallback_path.as_path());
        let meta = ArtifactMeta {
            compiler: cache::compiler_tag(),
            prefix: self.settings.prefix.clone(),
            language: applied_lang,
            namespace: self.settings.namespace.clone(),
        };

        if !cache::is_stale(&self.storage, &cache_path, &path, fallback)? {
            match Catalog::load(&self.storage, &cache_path) {
                Ok(catalog) if catalog.meta() == &meta => {
                    debug!(cache = %cache_path.display(), "using cached artifact");
                    return Ok(catalog);
                }
                Ok(_) => warn!(
                    cache = %cache_path.display(),
                    "cached artifact was built with different settings; regenerating"
                ),
                Err(err) => warn!(
                    cache = %cache_path.display(),
                    error = %err,
                    "cached artifact unreadable; regenerating"
                ),
            }
        }

        self.regenerate(&path, fallback, &cache_path, &meta)
    }

    fn regenerate(
        &self,
        source_path: &Path,
        fallback: Option<&Path>,
        cache_path: &Path,
        meta: &ArtifactMeta,
    ) -> Result<Catalog> {
        let mut data = source::load(&self.storage, source_path)?;
        if let Some(fallback_path) = fallback {
            let base = source::load(&self.storage, fallback_path)?;
            data = merge(&data, &base);
        }
        let entries = compile::compile(&data, &self.settings.section_separator)?;
        let bytes = artifact::emit(&entries, meta);

        let cache_dir = &self.settings.cache_path;
        self.storage
            .create_dir_all(cache_dir)
            .map_err(|source| I18nError::CacheDirUnavailable {
                path: cache_dir.clone(),
                source,
            })?;
        self.storage
            .write(cache_path, &bytes)
            .map_err(|source| I18nError::CacheWriteFailed {
                path: cache_path.to_path_buf(),
                source,
            })?;
        info!(
            source = %source_path.display(),
            cache = %cache_path.display(),
            entries = entries.len(),
            "compiled translation artifact"
        );

        let text = String::from_utf8_lossy(&bytes);
        Catalog::parse(&text).map_err(|reason| I18nError::CorruptArtifact {
            path: cache_path.to_path_buf(),
            reason,
        })
    }
}

fn check_fallback(code: &str) -> Result<()> {
    if code.is_empty() || !is_legal_code(code) {
        return Err(I18nError::IllegalFallback {
            code: code.to_string(),
        });
    }
    Ok(())
}
