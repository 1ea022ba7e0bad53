// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locating and loading translation source files

mod format;
mod ini;

pub use format::SourceFormat;

use crate::error::{I18nError, Result};
use crate::storage::Storage;
use crate::types::TranslationMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Placeholder replaced by a language code in the file path template.
pub const LANGUAGE_PLACEHOLDER: &str = "{LANGUAGE}";

/// The source file chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSource {
    pub applied_lang: String,
    pub path: PathBuf,
}

pub fn source_path(template: &str, lang: &str) -> PathBuf {
    PathBuf::from(template.replace(LANGUAGE_PLACEHOLDER, lang))
}

/// Probe candidates in priority order and return the first existing file.
pub fn locate<S: Storage>(
    storage: &S,
    candidates: &[String],
    template: &str,
) -> Result<LocatedSource> {
    for lang in candidates {
        let path = source_path(template, lang);
        let found = storage.exists(&path);
        debug!(lang = %lang, path = %path.display(), found, "probing language file");
        if found {
            return Ok(LocatedSource {
                applied_lang: lang.clone(),
                path,
            });
        }
    }
    Err(I18nError::NoLanguageFileFound {
        candidates: candidates.to_vec(),
        template: template.to_string(),
    })
}

/// Read and parse a translation source, dispatching on its extension.
pub fn load<S: Storage>(storage: &S, path: &Path) -> Result<TranslationMap> {
    let format = SourceFormat::from_path(path)?;
    let bytes = storage
        .read(path)
        .map_err(|source| I18nError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    format.parse(&bytes).map_err(|reason| I18nError::MalformedSource {
        path: path.to_path_buf(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsStorage;
    use crate::types::Node;
    use std::fs;
    use tempfile::TempDir;

    fn template(dir: &TempDir) -> String {
        format!("{}/lang_{{LANGUAGE}}.yml", dir.path().display())
    }

    #[test]
    fn first_existing_candidate_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lang_de.yml"), "save: Speichern").unwrap();
        fs::write(dir.path().join("lang_en.yml"), "save: Save").unwrap();

        let candidates = vec!["fr".to_string(), "de".to_string(), "en".to_string()];
        let located = locate(&FsStorage, &candidates, &template(&dir)).unwrap();
        assert_eq!(located.applied_lang, "de");
        assert_eq!(located.path, dir.path().join("lang_de.yml"));
    }

    #[test]
    fn exhausting_candidates_is_fatal() {
        let dir = TempDir::new().unwrap();
        let candidates = vec!["fr".to_string(), "en".to_string()];
        let err = locate(&FsStorage, &candidates, &template(&dir)).unwrap_err();
        match err {
            I18nError::NoLanguageFileFound { candidates, .. } => {
                assert_eq!(candidates, vec!["fr", "en"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_dispatches_on_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("en.json");
        fs::write(&path, r#"{"menu": {"open": "Open"}}"#).unwrap();

        let map = load(&FsStorage, &path).unwrap();
        let menu = map["menu"].as_section().unwrap();
        assert_eq!(menu["open"], Node::leaf("Open"));
    }

    #[test]
    fn unsupported_extension_is_rejected_before_reading() {
        let err = load(&FsStorage, Path::new("/nonexistent/en.xml")).unwrap_err();
        assert!(matches!(err, I18nError::UnsupportedFormat { ref extension, .. } if extension == "xml"));
    }

    #[test]
    fn parse_failure_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("en.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = load(&FsStorage, &path).unwrap_err();
        assert!(matches!(err, I18nError::MalformedSource { path: ref p, .. } if p == &path));
    }
}
