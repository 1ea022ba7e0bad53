// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translator settings and settings-file loading

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Source path template containing `{LANGUAGE}`
    pub file_path: String,
    /// Directory holding compiled artifacts
    pub cache_path: PathBuf,
    pub fallback_lang: String,
    /// Artifact name; must be a valid identifier
    pub prefix: String,
    pub forced_lang: Option<String>,
    /// Merge the fallback language's keys underneath the applied language
    pub merge_fallback: bool,
    pub section_separator: String,
    pub namespace: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_path: "./lang/lang_{LANGUAGE}.ini".to_string(),
            cache_path: PathBuf::from("./langcache/"),
            fallback_lang: "en".to_string(),
            prefix: "L".to_string(),
            forced_lang: None,
            merge_fallback: false,
            section_separator: "_".to_string(),
            namespace: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML or JSON file. Missing fields keep their
    /// defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json settings {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml settings {}", path.display())),
            _ => Err(anyhow!(
                "unsupported settings extension for {}",
                path.display()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn yaml_settings_override_only_given_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("langforge.yml");
        fs::write(
            &path,
            "file_path: lang/{LANGUAGE}.yml\nmerge_fallback: true\nnamespace: App\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.file_path, "lang/{LANGUAGE}.yml");
        assert!(settings.merge_fallback);
        assert_eq!(settings.namespace.as_deref(), Some("App"));
        assert_eq!(settings.fallback_lang, "en");
        assert_eq!(settings.section_separator, "_");
    }

    #[test]
    fn json_settings_are_supported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("langforge.json");
        fs::write(&path, r#"{"prefix": "T", "forced_lang": "de"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.prefix, "T");
        assert_eq!(settings.forced_lang.as_deref(), Some("de"));
    }

    #[test]
    fn unknown_fields_and_extensions_are_rejected() {
        let dir = TempDir::new().unwrap();
        let typo = dir.path().join("typo.yml");
        fs::write(&typo, "fallback: de\n").unwrap();
        assert!(Settings::load(&typo).is_err());

        let toml = dir.path().join("langforge.toml");
        fs::write(&toml, "prefix = \"L\"\n").unwrap();
        assert!(Settings::load(&toml).is_err());
    }
}
