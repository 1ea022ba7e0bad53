// SPDX-License-Identifier: PMPL-1.0-or-later

//! Self-diagnostics for a translator configuration

use crate::compile::is_valid_identifier;
use crate::config::Settings;
use crate::resolve::is_legal_code;
use crate::source::{self, SourceFormat, LANGUAGE_PLACEHOLDER};
use anyhow::{anyhow, Result};
use colored::*;
use std::fmt;
use std::path::Path;

pub fn run_self_diagnostics(settings: &Settings) -> Result<()> {
    println!("langforge self-diagnostics");
    println!();

    let report = collect(settings);
    print!("{report}");

    if report.has_failures() {
        Err(anyhow!("self-diagnostics reported issues"))
    } else {
        Ok(())
    }
}

fn collect(settings: &Settings) -> Report {
    let fallback = source::source_path(&settings.file_path, &settings.fallback_lang);

    let mut report = Report::default();
    report.record(
        "version",
        (Status::Pass, format!("langforge {}", env!("CARGO_PKG_VERSION"))),
    );
    report.record("path template", check_template(&settings.file_path));
    report.record("source format", check_format(&settings.file_path));
    report.record("fallback language", check_fallback_code(&settings.fallback_lang));
    report.record("prefix", check_prefix(&settings.prefix));
    report.record("fallback source", check_file(&fallback));
    report.record("cache directory", check_cache_dir(&settings.cache_path));
    report
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Pass,
    /// Not fatal; `doctor` still succeeds.
    Advisory,
    Fail,
}

type Outcome = (Status, String);

#[derive(Default)]
struct Report {
    lines: Vec<(&'static str, Status, String)>,
}

impl Report {
    fn record(&mut self, label: &'static str, (status, detail): Outcome) {
        self.lines.push((label, status, detail));
    }

    fn has_failures(&self) -> bool {
        self.lines.iter().any(|(_, status, _)| *status == Status::Fail)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, status, detail) in &self.lines {
            let tag = match status {
                Status::Pass => "OK".green(),
                Status::Advisory => "WARN".yellow(),
                Status::Fail => "ERR".red().bold(),
            };
            writeln!(f, "  [{}] {:18} {}", tag, label, detail)?;
        }
        Ok(())
    }
}

fn check_template(template: &str) -> Outcome {
    if template.contains(LANGUAGE_PLACEHOLDER) {
        (Status::Pass, template.to_string())
    } else {
        (
            Status::Fail,
            format!("{} has no {} placeholder", template, LANGUAGE_PLACEHOLDER),
        )
    }
}

fn check_format(template: &str) -> Outcome {
    match SourceFormat::from_path(Path::new(template)) {
        Ok(format) => (Status::Pass, format.name().to_string()),
        Err(err) => (Status::Fail, err.to_string()),
    }
}

fn check_fallback_code(code: &str) -> Outcome {
    if code.is_empty() {
        (Status::Fail, "empty".to_string())
    } else if is_legal_code(code) {
        (Status::Pass, code.to_string())
    } else {
        (
            Status::Fail,
            format!("{:?} contains characters outside [A-Za-z0-9_-]", code),
        )
    }
}

fn check_prefix(prefix: &str) -> Outcome {
    if is_valid_identifier(prefix) {
        (Status::Pass, prefix.to_string())
    } else {
        (Status::Fail, format!("{:?} is not a valid identifier", prefix))
    }
}

fn check_file(path: &Path) -> Outcome {
    let shown = path.display();
    if path.is_file() {
        (Status::Pass, format!("{} exists", shown))
    } else if path.exists() {
        (Status::Fail, format!("{} exists but is not a regular file", shown))
    } else {
        (Status::Fail, format!("{} missing", shown))
    }
}

fn check_cache_dir(path: &Path) -> Outcome {
    let shown = path.display();
    if path.is_dir() {
        return (Status::Pass, format!("{} exists", shown));
    }
    if path.exists() {
        return (Status::Fail, format!("{} exists but is not a directory", shown));
    }
    match path.ancestors().skip(1).find(|ancestor| ancestor.exists()) {
        Some(ancestor) if !ancestor.is_dir() => (
            Status::Fail,
            format!(
                "{} cannot be created: {} is not a directory",
                shown,
                ancestor.display()
            ),
        ),
        _ => (
            Status::Advisory,
            format!("{} missing (created on first compile)", shown),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn status_of(settings: &Settings, label: &str) -> Status {
        collect(settings)
            .lines
            .into_iter()
            .find(|(name, _, _)| *name == label)
            .map(|(_, status, _)| status)
            .unwrap()
    }

    #[test]
    fn healthy_setup_has_no_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.yml"), "greeting: Hello\n").unwrap();
        fs::create_dir(dir.path().join("cache")).unwrap();
        let settings = Settings {
            file_path: format!("{}/{{LANGUAGE}}.yml", dir.path().display()),
            cache_path: dir.path().join("cache"),
            ..Settings::default()
        };

        assert!(collect(&settings)
            .lines
            .iter()
            .all(|(_, status, _)| *status == Status::Pass));
        assert!(run_self_diagnostics(&settings).is_ok());
    }

    #[test]
    fn missing_placeholder_and_bad_extension_are_errors() {
        let settings = Settings {
            file_path: "lang/strings.txt".to_string(),
            ..Settings::default()
        };
        assert_eq!(status_of(&settings, "path template"), Status::Fail);
        assert_eq!(status_of(&settings, "source format"), Status::Fail);
        assert!(run_self_diagnostics(&settings).is_err());
    }

    #[test]
    fn illegal_fallback_and_prefix_are_errors() {
        let settings = Settings {
            fallback_lang: "../en".to_string(),
            prefix: "9lives".to_string(),
            ..Settings::default()
        };
        assert_eq!(status_of(&settings, "fallback language"), Status::Fail);
        assert_eq!(status_of(&settings, "prefix"), Status::Fail);
    }

    #[test]
    fn cache_directory_states() {
        let dir = TempDir::new().unwrap();
        let missing = Settings {
            cache_path: dir.path().join("not-yet"),
            ..Settings::default()
        };
        assert_eq!(status_of(&missing, "cache directory"), Status::Advisory);

        let file = dir.path().join("occupied");
        fs::write(&file, "").unwrap();
        let occupied = Settings {
            cache_path: file.clone(),
            ..Settings::default()
        };
        assert_eq!(status_of(&occupied, "cache directory"), Status::Fail);

        let below_file = Settings {
            cache_path: file.join("cache"),
            ..Settings::default()
        };
        assert_eq!(status_of(&below_file, "cache directory"), Status::Fail);
    }

    #[test]
    fn report_renders_one_tagged_line_per_check() {
        colored::control::set_override(false);
        let settings = Settings {
            prefix: "9lives".to_string(),
            ..Settings::default()
        };
        let text = collect(&settings).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("  [OK] version "));
        let prefix = lines
            .iter()
            .find(|line| line.contains("] prefix "))
            .unwrap();
        assert!(prefix.starts_with("  [ERR] prefix "));
        assert!(prefix.ends_with("\"9lives\" is not a valid identifier"));
    }
}
