// SPDX-License-Identifier: PMPL-1.0-or-later

//! langforge: resolve the request language and compile translation files
//! into cached artifacts.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use langforge::diagnostics;
use langforge::{Catalog, FsStorage, I18n, RequestContext, Settings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "langforge")]
#[command(version)]
#[command(about = "Language resolution and cached compilation of translation files")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log cache decisions and probes
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the candidate languages in priority order
    Candidates {
        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Resolve the language and compile (or reuse) its artifact
    Compile {
        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Print one translated string
    Get {
        /// Compiled entry name, e.g. `menu_save`
        #[arg(value_name = "KEY")]
        key: String,

        /// Values for %1, %2, ...
        #[arg(value_name = "ARGS")]
        args: Vec<String>,

        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Show the metadata and entries of a compiled artifact
    Inspect {
        #[arg(value_name = "ARTIFACT")]
        artifact: PathBuf,
    },

    /// Check the configuration for problems
    Doctor {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(Args)]
struct SettingsArgs {
    /// Settings file (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source path template containing {LANGUAGE}
    #[arg(long)]
    file_path: Option<String>,

    /// Directory for compiled artifacts
    #[arg(long)]
    cache_path: Option<PathBuf>,

    /// Fallback language code
    #[arg(long)]
    fallback: Option<String>,

    /// Artifact prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Language that overrides every request hint
    #[arg(long)]
    forced: Option<String>,

    /// Fill missing keys from the fallback language
    #[arg(long)]
    merge_fallback: bool,

    /// Separator between section and key names
    #[arg(long)]
    separator: Option<String>,

    /// Namespace recorded in the artifact
    #[arg(long)]
    namespace: Option<String>,
}

#[derive(Args)]
struct RequestArgs {
    /// Language requested explicitly (e.g. a query parameter)
    #[arg(long)]
    lang: Option<String>,

    /// Language stored in the session
    #[arg(long)]
    session_lang: Option<String>,

    /// Raw Accept-Language header
    #[arg(long)]
    accept_language: Option<String>,
}

impl SettingsArgs {
    fn resolve(self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(file_path) = self.file_path {
            settings.file_path = file_path;
        }
        if let Some(cache_path) = self.cache_path {
            settings.cache_path = cache_path;
        }
        if let Some(fallback) = self.fallback {
            settings.fallback_lang = fallback;
        }
        if let Some(prefix) = self.prefix {
            settings.prefix = prefix;
        }
        if self.forced.is_some() {
            settings.forced_lang = self.forced;
        }
        if self.merge_fallback {
            settings.merge_fallback = true;
        }
        if let Some(separator) = self.separator {
            settings.section_separator = separator;
        }
        if self.namespace.is_some() {
            settings.namespace = self.namespace;
        }
        Ok(settings)
    }
}

impl From<RequestArgs> for RequestContext {
    fn from(args: RequestArgs) -> Self {
        Self {
            request_lang: args.lang,
            session_lang: args.session_lang,
            accept_language: args.accept_language,
        }
    }
}

/// Build a translator through the setters so the prefix is validated.
fn translator(settings: Settings) -> Result<I18n> {
    let mut i18n = I18n::new(FsStorage);
    i18n.set_file_path(settings.file_path)?;
    i18n.set_cache_path(settings.cache_path)?;
    i18n.set_fallback_lang(settings.fallback_lang)?;
    i18n.set_prefix(settings.prefix)?;
    i18n.set_forced_lang(settings.forced_lang)?;
    i18n.set_merge_fallback(settings.merge_fallback)?;
    i18n.set_section_separator(settings.section_separator)?;
    i18n.set_namespace(settings.namespace)?;
    Ok(i18n)
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "langforge=debug"
    } else {
        "langforge=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Candidates { settings, request } => {
            let i18n = translator(settings.resolve()?)?;
            for (rank, lang) in i18n.candidates(&request.into()).iter().enumerate() {
                println!("{:>2}. {}", rank + 1, lang);
            }
        }

        Commands::Compile { settings, request } => {
            let mut i18n = translator(settings.resolve()?)?;
            let catalog = i18n
                .init(&request.into())
                .context("compiling translations")?;

            println!("{}", "Compiled translations".bold().green());
            println!("  Candidates: {}", i18n.user_langs().unwrap_or_default().join(", "));
            println!("  Language:   {}", catalog.language().bold());
            if let Some(source) = i18n.source_path() {
                println!("  Source:     {}", source.display());
            }
            if let Some(cache) = i18n.cache_file_path() {
                println!("  Artifact:   {}", cache.display());
            }
            println!("  Entries:    {}", catalog.len());
        }

        Commands::Get {
            key,
            args,
            settings,
            request,
        } => {
            let mut i18n = translator(settings.resolve()?)?;
            let catalog = i18n
                .init(&request.into())
                .context("compiling translations")?;
            let args: Vec<&str> = args.iter().map(String::as_str).collect();

            match catalog.get(&key, &args) {
                Some(value) => println!("{}", value),
                None => {
                    eprintln!(
                        "{} no entry named {} in language {}",
                        "error:".red().bold(),
                        key.bold(),
                        catalog.language()
                    );
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Inspect { artifact } => {
            let catalog = Catalog::load(&FsStorage, &artifact)
                .with_context(|| format!("loading artifact {}", artifact.display()))?;
            print_catalog(&artifact, &catalog)?;
        }

        Commands::Doctor { settings } => {
            diagnostics::run_self_diagnostics(&settings.resolve()?)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("reading mtime of {}", path.display()))?;
    let modified: chrono::DateTime<chrono::Local> = modified.into();
    let meta = catalog.meta();

    println!("{}", path.display().to_string().bold().cyan());
    println!("  Compiler:  {}", meta.compiler);
    println!("  Prefix:    {}", meta.prefix);
    println!("  Language:  {}", meta.language);
    if let Some(namespace) = &meta.namespace {
        println!("  Namespace: {}", namespace);
    }
    println!("  Modified:  {}", modified.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("  Entries:   {}", catalog.len());
    println!();

    if catalog.is_empty() {
        println!("  {}", "(no entries)".dimmed());
        return Ok(());
    }
    let width = catalog.entries().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in catalog.entries() {
        let name = format!("{:width$}", name);
        println!("  {}  {}", name.yellow(), value.escape_debug());
    }
    Ok(())
}
