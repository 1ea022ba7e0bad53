// SPDX-License-Identifier: PMPL-1.0-or-later

//! langforge: language resolution and cached compilation of translation
//! files.
//!
//! A request is turned into an ordered list of candidate languages, the
//! first one with a translation file wins, and that file (INI, YAML or
//! JSON) is flattened into a table of identifier-named strings. The table
//! is persisted as a compiled artifact and only rebuilt when a source
//! file is newer than it.
//!
//! PIPELINE:
//! 1. **Resolve**: forced language, request, session, `Accept-Language`,
//!    fallback.
//! 2. **Locate**: substitute each candidate into the path template.
//! 3. **Load & merge**: parse the source, optionally underlay the fallback
//!    language.
//! 4. **Compile**: flatten sections into identifiers and escape literals.
//! 5. **Emit**: write the artifact and load it as a [`Catalog`].
//!
//! ```no_run
//! use langforge::{I18n, RequestContext};
//!
//! let mut i18n = I18n::with_defaults();
//! i18n.set_file_path("lang/{LANGUAGE}.yml")?;
//! let catalog = i18n.init(&RequestContext::new().with_accept_language("de-DE,de;q=0.9"))?;
//! println!("{}", catalog.get("greeting", &["David"]).unwrap_or_default());
//! # Ok::<(), langforge::I18nError>(())
//! ```

pub mod artifact;
pub mod cache;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod resolve;
pub mod source;
pub mod storage;
pub mod types;

pub use artifact::{ArtifactMeta, Catalog};
pub use config::Settings;
pub use error::{I18nError, Result};
pub use pipeline::{I18n, State};
pub use resolve::{is_legal_code, resolve_candidates};
pub use source::SourceFormat;
pub use storage::{FsStorage, Storage};
pub use types::{CompiledEntry, Node, RequestContext, TranslationMap};
