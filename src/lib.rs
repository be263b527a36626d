#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

uniffi::setup_scaffolding!();

pub mod config;
pub mod error;
pub mod ffi;
pub mod formats;
pub mod managers;
pub mod models;
pub mod parser;
pub mod repo;
pub mod vault;

// Re-export common entry points for convenience
pub use config::{ConversionConfig, MarkupSyntax};
pub use error::{ConfigError, ConfigResult, NoteError, NoteResult, StoreError, StoreResult};
pub use formats::{reduce_html, render_html};
pub use managers::{ResolvedReferences, resolve_references};
pub use models::{AttachmentKind, ContentElement, ParsedElement, Reference, TextSpan};
pub use parser::{DocumentParser, parse, parse_elements};
pub use repo::{AttachmentStore, DocumentStore};
pub use vault::Vault;
