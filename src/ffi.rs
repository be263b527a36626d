//! `UniFFI` bindings for the markup core
//!
//! The host application (a Swift menu-bar app) talks to the core through
//! plain strings and the records in [`crate::models`]. Note ids cross the
//! boundary as strings and are validated here.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::{ConversionConfig, MarkupSyntax},
    error::{NoteResult, StoreError},
    formats::{HtmlReducer, HtmlRenderer},
    managers::ReferenceResolver,
    models::{ContentElement, ParsedElement, Reference},
    parser::DocumentParser,
    repo::DocumentStore,
};

/// Parser, renderer, reducer and resolver sharing one markup configuration
#[derive(Debug, uniffi::Object)]
pub struct NoteConverter {
    parser: DocumentParser,
}

impl NoteConverter {
    fn syntax(&self) -> &MarkupSyntax {
        self.parser.syntax()
    }
}

#[uniffi::export]
impl NoteConverter {
    /// Create a converter for the default markup configuration
    #[uniffi::constructor]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: DocumentParser::new(),
        }
    }

    /// Create a converter for a custom markup configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    #[uniffi::constructor]
    pub fn with_config(config: ConversionConfig) -> NoteResult<Arc<Self>> {
        Ok(Arc::new(Self {
            parser: DocumentParser::with_config(config)?,
        }))
    }

    /// Configuration this converter was built with
    pub fn config(&self) -> ConversionConfig {
        self.syntax().config.clone()
    }

    /// Split canonical text into elements with source spans
    pub fn parse(&self, text: &str) -> Vec<ParsedElement> {
        self.parser.parse(text)
    }

    /// Split canonical text into elements
    pub fn elements(&self, text: &str) -> Vec<ContentElement> {
        self.parser.elements(text)
    }

    /// Render canonical text as editor HTML
    pub fn render_html(&self, markdown: &str) -> String {
        HtmlRenderer::new(self.syntax()).render(markdown)
    }

    /// Reduce editor HTML to canonical text
    pub fn reduce_html(&self, html: &str) -> String {
        HtmlReducer::new(self.syntax()).reduce(html)
    }

    /// References of a note's text, ready to persist
    ///
    /// # Errors
    ///
    /// Returns an error if `document_id` is not a UUID
    pub fn resolve_references(
        &self,
        document_id: &str,
        text: &str,
        store: Arc<dyn DocumentStore>,
    ) -> NoteResult<Vec<Reference>> {
        let id = Uuid::try_parse(document_id).map_err(|_| StoreError::invalid_id(document_id))?;
        let resolved = ReferenceResolver::new(self.syntax()).resolve(id, text, store.as_ref());
        Ok(resolved.into_references(id))
    }
}

impl Default for NoteConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split canonical text into elements using the default configuration
#[uniffi::export]
#[must_use]
pub fn parse_note_text(text: &str) -> Vec<ContentElement> {
    crate::parser::parse_elements(text)
}

/// Render canonical text as editor HTML using the default configuration
#[uniffi::export]
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    crate::formats::render_html(markdown)
}

/// Reduce editor HTML to canonical text using the default configuration
#[uniffi::export]
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    crate::formats::reduce_html(html)
}
