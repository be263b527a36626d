use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    config::MarkupSyntax,
    models::{AttachmentPath, ContentElement, Reference},
    parser::parse_with,
    repo::{DocumentStore, note_exists},
};

/// References extracted from one note's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedReferences {
    /// Linked notes that exist, in first-appearance order
    pub note_targets: Vec<Uuid>,
    /// Screenshot and recording paths, in first-appearance order
    pub attachments: Vec<AttachmentPath>,
}

impl ResolvedReferences {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.note_targets.is_empty() && self.attachments.is_empty()
    }

    /// Rows to persist for `source_id`
    #[must_use]
    pub fn into_references(self, source_id: Uuid) -> Vec<Reference> {
        let source = source_id.hyphenated().to_string();
        let notes = self.note_targets.into_iter().map(|target| Reference::Note {
            source_id: source.clone(),
            target_id: target.hyphenated().to_string(),
        });
        let attachments = self
            .attachments
            .into_iter()
            .map(|attachment| Reference::Attachment {
                document_id: source.clone(),
                file_path: attachment.path,
                kind: attachment.kind,
            });
        notes.chain(attachments).collect()
    }
}

/// Resolves note links and attachment paths against a document store
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    syntax: &'a MarkupSyntax,
}

impl Default for ReferenceResolver<'static> {
    fn default() -> Self {
        Self::new(MarkupSyntax::shared())
    }
}

impl<'a> ReferenceResolver<'a> {
    #[must_use]
    pub const fn new(syntax: &'a MarkupSyntax) -> Self {
        Self { syntax }
    }

    /// Extract the references of `document_id`'s text.
    ///
    /// Self links and links to notes the store does not know are dropped;
    /// each distinct target is checked once.
    #[must_use]
    pub fn resolve(
        &self,
        document_id: Uuid,
        text: &str,
        store: &dyn DocumentStore,
    ) -> ResolvedReferences {
        let mut resolved = ResolvedReferences::default();
        let mut seen_targets = HashSet::new();
        let mut seen_attachments = HashSet::new();

        for parsed in parse_with(self.syntax, text) {
            match &parsed.element {
                ContentElement::NoteLink { .. } => {
                    let Some(target) = parsed.element.target_uuid() else {
                        continue;
                    };
                    if target == document_id || !seen_targets.insert(target) {
                        continue;
                    }
                    if note_exists(store, target) {
                        resolved.note_targets.push(target);
                    } else {
                        log::debug!("dropping link from {document_id} to missing note {target}");
                    }
                }
                ContentElement::Image { path } | ContentElement::Video { path } => {
                    let Some(kind) = parsed.element.attachment_kind() else {
                        continue;
                    };
                    let attachment = AttachmentPath {
                        path: path.clone(),
                        kind,
                    };
                    if seen_attachments.insert(attachment.clone()) {
                        resolved.attachments.push(attachment);
                    }
                }
                ContentElement::Text { .. } => {}
            }
        }

        resolved
    }
}

/// Resolve with the default syntax
#[must_use]
pub fn resolve_references(
    document_id: Uuid,
    text: &str,
    store: &dyn DocumentStore,
) -> ResolvedReferences {
    ReferenceResolver::default().resolve(document_id, text, store)
}
