use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use uuid::Uuid;

use crate::{
    config::ConversionConfig,
    error::{NoteResult, StoreError, StoreResult},
    managers::{BacklinkIndex, ReferenceResolver},
    models::{LinkTarget, Reference},
    parser::DocumentParser,
    repo::{AttachmentStore, DocumentStore},
};

#[derive(Debug, Default)]
struct VaultState {
    references: HashMap<Uuid, Vec<Reference>>,
    backlinks: BacklinkIndex,
}

/// Save pipeline for derived references.
///
/// The host persists note text itself; on every save the vault re-derives
/// the note's references from scratch, replaces the previous set, keeps the
/// backlink index current and reports attachments to the attachment store.
/// Attachment sizes are asked of the attachment store; the vault does no
/// file I/O.
#[derive(uniffi::Object)]
pub struct Vault {
    documents: Arc<dyn DocumentStore>,
    attachments: Arc<dyn AttachmentStore>,
    parser: DocumentParser,
    state: RwLock<VaultState>,
}

impl Vault {
    fn with_parser(
        documents: Arc<dyn DocumentStore>,
        attachments: Arc<dyn AttachmentStore>,
        parser: DocumentParser,
    ) -> Self {
        Self {
            documents,
            attachments,
            parser,
            state: RwLock::new(VaultState::default()),
        }
    }

    /// Save with an already parsed id
    ///
    /// # Errors
    ///
    /// Returns an error if the vault state lock is poisoned
    pub fn save_parsed(&self, document_id: Uuid, text: &str) -> StoreResult<Vec<Reference>> {
        let resolved = ReferenceResolver::new(self.parser.syntax()).resolve(
            document_id,
            text,
            self.documents.as_ref(),
        );
        let attachments = resolved.attachments.clone();
        let references = resolved.into_references(document_id);

        {
            let mut state = self.state.write()?;
            state.backlinks.replace(document_id, &references);
            state.references.insert(document_id, references.clone());
        }

        let owner = document_id.hyphenated().to_string();
        for attachment in attachments {
            let size_bytes = self.attachments.size_of(attachment.path.clone());
            self.attachments
                .record_attachment(owner.clone(), attachment.path, attachment.kind, size_bytes);
        }

        log::debug!("saved {} references for {document_id}", references.len());
        Ok(references)
    }

    /// Backlinks keyed by any link target
    ///
    /// # Errors
    ///
    /// Returns an error if the vault state lock is poisoned
    pub fn backlinks_for_target(&self, target: &LinkTarget) -> StoreResult<Vec<Uuid>> {
        Ok(self.state.read()?.backlinks.backlinks_for(target))
    }
}

#[uniffi::export]
impl Vault {
    /// Create a vault using the default markup syntax
    #[uniffi::constructor]
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self::with_parser(documents, attachments, DocumentParser::new())
    }

    /// Create a vault for a custom markup configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    #[uniffi::constructor]
    pub fn with_config(
        documents: Arc<dyn DocumentStore>,
        attachments: Arc<dyn AttachmentStore>,
        config: ConversionConfig,
    ) -> NoteResult<Arc<Self>> {
        let parser = DocumentParser::with_config(config)?;
        Ok(Arc::new(Self::with_parser(documents, attachments, parser)))
    }

    /// Re-derive and store the references of a note that was just saved
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the vault state is poisoned
    pub fn save(&self, document_id: &str, text: &str) -> NoteResult<Vec<Reference>> {
        Ok(self.save_parsed(parse_id(document_id)?, text)?)
    }

    /// References recorded at the last save of a note
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the vault state is poisoned
    pub fn references_for(&self, document_id: &str) -> NoteResult<Vec<Reference>> {
        let id = parse_id(document_id)?;
        let state = self.state.read().map_err(StoreError::from)?;
        Ok(state.references.get(&id).cloned().unwrap_or_default())
    }

    /// Notes linking to the given note
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the vault state is poisoned
    pub fn backlinks_for(&self, document_id: &str) -> NoteResult<Vec<String>> {
        let id = parse_id(document_id)?;
        let sources = self.backlinks_for_target(&LinkTarget::Note(id))?;
        Ok(sources.iter().map(ToString::to_string).collect())
    }

    /// Notes embedding the given attachment path
    ///
    /// # Errors
    ///
    /// Returns an error if the vault state is poisoned
    pub fn backlinks_for_attachment(&self, path: &str) -> NoteResult<Vec<String>> {
        let sources = self.backlinks_for_target(&LinkTarget::Attachment(path.to_string()))?;
        Ok(sources.iter().map(ToString::to_string).collect())
    }

    /// Drop everything derived from a deleted note
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a UUID or the vault state is poisoned
    pub fn forget(&self, document_id: &str) -> NoteResult<()> {
        let id = parse_id(document_id)?;
        let mut state = self.state.write().map_err(StoreError::from)?;
        state.references.remove(&id);
        state.backlinks.remove(id);
        Ok(())
    }
}

fn parse_id(id: &str) -> StoreResult<Uuid> {
    Uuid::try_parse(id).map_err(|_| StoreError::invalid_id(id))
}
