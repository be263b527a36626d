use uuid::Uuid;

use crate::models::AttachmentKind;

pub mod memory;

/// Read access to stored notes, implemented by the host application.
///
/// Identifiers are passed in lowercase hyphenated UUID form. Implementations
/// must tolerate many calls per save and concurrent readers.
#[uniffi::export(with_foreign)]
pub trait DocumentStore: Send + Sync {
    /// Whether a note with this id exists
    fn exists(&self, id: String) -> bool;

    /// Canonical text of the note, if it exists
    fn get(&self, id: String) -> Option<String>;
}

/// Attachment bookkeeping, implemented by the host application.
///
/// The core never reads the filesystem; file sizes come from the host.
#[uniffi::export(with_foreign)]
pub trait AttachmentStore: Send + Sync {
    /// Size in bytes of the file at `path`, or 0 if it cannot be read
    fn size_of(&self, path: String) -> u64;

    /// Record that `document_id` references the file at `path`
    fn record_attachment(
        &self,
        document_id: String,
        path: String,
        kind: AttachmentKind,
        size_bytes: u64,
    );
}

/// Existence check keyed by a parsed identifier
pub(crate) fn note_exists(store: &dyn DocumentStore, id: Uuid) -> bool {
    store.exists(id.hyphenated().to_string())
}
