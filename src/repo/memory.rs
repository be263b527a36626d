use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, RwLock},
};

use uuid::Uuid;

use crate::{
    models::AttachmentKind,
    repo::{AttachmentStore, DocumentStore},
};

/// In-memory document store keyed by note id
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<BTreeMap<Uuid, String>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a note's canonical text
    pub fn insert(&self, id: Uuid, text: impl Into<String>) {
        match self.documents.write() {
            Ok(mut documents) => {
                documents.insert(id, text.into());
            }
            Err(_) => log::warn!("document store lock poisoned, dropping insert of {id}"),
        }
    }

    /// Remove a note, returning its text
    pub fn remove(&self, id: Uuid) -> Option<String> {
        self.documents.write().ok()?.remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().map_or(0, |documents| documents.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn exists(&self, id: String) -> bool {
        let Ok(id) = Uuid::try_parse(&id) else {
            return false;
        };
        self.documents
            .read()
            .is_ok_and(|documents| documents.contains_key(&id))
    }

    fn get(&self, id: String) -> Option<String> {
        let id = Uuid::try_parse(&id).ok()?;
        self.documents.read().ok()?.get(&id).cloned()
    }
}

/// One `record_attachment` call captured by [`MemoryAttachmentStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAttachment {
    pub document_id: String,
    pub path: String,
    pub kind: AttachmentKind,
    pub size_bytes: u64,
}

/// In-memory attachment bookkeeping with sizes registered up front
#[derive(Debug, Default)]
pub struct MemoryAttachmentStore {
    recorded: Mutex<Vec<RecordedAttachment>>,
    sizes: RwLock<HashMap<String, u64>>,
}

impl MemoryAttachmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the size reported for `path`
    pub fn set_size(&self, path: impl Into<String>, size_bytes: u64) {
        let path = path.into();
        match self.sizes.write() {
            Ok(mut sizes) => {
                sizes.insert(path, size_bytes);
            }
            Err(_) => log::warn!("attachment size lock poisoned, dropping size of {path}"),
        }
    }

    /// Snapshot of everything recorded so far
    #[must_use]
    pub fn recorded(&self) -> Vec<RecordedAttachment> {
        self.recorded
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }

    /// Recorded attachments of one document
    #[must_use]
    pub fn recorded_for(&self, document_id: &str) -> Vec<RecordedAttachment> {
        self.recorded()
            .into_iter()
            .filter(|r| r.document_id == document_id)
            .collect()
    }
}

impl AttachmentStore for MemoryAttachmentStore {
    fn size_of(&self, path: String) -> u64 {
        self.sizes
            .read()
            .ok()
            .and_then(|sizes| sizes.get(&path).copied())
            .unwrap_or_default()
    }

    fn record_attachment(
        &self,
        document_id: String,
        path: String,
        kind: AttachmentKind,
        size_bytes: u64,
    ) {
        match self.recorded.lock() {
            Ok(mut recorded) => recorded.push(RecordedAttachment {
                document_id,
                path,
                kind,
                size_bytes,
            }),
            Err(_) => log::warn!("attachment store lock poisoned, dropping {path}"),
        }
    }
}
