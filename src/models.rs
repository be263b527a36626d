#![allow(clippy::match_wildcard_for_single_variants)]

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Elements = Vec<ContentElement>;

/// Byte range of an element inside the canonical text it was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, uniffi::Record)]
pub struct TextSpan {
    pub start: u64,
    pub end: u64,
}

impl TextSpan {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u64,
            end: end as u64,
        }
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub const fn contains(&self, pos: u64) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Slice of `text` covered by this span, if the span lies on char boundaries
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start as usize..self.end as usize)
    }
}

/// One typed unit of a note's canonical text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, uniffi::Enum)]
pub enum ContentElement {
    Text {
        text: String,
    },
    /// Screenshot reference, path stored without any `file://` prefix
    Image {
        path: String,
    },
    /// Screen recording reference, path stored without any `file://` prefix
    Video {
        path: String,
    },
    NoteLink {
        target_id: String,
        display_text: String,
    },
}

impl ContentElement {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub fn image(path: impl Into<String>) -> Self {
        Self::Image { path: path.into() }
    }

    #[must_use]
    pub fn video(path: impl Into<String>) -> Self {
        Self::Video { path: path.into() }
    }

    #[must_use]
    pub fn note_link(target_id: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self::NoteLink {
            target_id: target_id.into(),
            display_text: display_text.into(),
        }
    }

    /// Attachment kind for image and video elements
    #[must_use]
    pub const fn attachment_kind(&self) -> Option<AttachmentKind> {
        match self {
            Self::Image { .. } => Some(AttachmentKind::Screenshot),
            Self::Video { .. } => Some(AttachmentKind::Recording),
            _ => None,
        }
    }

    /// File path for image and video elements
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        match self {
            Self::Image { path } | Self::Video { path } => Some(path),
            _ => None,
        }
    }

    /// Parsed identifier of a note link target
    #[must_use]
    pub fn target_uuid(&self) -> Option<Uuid> {
        match self {
            Self::NoteLink { target_id, .. } => Uuid::try_parse(target_id).ok(),
            _ => None,
        }
    }
}

macro_rules! impl_element_helpers {
    ($($variant:ident { $($field:ident),* }),*) => {
        $(
            impl ContentElement {
                paste::paste! {
                    #[must_use]
                    pub fn [<as_ $variant:snake>](&self) -> Option<ContentElement> {
                        if let ContentElement::$variant { $($field),* } = self {
                            Some(ContentElement::$variant {
                                $(
                                    $field: $field.clone(),
                                )*
                            })
                        } else {
                            None
                        }
                    }

                    #[must_use]
                    pub const fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self, ContentElement::$variant { .. })
                    }
                }
            }
        )*
    };
}

impl_element_helpers!(
    Text { text },
    Image { path },
    Video { path },
    NoteLink {
        target_id,
        display_text
    }
);

impl fmt::Display for ContentElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { text } => write!(f, "Text({text:?})"),
            Self::Image { path } => write!(f, "Image({path:?})"),
            Self::Video { path } => write!(f, "Video({path:?})"),
            Self::NoteLink {
                target_id,
                display_text,
            } => write!(f, "NoteLink({target_id}, {display_text:?})"),
        }
    }
}

/// An element together with the source range it was parsed from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, uniffi::Record)]
pub struct ParsedElement {
    pub element: ContentElement,
    pub span: TextSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, uniffi::Enum)]
pub enum AttachmentKind {
    Screenshot,
    Recording,
}

impl AttachmentKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Screenshot => "screenshot",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A file path referenced by a note, tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
pub struct AttachmentPath {
    pub path: String,
    pub kind: AttachmentKind,
}

/// Relationship derived from a note's text, ready to be persisted as a row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum Reference {
    Note {
        source_id: String,
        target_id: String,
    },
    Attachment {
        document_id: String,
        file_path: String,
        kind: AttachmentKind,
    },
}

impl Reference {
    #[must_use]
    pub fn owner_id(&self) -> &str {
        match self {
            Self::Note { source_id, .. } => source_id,
            Self::Attachment { document_id, .. } => document_id,
        }
    }

    #[must_use]
    pub const fn is_note(&self) -> bool {
        matches!(self, Self::Note { .. })
    }

    /// Backlink key for this reference; `None` when a note target is not a UUID
    #[must_use]
    pub fn link_target(&self) -> Option<LinkTarget> {
        match self {
            Self::Note { target_id, .. } => Uuid::try_parse(target_id).ok().map(LinkTarget::Note),
            Self::Attachment { file_path, .. } => Some(LinkTarget::Attachment(file_path.clone())),
        }
    }
}

/// Key under which backlinks are indexed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkTarget {
    Note(Uuid),
    Attachment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_slices_source_text() {
        let span = TextSpan::new(6, 11);
        assert_eq!(span.slice("hello world"), Some("world"));
        assert_eq!(span.len(), 5);
        assert!(span.contains(6));
        assert!(!span.contains(11));
    }

    #[test]
    fn span_outside_text_is_none() {
        assert_eq!(TextSpan::new(3, 40).slice("abc"), None);
    }

    #[test]
    fn helpers_match_variants() {
        let image = ContentElement::image("/tmp/a.png");
        assert!(image.is_image());
        assert!(!image.is_video());
        assert_eq!(image.as_image(), Some(image.clone()));
        assert_eq!(image.as_text(), None);
        assert_eq!(image.attachment_kind(), Some(AttachmentKind::Screenshot));
        assert_eq!(image.file_path(), Some("/tmp/a.png"));

        let video = ContentElement::video("/tmp/a.mov");
        assert_eq!(video.attachment_kind(), Some(AttachmentKind::Recording));
    }

    #[test]
    fn note_link_target_uuid_is_case_insensitive() {
        let upper = ContentElement::note_link("AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE", "x");
        let lower = ContentElement::note_link("aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee", "x");
        assert!(upper.target_uuid().is_some());
        assert_eq!(upper.target_uuid(), lower.target_uuid());
        assert_eq!(ContentElement::text("x").target_uuid(), None);
    }

    #[test]
    fn reference_owner() {
        let reference = Reference::Attachment {
            document_id: "doc".into(),
            file_path: "/tmp/a.png".into(),
            kind: AttachmentKind::Screenshot,
        };
        assert_eq!(reference.owner_id(), "doc");
        assert!(!reference.is_note());
        assert_eq!(AttachmentKind::Recording.to_string(), "recording");
    }
}
