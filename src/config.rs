//! Conversion configuration and the token grammar compiled from it

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Characters that delimit tokens and may not appear in configured markers
const RESERVED: &[char] = &['[', ']', '(', ')', '!', '|', '<', '>', '"', '\n', '\r'];

/// CSS class marking note link anchors in the editor HTML
pub const NOTE_LINK_CLASS: &str = "note-link";

/// Tunable parts of the canonical markup dialect and of the editor HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct ConversionConfig {
    /// Glyph that precedes `[label](path)` to mark a screen recording
    pub video_marker: String,
    /// URL scheme used for note link anchors, e.g. `note://<id>`
    pub note_link_scheme: String,
    /// CSS class carried by task list items in the editor
    pub task_item_class: String,
    /// Extra CSS class carried by checked task list items
    pub task_checked_class: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            video_marker: "🎬".to_string(),
            note_link_scheme: "note://".to_string(),
            task_item_class: "task-item".to_string(),
            task_checked_class: "checked".to_string(),
        }
    }
}

impl ConversionConfig {
    /// Check the configuration against the token grammar
    ///
    /// # Errors
    ///
    /// Returns an error if a value is empty or contains a reserved character
    pub fn validate(&self) -> ConfigResult<()> {
        if self.video_marker.trim().is_empty() {
            return Err(ConfigError::EmptyVideoMarker);
        }
        if self.note_link_scheme.trim().is_empty() {
            return Err(ConfigError::EmptyNoteScheme);
        }

        let fields = [
            ("video_marker", &self.video_marker),
            ("note_link_scheme", &self.note_link_scheme),
            ("task_item_class", &self.task_item_class),
            ("task_checked_class", &self.task_checked_class),
        ];
        for (field, value) in fields {
            if value.contains(RESERVED) {
                return Err(ConfigError::reserved_character(field, value.as_str()));
            }
        }

        for (field, value) in &fields[2..] {
            if value.is_empty() || value.contains(char::is_whitespace) {
                return Err(ConfigError::reserved_character(*field, value.as_str()));
            }
        }

        Ok(())
    }
}

/// Token patterns compiled from a [`ConversionConfig`]
#[derive(Debug, Clone)]
pub struct MarkupSyntax {
    pub config: ConversionConfig,
    /// `![alt](path)`
    pub image: Regex,
    /// `<marker> [label](path)`
    pub video: Regex,
    /// `[[<uuid>|display]]`, id shape only; the value is checked by the parser
    pub note_link: Regex,
}

static DEFAULT_SYNTAX: LazyLock<MarkupSyntax> = LazyLock::new(|| {
    MarkupSyntax::compile(ConversionConfig::default()).expect("default syntax compiles")
});

impl MarkupSyntax {
    /// Compile the token grammar for the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn compile(config: ConversionConfig) -> ConfigResult<Self> {
        config.validate()?;

        let image = Regex::new(r"!\[([^\]\n]*)\]\(([^)\n]+)\)")?;
        let video = Regex::new(&format!(
            r"{} \[([^\]\n]*)\]\(([^)\n]+)\)",
            regex::escape(&config.video_marker)
        ))?;
        let note_link = Regex::new(r"\[\[([0-9A-Fa-f-]{36})\|([^\]\n]*)\]\]")?;

        log::debug!(
            "compiled markup syntax (video marker {:?}, note scheme {:?})",
            config.video_marker,
            config.note_link_scheme
        );

        Ok(Self {
            config,
            image,
            video,
            note_link,
        })
    }

    /// Shared syntax for the default configuration
    #[must_use]
    pub fn shared() -> &'static Self {
        &DEFAULT_SYNTAX
    }

    /// Href used for a note link anchor
    #[must_use]
    pub fn note_href(&self, id: &str) -> String {
        format!("{}{id}", self.config.note_link_scheme)
    }

    /// Note identifier carried by an anchor href, if it uses the note scheme
    #[must_use]
    pub fn note_id_from_href<'a>(&self, href: &'a str) -> Option<&'a str> {
        href.strip_prefix(self.config.note_link_scheme.as_str())
    }
}

impl Default for MarkupSyntax {
    fn default() -> Self {
        Self::shared().clone()
    }
}

/// Strip a `file://` URL prefix, leaving a bare filesystem path
#[must_use]
pub fn strip_file_url(path: &str) -> &str {
    path.strip_prefix("file://").unwrap_or(path)
}
