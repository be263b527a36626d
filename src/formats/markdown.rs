//! HTML to Markdown reducer
//!
//! Normalises HTML coming back from the rich-text surface into canonical
//! text. This is the inverse of [`super::html`] for content the surface
//! actually produces, not a general HTML converter.
//!
//! The reduction is an ordered series of regex rewrites over the whole
//! buffer, so later passes never see the tags earlier passes consumed.
//! Because there is no parse tree, nested or overlapping inline styles (bold
//! inside a link label, say) may not survive a round trip exactly, and
//! `__x__`/`_x_` come back as `**x**`/`*x*`.

use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};

use super::decode_entities;
use crate::config::{MarkupSyntax, NOTE_LINK_CLASS};

static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">[ \t]*\r?\n\s*<").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img\b([^>]*)>").unwrap());
static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a>").unwrap());
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li\b([^>]*)>(.*?)</li>").unwrap());
static CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<input\b[^>]*>|</?span\b[^>]*>").unwrap());
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-3])\b[^>]*>(.*?)</h[1-3]>").unwrap());
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)>").unwrap());
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)>").unwrap());
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre\b[^>]*>\s*(?:<code\b([^>]*)>(.*?)</code>|(.*?))\s*</pre>").unwrap()
});
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code\b[^>]*>(.*?)</code>").unwrap());
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<blockquote\b[^>]*>(.*?)</blockquote>").unwrap());
static PARAGRAPH_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:p|div)\b[^>]*>").unwrap());
static PARAGRAPH_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:p|div)>").unwrap());
static LIST_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:ul|ol)\b[^>]*>").unwrap());
static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<hr\b[^>]*>").unwrap());
static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:p|div)\b[^>]*>(.*?)</(?:p|div)>").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .unwrap()
});

/// Reduces editor HTML to canonical text
#[derive(Debug, Clone, Copy)]
pub struct HtmlReducer<'a> {
    syntax: &'a MarkupSyntax,
}

impl Default for HtmlReducer<'static> {
    fn default() -> Self {
        Self::new(MarkupSyntax::shared())
    }
}

impl<'a> HtmlReducer<'a> {
    #[must_use]
    pub const fn new(syntax: &'a MarkupSyntax) -> Self {
        Self { syntax }
    }

    /// Reduce an HTML fragment to canonical text
    #[must_use]
    pub fn reduce(&self, html: &str) -> String {
        let text = BETWEEN_TAGS.replace_all(html, "><");
        let text = LINE_BREAK.replace_all(&text, "\n");
        let text = IMAGE.replace_all(&text, reduce_image);
        let text = ANCHOR.replace_all(&text, |caps: &Captures<'_>| self.reduce_anchor(caps));
        let text = LIST_ITEM.replace_all(&text, |caps: &Captures<'_>| self.reduce_task_item(caps));
        let text = HEADING.replace_all(&text, reduce_heading);
        let text = BOLD.replace_all(&text, "**$1**");
        let text = ITALIC.replace_all(&text, "*$1*");
        let text = CODE_BLOCK.replace_all(&text, reduce_code_block);
        let text = INLINE_CODE.replace_all(&text, "`$1`");
        let text = BLOCKQUOTE.replace_all(&text, reduce_blockquote);
        let text = LIST_ITEM.replace_all(&text, |caps: &Captures<'_>| {
            format!("- {}\n", group(caps, 2).trim())
        });
        let text = LIST_WRAPPER.replace_all(&text, "");
        let text = RULE.replace_all(&text, "---\n");
        let text = PARAGRAPH.replace_all(&text, "$1\n");
        let text = ANY_TAG.replace_all(&text, "");
        let text = decode_entities(&text);
        let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");

        text.trim().to_string()
    }

    /// Note link anchors become `[[id|text]]`, everything else `[text](href)`.
    ///
    /// An anchor is a note link only if it carries `data-note-id` or the
    /// `note-link` class; a plain link that happens to use the note scheme
    /// stays a plain link.
    fn reduce_anchor(&self, caps: &Captures<'_>) -> String {
        let attrs = attributes(group(caps, 1));
        let inner = group(caps, 2);
        let href = attrs.get("href").map_or("", String::as_str);
        let is_note_link = attrs
            .get("class")
            .is_some_and(|class| class.split_whitespace().any(|c| c == NOTE_LINK_CLASS));

        let note_id = attrs
            .get("data-note-id")
            .map(String::as_str)
            .or_else(|| {
                is_note_link
                    .then(|| self.syntax.note_id_from_href(href))
                    .flatten()
            });

        match note_id {
            Some(id) => {
                let display = ANY_TAG.replace_all(inner, "");
                format!("[[{id}|{}]]", display.replace(']', ""))
            }
            None if href.is_empty() => inner.to_string(),
            None => format!("[{inner}]({href})"),
        }
    }

    /// Task items are told apart from plain items by their class attribute
    fn reduce_task_item(&self, caps: &Captures<'_>) -> String {
        let whole = group(caps, 0);
        let attrs = attributes(group(caps, 1));
        let Some(class) = attrs.get("class") else {
            return whole.to_string();
        };

        let classes: Vec<&str> = class.split_whitespace().collect();
        if !classes.contains(&self.syntax.config.task_item_class.as_str()) {
            return whole.to_string();
        }

        let checked = classes.contains(&self.syntax.config.task_checked_class.as_str());
        let content = CHECKBOX.replace_all(group(caps, 2), "");
        let mark = if checked { 'x' } else { ' ' };
        format!("- [{mark}] {}\n", content.trim())
    }
}

/// Reduce editor HTML with the default syntax
#[must_use]
pub fn reduce_html(html: &str) -> String {
    HtmlReducer::default().reduce(html)
}

fn reduce_image(caps: &Captures<'_>) -> String {
    let attrs = attributes(group(caps, 1));
    match attrs.get("src") {
        Some(src) if !src.is_empty() => {
            let alt = attrs.get("alt").map_or("", String::as_str);
            format!("![{alt}]({src})")
        }
        _ => String::new(),
    }
}

fn reduce_heading(caps: &Captures<'_>) -> String {
    let level = group(caps, 1).parse::<usize>().unwrap_or(1);
    format!("{} {}\n", "#".repeat(level), group(caps, 2).trim())
}

fn reduce_code_block(caps: &Captures<'_>) -> String {
    let language = attributes(group(caps, 1))
        .get("class")
        .and_then(|class| {
            class
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-"))
                .map(str::to_string)
        })
        .unwrap_or_default();
    let body = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map_or("", |m| m.as_str());
    format!("```{language}\n{body}\n```\n")
}

fn reduce_blockquote(caps: &Captures<'_>) -> String {
    let inner = PARAGRAPH_OPEN.replace_all(group(caps, 1), "");
    let inner = PARAGRAPH_CLOSE.replace_all(&inner, "\n");
    let mut out = String::new();
    for line in inner.trim_end_matches('\n').split('\n') {
        if line.is_empty() {
            out.push_str(">\n");
        } else {
            out.push_str("> ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Attribute map of a tag's attribute text, names lowercased
fn attributes(raw: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some((name, value.to_string()))
        })
        .collect()
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}
