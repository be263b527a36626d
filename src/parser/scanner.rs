//! Token scanner locating the next embedded token in canonical text

use core::ops::Range;

use regex::Captures;
use uuid::Uuid;

use crate::config::{MarkupSyntax, strip_file_url};
use crate::models::ContentElement;

/// Token kinds in tie-break priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Image,
    Video,
    NoteLink,
}

/// A recognised token and the byte range it occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
    pub element: ContentElement,
}

/// Finds tokens using a compiled [`MarkupSyntax`]
#[derive(Debug, Clone, Copy)]
pub struct TokenScanner<'a> {
    syntax: &'a MarkupSyntax,
}

impl<'a> TokenScanner<'a> {
    #[must_use]
    pub const fn new(syntax: &'a MarkupSyntax) -> Self {
        Self { syntax }
    }

    /// Tokens of `text` in order, starting at byte offset `from`
    #[must_use]
    pub fn tokens<'t>(self, text: &'t str, from: usize) -> Tokens<'a, 't> {
        Tokens {
            scanner: self,
            text,
            cursor: from,
            lookahead: [Lookahead::Pending, Lookahead::Pending, Lookahead::Pending],
        }
    }

    /// Earliest token starting at or after `from`.
    ///
    /// Equal start offsets prefer image, then video, then note link.
    #[must_use]
    pub fn next_token(&self, text: &str, from: usize) -> Option<Token> {
        self.tokens(text, from).next()
    }

    fn scan(&self, kind: TokenKind, text: &str, from: usize) -> Option<Token> {
        match kind {
            TokenKind::Image => self.scan_image(text, from),
            TokenKind::Video => self.scan_video(text, from),
            TokenKind::NoteLink => self.scan_note_link(text, from),
        }
    }

    fn scan_image(&self, text: &str, from: usize) -> Option<Token> {
        let caps = self.syntax.image.captures_at(text, from)?;
        let path = capture(&caps, 2);
        Some(Token {
            kind: TokenKind::Image,
            range: full_range(&caps),
            element: ContentElement::image(strip_file_url(path)),
        })
    }

    fn scan_video(&self, text: &str, from: usize) -> Option<Token> {
        let caps = self.syntax.video.captures_at(text, from)?;
        let path = capture(&caps, 2);
        Some(Token {
            kind: TokenKind::Video,
            range: full_range(&caps),
            element: ContentElement::video(strip_file_url(path)),
        })
    }

    /// Note links whose id does not parse as a UUID are skipped, not fatal
    fn scan_note_link(&self, text: &str, from: usize) -> Option<Token> {
        let mut pos = from;
        while let Some(caps) = self.syntax.note_link.captures_at(text, pos) {
            let range = full_range(&caps);
            let id = capture(&caps, 1);
            if Uuid::try_parse(id).is_ok() {
                return Some(Token {
                    kind: TokenKind::NoteLink,
                    range,
                    element: ContentElement::note_link(id, capture(&caps, 2)),
                });
            }
            log::debug!("skipping note link with malformed id {id:?}");
            pos = range.start + 1;
        }
        None
    }
}

const KINDS: [TokenKind; 3] = [TokenKind::Image, TokenKind::Video, TokenKind::NoteLink];

#[derive(Debug)]
enum Lookahead {
    Pending,
    Found(Token),
    Exhausted,
}

/// Iterator over the tokens of one text.
///
/// Each kind remembers its next match and is only rescanned once the cursor
/// has moved past it; a kind that finds nothing is never scanned again.
#[derive(Debug)]
pub struct Tokens<'s, 't> {
    scanner: TokenScanner<'s>,
    text: &'t str,
    cursor: usize,
    lookahead: [Lookahead; 3],
}

impl Iterator for Tokens<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        for (slot, kind) in self.lookahead.iter_mut().zip(KINDS) {
            let stale = match slot {
                Lookahead::Pending => true,
                Lookahead::Found(token) => token.range.start < self.cursor,
                Lookahead::Exhausted => false,
            };
            if stale {
                *slot = self
                    .scanner
                    .scan(kind, self.text, self.cursor)
                    .map_or(Lookahead::Exhausted, Lookahead::Found);
            }
        }

        let (_, _, index) = self
            .lookahead
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Lookahead::Found(token) => Some((token.range.start, token.kind, index)),
                _ => None,
            })
            .min()?;

        let Lookahead::Found(token) =
            std::mem::replace(&mut self.lookahead[index], Lookahead::Pending)
        else {
            return None;
        };
        self.cursor = token.range.end;
        Some(token)
    }
}

fn full_range(caps: &Captures<'_>) -> Range<usize> {
    caps.get(0).map_or(0..0, |m| m.range())
}

fn capture<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}
