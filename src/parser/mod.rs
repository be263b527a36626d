//! Document model parser
//!
//! Splits a note's canonical text into an ordered sequence of content
//! elements: prose, screenshots, screen recordings and links to other notes.
//!
//! The result is a lossless partition of the input. Every element carries the
//! byte span it was read from, and concatenating those spans in order gives
//! back the original text. Malformed tokens are never errors; they stay in the
//! surrounding prose.

pub mod scanner;

pub use scanner::{Token, TokenKind, TokenScanner, Tokens};

use crate::{
    config::{ConversionConfig, MarkupSyntax},
    error::ConfigResult,
    models::{ContentElement, Elements, ParsedElement, TextSpan},
};

/// Parser bound to a markup syntax
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    syntax: MarkupSyntax,
}

impl DocumentParser {
    /// Create a parser for the default syntax
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser for a custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn with_config(config: ConversionConfig) -> ConfigResult<Self> {
        Ok(Self {
            syntax: MarkupSyntax::compile(config)?,
        })
    }

    #[must_use]
    pub const fn from_syntax(syntax: MarkupSyntax) -> Self {
        Self { syntax }
    }

    #[must_use]
    pub const fn syntax(&self) -> &MarkupSyntax {
        &self.syntax
    }

    /// Parse canonical text into elements with their source spans
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<ParsedElement> {
        parse_with(&self.syntax, text)
    }

    /// Parse canonical text into bare elements
    #[must_use]
    pub fn elements(&self, text: &str) -> Elements {
        self.parse(text).into_iter().map(|p| p.element).collect()
    }
}

/// Parse with the default syntax
#[must_use]
pub fn parse(text: &str) -> Vec<ParsedElement> {
    parse_with(MarkupSyntax::shared(), text)
}

/// Parse with the default syntax, dropping spans
#[must_use]
pub fn parse_elements(text: &str) -> Elements {
    parse(text).into_iter().map(|p| p.element).collect()
}

pub(crate) fn parse_with(syntax: &MarkupSyntax, text: &str) -> Vec<ParsedElement> {
    let mut elements = Vec::new();
    let mut cursor = 0;

    for token in TokenScanner::new(syntax).tokens(text, 0) {
        push_text(&mut elements, text, cursor, token.range.start);
        elements.push(ParsedElement {
            element: token.element,
            span: TextSpan::new(token.range.start, token.range.end),
        });
        cursor = token.range.end;
    }

    push_text(&mut elements, text, cursor, text.len());

    if elements.is_empty() {
        elements.push(ParsedElement {
            element: ContentElement::text(""),
            span: TextSpan::new(0, 0),
        });
    }

    elements
}

fn push_text(elements: &mut Vec<ParsedElement>, text: &str, start: usize, end: usize) {
    if start < end {
        elements.push(ParsedElement {
            element: ContentElement::text(&text[start..end]),
            span: TextSpan::new(start, end),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "11111111-1111-1111-1111-111111111111";

    fn reassemble(text: &str, parsed: &[ParsedElement]) -> String {
        parsed
            .iter()
            .map(|p| p.span.slice(text).unwrap())
            .collect()
    }

    #[test]
    fn empty_document_yields_single_empty_text() {
        let parsed = parse("");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].element, ContentElement::text(""));
        assert!(parsed[0].span.is_empty());
    }

    #[test]
    fn plain_text_is_one_element() {
        assert_eq!(
            parse_elements("just words"),
            vec![ContentElement::text("just words")]
        );
    }

    #[test]
    fn mixed_content() {
        let text = format!(
            "Look at this:\n![](file:///tmp/a.png)\nand [[{ID}|other note]] too"
        );
        assert_eq!(
            parse_elements(&text),
            vec![
                ContentElement::text("Look at this:\n"),
                ContentElement::image("/tmp/a.png"),
                ContentElement::text("\nand "),
                ContentElement::note_link(ID, "other note"),
                ContentElement::text(" too"),
            ]
        );
    }

    #[test]
    fn adjacent_tokens_emit_no_empty_text() {
        let text = format!("![](a.png)🎬 [rec](b.mov)[[{ID}|x]]");
        assert_eq!(
            parse_elements(&text),
            vec![
                ContentElement::image("a.png"),
                ContentElement::video("b.mov"),
                ContentElement::note_link(ID, "x"),
            ]
        );
    }

    #[test]
    fn malformed_tokens_stay_literal() {
        let inputs = [
            "![unterminated](path",
            "[[not-an-id|text]]",
            "[[11111111-1111-1111-1111-111111111111|open",
            "🎬[no space](a.mov)",
        ];
        for input in inputs {
            assert_eq!(
                parse_elements(input),
                vec![ContentElement::text(input)],
                "input {input:?}"
            );
        }
    }

    #[test]
    fn spans_form_lossless_partition() {
        let inputs = [
            String::new(),
            "plain".to_string(),
            format!("héllo ![ä](file:///tmp/ü.png) 🎬 [x](/v.mov) [[{ID}|ö]] end"),
            format!("[[{ID}|a]][[{ID}|b]]\n\n![](x)"),
            "![broken](".to_string(),
        ];
        for input in &inputs {
            let parsed = parse(input);
            assert_eq!(&reassemble(input, &parsed), input);

            let mut expected_start = 0;
            for p in &parsed {
                assert_eq!(p.span.start, expected_start);
                expected_start = p.span.end;
            }
            assert_eq!(expected_start, input.len() as u64);
        }
    }

    #[test]
    fn reparse_is_identical() {
        let text = format!("a ![](b.png) [[{ID}|c]]");
        let parser = DocumentParser::new();
        assert_eq!(parser.parse(&text), parser.parse(&text));
    }

    #[test]
    fn custom_video_marker() {
        let parser = DocumentParser::with_config(ConversionConfig {
            video_marker: "REC".into(),
            ..ConversionConfig::default()
        })
        .unwrap();
        assert_eq!(
            parser.elements("REC [clip](/tmp/r.mov)"),
            vec![ContentElement::video("/tmp/r.mov")]
        );
        assert_eq!(
            parser.elements("🎬 [clip](/tmp/r.mov)"),
            vec![ContentElement::text("🎬 [clip](/tmp/r.mov)")]
        );
    }

    #[test]
    fn uppercase_ids_are_accepted() {
        let id = "ABCDEF01-2345-6789-ABCD-EF0123456789";
        let text = format!("[[{id}|Upper]]");
        assert_eq!(
            parse_elements(&text),
            vec![ContentElement::note_link(id, "Upper")]
        );
    }
}
