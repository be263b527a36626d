//! Markdown to HTML renderer for the rich-text editing surface
//!
//! Rendering runs in four passes:
//! 1. each physical line is classified as a heading, list or task item,
//!    quote, rule, fenced code block, paragraph or blank line;
//! 2. inline constructs are substituted: tokens (images, recordings, note
//!    links), plain links, inline code, then bold and italic on the remaining
//!    prose;
//! 3. runs of list items are wrapped in `<ul>`;
//! 4. unwrapped lines become `<p>` and blank lines become `<br>`.
//!
//! Input is always treated as Markdown. Feeding HTML back in is not
//! idempotent; reduce it first.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{escape_attr, escape_html};
use crate::{
    config::{MarkupSyntax, NOTE_LINK_CLASS},
    models::ContentElement,
    parser::parse_with,
};

/// Inline code span or plain `[label](url)` link inside prose
static PROSE_SPANS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`([^`\n]+)`|\[([^\]\n]+)\]\(([^)\s]+)\)").unwrap()
});
static BOLD_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\s](?:[^*\n]*[^*\s])?)\*\*").unwrap());
static BOLD_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b__([^_\s](?:[^_\n]*[^_\s])?)__\b").unwrap());
static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").unwrap());
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_\s](?:[^_\n]*[^_\s])?)_\b").unwrap());

/// Block-level classification of one source line
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineBlock<'t> {
    Heading { level: u8, content: &'t str },
    TaskItem { checked: bool, content: &'t str },
    ListItem { content: &'t str },
    Quote { content: &'t str },
    Rule,
    Code { language: Option<&'t str>, body: String },
    Paragraph { content: &'t str },
    Blank,
}

impl LineBlock<'_> {
    const fn is_list_item(&self) -> bool {
        matches!(self, Self::TaskItem { .. } | Self::ListItem { .. })
    }
}

/// Renders canonical text as editor HTML
#[derive(Debug, Clone, Copy)]
pub struct HtmlRenderer<'a> {
    syntax: &'a MarkupSyntax,
}

impl Default for HtmlRenderer<'static> {
    fn default() -> Self {
        Self::new(MarkupSyntax::shared())
    }
}

impl<'a> HtmlRenderer<'a> {
    #[must_use]
    pub const fn new(syntax: &'a MarkupSyntax) -> Self {
        Self { syntax }
    }

    /// Render canonical text to an HTML fragment
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let blocks = classify_lines(markdown);

        let mut out: Vec<String> = Vec::with_capacity(blocks.len());
        let mut in_list = false;

        for block in &blocks {
            if block.is_list_item() && !in_list {
                out.push("<ul>".to_string());
                in_list = true;
            } else if !block.is_list_item() && in_list {
                out.push("</ul>".to_string());
                in_list = false;
            }
            out.push(self.render_block(block));
        }

        if in_list {
            out.push("</ul>".to_string());
        }

        out.join("\n")
    }

    fn render_block(&self, block: &LineBlock<'_>) -> String {
        match block {
            LineBlock::Heading { level, content } => {
                format!("<h{level}>{}</h{level}>", self.render_inline(content))
            }
            LineBlock::TaskItem { checked, content } => {
                let class = &self.syntax.config.task_item_class;
                let inner = self.render_inline(content);
                if *checked {
                    let checked_class = &self.syntax.config.task_checked_class;
                    format!(
                        r#"<li class="{class} {checked_class}"><input type="checkbox" checked><span>{inner}</span></li>"#
                    )
                } else {
                    format!(r#"<li class="{class}"><input type="checkbox"><span>{inner}</span></li>"#)
                }
            }
            LineBlock::ListItem { content } => format!("<li>{}</li>", self.render_inline(content)),
            LineBlock::Quote { content } => {
                format!("<blockquote>{}</blockquote>", self.render_inline(content))
            }
            LineBlock::Rule => "<hr>".to_string(),
            LineBlock::Code { language, body } => {
                let open = language.map_or_else(
                    || "<code>".to_string(),
                    |lang| format!(r#"<code class="language-{}">"#, escape_attr(lang)),
                );
                format!("<pre>{open}{}</code></pre>", escape_html(body))
            }
            LineBlock::Paragraph { content } => format!("<p>{}</p>", self.render_inline(content)),
            LineBlock::Blank => "<br>".to_string(),
        }
    }

    /// Render the inline constructs of one line
    fn render_inline(&self, content: &str) -> String {
        let mut out = String::with_capacity(content.len() + 16);

        for parsed in parse_with(self.syntax, content) {
            let source = parsed.span.slice(content).unwrap_or_default();
            match &parsed.element {
                ContentElement::Text { text } => out.push_str(&render_prose(text)),
                ContentElement::Image { .. } => match self.syntax.image.captures(source) {
                    Some(caps) => out.push_str(&format!(
                        r#"<img src="{}" alt="{}">"#,
                        escape_attr(group(&caps, 2)),
                        escape_attr(group(&caps, 1)),
                    )),
                    None => out.push_str(&escape_html(source)),
                },
                ContentElement::Video { .. } => match self.syntax.video.captures(source) {
                    Some(caps) => out.push_str(&format!(
                        r#"{} <a href="{}" class="video-link">{}</a>"#,
                        escape_html(&self.syntax.config.video_marker),
                        escape_attr(group(&caps, 2)),
                        escape_html(group(&caps, 1)),
                    )),
                    None => out.push_str(&escape_html(source)),
                },
                ContentElement::NoteLink {
                    target_id,
                    display_text,
                } => out.push_str(&format!(
                    r#"<a href="{}" class="{NOTE_LINK_CLASS}" data-note-id="{}">{}</a>"#,
                    escape_attr(&self.syntax.note_href(target_id)),
                    escape_attr(target_id),
                    escape_html(display_text),
                )),
            }
        }

        out
    }
}

/// Render canonical text with the default syntax
#[must_use]
pub fn render_html(markdown: &str) -> String {
    HtmlRenderer::default().render(markdown)
}

/// Prose outside tokens: code spans and links are kept whole, emphasis
/// applies only to the text between them
fn render_prose(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in PROSE_SPANS.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&emphasize(&escape_html(&text[last..whole.start()])));

        if let Some(code) = caps.get(1) {
            out.push_str(&format!("<code>{}</code>", escape_html(code.as_str())));
        } else {
            out.push_str(&format!(
                r#"<a href="{}">{}</a>"#,
                escape_attr(group(&caps, 3)),
                emphasize(&escape_html(group(&caps, 2))),
            ));
        }
        last = whole.end();
    }

    out.push_str(&emphasize(&escape_html(&text[last..])));
    out
}

fn emphasize(escaped: &str) -> String {
    let text = BOLD_STARS.replace_all(escaped, "<strong>$1</strong>");
    let text = BOLD_UNDERSCORES.replace_all(&text, "<strong>$1</strong>");
    let text = ITALIC_STAR.replace_all(&text, "<em>$1</em>");
    ITALIC_UNDERSCORE
        .replace_all(&text, "<em>$1</em>")
        .into_owned()
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn classify_lines(markdown: &str) -> Vec<LineBlock<'_>> {
    let lines: Vec<&str> = markdown
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let mut blocks = Vec::with_capacity(lines.len());
    let mut pos = 0;

    while pos < lines.len() {
        if lines[pos].trim_start().starts_with("```") {
            let (block, next) = scan_code_fence(&lines, pos);
            blocks.push(block);
            pos = next;
        } else {
            blocks.push(classify_line(lines[pos]));
            pos += 1;
        }
    }

    blocks
}

fn classify_line(line: &str) -> LineBlock<'_> {
    if line.trim().is_empty() {
        return LineBlock::Blank;
    }
    if line.trim() == "---" {
        return LineBlock::Rule;
    }

    for (prefix, level) in [("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(content) = line.strip_prefix(prefix) {
            return LineBlock::Heading { level, content };
        }
    }

    if let Some(content) = line.strip_prefix("- [ ] ") {
        return LineBlock::TaskItem {
            checked: false,
            content,
        };
    }
    if let Some(content) = line
        .strip_prefix("- [x] ")
        .or_else(|| line.strip_prefix("- [X] "))
    {
        return LineBlock::TaskItem {
            checked: true,
            content,
        };
    }
    if let Some(content) = line.strip_prefix("- ") {
        return LineBlock::ListItem { content };
    }

    if let Some(content) = line.strip_prefix("> ") {
        return LineBlock::Quote { content };
    }
    if line == ">" {
        return LineBlock::Quote { content: "" };
    }

    LineBlock::Paragraph { content: line }
}

/// Collect a fenced code block; an unterminated fence runs to the end
fn scan_code_fence<'t>(lines: &[&'t str], start: usize) -> (LineBlock<'t>, usize) {
    let language = lines[start]
        .trim()
        .strip_prefix("```")
        .and_then(|rest| rest.split_whitespace().next());

    let mut body = Vec::new();
    for (i, line) in lines[start + 1..].iter().enumerate() {
        if line.trim().starts_with("```") {
            return (
                LineBlock::Code {
                    language,
                    body: body.join("\n"),
                },
                start + i + 2,
            );
        }
        body.push(*line);
    }

    (
        LineBlock::Code {
            language,
            body: body.join("\n"),
        },
        lines.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;

    const ID: &str = "11111111-1111-1111-1111-111111111111";

    #[test]
    fn header_then_paragraph() {
        assert_eq!(render_html("# Title\nbody"), "<h1>Title</h1>\n<p>body</p>");
    }

    #[test]
    fn heading_levels() {
        assert_eq!(
            render_html("## Two\n### Three\n#### Four"),
            "<h2>Two</h2>\n<h3>Three</h3>\n<p>#### Four</p>"
        );
    }

    #[test]
    fn list_items_are_wrapped() {
        assert_eq!(
            render_html("- a\n- b\nafter"),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<p>after</p>"
        );
    }

    #[test]
    fn task_items() {
        let html = render_html("- [ ] todo\n- [x] done");
        assert!(html.contains(
            r#"<li class="task-item"><input type="checkbox"><span>todo</span></li>"#
        ));
        assert!(html.contains(
            r#"<li class="task-item checked"><input type="checkbox" checked><span>done</span></li>"#
        ));
        assert!(html.starts_with("<ul>\n"));
        assert!(html.ends_with("\n</ul>"));
    }

    #[test]
    fn quote_rule_and_blank_line() {
        assert_eq!(
            render_html("> said\n\n---"),
            "<blockquote>said</blockquote>\n<br>\n<hr>"
        );
    }

    #[test]
    fn inline_emphasis_and_code() {
        assert_eq!(
            render_html("**b** __B__ *i* _I_ `c`"),
            "<p><strong>b</strong> <strong>B</strong> <em>i</em> <em>I</em> <code>c</code></p>"
        );
    }

    #[test]
    fn snake_case_and_arithmetic_untouched() {
        assert_eq!(render_html("my_var_name"), "<p>my_var_name</p>");
        assert_eq!(render_html("2 * 3 * 4"), "<p>2 * 3 * 4</p>");
    }

    #[test]
    fn code_span_is_not_emphasized() {
        assert_eq!(render_html("`**raw**`"), "<p><code>**raw**</code></p>");
    }

    #[test]
    fn image_path_is_not_emphasized() {
        assert_eq!(
            render_html("![shot](/tmp/my_shot_1.png)"),
            r#"<p><img src="/tmp/my_shot_1.png" alt="shot"></p>"#
        );
    }

    #[test]
    fn note_link_becomes_anchor() {
        let html = render_html(&format!("see [[{ID}|Other]]"));
        assert_eq!(
            html,
            format!(
                r#"<p>see <a href="note://{ID}" class="note-link" data-note-id="{ID}">Other</a></p>"#
            )
        );
    }

    #[test]
    fn video_keeps_marker() {
        assert_eq!(
            render_html("🎬 [clip](file:///tmp/r.mov)"),
            r#"<p>🎬 <a href="file:///tmp/r.mov" class="video-link">clip</a></p>"#
        );
    }

    #[test]
    fn plain_link() {
        assert_eq!(
            render_html("[docs](https://example.com/a_b_c)"),
            r#"<p><a href="https://example.com/a_b_c">docs</a></p>"#
        );
    }

    #[test]
    fn prose_is_escaped() {
        assert_eq!(render_html("a < b & c"), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn fenced_code_block() {
        assert_eq!(
            render_html("```rust\nlet x = a < b;\n**not bold**\n```\nafter"),
            "<pre><code class=\"language-rust\">let x = a &lt; b;\n**not bold**</code></pre>\n<p>after</p>"
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        assert_eq!(
            render_html("```\ncode"),
            "<pre><code>code</code></pre>"
        );
    }

    #[test]
    fn custom_task_classes() {
        let syntax = MarkupSyntax::compile(ConversionConfig {
            task_item_class: "todo".into(),
            task_checked_class: "done".into(),
            ..ConversionConfig::default()
        })
        .unwrap();
        let html = HtmlRenderer::new(&syntax).render("- [x] ship");
        assert!(html.contains(r#"<li class="todo done">"#));
    }
}
