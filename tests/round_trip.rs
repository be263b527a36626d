use quicknote::{
    ContentElement, DocumentParser, DocumentStore, Vault, parse, parse_elements, reduce_html,
    render_html, resolve_references,
    repo::memory::{MemoryAttachmentStore, MemoryDocumentStore},
};
use std::sync::Arc;
use uuid::Uuid;

const ID: &str = "11111111-1111-1111-1111-111111111111";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn round_trip(text: &str) -> String {
    reduce_html(&render_html(text))
}

fn canonical_documents() -> Vec<String> {
    vec![
        "# Title\nbody".to_string(),
        format!("Look at this:\n![](file:///tmp/a.png)\nand [[{ID}|other note]] too"),
        format!(
            "## Shots\n![first](file:///tmp/a.png)\n🎬 [demo](/tmp/demo.mov)\n\n> quoted [[{ID}|Ref]]\n---\n- item **bold**\n- [ ] todo *soon*\n- [x] done `code`"
        ),
        "### Math\na < b & c > d".to_string(),
        "```\nlet a = 1;\n```\nafter the fence".to_string(),
        format!("[[{ID}|one]][[{ID}|two]]![](/tmp/x y.png)"),
        "paragraph one\n\nparagraph two".to_string(),
        "see [the docs](https://example.com/a_b) for my_var_name".to_string(),
        format!("plain [x](note://{ID}) is not a note link"),
    ]
}

#[test]
fn round_trip_preserves_elements() {
    init_logging();
    for text in canonical_documents() {
        let reduced = round_trip(&text);
        assert_eq!(
            parse_elements(&reduced),
            parse_elements(&text),
            "round trip of {text:?} gave {reduced:?}"
        );
    }
}

#[test]
fn round_trip_is_exact_for_normalised_text() {
    for text in canonical_documents() {
        assert_eq!(round_trip(&text), text);
    }
}

#[test]
fn underscore_emphasis_normalises_to_stars() {
    assert_eq!(round_trip("__bold__ and _soft_"), "**bold** and *soft*");
}

#[test]
fn whitespace_is_normalised() {
    assert_eq!(round_trip("\n\na\n\n\n\nb\n\n"), "a\n\nb");
}

#[test]
fn lossless_partition_over_fragment_combinations() {
    let fragments = [
        String::new(),
        "plain ".to_string(),
        "ünïcødé ".to_string(),
        "![alt](file:///tmp/a.png)".to_string(),
        "🎬 [rec](/tmp/r.mov)".to_string(),
        format!("[[{ID}|link]]"),
        "[[broken|link]]".to_string(),
        "![unterminated(".to_string(),
        "\n".to_string(),
        "🎬".to_string(),
    ];

    for a in &fragments {
        for b in &fragments {
            for c in &fragments {
                let text = format!("{a}{b}{c}");
                let parsed = parse(&text);
                assert!(!parsed.is_empty());

                let rebuilt: String = parsed
                    .iter()
                    .map(|p| p.span.slice(&text).expect("span on char boundary"))
                    .collect();
                assert_eq!(rebuilt, text);
                assert_eq!(parse(&text), parsed);
            }
        }
    }
}

#[test]
fn mixed_content_scenario() {
    let text = format!("Look at this:\n![](file:///tmp/a.png)\nand [[{ID}|other note]] too");
    assert_eq!(
        DocumentParser::new().elements(&text),
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
fn header_render_scenario() {
    let html = render_html("# Title\nbody");
    let heading = html.find("<h1>Title</h1>").expect("heading rendered");
    let body = html.find("<p>body</p>").expect("paragraph rendered");
    assert!(heading < body);
}

#[test]
fn task_item_reduce_scenario() {
    let html = r#"<li class="task-item checked"><input type="checkbox" checked><span>Buy milk</span></li>"#;
    assert_eq!(reduce_html(html), "- [x] Buy milk");
}

#[test]
fn empty_document_scenario() {
    assert_eq!(parse_elements(""), vec![ContentElement::text("")]);
}

#[test]
fn resolver_excludes_self_and_dangling_links() {
    init_logging();
    let me = Uuid::new_v4();
    let known = Uuid::new_v4();
    let missing = Uuid::new_v4();

    let store = MemoryDocumentStore::new();
    store.insert(me, "");
    store.insert(known, "");

    let text = format!("[[{me}|self]] [[{known}|known]] [[{missing}|missing]]");
    let resolved = resolve_references(me, &text, &store);
    assert_eq!(resolved.note_targets, vec![known]);
}

#[test]
fn vault_follows_edits_made_in_the_editor() {
    init_logging();
    let documents = Arc::new(MemoryDocumentStore::new());
    let attachments = Arc::new(MemoryAttachmentStore::new());
    let vault = Vault::new(documents.clone(), attachments.clone());

    let note = Uuid::new_v4();
    let target = Uuid::new_v4();
    documents.insert(target, "target note");

    let original = format!("- [ ] ask [[{target}|Target]]");
    documents.insert(note, original.clone());
    vault.save(&note.to_string(), &original).unwrap();
    assert_eq!(
        vault.backlinks_for(&target.to_string()).unwrap(),
        vec![note.to_string()]
    );

    // The editor drops the link and checks the item off.
    let edited_html = r#"<ul><li class="task-item checked"><input type="checkbox" checked><span>ask later</span></li></ul>"#;
    let edited = reduce_html(edited_html);
    assert_eq!(edited, "- [x] ask later");

    documents.insert(note, edited.clone());
    vault.save(&note.to_string(), &edited).unwrap();
    assert!(vault.backlinks_for(&target.to_string()).unwrap().is_empty());
    assert!(documents.exists(note.to_string()));
}
