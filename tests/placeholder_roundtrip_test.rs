//! Round-trip and malformed-input coverage for the placeholder codec.

mod common;

use common::{editable, uuid};
use tokenfield::prelude::*;

#[test]
fn test_round_trip_mixed_document() {
    let doc = Document::from_segments(vec![
        Segment::Text("Summarize ".to_string()),
        Segment::Token(Token::with_id(uuid("11"), TokenKind::Standard, "notes.md")),
        Segment::Text(" for ".to_string()),
        Segment::Token(Token::with_id(uuid("22"), TokenKind::Editable, "audience")),
        Segment::Text(" please".to_string()),
    ]);

    let exported = doc.export_placeholders();
    let imported = Document::import_placeholders(&exported, Default::default());
    assert_eq!(imported, doc);
}

#[test]
fn test_round_trip_every_builtin_kind() {
    let kinds = [
        TokenKind::Editable,
        TokenKind::Dismissible,
        TokenKind::Pickable,
        TokenKind::Standard,
        TokenKind::Custom("mention".to_string()),
    ];
    for (i, kind) in kinds.into_iter().enumerate() {
        let doc = Document::from_segments(vec![
            Segment::Text("a ".to_string()),
            Segment::Token(Token::with_id(uuid(&format!("{i}0")), kind, "value")),
            Segment::Text(" z".to_string()),
        ]);
        let round = Document::import_placeholders(&doc.export_placeholders(), Default::default());
        assert_eq!(round, doc);
    }
}

#[test]
fn test_buffer_extraction_round_trip() {
    let doc = Document::from_segments(vec![
        Segment::Text("A ".to_string()),
        Segment::Token(editable("name")),
        Segment::Text(" B ".to_string()),
        Segment::Token(Token::with_id(uuid("33"), TokenKind::Dismissible, "chip")),
    ]);

    let buffer = TokenBuffer::from_document(&doc);
    assert_eq!(buffer.to_document(), doc);
}

#[test]
fn test_export_import_through_buffer_and_codec() {
    // Document -> buffer -> document -> placeholders -> document.
    let doc = Document::from_segments(vec![
        Segment::Text("send to ".to_string()),
        Segment::Token(Token::with_id(uuid("44"), TokenKind::Standard, "Alice")),
    ]);
    let extracted = TokenBuffer::from_document(&doc).to_document();
    let round =
        Document::import_placeholders(&extracted.export_placeholders(), Default::default());
    assert_eq!(round, doc);
}

#[test]
fn test_malformed_placeholders_never_panic_and_stay_literal() {
    let cases = [
        "@{standard:not-a-uuid|value}",
        "@{|}",
        "@{:}",
        "@{standard}",
        "{{}}",
        "{{ }}",
        "@{standard:00000000-0000-0000-0000-000000000001}",
        "@{standard:00000000-0000-0000-0000-000000000001|}",
        "text with { stray } braces | pipes % percents",
        "{{unterminated",
        "@{unterminated",
    ];
    for input in cases {
        let doc = Document::import_placeholders(input, Default::default());
        assert_eq!(
            doc.segments(),
            &[Segment::Text(input.to_string())],
            "expected literal fallback for {input:?}"
        );
    }
}

#[test]
fn test_omit_strategy_drops_malformed_placeholders() {
    let doc = Document::import_placeholders(
        "before @{standard:not-a-uuid|value} after",
        UnknownPlaceholderStrategy::Omit,
    );
    assert_eq!(doc.segments(), &[Segment::Text("before  after".to_string())]);
}

#[test]
fn test_legacy_and_unified_forms_in_one_string() {
    let input = format!(
        "{{{{name}}}} and @{{standard:{}|notes.md}}",
        uuid("55")
    );
    let doc = Document::import_placeholders(&input, Default::default());

    let tokens: Vec<&Token> = doc.tokens().collect();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Editable);
    assert_eq!(tokens[0].display, "name");
    assert_eq!(tokens[1].kind, TokenKind::Standard);
    assert_eq!(tokens[1].display, "notes.md");
}

#[test]
fn test_legacy_editable_export_round_trips_by_name() {
    let doc = Document::from_segments(vec![
        Segment::Text("Hi ".to_string()),
        Segment::Token(editable("name")),
    ]);

    let exported = doc.export_placeholders_legacy_editable();
    assert_eq!(exported, "Hi {{name}}");

    // The legacy form keeps the name and kind but not the id.
    let imported = Document::import_placeholders(&exported, Default::default());
    let token = imported.tokens().next().unwrap();
    assert_eq!(token.kind, TokenKind::Editable);
    assert_eq!(token.display, "name");
}

#[test]
fn test_unicode_display_round_trips() {
    let doc = Document::from_segments(vec![Segment::Token(Token::with_id(
        uuid("66"),
        TokenKind::Standard,
        "héllo wörld — ünïcode",
    ))]);
    let round = Document::import_placeholders(&doc.export_placeholders(), Default::default());
    assert_eq!(round, doc);
}
