//! Placeholder codec: plain-text serialization of documents.
//!
//! Two delimiter shapes are recognized:
//!
//! - Unified: `@{kind:uuid|display}` — `kind` and `display` are
//!   percent-encoded; the uuid keeps token identity across round trips.
//! - Legacy variable: `{{name}}` — an editable token by its name only.
//!
//! Import is a single left-to-right scan. A match is consumed only if its
//! payload parses into a well-formed token; otherwise the literal text is
//! preserved (or dropped, per [`UnknownPlaceholderStrategy`]). Unterminated
//! delimiters are never partially consumed, and nothing here panics or
//! surfaces an error to the caller.

use thiserror::Error;
use uuid::Uuid;

use super::token::{Token, TokenKind};
use super::Document;

/// What to do with text that looks like a placeholder but does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPlaceholderStrategy {
    /// Keep the literal text in the document (default).
    #[default]
    PreserveLiteralText,
    /// Drop the malformed placeholder entirely.
    Omit,
}

/// Why a placeholder payload was rejected. Recovered locally into the
/// literal-text fallback; never surfaced to callers.
#[derive(Debug, Error)]
pub(crate) enum PlaceholderError {
    #[error("payload is missing the kind:id separator")]
    MissingKind,
    #[error("payload is missing the id|display separator")]
    MissingDisplay,
    #[error("invalid token id: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("component is not valid percent-encoding")]
    InvalidEncoding,
    #[error("component is blank after decoding")]
    BlankComponent,
}

impl Document {
    /// Export to the placeholder-backed plain string.
    ///
    /// Text segments are emitted verbatim; every token becomes the unified
    /// `@{kind:uuid|display}` form, which preserves token identity so that
    /// [`Document::import_placeholders`] reconstructs an equal document.
    pub fn export_placeholders(&self) -> String {
        self.export_with(false)
    }

    /// Export like [`Document::export_placeholders`], except editable
    /// tokens serialize in the legacy `{{name}}` form for consumers of the
    /// older variable syntax. The name is the first non-blank of display,
    /// metadata `value`, `key`, `placeholder`. Token ids are not preserved
    /// for editable tokens in this form.
    pub fn export_placeholders_legacy_editable(&self) -> String {
        self.export_with(true)
    }

    fn export_with(&self, legacy_editable: bool) -> String {
        let mut output = String::new();
        output.reserve(
            self.segments()
                .iter()
                .map(|segment| match segment {
                    super::Segment::Text(text) => text.len(),
                    super::Segment::Token(token) => token.display.len() + 16,
                })
                .sum(),
        );

        for segment in self.segments() {
            match segment {
                super::Segment::Text(text) => output.push_str(text),
                super::Segment::Token(token) => {
                    output.push_str(&placeholder_for(token, legacy_editable));
                }
            }
        }
        output
    }

    /// Parse a placeholder-backed plain string into a document.
    pub fn import_placeholders(input: &str, strategy: UnknownPlaceholderStrategy) -> Document {
        Self::import_placeholders_with(input, strategy, |token| token)
    }

    /// Parse placeholders, passing each recognized token through `factory`
    /// so hosts can reattach presentation (e.g. a style per kind) during
    /// import.
    pub fn import_placeholders_with(
        input: &str,
        strategy: UnknownPlaceholderStrategy,
        factory: impl Fn(Token) -> Token,
    ) -> Document {
        let mut doc = Document::new();
        let mut text_buffer = String::new();
        let mut cursor = 0usize;

        let preserve_unknown = |buffer: &mut String, literal: &str| {
            if strategy == UnknownPlaceholderStrategy::PreserveLiteralText {
                buffer.push_str(literal);
            }
        };

        while cursor < input.len() {
            let rest = &input[cursor..];

            if rest.starts_with("{{") {
                if let Some(end) = rest[2..].find("}}") {
                    let payload = &rest[2..2 + end];
                    let literal = &rest[..2 + end + 2];
                    match legacy_token(payload) {
                        Ok(token) => {
                            flush_text(&mut doc, &mut text_buffer);
                            doc.push_token(factory(token));
                        }
                        Err(err) => {
                            tracing::trace!(payload, %err, "legacy placeholder rejected");
                            preserve_unknown(&mut text_buffer, literal);
                        }
                    }
                    cursor += literal.len();
                    continue;
                }
            }

            if rest.starts_with("@{") {
                if let Some(end) = rest[2..].find('}') {
                    let payload = &rest[2..2 + end];
                    let literal = &rest[..2 + end + 1];
                    match typed_token(payload) {
                        Ok(token) => {
                            flush_text(&mut doc, &mut text_buffer);
                            doc.push_token(factory(token));
                        }
                        Err(err) => {
                            tracing::trace!(payload, %err, "typed placeholder rejected");
                            preserve_unknown(&mut text_buffer, literal);
                        }
                    }
                    cursor += literal.len();
                    continue;
                }
            }

            // Plain character (or an unterminated delimiter prefix).
            if let Some(ch) = rest.chars().next() {
                text_buffer.push(ch);
                cursor += ch.len_utf8();
            }
        }

        flush_text(&mut doc, &mut text_buffer);
        doc
    }
}

fn flush_text(doc: &mut Document, buffer: &mut String) {
    if !buffer.is_empty() {
        doc.push_text(std::mem::take(buffer));
    }
}

fn placeholder_for(token: &Token, legacy_editable: bool) -> String {
    if legacy_editable && token.kind == TokenKind::Editable {
        let name = trimmed_non_empty(&token.display)
            .or_else(|| token.metadata.get("value").and_then(|v| trimmed_non_empty(v)))
            .or_else(|| token.metadata.get("key").and_then(|v| trimmed_non_empty(v)))
            .or_else(|| {
                token
                    .metadata
                    .get("placeholder")
                    .and_then(|v| trimmed_non_empty(v))
            })
            .unwrap_or("variable");
        return format!("{{{{{}}}}}", encode_component(name));
    }

    let name = trimmed_non_empty(&token.display).unwrap_or_else(|| token.kind.as_str());
    format!(
        "@{{{}:{}|{}}}",
        encode_component(token.kind.as_str()),
        token.id,
        encode_component(name)
    )
}

fn legacy_token(payload: &str) -> Result<Token, PlaceholderError> {
    let name = decode_component(payload)?;
    Ok(Token::new(TokenKind::Editable, name.clone()).with_metadata("key", name))
}

fn typed_token(payload: &str) -> Result<Token, PlaceholderError> {
    let (kind_part, body) = payload.split_once(':').ok_or(PlaceholderError::MissingKind)?;
    let (id_part, display_part) = body.split_once('|').ok_or(PlaceholderError::MissingDisplay)?;

    let kind_tag = decode_component(kind_part)?;
    let id = Uuid::parse_str(id_part.trim())?;
    let display = decode_component(display_part)?;

    // Legacy type tags carry their id in metadata so round-trips through
    // the older formats keep useful info.
    let token = match kind_tag.as_str() {
        "file" => Token::with_id(id, TokenKind::Standard, display)
            .with_metadata("suggestionID", id.to_string()),
        "command" => Token::with_id(id, TokenKind::Standard, display)
            .with_metadata("commandID", id.to_string()),
        tag => Token::with_id(id, TokenKind::from(tag), display),
    };
    Ok(token)
}

fn trimmed_non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn encode_component(value: &str) -> String {
    // Encodes everything outside [A-Za-z0-9_.~-], which covers the
    // reserved set `{ } | %` plus URL-query-unsafe characters.
    urlencoding::encode(value).into_owned()
}

fn decode_component(value: &str) -> Result<String, PlaceholderError> {
    // Every '%' must introduce a two-digit hex escape; a lone or malformed
    // escape rejects the whole component.
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len()
                || !bytes[i + 1].is_ascii_hexdigit()
                || !bytes[i + 2].is_ascii_hexdigit()
            {
                return Err(PlaceholderError::InvalidEncoding);
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let decoded = urlencoding::decode(value).map_err(|_| PlaceholderError::InvalidEncoding)?;
    trimmed_non_empty(&decoded)
        .map(str::to_string)
        .ok_or(PlaceholderError::BlankComponent)
}
