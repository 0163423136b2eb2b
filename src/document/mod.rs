//! Structured document model: ordered text and token segments.
//!
//! A [`Document`] is the persistent, platform-independent form of the input
//! buffer. It owns its segments exclusively; nothing in the crate holds a
//! back-reference into host UI objects. Construction and mutation keep the
//! invariant that adjacent text segments are always merged, so serialization
//! is deterministic and round-trip-stable.

pub mod placeholder;
pub mod token;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub use placeholder::UnknownPlaceholderStrategy;
pub use token::{Token, TokenKind, TokenStyle};

/// One run of document content: plain text or an atomic token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Text(String),
    Token(Token),
}

/// An ordered sequence of segments.
///
/// # Examples
///
/// ```
/// use tokenfield::document::{Document, Token, TokenKind};
///
/// let mut doc = Document::new();
/// doc.push_text("Hello ");
/// doc.push_token(Token::new(TokenKind::Standard, "world"));
/// assert_eq!(doc.segments().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.segments.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Re-apply the merged-text invariant on load.
        let segments = Vec::<Segment>::deserialize(deserializer)?;
        Ok(Document::from_segments(segments))
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from segments, merging adjacent text runs and
    /// dropping empty text.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut doc = Self::new();
        for segment in segments {
            match segment {
                Segment::Text(text) => doc.push_text(text),
                Segment::Token(token) => doc.push_token(token),
            }
        }
        doc
    }

    /// The document's segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append text, coalescing with a trailing text segment. Empty text is
    /// ignored so the merged-text invariant holds.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(existing)) = self.segments.last_mut() {
            existing.push_str(&text);
        } else {
            self.segments.push(Segment::Text(text));
        }
    }

    /// Append a token segment.
    pub fn push_token(&mut self, token: Token) {
        self.segments.push(Segment::Token(token));
    }

    /// Iterate the document's tokens in order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Token(token) => Some(token),
            Segment::Text(_) => None,
        })
    }

    /// Flatten to plain text; each token contributes its display text.
    pub fn plain_text(&self) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Token(token) => output.push_str(&token.display),
            }
        }
        output
    }
}

impl From<Vec<Segment>> for Document {
    fn from(segments: Vec<Segment>) -> Self {
        Self::from_segments(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_text_merges_adjacent_runs() {
        let mut doc = Document::new();
        doc.push_text("Hello");
        doc.push_text(", ");
        doc.push_text("world");
        assert_eq!(
            doc.segments(),
            &[Segment::Text("Hello, world".to_string())]
        );
    }

    #[test]
    fn test_push_text_ignores_empty() {
        let mut doc = Document::new();
        doc.push_text("");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_from_segments_coalesces() {
        let doc = Document::from_segments(vec![
            Segment::Text("a".to_string()),
            Segment::Text("b".to_string()),
            Segment::Token(Token::new(TokenKind::Standard, "t")),
            Segment::Text("c".to_string()),
            Segment::Text("".to_string()),
            Segment::Text("d".to_string()),
        ]);
        assert_eq!(doc.segments().len(), 3);
        assert_eq!(doc.segments()[0], Segment::Text("ab".to_string()));
        assert_eq!(doc.segments()[2], Segment::Text("cd".to_string()));
    }

    #[test]
    fn test_plain_text_uses_token_display() {
        let mut doc = Document::new();
        doc.push_text("Run ");
        doc.push_token(Token::new(TokenKind::Standard, "cmd"));
        assert_eq!(doc.plain_text(), "Run cmd");
    }

    #[test]
    fn test_serde_round_trip_restores_merge_invariant() {
        let mut doc = Document::new();
        doc.push_text("Hi ");
        doc.push_token(Token::new(TokenKind::Editable, "name"));

        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);

        // Hand-written JSON with split text runs is merged on load.
        let split = r#"[{"text":"a"},{"text":"b"}]"#;
        let merged: Document = serde_json::from_str(split).unwrap();
        assert_eq!(merged.segments(), &[Segment::Text("ab".to_string())]);
    }
}
