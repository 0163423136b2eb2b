//! Token identity, kinds, and presentation hints.
//!
//! A [`Token`] is the atomic unit the editor refuses to split: a stable id,
//! a behavior tag, the text currently rendered for it, and a string-keyed
//! metadata map carrying its semantic payload.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

/// Determines how a token interacts with the user inside the editor.
///
/// The four well-known kinds cover the built-in behaviors; applications can
/// define their own tags via [`TokenKind::Custom`]. Parsing normalizes the
/// well-known names, so `TokenKind::from("editable") == TokenKind::Editable`.
///
/// - `Editable`: activating the token opens an inline edit of its value.
/// - `Dismissible`: read-only pill with a dismiss affordance.
/// - `Pickable`: activating invokes a host-defined picker that supplies the value.
/// - `Standard`: read-only pill with no interactive affordances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenKind {
    Editable,
    Dismissible,
    Pickable,
    Standard,
    /// Application-defined kind tag.
    Custom(String),
}

impl TokenKind {
    /// The wire tag for this kind, as used in placeholder serialization.
    pub fn as_str(&self) -> &str {
        match self {
            TokenKind::Editable => "editable",
            TokenKind::Dismissible => "dismissible",
            TokenKind::Pickable => "pickable",
            TokenKind::Standard => "standard",
            TokenKind::Custom(tag) => tag,
        }
    }
}

impl From<&str> for TokenKind {
    fn from(tag: &str) -> Self {
        match tag {
            "editable" => TokenKind::Editable,
            "dismissible" => TokenKind::Dismissible,
            "pickable" => TokenKind::Pickable,
            "standard" => TokenKind::Standard,
            other => TokenKind::Custom(other.to_string()),
        }
    }
}

impl From<String> for TokenKind {
    fn from(tag: String) -> Self {
        TokenKind::from(tag.as_str())
    }
}

impl From<TokenKind> for String {
    fn from(kind: TokenKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual appearance overrides for a token pill.
///
/// Every field is a hint the render collaborator may interpret; `None` falls
/// back to whatever default the host resolves for the token's kind. Styles
/// are runtime-only and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenStyle {
    /// Foreground color name or hex value, host-interpreted.
    pub text_color: Option<String>,
    /// Background color name or hex value, host-interpreted.
    pub background_color: Option<String>,
    /// Icon reference drawn before the token text.
    pub icon: Option<String>,
    /// Horizontal padding in display cells.
    pub horizontal_padding: Option<u8>,
    /// Vertical padding in display cells.
    pub vertical_padding: Option<u8>,
}

/// An atomic, structured token embedded in the input buffer.
///
/// `id` is generated once and preserved across edits. `display` is the text
/// the editor currently renders for the token; it is never empty while the
/// token is attached to a buffer (an empty editable token falls back to its
/// placeholder text). `metadata` carries the semantic payload: `placeholder`
/// and `key` describe an editable token's slot, `value` its resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: Uuid,
    pub kind: TokenKind,
    pub display: String,
    /// Presentation override. Transient: skipped by serialization.
    #[serde(skip)]
    pub style: Option<TokenStyle>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Token {
    /// Create a token with a fresh random id and no metadata.
    pub fn new(kind: TokenKind, display: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            display: display.into(),
            style: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Create a token with an explicit id (used by the placeholder codec).
    pub fn with_id(id: Uuid, kind: TokenKind, display: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            display: display.into(),
            style: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builder-style presentation override.
    pub fn with_style(mut self, style: TokenStyle) -> Self {
        self.style = Some(style);
        self
    }

    fn trimmed_non_empty(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|s| !s.is_empty())
    }

    /// Placeholder text shown while an editable token has no value.
    ///
    /// Resolved from metadata `placeholder`, falling back to `key`.
    /// Non-editable tokens have no placeholder.
    pub fn placeholder_text(&self) -> Option<&str> {
        if self.kind != TokenKind::Editable {
            return None;
        }
        Self::trimmed_non_empty(self.metadata.get("placeholder").map(String::as_str))
            .or_else(|| Self::trimmed_non_empty(self.metadata.get("key").map(String::as_str)))
    }

    /// The value an editable token has resolved to, if any.
    ///
    /// Metadata `value` wins; otherwise the display text counts as the value
    /// unless it still equals the placeholder.
    pub fn resolved_value(&self) -> Option<&str> {
        if self.kind != TokenKind::Editable {
            return None;
        }
        if let Some(value) = Self::trimmed_non_empty(self.metadata.get("value").map(String::as_str))
        {
            return Some(value);
        }
        let display = Self::trimmed_non_empty(Some(self.display.as_str()))?;
        if self.placeholder_text() == Some(display) {
            return None;
        }
        Some(display)
    }

    /// Whether an editable token has been given a value.
    pub fn is_resolved(&self) -> bool {
        self.resolved_value().is_some()
    }

    /// Text to render for the token: resolved value, then placeholder,
    /// then the literal `"variable"` fallback for blank editable tokens.
    pub fn effective_display(&self) -> String {
        if let Some(value) = self.resolved_value() {
            return value.to_string();
        }
        if let Some(placeholder) = self.placeholder_text() {
            return placeholder.to_string();
        }
        if self.display.trim().is_empty() && self.kind == TokenKind::Editable {
            return "variable".to_string();
        }
        self.display.clone()
    }

    /// Display width of the token text in terminal cells.
    pub fn display_width(&self) -> usize {
        UnicodeWidthStr::width(self.display.as_str())
    }
}
