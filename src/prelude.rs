//! Prelude module for convenient imports.
//!
//! Re-exports the types most hosts need to wire up an input field:
//!
//! ```ignore
//! use tokenfield::prelude::*;
//! ```

// Document model and codec
pub use crate::document::{
    Document, Segment, Token, TokenKind, TokenStyle, UnknownPlaceholderStrategy,
};

// Buffer and spans
pub use crate::buffer::{TokenBuffer, TokenSpan, EMPTY_TOKEN_SENTINEL};

// Triggers
pub use crate::trigger::detection::{detect_active_trigger, ActiveTrigger};
pub use crate::trigger::{
    PanelSizing, TriggerAction, TriggerContext, TriggerDefinition, TriggerEvent, TriggerHighlight,
};

// Suggestions
pub use crate::suggest::{Suggestion, SuggestionListState, SuggestionSection};

// Session
pub use crate::session::{
    ComposerConfig, ComposerSession, DirectionalKey, EditingContext, TokenEditState,
};

// Host interfaces and errors
pub use crate::error::ConfigError;
pub use crate::traits::SuggestionPanel;
