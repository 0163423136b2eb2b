//! Per-session editing state: one buffer, one suggestion list, one edit.
//!
//! A [`ComposerSession`] owns everything a single input field needs: the
//! token buffer, the current selection, the suggestion list state, the
//! token-editing state machine, and the registered triggers. Sessions never
//! share state, so multiple fields in one process cannot interfere with
//! each other. All operations are synchronous; every public mutation is one
//! atomic state transition with no intermediate observable state.

mod editing;
mod suggestions;

use std::fmt;
use std::ops::Range;

use tracing::trace;

use crate::buffer::TokenBuffer;
use crate::document::{Document, Token, TokenKind, TokenStyle};
use crate::error::ConfigError;
use crate::suggest::SuggestionListState;
use crate::traits::SuggestionPanel;
use crate::trigger::detection::ActiveTrigger;
use crate::trigger::{PanelSizing, TriggerDefinition, TriggerHighlight};

pub use editing::{EditingContext, TokenEditState};

type TokenStyleProvider = Box<dyn Fn(&TokenKind) -> TokenStyle>;
type DismissCallback = Box<dyn Fn(&Token)>;

/// Host configuration for a session.
pub struct ComposerConfig {
    pub(crate) triggers: Vec<TriggerDefinition>,
    /// Panel sizing used when a trigger does not specify its own.
    pub default_panel_sizing: PanelSizing,
    /// Enables Tab / Shift-Tab cycling across unresolved editable tokens.
    pub token_tab_navigation: bool,
    pub(crate) default_token_style: Option<TokenStyleProvider>,
    pub(crate) on_token_dismissed: Option<DismissCallback>,
}

impl ComposerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger character. Call once per trigger.
    pub fn trigger(mut self, definition: TriggerDefinition) -> Self {
        self.triggers.push(definition);
        self
    }

    pub fn default_panel_sizing(mut self, sizing: PanelSizing) -> Self {
        self.default_panel_sizing = sizing.clamped();
        self
    }

    pub fn token_tab_navigation(mut self, enabled: bool) -> Self {
        self.token_tab_navigation = enabled;
        self
    }

    /// Provide a default [`TokenStyle`] for inserted tokens based on their
    /// kind. Tokens with an explicit style are not affected.
    pub fn default_token_style(mut self, provider: impl Fn(&TokenKind) -> TokenStyle + 'static) -> Self {
        self.default_token_style = Some(Box::new(provider));
        self
    }

    /// Called after a dismissible token is removed.
    pub fn on_token_dismissed(mut self, callback: impl Fn(&Token) + 'static) -> Self {
        self.on_token_dismissed = Some(Box::new(callback));
        self
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            triggers: Vec::new(),
            default_panel_sizing: PanelSizing::default(),
            token_tab_navigation: true,
            default_token_style: None,
            on_token_dismissed: None,
        }
    }
}

impl fmt::Debug for ComposerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerConfig")
            .field("triggers", &self.triggers)
            .field("default_panel_sizing", &self.default_panel_sizing)
            .field("token_tab_navigation", &self.token_tab_navigation)
            .finish_non_exhaustive()
    }
}

/// Keys the suggestion flow consumes while a trigger is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionalKey {
    Up,
    Down,
    Confirm,
    Escape,
}

/// One editing session over one buffer.
pub struct ComposerSession {
    config: ComposerConfig,
    buffer: TokenBuffer,
    selection: Range<usize>,
    suggestions: SuggestionListState,
    edit_state: TokenEditState,
    panel: Option<Box<dyn SuggestionPanel>>,
    active_trigger: Option<ActiveTrigger>,
    trigger_highlight: Option<TriggerHighlight>,
    last_trigger_character: Option<char>,
}

impl ComposerSession {
    /// Create a session. Fails if two triggers register the same character,
    /// since detection could not pick between them deterministically.
    pub fn new(config: ComposerConfig) -> Result<Self, ConfigError> {
        for (i, trigger) in config.triggers.iter().enumerate() {
            if config.triggers[..i]
                .iter()
                .any(|other| other.character == trigger.character)
            {
                return Err(ConfigError::DuplicateTrigger {
                    character: trigger.character,
                });
            }
        }

        Ok(Self {
            config,
            buffer: TokenBuffer::new(),
            selection: 0..0,
            suggestions: SuggestionListState::new(),
            edit_state: TokenEditState::Idle,
            panel: None,
            active_trigger: None,
            trigger_highlight: None,
            last_trigger_character: None,
        })
    }

    /// Attach the host's suggestion panel.
    pub fn with_panel(mut self, panel: Box<dyn SuggestionPanel>) -> Self {
        self.panel = Some(panel);
        self
    }

    /// Replace the buffer contents with a document; caret moves to the end.
    pub fn load_document(&mut self, document: &Document) {
        self.buffer = TokenBuffer::from_document(document);
        let end = self.buffer.char_len();
        self.selection = end..end;
        self.edit_state = TokenEditState::Idle;
        self.refresh_suggestions();
    }

    /// Extract the current buffer contents as a document.
    pub fn document(&self) -> Document {
        self.buffer.to_document()
    }

    pub fn buffer(&self) -> &TokenBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn suggestions(&self) -> &SuggestionListState {
        &self.suggestions
    }

    pub fn active_trigger(&self) -> Option<&ActiveTrigger> {
        self.active_trigger.as_ref()
    }

    /// The active trigger's text range for host-side highlighting, present
    /// while suggestions are showing.
    pub fn trigger_highlight(&self) -> Option<&TriggerHighlight> {
        self.trigger_highlight.as_ref()
    }

    /// Move the selection. The proposal is routed through the token-aware
    /// range engine so neither boundary can come to rest inside a token;
    /// leaving an actively edited token commits the edit.
    pub fn set_selection(&mut self, proposed: Range<usize>) {
        let old = self.selection.clone();
        self.selection = self.buffer.adjust_selection(&old, &proposed);
        trace!(?proposed, adjusted = ?self.selection, "selection changed");
        self.handle_selection_changed();
    }

    /// Insert text at the selection, replacing it if non-empty. A non-empty
    /// selection swallows whole tokens (the range engine expands it first).
    /// An active token edit is committed before the buffer changes.
    pub fn insert_text(&mut self, text: &str) {
        self.commit_edit_preserving_caret();
        let target = self.selection.clone();
        let target = if target.is_empty() {
            target
        } else {
            self.buffer.expand_delete_range(&target)
        };
        let replaced = self.buffer.replace_range(target, text);
        let caret = replaced.start + text.chars().count();
        self.selection = caret..caret;
        self.refresh_suggestions();
    }

    /// Delete one unit before the caret, or the selection if non-empty.
    /// Deleting into a token removes the whole token.
    pub fn delete_backward(&mut self) {
        let selection = self.selection.clone();
        let target = if selection.is_empty() {
            if selection.start == 0 {
                return;
            }
            selection.start - 1..selection.start
        } else {
            selection
        };
        self.delete_range(target);
    }

    /// Delete a range, expanded so it never bisects a token. An active
    /// token edit is committed first.
    pub fn delete_range(&mut self, range: Range<usize>) {
        self.commit_edit_preserving_caret();
        let expanded = self.buffer.expand_delete_range(&range);
        if expanded.is_empty() {
            return;
        }
        self.buffer.replace_range(expanded.clone(), "");
        self.selection = expanded.start..expanded.start;
        self.refresh_suggestions();
    }

    /// Reset to an empty buffer.
    pub fn clear(&mut self) {
        self.load_document(&Document::new());
    }

    fn handle_selection_changed(&mut self) {
        // Leaving the edited token's range (other than resting exactly on
        // one of its boundaries) commits the edit.
        let should_commit = match &self.edit_state {
            TokenEditState::Editing(context) => {
                let selection = &self.selection;
                let range = &context.range;
                let intersects = selection.start < range.end && selection.end > range.start;
                let at_boundary = selection.is_empty()
                    && (selection.start == range.start || selection.start == range.end);
                !intersects && !at_boundary
            }
            TokenEditState::Idle => false,
        };

        if should_commit {
            self.commit_edit_preserving_caret();
        }
        self.refresh_suggestions();
    }
}

impl fmt::Debug for ComposerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerSession")
            .field("text", &self.buffer.text())
            .field("selection", &self.selection)
            .field("edit_state", &self.edit_state)
            .field("active_trigger", &self.active_trigger)
            .finish_non_exhaustive()
    }
}
