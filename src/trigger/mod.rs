//! Trigger definitions and the callback surface exposed to host code.
//!
//! A trigger is a character (`@`, `/`, `#`, ...) that activates the
//! suggestion flow when typed near the caret. Each [`TriggerDefinition`]
//! owns its suggestion provider, selection handler, and optional lifecycle
//! callback; the session evaluates them via [`detection`].

pub mod detection;

use std::fmt;
use std::ops::Range;

use unicode_width::UnicodeWidthStr;

use crate::document::Token;
use crate::suggest::Suggestion;

/// Immutable snapshot of an active trigger, passed to host callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    /// The character that activated the trigger.
    pub character: char,
    /// Text typed after the trigger character.
    pub query: String,
    /// Full buffer text at evaluation time.
    pub text: String,
    /// Char range covering the trigger character plus query.
    pub replacement_range: Range<usize>,
    /// The selection at evaluation time.
    pub selection: Range<usize>,
}

/// What to do when the user selects a suggestion.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerAction {
    /// Replace the trigger text with a token pill.
    InsertToken(Token),
    /// Replace the trigger text with plain text.
    InsertText(String),
    /// Remove the trigger text without inserting anything.
    Dismiss,
    /// Leave the trigger text as-is.
    None,
}

/// Lifecycle notifications fired by the trigger system for custom host UI.
#[derive(Debug, Clone)]
pub enum TriggerEvent {
    /// The trigger character was detected near the caret.
    Activated(TriggerContext),
    /// The query text after the trigger character changed.
    QueryChanged(TriggerContext),
    /// The trigger is no longer active.
    Deactivated,
}

/// The active trigger's text range, exposed so the render collaborator can
/// highlight the marker and query while suggestions are showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerHighlight {
    pub range: Range<usize>,
    pub character: char,
    pub has_query: bool,
}

/// Suggestion panel dimensions in terminal cells, passed through to the
/// host. The core never computes screen geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSizing {
    /// Fixed width of the panel in standard mode.
    pub standard_width: u16,
    /// Maximum visible rows in standard mode.
    pub standard_max_rows: u16,
    /// Fixed width of the panel in compact (single-line row) mode.
    pub compact_width: u16,
    /// Maximum visible rows in compact mode.
    pub compact_max_rows: u16,
}

impl PanelSizing {
    /// The smallest width the panel will accept (applied via `clamped`).
    pub const MINIMUM_WIDTH: u16 = 24;
    /// The smallest row count the panel will accept (applied via `clamped`).
    pub const MINIMUM_ROWS: u16 = 3;

    pub fn width_for(&self, is_compact: bool) -> u16 {
        if is_compact {
            self.compact_width
        } else {
            self.standard_width
        }
    }

    pub fn max_rows_for(&self, is_compact: bool) -> u16 {
        if is_compact {
            self.compact_max_rows
        } else {
            self.standard_max_rows
        }
    }

    /// Sizing with the minimums enforced.
    pub fn clamped(self) -> Self {
        Self {
            standard_width: self.standard_width.max(Self::MINIMUM_WIDTH),
            standard_max_rows: self.standard_max_rows.max(Self::MINIMUM_ROWS),
            compact_width: self.compact_width.max(Self::MINIMUM_WIDTH),
            compact_max_rows: self.compact_max_rows.max(Self::MINIMUM_ROWS),
        }
    }

    /// Width that fits the widest suggestion row, clamped between the
    /// minimum and the configured width for the mode.
    pub fn fitted_width(&self, items: &[Suggestion], is_compact: bool) -> u16 {
        let content = items
            .iter()
            .map(|item| {
                let title = UnicodeWidthStr::width(item.title.as_str());
                let subtitle = item
                    .subtitle
                    .as_deref()
                    .map(UnicodeWidthStr::width)
                    .unwrap_or(0);
                // icon cell + gap + title + separator + subtitle
                2 + title + if subtitle > 0 { 3 + subtitle } else { 0 }
            })
            .max()
            .unwrap_or(0) as u16;
        let max = self.width_for(is_compact).max(Self::MINIMUM_WIDTH);
        content
            .saturating_add(4) // borders + padding
            .clamp(Self::MINIMUM_WIDTH, max)
    }
}

impl Default for PanelSizing {
    fn default() -> Self {
        Self {
            standard_width: 50,
            standard_max_rows: 7,
            compact_width: 30,
            compact_max_rows: 9,
        }
    }
}

type SuggestionsProvider = Box<dyn Fn(&TriggerContext) -> Vec<Suggestion>>;
type SelectHandler = Box<dyn Fn(&Suggestion, &TriggerContext) -> TriggerAction>;
type EventHandler = Box<dyn Fn(&TriggerEvent)>;

/// A developer-defined trigger character that activates the suggestion
/// system.
///
/// # Examples
///
/// ```
/// use tokenfield::trigger::{TriggerAction, TriggerDefinition};
/// use tokenfield::suggest::Suggestion;
///
/// let mention = TriggerDefinition::new(
///     '@',
///     |_ctx| vec![Suggestion::new("Alice"), Suggestion::new("Bob")],
///     |_item, _ctx| TriggerAction::Dismiss,
/// )
/// .requires_leading_boundary(true);
/// assert_eq!(mention.character, '@');
/// ```
pub struct TriggerDefinition {
    /// The character that activates this trigger (e.g. `@`, `/`, `#`).
    pub character: char,
    /// When `true`, the marker must be at the start of text or follow
    /// whitespace.
    pub requires_leading_boundary: bool,
    /// Use compact (single-line) suggestion rows. Presentation hint only.
    pub is_compact: bool,
    /// When `false`, the built-in panel stays empty and the host is
    /// expected to drive its own UI from trigger events.
    pub shows_builtin_panel: bool,
    /// Per-trigger panel sizing override; `None` uses the session default.
    pub panel_sizing: Option<PanelSizing>,
    suggestions: SuggestionsProvider,
    on_select: SelectHandler,
    on_event: Option<EventHandler>,
}

impl TriggerDefinition {
    pub fn new(
        character: char,
        suggestions: impl Fn(&TriggerContext) -> Vec<Suggestion> + 'static,
        on_select: impl Fn(&Suggestion, &TriggerContext) -> TriggerAction + 'static,
    ) -> Self {
        Self {
            character,
            requires_leading_boundary: false,
            is_compact: false,
            shows_builtin_panel: true,
            panel_sizing: None,
            suggestions: Box::new(suggestions),
            on_select: Box::new(on_select),
            on_event: None,
        }
    }

    pub fn requires_leading_boundary(mut self, required: bool) -> Self {
        self.requires_leading_boundary = required;
        self
    }

    pub fn compact(mut self, is_compact: bool) -> Self {
        self.is_compact = is_compact;
        self
    }

    pub fn shows_builtin_panel(mut self, shows: bool) -> Self {
        self.shows_builtin_panel = shows;
        self
    }

    pub fn panel_sizing(mut self, sizing: PanelSizing) -> Self {
        self.panel_sizing = Some(sizing);
        self
    }

    /// Subscribe to activation/query/deactivation notifications.
    pub fn on_event(mut self, handler: impl Fn(&TriggerEvent) + 'static) -> Self {
        self.on_event = Some(Box::new(handler));
        self
    }

    pub(crate) fn provide(&self, context: &TriggerContext) -> Vec<Suggestion> {
        (self.suggestions)(context)
    }

    pub(crate) fn select(&self, item: &Suggestion, context: &TriggerContext) -> TriggerAction {
        (self.on_select)(item, context)
    }

    pub(crate) fn notify(&self, event: &TriggerEvent) {
        if let Some(handler) = &self.on_event {
            handler(event);
        }
    }
}

impl fmt::Debug for TriggerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerDefinition")
            .field("character", &self.character)
            .field("requires_leading_boundary", &self.requires_leading_boundary)
            .field("is_compact", &self.is_compact)
            .field("shows_builtin_panel", &self.shows_builtin_panel)
            .finish_non_exhaustive()
    }
}
