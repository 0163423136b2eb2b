//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use tokenfield::prelude::*;
use uuid::Uuid;

/// Deterministic UUID from a short hex tail, for stable fixtures.
pub fn uuid(tail: &str) -> Uuid {
    Uuid::parse_str(&format!("00000000-0000-0000-0000-0000000000{tail}")).unwrap()
}

pub fn token(kind: TokenKind, display: &str) -> Token {
    Token::new(kind, display)
}

pub fn editable(name: &str) -> Token {
    Token::new(TokenKind::Editable, name).with_metadata("placeholder", name)
}

pub fn suggestion(tail: &str, title: &str) -> Suggestion {
    Suggestion::new(title).with_id(uuid(tail))
}

/// What the session pushed to the host panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    Updated {
        titles: Vec<String>,
        anchor: Option<usize>,
        is_compact: bool,
    },
    Dismissed,
}

/// A `SuggestionPanel` that records every call for assertions.
pub struct RecordingPanel {
    events: Rc<RefCell<Vec<PanelEvent>>>,
}

impl RecordingPanel {
    /// Returns the panel and a shared handle to its event log.
    pub fn new() -> (Self, Rc<RefCell<Vec<PanelEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let panel = Self {
            events: Rc::clone(&events),
        };
        (panel, events)
    }
}

impl SuggestionPanel for RecordingPanel {
    fn update(
        &mut self,
        items: &[Suggestion],
        anchor: Option<usize>,
        is_compact: bool,
        _sizing: PanelSizing,
    ) {
        self.events.borrow_mut().push(PanelEvent::Updated {
            titles: items.iter().map(|item| item.title.clone()).collect(),
            anchor,
            is_compact,
        });
    }

    fn dismiss(&mut self) {
        self.events.borrow_mut().push(PanelEvent::Dismissed);
    }
}
