//! Token editing: the inline-edit state machine, dismissal, and picking.
//!
//! The host renders whatever overlay it wants from [`TokenEditState`]; the
//! core only tracks which span is being edited, the uncommitted draft, and
//! the pre-edit token needed to cancel. One token edits at a time —
//! beginning a new edit while another is active commits the previous one
//! first.

use std::ops::Range;

use tracing::debug;

use crate::document::{Token, TokenKind};

use super::ComposerSession;

/// The inline-edit state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenEditState {
    #[default]
    Idle,
    Editing(EditingContext),
}

/// The span under edit, its pre-edit token, and the typed-but-uncommitted
/// draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingContext {
    /// Current span range; tracks live-preview resizes.
    pub range: Range<usize>,
    /// The token as it was when editing began, restored on cancel.
    pub original: Token,
    pub draft: String,
}

impl ComposerSession {
    pub fn edit_state(&self) -> &TokenEditState {
        &self.edit_state
    }

    pub fn is_editing_token(&self) -> bool {
        matches!(self.edit_state, TokenEditState::Editing(_))
    }

    /// Begin editing the editable token containing `offset`.
    ///
    /// No-ops (returning `false`) when no editable-kind token contains the
    /// offset. Re-entering the span already under edit returns `true`
    /// without restarting; beginning over a different active edit commits
    /// that one first. The initial draft is the token's resolved value —
    /// empty for a token still showing its placeholder.
    pub fn begin_token_edit(&mut self, offset: usize) -> bool {
        let mut offset = offset;
        if let TokenEditState::Editing(active) = &self.edit_state {
            if active.range.contains(&offset) {
                return true;
            }
            let before = active.range.clone();
            if let Some(committed) = self.commit_token_edit() {
                // The committed token may have resized; keep the target
                // offset pointing at the same character.
                if before.start < offset {
                    let delta = committed.len() as isize - before.len() as isize;
                    offset = (offset as isize + delta).max(0) as usize;
                }
            }
        }

        let Some(index) = self.buffer.span_index_containing(offset) else {
            return false;
        };
        let (range, original) = {
            let span = &self.buffer.spans()[index];
            if span.token.kind != TokenKind::Editable {
                return false;
            }
            (span.range.clone(), span.token.clone())
        };

        let draft = original.resolved_value().unwrap_or_default().to_string();
        debug!(?range, token = %original.id, "begin token edit");
        self.selection = range.end..range.end;
        self.edit_state = TokenEditState::Editing(EditingContext {
            range,
            original,
            draft,
        });
        true
    }

    /// Replace the draft and write a live preview of the resolved value
    /// into the token's span, without finalizing. No-op while idle.
    pub fn update_token_draft(&mut self, draft: impl Into<String>) {
        let TokenEditState::Editing(context) = &mut self.edit_state else {
            return;
        };
        context.draft = draft.into();

        let preview = updated_editable_token(&context.original, &context.draft);
        if let Some(index) = self.buffer.span_index_containing(context.range.start) {
            context.range = self.buffer.replace_token(index, preview);
            self.selection = context.range.end..context.range.end;
        }
    }

    /// Commit the active edit: a trimmed non-empty draft becomes the
    /// display and metadata `value`; an empty draft clears the value and
    /// falls back to the placeholder text. The caret lands just after the
    /// (possibly resized) token. Returns the token's new range, or `None`
    /// when no edit was active.
    pub fn commit_token_edit(&mut self) -> Option<Range<usize>> {
        let state = std::mem::take(&mut self.edit_state);
        let TokenEditState::Editing(context) = state else {
            return None;
        };
        let index = self.buffer.span_index_containing(context.range.start)?;

        let updated = updated_editable_token(&context.original, &context.draft);
        debug!(token = %updated.id, resolved = updated.is_resolved(), "commit token edit");
        let new_range = self.buffer.replace_token(index, updated);
        self.selection = new_range.end..new_range.end;
        self.refresh_suggestions();
        Some(new_range)
    }

    /// Commit like [`ComposerSession::commit_token_edit`], but keep the
    /// caret where the caller last put it (shifted for any resize) instead
    /// of parking it after the token. Used when a selection move or a
    /// direct buffer edit implicitly finalizes an edit. No-op while idle.
    pub(crate) fn commit_edit_preserving_caret(&mut self) {
        let TokenEditState::Editing(context) = &self.edit_state else {
            return;
        };
        let old_range = context.range.clone();
        let intended = self.selection.clone();

        if let Some(new_range) = self.commit_token_edit() {
            let delta = new_range.len() as isize - old_range.len() as isize;
            let shift = |offset: usize| -> usize {
                if offset >= old_range.end {
                    (offset as isize + delta).max(0) as usize
                } else {
                    offset
                }
            };
            let proposed = shift(intended.start)..shift(intended.end);
            let old = self.selection.clone();
            self.selection = self.buffer.adjust_selection(&old, &proposed);
        }
    }

    /// Abandon the active edit, restoring the pre-edit token.
    pub fn cancel_token_edit(&mut self) {
        let state = std::mem::take(&mut self.edit_state);
        let TokenEditState::Editing(context) = state else {
            return;
        };
        debug!(token = %context.original.id, "cancel token edit");
        if let Some(index) = self.buffer.span_index_containing(context.range.start) {
            let new_range = self.buffer.replace_token(index, context.original);
            self.selection = new_range.end..new_range.end;
        }
    }

    /// Remove the dismissible token containing `offset` in one edit and
    /// fire the configured dismissal callback. Returns whether a token was
    /// removed.
    pub fn dismiss_token_at(&mut self, offset: usize) -> bool {
        let Some(index) = self.buffer.span_index_containing(offset) else {
            return false;
        };
        if self.buffer.spans()[index].token.kind != TokenKind::Dismissible {
            return false;
        }
        let start = self.buffer.spans()[index].range.start;
        let Some(token) = self.buffer.remove_token(index) else {
            return false;
        };
        debug!(token = %token.id, "token dismissed");
        if let Some(callback) = &self.config.on_token_dismissed {
            callback(&token);
        }
        self.selection = start..start;
        self.refresh_suggestions();
        true
    }

    /// Resolve a pickable token to a host-chosen value: display and
    /// metadata `value` both take it, and the caret lands after the token.
    pub fn set_pickable_value(&mut self, offset: usize, value: &str) -> bool {
        let Some(index) = self.buffer.span_index_containing(offset) else {
            return false;
        };
        let mut token = {
            let span = &self.buffer.spans()[index];
            if span.token.kind != TokenKind::Pickable {
                return false;
            }
            span.token.clone()
        };

        token.display = value.to_string();
        token.metadata.insert("value".to_string(), value.to_string());
        if token.style.is_none() {
            if let Some(provider) = &self.config.default_token_style {
                token.style = Some(provider(&token.kind));
            }
        }

        let new_range = self.buffer.replace_token(index, token);
        self.selection = new_range.end..new_range.end;
        self.refresh_suggestions();
        true
    }

    /// Begin editing the next (or previous) unresolved editable token,
    /// wrapping around the buffer. Commits any active edit first. Returns
    /// `false` when tab navigation is disabled or nothing is unresolved.
    pub fn focus_adjacent_editable(&mut self, forward: bool) -> bool {
        if !self.config.token_tab_navigation {
            return false;
        }
        if self.is_editing_token() {
            self.commit_token_edit();
        }

        let candidates: Vec<Range<usize>> = self
            .buffer
            .spans()
            .iter()
            .filter(|span| span.token.kind == TokenKind::Editable && !span.token.is_resolved())
            .map(|span| span.range.clone())
            .collect();
        if candidates.is_empty() {
            return false;
        }

        let selection = self.buffer.clamp_range(&self.selection);
        let explicit = candidates.iter().position(|range| *range == selection);

        let target = if let Some(current) = explicit {
            let count = candidates.len() as isize;
            let offset: isize = if forward { 1 } else { -1 };
            let wrapped = (current as isize + offset).rem_euclid(count) as usize;
            candidates[wrapped].clone()
        } else if forward {
            candidates
                .iter()
                .find(|range| range.start >= selection.start)
                .unwrap_or(&candidates[0])
                .clone()
        } else {
            candidates
                .iter()
                .rev()
                .find(|range| range.end <= selection.start)
                .unwrap_or(&candidates[candidates.len() - 1])
                .clone()
        };

        self.begin_token_edit(target.start)
    }
}

/// Build the token an edit resolves to. For editable tokens a non-blank
/// value becomes display + metadata `value`; a blank one clears the value
/// and falls back to the placeholder text as display.
fn updated_editable_token(original: &Token, edited_value: &str) -> Token {
    let mut updated = original.clone();
    let trimmed = edited_value.trim();

    if original.kind != TokenKind::Editable {
        if !trimmed.is_empty() {
            updated.display = trimmed.to_string();
        }
        return updated;
    }

    if !trimmed.is_empty() {
        updated.display = trimmed.to_string();
        updated
            .metadata
            .insert("value".to_string(), trimmed.to_string());
        return updated;
    }

    updated.metadata.remove("value");
    if let Some(placeholder) = original.placeholder_text() {
        updated.display = placeholder.to_string();
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::session::ComposerConfig;

    fn editable(name: &str) -> Token {
        Token::new(TokenKind::Editable, name).with_metadata("placeholder", name)
    }

    /// "A" + editable "TK" + "Z"; the token span is 1..3.
    fn session() -> ComposerSession {
        let mut doc = Document::new();
        doc.push_text("A");
        doc.push_token(editable("TK"));
        doc.push_text("Z");
        let mut session = ComposerSession::new(ComposerConfig::new()).unwrap();
        session.load_document(&doc);
        session
    }

    #[test]
    fn test_begin_edit_requires_editable_token() {
        let mut session = session();
        assert!(!session.begin_token_edit(0));
        assert!(session.begin_token_edit(1));
        assert!(session.is_editing_token());
    }

    #[test]
    fn test_begin_edit_initial_draft_is_resolved_value() {
        let mut session = session();
        session.begin_token_edit(1);
        let TokenEditState::Editing(context) = session.edit_state() else {
            panic!("expected editing state");
        };
        // Display equals the placeholder, so the token is unresolved and
        // the draft starts empty.
        assert_eq!(context.draft, "");
        assert_eq!(context.range, 1..3);
    }

    #[test]
    fn test_draft_previews_into_buffer_without_finalizing() {
        let mut session = session();
        session.begin_token_edit(1);
        session.update_token_draft("Paris");
        assert_eq!(session.text(), "AParisZ");
        assert!(session.is_editing_token());

        session.cancel_token_edit();
        assert_eq!(session.text(), "ATKZ");
        assert!(!session.is_editing_token());
        let token = &session.buffer().spans()[0].token;
        assert!(!token.is_resolved());
    }

    #[test]
    fn test_commit_sets_display_and_value() {
        let mut session = session();
        session.begin_token_edit(1);
        session.update_token_draft("  Paris  ");
        let new_range = session.commit_token_edit().unwrap();

        assert_eq!(session.text(), "AParisZ");
        assert_eq!(new_range, 1..6);
        assert_eq!(session.selection(), 6..6);
        let token = &session.buffer().spans()[0].token;
        assert_eq!(token.display, "Paris");
        assert_eq!(token.metadata.get("value").map(String::as_str), Some("Paris"));
    }

    #[test]
    fn test_commit_empty_draft_falls_back_to_placeholder() {
        let mut session = session();
        session.begin_token_edit(1);
        session.update_token_draft("Paris");
        session.commit_token_edit();

        session.begin_token_edit(1);
        session.update_token_draft("");
        session.commit_token_edit();

        let token = &session.buffer().spans()[0].token;
        assert_eq!(token.display, "TK");
        assert!(!token.metadata.contains_key("value"));
        assert_eq!(session.text(), "ATKZ");
    }

    #[test]
    fn test_commit_without_active_edit_is_noop() {
        let mut session = session();
        assert_eq!(session.commit_token_edit(), None);
        assert_eq!(session.text(), "ATKZ");
    }

    #[test]
    fn test_begin_while_editing_commits_previous() {
        let mut doc = Document::new();
        doc.push_token(editable("first"));
        doc.push_text(" ");
        doc.push_token(editable("second"));
        let mut session = ComposerSession::new(ComposerConfig::new()).unwrap();
        session.load_document(&doc);

        assert!(session.begin_token_edit(0));
        session.update_token_draft("one");

        // "first" span shrinks to "one" (5 -> 3); the second token moved.
        let second_start = session.buffer().spans()[1].range.start;
        assert!(session.begin_token_edit(second_start));

        let spans = session.buffer().spans();
        assert_eq!(spans[0].token.display, "one");
        assert!(spans[0].token.is_resolved());
        let TokenEditState::Editing(context) = session.edit_state() else {
            panic!("expected editing state");
        };
        assert_eq!(context.original.display, "second");
    }

    #[test]
    fn test_reentering_active_edit_keeps_draft() {
        let mut session = session();
        session.begin_token_edit(1);
        session.update_token_draft("draft");
        assert!(session.begin_token_edit(2));
        let TokenEditState::Editing(context) = session.edit_state() else {
            panic!("expected editing state");
        };
        assert_eq!(context.draft, "draft");
    }

    #[test]
    fn test_selection_leaving_token_commits() {
        let mut session = session();
        session.begin_token_edit(1);
        session.update_token_draft("Paris");

        // Boundary positions do not commit.
        session.set_selection(1..1);
        assert!(session.is_editing_token());

        // Moving clear of the token does.
        session.set_selection(0..0);
        assert!(!session.is_editing_token());
        assert_eq!(session.buffer().spans()[0].token.display, "Paris");
    }

    #[test]
    fn test_dismiss_removes_token_and_fires_callback() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let dismissed: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&dismissed);

        let mut doc = Document::new();
        doc.push_text("x ");
        doc.push_token(Token::new(TokenKind::Dismissible, "chip"));
        let config = ComposerConfig::new()
            .on_token_dismissed(move |token| seen.borrow_mut().push(token.display.clone()));
        let mut session = ComposerSession::new(config).unwrap();
        session.load_document(&doc);

        assert!(session.dismiss_token_at(3));
        assert_eq!(session.text(), "x ");
        assert_eq!(session.selection(), 2..2);
        assert_eq!(dismissed.borrow().as_slice(), ["chip".to_string()]);

        // Dismissing plain text or the wrong kind is a no-op.
        assert!(!session.dismiss_token_at(0));
    }

    #[test]
    fn test_dismiss_requires_dismissible_kind() {
        let mut session = session();
        assert!(!session.dismiss_token_at(1));
        assert_eq!(session.buffer().spans().len(), 1);
    }

    #[test]
    fn test_set_pickable_value() {
        let mut doc = Document::new();
        doc.push_text("due ");
        doc.push_token(
            Token::new(TokenKind::Pickable, "pick a date").with_metadata("field", "deadline"),
        );
        let mut session = ComposerSession::new(ComposerConfig::new()).unwrap();
        session.load_document(&doc);

        assert!(session.set_pickable_value(5, "2026-03-01"));
        let token = &session.buffer().spans()[0].token;
        assert_eq!(token.display, "2026-03-01");
        assert_eq!(
            token.metadata.get("value").map(String::as_str),
            Some("2026-03-01")
        );
        assert_eq!(session.text(), "due 2026-03-01");
        assert_eq!(session.selection(), 14..14);
    }

    #[test]
    fn test_set_pickable_value_requires_pickable_kind() {
        let mut session = session();
        assert!(!session.set_pickable_value(1, "nope"));
    }

    #[test]
    fn test_focus_adjacent_editable_wraps() {
        let mut doc = Document::new();
        doc.push_token(editable("a"));
        doc.push_text(" ");
        doc.push_token(editable("b"));
        let mut session = ComposerSession::new(ComposerConfig::new()).unwrap();
        session.load_document(&doc);

        assert!(session.focus_adjacent_editable(true));
        let TokenEditState::Editing(context) = session.edit_state() else {
            panic!("expected editing state");
        };
        assert_eq!(context.original.display, "a");

        // From an explicit span selection, forward wraps through the list.
        session.cancel_token_edit();
        session.set_selection(0..1);
        assert!(session.focus_adjacent_editable(true));
        let TokenEditState::Editing(context) = session.edit_state() else {
            panic!("expected editing state");
        };
        assert_eq!(context.original.display, "b");
    }

    #[test]
    fn test_focus_adjacent_skips_resolved_tokens() {
        let mut doc = Document::new();
        doc.push_token(editable("a"));
        doc.push_text(" ");
        doc.push_token(editable("b"));
        let mut session = ComposerSession::new(ComposerConfig::new()).unwrap();
        session.load_document(&doc);

        session.begin_token_edit(0);
        session.update_token_draft("done");
        session.commit_token_edit();

        session.set_selection(0..0);
        assert!(session.focus_adjacent_editable(true));
        let TokenEditState::Editing(context) = session.edit_state() else {
            panic!("expected editing state");
        };
        assert_eq!(context.original.display, "b");
    }

    #[test]
    fn test_focus_adjacent_respects_config_toggle() {
        let mut doc = Document::new();
        doc.push_token(editable("a"));
        let config = ComposerConfig::new().token_tab_navigation(false);
        let mut session = ComposerSession::new(config).unwrap();
        session.load_document(&doc);
        assert!(!session.focus_adjacent_editable(true));
    }
}
