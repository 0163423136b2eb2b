//! Trigger evaluation and the suggestion flow.
//!
//! Re-run after every text or selection change: detect the active trigger,
//! fire lifecycle events, pull fresh items from the trigger's provider, and
//! mirror the result into the list state and the host panel.

use std::ops::Range;

use tracing::{debug, trace};

use crate::trigger::detection::{detect_active_trigger, ActiveTrigger};
use crate::trigger::{TriggerAction, TriggerContext, TriggerEvent, TriggerHighlight};

use super::{ComposerSession, DirectionalKey};

impl ComposerSession {
    pub(crate) fn refresh_suggestions(&mut self) {
        let detected =
            detect_active_trigger(self.buffer.text(), &self.selection, &self.config.triggers);
        let previous = std::mem::replace(&mut self.active_trigger, detected);

        let Some(active) = self.active_trigger.clone() else {
            self.trigger_highlight = None;
            self.suggestions.update_items(Vec::new());
            if let Some(panel) = self.panel.as_mut() {
                panel.dismiss();
            }
            if self.last_trigger_character.take().is_some() {
                if let Some(previous) = &previous {
                    trace!(character = %previous.character, "trigger deactivated");
                    self.config.triggers[previous.definition_index]
                        .notify(&TriggerEvent::Deactivated);
                }
            }
            return;
        };

        let context = self.context_for(&active);
        let definition = &self.config.triggers[active.definition_index];
        let is_compact = definition.is_compact;
        let shows_builtin_panel = definition.shows_builtin_panel;
        let sizing = definition
            .panel_sizing
            .unwrap_or(self.config.default_panel_sizing);

        if self.last_trigger_character != Some(active.character) {
            if self.last_trigger_character.is_some() {
                if let Some(previous) = &previous {
                    self.config.triggers[previous.definition_index]
                        .notify(&TriggerEvent::Deactivated);
                }
            }
            trace!(character = %active.character, query = %active.query, "trigger activated");
            self.config.triggers[active.definition_index]
                .notify(&TriggerEvent::Activated(context.clone()));
            self.last_trigger_character = Some(active.character);
        } else {
            self.config.triggers[active.definition_index]
                .notify(&TriggerEvent::QueryChanged(context.clone()));
        }

        let items = if shows_builtin_panel {
            self.config.triggers[active.definition_index].provide(&context)
        } else {
            Vec::new()
        };

        self.trigger_highlight = (!items.is_empty()).then(|| TriggerHighlight {
            range: active.replacement_range.clone(),
            character: active.character,
            has_query: !active.query.is_empty(),
        });

        self.suggestions.update_items(items);
        if let Some(panel) = self.panel.as_mut() {
            panel.update(
                self.suggestions.items(),
                Some(active.anchor_range.start),
                is_compact,
                sizing,
            );
        }
    }

    /// Route a directional key through the suggestion flow. Returns whether
    /// the key was consumed; `false` means no trigger is active (or the
    /// list is empty) and the host should apply its normal key handling.
    pub fn handle_directional_key(&mut self, key: DirectionalKey) -> bool {
        if self.active_trigger.is_none() || self.suggestions.is_empty() {
            return false;
        }
        match key {
            DirectionalKey::Up => {
                self.suggestions.move_selection(-1);
                true
            }
            DirectionalKey::Down => {
                self.suggestions.move_selection(1);
                true
            }
            DirectionalKey::Confirm => self.confirm_selected_suggestion(),
            DirectionalKey::Escape => {
                self.dismiss_suggestions();
                true
            }
        }
    }

    /// Run the active trigger's `on_select` for the currently selected
    /// suggestion and apply the returned action.
    pub fn confirm_selected_suggestion(&mut self) -> bool {
        let Some(active) = self.active_trigger.clone() else {
            return false;
        };
        let Some(item) = self.suggestions.selected_item().cloned() else {
            return false;
        };

        let context = self.context_for(&active);
        let action = self.config.triggers[active.definition_index].select(&item, &context);
        debug!(title = %item.title, ?action, "suggestion selected");
        self.execute_trigger_action(action, active.replacement_range);
        true
    }

    /// Apply a trigger action over the given replacement range in one
    /// atomic edit. Exposed so hosts driving their own suggestion UI (a
    /// trigger with `shows_builtin_panel == false`) can commit a selection
    /// using the range from their captured [`TriggerContext`].
    pub fn execute_trigger_action(&mut self, action: TriggerAction, range: Range<usize>) {
        self.trigger_highlight = None;

        let clamped = self.buffer.clamp_range(&range);
        if clamped.is_empty() {
            return;
        }

        match action {
            TriggerAction::InsertToken(token) => {
                let mut token = token;
                if token.style.is_none() {
                    if let Some(provider) = &self.config.default_token_style {
                        token.style = Some(provider(&token.kind));
                    }
                }
                let caret = self.buffer.insert_token(clamped, token);
                self.selection = caret..caret;
            }
            TriggerAction::InsertText(text) => {
                let replaced = self.buffer.replace_range(clamped, &text);
                let caret = replaced.start + text.chars().count();
                self.selection = caret..caret;
            }
            TriggerAction::Dismiss => {
                let replaced = self.buffer.replace_range(clamped, "");
                self.selection = replaced.start..replaced.start;
            }
            TriggerAction::None => return,
        }

        self.active_trigger = None;
        self.refresh_suggestions();
    }

    /// Hide the suggestion flow without touching the buffer. The trigger
    /// text stays put, so the next edit may re-activate it.
    pub fn dismiss_suggestions(&mut self) {
        self.trigger_highlight = None;
        self.suggestions.update_items(Vec::new());
        if let Some(panel) = self.panel.as_mut() {
            panel.dismiss();
        }
        let previous = self.active_trigger.take();
        if self.last_trigger_character.take().is_some() {
            if let Some(previous) = &previous {
                self.config.triggers[previous.definition_index].notify(&TriggerEvent::Deactivated);
            }
        }
    }

    fn context_for(&self, active: &ActiveTrigger) -> TriggerContext {
        TriggerContext {
            character: active.character,
            query: active.query.clone(),
            text: self.buffer.text().to_string(),
            replacement_range: active.replacement_range.clone(),
            selection: self.selection.clone(),
        }
    }
}
