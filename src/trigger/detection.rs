//! Active-trigger detection: backward scan from the caret.

use std::ops::Range;

use super::TriggerDefinition;

/// A trigger currently active at the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTrigger {
    /// The matched trigger character.
    pub character: char,
    /// Char range covering the marker plus query, to be replaced on select.
    pub replacement_range: Range<usize>,
    /// Collapsed range at the caret, used as the panel anchor.
    pub anchor_range: Range<usize>,
    /// Text between the marker and the caret (may be empty).
    pub query: String,
    /// Index into the definitions slice that matched.
    pub definition_index: usize,
}

/// Determine whether a trigger is active for the given text and selection.
///
/// Pure function; offsets are char units. Rules:
///
/// 1. A non-collapsed selection never activates a trigger.
/// 2. Scan backward from the caret; whitespace or a line break before any
///    trigger character ends the scan with no match.
/// 3. The nearest registered trigger character wins, regardless of
///    definition order.
/// 4. A definition requiring a leading boundary whose marker is neither at
///    the start of text nor after whitespace fails the whole detection —
///    the scan does not continue past it looking for a farther marker.
///
/// # Examples
///
/// ```
/// use tokenfield::trigger::{TriggerAction, TriggerDefinition};
/// use tokenfield::trigger::detection::detect_active_trigger;
///
/// let triggers = [
///     TriggerDefinition::new('@', |_| Vec::new(), |_, _| TriggerAction::None),
///     TriggerDefinition::new('#', |_| Vec::new(), |_, _| TriggerAction::None),
/// ];
/// let active = detect_active_trigger("@foo#bar", &(8..8), &triggers).unwrap();
/// assert_eq!(active.character, '#');
/// assert_eq!(active.replacement_range, 4..8);
/// assert_eq!(active.query, "bar");
/// ```
pub fn detect_active_trigger(
    text: &str,
    selection: &Range<usize>,
    triggers: &[TriggerDefinition],
) -> Option<ActiveTrigger> {
    if selection.start != selection.end {
        return None;
    }

    let chars: Vec<char> = text.chars().collect();
    let caret = selection.start.min(chars.len());
    if caret == 0 {
        return None;
    }

    for scan in (0..caret).rev() {
        let candidate = chars[scan];
        if candidate.is_whitespace() {
            return None;
        }

        let Some((index, definition)) = triggers
            .iter()
            .enumerate()
            .find(|(_, t)| t.character == candidate)
        else {
            continue;
        };

        if definition.requires_leading_boundary {
            let at_start = scan == 0;
            let follows_whitespace = !at_start && chars[scan - 1].is_whitespace();
            if !at_start && !follows_whitespace {
                return None;
            }
        }

        let query: String = chars[scan + 1..caret].iter().collect();
        return Some(ActiveTrigger {
            character: candidate,
            replacement_range: scan..caret,
            anchor_range: caret..caret,
            query,
            definition_index: index,
        });
    }

    None
}
