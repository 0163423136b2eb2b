//! Suggestion candidates and the list-selection state machine.
//!
//! [`SuggestionListState`] holds the current candidate list, a wrap-around
//! selected index, and the derived section grouping the panel renders.
//! Replacing the list with content-identical items is a no-op so that a
//! provider re-invoked on every keystroke does not visibly reset the user's
//! arrow-key selection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One suggestion row offered while a trigger is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Grouping key; contiguous runs of the same section render under one
    /// header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Symbolic icon reference for the row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Image reference; wins over `icon` when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Suggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            subtitle: None,
            section: None,
            icon: None,
            image: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A suggestion paired with its absolute index in the flat list, so the
/// panel can map a rendered row back to the selection index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSuggestion<'a> {
    pub index: usize,
    pub item: &'a Suggestion,
}

/// A contiguous run of suggestions sharing a section title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSection<'a> {
    /// Stable id: the global index of the section's first row.
    pub id: usize,
    /// Case-normalized section title; `None` for the untitled run.
    pub title: Option<String>,
    pub rows: Vec<IndexedSuggestion<'a>>,
}

/// Candidate list plus wrap-around selection.
#[derive(Debug, Clone, Default)]
pub struct SuggestionListState {
    items: Vec<Suggestion>,
    selected_index: usize,
}

impl SuggestionListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The selected index. Always in range while the list is non-empty.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_item(&self) -> Option<&Suggestion> {
        self.items.get(self.selected_index)
    }

    /// Replace the candidate list.
    ///
    /// A content-identical list (same ids, titles, subtitles, sections, and
    /// icon references in the same order) only re-clamps the selected
    /// index, preserving the user's arrow-key position across re-filters;
    /// otherwise the items are swapped and the previous index clamps into
    /// the new range (0 for an empty list).
    pub fn update_items(&mut self, new_items: Vec<Suggestion>) {
        let normalized_index = if new_items.is_empty() {
            0
        } else {
            self.selected_index.min(new_items.len() - 1)
        };

        if self.items == new_items && normalized_index == self.selected_index {
            return;
        }

        tracing::trace!(count = new_items.len(), "suggestion list replaced");
        self.items = new_items;
        self.selected_index = normalized_index;
    }

    /// Move the selection by `delta`, wrapping modulo the item count.
    /// No-op on an empty list.
    pub fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let count = self.items.len() as isize;
        let current = self.selected_index.min(self.items.len() - 1) as isize;
        self.selected_index = (current + delta).rem_euclid(count) as usize;
    }

    /// Group items into contiguous sections.
    ///
    /// One pass: a new group starts whenever the upper-cased section key
    /// differs from the previous item's. Groups come out in first-seen
    /// order and rows keep their global index.
    pub fn grouped(&self) -> Vec<SuggestionSection<'_>> {
        let mut sections: Vec<SuggestionSection<'_>> = Vec::new();
        let mut current_title: Option<Option<String>> = None;
        let mut rows: Vec<IndexedSuggestion<'_>> = Vec::new();

        for (index, item) in self.items.iter().enumerate() {
            let normalized = item.section.as_ref().map(|s| s.to_uppercase());
            if current_title.as_ref() != Some(&normalized) {
                if !rows.is_empty() {
                    sections.push(SuggestionSection {
                        id: rows[0].index,
                        title: current_title.take().flatten(),
                        rows: std::mem::take(&mut rows),
                    });
                }
                current_title = Some(normalized);
            }
            rows.push(IndexedSuggestion { index, item });
        }

        if !rows.is_empty() {
            sections.push(SuggestionSection {
                id: rows[0].index,
                title: current_title.take().flatten(),
                rows,
            });
        }

        sections
    }
}
