//! Token-aware range adjustment.
//!
//! These three operations are the only mechanism enforcing token atomicity:
//! a caret may not come to rest inside a span, a selection boundary may not
//! split one, and a deletion always swallows any span it touches. Every
//! session editing path routes its ranges through here.

use std::ops::Range;

use super::{TokenBuffer, TokenSpan};

impl TokenBuffer {
    /// Clamp a char range to the buffer bounds.
    pub fn clamp_range(&self, range: &Range<usize>) -> Range<usize> {
        let len = self.char_len();
        let start = range.start.min(len);
        let end = range.end.max(start).min(len);
        start..end
    }

    /// The span whose range contains `offset`, if any.
    pub fn span_containing(&self, offset: usize) -> Option<&TokenSpan> {
        self.span_index_containing(offset).map(|i| &self.spans()[i])
    }

    /// Expand a deletion request so it covers any partially-touched token.
    ///
    /// A boundary strictly inside a span extends to that span's outer edge;
    /// applying the expansion and deleting always removes whole tokens.
    /// Idempotent: expanding an already-expanded range is a no-op.
    pub fn expand_delete_range(&self, range: &Range<usize>) -> Range<usize> {
        let clamped = self.clamp_range(range);
        if clamped.is_empty() {
            return clamped;
        }

        let mut start = clamped.start;
        let mut end = clamped.end;

        if let Some(span) = self.span_containing(start) {
            start = span.range.start;
        }
        if end > 0 {
            if let Some(span) = self.span_containing(end - 1) {
                end = span.range.end;
            }
        }

        start..end.max(start)
    }

    /// Adjust a proposed selection so neither boundary lands inside a span.
    ///
    /// A collapsed proposal snaps to the nearer span edge in the direction
    /// of travel implied by `old`: at/before the old start means leftward
    /// motion (snap to the span start), at/after the old end means rightward
    /// motion (snap to the span end), anything else snaps by midpoint. A
    /// non-collapsed proposal expands each boundary independently to its
    /// containing span's edges.
    pub fn adjust_selection(&self, old: &Range<usize>, proposed: &Range<usize>) -> Range<usize> {
        if self.is_empty() {
            return self.clamp_range(proposed);
        }

        let clamped = self.clamp_range(proposed);
        if clamped.is_empty() {
            let Some(span) = self.span_containing(clamped.start) else {
                return clamped;
            };

            if clamped.start <= old.start {
                return span.range.start..span.range.start;
            }
            if clamped.start >= old.end {
                return span.range.end..span.range.end;
            }

            let midpoint = span.range.start + span.range.len() / 2;
            let snapped = if clamped.start >= midpoint {
                span.range.end
            } else {
                span.range.start
            };
            return snapped..snapped;
        }

        let mut start = clamped.start;
        let mut end = clamped.end;
        if let Some(span) = self.span_containing(start) {
            start = span.range.start;
        }
        if end > 0 {
            if let Some(span) = self.span_containing(end - 1) {
                end = span.range.end;
            }
        }
        start..end.max(start)
    }
}
