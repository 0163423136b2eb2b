//! Tokenfield - a token-aware rich text input engine.
//!
//! This crate is the platform-independent core of a caret-driven input
//! field that mixes plain text with atomic tokens (variables, mentions,
//! commands, pickable values):
//!
//! - [`document`] - the `Document`/`Segment`/`Token` model and the
//!   placeholder text codec (`@{kind:id|display}` and legacy `{{name}}`).
//! - [`buffer`] - the editable flat-text buffer with token spans and the
//!   token-aware range engine that keeps carets, selections, and deletions
//!   from splitting a token.
//! - [`trigger`] - trigger definitions ("@", "/", ...) and the
//!   nearest-marker-wins detection scan.
//! - [`suggest`] - the suggestion list state machine: wrap-around
//!   selection, reset-suppressing updates, and section grouping.
//! - [`session`] - the per-field orchestrator tying the above together,
//!   including the inline token-editing state machine.
//!
//! Rendering, panel geometry, and OS integration stay in the host; they
//! plug in through the [`traits`] interfaces and the callback surface on
//! trigger definitions.

pub mod buffer;
pub mod document;
pub mod error;
pub mod prelude;
pub mod session;
pub mod suggest;
pub mod traits;
pub mod trigger;
