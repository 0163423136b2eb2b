//! Host-implemented collaborator interfaces.

use crate::suggest::Suggestion;
use crate::trigger::PanelSizing;

/// The floating suggestion panel, implemented by the host UI.
///
/// The session pushes list updates through this trait whenever the active
/// trigger or its query changes. The core never computes screen geometry;
/// `anchor` is a char offset into the buffer (the caret position the panel
/// should attach to) and the host decides placement from it. Directional
/// keys are handled by the session itself, so the panel only needs to
/// mirror state.
pub trait SuggestionPanel {
    /// Show or refresh the panel. An empty `items` slice means there is
    /// nothing to show for the current query.
    fn update(
        &mut self,
        items: &[Suggestion],
        anchor: Option<usize>,
        is_compact: bool,
        sizing: PanelSizing,
    );

    /// Hide the panel.
    fn dismiss(&mut self);
}
