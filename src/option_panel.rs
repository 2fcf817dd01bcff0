use tracing::debug;

use crate::panel::PanelHandle;

/// Shows or hides the post-processing options group based on its toggle.
///
/// This is the single writer of the dependent panel's visibility. Visibility is a pure
/// function of the toggle; applying the same value twice is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPanel {
    panel: PanelHandle,
}

impl OptionPanel {
    pub const PANEL_ID: &'static str = "post-processing-options";

    /// Create the panel and immediately reflect the toggle's default state.
    pub fn new(default_enabled: bool) -> Self {
        let mut option_panel = Self {
            panel: PanelHandle::new(Self::PANEL_ID, false),
        };
        option_panel.set_visibility(default_enabled);
        option_panel
    }

    /// Called once per toggle-change event.
    pub fn set_visibility(&mut self, enabled: bool) {
        if self.panel.is_visible() != enabled {
            debug!(panel = Self::PANEL_ID, visible = enabled, "option panel visibility");
        }
        self.panel.set_visible(enabled);
    }

    pub fn panel(&self) -> &PanelHandle {
        &self.panel
    }

    pub fn is_visible(&self) -> bool {
        self.panel.is_visible()
    }
}
