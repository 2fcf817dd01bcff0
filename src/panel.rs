/// Handle to one UI region whose visibility the controller owns.
///
/// The embedding UI binds each handle to a concrete element (a DOM node, a widget) and mirrors
/// `is_visible` into its own hidden class or attribute. Handles are owned by exactly one
/// component, which is the only writer of their visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelHandle {
    id: &'static str,
    visible: bool,
}

impl PanelHandle {
    pub fn new(id: &'static str, visible: bool) -> Self {
        Self { id, visible }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
