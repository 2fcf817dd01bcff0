//! File selection from the native picker and from drag-and-drop.
//!
//! Both paths converge on one [`SelectedFile`] and one label update. Nothing here validates
//! type or size; whatever the user hands over is passed through.

use tracing::debug;

use crate::selected_file::SelectedFile;

pub const DEFAULT_LABEL: &str = "Drag and drop a video here, or click to choose a file";

/// Platform event delivered for each stage of a drag gesture.
///
/// Every stage must have its default action suppressed, otherwise the browser navigates
/// away to the dropped file.
pub trait DragGesture {
    fn prevent_default(&mut self);
    fn stop_propagation(&mut self);
}

/// Stage of a drag gesture over the drop zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragStage {
    Enter,
    Over,
    Leave,
    /// The files carried by the drop, possibly none.
    Drop(Vec<SelectedFile>),
}

impl DragStage {
    fn name(&self) -> &'static str {
        match self {
            DragStage::Enter => "dragenter",
            DragStage::Over => "dragover",
            DragStage::Leave => "dragleave",
            DragStage::Drop(_) => "drop",
        }
    }
}

/// Owns the current selection and the drop zone's visual flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIntake {
    selection: Option<SelectedFile>,
    default_label: String,
    label: String,
    drag_active: bool,
    file_present: bool,
}

impl FileIntake {
    pub fn new(default_label: impl Into<String>) -> Self {
        let default_label = default_label.into();
        Self {
            selection: None,
            label: default_label.clone(),
            default_label,
            drag_active: false,
            file_present: false,
        }
    }

    /// Picker path: install the first chosen file and ignore the rest.
    ///
    /// Returns the new selection when one was installed; this is the "selection changed"
    /// signal.
    pub fn choose(&mut self, files: Vec<SelectedFile>) -> Option<&SelectedFile> {
        let total = files.len();
        let file = files.into_iter().next()?;
        if total > 1 {
            debug!(ignored = total - 1, "single-file intake ignored extra files");
        }

        debug!(file = file.name(), bytes = file.len(), "file selected");
        self.label = file.name().to_string();
        self.selection = Some(file);
        self.selection.as_ref()
    }

    /// Drag-and-drop path.
    ///
    /// A drop with at least one file is installed exactly as if it had been chosen through the
    /// picker, and additionally raises the "file present" flag.
    pub fn handle_drag<E>(&mut self, stage: DragStage, event: &mut E) -> Option<&SelectedFile>
    where
        E: DragGesture + ?Sized,
    {
        event.prevent_default();
        event.stop_propagation();
        debug!(stage = stage.name(), "drag gesture");

        match stage {
            DragStage::Enter | DragStage::Over => {
                self.drag_active = true;
                None
            }
            DragStage::Leave => {
                self.drag_active = false;
                None
            }
            DragStage::Drop(files) => {
                self.drag_active = false;
                if files.is_empty() {
                    return None;
                }
                self.file_present = true;
                self.choose(files)
            }
        }
    }

    pub fn selection(&self) -> Option<&SelectedFile> {
        self.selection.as_ref()
    }

    /// Text shown in the drop zone: the chosen file's name, or the default prompt.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn is_file_present(&self) -> bool {
        self.file_present
    }
}

impl Default for FileIntake {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}
