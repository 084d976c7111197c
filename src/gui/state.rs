use std::sync::Arc;

use crate::classification::Classifier;
use crate::source::{CameraCapture, LibraryPicker};

/// Session-wide resources shared by screens
pub struct AppState {
    /// Set once when the model finishes loading, never replaced
    pub model: Option<Arc<dyn Classifier>>,
    pub library: LibraryPicker,
    pub camera: CameraCapture,
}

impl AppState {
    pub fn new(camera: CameraCapture) -> Self {
        Self {
            model: None,
            library: LibraryPicker,
            camera,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("model", &self.model.as_ref().map(|m| m.name()))
            .field("camera", &self.camera)
            .finish()
    }
}
