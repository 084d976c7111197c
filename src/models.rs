use std::path::{Path, PathBuf};

use serde::Serialize;

/// Locator for an image file on the local machine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse a plain path or a `file://` URI
    pub fn parse(uri: &str) -> Self {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn to_uri(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

impl From<PathBuf> for ImageRef {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A single ranked label from the classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    /// Score in 0..=1
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}
