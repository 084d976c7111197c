//! Error types for the classification pipeline and model lifecycle.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse error category, one per pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image file could not be read.
    Io,
    /// The encoded file contents were not valid base64.
    Decode,
    /// The bytes were not a valid JPEG image.
    Format,
    /// The model was absent or inference failed.
    Model,
    /// The classifier failed to initialize.
    ModelLoad,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Io => write!(f, "io"),
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Format => write!(f, "format"),
            ErrorKind::Model => write!(f, "model"),
            ErrorKind::ModelLoad => write!(f, "model load"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("not a valid JPEG image: {0}")]
    Format(#[from] image::ImageError),

    #[error("model is not loaded")]
    ModelNotLoaded,

    #[error("inference failed: {message}")]
    Inference { message: String },

    #[error("failed to load model: {message}")]
    ModelLoad { message: String },

    /// A pipeline step received data from the wrong stage.
    #[error("step '{step}' expected {expected} input, got {actual}")]
    Stage {
        step: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ClassifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifyError::Io { .. } => ErrorKind::Io,
            ClassifyError::Decode(_) => ErrorKind::Decode,
            ClassifyError::Format(_) => ErrorKind::Format,
            ClassifyError::ModelLoad { .. } => ErrorKind::ModelLoad,
            ClassifyError::ModelNotLoaded
            | ClassifyError::Inference { .. }
            | ClassifyError::Stage { .. }
            | ClassifyError::Task(_) => ErrorKind::Model,
        }
    }

    pub fn model_load(message: impl Into<String>) -> Self {
        Self::ModelLoad {
            message: message.into(),
        }
    }

    pub fn inference(error: impl std::fmt::Display) -> Self {
        Self::Inference {
            message: error.to_string(),
        }
    }
}
