pub mod classification;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod tensor;

pub use classification::{Classifier, MobileNetClassifier, MobileNetVersion, ModelConfig, load_model};
pub use error::{ClassifyError, ErrorKind};
pub use models::{ImageRef, Prediction};
pub use pipeline::{Pipeline, PipelineContext, PipelineData, PipelineStep, classify_image};
pub use tensor::{ImageTensor, Normalization};

#[cfg(feature = "gui")]
pub mod gui;
