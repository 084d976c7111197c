mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from snaplabel for tests
pub use snaplabel::core::{
    ClassificationOutcome, Effect, Event, Phase, RequestToken, ScreenState,
};
pub use snaplabel::{Classifier, ClassifyError, ErrorKind, ImageRef, ImageTensor, Prediction};
