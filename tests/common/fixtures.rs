use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{ImageBuffer, ImageFormat, Rgb};
use snaplabel::core::{Event, ScreenState};
use snaplabel::{Classifier, ClassifyError, ImageTensor, Prediction};
use tempfile::NamedTempFile;

/// Creates a solid red test image in the given format and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image(width: u32, height: u32, format: ImageFormat) -> NamedTempFile {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([255u8, 0u8, 0u8]));
    let suffix = match format {
        ImageFormat::Png => ".png",
        _ => ".jpg",
    };
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), format)
        .expect("Failed to save test image");
    file
}

pub fn create_test_jpeg(width: u32, height: u32) -> NamedTempFile {
    create_test_image(width, height, ImageFormat::Jpeg)
}

/// Classifier that returns canned predictions and records what it saw
#[derive(Default)]
pub struct FakeClassifier {
    pub predictions: Vec<Prediction>,
    pub calls: AtomicUsize,
    pub last_shape: Mutex<Option<[usize; 3]>>,
}

impl FakeClassifier {
    pub fn new(predictions: Vec<Prediction>) -> Arc<Self> {
        Arc::new(Self {
            predictions,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for FakeClassifier {
    fn classify(&self, tensor: &ImageTensor) -> Result<Vec<Prediction>, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_shape.lock().unwrap() = Some(tensor.shape());
        Ok(self.predictions.clone())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Classifier whose inference always fails
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn classify(&self, _tensor: &ImageTensor) -> Result<Vec<Prediction>, ClassifyError> {
        Err(ClassifyError::inference("backend exploded"))
    }
}

pub fn cat_predictions() -> Vec<Prediction> {
    vec![
        Prediction::new("tabby cat", 0.82),
        Prediction::new("tiger cat", 0.11),
        Prediction::new("Egyptian cat", 0.04),
    ]
}

pub fn dog_predictions() -> Vec<Prediction> {
    vec![Prediction::new("golden retriever", 0.9)]
}

/// ScreenState with the model already loaded
pub fn ready_state() -> ScreenState {
    let mut state = ScreenState::new();
    state.update(Event::ModelLoaded(Ok(())));
    state
}
