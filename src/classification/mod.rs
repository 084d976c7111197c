pub mod mobilenet;
pub mod postprocess;
pub mod steps;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ClassifyError;
use crate::models::Prediction;
use crate::tensor::{ImageTensor, Normalization};

pub use mobilenet::MobileNetClassifier;

/// Environment variable overriding the default model directory
pub const MODEL_DIR_ENV: &str = "SNAPLABEL_MODEL_DIR";

/// Default labels file name, looked up next to the model
pub const LABELS_FILE: &str = "imagenet_labels.txt";

/// Largest accepted square input resolution
pub const MAX_INPUT_SIZE: u32 = 4096;

/// Anything that maps an image tensor to ranked labels
pub trait Classifier: Send + Sync {
    /// Predictions ordered by descending confidence
    fn classify(&self, tensor: &ImageTensor) -> Result<Vec<Prediction>, ClassifyError>;

    fn name(&self) -> &str {
        "classifier"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobileNetVersion {
    V1,
    V2,
}

impl MobileNetVersion {
    pub fn number(self) -> u8 {
        match self {
            MobileNetVersion::V1 => 1,
            MobileNetVersion::V2 => 2,
        }
    }

    /// Width multipliers the published weights exist for
    pub fn supported_alphas(self) -> &'static [f32] {
        match self {
            MobileNetVersion::V1 => &[0.25, 0.50, 0.75, 1.0],
            MobileNetVersion::V2 => &[0.50, 0.75, 1.0],
        }
    }
}

impl TryFrom<u8> for MobileNetVersion {
    type Error = ClassifyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MobileNetVersion::V1),
            2 => Ok(MobileNetVersion::V2),
            other => Err(ClassifyError::model_load(format!(
                "invalid MobileNet version {}, expected 1 or 2",
                other
            ))),
        }
    }
}

/// Fixed classifier configuration chosen at startup
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub version: MobileNetVersion,
    pub alpha: f32,
    pub top_k: usize,
    pub input_size: u32,
    pub normalization: Normalization,
    pub model_dir: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: MobileNetVersion::V2,
            alpha: 1.0,
            top_k: 3,
            input_size: 224,
            normalization: Normalization::default(),
            model_dir: None,
            model_path: None,
            labels_path: None,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ClassifyError> {
        let supported = self.version.supported_alphas();
        if !supported.iter().any(|a| (a - self.alpha).abs() < 1e-6) {
            return Err(ClassifyError::model_load(format!(
                "MobileNet v{} does not support alpha {}, expected one of {:?}",
                self.version.number(),
                self.alpha,
                supported
            )));
        }
        if self.top_k == 0 {
            return Err(ClassifyError::model_load("top_k must be at least 1"));
        }
        if self.input_size == 0 || self.input_size > MAX_INPUT_SIZE {
            return Err(ClassifyError::model_load(format!(
                "input size must be between 1 and {}, got {}",
                MAX_INPUT_SIZE, self.input_size
            )));
        }
        Ok(())
    }

    /// Directory searched for model files: explicit, then env, then `~/.cache/snaplabel`
    pub fn resolved_model_dir(&self) -> Result<PathBuf, ClassifyError> {
        if let Some(dir) = &self.model_dir {
            return Ok(dir.clone());
        }
        if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ClassifyError::model_load("cannot locate home directory for model cache"))?;
        Ok(Path::new(&home_dir).join(".cache/snaplabel"))
    }

    pub fn model_file_name(&self) -> String {
        format!(
            "mobilenet_v{}_{:.2}_{}.rten",
            self.version.number(),
            self.alpha,
            self.input_size
        )
    }

    pub fn model_file(&self) -> Result<PathBuf, ClassifyError> {
        match &self.model_path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.resolved_model_dir()?.join(self.model_file_name())),
        }
    }

    pub fn labels_file(&self) -> Result<PathBuf, ClassifyError> {
        if let Some(path) = &self.labels_path {
            return Ok(path.clone());
        }
        let model_file = self.model_file()?;
        let dir = model_file.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(LABELS_FILE))
    }
}

/// Read one label per line. Line `n` is the label of class `n`, so interior
/// blank lines are kept as empty labels and only trailing ones are dropped.
pub fn load_labels(path: &Path) -> Result<Vec<String>, ClassifyError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ClassifyError::model_load(format!("cannot read labels {}: {}", path.display(), e))
    })?;
    let mut labels: Vec<String> = contents
        .lines()
        .map(|line| line.trim().to_string())
        .collect();
    while labels.last().is_some_and(|label| label.is_empty()) {
        labels.pop();
    }
    if labels.is_empty() {
        return Err(ClassifyError::model_load(format!(
            "labels file {} is empty",
            path.display()
        )));
    }
    Ok(labels)
}

/// Load the classifier off the UI thread
pub async fn load_model(config: ModelConfig) -> Result<Arc<dyn Classifier>, ClassifyError> {
    let classifier = tokio::task::spawn_blocking(move || MobileNetClassifier::load(&config)).await??;
    tracing::info!("Model loaded successfully: {}", classifier.name());
    Ok(Arc::new(classifier))
}
