use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, Tensor};

use crate::classification::{Classifier, ModelConfig, load_labels, postprocess};
use crate::error::ClassifyError;
use crate::models::Prediction;
use crate::tensor::{ImageTensor, Normalization};

/// MobileNet image classifier backed by an `.rten` model file
pub struct MobileNetClassifier {
    model: Model,
    labels: Vec<String>,
    input_size: u32,
    normalization: Normalization,
    top_k: usize,
    name: String,
}

impl std::fmt::Debug for MobileNetClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MobileNetClassifier")
            .field("name", &self.name)
            .field("labels", &self.labels.len())
            .field("input_size", &self.input_size)
            .finish()
    }
}

impl MobileNetClassifier {
    pub fn load(config: &ModelConfig) -> Result<Self, ClassifyError> {
        config.validate()?;

        let model_path = config.model_file()?;
        let labels_path = config.labels_file()?;

        if !model_path.exists() {
            return Err(ClassifyError::model_load(format!(
                "model not found at {}. Convert a MobileNet ONNX export with rten-convert and place it there",
                model_path.display()
            )));
        }

        tracing::debug!("Loading model from {}", model_path.display());
        let model = Model::load_file(&model_path).map_err(|e| {
            ClassifyError::model_load(format!("{}: {}", model_path.display(), e))
        })?;
        let labels = load_labels(&labels_path)?;

        Ok(Self {
            model,
            labels,
            input_size: config.input_size,
            normalization: config.normalization,
            top_k: config.top_k,
            name: config.model_file_name(),
        })
    }
}

impl Classifier for MobileNetClassifier {
    fn classify(&self, tensor: &ImageTensor) -> Result<Vec<Prediction>, ClassifyError> {
        let size = self.input_size as usize;
        let data = tensor.to_nchw_f32(self.input_size, self.normalization);
        let input = NdTensor::from_data([1, ImageTensor::CHANNELS, size, size], data);

        let output: Tensor<f32> = self
            .model
            .run_one(input.view().into(), None)
            .map_err(ClassifyError::inference)?
            .try_into()
            .map_err(ClassifyError::inference)?;

        let scores: Vec<f32> = output.iter().copied().collect();
        if scores.is_empty() {
            return Err(ClassifyError::inference("model produced an empty output"));
        }

        Ok(postprocess::to_predictions(&scores, &self.labels, self.top_k))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
