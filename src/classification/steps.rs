use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::classification::Classifier;
use crate::error::ClassifyError;
use crate::pipeline::{PipelineContext, PipelineData, PipelineStep};
use crate::tensor::ImageTensor;

/// Read the referenced file as a base64 string
pub struct ReadFileStep;

impl PipelineStep for ReadFileStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData, ClassifyError> {
        let image = match data {
            PipelineData::Source(image) => image,
            other => return Err(other.unexpected(self.name(), "source")),
        };
        let bytes = std::fs::read(image.path()).map_err(|source| ClassifyError::Io {
            path: image.path().to_path_buf(),
            source,
        })?;
        Ok(PipelineData::Encoded(STANDARD.encode(bytes)))
    }

    fn name(&self) -> &str {
        "Read File"
    }
}

/// Decode base64 text into raw bytes
pub struct DecodeBase64Step;

impl PipelineStep for DecodeBase64Step {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData, ClassifyError> {
        let encoded = match data {
            PipelineData::Encoded(encoded) => encoded,
            other => return Err(other.unexpected(self.name(), "encoded")),
        };
        Ok(PipelineData::Bytes(STANDARD.decode(encoded.as_bytes())?))
    }

    fn name(&self) -> &str {
        "Decode Base64"
    }
}

/// Decode JPEG bytes into an HWC tensor
pub struct JpegTensorStep;

impl PipelineStep for JpegTensorStep {
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData, ClassifyError> {
        let bytes = match data {
            PipelineData::Bytes(bytes) => bytes,
            other => return Err(other.unexpected(self.name(), "bytes")),
        };
        let tensor = ImageTensor::from_jpeg(&bytes)?;
        if context.verbose {
            tracing::debug!("Decoded tensor shape {:?}", tensor.shape());
        }
        Ok(PipelineData::Tensor(tensor))
    }

    fn name(&self) -> &str {
        "JPEG To Tensor"
    }
}

/// Run the classifier on the tensor
pub struct ClassifyStep {
    model: Arc<dyn Classifier>,
}

impl ClassifyStep {
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model }
    }
}

impl PipelineStep for ClassifyStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData, ClassifyError> {
        let tensor = match data {
            PipelineData::Tensor(tensor) => tensor,
            other => return Err(other.unexpected(self.name(), "tensor")),
        };
        let predictions = self.model.classify(&tensor)?;
        Ok(PipelineData::Predictions(predictions))
    }

    fn name(&self) -> &str {
        "Classify"
    }
}
