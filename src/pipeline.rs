use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::classification::Classifier;
use crate::classification::steps::{ClassifyStep, DecodeBase64Step, JpegTensorStep, ReadFileStep};
use crate::error::ClassifyError;
use crate::models::{ImageRef, Prediction};
use crate::tensor::ImageTensor;

/// Data that flows through the pipeline, one variant per stage
#[derive(Debug)]
pub enum PipelineData {
    /// Reference to the picked image
    Source(ImageRef),
    /// File contents as base64 text
    Encoded(String),
    /// Raw encoded image bytes
    Bytes(Vec<u8>),
    /// Decoded HWC image tensor
    Tensor(ImageTensor),
    /// Ranked classifier output
    Predictions(Vec<Prediction>),
}

impl PipelineData {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineData::Source(_) => "source",
            PipelineData::Encoded(_) => "encoded",
            PipelineData::Bytes(_) => "bytes",
            PipelineData::Tensor(_) => "tensor",
            PipelineData::Predictions(_) => "predictions",
        }
    }

    /// Error for a step that was handed data from the wrong stage
    pub fn unexpected(&self, step: &str, expected: &'static str) -> ClassifyError {
        ClassifyError::Stage {
            step: step.to_string(),
            expected,
            actual: self.stage(),
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Transform data from one stage into the next
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData, ClassifyError>;

    /// Human-readable name for this step (used in logs and debug file names)
    fn name(&self) -> &str;
}

/// Sequential pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Build the read → decode → tensor → classify pipeline.
    ///
    /// Fails with [`ClassifyError::ModelNotLoaded`] when there is no model, so
    /// nothing is read or decoded without one.
    pub fn standard(model: Option<Arc<dyn Classifier>>) -> Result<Self, ClassifyError> {
        let model = model.ok_or(ClassifyError::ModelNotLoaded)?;
        Ok(Self::new()
            .add_step(Arc::new(ReadFileStep))
            .add_step(Arc::new(DecodeBase64Step))
            .add_step(Arc::new(JpegTensorStep))
            .add_step(Arc::new(ClassifyStep::new(model))))
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience)
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    /// Run every step on `image`, stopping at the first failure
    pub fn run(&self, image: ImageRef) -> Result<Vec<Prediction>, ClassifyError> {
        let mut data = PipelineData::Source(image);

        for (step_idx, step) in self.steps.iter().enumerate() {
            if self.context.verbose {
                tracing::debug!("Running step {}: {} ({} input)", step_idx + 1, step.name(), data.stage());
            }

            data = step.process(data, &self.context)?;
            self.save_debug_output(step_idx, step.name(), &data)?;
        }

        match data {
            PipelineData::Predictions(predictions) => Ok(predictions),
            other => Err(other.unexpected("pipeline output", "predictions")),
        }
    }

    fn save_debug_output(&self, step_idx: usize, step_name: &str, data: &PipelineData) -> Result<(), ClassifyError> {
        let (Some(debug_config), PipelineData::Tensor(tensor)) = (&self.context.debug, data) else {
            return Ok(());
        };

        let file_name = format!(
            "{:02}_{}.png",
            step_idx + 1,
            step_name.to_lowercase().replace(' ', "_")
        );
        let output_path = debug_config.output_dir.join(&file_name);
        tensor
            .to_image()
            .save(&output_path)
            .map_err(|e| ClassifyError::Io {
                path: output_path.clone(),
                source: std::io::Error::other(e),
            })?;

        if self.context.verbose {
            tracing::debug!("Debug: saved {}", output_path.display());
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify the image on the blocking pool so the caller's event loop stays responsive
pub async fn classify_image(
    model: Option<Arc<dyn Classifier>>,
    image: ImageRef,
) -> Result<Vec<Prediction>, ClassifyError> {
    let pipeline = Pipeline::standard(model)?;
    tracing::debug!("Classifying {}", image);
    tokio::task::spawn_blocking(move || pipeline.run(image)).await?
}
