use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use snaplabel::{Classifier, ImageRef, MobileNetClassifier, MobileNetVersion, ModelConfig, Normalization, Pipeline};

#[derive(Parser)]
#[command(name = "snaplabel")]
#[command(about = "Classify photos with an on-device MobileNet model")]
struct Cli {
    /// Image to classify. Without it the desktop app is launched.
    #[arg(value_name = "IMAGE")]
    image: Option<String>,

    /// Path to the .rten model file
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Path to the labels file (one label per line)
    #[arg(long, value_name = "FILE")]
    labels: Option<PathBuf>,

    /// Directory holding model and labels (default: $SNAPLABEL_MODEL_DIR or ~/.cache/snaplabel)
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// MobileNet architecture version
    #[arg(long = "mobilenet-version", default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=2))]
    mobilenet_version: u8,

    /// Width multiplier
    #[arg(long, default_value_t = 1.0)]
    alpha: f32,

    /// Number of predictions to report
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Square input resolution of the model
    #[arg(long, default_value_t = 224)]
    input_size: u32,

    /// Input normalization the model was trained with
    #[arg(long, value_enum, default_value_t = Normalization::Imagenet)]
    normalization: Normalization,

    /// External capture command for "Capture photo", `{output}` is replaced with the target path
    #[arg(long, value_name = "CMD")]
    capture_command: Option<String>,

    /// Save the decoded tensor to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Print predictions as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn model_config(&self) -> anyhow::Result<ModelConfig> {
        Ok(ModelConfig {
            version: MobileNetVersion::try_from(self.mobilenet_version)?,
            alpha: self.alpha,
            top_k: self.top_k,
            input_size: self.input_size,
            normalization: self.normalization,
            model_dir: self.model_dir.clone(),
            model_path: self.model.clone(),
            labels_path: self.labels.clone(),
        })
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("snaplabel={}", default_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn classify_once(args: &Cli, image: &str) -> anyhow::Result<()> {
    let config = args.model_config()?;
    let model: Arc<dyn Classifier> = Arc::new(MobileNetClassifier::load(&config)?);
    tracing::info!("Model loaded: {}", model.name());

    let mut pipeline = Pipeline::standard(Some(model))?.with_verbose(args.verbose);
    if let Some(debug_dir) = &args.debug_out {
        pipeline = pipeline.with_debug(debug_dir.clone())?;
    }

    let image = ImageRef::parse(image);
    let predictions = pipeline.run(image.clone())?;

    if args.json {
        let report = serde_json::json!({
            "image": image.to_uri(),
            "predictions": predictions,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n=== Classification Results ===");
    println!("Image: {}", image.to_uri());
    if predictions.is_empty() {
        println!("No predictions.");
    }
    for (i, prediction) in predictions.iter().enumerate() {
        println!(
            "  {}. {} (confidence: {:.2})",
            i + 1,
            prediction.label,
            prediction.confidence
        );
    }

    Ok(())
}

#[cfg(feature = "gui")]
fn launch_gui(args: &Cli) -> anyhow::Result<()> {
    let config = snaplabel::gui::GuiConfig {
        model: args.model_config()?,
        capture_command: args
            .capture_command
            .clone()
            .or_else(snaplabel::source::CameraCapture::platform_default),
    };
    snaplabel::gui::run(config)
}

#[cfg(not(feature = "gui"))]
fn launch_gui(_args: &Cli) -> anyhow::Result<()> {
    anyhow::bail!("built without the `gui` feature, pass an IMAGE to classify")
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match &args.image {
        Some(image) => classify_once(&args, image),
        None => launch_gui(&args),
    }
}
