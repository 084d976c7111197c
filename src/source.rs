//! Image sources: the native file picker and an external camera capture command.
//!
//! Both yield zero or one [`ImageRef`]. Cancelling, or any failure to obtain a
//! photo, is reported as `None` rather than an error.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tempfile::TempDir;
use tokio::process::Command;

use crate::models::ImageRef;

/// Placeholder replaced with the capture output path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Photo file extensions offered by the picker
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Library,
    Camera,
}

pub trait ImageSource: Sized {
    /// Ask the user for a photo. `None` means nothing was selected.
    fn acquire(self) -> impl Future<Output = Option<ImageRef>> + Send + 'static;
}

/// Only the first asset of a picker response is used
pub fn first_asset(assets: Vec<ImageRef>) -> Option<ImageRef> {
    assets.into_iter().next()
}

/// Native "choose from library" dialog
#[cfg(feature = "gui")]
#[derive(Debug, Clone, Default)]
pub struct LibraryPicker;

#[cfg(feature = "gui")]
impl ImageSource for LibraryPicker {
    fn acquire(self) -> impl Future<Output = Option<ImageRef>> + Send + 'static {
        async {
            let handle = rfd::AsyncFileDialog::new()
                .set_title("Choose a photo")
                .add_filter("Photos", PHOTO_EXTENSIONS)
                .pick_file()
                .await;
            first_asset(
                handle
                    .map(|file| ImageRef::new(file.path()))
                    .into_iter()
                    .collect(),
            )
        }
    }
}

/// Captures a photo by running an external command such as `fswebcam {output}`
#[derive(Debug, Clone)]
pub struct CameraCapture {
    command: Option<String>,
    output_dir: Arc<TempDir>,
    counter: Arc<AtomicU64>,
}

impl CameraCapture {
    pub fn new(command: Option<String>) -> std::io::Result<Self> {
        let output_dir = tempfile::Builder::new().prefix("snaplabel-capture-").tempdir()?;
        Ok(Self {
            command,
            output_dir: Arc::new(output_dir),
            counter: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Capture tool commonly available on this platform
    pub fn platform_default() -> Option<String> {
        if cfg!(target_os = "linux") {
            Some("fswebcam --no-banner -r 1280x720 {output}".to_string())
        } else if cfg!(target_os = "macos") {
            Some("imagesnap -w 1 {output}".to_string())
        } else {
            None
        }
    }

    pub fn is_configured(&self) -> bool {
        self.command.is_some()
    }

    fn next_output_path(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.output_dir.path().join(format!("capture-{:03}.jpg", n))
    }

    /// Split the command template and substitute the output path.
    /// Without a placeholder the path is appended as the last argument.
    fn build_args(template: &str, output: &str) -> Vec<String> {
        let mut args: Vec<String> = template
            .split_whitespace()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, output))
            .collect();
        if !template.contains(OUTPUT_PLACEHOLDER) {
            args.push(output.to_string());
        }
        args
    }
}

impl ImageSource for CameraCapture {
    fn acquire(self) -> impl Future<Output = Option<ImageRef>> + Send + 'static {
        let output = self.next_output_path();
        let CameraCapture {
            command, output_dir, ..
        } = self;

        async move {
            // directory must outlive the capture
            let _output_dir = output_dir;
            let Some(template) = command else {
                tracing::warn!("No capture command configured, camera unavailable");
                return None;
            };

            let args = Self::build_args(&template, &output.to_string_lossy());
            let (program, rest) = args.split_first()?;

            tracing::debug!("Running capture command: {}", args.join(" "));
            let status = match Command::new(program).args(rest).status().await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!("Failed to start capture command '{}': {}", program, e);
                    return None;
                }
            };

            if !status.success() {
                tracing::warn!("Capture command exited with {}", status);
                return None;
            }

            match tokio::fs::metadata(&output).await {
                Ok(meta) if meta.len() > 0 => Some(ImageRef::from(output)),
                _ => {
                    tracing::warn!("Capture command produced no image at {}", output.display());
                    None
                }
            }
        }
    }
}
