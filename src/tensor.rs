use image::{ImageFormat, RgbImage, imageops::FilterType};

use crate::error::ClassifyError;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Pixel normalization expected by the model input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Normalization {
    /// (x / 255 - mean) / std per channel
    #[default]
    Imagenet,
    /// x / 127.5 - 1, range [-1, 1]
    Symmetric,
}

/// Decoded image as a height × width × channel tensor of u8 RGB values
#[derive(Debug, Clone)]
pub struct ImageTensor {
    image: RgbImage,
}

impl ImageTensor {
    pub const CHANNELS: usize = 3;

    /// Decode JPEG bytes into an RGB tensor
    pub fn from_jpeg(bytes: &[u8]) -> Result<Self, ClassifyError> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?;
        Ok(Self::from_rgb(decoded.to_rgb8()))
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    /// `[height, width, channels]`
    pub fn shape(&self) -> [usize; 3] {
        [self.height(), self.width(), Self::CHANNELS]
    }

    /// Raw HWC data
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn to_image(&self) -> RgbImage {
        self.image.clone()
    }

    /// Resize to `size`×`size` and lay out as a `[1, 3, size, size]` f32 buffer
    pub fn to_nchw_f32(&self, size: u32, normalization: Normalization) -> Vec<f32> {
        let resized = image::imageops::resize(&self.image, size, size, FilterType::Triangle);
        let plane = size as usize * size as usize;
        let mut data = vec![0.0f32; Self::CHANNELS * plane];

        for (x, y, pixel) in resized.enumerate_pixels() {
            let offset = y as usize * size as usize + x as usize;
            for c in 0..Self::CHANNELS {
                let value = pixel[c] as f32;
                data[c * plane + offset] = match normalization {
                    Normalization::Imagenet => (value / 255.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c],
                    Normalization::Symmetric => value / 127.5 - 1.0,
                };
            }
        }

        data
    }
}
