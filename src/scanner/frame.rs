use image::{GrayImage, RgbImage};
use std::time::Instant;

/// One captured camera image. Immutable once built.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
    captured_at: Instant,
}

impl Frame {
    /// Wrap an RGB image captured now.
    pub fn new(image: RgbImage) -> Self {
        Self::captured_at(image, Instant::now())
    }

    pub fn captured_at(image: RgbImage, captured_at: Instant) -> Self {
        Self { image, captured_at }
    }

    /// Build a frame from packed RGB8 bytes. `None` if the buffer length
    /// does not match the dimensions.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(Self::new)
    }

    /// Build a frame from a grayscale image (each channel set to the luma value).
    pub fn from_gray(gray: &GrayImage) -> Self {
        let rgb = RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
            let v = gray.get_pixel(x, y).0[0];
            image::Rgb([v, v, v])
        });
        Self::new(rgb)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn timestamp(&self) -> Instant {
        self.captured_at
    }

    /// Luma conversion, the first preprocessing step.
    pub fn to_gray(&self) -> GrayImage {
        image::imageops::grayscale(&self.image)
    }
}
