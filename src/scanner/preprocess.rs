//! Image preprocessing variants tried by the QR decoder.
//!
//! Poor lighting, glare on phone screens and motion blur each defeat a
//! different subset of inputs, so the decoder walks these variants in order
//! and stops at the first one that yields a symbol.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use std::borrow::Cow;

const BLUR_SIGMA: f32 = 1.0;
const ADAPTIVE_BLOCK_RADIUS: u32 = 15;
const CLOSE_RADIUS: u8 = 1;

/// A single preprocessing transform applied to the grayscale frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Plain luma, no further processing
    Grayscale,
    /// Gaussian blur to suppress sensor noise and moire
    Blurred,
    /// Local-mean threshold, robust to uneven lighting
    AdaptiveThreshold,
    /// Histogram equalization for low-contrast frames
    Equalized,
    /// Thresholded then morphologically closed to fill broken modules
    MorphClose,
    /// 3x3 sharpen to recover soft edges
    EdgeEnhanced,
}

impl Variant {
    /// Every variant, in the order the decoder tries them.
    pub const ALL: [Variant; 6] = [
        Variant::Grayscale,
        Variant::Blurred,
        Variant::AdaptiveThreshold,
        Variant::Equalized,
        Variant::MorphClose,
        Variant::EdgeEnhanced,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Grayscale => "grayscale",
            Variant::Blurred => "blurred",
            Variant::AdaptiveThreshold => "adaptive_threshold",
            Variant::Equalized => "equalized",
            Variant::MorphClose => "morph_close",
            Variant::EdgeEnhanced => "edge_enhanced",
        }
    }

    /// Apply the transform to a grayscale image.
    pub fn apply<'a>(&self, gray: &'a GrayImage) -> Cow<'a, GrayImage> {
        match self {
            Variant::Grayscale => Cow::Borrowed(gray),
            Variant::Blurred => Cow::Owned(imageproc::filter::gaussian_blur_f32(gray, BLUR_SIGMA)),
            Variant::AdaptiveThreshold => Cow::Owned(imageproc::contrast::adaptive_threshold(
                gray,
                ADAPTIVE_BLOCK_RADIUS,
            )),
            Variant::Equalized => Cow::Owned(imageproc::contrast::equalize_histogram(gray)),
            Variant::MorphClose => {
                let binary = imageproc::contrast::adaptive_threshold(gray, ADAPTIVE_BLOCK_RADIUS);
                Cow::Owned(imageproc::morphology::close(&binary, Norm::LInf, CLOSE_RADIUS))
            }
            Variant::EdgeEnhanced => Cow::Owned(imageproc::filter::sharpen3x3(gray)),
        }
    }
}
