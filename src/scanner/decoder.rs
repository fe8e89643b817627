//! QR symbol detection across preprocessing variants.

use image::GrayImage;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::Span;

use super::dedup::Deduplicator;
use super::frame::Frame;
use super::preprocess::Variant;
use crate::models::DecodedPayload;

/// Finds and decodes QR symbols in a single grayscale image.
pub trait SymbolReader: Send + Sync {
    /// Return the text of every symbol decoded in `image`.
    fn read(&self, image: &GrayImage) -> Vec<String>;
}

/// [`SymbolReader`] backed by `rqrr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrReader;

impl SymbolReader for RqrrReader {
    fn read(&self, image: &GrayImage) -> Vec<String> {
        // rqrr has panicked on malformed grids in the past; a bad frame must
        // never take the scan thread down.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let (width, height) = image.dimensions();
            let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
                width as usize,
                height as usize,
                |x, y| image.get_pixel(x as u32, y as u32).0[0],
            );
            prepared
                .detect_grids()
                .into_iter()
                .filter_map(|grid| match grid.decode() {
                    Ok((_meta, content)) => Some(content),
                    Err(e) => {
                        tracing::debug!("Skipping undecodable grid: {}", e);
                        None
                    }
                })
                .collect::<Vec<_>>()
        }));

        result.unwrap_or_else(|_| {
            tracing::debug!("QR decoder faulted on frame, treating as no detection");
            Vec::new()
        })
    }
}

/// Multi-variant QR decoder with time-based de-duplication.
pub struct QrDecoder {
    reader: Box<dyn SymbolReader>,
    variants: Vec<Variant>,
    dedup: Deduplicator,
    span: Span,
}

impl QrDecoder {
    pub fn new(duplicate_window: Duration) -> Self {
        Self::with_reader(Box::new(RqrrReader), duplicate_window)
    }

    pub fn with_reader(reader: Box<dyn SymbolReader>, duplicate_window: Duration) -> Self {
        Self {
            reader,
            variants: Variant::ALL.to_vec(),
            dedup: Deduplicator::new(duplicate_window),
            span: Span::none(),
        }
    }

    /// Restrict or reorder the variants tried per frame.
    pub fn with_variants(mut self, variants: Vec<Variant>) -> Self {
        self.variants = variants;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn duplicate_window(&self) -> Duration {
        self.dedup.window()
    }

    /// Run the variants in order and return the first that detects anything,
    /// with its distinct decoded texts. No time de-duplication.
    pub fn detect(&self, frame: &Frame) -> Option<(Variant, Vec<String>)> {
        if frame.width() == 0 || frame.height() == 0 {
            tracing::debug!(
                "Skipping empty {}x{} frame",
                frame.width(),
                frame.height()
            );
            return None;
        }

        let gray = frame.to_gray();
        for variant in &self.variants {
            let processed = match panic::catch_unwind(AssertUnwindSafe(|| variant.apply(&gray))) {
                Ok(processed) => processed,
                Err(_) => {
                    tracing::debug!("{} preprocessing faulted, trying next variant", variant.name());
                    continue;
                }
            };
            let mut texts = self.reader.read(&processed);
            if texts.is_empty() {
                continue;
            }
            let mut seen = std::collections::HashSet::new();
            texts.retain(|t| seen.insert(t.clone()));
            return Some((*variant, texts));
        }
        None
    }

    /// Decode one frame, dropping payloads seen within the duplicate window.
    pub fn decode(&mut self, frame: &Frame) -> Vec<DecodedPayload> {
        let _enter = self.span.enter();
        let Some((variant, texts)) = self.detect(frame) else {
            return Vec::new();
        };

        let now = frame.timestamp();
        let mut payloads = Vec::new();
        for text in texts {
            if self.dedup.admit(&text, now) {
                tracing::debug!("Decoded QR code via {} variant", variant.name());
                payloads.push(DecodedPayload::new(text, now));
            } else {
                tracing::trace!("Suppressed duplicate QR code");
            }
        }
        payloads
    }

    /// Forget recently seen payloads.
    pub fn reset(&mut self) {
        self.dedup.reset();
    }
}
