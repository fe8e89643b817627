//! Frame acquisition and QR decode pipeline.
//!
//! camera frame → [`QrDecoder`] (preprocessing variants, time de-dup) →
//! [`PayloadParser`] → callback, driven by [`ScanLoop`].

pub mod decoder;
pub mod dedup;
pub mod frame;
pub mod payload;
pub mod preprocess;
pub mod scan_loop;

pub use decoder::{QrDecoder, RqrrReader, SymbolReader};
pub use dedup::Deduplicator;
pub use frame::Frame;
pub use payload::PayloadParser;
pub use preprocess::Variant;
pub use scan_loop::{ScanCallback, ScanLoop, ScanOptions, ScanState, ScanStats, StopHandle};
