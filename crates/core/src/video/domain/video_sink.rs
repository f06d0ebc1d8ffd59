use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

/// Abstracts video encoding so the pipeline can write output without
/// depending on a specific codec library.
pub trait VideoSink: Send {
    fn open(&mut self, path: &Path, info: &StreamInfo) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes the encoder and finalizes the container.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
