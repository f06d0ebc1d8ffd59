use std::path::PathBuf;

/// Metadata for an opened frame source.
///
/// A still image is a one-frame stream with `fps = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}
