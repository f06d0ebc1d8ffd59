use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

/// Reads frames from a video or image source.
///
/// Implementations handle I/O details (codec, container format, etc.)
/// while the pipeline works with the abstract `Frame` and `StreamInfo`
/// types.
pub trait FrameSource: Send {
    /// Opens a source file and returns its stream properties.
    fn open(&mut self, path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
