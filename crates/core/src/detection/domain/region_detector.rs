use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for region detection (faces, eyes).
///
/// Detectors consume a grayscale frame and report zero or more bounding
/// boxes. Implementations may be stateful (e.g., reusing results between
/// frames), hence `&mut self`.
pub trait RegionDetector: Send {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
