use crate::shared::frame::Frame;

/// One annotation pass over one frame.
///
/// Annotators are stateless across frames: every call detects and draws
/// from scratch, so a failure on one frame carries nothing into the next.
pub trait FrameAnnotator: Send {
    fn annotate(&mut self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>>;
}
