use crate::shared::frame::Frame;
use crate::shared::point::Point;
use crate::shared::region::Region;

/// RGB color triple.
pub type Color = [u8; 3];

/// Rendering collaborator: primitive drawing operations over a mutable
/// frame.
///
/// Implementations clip out-of-bounds pixels instead of erroring, so
/// overlay geometry near frame edges degrades gracefully.
pub trait OverlayRenderer: Send {
    fn draw_line(&self, frame: &mut Frame, from: Point, to: Point, color: Color, thickness: u32);

    fn draw_rect(&self, frame: &mut Frame, region: &Region, color: Color, thickness: u32);

    fn draw_text(&self, frame: &mut Frame, text: &str, origin: Point, color: Color);
}
