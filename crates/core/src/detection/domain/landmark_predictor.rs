use crate::detection::domain::landmarks::LandmarkSet;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for facial landmark prediction.
///
/// Given a grayscale frame and one detected face region, produces the
/// fixed-order landmark set defined by the underlying model. The ordering
/// convention is the model's contract, not this crate's choice.
pub trait LandmarkPredictor: Send {
    fn predict(
        &mut self,
        gray: &Frame,
        face: &Region,
    ) -> Result<LandmarkSet, Box<dyn std::error::Error>>;
}
