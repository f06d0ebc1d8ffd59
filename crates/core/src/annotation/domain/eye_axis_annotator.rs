use crate::annotation::domain::eye_axis::{derive_eye_axes, EyeAxis};
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::annotation::domain::overlay_renderer::{Color, OverlayRenderer};
use crate::detection::domain::landmark_predictor::LandmarkPredictor;
use crate::detection::domain::region_detector::RegionDetector;
use crate::shared::constants::COLOR_GREEN;
use crate::shared::frame::Frame;

pub const DEFAULT_AXIS_THICKNESS: u32 = 2;

/// Draws eye-axis cross lines for every detected face.
///
/// Per frame: grayscale conversion, face detection, landmark prediction
/// per face, axis derivation, then four line segments per face.
pub struct EyeAxisAnnotator {
    face_detector: Box<dyn RegionDetector>,
    predictor: Box<dyn LandmarkPredictor>,
    renderer: Box<dyn OverlayRenderer>,
    color: Color,
    thickness: u32,
}

impl EyeAxisAnnotator {
    pub fn new(
        face_detector: Box<dyn RegionDetector>,
        predictor: Box<dyn LandmarkPredictor>,
        renderer: Box<dyn OverlayRenderer>,
    ) -> Self {
        Self {
            face_detector,
            predictor,
            renderer,
            color: COLOR_GREEN,
            thickness: DEFAULT_AXIS_THICKNESS,
        }
    }

    pub fn with_style(mut self, color: Color, thickness: u32) -> Self {
        self.color = color;
        self.thickness = thickness;
        self
    }

    fn draw_axis(&self, frame: &mut Frame, axis: &EyeAxis) {
        self.renderer.draw_line(
            frame,
            axis.horizontal.start,
            axis.horizontal.end,
            self.color,
            self.thickness,
        );
        self.renderer.draw_line(
            frame,
            axis.vertical.start,
            axis.vertical.end,
            self.color,
            self.thickness,
        );
    }
}

impl FrameAnnotator for EyeAxisAnnotator {
    fn annotate(&mut self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>> {
        let gray = frame.to_grayscale();
        let faces = self.face_detector.detect(&gray)?;

        for face in &faces {
            let landmarks = self.predictor.predict(&gray, face)?;
            let (left, right) = derive_eye_axes(&landmarks)?;
            self.draw_axis(frame, &left);
            self.draw_axis(frame, &right);
        }

        Ok(())
    }
}
