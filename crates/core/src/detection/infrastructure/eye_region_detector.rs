use crate::detection::domain::landmark_predictor::LandmarkPredictor;
use crate::detection::domain::landmarks::{LEFT_EYE_CONTOUR, RIGHT_EYE_CONTOUR};
use crate::detection::domain::region_detector::RegionDetector;
use crate::shared::frame::Frame;
use crate::shared::region::{Region, DEFAULT_IOU_THRESHOLD};

/// Fraction of the eye box size added as padding on each side.
const EYE_PADDING: f64 = 0.25;

/// Reports eye bounding boxes by running a face detector and taking the
/// bounds of each face's landmark eye contours.
///
/// Stands in for a dedicated eye detector: the landmark predictor already
/// localizes both eyes, so a second region model would be redundant.
pub struct EyeRegionDetector {
    face_detector: Box<dyn RegionDetector>,
    predictor: Box<dyn LandmarkPredictor>,
}

impl EyeRegionDetector {
    pub fn new(
        face_detector: Box<dyn RegionDetector>,
        predictor: Box<dyn LandmarkPredictor>,
    ) -> Self {
        Self {
            face_detector,
            predictor,
        }
    }
}

impl RegionDetector for EyeRegionDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let faces = self.face_detector.detect(gray)?;
        let mut eyes = Vec::with_capacity(faces.len() * 2);

        for face in &faces {
            let landmarks = self.predictor.predict(gray, face)?;
            for range in [LEFT_EYE_CONTOUR, RIGHT_EYE_CONTOUR] {
                let Some((min, max)) = landmarks.contour_bounds(range) else {
                    continue;
                };
                let w = max.x - min.x;
                let h = max.y - min.y;
                let pad_x = (w as f64 * EYE_PADDING) as i32;
                let pad_y = (h as f64 * EYE_PADDING) as i32;
                let eye = Region::new(
                    min.x - pad_x,
                    min.y - pad_y,
                    w + 2 * pad_x,
                    h + 2 * pad_y,
                )
                .clamped(gray.width(), gray.height());
                if !eye.is_empty() {
                    eyes.push(eye);
                }
            }
        }

        // Overlapping face detections yield near-identical eye boxes
        Ok(Region::deduplicate(&eyes, DEFAULT_IOU_THRESHOLD))
    }
}
