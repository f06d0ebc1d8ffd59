use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::annotation::domain::overlay_renderer::{Color, OverlayRenderer};
use crate::detection::domain::region_detector::RegionDetector;
use crate::shared::constants::COLOR_WHITE;
use crate::shared::frame::Frame;
use crate::shared::point::Point;
use crate::shared::region::Region;

pub const DEFAULT_BOX_THICKNESS: u32 = 3;

/// One detector with its overlay label and box color.
pub struct LabeledDetector {
    pub detector: Box<dyn RegionDetector>,
    pub label: String,
    pub color: Color,
}

/// Draws a labeled bounding box for every region each detector reports.
///
/// The cascade-style variant of the annotation component: no derived
/// geometry, just rectangle outlines with the label text at each
/// region's top-left corner.
pub struct DetectionBoxAnnotator {
    detectors: Vec<LabeledDetector>,
    renderer: Box<dyn OverlayRenderer>,
    thickness: u32,
}

impl DetectionBoxAnnotator {
    pub fn new(detectors: Vec<LabeledDetector>, renderer: Box<dyn OverlayRenderer>) -> Self {
        Self {
            detectors,
            renderer,
            thickness: DEFAULT_BOX_THICKNESS,
        }
    }

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Outlines each region and places `label` at its top-left corner.
    /// The frame is mutated in place.
    pub fn annotate_detections(
        &self,
        frame: &mut Frame,
        regions: &[Region],
        label: &str,
        color: Color,
    ) {
        for region in regions {
            self.renderer
                .draw_rect(frame, region, color, self.thickness);
            self.renderer
                .draw_text(frame, label, Point::new(region.x, region.y), COLOR_WHITE);
        }
    }
}

impl FrameAnnotator for DetectionBoxAnnotator {
    fn annotate(&mut self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>> {
        let gray = frame.to_grayscale();

        // Collect first: drawing happens on the color frame after all
        // detectors ran on the shared grayscale copy.
        let mut passes = Vec::with_capacity(self.detectors.len());
        for entry in &mut self.detectors {
            let regions = entry.detector.detect(&gray)?;
            passes.push((regions, entry.label.clone(), entry.color));
        }

        for (regions, label, color) in passes {
            self.annotate_detections(frame, &regions, &label, color);
        }

        Ok(())
    }
}
