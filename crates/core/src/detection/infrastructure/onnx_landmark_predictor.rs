//! 68-point facial landmark predictor using ONNX Runtime via `ort`.
//!
//! PFLD-style model: a square crop around the face region is resized to
//! 112x112 and the model returns 136 values, normalized (x, y) pairs
//! relative to the crop. Outputs are mapped back into frame coordinates.

use std::path::Path;

use crate::detection::domain::landmark_predictor::LandmarkPredictor;
use crate::detection::domain::landmarks::{LandmarkSet, LANDMARK_COUNT};
use crate::shared::frame::Frame;
use crate::shared::point::Point;
use crate::shared::region::Region;

/// PFLD model input resolution.
const INPUT_SIZE: u32 = 112;

pub struct OnnxLandmarkPredictor {
    session: ort::session::Session,
}

impl OnnxLandmarkPredictor {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self { session })
    }
}

impl LandmarkPredictor for OnnxLandmarkPredictor {
    fn predict(
        &mut self,
        gray: &Frame,
        face: &Region,
    ) -> Result<LandmarkSet, Box<dyn std::error::Error>> {
        // 1. Square crop around the face, clamped to the frame
        let (crop_x, crop_y, crop_w, crop_h) = square_crop_bounds(gray, face);
        if crop_w == 0 || crop_h == 0 {
            return Err("Face region lies outside the frame".into());
        }

        // 2. Preprocess: resize the crop to 112x112, scale to [0, 1], NCHW
        let input_tensor = preprocess(gray, crop_x, crop_y, crop_w, crop_h);

        // 3. Inference
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Landmark model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let data = tensor.as_slice().ok_or("Cannot get landmark slice")?;

        if data.len() < LANDMARK_COUNT * 2 {
            return Err(format!(
                "Landmark model returned {} values, expected {}",
                data.len(),
                LANDMARK_COUNT * 2
            )
            .into());
        }

        // 4. Map normalized crop coordinates back into the frame
        let mut points = Vec::with_capacity(LANDMARK_COUNT);
        for i in 0..LANDMARK_COUNT {
            let nx = data[i * 2] as f64;
            let ny = data[i * 2 + 1] as f64;
            let x = crop_x as f64 + nx * crop_w as f64;
            let y = crop_y as f64 + ny * crop_h as f64;
            points.push(Point::new(x as i32, y as i32));
        }

        Ok(LandmarkSet::new(points))
    }
}

/// Bounds of a square crop centered on the region, clamped to the frame.
///
/// Returns `(x, y, width, height)` in frame coordinates. The crop may end
/// up rectangular when the square runs past a frame edge.
fn square_crop_bounds(frame: &Frame, region: &Region) -> (usize, usize, usize, usize) {
    let fw = frame.width() as i32;
    let fh = frame.height() as i32;

    let cx = region.x + region.width / 2;
    let cy = region.y + region.height / 2;
    let half = region.width.max(region.height) / 2;

    let x1 = (cx - half).max(0).min(fw) as usize;
    let y1 = (cy - half).max(0).min(fh) as usize;
    let x2 = (cx + half).max(0).min(fw) as usize;
    let y2 = (cy + half).max(0).min(fh) as usize;

    (x1, y1, x2 - x1, y2 - y1)
}

/// Resize a crop of the frame to 112x112 and scale to `[0, 1]` NCHW float32.
///
/// A grayscale frame is replicated across the three channels the model
/// expects.
fn preprocess(
    frame: &Frame,
    crop_x: usize,
    crop_y: usize,
    crop_w: usize,
    crop_h: usize,
) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_c = frame.channels() as usize;
    let size = INPUT_SIZE as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, size, size));

    for y in 0..size {
        let src_y = crop_y + (((y as f64 + 0.5) * crop_h as f64 / size as f64) as usize).min(crop_h - 1);
        for x in 0..size {
            let src_x =
                crop_x + (((x as f64 + 0.5) * crop_w as f64 / size as f64) as usize).min(crop_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c.min(src_c - 1)]] as f32 / 255.0;
            }
        }
    }

    tensor
}
