//! Ultraface face detector using ONNX Runtime via `ort`.
//!
//! A lightweight single-class detector: 320x240 input, per-prior scores
//! and normalized corner boxes, decoded with a confidence threshold and
//! NMS.

use std::path::Path;

use crate::detection::domain::region_detector::RegionDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Ultraface RFB-320 input resolution.
const INPUT_WIDTH: u32 = 320;
const INPUT_HEIGHT: u32 = 240;

/// Input normalization: `(pixel - MEAN) / SCALE`.
const MEAN: f32 = 127.0;
const SCALE: f32 = 128.0;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.3;

pub struct OnnxFaceDetector {
    session: ort::session::Session,
    confidence: f64,
}

impl OnnxFaceDetector {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self {
            session,
            confidence,
        })
    }
}

impl RegionDetector for OnnxFaceDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let fw = gray.width();
        let fh = gray.height();

        // 1. Preprocess: resize to 320x240, normalize, NCHW
        let input_tensor = preprocess(gray, INPUT_WIDTH, INPUT_HEIGHT);

        // 2. Inference
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // Ultraface outputs two tensors:
        // - scores: [1, N, 2] (background, face)
        // - boxes:  [1, N, 4] (normalized x1, y1, x2, y2)
        if outputs.len() < 2 {
            return Err(format!(
                "Ultraface model expected 2 outputs, got {}",
                outputs.len()
            )
            .into());
        }

        let scores = outputs[0].try_extract_array::<f32>()?;
        let boxes = outputs[1].try_extract_array::<f32>()?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;
        let box_data = boxes.as_slice().ok_or("Cannot get box slice")?;

        let num_priors = score_data.len() / 2;

        // 3. Threshold on the face-class score, scale boxes to the frame
        let mut raw_dets = Vec::new();
        for i in 0..num_priors {
            let score = score_data[i * 2 + 1] as f64;
            if score < self.confidence {
                continue;
            }

            let box_offset = i * 4;
            if box_offset + 4 > box_data.len() {
                break;
            }

            let x1 = (box_data[box_offset] * fw as f32).max(0.0);
            let y1 = (box_data[box_offset + 1] * fh as f32).max(0.0);
            let x2 = (box_data[box_offset + 2] * fw as f32).min(fw as f32);
            let y2 = (box_data[box_offset + 3] * fh as f32).min(fh as f32);

            raw_dets.push(RawDet {
                x1: x1 as f64,
                y1: y1 as f64,
                x2: x2 as f64,
                y2: y2 as f64,
                score,
            });
        }

        // 4. NMS
        let filtered = nms(&mut raw_dets, NMS_IOU_THRESH);

        // 5. Build regions
        let regions = filtered
            .iter()
            .map(|d| {
                let x = d.x1 as i32;
                let y = d.y1 as i32;
                let w = ((d.x2 - d.x1) as i32).min(fw as i32 - x);
                let h = ((d.y2 - d.y1) as i32).min(fh as i32 - y);
                Region::new(x, y, w, h)
            })
            .filter(|r| !r.is_empty())
            .collect();

        Ok(regions)
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Resize to `width x height` and normalize to `(-1, 1)` NCHW float32.
///
/// A grayscale input is replicated across the three channels the model
/// expects.
fn preprocess(frame: &Frame, width: u32, height: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let src_c = frame.channels() as usize;
    let (w, h) = (width as usize, height as usize);

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, h, w));

    for y in 0..h {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / h as f64) as usize).min(src_h - 1);
        for x in 0..w {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / w as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                let v = src[[src_y, src_x, c.min(src_c - 1)]] as f32;
                tensor[[0, c, y, x]] = (v - MEAN) / SCALE;
            }
        }
    }

    tensor
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct RawDet {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    score: f64,
}

fn nms(dets: &mut [RawDet], iou_thresh: f64) -> Vec<RawDet> {
    dets.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; dets.len()];

    for i in 0..dets.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(dets[i].clone());
        for j in (i + 1)..dets.len() {
            if suppressed[j] {
                continue;
            }
            if bbox_iou(&dets[i], &dets[j]) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

fn bbox_iou(a: &RawDet, b: &RawDet) -> f64 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    inter / (area_a + area_b - inter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: f64, y1: f64, x2: f64, y2: f64, score: f64) -> RawDet {
        RawDet {
            x1,
            y1,
            x2,
            y2,
            score,
        }
    }

    #[test]
    fn test_nms_keeps_highest_score_of_overlapping_pair() {
        let mut dets = vec![
            det(0.0, 0.0, 100.0, 100.0, 0.6),
            det(5.0, 5.0, 105.0, 105.0, 0.9),
        ];
        let kept = nms(&mut dets, 0.3);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].score, 0.9);
    }

    #[test]
    fn test_nms_keeps_disjoint_detections() {
        let mut dets = vec![
            det(0.0, 0.0, 50.0, 50.0, 0.8),
            det(200.0, 200.0, 250.0, 250.0, 0.7),
        ];
        assert_eq!(nms(&mut dets, 0.3).len(), 2);
    }

    #[test]
    fn test_nms_empty_input() {
        assert!(nms(&mut [], 0.3).is_empty());
    }

    #[test]
    fn test_bbox_iou_full_overlap() {
        let a = det(0.0, 0.0, 10.0, 10.0, 1.0);
        assert!((bbox_iou(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_iou_disjoint() {
        let a = det(0.0, 0.0, 10.0, 10.0, 1.0);
        let b = det(20.0, 20.0, 30.0, 30.0, 1.0);
        assert_eq!(bbox_iou(&a, &b), 0.0);
    }

    #[test]
    fn test_preprocess_shape_and_range() {
        let frame = Frame::new(vec![255u8; 64 * 48], 64, 48, 1, 0);
        let tensor = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT);
        assert_eq!(tensor.shape(), &[1, 3, 240, 320]);
        // 255 normalizes to (255 - 127) / 128 = 1.0
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_preprocess_replicates_gray_channel() {
        let frame = Frame::new(vec![64u8; 32 * 32], 32, 32, 1, 0);
        let tensor = preprocess(&frame, 8, 8);
        for c in 0..3 {
            assert_eq!(tensor[[0, c, 4, 4]], tensor[[0, 0, 4, 4]]);
        }
    }

    #[test]
    fn test_preprocess_rgb_keeps_channels_distinct() {
        // One pixel frame: R=255, G=0, B=127
        let frame = Frame::new(vec![255, 0, 127], 1, 1, 3, 0);
        let tensor = preprocess(&frame, 2, 2);
        assert!(tensor[[0, 0, 0, 0]] > 0.9);
        assert!(tensor[[0, 1, 0, 0]] < -0.9);
        assert!(tensor[[0, 2, 0, 0]].abs() < 0.01);
    }
}
