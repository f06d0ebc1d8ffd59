use std::sync::{Arc, Mutex};

use crate::detection::domain::region_detector::RegionDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Hands one detector to several consumers, memoizing the result per
/// frame index.
///
/// The face detector feeds both the face-box pass and the eye-region
/// pass; without sharing, each pass would run inference on the same
/// frame. Clones are handles onto the same inner detector, so the model
/// runs at most once per frame no matter how many handles ask.
#[derive(Clone)]
pub struct SharedRegionDetector {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    detector: Box<dyn RegionDetector>,
    cached: Option<(usize, Vec<Region>)>,
}

impl SharedRegionDetector {
    pub fn new(detector: Box<dyn RegionDetector>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                detector,
                cached: None,
            })),
        }
    }
}

impl RegionDetector for SharedRegionDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| "shared detector lock poisoned")?;

        if let Some((index, regions)) = &inner.cached {
            if *index == gray.index() {
                return Ok(regions.clone());
            }
        }

        // Errors are not cached; the next call retries.
        let regions = inner.detector.detect(gray)?;
        inner.cached = Some((gray.index(), regions.clone()));
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TallyDetector {
        calls: Arc<AtomicUsize>,
        regions: Vec<Region>,
    }

    impl RegionDetector for TallyDetector {
        fn detect(&mut self, _gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl RegionDetector for FailingDetector {
        fn detect(&mut self, _gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Err("detector offline".into())
        }
    }

    fn gray_frame(index: usize) -> Frame {
        Frame::new(vec![0u8; 64 * 48], 64, 48, 1, index)
    }

    fn shared_with_tally(regions: Vec<Region>) -> (SharedRegionDetector, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let detector = SharedRegionDetector::new(Box::new(TallyDetector {
            calls: calls.clone(),
            regions,
        }));
        (detector, calls)
    }

    #[test]
    fn test_two_handles_share_one_inference_per_frame() {
        let (mut face_pass, calls) = shared_with_tally(vec![Region::new(10, 10, 30, 30)]);
        let mut eye_pass = face_pass.clone();

        let frame = gray_frame(0);
        let from_face_pass = face_pass.detect(&frame).unwrap();
        let from_eye_pass = eye_pass.detect(&frame).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(from_face_pass, from_eye_pass);
    }

    #[test]
    fn test_new_frame_index_runs_inner_again() {
        let (mut detector, calls) = shared_with_tally(vec![]);

        detector.detect(&gray_frame(0)).unwrap();
        detector.detect(&gray_frame(0)).unwrap();
        detector.detect(&gray_frame(1)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_inner_error_propagates_and_is_retried() {
        let mut detector = SharedRegionDetector::new(Box::new(FailingDetector));

        assert!(detector.detect(&gray_frame(0)).is_err());
        assert!(detector.detect(&gray_frame(0)).is_err());
    }
}
