use crate::detection::domain::region_detector::RegionDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Decorator that runs the inner detector every N frames and repeats the
/// last result in between.
///
/// Detection dominates per-frame cost; on preview-style workloads faces
/// move little between adjacent frames, so stale boxes for N-1 frames
/// are an acceptable trade. No extrapolation is attempted — there is no
/// cross-frame identity to extrapolate with.
pub struct IntervalDetector {
    inner: Box<dyn RegionDetector>,
    interval: usize,
    frame_count: usize,
    last_regions: Vec<Region>,
}

impl IntervalDetector {
    pub fn new(inner: Box<dyn RegionDetector>, interval: usize) -> Result<Self, &'static str> {
        if interval < 1 {
            return Err("interval must be >= 1");
        }
        Ok(Self {
            inner,
            interval,
            frame_count: 0,
            last_regions: Vec::new(),
        })
    }
}

impl RegionDetector for IntervalDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if self.frame_count % self.interval == 0 {
            self.last_regions = self.inner.detect(gray)?;
        }
        self.frame_count += 1;
        Ok(self.last_regions.clone())
    }
}
