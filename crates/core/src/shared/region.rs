pub const DEFAULT_IOU_THRESHOLD: f64 = 0.3;

/// An axis-aligned detection rectangle produced by a face or eye detector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Greedy deduplication: keeps a region only if its IoU with every
    /// previously-kept region is at or below the threshold.
    ///
    /// Multi-scale detectors report the same face several times with
    /// slightly shifted boxes; callers pass detections in score order so
    /// the strongest box wins.
    pub fn deduplicate(regions: &[Region], iou_threshold: f64) -> Vec<Region> {
        if regions.len() <= 1 {
            return regions.to_vec();
        }
        let mut kept: Vec<Region> = Vec::with_capacity(regions.len());
        for r in regions {
            let dominated = kept.iter().any(|k| r.iou(k) > iou_threshold);
            if !dominated {
                kept.push(r.clone());
            }
        }
        kept
    }

    pub fn iou(&self, other: &Region) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.width as f64 * self.height as f64;
        let area_b = other.width as f64 * other.height as f64;
        inter / (area_a + area_b - inter)
    }

    /// Intersection of this region with a `frame_width` x `frame_height`
    /// frame. Degenerate input collapses to a zero-size region at the
    /// clamped origin.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> Region {
        let fw = frame_width as i32;
        let fh = frame_height as i32;
        let x1 = self.x.clamp(0, fw);
        let y1 = self.y.clamp(0, fh);
        let x2 = (self.x + self.width).clamp(x1, fw);
        let y2 = (self.y + self.height).clamp(y1, fh);
        Region::new(x1, y1, x2 - x1, y2 - y1)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}
