use crate::annotation::domain::overlay_renderer::{Color, OverlayRenderer};
use crate::shared::frame::Frame;
use crate::shared::point::Point;
use crate::shared::region::Region;

use super::font;

/// Software renderer writing overlay pixels straight into the frame
/// buffer.
///
/// Lines are Bresenham walks stamped with a thickness x thickness
/// square; rectangles are four edge bands; text comes from the embedded
/// 5x7 font. Everything outside the frame is clipped.
pub struct CpuOverlayRenderer;

impl CpuOverlayRenderer {
    pub fn new() -> Self {
        Self
    }

    fn stamp(&self, frame: &mut Frame, cx: i32, cy: i32, color: Color, thickness: u32) {
        let half = thickness as i32 / 2;
        let t = thickness as i32;
        for dy in 0..t {
            for dx in 0..t {
                put_pixel(frame, cx - half + dx, cy - half + dy, color);
            }
        }
    }
}

impl Default for CpuOverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayRenderer for CpuOverlayRenderer {
    fn draw_line(&self, frame: &mut Frame, from: Point, to: Point, color: Color, thickness: u32) {
        if thickness == 0 {
            return;
        }

        // Bresenham over the signed deltas; walks every pixel between
        // the endpoints inclusive.
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(frame, x, y, color, thickness);
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_rect(&self, frame: &mut Frame, region: &Region, color: Color, thickness: u32) {
        if thickness == 0 || region.is_empty() {
            return;
        }

        let t = thickness as i32;
        let x2 = region.x + region.width - 1;
        let y2 = region.y + region.height - 1;

        // Four edge bands, drawn inward from the outline.
        fill_band(frame, region.x, region.y, x2, region.y + t - 1, color);
        fill_band(frame, region.x, y2 - t + 1, x2, y2, color);
        fill_band(frame, region.x, region.y, region.x + t - 1, y2, color);
        fill_band(frame, x2 - t + 1, region.y, x2, y2, color);
    }

    fn draw_text(&self, frame: &mut Frame, text: &str, origin: Point, color: Color) {
        let mut pen_x = origin.x;
        for ch in text.chars() {
            if let Some(rows) = font::glyph(ch) {
                for (row_idx, row) in rows.iter().enumerate() {
                    for col in 0..font::GLYPH_WIDTH {
                        if row & (0x10 >> col) != 0 {
                            put_pixel(
                                frame,
                                pen_x + col as i32,
                                origin.y + row_idx as i32,
                                color,
                            );
                        }
                    }
                }
            }
            pen_x += font::GLYPH_ADVANCE as i32;
        }
    }
}

fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return;
    }
    let channels = frame.channels() as usize;
    let offset = (y as usize * frame.width() as usize + x as usize) * channels;
    let data = frame.data_mut();
    for c in 0..channels.min(3) {
        data[offset + c] = color[c];
    }
}

/// Fills an inclusive pixel rectangle, clipped to the frame.
fn fill_band(frame: &mut Frame, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
    for y in y1.max(0)..=y2.min(frame.height() as i32 - 1) {
        for x in x1.max(0)..=x2.min(frame.width() as i32 - 1) {
            put_pixel(frame, x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [255, 0, 0];

    fn make_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![0u8; (w * h * 3) as usize], w, h, 3, 0)
    }

    fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let arr = frame.as_ndarray();
        [
            arr[[y as usize, x as usize, 0]],
            arr[[y as usize, x as usize, 1]],
            arr[[y as usize, x as usize, 2]],
        ]
    }

    fn colored_count(frame: &Frame) -> usize {
        frame.data().chunks_exact(3).filter(|px| px[0] != 0).count()
    }

    // ── Lines ────────────────────────────────────────────────────────

    #[test]
    fn test_horizontal_line_covers_every_column() {
        let mut frame = make_frame(20, 10);
        let r = CpuOverlayRenderer::new();
        r.draw_line(&mut frame, Point::new(2, 5), Point::new(17, 5), RED, 1);

        for x in 2..=17 {
            assert_eq!(pixel(&frame, x, 5), RED, "missing pixel at x={x}");
        }
        assert_eq!(pixel(&frame, 1, 5), [0, 0, 0]);
        assert_eq!(pixel(&frame, 18, 5), [0, 0, 0]);
    }

    #[test]
    fn test_vertical_line_covers_every_row() {
        let mut frame = make_frame(10, 20);
        let r = CpuOverlayRenderer::new();
        r.draw_line(&mut frame, Point::new(4, 3), Point::new(4, 16), RED, 1);

        for y in 3..=16 {
            assert_eq!(pixel(&frame, 4, y), RED);
        }
    }

    #[test]
    fn test_diagonal_line_hits_endpoints() {
        let mut frame = make_frame(20, 20);
        let r = CpuOverlayRenderer::new();
        r.draw_line(&mut frame, Point::new(1, 1), Point::new(15, 12), RED, 1);

        assert_eq!(pixel(&frame, 1, 1), RED);
        assert_eq!(pixel(&frame, 15, 12), RED);
    }

    #[test]
    fn test_line_direction_is_symmetric() {
        let mut a = make_frame(20, 20);
        let mut b = make_frame(20, 20);
        let r = CpuOverlayRenderer::new();
        r.draw_line(&mut a, Point::new(2, 3), Point::new(17, 11), RED, 1);
        r.draw_line(&mut b, Point::new(17, 11), Point::new(2, 3), RED, 1);
        // Same pixel count either direction; Bresenham may differ by path
        assert_eq!(pixel(&a, 2, 3), RED);
        assert_eq!(pixel(&b, 2, 3), RED);
        assert_eq!(pixel(&a, 17, 11), RED);
        assert_eq!(pixel(&b, 17, 11), RED);
    }

    #[test]
    fn test_thickness_widens_line() {
        let mut thin = make_frame(20, 20);
        let mut thick = make_frame(20, 20);
        let r = CpuOverlayRenderer::new();
        r.draw_line(&mut thin, Point::new(2, 10), Point::new(17, 10), RED, 1);
        r.draw_line(&mut thick, Point::new(2, 10), Point::new(17, 10), RED, 3);
        assert!(colored_count(&thick) > colored_count(&thin) * 2);
    }

    #[test]
    fn test_line_clips_out_of_bounds() {
        let mut frame = make_frame(10, 10);
        let r = CpuOverlayRenderer::new();
        r.draw_line(&mut frame, Point::new(-5, 5), Point::new(20, 5), RED, 2);
        // No panic, and in-bounds part is drawn
        assert_eq!(pixel(&frame, 0, 5), RED);
        assert_eq!(pixel(&frame, 9, 5), RED);
    }

    #[test]
    fn test_zero_thickness_draws_nothing() {
        let mut frame = make_frame(10, 10);
        let r = CpuOverlayRenderer::new();
        r.draw_line(&mut frame, Point::new(0, 0), Point::new(9, 9), RED, 0);
        assert_eq!(colored_count(&frame), 0);
    }

    #[test]
    fn test_single_point_line() {
        let mut frame = make_frame(10, 10);
        let r = CpuOverlayRenderer::new();
        r.draw_line(&mut frame, Point::new(5, 5), Point::new(5, 5), RED, 1);
        assert_eq!(pixel(&frame, 5, 5), RED);
        assert_eq!(colored_count(&frame), 1);
    }

    // ── Rectangles ───────────────────────────────────────────────────

    #[test]
    fn test_rect_outline_corners_and_hollow_center() {
        let mut frame = make_frame(30, 30);
        let r = CpuOverlayRenderer::new();
        r.draw_rect(&mut frame, &Region::new(5, 5, 20, 20), RED, 1);

        assert_eq!(pixel(&frame, 5, 5), RED);
        assert_eq!(pixel(&frame, 24, 5), RED);
        assert_eq!(pixel(&frame, 5, 24), RED);
        assert_eq!(pixel(&frame, 24, 24), RED);
        // interior untouched
        assert_eq!(pixel(&frame, 15, 15), [0, 0, 0]);
    }

    #[test]
    fn test_rect_thickness_grows_inward() {
        let mut frame = make_frame(30, 30);
        let r = CpuOverlayRenderer::new();
        r.draw_rect(&mut frame, &Region::new(5, 5, 20, 20), RED, 3);

        assert_eq!(pixel(&frame, 7, 7), RED); // inside the band
        assert_eq!(pixel(&frame, 4, 4), [0, 0, 0]); // outside the outline
        assert_eq!(pixel(&frame, 15, 15), [0, 0, 0]);
    }

    #[test]
    fn test_rect_partially_off_frame_is_clipped() {
        let mut frame = make_frame(10, 10);
        let r = CpuOverlayRenderer::new();
        r.draw_rect(&mut frame, &Region::new(-5, -5, 12, 12), RED, 1);
        assert_eq!(pixel(&frame, 6, 0), RED); // top edge at y=-5.. clipped: right edge visible
    }

    #[test]
    fn test_empty_region_draws_nothing() {
        let mut frame = make_frame(10, 10);
        let r = CpuOverlayRenderer::new();
        r.draw_rect(&mut frame, &Region::new(3, 3, 0, 5), RED, 1);
        assert_eq!(colored_count(&frame), 0);
    }

    // ── Text ─────────────────────────────────────────────────────────

    #[test]
    fn test_text_marks_pixels() {
        let mut frame = make_frame(60, 20);
        let r = CpuOverlayRenderer::new();
        r.draw_text(&mut frame, "Face", Point::new(2, 2), RED);
        assert!(colored_count(&frame) > 20);
    }

    #[test]
    fn test_text_stays_within_glyph_rows() {
        let mut frame = make_frame(60, 20);
        let r = CpuOverlayRenderer::new();
        r.draw_text(&mut frame, "Eyes", Point::new(0, 5), RED);

        for x in 0..60 {
            for y in 0..5 {
                assert_eq!(pixel(&frame, x, y), [0, 0, 0]);
            }
            for y in 12..20 {
                assert_eq!(pixel(&frame, x, y), [0, 0, 0]);
            }
        }
    }

    #[test]
    fn test_text_advance_moves_right() {
        let mut one = make_frame(80, 12);
        let mut two = make_frame(80, 12);
        let r = CpuOverlayRenderer::new();
        r.draw_text(&mut one, "I", Point::new(0, 0), RED);
        r.draw_text(&mut two, "II", Point::new(0, 0), RED);
        assert_eq!(colored_count(&two), colored_count(&one) * 2);
    }

    #[test]
    fn test_text_clips_at_frame_edge() {
        let mut frame = make_frame(10, 10);
        let r = CpuOverlayRenderer::new();
        r.draw_text(&mut frame, "WWWWWW", Point::new(0, 0), RED);
        // No panic; something was drawn in bounds
        assert!(colored_count(&frame) > 0);
    }

    #[test]
    fn test_unknown_characters_skip_but_advance() {
        let mut with_gap = make_frame(80, 12);
        let mut without = make_frame(80, 12);
        let r = CpuOverlayRenderer::new();
        r.draw_text(&mut with_gap, "A?A", Point::new(0, 0), RED);
        r.draw_text(&mut without, "A A", Point::new(0, 0), RED);
        assert_eq!(colored_count(&with_gap), colored_count(&without));
    }
}
