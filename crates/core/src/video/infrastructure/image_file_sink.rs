use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_sink::ImageSink;

/// Saves an annotated frame as an image file.
///
/// The format follows the output extension (`image` crate rules).
/// Missing parent directories are created.
pub struct ImageFileSink;

impl ImageFileSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSink for ImageFileSink {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        image::save_buffer(
            path,
            frame.data(),
            frame.width(),
            frame.height(),
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(())
    }
}
