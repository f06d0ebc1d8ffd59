use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::frame_source::FrameSource;

/// Presents a still image as a one-frame stream using the `image` crate.
///
/// Lets the annotation pipeline treat images and videos uniformly.
pub struct ImageFileSource {
    frame: Option<Frame>,
    info: Option<StreamInfo>,
}

impl ImageFileSource {
    pub fn new() -> Self {
        Self {
            frame: None,
            info: None,
        }
    }
}

impl Default for ImageFileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for ImageFileSource {
    fn open(&mut self, path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_rgb8();
        let (width, height) = (img.width(), img.height());

        let info = StreamInfo {
            width,
            height,
            fps: 0.0,
            total_frames: 1,
            codec: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_lowercase(),
            source_path: Some(path.to_path_buf()),
        };

        self.frame = Some(Frame::new(img.into_raw(), width, height, 3, 0));
        self.info = Some(info.clone());

        Ok(info)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        match self.frame.take() {
            Some(frame) => Box::new(std::iter::once(Ok(frame))),
            None => Box::new(std::iter::once(Err("ImageFileSource: not opened".into()))),
        }
    }

    fn close(&mut self) {
        self.frame = None;
        self.info = None;
    }
}
