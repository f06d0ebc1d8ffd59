use std::path::Path;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::image_sink::ImageSink;

/// Single-image annotation pipeline: read → annotate → write.
pub struct AnnotateImageUseCase {
    source: Box<dyn FrameSource>,
    image_sink: Box<dyn ImageSink>,
    annotator: Box<dyn FrameAnnotator>,
}

impl AnnotateImageUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        image_sink: Box<dyn ImageSink>,
        annotator: Box<dyn FrameAnnotator>,
    ) -> Self {
        Self {
            source,
            image_sink,
            annotator,
        }
    }

    /// Reads a single image, annotates it, and writes the output.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let _info = self.source.open(input_path)?;

        let frame = self.source.frames().next().ok_or("No frames in image")?;
        let mut frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                self.source.close();
                return Err(e);
            }
        };
        self.source.close();

        self.annotator.annotate(&mut frame)?;
        self.image_sink.write(output_path, &frame)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use crate::shared::stream_info::StreamInfo;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubImageSource {
        frame: Option<Frame>,
        closed: Arc<Mutex<bool>>,
    }

    impl StubImageSource {
        fn new(frame: Frame) -> Self {
            Self {
                frame: Some(frame),
                closed: Arc::new(Mutex::new(false)),
            }
        }
    }

    impl FrameSource for StubImageSource {
        fn open(&mut self, _path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>> {
            Ok(StreamInfo {
                width: self.frame.as_ref().unwrap().width(),
                height: self.frame.as_ref().unwrap().height(),
                fps: 0.0,
                total_frames: 1,
                codec: String::new(),
                source_path: None,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(self.frame.take().into_iter().map(Ok))
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
            self.frame = None;
        }
    }

    struct StubImageSink {
        written: Arc<Mutex<Vec<(std::path::PathBuf, Frame)>>>,
    }

    impl StubImageSink {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ImageSink for StubImageSink {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    struct MarkingAnnotator;

    impl FrameAnnotator for MarkingAnnotator {
        fn annotate(&mut self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>> {
            frame.data_mut()[0] = 255;
            Ok(())
        }
    }

    fn make_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![128; (w * h * 3) as usize], w, h, 3, 0)
    }

    // --- Tests ---

    #[test]
    fn test_writes_annotated_frame() {
        let sink = StubImageSink::new();
        let written = sink.written.clone();

        let mut uc = AnnotateImageUseCase::new(
            Box::new(StubImageSource::new(make_frame(100, 100))),
            Box::new(sink),
            Box::new(MarkingAnnotator),
        );
        uc.execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, Path::new("out.png"));
        assert_eq!(written[0].1.data()[0], 255);
    }

    #[test]
    fn test_output_dimensions_preserved() {
        let sink = StubImageSink::new();
        let written = sink.written.clone();

        let mut uc = AnnotateImageUseCase::new(
            Box::new(StubImageSource::new(make_frame(200, 150))),
            Box::new(sink),
            Box::new(MarkingAnnotator),
        );
        uc.execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written[0].1.width(), 200);
        assert_eq!(written[0].1.height(), 150);
    }

    #[test]
    fn test_source_closed_after_read() {
        let source = StubImageSource::new(make_frame(50, 50));
        let closed = source.closed.clone();

        let mut uc = AnnotateImageUseCase::new(
            Box::new(source),
            Box::new(StubImageSink::new()),
            Box::new(MarkingAnnotator),
        );
        uc.execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_annotator_error_propagates() {
        struct FailingAnnotator;

        impl FrameAnnotator for FailingAnnotator {
            fn annotate(&mut self, _frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>> {
                Err("annotation failed".into())
            }
        }

        let mut uc = AnnotateImageUseCase::new(
            Box::new(StubImageSource::new(make_frame(50, 50))),
            Box::new(StubImageSink::new()),
            Box::new(FailingAnnotator),
        );
        assert!(uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .is_err());
    }
}
