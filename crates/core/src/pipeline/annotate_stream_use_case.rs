use std::path::Path;
use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::video_sink::VideoSink;

use super::pipeline_logger::PipelineLogger;

/// Sequential video annotation pipeline: read → annotate → write.
///
/// Owns the source, annotator, and sink for the duration of the run and
/// releases both endpoints when `execute` returns, whether the run
/// completed, failed, or was stopped early by the `on_frame` callback.
pub struct AnnotateStreamUseCase {
    source: Box<dyn FrameSource>,
    sink: Box<dyn VideoSink>,
    annotator: Box<dyn FrameAnnotator>,
    logger: Box<dyn PipelineLogger>,
    on_frame: Option<Box<dyn FnMut(usize, usize) -> bool + Send>>,
}

impl AnnotateStreamUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        sink: Box<dyn VideoSink>,
        annotator: Box<dyn FrameAnnotator>,
        logger: Box<dyn PipelineLogger>,
        on_frame: Option<Box<dyn FnMut(usize, usize) -> bool + Send>>,
    ) -> Self {
        Self {
            source,
            sink,
            annotator,
            logger,
            on_frame,
        }
    }

    /// Runs the pipeline over every frame of the input.
    ///
    /// The `on_frame` callback is invoked once per frame before it is
    /// processed; returning `false` stops the run after the frames
    /// written so far, which is not an error.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let result = self.run(input_path, output_path);

        // Endpoints are released no matter how the run ended.
        self.source.close();
        let close_result = self.sink.close();

        result.and(close_result)
    }

    fn run(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let info = self.source.open(input_path)?;
        self.sink.open(output_path, &info)?;

        let total = info.total_frames;
        self.logger.info(&format!(
            "Annotating {}x{} stream ({total} frames)",
            info.width, info.height
        ));

        let mut processed = 0usize;
        for result in self.source.frames() {
            let mut frame = result?;

            if let Some(callback) = self.on_frame.as_mut() {
                if !callback(frame.index(), total) {
                    self.logger.info("Stopped early by caller");
                    break;
                }
            }

            let annotate_start = Instant::now();
            self.annotator.annotate(&mut frame)?;
            self.logger.timing(
                "annotate",
                annotate_start.elapsed().as_secs_f64() * 1000.0,
            );

            let write_start = Instant::now();
            self.sink.write(&frame)?;
            self.logger
                .timing("write", write_start.elapsed().as_secs_f64() * 1000.0);

            processed += 1;
            self.logger.progress(processed, total);
        }

        self.logger.summary();
        Ok(())
    }
}
