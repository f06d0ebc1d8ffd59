use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::video_sink::VideoSink;

/// Frame rate used when the source stream did not report one.
const FALLBACK_FPS: i32 = 30;

/// Encodes annotated RGB frames into a video file via ffmpeg-next.
///
/// Output is MPEG4/YUV420P, which plays back without any optional
/// codec being compiled into libavcodec. All encoder state lives in
/// [`OpenSink`] so that closing the sink tears everything down at once.
pub struct FfmpegSink {
    open: Option<OpenSink>,
}

// Safety: the sink is driven from one thread at a time; the ffmpeg
// contexts inside are never shared across threads.
unsafe impl Send for FfmpegSink {}

impl FfmpegSink {
    pub fn new() -> Self {
        Self { open: None }
    }
}

impl Default for FfmpegSink {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSink for FfmpegSink {
    fn open(&mut self, path: &Path, info: &StreamInfo) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let fps = nominal_fps(info);
        let time_base = ffmpeg_next::Rational(1, fps);

        let mut octx = ffmpeg_next::format::output(path)?;
        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder unavailable")?;

        let mut video = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;
        video.set_width(info.width);
        video.set_height(info.height);
        video.set_format(ffmpeg_next::format::Pixel::YUV420P);
        video.set_time_base(time_base);
        video.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
        if octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER)
        {
            video.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = video.open_with(ffmpeg_next::Dictionary::new())?;
        octx.add_stream(Some(codec))?.set_parameters(&encoder);
        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            info.width,
            info.height,
            ffmpeg_next::format::Pixel::YUV420P,
            info.width,
            info.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.open = Some(OpenSink {
            octx,
            encoder,
            scaler,
            width: info.width,
            height: info.height,
            time_base,
            next_pts: 0,
        });
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let open = self.open.as_mut().ok_or("video sink is not open")?;
        if frame.width() != open.width || frame.height() != open.height {
            return Err(format!(
                "frame is {}x{} but the sink was opened for {}x{}",
                frame.width(),
                frame.height(),
                open.width,
                open.height
            )
            .into());
        }
        open.encode(frame)
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        match self.open.take() {
            Some(open) => open.finish(),
            None => Ok(()),
        }
    }
}

struct OpenSink {
    octx: ffmpeg_next::format::context::Output,
    encoder: ffmpeg_next::codec::encoder::video::Encoder,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    time_base: ffmpeg_next::Rational,
    next_pts: i64,
}

impl OpenSink {
    fn encode(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut rgb = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            self.width,
            self.height,
        );

        // Staged row by row; the destination rows may carry stride padding.
        let row_bytes = self.width as usize * 3;
        let stride = rgb.stride(0);
        let staged = rgb.data_mut(0);
        for (src_row, dst_row) in frame
            .data()
            .chunks_exact(row_bytes)
            .zip(staged.chunks_mut(stride))
        {
            dst_row[..row_bytes].copy_from_slice(src_row);
        }

        let mut yuv = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&rgb, &mut yuv)?;
        yuv.set_pts(Some(self.next_pts));
        self.next_pts += 1;

        self.encoder.send_frame(&yuv)?;
        self.drain_packets()
    }

    /// Writes out every packet the encoder has ready.
    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let stream_time_base = self
            .octx
            .stream(0)
            .ok_or("output stream missing")?
            .time_base();

        let mut packet = ffmpeg_next::Packet::empty();
        while self.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(0);
            packet.rescale_ts(self.time_base, stream_time_base);
            packet.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.encoder.send_eof()?;
        self.drain_packets()?;
        self.octx.write_trailer()?;
        Ok(())
    }
}

fn nominal_fps(info: &StreamInfo) -> i32 {
    let rounded = info.fps.round() as i32;
    if rounded > 0 {
        rounded
    } else {
        FALLBACK_FPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::frame_source::FrameSource;
    use crate::video::infrastructure::ffmpeg_source::FfmpegSource;

    fn clip_info(width: u32, height: u32, fps: f64) -> StreamInfo {
        StreamInfo {
            width,
            height,
            fps,
            total_frames: 0,
            codec: String::new(),
            source_path: None,
        }
    }

    fn solid_frame(index: usize, width: u32, height: u32, value: u8) -> Frame {
        Frame::new(
            vec![value; (width * height * 3) as usize],
            width,
            height,
            3,
            index,
        )
    }

    #[test]
    fn test_encoded_file_decodes_with_same_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut sink = FfmpegSink::new();
        sink.open(&path, &clip_info(160, 120, 30.0)).unwrap();
        for i in 0..4 {
            sink.write(&solid_frame(i, 160, 120, 100)).unwrap();
        }
        sink.close().unwrap();

        let mut source = FfmpegSource::new();
        let info = source.open(&path).unwrap();
        assert_eq!((info.width, info.height), (160, 120));
        assert_eq!(source.frames().filter(|f| f.is_ok()).count(), 4);
    }

    #[test]
    fn test_encoded_brightness_survives_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut sink = FfmpegSink::new();
        sink.open(&path, &clip_info(160, 120, 30.0)).unwrap();
        sink.write(&solid_frame(0, 160, 120, 128)).unwrap();
        sink.close().unwrap();

        let mut source = FfmpegSource::new();
        source.open(&path).unwrap();
        let frame = source.frames().next().unwrap().unwrap();

        // Encoding is lossy; only overall brightness is checked.
        let avg = frame.data().iter().map(|&b| b as f64).sum::<f64>() / frame.data().len() as f64;
        assert!(
            (avg - 128.0).abs() < 40.0,
            "average pixel value {avg} should be near 128"
        );
    }

    #[test]
    fn test_unreported_fps_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut sink = FfmpegSink::new();
        sink.open(&path, &clip_info(160, 120, 0.0)).unwrap();
        sink.write(&solid_frame(0, 160, 120, 100)).unwrap();
        sink.close().unwrap();

        let mut source = FfmpegSource::new();
        let info = source.open(&path).unwrap();
        assert!((info.fps - f64::from(FALLBACK_FPS)).abs() < 1.0);
    }

    #[test]
    fn test_write_before_open_errors() {
        let mut sink = FfmpegSink::new();
        assert!(sink.write(&solid_frame(0, 160, 120, 100)).is_err());
    }

    #[test]
    fn test_mismatched_frame_size_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut sink = FfmpegSink::new();
        sink.open(&path, &clip_info(160, 120, 30.0)).unwrap();
        assert!(sink.write(&solid_frame(0, 80, 60, 100)).is_err());
        sink.close().unwrap();
    }

    #[test]
    fn test_close_without_open_is_a_no_op() {
        let mut sink = FfmpegSink::new();
        assert!(sink.close().is_ok());
    }

    #[test]
    fn test_double_close_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut sink = FfmpegSink::new();
        sink.open(&path, &clip_info(160, 120, 30.0)).unwrap();
        sink.write(&solid_frame(0, 160, 120, 100)).unwrap();
        sink.close().unwrap();
        assert!(sink.close().is_ok());
    }
}
