use std::collections::VecDeque;
use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::frame_source::FrameSource;

/// Decodes video files into RGB frames via ffmpeg-next.
///
/// The demuxer, decoder, and RGB scaler are set up once in `open` and
/// live in [`OpenSource`] until `close` drops them. Frames come out of
/// a lazy iterator, so only the decoder's own buffering is held in
/// memory.
pub struct FfmpegSource {
    open: Option<OpenSource>,
}

// Safety: the source is driven from one thread at a time; the ffmpeg
// contexts inside are never shared across threads.
unsafe impl Send for FfmpegSource {}

impl FfmpegSource {
    pub fn new() -> Self {
        Self { open: None }
    }
}

impl Default for FfmpegSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FfmpegSource {
    fn open(&mut self, path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;

        let (stream_index, total_frames, fps, decoder) = {
            let stream = ictx
                .streams()
                .best(ffmpeg_next::media::Type::Video)
                .ok_or_else(|| format!("{}: no video stream", path.display()))?;
            let decoder =
                ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?
                    .decoder()
                    .video()?;
            (
                stream.index(),
                stream.frames().max(0) as usize,
                reported_fps(stream.rate()),
                decoder,
            )
        };

        let info = StreamInfo {
            width: decoder.width(),
            height: decoder.height(),
            fps,
            total_frames,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            info.width,
            info.height,
            ffmpeg_next::format::Pixel::RGB24,
            info.width,
            info.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.open = Some(OpenSource {
            ictx,
            decoder,
            scaler,
            stream_index,
            width: info.width,
            height: info.height,
        });
        Ok(info)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        match self.open.as_mut() {
            Some(open) => Box::new(DecodedFrames {
                source: open,
                decoded: VecDeque::new(),
                next_index: 0,
                draining: false,
            }),
            None => Box::new(std::iter::once(Err("video source is not open".into()))),
        }
    }

    fn close(&mut self) {
        self.open = None;
    }
}

struct OpenSource {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
}

/// Pulls packets from the demuxer on demand and queues whatever the
/// decoder has ready, so one packet may yield zero or several frames.
struct DecodedFrames<'a> {
    source: &'a mut OpenSource,
    decoded: VecDeque<Frame>,
    next_index: usize,
    draining: bool,
}

impl DecodedFrames<'_> {
    fn next_video_packet(&mut self) -> Option<ffmpeg_next::Packet> {
        while let Some((stream, packet)) = self.source.ictx.packets().next() {
            if stream.index() == self.source.stream_index {
                return Some(packet);
            }
        }
        None
    }

    /// Moves every frame the decoder currently holds into the queue.
    fn queue_ready_frames(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut raw = ffmpeg_next::util::frame::video::Video::empty();
        while self.source.decoder.receive_frame(&mut raw).is_ok() {
            let mut rgb = ffmpeg_next::util::frame::video::Video::empty();
            self.source.scaler.run(&raw, &mut rgb)?;

            let pixels = packed_rgb_rows(&rgb, self.source.width, self.source.height);
            self.decoded.push_back(Frame::new(
                pixels,
                self.source.width,
                self.source.height,
                3,
                self.next_index,
            ));
            self.next_index += 1;
        }
        Ok(())
    }
}

impl Iterator for DecodedFrames<'_> {
    type Item = Result<Frame, Box<dyn std::error::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(frame) = self.decoded.pop_front() {
                return Some(Ok(frame));
            }
            if self.draining {
                return None;
            }

            let fed = match self.next_video_packet() {
                Some(packet) => self.source.decoder.send_packet(&packet),
                None => {
                    self.draining = true;
                    self.source.decoder.send_eof()
                }
            };
            if let Err(e) = fed {
                return Some(Err(Box::new(e)));
            }
            if let Err(e) = self.queue_ready_frames() {
                return Some(Err(e));
            }
        }
    }
}

/// Strips per-row stride padding out of a scaled RGB24 frame.
fn packed_rgb_rows(
    rgb: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let row_bytes = width as usize * 3;
    rgb.data(0)
        .chunks(rgb.stride(0))
        .take(height as usize)
        .flat_map(|row| row[..row_bytes].iter().copied())
        .collect()
}

fn reported_fps(rate: ffmpeg_next::Rational) -> f64 {
    let fps = f64::from(rate);
    if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        0.0
    }
}
