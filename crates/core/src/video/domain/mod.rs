pub mod frame_source;
pub mod image_sink;
pub mod video_sink;
