pub mod ffmpeg_sink;
pub mod ffmpeg_source;
pub mod image_file_sink;
pub mod image_file_source;
