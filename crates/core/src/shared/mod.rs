pub mod constants;
pub mod frame;
pub mod point;
pub mod region;
pub mod stream_info;
