pub mod detection_box_annotator;
pub mod eye_axis;
pub mod eye_axis_annotator;
pub mod frame_annotator;
pub mod overlay_renderer;
