pub mod eye_region_detector;
pub mod interval_detector;
pub mod model_resolver;
pub mod onnx_face_detector;
pub mod onnx_landmark_predictor;
pub mod shared_region_detector;
