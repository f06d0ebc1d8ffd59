pub mod landmark_predictor;
pub mod landmarks;
pub mod region_detector;
