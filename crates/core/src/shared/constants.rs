/// Ultraface face detection model (ONNX model zoo).
pub const FACE_MODEL_NAME: &str = "version-RFB-320.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/onnx/models/raw/main/validated/vision/body_analysis/ultraface/models/version-RFB-320.onnx";

/// PFLD 68-point facial landmark model.
pub const LANDMARK_MODEL_NAME: &str = "pfld-68.onnx";
pub const LANDMARK_MODEL_URL: &str =
    "https://github.com/cunjian/pytorch_face_landmark/raw/master/onnx_models/pfld.onnx";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Overlay colors as RGB triples: green axes and face boxes, blue eye
/// boxes, white labels.
pub const COLOR_GREEN: [u8; 3] = [0, 255, 0];
pub const COLOR_BLUE: [u8; 3] = [0, 0, 255];
pub const COLOR_WHITE: [u8; 3] = [250, 250, 250];

pub const FACE_LABEL: &str = "Face";
pub const EYES_LABEL: &str = "Eyes";
