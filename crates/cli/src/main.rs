use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use eyetrace_core::annotation::domain::detection_box_annotator::{
    DetectionBoxAnnotator, LabeledDetector, DEFAULT_BOX_THICKNESS,
};
use eyetrace_core::annotation::domain::eye_axis_annotator::{
    EyeAxisAnnotator, DEFAULT_AXIS_THICKNESS,
};
use eyetrace_core::annotation::domain::frame_annotator::FrameAnnotator;
use eyetrace_core::annotation::infrastructure::cpu_overlay_renderer::CpuOverlayRenderer;
use eyetrace_core::detection::domain::landmark_predictor::LandmarkPredictor;
use eyetrace_core::detection::domain::region_detector::RegionDetector;
use eyetrace_core::detection::infrastructure::eye_region_detector::EyeRegionDetector;
use eyetrace_core::detection::infrastructure::interval_detector::IntervalDetector;
use eyetrace_core::detection::infrastructure::model_resolver;
use eyetrace_core::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use eyetrace_core::detection::infrastructure::onnx_landmark_predictor::OnnxLandmarkPredictor;
use eyetrace_core::detection::infrastructure::shared_region_detector::SharedRegionDetector;
use eyetrace_core::pipeline::annotate_image_use_case::AnnotateImageUseCase;
use eyetrace_core::pipeline::annotate_stream_use_case::AnnotateStreamUseCase;
use eyetrace_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use eyetrace_core::shared::constants::{
    COLOR_BLUE, COLOR_GREEN, EYES_LABEL, FACE_LABEL, FACE_MODEL_NAME, FACE_MODEL_URL,
    IMAGE_EXTENSIONS, LANDMARK_MODEL_NAME, LANDMARK_MODEL_URL,
};
use eyetrace_core::video::domain::frame_source::FrameSource;
use eyetrace_core::video::domain::image_sink::ImageSink;
use eyetrace_core::video::domain::video_sink::VideoSink;
use eyetrace_core::video::infrastructure::ffmpeg_sink::FfmpegSink;
use eyetrace_core::video::infrastructure::ffmpeg_source::FfmpegSource;
use eyetrace_core::video::infrastructure::image_file_sink::ImageFileSink;
use eyetrace_core::video::infrastructure::image_file_source::ImageFileSource;

/// Eye-axis and detection-box annotation for videos and images.
#[derive(Parser)]
#[command(name = "eyetrace")]
struct Cli {
    /// Input video or image file.
    input: PathBuf,

    /// Output file.
    output: PathBuf,

    /// Annotation mode: axes or boxes.
    #[arg(long, default_value = "axes")]
    mode: String,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    confidence: f64,

    /// Run detection every Nth frame (1 = every frame).
    #[arg(long, default_value = "1")]
    interval: usize,

    /// Overlay line thickness in pixels.
    #[arg(long)]
    thickness: Option<u32>,

    /// Path to a face detection model file (skips the download cache).
    #[arg(long)]
    face_model: Option<PathBuf>,

    /// Path to a landmark model file (skips the download cache).
    #[arg(long)]
    landmark_model: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let annotator = build_annotator(&cli)?;

    if is_image(&cli.input) {
        run_image(&cli.input, &cli.output, annotator)?;
    } else {
        run_video(&cli.input, &cli.output, annotator)?;
    }

    Ok(())
}

fn run_image(
    input: &Path,
    output: &Path,
    annotator: Box<dyn FrameAnnotator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source: Box<dyn FrameSource> = Box::new(ImageFileSource::new());
    let image_sink: Box<dyn ImageSink> = Box::new(ImageFileSink::new());

    let mut use_case = AnnotateImageUseCase::new(source, image_sink, annotator);
    use_case.execute(input, output)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_video(
    input: &Path,
    output: &Path,
    annotator: Box<dyn FrameAnnotator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source: Box<dyn FrameSource> = Box::new(FfmpegSource::new());
    let sink: Box<dyn VideoSink> = Box::new(FfmpegSink::new());

    let progress: Box<dyn FnMut(usize, usize) -> bool + Send> = Box::new(|current, total| {
        eprint!("\rProcessing frame {current}/{total}");
        true
    });

    let mut use_case = AnnotateStreamUseCase::new(
        source,
        sink,
        annotator,
        Box::new(StdoutPipelineLogger::default()),
        Some(progress),
    );
    use_case.execute(input, output)?;
    eprintln!();
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn build_annotator(cli: &Cli) -> Result<Box<dyn FrameAnnotator>, Box<dyn std::error::Error>> {
    let renderer = Box::new(CpuOverlayRenderer::new());

    match cli.mode.as_str() {
        "axes" => {
            let face_detector = build_face_detector(cli)?;
            let predictor = build_landmark_predictor(cli)?;
            let thickness = cli.thickness.unwrap_or(DEFAULT_AXIS_THICKNESS);
            Ok(Box::new(
                EyeAxisAnnotator::new(face_detector, predictor, renderer)
                    .with_style(COLOR_GREEN, thickness),
            ))
        }
        _ => {
            // "boxes": one pass for faces, one for eyes derived from landmarks.
            // Both passes share one face detector, so the model is loaded once
            // and face inference runs once per frame.
            let face_detector = SharedRegionDetector::new(build_face_detector(cli)?);
            let eye_detector = Box::new(EyeRegionDetector::new(
                Box::new(face_detector.clone()),
                build_landmark_predictor(cli)?,
            ));
            let detectors = vec![
                LabeledDetector {
                    detector: Box::new(face_detector),
                    label: FACE_LABEL.to_string(),
                    color: COLOR_GREEN,
                },
                LabeledDetector {
                    detector: eye_detector,
                    label: EYES_LABEL.to_string(),
                    color: COLOR_BLUE,
                },
            ];
            let thickness = cli.thickness.unwrap_or(DEFAULT_BOX_THICKNESS);
            Ok(Box::new(
                DetectionBoxAnnotator::new(detectors, renderer).with_thickness(thickness),
            ))
        }
    }
}

fn build_face_detector(cli: &Cli) -> Result<Box<dyn RegionDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {FACE_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        FACE_MODEL_NAME,
        FACE_MODEL_URL,
        cli.face_model.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    let base: Box<dyn RegionDetector> =
        Box::new(OnnxFaceDetector::new(&model_path, cli.confidence)?);

    if cli.interval > 1 {
        Ok(Box::new(IntervalDetector::new(base, cli.interval)?))
    } else {
        Ok(base)
    }
}

fn build_landmark_predictor(
    cli: &Cli,
) -> Result<Box<dyn LandmarkPredictor>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {LANDMARK_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        LANDMARK_MODEL_NAME,
        LANDMARK_MODEL_URL,
        cli.landmark_model.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    Ok(Box::new(OnnxLandmarkPredictor::new(&model_path)?))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if cli.mode != "axes" && cli.mode != "boxes" {
        return Err(format!("Mode must be 'axes' or 'boxes', got '{}'", cli.mode).into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.interval == 0 {
        return Err("Interval must be at least 1".into());
    }
    if let Some(t) = cli.thickness {
        if t == 0 {
            return Err("Thickness must be at least 1".into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
