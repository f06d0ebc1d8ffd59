use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Decouples use cases from specific output mechanisms (stdout, log crate)
/// so each caller can observe pipeline behavior without changing the
/// orchestration code.
pub trait PipelineLogger: Send {
    /// Report frame-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named pipeline stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-pipeline summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
///
/// Used by tests where logger output is irrelevant.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that tracks per-stage timing and provides a
/// summary report at pipeline completion.
///
/// Progress output is throttled to every `throttle_frames` frames
/// to avoid excessive I/O on large videos.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_frames: usize,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            total_frames: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.total_frames;
        let mut lines = Vec::new();

        lines.push(format!(
            "Pipeline summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    /// Returns the timing data for a given stage.
    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_frames = total.max(current);
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
