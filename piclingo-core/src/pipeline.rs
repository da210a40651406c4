//! The per-frame control loop
//!
//! One iteration: capture, detect, translate every detection through two
//! hops, draw the results, render, update the sink status. Everything runs
//! in sequence on the calling task. The loop ends when the source or the
//! sink stops streaming; any error ends it immediately.

use crate::config::RunConfig;
use crate::detection::Detector;
use crate::error::{PipelineError, Result};
use crate::languages;
use crate::overlay::{
    normalize_text, Position, TextRenderer, TextStyle, BANNER_ANCHOR, LABEL_INDENT, LINE_SPACING,
    NO_OBJECTS_BANNER,
};
use crate::stream::{FrameSink, FrameSource};
use crate::translation::{translate_label, HopPair, Translator};
use std::sync::Arc;
use tracing::{debug, info};

/// Counters kept across iterations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames that went through detection and were rendered
    pub frames: u64,
    /// Captures that returned no frame
    pub timeouts: u64,
    pub detections: u64,
    pub translation_calls: u64,
}

pub struct FramePipeline<S, D, R, K, T> {
    config: Arc<RunConfig>,
    source: S,
    detector: D,
    renderer: R,
    sink: K,
    translator: T,
    stats: PipelineStats,
}

impl<S, D, R, K, T> FramePipeline<S, D, R, K, T>
where
    S: FrameSource,
    D: Detector<Frame = S::Frame>,
    R: TextRenderer<Frame = S::Frame>,
    K: FrameSink<Frame = S::Frame>,
    T: Translator,
{
    pub fn new(config: Arc<RunConfig>, source: S, detector: D, renderer: R, sink: K, translator: T) -> Self {
        Self {
            config,
            source,
            detector,
            renderer,
            sink,
            translator,
            stats: PipelineStats::default(),
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Run until the source or sink stops streaming.
    pub async fn run(&mut self) -> Result<PipelineStats> {
        info!(
            "Translating detections {} ---> {}",
            self.config.intermediate_language, self.config.final_language
        );

        loop {
            let Some(mut frame) = self.source.capture()? else {
                self.stats.timeouts += 1;
                if !self.source.is_streaming() {
                    break;
                }
                continue;
            };

            self.process_frame(&mut frame).await?;

            if !self.source.is_streaming() || !self.sink.is_streaming() {
                break;
            }
        }

        info!("Stream ended after {} frames", self.stats.frames);
        Ok(self.stats)
    }

    /// Detect, annotate and render a single frame.
    pub async fn process_frame(&mut self, frame: &mut S::Frame) -> Result<()> {
        let detections = self.detector.detect(frame, self.config.overlay)?;
        info!("detected {} objects in image", detections.len());
        self.stats.detections += detections.len() as u64;

        if detections.is_empty() {
            self.renderer
                .overlay_text(frame, NO_OBJECTS_BANNER, BANNER_ANCHOR, TextStyle::BANNER)?;
        } else {
            let mut last: Option<HopPair> = None;

            for detection in &detections {
                let label = self
                    .detector
                    .class_description(detection.class_id)
                    .ok_or(PipelineError::UnknownClass(detection.class_id))?
                    .to_string();

                let hops = translate_label(
                    &self.translator,
                    &label,
                    &self.config.intermediate_language,
                    &self.config.final_language,
                )
                .await?;
                self.stats.translation_calls += 2;

                let at = Position::new(detection.bbox.left as i32 + LABEL_INDENT, detection.bbox.top as i32);
                self.renderer
                    .overlay_text(frame, &normalize_text(&hops.first.text), at, TextStyle::LABEL)?;
                self.renderer.overlay_text(
                    frame,
                    &normalize_text(&hops.second.text),
                    at.below(LINE_SPACING),
                    TextStyle::LABEL,
                )?;

                info!("{} ({})", hops.first.text, hops.first.dest);
                info!("{} ({})", hops.second.text, hops.second.dest);
                last = Some(hops);
            }

            // Banner reflects the last detection only
            if let Some(hops) = last {
                let banner = summary_banner(&hops)?;
                self.renderer
                    .overlay_text(frame, &banner, BANNER_ANCHOR, TextStyle::BANNER)?;
            }
        }

        self.sink.render(frame)?;
        let status = format!("{} | Network {:.0} FPS", self.config.network, self.detector.network_fps());
        debug!("status: {}", status);
        self.sink.set_status(&status);
        self.detector.log_profiler_times();

        self.stats.frames += 1;
        Ok(())
    }
}

/// `<first hop language> ---> <second hop language>`
pub fn summary_banner(hops: &HopPair) -> Result<String> {
    Ok(format!(
        "{} ---> {}",
        languages::language_name(&hops.first.dest)?,
        languages::language_name(&hops.second.dest)?
    ))
}
