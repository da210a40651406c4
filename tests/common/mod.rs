//! In-memory frames and collaborators shared by the scenario and property tests

#![allow(dead_code)]

use async_trait::async_trait;
use piclingo_core::detection::{BoundingBox, Detection, Detector, OverlayFlags};
use piclingo_core::error::Result;
use piclingo_core::overlay::{Position, TextRenderer, TextStyle};
use piclingo_core::stream::{FrameSink, FrameSource};
use piclingo_core::translation::{Translation, Translator};

pub const LABELS: &[&str] = &["person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck"];

/// A frame is the list of texts drawn onto it
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Canvas {
    pub texts: Vec<(String, Position, TextStyle)>,
}

pub fn boxed(class_id: u32, left: f32, top: f32) -> Detection {
    Detection {
        class_id,
        confidence: 0.92,
        bbox: BoundingBox::new(left, top, left + 64.0, top + 48.0),
    }
}

pub struct CanvasSource {
    remaining: usize,
}

impl CanvasSource {
    pub fn new(frames: usize) -> Self {
        Self { remaining: frames }
    }
}

impl FrameSource for CanvasSource {
    type Frame = Canvas;

    fn capture(&mut self) -> Result<Option<Canvas>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Canvas::default()))
    }

    fn is_streaming(&self) -> bool {
        self.remaining > 0
    }
}

/// Reports the same detections for every frame
pub struct FixedDetector {
    pub detections: Vec<Detection>,
}

impl Detector for FixedDetector {
    type Frame = Canvas;

    fn detect(&mut self, _frame: &mut Canvas, _overlay: OverlayFlags) -> Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }

    fn class_description(&self, class_id: u32) -> Option<&str> {
        LABELS.get(class_id as usize).copied()
    }

    fn network_fps(&self) -> f32 {
        60.0
    }

    fn log_profiler_times(&self) {}
}

pub struct CanvasRenderer;

impl TextRenderer for CanvasRenderer {
    type Frame = Canvas;

    fn overlay_text(&mut self, frame: &mut Canvas, text: &str, at: Position, style: TextStyle) -> Result<()> {
        frame.texts.push((text.to_string(), at, style));
        Ok(())
    }
}

#[derive(Default)]
pub struct CanvasSink {
    pub rendered: Vec<Canvas>,
    pub status: String,
}

impl FrameSink for CanvasSink {
    type Frame = Canvas;

    fn render(&mut self, frame: &Canvas) -> Result<()> {
        self.rendered.push(frame.clone());
        Ok(())
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    fn is_streaming(&self) -> bool {
        true
    }
}

/// Echoes the text tagged with the destination; counts calls
#[derive(Default)]
pub struct EchoTranslator {
    pub calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str, src: Option<&str>, dest: &str) -> Result<Translation> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(Translation {
            text: format!("{}@{}", text, dest),
            src: src.unwrap_or("en").to_string(),
            dest: dest.to_string(),
        })
    }
}
