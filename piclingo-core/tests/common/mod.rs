//! Scripted collaborators for driving the frame loop without devices

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use piclingo_core::detection::{BoundingBox, Detection, Detector, OverlayFlags};
use piclingo_core::error::{PipelineError, Result};
use piclingo_core::overlay::{Position, TextRenderer, TextStyle};
use piclingo_core::stream::{FrameSink, FrameSource};
use piclingo_core::translation::{Translation, Translator};
use std::collections::VecDeque;

pub const LABELS: &[&str] = &["person", "bicycle", "car", "dog"];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TestFrame {
    pub index: usize,
}

pub fn detection(class_id: u32, left: f32, top: f32) -> Detection {
    Detection {
        class_id,
        confidence: 0.9,
        bbox: BoundingBox::new(left, top, left + 50.0, top + 80.0),
    }
}

/// Yields the scripted captures in order; streams while entries remain.
pub struct ScriptedSource {
    script: VecDeque<Option<TestFrame>>,
}

impl ScriptedSource {
    /// `true` entries are frames, `false` entries are capture timeouts.
    pub fn new(script: &[bool]) -> Self {
        let script = script
            .iter()
            .enumerate()
            .map(|(index, has_frame)| has_frame.then(|| TestFrame { index }))
            .collect();
        Self { script }
    }

    pub fn frames(count: usize) -> Self {
        Self::new(&vec![true; count])
    }
}

impl FrameSource for ScriptedSource {
    type Frame = TestFrame;

    fn capture(&mut self) -> Result<Option<TestFrame>> {
        Ok(self.script.pop_front().flatten())
    }

    fn is_streaming(&self) -> bool {
        !self.script.is_empty()
    }
}

/// Returns one scripted detection list per frame; empty once exhausted.
pub struct ScriptedDetector {
    per_frame: VecDeque<Vec<Detection>>,
    pub overlays_requested: Vec<OverlayFlags>,
    pub profiler_dumps: usize,
    pub fps: f32,
}

impl ScriptedDetector {
    pub fn new(per_frame: Vec<Vec<Detection>>) -> Self {
        Self {
            per_frame: per_frame.into(),
            overlays_requested: Vec::new(),
            profiler_dumps: 0,
            fps: 41.6,
        }
    }
}

impl Detector for ScriptedDetector {
    type Frame = TestFrame;

    fn detect(&mut self, _frame: &mut TestFrame, overlay: OverlayFlags) -> Result<Vec<Detection>> {
        self.overlays_requested.push(overlay);
        Ok(self.per_frame.pop_front().unwrap_or_default())
    }

    fn class_description(&self, class_id: u32) -> Option<&str> {
        LABELS.get(class_id as usize).copied()
    }

    fn network_fps(&self) -> f32 {
        self.fps
    }

    fn log_profiler_times(&self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub frame: usize,
    pub text: String,
    pub at: Position,
    pub style: TextStyle,
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub drawn: Vec<DrawnText>,
}

impl TextRenderer for RecordingRenderer {
    type Frame = TestFrame;

    fn overlay_text(&mut self, frame: &mut TestFrame, text: &str, at: Position, style: TextStyle) -> Result<()> {
        self.drawn.push(DrawnText { frame: frame.index, text: text.to_string(), at, style });
        Ok(())
    }
}

/// Stops streaming after `stop_after` renders, if set.
#[derive(Default)]
pub struct RecordingSink {
    pub rendered: Vec<usize>,
    pub statuses: Vec<String>,
    pub stop_after: Option<usize>,
}

impl FrameSink for RecordingSink {
    type Frame = TestFrame;

    fn render(&mut self, frame: &TestFrame) -> Result<()> {
        self.rendered.push(frame.index);
        Ok(())
    }

    fn set_status(&mut self, status: &str) {
        self.statuses.push(status.to_string());
    }

    fn is_streaming(&self) -> bool {
        self.stop_after.map(|n| self.rendered.len() < n).unwrap_or(true)
    }
}

/// Dictionary translator recording every call.
///
/// Known `(text, dest)` pairs come from a small table; anything else is
/// echoed back as `text-dest`. Texts listed in `fail_on` produce a
/// translation error; `dest_override` makes the service report a different
/// destination code for one text.
#[derive(Default)]
pub struct DictionaryTranslator {
    pub calls: Mutex<Vec<(String, Option<String>, String)>>,
    pub fail_on: Vec<String>,
    pub dest_override: Option<(String, String)>,
}

const DICTIONARY: &[(&str, &str, &str)] = &[
    ("person", "en", "person"),
    ("person", "es", "persona"),
    ("person", "fr", "personne"),
    ("personne", "es", "persona"),
    ("car", "en", "car"),
    ("car", "es", "coche"),
    ("dog", "en", "dog"),
    ("dog", "es", "perro"),
    ("bicycle", "de", "Fahrrad"),
    ("Fahrrad", "fr", "vélo"),
];

impl DictionaryTranslator {
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Translator for DictionaryTranslator {
    async fn translate(&self, text: &str, src: Option<&str>, dest: &str) -> Result<Translation> {
        self.calls
            .lock()
            .push((text.to_string(), src.map(str::to_string), dest.to_string()));

        if self.fail_on.iter().any(|t| t == text) {
            return Err(PipelineError::Translation(format!("service rejected '{}'", text)));
        }

        let translated = DICTIONARY
            .iter()
            .find(|(from, to, _)| *from == text && *to == dest)
            .map(|(_, _, out)| out.to_string())
            .unwrap_or_else(|| format!("{}-{}", text, dest));

        let resolved_dest = match &self.dest_override {
            Some((t, code)) if t == text => code.clone(),
            _ => dest.to_string(),
        };

        Ok(Translation {
            text: translated,
            src: src.unwrap_or("en").to_string(),
            dest: resolved_dest,
        })
    }
}
