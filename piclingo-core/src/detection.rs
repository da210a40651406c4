//! Detection results and the detector seam

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis-aligned box in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Build from a center point and size, as detection heads emit them.
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            left: cx - width / 2.0,
            top: cy - height / 2.0,
            right: cx + width / 2.0,
            bottom: cy + height / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.right.is_finite() && self.bottom.is_finite()
    }

    /// Clamp into a `width` x `height` frame.
    pub fn clamp_to(&self, width: f32, height: f32) -> Self {
        Self {
            left: self.left.clamp(0.0, width),
            top: self.top.clamp(0.0, height),
            right: self.right.clamp(0.0, width),
            bottom: self.bottom.clamp(0.0, height),
        }
    }

    /// Intersection over union; 0.0 for degenerate or non-finite boxes.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        if !self.is_finite() || !other.is_finite() {
            return 0.0;
        }

        let inter_left = self.left.max(other.left);
        let inter_top = self.top.max(other.top);
        let inter_right = self.right.min(other.right);
        let inter_bottom = self.bottom.min(other.bottom);

        if inter_right <= inter_left || inter_bottom <= inter_top {
            return 0.0;
        }

        let inter_area = (inter_right - inter_left) * (inter_bottom - inter_top);
        let union_area = self.area() + other.area() - inter_area;
        if union_area <= 0.0 || !union_area.is_finite() {
            return 0.0;
        }

        let iou = inter_area / union_area;
        if iou.is_finite() {
            iou.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// One object found in one frame. No identity across frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: u32,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Which annotations the detector draws onto the frame itself.
///
/// Parsed from a comma separated list of `box`, `labels`, `conf` or the
/// single word `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OverlayFlags {
    pub boxes: bool,
    pub labels: bool,
    pub confidence: bool,
}

impl OverlayFlags {
    pub const NONE: OverlayFlags = OverlayFlags { boxes: false, labels: false, confidence: false };
    pub const BOX: OverlayFlags = OverlayFlags { boxes: true, labels: false, confidence: false };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for OverlayFlags {
    fn default() -> Self {
        Self::BOX
    }
}

impl FromStr for OverlayFlags {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let mut flags = OverlayFlags::NONE;
        let mut saw_none = false;
        let mut count = 0;

        for part in s.split(',').map(str::trim) {
            count += 1;
            match part.to_lowercase().as_str() {
                "box" => flags.boxes = true,
                "labels" => flags.labels = true,
                "conf" => flags.confidence = true,
                "none" => saw_none = true,
                other => {
                    return Err(PipelineError::Config(format!(
                        "invalid overlay flag '{}' (valid: box, labels, conf, none)",
                        other
                    )))
                }
            }
        }

        if saw_none && count > 1 {
            return Err(PipelineError::Config("overlay flag 'none' cannot be combined".to_string()));
        }
        Ok(flags)
    }
}

impl fmt::Display for OverlayFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.boxes {
            parts.push("box");
        }
        if self.labels {
            parts.push("labels");
        }
        if self.confidence {
            parts.push("conf");
        }
        if parts.is_empty() {
            parts.push("none");
        }
        write!(f, "{}", parts.join(","))
    }
}

impl TryFrom<String> for OverlayFlags {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OverlayFlags> for String {
    fn from(flags: OverlayFlags) -> Self {
        flags.to_string()
    }
}

/// Object detection network bound to one frame type.
///
/// The confidence threshold is fixed when the detector is built.
pub trait Detector {
    type Frame;

    /// Detect objects and draw the requested overlay onto `frame`.
    fn detect(&mut self, frame: &mut Self::Frame, overlay: OverlayFlags) -> Result<Vec<Detection>>;

    /// Human readable label for a class id, if the network knows it.
    fn class_description(&self, class_id: u32) -> Option<&str>;

    /// Throughput of the network stage, in frames per second.
    fn network_fps(&self) -> f32;

    /// Emit per-stage timings of the last frame to the log.
    fn log_profiler_times(&self);
}
