//! Frame source and sink seams, plus stream URI parsing

use crate::error::{PipelineError, Result};
use std::fmt;
use std::path::PathBuf;

/// Produces frames on demand.
pub trait FrameSource {
    type Frame;

    /// Next frame, or `None` when no frame arrived in time.
    ///
    /// `None` is transient; [`FrameSource::is_streaming`] tells whether more
    /// frames can follow.
    fn capture(&mut self) -> Result<Option<Self::Frame>>;

    fn is_streaming(&self) -> bool;
}

/// Accepts rendered frames.
pub trait FrameSink {
    type Frame;

    fn render(&mut self, frame: &Self::Frame) -> Result<()>;

    /// Replace the status text (window title or equivalent).
    fn set_status(&mut self, status: &str);

    fn is_streaming(&self) -> bool;
}

/// Where frames come from or go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUri {
    /// Local capture device by index
    Camera(u32),
    /// Video file on disk
    File(PathBuf),
    /// Network stream handed to the backend as-is
    Network(String),
    /// On-screen window
    Display(u32),
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "webm"];

impl StreamUri {
    /// Parse an input URI. Empty means the first camera.
    pub fn parse_input(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Ok(StreamUri::Camera(0));
        }
        if let Some(rest) = uri.strip_prefix("v4l2://") {
            return parse_device(rest);
        }
        if uri.starts_with("/dev/video") {
            return parse_device(uri);
        }
        if let Ok(index) = uri.parse::<u32>() {
            return Ok(StreamUri::Camera(index));
        }
        if let Some(path) = uri.strip_prefix("file://") {
            return Ok(StreamUri::File(PathBuf::from(path)));
        }
        if is_network(uri) {
            return Ok(StreamUri::Network(uri.to_string()));
        }
        if uri.starts_with("display://") {
            return Err(PipelineError::Config(format!("'{}' is not a valid input", uri)));
        }
        Ok(StreamUri::File(PathBuf::from(uri)))
    }

    /// Parse an output URI. Empty means the first display.
    pub fn parse_output(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Ok(StreamUri::Display(0));
        }
        if let Some(rest) = uri.strip_prefix("display://") {
            let index = rest
                .parse::<u32>()
                .map_err(|_| PipelineError::Config(format!("invalid display index in '{}'", uri)))?;
            return Ok(StreamUri::Display(index));
        }
        if is_network(uri) {
            return Err(PipelineError::Config(format!("network output '{}' is not supported", uri)));
        }

        let path = PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri));
        let has_video_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if !has_video_ext {
            return Err(PipelineError::Config(format!(
                "output '{}' needs one of the extensions {:?}",
                uri, VIDEO_EXTENSIONS
            )));
        }
        Ok(StreamUri::File(path))
    }
}

impl fmt::Display for StreamUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamUri::Camera(index) => write!(f, "v4l2:///dev/video{}", index),
            StreamUri::File(path) => write!(f, "file://{}", path.display()),
            StreamUri::Network(url) => write!(f, "{}", url),
            StreamUri::Display(index) => write!(f, "display://{}", index),
        }
    }
}

fn is_network(uri: &str) -> bool {
    ["rtsp://", "rtp://", "http://", "https://"]
        .iter()
        .any(|scheme| uri.starts_with(scheme))
}

fn parse_device(path: &str) -> Result<StreamUri> {
    path.strip_prefix("/dev/video")
        .and_then(|n| n.parse::<u32>().ok())
        .map(StreamUri::Camera)
        .ok_or_else(|| PipelineError::Config(format!("invalid camera device '{}'", path)))
}
