//! Frame output: an on-screen window, an encoded video file, or nothing

use crate::error::VisionError;
use opencv::{
    core::Mat,
    highgui,
    prelude::*,
    videoio::VideoWriter,
};
use piclingo_core::stream::{FrameSink, StreamUri};
use std::path::PathBuf;
use tracing::{debug, info, warn};

const WINDOW_NAME: &str = "piclingo";
const KEY_ESC: i32 = 27;
/// Used when the source does not report a frame rate
pub const DEFAULT_OUTPUT_FPS: f64 = 30.0;

enum Target {
    Window { name: String },
    File { path: PathBuf, writer: Option<VideoWriter> },
    Headless,
}

/// OpenCV-backed frame sink
pub struct VideoOutput {
    target: Target,
    fps: f64,
    streaming: bool,
    frames_written: u64,
    status: String,
}

impl VideoOutput {
    /// Open the sink named by `uri`. With `headless` a display target renders nowhere.
    pub fn open(uri: &StreamUri, headless: bool, fps: f64) -> Result<Self, VisionError> {
        let target = match uri {
            StreamUri::Display(_) if headless => {
                info!("Headless mode, frames are not displayed");
                Target::Headless
            }
            StreamUri::Display(index) => {
                let name = if *index == 0 {
                    WINDOW_NAME.to_string()
                } else {
                    format!("{} ({})", WINDOW_NAME, index)
                };
                highgui::named_window(&name, highgui::WINDOW_AUTOSIZE)
                    .map_err(|e| VisionError::Output(format!("Failed to open window: {}", e)))?;
                Target::Window { name }
            }
            StreamUri::File(path) => Target::File { path: path.clone(), writer: None },
            StreamUri::Network(_) | StreamUri::Camera(_) => {
                return Err(VisionError::Config(format!("{} is not an output stream", uri)));
            }
        };

        let fps = if fps.is_finite() && fps > 0.0 { fps } else { DEFAULT_OUTPUT_FPS };

        Ok(Self {
            target,
            fps,
            streaming: true,
            frames_written: 0,
            status: String::new(),
        })
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn write_frame(&mut self, frame: &Mat) -> Result<(), VisionError> {
        match &mut self.target {
            Target::Window { name } => {
                highgui::imshow(name, frame)?;
                let key = highgui::wait_key(1)?;
                if key == 'q' as i32 || key == KEY_ESC {
                    info!("Quit requested from window");
                    self.streaming = false;
                } else if highgui::get_window_property(name, highgui::WND_PROP_VISIBLE)? < 1.0 {
                    info!("Window closed");
                    self.streaming = false;
                }
            }
            Target::File { path, writer } => {
                if writer.is_none() {
                    *writer = Some(open_writer(path, frame, self.fps)?);
                }
                if let Some(writer) = writer {
                    writer.write(frame)?;
                }
            }
            Target::Headless => {}
        }

        self.frames_written += 1;
        Ok(())
    }
}

/// Writer sized after the first frame
fn open_writer(path: &PathBuf, frame: &Mat, fps: f64) -> Result<VideoWriter, VisionError> {
    let name = path
        .to_str()
        .ok_or_else(|| VisionError::Output(format!("Invalid output path: {:?}", path)))?;
    let fourcc = match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("avi") => VideoWriter::fourcc('M', 'J', 'P', 'G')?,
        Some("webm") => VideoWriter::fourcc('V', 'P', '8', '0')?,
        _ => VideoWriter::fourcc('m', 'p', '4', 'v')?,
    };

    let size = frame.size()?;
    let writer = VideoWriter::new(name, fourcc, fps, size, true)
        .map_err(|e| VisionError::Output(format!("Failed to create {}: {}", name, e)))?;
    if !writer.is_opened()? {
        return Err(VisionError::Output(format!("Could not open {} for writing", name)));
    }

    info!("Writing {}x{} @ {:.1}fps to {}", size.width, size.height, fps, name);
    Ok(writer)
}

impl FrameSink for VideoOutput {
    type Frame = Mat;

    fn render(&mut self, frame: &Mat) -> piclingo_core::Result<()> {
        Ok(self.write_frame(frame)?)
    }

    fn set_status(&mut self, status: &str) {
        if status == self.status {
            return;
        }
        self.status = status.to_string();

        match &self.target {
            Target::Window { name } => {
                if let Err(e) = highgui::set_window_title(name, status) {
                    warn!("Failed to set window title: {}", e);
                }
            }
            _ => debug!("status: {}", status),
        }
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }
}

impl Drop for VideoOutput {
    fn drop(&mut self) {
        match &mut self.target {
            Target::Window { name } => {
                let _ = highgui::destroy_window(name);
            }
            Target::File { path, writer: Some(writer) } => {
                if let Err(e) = writer.release() {
                    warn!("Failed to finalize {:?}: {}", path, e);
                }
            }
            _ => {}
        }
        debug!("Output closed after {} frames", self.frames_written);
    }
}
