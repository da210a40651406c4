//! Frame capture from cameras, video files and network streams

use crate::error::VisionError;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{VideoCapture, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH, CAP_PROP_POS_FRAMES},
};
use piclingo_core::config::InputOptions;
use piclingo_core::stream::{FrameSource, StreamUri};
use tracing::{debug, info, warn};

/// Consecutive empty camera reads between two debug reports
const MISS_REPORT_INTERVAL: u32 = 100;

/// OpenCV-backed frame source
pub struct VideoSource {
    uri: StreamUri,
    capture: VideoCapture,
    looping: bool,
    streaming: bool,
    frames_read: u64,
    misses: u32,
    /// Set by a rewind, cleared by the next good frame
    rewound: bool,
}

/// What an empty read means for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmptyRead {
    Rewind,
    EndOfStream,
    Miss,
}

fn classify_empty_read(uri: &StreamUri, looping: bool, frames_read: u64, rewound: bool) -> EmptyRead {
    match uri {
        // A rewind that yields nothing means the backend cannot seek
        StreamUri::File(_) if looping && frames_read > 0 && !rewound => EmptyRead::Rewind,
        StreamUri::File(_) | StreamUri::Network(_) => EmptyRead::EndOfStream,
        _ => EmptyRead::Miss,
    }
}

impl VideoSource {
    /// Open the device, file or stream named by `uri`
    pub fn open(uri: &StreamUri, options: &InputOptions) -> Result<Self, VisionError> {
        let capture = match uri {
            StreamUri::Camera(index) => VideoCapture::new(*index as i32, CAP_ANY)
                .map_err(|e| VisionError::Camera(format!("Failed to open camera {}: {}", index, e)))?,
            StreamUri::File(path) => {
                let name = path
                    .to_str()
                    .ok_or_else(|| VisionError::Camera(format!("Invalid file path: {:?}", path)))?;
                VideoCapture::from_file(name, CAP_ANY)
                    .map_err(|e| VisionError::Camera(format!("Failed to open {}: {}", name, e)))?
            }
            StreamUri::Network(url) => VideoCapture::from_file(url, CAP_ANY)
                .map_err(|e| VisionError::Camera(format!("Failed to open {}: {}", url, e)))?,
            StreamUri::Display(_) => {
                return Err(VisionError::Config(format!("{} is not an input stream", uri)));
            }
        };

        if !capture.is_opened()? {
            return Err(VisionError::Camera(format!("{} failed to open", uri)));
        }

        let mut source = Self {
            uri: uri.clone(),
            capture,
            looping: options.looping,
            streaming: true,
            frames_read: 0,
            misses: 0,
            rewound: false,
        };

        if matches!(uri, StreamUri::Camera(_)) {
            source.apply_options(options)?;
        }

        info!(
            "Opened {} at {}x{} @ {:.1}fps",
            source.uri,
            source.capture.get(CAP_PROP_FRAME_WIDTH)?,
            source.capture.get(CAP_PROP_FRAME_HEIGHT)?,
            source.capture.get(CAP_PROP_FPS)?
        );

        Ok(source)
    }

    fn apply_options(&mut self, options: &InputOptions) -> Result<(), VisionError> {
        if let Some(width) = options.width {
            self.capture
                .set(CAP_PROP_FRAME_WIDTH, width as f64)
                .map_err(|e| VisionError::Camera(format!("Failed to set width: {}", e)))?;
        }
        if let Some(height) = options.height {
            self.capture
                .set(CAP_PROP_FRAME_HEIGHT, height as f64)
                .map_err(|e| VisionError::Camera(format!("Failed to set height: {}", e)))?;
        }
        if let Some(rate) = options.rate {
            self.capture
                .set(CAP_PROP_FPS, rate)
                .map_err(|e| VisionError::Camera(format!("Failed to set FPS: {}", e)))?;
        }
        Ok(())
    }

    pub fn uri(&self) -> &StreamUri {
        &self.uri
    }

    /// Rate reported by the backend, 0.0 when unknown
    pub fn frame_rate(&self) -> f64 {
        self.capture.get(CAP_PROP_FPS).unwrap_or(0.0)
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn read_frame(&mut self) -> Result<Option<Mat>, VisionError> {
        if !self.streaming {
            return Ok(None);
        }

        let mut frame = Mat::default();
        // A failed grab is treated like an empty frame
        let grabbed = match self.capture.read(&mut frame) {
            Ok(grabbed) => grabbed,
            Err(e) => {
                debug!("Read from {} failed: {}", self.uri, e);
                false
            }
        };

        if grabbed && !frame.empty() {
            self.frames_read += 1;
            self.misses = 0;
            self.rewound = false;
            return Ok(Some(frame));
        }

        match classify_empty_read(&self.uri, self.looping, self.frames_read, self.rewound) {
            EmptyRead::Rewind => {
                info!("Restarting {} after {} frames", self.uri, self.frames_read);
                self.capture.set(CAP_PROP_POS_FRAMES, 0.0)?;
                self.rewound = true;
            }
            EmptyRead::EndOfStream => {
                if self.rewound {
                    warn!("{} returned no frames after a rewind", self.uri);
                }
                info!("End of stream {}", self.uri);
                self.streaming = false;
            }
            EmptyRead::Miss => {
                self.misses += 1;
                if self.misses % MISS_REPORT_INTERVAL == 0 {
                    debug!("No frame from {} for {} reads", self.uri, self.misses);
                }
                if !self.capture.is_opened()? {
                    warn!("{} is no longer open", self.uri);
                    self.streaming = false;
                }
            }
        }

        Ok(None)
    }
}

impl FrameSource for VideoSource {
    type Frame = Mat;

    fn capture(&mut self) -> piclingo_core::Result<Option<Mat>> {
        Ok(self.read_frame()?)
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!("Failed to release {}: {}", self.uri, e);
        }
    }
}
