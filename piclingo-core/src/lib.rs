//! piclingo-core: the frame pipeline behind PicLingo
//!
//! Captures a frame, runs object detection on it, sends every detected class
//! label through two translation hops and draws both results onto the frame
//! before handing it to the output sink.
//!
//! The external collaborators (video I/O, the detection network, the font
//! renderer and the translation service) are reached through the traits in
//! [`stream`], [`detection`], [`overlay`] and [`translation`]. Concrete
//! implementations live in `piclingo-eye` and `piclingo-lingo`.

pub mod config;
pub mod detection;
pub mod error;
pub mod languages;
pub mod overlay;
pub mod pipeline;
pub mod stream;
pub mod translation;

pub use config::RunConfig;
pub use detection::{BoundingBox, Detection, Detector, OverlayFlags};
pub use error::{PipelineError, Result};
pub use overlay::{Color, Position, TextRenderer, TextStyle};
pub use pipeline::{FramePipeline, PipelineStats};
pub use stream::{FrameSink, FrameSource, StreamUri};
pub use translation::{Translation, Translator};
