//! piclingo-eye: video I/O and object detection for PicLingo
//!
//! OpenCV backs the frame source, the display/file sink and text drawing;
//! ONNX Runtime runs the detection network. Each type implements one of the
//! piclingo-core seams over `opencv::core::Mat` frames.

pub mod camera;
pub mod error;
pub mod font;
pub mod models;
pub mod output;
pub mod processing;
mod utils;

pub use camera::VideoSource;
pub use error::VisionError;
pub use font::CvFont;
pub use models::{ModelManager, YoloDetector};
pub use output::VideoOutput;
