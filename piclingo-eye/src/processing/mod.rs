//! Frame processing around the detection network

pub mod annotate;
pub mod postprocess;
pub mod profiler;

pub use postprocess::{decode_yolov8, non_max_suppression, DecodeParams};
pub use profiler::{Profiler, Stage};
