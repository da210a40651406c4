//! Error types for piclingo-eye

use piclingo_core::PipelineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("ONNX Runtime error: {0}")]
    Ort(String),

    #[error("OpenCV error: {0}")]
    OpenCv(String),
}

impl From<opencv::Error> for VisionError {
    fn from(err: opencv::Error) -> Self {
        VisionError::OpenCv(err.message)
    }
}

impl From<VisionError> for PipelineError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Camera(msg) => PipelineError::Capture(msg),
            VisionError::Output(msg) => PipelineError::Output(msg),
            VisionError::Config(msg) => PipelineError::Config(msg),
            VisionError::Io(e) => PipelineError::Io(e),
            other => PipelineError::Detection(other.to_string()),
        }
    }
}
