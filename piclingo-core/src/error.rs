//! Error types for piclingo-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Detection error: {0}")]
    Detection(String),

    #[error("Overlay error: {0}")]
    Overlay(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("No class description for class id {0}")]
    UnknownClass(u32),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
