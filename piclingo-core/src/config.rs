//! Run configuration

use crate::detection::OverlayFlags;
use crate::error::{PipelineError, Result};
use crate::languages;
use crate::overlay::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::stream::StreamUri;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_NETWORK: &str = "yolov8n";
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com";

/// Capture hints passed to the frame source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub rate: Option<f64>,
    /// Restart file sources when they reach the end
    pub looping: bool,
}

/// Everything the pipeline needs, fixed for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input_uri: String,
    pub output_uri: String,
    /// Registered network name or path to an ONNX file
    pub network: String,
    pub overlay: OverlayFlags,
    /// Minimum detection confidence
    pub threshold: f32,
    /// First hop target language
    pub intermediate_language: String,
    /// Second hop target language
    pub final_language: String,
    /// Class labels, one per line, for custom networks
    pub labels_path: Option<PathBuf>,
    /// Cache directory for downloaded networks
    pub model_dir: PathBuf,
    pub input: InputOptions,
    pub headless: bool,
    pub font_size: u32,
    pub translate_url: String,
    pub translate_timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        let model_dir = dirs::home_dir()
            .map(|mut p| {
                p.push(".piclingo");
                p.push("models");
                p
            })
            .unwrap_or_else(|| PathBuf::from("./models"));

        Self {
            input_uri: String::new(),
            output_uri: String::new(),
            network: DEFAULT_NETWORK.to_string(),
            overlay: OverlayFlags::default(),
            threshold: 0.8,
            intermediate_language: "en".to_string(),
            final_language: "es".to_string(),
            labels_path: None,
            model_dir,
            input: InputOptions::default(),
            headless: false,
            font_size: 26,
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            translate_timeout_secs: 10,
        }
    }
}

impl RunConfig {
    /// Load from a TOML file; missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(PipelineError::Config("threshold must be between 0.0 and 1.0".to_string()));
        }

        if self.network.trim().is_empty() {
            return Err(PipelineError::Config("network must not be empty".to_string()));
        }

        languages::language_name(&self.intermediate_language)?;
        languages::language_name(&self.final_language)?;

        StreamUri::parse_input(&self.input_uri)?;
        StreamUri::parse_output(&self.output_uri)?;

        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(PipelineError::Config(format!(
                "font size must be between {} and {}",
                MIN_FONT_SIZE, MAX_FONT_SIZE
            )));
        }

        if let (Some(w), Some(h)) = (self.input.width, self.input.height) {
            if w == 0 || h == 0 || w > 7680 || h > 4320 {
                return Err(PipelineError::Config("input resolution out of range (max 8K)".to_string()));
            }
        }

        if let Some(rate) = self.input.rate {
            if !rate.is_finite() || rate <= 0.0 || rate > 240.0 {
                return Err(PipelineError::Config("input rate must be between 0 and 240".to_string()));
            }
        }

        if !self.translate_url.starts_with("http://") && !self.translate_url.starts_with("https://") {
            return Err(PipelineError::Config("translate url must be http(s)".to_string()));
        }

        if self.translate_timeout_secs == 0 {
            return Err(PipelineError::Config("translate timeout must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Replace both language settings with their canonical table codes.
    pub fn resolve_languages(mut self) -> Result<Self> {
        self.intermediate_language = languages::resolve_code(&self.intermediate_language)?.to_string();
        self.final_language = languages::resolve_code(&self.final_language)?.to_string();
        Ok(self)
    }
}
