//! Model cache with auto-download

use crate::error::VisionError;
use crate::models::networks::{ModelSource, NetworkSpec};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const MAX_MODEL_SIZE: u64 = 2_000_000_000;
const MIN_MODEL_SIZE: usize = 1024;
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(3600);

/// Resolves networks to ONNX files on disk, downloading registered ones
pub struct ModelManager {
    model_dir: PathBuf,
}

impl ModelManager {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self { model_dir: model_dir.into() }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Ensure model directory exists
    pub fn ensure_model_dir(&self) -> Result<PathBuf, VisionError> {
        if !self.model_dir.exists() {
            fs::create_dir_all(&self.model_dir)?;
            info!("Created model directory: {:?}", self.model_dir);
        }
        Ok(self.model_dir.clone())
    }

    /// Path to the ONNX file for `network`, fetching it first if needed
    pub async fn model_path(&self, network: &NetworkSpec) -> Result<PathBuf, VisionError> {
        match &network.source {
            ModelSource::Download { file_name, url, checksum } => {
                self.ensure_model(file_name, url, checksum).await
            }
            ModelSource::File(path) => {
                if !path.is_file() {
                    return Err(VisionError::Model(format!("Model file not found: {:?}", path)));
                }
                Ok(path.clone())
            }
        }
    }

    /// Download `model_name` from `url` unless it is already cached
    pub async fn ensure_model(&self, model_name: &str, url: &str, checksum: &str) -> Result<PathBuf, VisionError> {
        validate_model_name(model_name)?;
        validate_url(url)?;

        self.ensure_model_dir()?;
        let model_path = self.model_dir.join(model_name);
        if !model_path.starts_with(&self.model_dir) {
            return Err(VisionError::Model("Path traversal detected".to_string()));
        }

        if model_path.exists() {
            info!("Model {} already exists at {:?}", model_name, model_path);
            return Ok(model_path);
        }

        info!("Downloading model {} from {}", model_name, url);
        let bytes = download(url).await?;
        verify_checksum(model_name, &bytes, checksum)?;

        // A partial download never lands at the final path
        let temp_path = model_path.with_extension("tmp");
        fs::write(&temp_path, &bytes)?;
        if let Err(e) = fs::rename(&temp_path, &model_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        info!("Model {} saved to {:?}", model_name, model_path);
        Ok(model_path)
    }
}

async fn download(url: &str) -> Result<Vec<u8>, VisionError> {
    let client = reqwest::Client::builder().timeout(DOWNLOAD_TIMEOUT).build()?;
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(VisionError::Model(format!("Failed to download model: HTTP {}", response.status())));
    }
    if let Some(length) = response.content_length() {
        if length > MAX_MODEL_SIZE {
            return Err(VisionError::Model(format!(
                "Model too large: {} bytes (max {} bytes)",
                length, MAX_MODEL_SIZE
            )));
        }
    }

    let bytes = response.bytes().await?;
    if bytes.len() as u64 > MAX_MODEL_SIZE {
        return Err(VisionError::Model(format!("Downloaded model too large: {} bytes", bytes.len())));
    }
    if bytes.len() < MIN_MODEL_SIZE {
        return Err(VisionError::Model("Downloaded file too small, likely corrupted".to_string()));
    }
    Ok(bytes.to_vec())
}

fn validate_model_name(model_name: &str) -> Result<(), VisionError> {
    if model_name.is_empty() || model_name.len() > 255 {
        return Err(VisionError::Model("Invalid model name".to_string()));
    }
    if model_name.contains("..") || model_name.contains('/') || model_name.contains('\\') {
        return Err(VisionError::Model("Model name contains invalid characters".to_string()));
    }
    Ok(())
}

fn validate_url(url: &str) -> Result<(), VisionError> {
    if url.is_empty() || url.len() > 2048 {
        return Err(VisionError::Model("Invalid URL".to_string()));
    }
    if !url.starts_with("https://") {
        return Err(VisionError::Model("Only HTTPS URLs are allowed for model downloads".to_string()));
    }
    Ok(())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// An empty `expected` skips verification.
pub fn verify_checksum(model_name: &str, bytes: &[u8], expected: &str) -> Result<(), VisionError> {
    if expected.is_empty() {
        info!("Downloaded {} bytes for model {} (checksum verification skipped)", bytes.len(), model_name);
        return Ok(());
    }

    let computed = sha256_hex(bytes);
    if !computed.eq_ignore_ascii_case(expected) {
        return Err(VisionError::Model(format!(
            "Checksum mismatch for model {}: expected {}, got {}",
            model_name, expected, computed
        )));
    }
    info!("Verified checksum for model {}", model_name);
    Ok(())
}
