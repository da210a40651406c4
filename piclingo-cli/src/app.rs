//! Wires the OpenCV, ONNX Runtime and translation collaborators into a pipeline

use anyhow::{Context, Result};
use piclingo_core::config::RunConfig;
use piclingo_core::pipeline::{FramePipeline, PipelineStats};
use piclingo_core::stream::StreamUri;
use piclingo_eye::models::networks::coco_labels;
use piclingo_eye::models::{load_labels, resolve_network};
use piclingo_eye::{CvFont, ModelManager, VideoOutput, VideoSource, YoloDetector};
use piclingo_lingo::GoogleTranslator;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn run(config: RunConfig) -> Result<PipelineStats> {
    let config = Arc::new(config);

    let input = StreamUri::parse_input(&config.input_uri)?;
    let output = StreamUri::parse_output(&config.output_uri)?;

    let network = resolve_network(&config.network)?;
    let labels = match &config.labels_path {
        Some(path) => load_labels(path).with_context(|| format!("failed to load labels from {:?}", path))?,
        None => coco_labels(),
    };
    let model_path = ModelManager::new(&config.model_dir)
        .model_path(&network)
        .await
        .with_context(|| format!("failed to fetch network {}", network.name))?;
    let detector = YoloDetector::new(&network.name, &model_path, network.input_size, labels, config.threshold)
        .context("failed to load detection network")?;

    let source = VideoSource::open(&input, &config.input).with_context(|| format!("failed to open {}", input))?;
    let sink = VideoOutput::open(&output, config.headless, source.frame_rate())
        .with_context(|| format!("failed to open {}", output))?;
    let font = CvFont::new(config.font_size)?;
    let translator =
        GoogleTranslator::new(&config.translate_url, Duration::from_secs(config.translate_timeout_secs))?;

    info!("{} -> {} with {}", input, output, network.name);

    let mut pipeline = FramePipeline::new(config, source, detector, font, sink, translator);
    Ok(pipeline.run().await?)
}
