//! YOLOv8 object detection through ONNX Runtime

use crate::error::VisionError;
use crate::font::CvFont;
use crate::processing::annotate::draw_detections;
use crate::processing::postprocess::{decode_yolov8, transpose, DecodeParams};
use crate::processing::profiler::{Profiler, Stage};
use crate::utils::mat_to_chw_tensor;
use opencv::{
    core::{Mat, Size, CV_32F},
    imgproc,
    prelude::*,
};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use piclingo_core::detection::{Detection, Detector, OverlayFlags};
use std::path::Path;
use tracing::{debug, info};

/// Line height of the class captions drawn by the overlay
const CAPTION_FONT_SIZE: u32 = 18;

pub struct YoloDetector {
    session: Session,
    name: String,
    labels: Vec<String>,
    input_size: (u32, u32),
    threshold: f32,
    caption_font: CvFont,
    profiler: Profiler,
}

impl YoloDetector {
    /// Load the ONNX model at `model_path`.
    pub fn new(
        name: &str,
        model_path: &Path,
        input_size: (u32, u32),
        labels: Vec<String>,
        threshold: f32,
    ) -> Result<Self, VisionError> {
        if labels.is_empty() {
            return Err(VisionError::Config("Detector needs at least one class label".to_string()));
        }

        let session = Session::builder()
            .map_err(|e| VisionError::Ort(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| VisionError::Ort(format!("Failed to set optimization level: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| VisionError::Ort(format!("Failed to load model {:?}: {}", model_path, e)))?;

        info!("{} loaded from {:?} ({} classes)", name, model_path, labels.len());

        Ok(Self {
            session,
            name: name.to_string(),
            labels,
            input_size,
            threshold,
            caption_font: CvFont::new(CAPTION_FONT_SIZE)?,
            profiler: Profiler::new(),
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    /// Resize, BGR to RGB, scale to [0, 1], CHW
    fn preprocess(&self, frame: &Mat) -> Result<Vec<f32>, VisionError> {
        let (width, height) = self.input_size;

        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            Size::new(width as i32, height as i32),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;

        let mut rgb = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_mat = Mat::default();
        rgb.convert_to(&mut float_mat, CV_32F, 1.0 / 255.0, 0.0)?;

        mat_to_chw_tensor(&float_mat, width, height)
    }

    /// Run the network; returns the output shape and values.
    fn infer(&mut self, input: Vec<f32>) -> Result<(Vec<usize>, Vec<f32>), VisionError> {
        let (width, height) = self.input_size;
        let tensor = Tensor::from_array(([1usize, 3, height as usize, width as usize], input.into_boxed_slice()))
            .map_err(|e| VisionError::Ort(format!("Failed to create input tensor: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(|e| VisionError::Ort(format!("Inference failed: {}", e)))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| VisionError::Ort(format!("Failed to extract output tensor: {}", e)))?;

        let dims = shape.iter().map(|&d| d.max(0) as usize).collect();
        Ok((dims, data.to_vec()))
    }

    fn postprocess(&self, shape: &[usize], data: Vec<f32>, frame: &Mat) -> Result<Vec<Detection>, VisionError> {
        let [_, rows, cols] = shape else {
            return Err(VisionError::Processing(format!("Unexpected output shape {:?}", shape)));
        };
        let (rows, cols) = (*rows, *cols);

        // [1, anchors, attrs] exports are transposed to [attrs, anchors]
        let (num_attrs, num_anchors, data) = if rows > cols {
            (cols, rows, transpose(&data, rows, cols))
        } else {
            (rows, cols, data)
        };

        let expected_attrs = self.labels.len() + 4;
        if num_attrs != expected_attrs {
            debug!(
                "Output has {} classes, {} labels loaded",
                num_attrs.saturating_sub(4),
                self.labels.len()
            );
        }

        let params = DecodeParams::new(
            self.threshold,
            self.input_size,
            (frame.cols().max(0) as u32, frame.rows().max(0) as u32),
        );
        decode_yolov8(&data, num_attrs, num_anchors, &params)
    }

    fn run_frame(&mut self, frame: &mut Mat, overlay: OverlayFlags) -> Result<Vec<Detection>, VisionError> {
        if frame.empty() {
            return Err(VisionError::Processing("Empty frame".to_string()));
        }

        self.profiler.begin(Stage::Preprocess);
        let input = self.preprocess(frame)?;
        self.profiler.end(Stage::Preprocess);

        self.profiler.begin(Stage::Network);
        let (shape, output) = self.infer(input)?;
        self.profiler.end(Stage::Network);

        self.profiler.begin(Stage::Postprocess);
        let detections = self.postprocess(&shape, output, frame)?;
        self.profiler.end(Stage::Postprocess);

        self.profiler.begin(Stage::Visualize);
        let labels = &self.labels;
        draw_detections(frame, &detections, overlay, &self.caption_font, |id| {
            labels.get(id as usize).map(String::as_str)
        })?;
        self.profiler.end(Stage::Visualize);

        Ok(detections)
    }
}

impl Detector for YoloDetector {
    type Frame = Mat;

    fn detect(&mut self, frame: &mut Mat, overlay: OverlayFlags) -> piclingo_core::Result<Vec<Detection>> {
        Ok(self.run_frame(frame, overlay)?)
    }

    fn class_description(&self, class_id: u32) -> Option<&str> {
        self.labels.get(class_id as usize).map(String::as_str)
    }

    fn network_fps(&self) -> f32 {
        self.profiler.network_fps()
    }

    fn log_profiler_times(&self) {
        self.profiler.log(&self.name);
    }
}
