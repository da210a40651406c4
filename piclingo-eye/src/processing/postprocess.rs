//! YOLOv8 output decoding

use crate::error::VisionError;
use piclingo_core::detection::{BoundingBox, Detection};

/// IoU above which a weaker box of the same class is dropped
pub const NMS_IOU_THRESHOLD: f32 = 0.45;
/// Upper bound on detections kept per frame
pub const MAX_DETECTIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeParams {
    pub threshold: f32,
    pub iou_threshold: f32,
    /// Network input `(width, height)`
    pub input_size: (u32, u32),
    /// Original frame `(width, height)`
    pub frame_size: (u32, u32),
    pub max_detections: usize,
}

impl DecodeParams {
    pub fn new(threshold: f32, input_size: (u32, u32), frame_size: (u32, u32)) -> Self {
        Self {
            threshold,
            iou_threshold: NMS_IOU_THRESHOLD,
            input_size,
            frame_size,
            max_detections: MAX_DETECTIONS,
        }
    }
}

/// Decode a YOLOv8 output laid out as `[4 + classes, anchors]`.
///
/// Rows 0..4 hold the box center and size in network input pixels, the rest
/// hold one score per class. Boxes come back in frame pixels, clamped to the
/// frame, after per-class NMS.
pub fn decode_yolov8(
    data: &[f32],
    num_attrs: usize,
    num_anchors: usize,
    params: &DecodeParams,
) -> Result<Vec<Detection>, VisionError> {
    if num_attrs <= 4 {
        return Err(VisionError::Processing(format!(
            "Output has {} attributes, expected box plus class scores",
            num_attrs
        )));
    }
    let expected = num_attrs
        .checked_mul(num_anchors)
        .ok_or_else(|| VisionError::Processing("Output shape overflows".to_string()))?;
    if data.len() != expected {
        return Err(VisionError::Processing(format!(
            "Output has {} values, expected {}x{}",
            data.len(),
            num_attrs,
            num_anchors
        )));
    }
    if params.input_size.0 == 0 || params.input_size.1 == 0 {
        return Err(VisionError::Processing("Input size cannot be zero".to_string()));
    }

    let (frame_w, frame_h) = (params.frame_size.0 as f32, params.frame_size.1 as f32);
    let scale_x = frame_w / params.input_size.0 as f32;
    let scale_y = frame_h / params.input_size.1 as f32;
    let at = |attr: usize, anchor: usize| data[attr * num_anchors + anchor];

    let mut detections = Vec::new();
    for anchor in 0..num_anchors {
        let (class, score) = (4..num_attrs)
            .map(|attr| (attr - 4, at(attr, anchor)))
            .filter(|(_, score)| score.is_finite())
            .fold((0, f32::NEG_INFINITY), |best, candidate| if candidate.1 > best.1 { candidate } else { best });

        if score < params.threshold {
            continue;
        }

        let bbox = BoundingBox::from_center(
            at(0, anchor) * scale_x,
            at(1, anchor) * scale_y,
            at(2, anchor) * scale_x,
            at(3, anchor) * scale_y,
        );
        if !bbox.is_finite() {
            continue;
        }
        let bbox = bbox.clamp_to(frame_w, frame_h);
        if bbox.area() <= 0.0 {
            continue;
        }

        detections.push(Detection {
            class_id: class as u32,
            confidence: score.min(1.0),
            bbox,
        });
    }

    let mut kept = non_max_suppression(detections, params.iou_threshold);
    kept.truncate(params.max_detections);
    Ok(kept)
}

/// Greedy NMS within each class; result is sorted by descending confidence.
pub fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.retain(|d| d.confidence.is_finite());
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<Detection> = Vec::with_capacity(detections.len());
    for candidate in detections {
        let suppressed = keep
            .iter()
            .any(|kept| kept.class_id == candidate.class_id && kept.bbox.iou(&candidate.bbox) > iou_threshold);
        if !suppressed {
            keep.push(candidate);
        }
    }
    keep
}

/// Transpose a row-major `rows x cols` buffer.
///
/// Some exports emit `[anchors, 4 + classes]`; this brings them to the
/// layout [`decode_yolov8`] reads.
pub fn transpose(data: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![0.0; data.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = data[r * cols + c];
        }
    }
    out
}
