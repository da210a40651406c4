//! YOLOv8 decoding on hand-built output tensors

use piclingo_core::detection::BoundingBox;
use piclingo_eye::processing::postprocess::{decode_yolov8, DecodeParams, MAX_DETECTIONS};

/// Build a `[4 + classes, anchors]` buffer from per-anchor rows.
fn output(classes: usize, anchors: &[([f32; 4], Vec<f32>)]) -> Vec<f32> {
    let attrs = 4 + classes;
    let n = anchors.len();
    let mut data = vec![0.0; attrs * n];
    for (a, (bbox, scores)) in anchors.iter().enumerate() {
        for (i, v) in bbox.iter().enumerate() {
            data[i * n + a] = *v;
        }
        for (c, s) in scores.iter().enumerate() {
            data[(4 + c) * n + a] = *s;
        }
    }
    data
}

#[test]
fn test_threshold_filters_low_scores() {
    let data = output(
        3,
        &[
            ([100.0, 100.0, 40.0, 40.0], vec![0.9, 0.1, 0.0]),
            ([300.0, 300.0, 40.0, 40.0], vec![0.2, 0.79, 0.1]),
        ],
    );
    let params = DecodeParams::new(0.8, (640, 640), (640, 640));
    let detections = decode_yolov8(&data, 7, 2, &params).unwrap();

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].class_id, 0);
    assert!((detections[0].confidence - 0.9).abs() < 1e-6);
    assert_eq!(detections[0].bbox, BoundingBox::new(80.0, 80.0, 120.0, 120.0));
}

#[test]
fn test_best_class_wins() {
    let data = output(4, &[([320.0, 320.0, 64.0, 64.0], vec![0.3, 0.2, 0.95, 0.6])]);
    let params = DecodeParams::new(0.5, (640, 640), (640, 640));
    let detections = decode_yolov8(&data, 8, 1, &params).unwrap();

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].class_id, 2);
}

#[test]
fn test_boxes_scaled_to_frame() {
    let data = output(1, &[([320.0, 320.0, 64.0, 64.0], vec![0.9])]);
    let params = DecodeParams::new(0.5, (640, 640), (1280, 720));
    let detections = decode_yolov8(&data, 5, 1, &params).unwrap();

    let bbox = detections[0].bbox;
    assert!((bbox.left - 576.0).abs() < 1e-3);
    assert!((bbox.right - 704.0).abs() < 1e-3);
    assert!((bbox.top - 324.0).abs() < 1e-3);
    assert!((bbox.bottom - 396.0).abs() < 1e-3);
}

#[test]
fn test_boxes_clamped_to_frame() {
    let data = output(1, &[([10.0, 630.0, 60.0, 40.0], vec![0.9])]);
    let params = DecodeParams::new(0.5, (640, 640), (640, 640));
    let detections = decode_yolov8(&data, 5, 1, &params).unwrap();

    assert_eq!(detections[0].bbox, BoundingBox::new(0.0, 610.0, 40.0, 640.0));
}

#[test]
fn test_degenerate_and_non_finite_boxes_dropped() {
    let data = output(
        1,
        &[
            ([100.0, 100.0, 0.0, 30.0], vec![0.9]),
            ([f32::NAN, 100.0, 30.0, 30.0], vec![0.9]),
            ([100.0, 100.0, 30.0, 30.0], vec![f32::NAN]),
            ([-100.0, -100.0, 30.0, 30.0], vec![0.9]),
        ],
    );
    let params = DecodeParams::new(0.5, (640, 640), (640, 640));
    assert!(decode_yolov8(&data, 5, 4, &params).unwrap().is_empty());
}

#[test]
fn test_nms_is_per_class() {
    let data = output(
        2,
        &[
            ([100.0, 100.0, 50.0, 50.0], vec![0.90, 0.0]),
            ([102.0, 102.0, 50.0, 50.0], vec![0.85, 0.0]),
            ([101.0, 101.0, 50.0, 50.0], vec![0.0, 0.88]),
            ([400.0, 400.0, 50.0, 50.0], vec![0.86, 0.0]),
        ],
    );
    let params = DecodeParams::new(0.5, (640, 640), (640, 640));
    let detections = decode_yolov8(&data, 6, 4, &params).unwrap();

    let summary: Vec<_> = detections.iter().map(|d| (d.class_id, d.confidence)).collect();
    assert_eq!(summary, vec![(0, 0.90), (1, 0.88), (0, 0.86)]);
}

#[test]
fn test_detection_count_is_capped() {
    let anchors: Vec<_> = (0..150)
        .map(|i| ([(i % 15) as f32 * 40.0 + 20.0, (i / 15) as f32 * 40.0 + 20.0, 10.0, 10.0], vec![0.9]))
        .collect();
    let data = output(1, &anchors);
    let params = DecodeParams::new(0.5, (640, 640), (640, 640));

    let detections = decode_yolov8(&data, 5, anchors.len(), &params).unwrap();
    assert_eq!(detections.len(), MAX_DETECTIONS);
}
