//! Detector overlay: boxes, class names and confidences

use crate::error::VisionError;
use crate::font::{to_scalar, CvFont};
use opencv::{
    core::{Mat, Rect},
    imgproc,
};
use piclingo_core::detection::{Detection, OverlayFlags};
use piclingo_core::overlay::{Color, Position, TextStyle};

const BOX_THICKNESS: i32 = 2;

const PALETTE: [Color; 8] = [
    Color::rgba(0, 255, 0, 255),
    Color::rgba(255, 56, 56, 255),
    Color::rgba(255, 157, 151, 255),
    Color::rgba(255, 178, 29, 255),
    Color::rgba(72, 249, 10, 255),
    Color::rgba(0, 194, 255, 255),
    Color::rgba(132, 56, 255, 255),
    Color::rgba(255, 55, 199, 255),
];

pub fn class_color(class_id: u32) -> Color {
    PALETTE[class_id as usize % PALETTE.len()]
}

/// Caption for one detection, `None` when the flags draw no text.
pub fn caption(detection: &Detection, label: Option<&str>, flags: OverlayFlags) -> Option<String> {
    let confidence = format!("{:.0}%", detection.confidence * 100.0);
    match (flags.labels, flags.confidence) {
        (true, true) => Some(format!("{} {}", label.unwrap_or("?"), confidence)),
        (true, false) => Some(label.unwrap_or("?").to_string()),
        (false, true) => Some(confidence),
        (false, false) => None,
    }
}

/// Draw `detections` onto `frame` as selected by `flags`.
pub fn draw_detections<'a>(
    frame: &mut Mat,
    detections: &[Detection],
    flags: OverlayFlags,
    font: &CvFont,
    label_of: impl Fn(u32) -> Option<&'a str>,
) -> Result<(), VisionError> {
    if flags.is_none() {
        return Ok(());
    }

    for detection in detections {
        let color = class_color(detection.class_id);
        let bbox = &detection.bbox;

        if flags.boxes {
            let rect = Rect::new(
                bbox.left as i32,
                bbox.top as i32,
                bbox.width().round() as i32,
                bbox.height().round() as i32,
            );
            imgproc::rectangle(frame, rect, to_scalar(color), BOX_THICKNESS, imgproc::LINE_8, 0)?;
        }

        if let Some(text) = caption(detection, label_of(detection.class_id), flags) {
            // Bottom edge; the top edge carries the translated labels
            let at = Position::new(bbox.left as i32, bbox.bottom as i32 - font.line_height());
            let style = TextStyle { color: Color::BLACK, background: color };
            font.draw(frame, &text, at, style)?;
        }
    }

    Ok(())
}
