//! Text rendering onto OpenCV frames

use crate::error::VisionError;
use opencv::{
    core::{self, Mat, Point, Rect, Scalar},
    imgproc,
    prelude::*,
};
use piclingo_core::error::PipelineError;
use piclingo_core::overlay::{Color, Position, TextRenderer, TextStyle, MAX_FONT_SIZE, MIN_FONT_SIZE};

const FONT_FACE: i32 = imgproc::FONT_HERSHEY_SIMPLEX;
/// Space between the text and the edge of its background
const PADDING: i32 = 3;

/// Hershey font scaled to a fixed pixel line height
pub struct CvFont {
    scale: f64,
    thickness: i32,
    line_height: i32,
}

impl CvFont {
    pub fn new(line_height: u32) -> Result<Self, VisionError> {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&line_height) {
            return Err(VisionError::Config(format!(
                "Font size {} outside {}..={}",
                line_height, MIN_FONT_SIZE, MAX_FONT_SIZE
            )));
        }
        let line_height = line_height as i32;
        let thickness = (line_height / 13).max(1);
        let scale = imgproc::get_font_scale_from_height(FONT_FACE, line_height - 2 * PADDING, thickness)?;

        Ok(Self { scale, thickness, line_height })
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    /// Draw `text` with its top-left corner at `at`.
    pub fn draw(&self, frame: &mut Mat, text: &str, at: Position, style: TextStyle) -> Result<(), VisionError> {
        if text.is_empty() {
            return Ok(());
        }

        let mut baseline = 0;
        let size = imgproc::get_text_size(text, FONT_FACE, self.scale, self.thickness, &mut baseline)?;
        let (x, y, width, height) = place_box(
            at,
            size.width + 2 * PADDING,
            size.height + baseline + 2 * PADDING,
            frame.cols(),
            frame.rows(),
        );
        if width <= 0 || height <= 0 {
            return Ok(());
        }

        fill_rect(frame, Rect::new(x, y, width, height), style.background)?;

        imgproc::put_text(
            frame,
            text,
            Point::new(x + PADDING, y + PADDING + size.height),
            FONT_FACE,
            self.scale,
            to_scalar(style.color),
            self.thickness,
            imgproc::LINE_AA,
            false,
        )?;

        Ok(())
    }
}

impl TextRenderer for CvFont {
    type Frame = Mat;

    fn overlay_text(&mut self, frame: &mut Mat, text: &str, at: Position, style: TextStyle) -> piclingo_core::Result<()> {
        self.draw(frame, text, at, style)
            .map_err(|e| PipelineError::Overlay(e.to_string()))
    }
}

/// Filled rectangle, alpha blended unless the color is opaque
pub(crate) fn fill_rect(frame: &mut Mat, rect: Rect, color: Color) -> Result<(), VisionError> {
    if color.a == 0 {
        return Ok(());
    }
    if color.is_opaque() {
        imgproc::rectangle(frame, rect, to_scalar(color), imgproc::FILLED, imgproc::LINE_8, 0)?;
        return Ok(());
    }

    let mut overlay = frame.try_clone()?;
    imgproc::rectangle(&mut overlay, rect, to_scalar(color), imgproc::FILLED, imgproc::LINE_8, 0)?;

    let alpha = color.a as f64 / 255.0;
    let mut blended = Mat::default();
    core::add_weighted(&overlay, alpha, &*frame, 1.0 - alpha, 0.0, &mut blended, -1)?;
    *frame = blended;
    Ok(())
}

pub(crate) fn to_scalar(color: Color) -> Scalar {
    Scalar::new(color.b as f64, color.g as f64, color.r as f64, 0.0)
}

/// Clamp a `width` x `height` box anchored at `at` into the frame.
///
/// The box is shifted rather than cropped while it fits; an oversized box is
/// pinned to the top-left corner and cropped to the frame.
fn place_box(at: Position, width: i32, height: i32, frame_width: i32, frame_height: i32) -> (i32, i32, i32, i32) {
    let x = at.x.min(frame_width - width).max(0);
    let y = at.y.min(frame_height - height).max(0);
    (x, y, width.min(frame_width - x), height.min(frame_height - y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_box_inside_frame_is_unchanged() {
        assert_eq!(place_box(Position::new(105, 40), 80, 26, 640, 480), (105, 40, 80, 26));
    }

    #[test]
    fn test_place_box_shifts_back_into_frame() {
        assert_eq!(place_box(Position::new(600, 470), 80, 26, 640, 480), (560, 454, 80, 26));
        assert_eq!(place_box(Position::new(-20, -5), 80, 26, 640, 480), (0, 0, 80, 26));
    }

    #[test]
    fn test_place_box_oversized_is_cropped() {
        assert_eq!(place_box(Position::new(30, 30), 900, 26, 640, 480), (0, 30, 640, 26));
    }

    #[test]
    fn test_to_scalar_is_bgr() {
        let scalar = to_scalar(Color::rgba(10, 20, 30, 255));
        assert_eq!(scalar[0], 30.0);
        assert_eq!(scalar[1], 20.0);
        assert_eq!(scalar[2], 10.0);
    }

    #[test]
    fn test_font_rejects_tiny_sizes() {
        for size in [0, 1, 6, MIN_FONT_SIZE - 1] {
            assert!(matches!(CvFont::new(size), Err(VisionError::Config(_))));
        }
        assert!(CvFont::new(MIN_FONT_SIZE).is_ok());
    }

    #[test]
    fn test_draw_failure_is_overlay_error() {
        // Drawing takes at most four channels
        let five_channels = core::CV_8U + ((5 - 1) << 3);
        let mut frame = Mat::zeros(40, 40, five_channels).unwrap().to_mat().unwrap();
        let mut font = CvFont::new(26).unwrap();

        let err = font
            .overlay_text(&mut frame, "persona", Position::new(5, 5), TextStyle::BANNER)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Overlay(_)));
    }

    #[test]
    fn test_draw_text_on_frame() {
        let mut frame =
            Mat::new_rows_cols_with_default(120, 320, core::CV_8UC3, Scalar::all(0.0)).unwrap();
        let mut font = CvFont::new(26).unwrap();

        font.overlay_text(&mut frame, "persona", Position::new(5, 5), TextStyle::LABEL)
            .unwrap();
        font.overlay_text(&mut frame, "english ---> spanish", Position::new(300, 110), TextStyle::BANNER)
            .unwrap();

        assert!(core::sum_elems(&frame).unwrap()[0] > 0.0);
    }
}
