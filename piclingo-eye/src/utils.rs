//! Tensor layout helpers

use crate::error::VisionError;
use opencv::{
    core::{Mat, Vec3f, CV_32FC3},
    prelude::*,
};

/// Copy a `CV_32FC3` Mat of exactly `width` x `height` into a `[3, H, W]` buffer.
pub fn mat_to_chw_tensor(mat: &Mat, width: u32, height: u32) -> Result<Vec<f32>, VisionError> {
    if mat.cols() != width as i32 || mat.rows() != height as i32 {
        return Err(VisionError::Processing(format!(
            "Expected {}x{} input, got {}x{}",
            width,
            height,
            mat.cols(),
            mat.rows()
        )));
    }
    if mat.typ() != CV_32FC3 {
        return Err(VisionError::Processing(format!("Expected CV_32FC3 input, got type {}", mat.typ())));
    }

    let pixels = mat.data_typed::<Vec3f>()?;
    Ok(hwc_to_chw(pixels.iter().map(|p| [p[0], p[1], p[2]]), width as usize, height as usize))
}

/// Interleaved pixels in row order to planar channels.
pub fn hwc_to_chw(pixels: impl IntoIterator<Item = [f32; 3]>, width: usize, height: usize) -> Vec<f32> {
    let plane = width * height;
    let mut chw = vec![0.0f32; plane * 3];
    for (i, pixel) in pixels.into_iter().take(plane).enumerate() {
        chw[i] = pixel[0];
        chw[plane + i] = pixel[1];
        chw[2 * plane + i] = pixel[2];
    }
    chw
}
