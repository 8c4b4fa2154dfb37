//! Conversions between OpenCV `Mat` (BGR) and the pipeline's RGB frames.

use super::safe_cast::u32_to_i32;
use crate::{Error, Frame, Result};
use opencv::{
    core::{Mat, Scalar, CV_8UC3},
    imgproc,
    prelude::*,
};

/// Convert an RGB frame to a BGR `Mat`
///
/// # Errors
///
/// Returns an error if the frame is too large or OpenCV fails
pub fn frame_to_mat(frame: &Frame) -> Result<Mat> {
    let rows = u32_to_i32(frame.height())?;
    let cols = u32_to_i32(frame.width())?;

    let mut rgb = Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0))?;
    rgb.data_bytes_mut()?.copy_from_slice(frame.as_raw());

    let mut bgr = Mat::default();
    imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
    Ok(bgr)
}

/// Convert a BGR `Mat` from the capture device into an RGB frame
///
/// # Errors
///
/// Returns an error if the Mat is empty, not 8-bit 3-channel, or OpenCV fails
pub fn mat_to_frame(mat: &Mat) -> Result<Frame> {
    if mat.empty() {
        return Err(Error::InvalidInput("Empty Mat".to_string()));
    }
    if mat.typ() != CV_8UC3 {
        return Err(Error::InvalidInput(format!(
            "Expected 8-bit 3-channel Mat, got type {}",
            mat.typ()
        )));
    }

    let mut rgb = Mat::default();
    imgproc::cvt_color(mat, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
    let rgb = if rgb.is_continuous() { rgb } else { rgb.try_clone()? };

    let width = u32::try_from(rgb.cols()).map_err(|_| Error::InvalidInput("Negative Mat width".to_string()))?;
    let height = u32::try_from(rgb.rows()).map_err(|_| Error::InvalidInput("Negative Mat height".to_string()))?;

    Frame::from_raw(width, height, rgb.data_bytes()?.to_vec())
        .ok_or_else(|| Error::InvalidInput(format!("Mat data does not match {width}x{height} RGB")))
}
