//! Utility functions for box geometry and debug drawing.

pub mod safe_cast;
#[cfg(feature = "camera")]
pub mod image_conversion;

use crate::{face_detection::BoundingBox, mark_detection::LandmarkSet, Frame};
use image::Rgb;
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut},
    rect::Rect,
};
use safe_cast::f32_to_i32_clamp;

/// Face rectangle colour (green)
pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Mesh point colour (yellow)
pub const MESH_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/// Expand a face box by `shift` of its size on every side, square it and keep it inside the frame
///
/// Used to build the region of interest fed to the landmark model.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Precision loss acceptable for box dimensions
pub fn expand_to_square(bbox: BoundingBox, max_width: i32, max_height: i32, shift: f32) -> BoundingBox {
    let x_shift = f32_to_i32_clamp(bbox.width as f32 * shift, 0, max_width);
    let y_shift = f32_to_i32_clamp(bbox.height as f32 * shift, 0, max_height);

    let mut x = (bbox.x - x_shift).max(0);
    let mut y = (bbox.y - y_shift).max(0);
    let width = (bbox.width + 2 * x_shift).min(max_width - x);
    let height = (bbox.height + 2 * y_shift).min(max_height - y);

    let side = width.max(height).min(max_width).min(max_height);

    if x + side > max_width {
        x = max_width - side;
    }
    if y + side > max_height {
        y = max_height - side;
    }

    BoundingBox::new(x.max(0), y.max(0), side, side)
}

/// Draw a 2 px rectangle around every face box
#[allow(clippy::cast_sign_loss)] // Guarded by the positive size check
pub fn draw_face_boxes(frame: &mut Frame, faces: &[BoundingBox]) {
    for bbox in faces.iter().filter(|b| b.width > 2 && b.height > 2) {
        draw_hollow_rect_mut(
            frame,
            Rect::at(bbox.x, bbox.y).of_size(bbox.width as u32, bbox.height as u32),
            BOX_COLOR,
        );
        draw_hollow_rect_mut(
            frame,
            Rect::at(bbox.x + 1, bbox.y + 1).of_size(bbox.width as u32 - 2, bbox.height as u32 - 2),
            BOX_COLOR,
        );
    }
}

/// Draw every landmark as a small filled dot
#[allow(clippy::cast_possible_truncation)]
pub fn draw_landmarks(frame: &mut Frame, faces: &[LandmarkSet]) {
    for face in faces {
        for point in face.iter() {
            draw_filled_circle_mut(frame, (point.x as i32, point.y as i32), 1, MESH_COLOR);
        }
    }
}

/// Draw a line segment `thickness` pixels wide
#[allow(clippy::cast_precision_loss)]
pub fn draw_thick_line(frame: &mut Frame, start: (f32, f32), end: (f32, f32), color: Rgb<u8>, thickness: i32) {
    let half = thickness.max(1) / 2;
    for dy in -half..=half {
        for dx in -half..=half {
            let (ox, oy) = (dx as f32, dy as f32);
            draw_line_segment_mut(frame, (start.0 + ox, start.1 + oy), (end.0 + ox, end.1 + oy), color);
        }
    }
}
