//! Alpha compositing of overlay images onto frames.

use crate::{assets::OverlayImage, utils::safe_cast::channel_u8, Error, Frame, Result};

/// Intersection of an overlay footprint with the frame, in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRegion {
    /// First frame column written
    pub frame_x: u32,
    /// First frame row written
    pub frame_y: u32,
    /// First overlay column read
    pub overlay_x: u32,
    /// First overlay row read
    pub overlay_y: u32,
    pub width: u32,
    pub height: u32,
}

/// Clip an overlay of `overlay_size` placed at `(origin_x, origin_y)` to a frame
///
/// Returns `None` when nothing of the overlay is visible.
#[must_use]
pub fn clip(frame_size: (u32, u32), overlay_size: (u32, u32), origin_x: i32, origin_y: i32) -> Option<ClipRegion> {
    let (frame_w, frame_h) = (i64::from(frame_size.0), i64::from(frame_size.1));
    let (ox, oy) = (i64::from(origin_x), i64::from(origin_y));

    let x0 = ox.max(0);
    let y0 = oy.max(0);
    let x1 = (ox + i64::from(overlay_size.0)).min(frame_w);
    let y1 = (oy + i64::from(overlay_size.1)).min(frame_h);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    // All values are within [0, u32::MAX] after clipping
    Some(ClipRegion {
        frame_x: u32::try_from(x0).ok()?,
        frame_y: u32::try_from(y0).ok()?,
        overlay_x: u32::try_from(x0 - ox).ok()?,
        overlay_y: u32::try_from(y0 - oy).ok()?,
        width: u32::try_from(x1 - x0).ok()?,
        height: u32::try_from(y1 - y0).ok()?,
    })
}

/// Composite `overlay` onto `frame` with its top-left corner at `(origin_x, origin_y)`
///
/// Only the visible part is written. RGBA overlays blend per pixel as
/// `(1 - a) * background + a * foreground`; RGB overlays overwrite.
/// Returns the number of frame pixels written.
pub fn blend(frame: &mut Frame, overlay: &OverlayImage, origin_x: i32, origin_y: i32) -> usize {
    let Some(region) = clip(frame.dimensions(), overlay.dimensions(), origin_x, origin_y) else {
        return 0;
    };

    for row in 0..region.height {
        let fy = region.frame_y + row;
        let sy = region.overlay_y + row;
        for col in 0..region.width {
            let fx = region.frame_x + col;
            let sx = region.overlay_x + col;
            match overlay {
                OverlayImage::Opaque(src) => {
                    frame.put_pixel(fx, fy, *src.get_pixel(sx, sy));
                }
                OverlayImage::Transparent(src) => {
                    let fg = src.get_pixel(sx, sy);
                    let alpha = fg[3];
                    if alpha == 0 {
                        continue;
                    }
                    let bg = frame.get_pixel_mut(fx, fy);
                    if alpha == u8::MAX {
                        bg.0 = [fg[0], fg[1], fg[2]];
                        continue;
                    }
                    let a = f64::from(alpha) / 255.0;
                    for ch in 0..3 {
                        bg[ch] = channel_u8((1.0 - a) * f64::from(bg[ch]) + a * f64::from(fg[ch]));
                    }
                }
            }
        }
    }

    region.width as usize * region.height as usize
}

/// Cross-fade `layer` into `frame`: `out = alpha * layer + (1 - alpha) * frame`
///
/// Pixels where both images agree are left untouched.
///
/// # Errors
///
/// Returns an error if `alpha` is outside `[0, 1]` or the sizes differ
pub fn blend_weighted(frame: &mut Frame, layer: &Frame, alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidInput(format!("Blend alpha {alpha} outside [0, 1]")));
    }
    if frame.dimensions() != layer.dimensions() {
        return Err(Error::InvalidInput(format!(
            "Layer size {:?} does not match frame size {:?}",
            layer.dimensions(),
            frame.dimensions()
        )));
    }

    for (dst, src) in frame.pixels_mut().zip(layer.pixels()) {
        if *dst == *src {
            continue;
        }
        for ch in 0..3 {
            dst[ch] = channel_u8(alpha * f64::from(src[ch]) + (1.0 - alpha) * f64::from(dst[ch]));
        }
    }
    Ok(())
}
