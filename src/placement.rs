//! Where a 2D overlay goes and how large it is drawn.

use crate::{
    constants::{
        EPSILON, MOUTH_LEFT, MOUTH_RIGHT, MUSTACHE_FALLBACK_WIDTH, MUSTACHE_WIDTH_FACTOR, NOSE_BOX_SIZE, NOSE_TIP,
        SCALE_MAX, SCALE_MIN,
    },
    face_detection::BoundingBox,
    mark_detection::LandmarkSet,
    utils::safe_cast::f64_to_i32,
    Error, Result,
};
use nalgebra::distance;

/// Vertical alignment of an overlay relative to its anchor box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    /// Overlay centred on the top edge of the box (eyewear, hats)
    #[default]
    Above,
    /// Overlay centred on the box centre (landmark anchors)
    Center,
}

/// Target size and top-left origin of a placed overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Scale, alignment and accumulated user offsets of one overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    scale: f64,
    offset_x: i32,
    offset_y: i32,
    align: VerticalAlign,
}

impl Placement {
    /// # Errors
    ///
    /// Returns `InvalidScale` if `scale` is not finite or outside `[0.1, 2.0]`
    pub fn new(scale: f64) -> Result<Self> {
        if !scale.is_finite() || !(SCALE_MIN..=SCALE_MAX).contains(&scale) {
            return Err(Error::InvalidScale {
                scale,
                min: SCALE_MIN,
                max: SCALE_MAX,
            });
        }
        Ok(Self {
            scale,
            offset_x: 0,
            offset_y: 0,
            align: VerticalAlign::default(),
        })
    }

    #[must_use]
    pub fn with_align(mut self, align: VerticalAlign) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset_x: i32, offset_y: i32) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn align(&self) -> VerticalAlign {
        self.align
    }

    /// Accumulated `(offset_x, offset_y)`
    #[must_use]
    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }

    /// Nudge the overlay; repeated calls accumulate
    pub fn adjust_offset(&mut self, dx: i32, dy: i32) {
        self.offset_x = self.offset_x.saturating_add(dx);
        self.offset_y = self.offset_y.saturating_add(dy);
    }

    /// Place an overlay of `native_size` over `anchor`
    ///
    /// The overlay is `scale` times the box width, keeps its aspect ratio and is
    /// centred horizontally over the box. Returns `None` if it would be empty.
    #[must_use]
    pub fn place(&self, anchor: BoundingBox, native_size: (u32, u32)) -> Option<PlacementRect> {
        if anchor.is_empty() {
            return None;
        }
        let (width, height) = target_size(f64::from(anchor.width) * self.scale, native_size)?;
        let w = i32::try_from(width).ok()?;
        let h = i32::try_from(height).ok()?;

        let x = anchor.x - (w - anchor.width).div_euclid(2);
        let y = match self.align {
            VerticalAlign::Above => anchor.y - h / 2,
            VerticalAlign::Center => anchor.center_y() - h / 2,
        };

        Some(self.offset_rect(x, y, width, height))
    }

    /// Place a mustache under the nose tip, sized from the mouth corners
    ///
    /// Faces without a nose tip are skipped. Sets too short to carry the
    /// mouth corners fall back to a fixed width.
    #[must_use]
    pub fn place_mustache(&self, landmarks: &LandmarkSet, native_size: (u32, u32)) -> Option<PlacementRect> {
        let nose = landmarks.get(NOSE_TIP)?;
        let base_width = match (landmarks.get(MOUTH_LEFT), landmarks.get(MOUTH_RIGHT)) {
            (Some(left), Some(right)) if landmarks.len() > MOUTH_RIGHT => {
                f64::from(distance(&left, &right)) * MUSTACHE_WIDTH_FACTOR
            }
            _ => f64::from(MUSTACHE_FALLBACK_WIDTH),
        };
        let (width, height) = target_size(base_width * self.scale, native_size)?;
        let w = i32::try_from(width).ok()?;

        // Top edge on the nose tip, centre half the height below it
        let x = f64_to_i32(f64::from(nose.x)).ok()? - w / 2;
        let y = f64_to_i32(f64::from(nose.y)).ok()?;

        Some(self.offset_rect(x, y, width, height))
    }

    fn offset_rect(&self, x: i32, y: i32, width: u32, height: u32) -> PlacementRect {
        PlacementRect {
            x: x.saturating_add(self.offset_x),
            y: y.saturating_add(self.offset_y),
            width,
            height,
        }
    }
}

/// Pseudo-box around the nose tip, used to place nose overlays
#[must_use]
pub fn nose_anchor(landmarks: &LandmarkSet) -> Option<BoundingBox> {
    let nose = landmarks.get(NOSE_TIP)?;
    if !nose.x.is_finite() || !nose.y.is_finite() {
        return None;
    }
    Some(BoundingBox::centered_square(nose.x, nose.y, NOSE_BOX_SIZE))
}

/// Pixel size for a target width, keeping the native aspect ratio
///
/// Both dimensions are truncated only at the end.
#[allow(clippy::cast_sign_loss)] // Non-negative after the check below
#[allow(clippy::cast_possible_truncation)]
fn target_size(target_width: f64, native_size: (u32, u32)) -> Option<(u32, u32)> {
    let (native_w, native_h) = native_size;
    if native_w == 0 || native_h == 0 || !target_width.is_finite() || target_width <= 0.0 {
        return None;
    }
    let target_height = target_width * f64::from(native_h) / f64::from(native_w);
    let width = (target_width + EPSILON).trunc();
    let height = (target_height + EPSILON).trunc();
    if width < 1.0 || height < 1.0 || width > f64::from(u32::MAX) || height > f64::from(u32::MAX) {
        return None;
    }
    Some((width as u32, height as u32))
}
