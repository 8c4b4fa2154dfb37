//! Checked numeric conversions between pixel and geometry spaces

use crate::{Error, Result};

/// Convert an image dimension to signed pixel space
///
/// # Errors
///
/// Returns an error if the value exceeds `i32::MAX`
pub fn u32_to_i32(value: u32) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Dimension {value} too large for pixel space")))
}

/// Truncate a geometric value towards zero into pixel space
///
/// # Errors
///
/// Returns an error if the value is not finite or outside the `i32` range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is intended
pub fn f64_to_i32(value: f64) -> Result<i32> {
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be used as a pixel coordinate"
        )))
    }
}

/// Clamp and convert f32 to i32 for drawing
#[must_use]
#[allow(clippy::cast_precision_loss)] // Acceptable for clamping bounds
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f32_to_i32_clamp(value: f32, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.clamp(min as f32, max as f32);
    (clamped as i32).clamp(min, max)
}

/// Quantise a blended channel value to 8 bits, rounding to nearest
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamped into u8 range first
#[allow(clippy::cast_sign_loss)]
pub fn channel_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_u32_to_i32() {
        assert_eq!(u32_to_i32(640).unwrap(), 640);
        assert_eq!(u32_to_i32(0).unwrap(), 0);
        assert!(u32_to_i32(i32::MAX as u32 + 1).is_err());
    }

    #[test]
    fn test_f64_to_i32_truncates() {
        assert_eq!(f64_to_i32(59.999).unwrap(), 59);
        assert_eq!(f64_to_i32(-3.7).unwrap(), -3);
        assert!(f64_to_i32(f64::NAN).is_err());
        assert!(f64_to_i32(f64::INFINITY).is_err());
        assert!(f64_to_i32(3e10).is_err());
    }

    #[test]
    fn test_f32_to_i32_clamp() {
        assert_eq!(f32_to_i32_clamp(12.8, 0, 100), 12);
        assert_eq!(f32_to_i32_clamp(-10.0, 0, 100), 0);
        assert_eq!(f32_to_i32_clamp(150.0, 0, 100), 100);
        assert_eq!(f32_to_i32_clamp(f32::NAN, 0, 100), 0);
        assert_eq!(f32_to_i32_clamp(5.0, 100, 0), 5);
    }

    #[test]
    fn test_channel_u8() {
        assert_eq!(channel_u8(0.0), 0);
        assert_eq!(channel_u8(254.5), 255);
        assert_eq!(channel_u8(127.49), 127);
        assert_eq!(channel_u8(300.0), 255);
        assert_eq!(channel_u8(-4.0), 0);
        assert_eq!(channel_u8(f64::NAN), 0);
    }

    proptest! {
        #[test]
        fn prop_channel_u8_preserves_integers(value in 0u8..=255) {
            prop_assert_eq!(channel_u8(f64::from(value)), value);
        }

        #[test]
        fn prop_f32_to_i32_clamp_within_bounds(value in any::<f32>(), a in any::<i32>(), b in any::<i32>()) {
            let (min, max) = if a <= b { (a, b) } else { (b, a) };
            let result = f32_to_i32_clamp(value, a, b);
            prop_assert!(result >= min && result <= max);
        }
    }
}
