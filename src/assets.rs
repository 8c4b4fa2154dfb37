//! Overlay images and multi-variant overlay assets.

use crate::{Error, Result};
use image::{imageops::FilterType, DynamicImage, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

/// Decoded overlay pixels, with or without an alpha channel
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayImage {
    /// Three-channel image, copied over the frame as is
    Opaque(RgbImage),
    /// Four-channel image, alpha blended
    Transparent(RgbaImage),
}

impl OverlayImage {
    /// Keep the alpha channel only if the source has one
    #[must_use]
    pub fn from_dynamic(image: DynamicImage) -> Self {
        if image.color().has_alpha() {
            Self::Transparent(image.into_rgba8())
        } else {
            Self::Opaque(image.into_rgb8())
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Opaque(img) => img.width(),
            Self::Transparent(img) => img.width(),
        }
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        match self {
            Self::Opaque(img) => img.height(),
            Self::Transparent(img) => img.height(),
        }
    }

    /// `(width, height)`
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    #[must_use]
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Transparent(_))
    }

    /// Resampled copy; `None` for a zero-sized target
    #[must_use]
    pub fn resized(&self, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if (width, height) == self.dimensions() {
            return Some(self.clone());
        }
        Some(match self {
            Self::Opaque(img) => Self::Opaque(image::imageops::resize(img, width, height, FilterType::Triangle)),
            Self::Transparent(img) => {
                Self::Transparent(image::imageops::resize(img, width, height, FilterType::Triangle))
            }
        })
    }
}

/// Load one overlay image from disk
///
/// # Errors
///
/// Returns `AssetLoadFailed` if the file is missing, unreadable, or empty
pub fn load_overlay<P: AsRef<Path>>(path: P) -> Result<OverlayImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| Error::AssetLoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::AssetLoadFailed {
            path: path.to_path_buf(),
            reason: "image has no pixels".to_string(),
        });
    }
    Ok(OverlayImage::from_dynamic(image))
}

/// One or more overlay variants with a circular cursor
#[derive(Debug, Clone, Default)]
pub struct OverlayAsset {
    variants: Vec<(PathBuf, OverlayImage)>,
    active: usize,
}

impl OverlayAsset {
    /// Asset from already decoded variants (label, image)
    #[must_use]
    pub fn from_images(variants: Vec<(PathBuf, OverlayImage)>) -> Self {
        Self { variants, active: 0 }
    }

    /// Load every path; unreadable files are reported and skipped
    ///
    /// An asset with no loadable variant renders nothing.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut variants = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            match load_overlay(path) {
                Ok(image) => {
                    log::info!(
                        "Overlay loaded: {} ({}x{}, {})",
                        path.display(),
                        image.width(),
                        image.height(),
                        if image.has_alpha() { "RGBA" } else { "RGB" }
                    );
                    variants.push((path.to_path_buf(), image));
                }
                Err(e) => log::warn!("{e}"),
            }
        }
        if variants.is_empty() && !paths.is_empty() {
            log::warn!("No overlay variant could be loaded; filter will render nothing");
        }
        Self::from_images(variants)
    }

    /// Currently selected variant
    #[must_use]
    pub fn active(&self) -> Option<&OverlayImage> {
        self.variants.get(self.active).map(|(_, image)| image)
    }

    /// Path of the currently selected variant
    #[must_use]
    pub fn active_path(&self) -> Option<&Path> {
        self.variants.get(self.active).map(|(path, _)| path.as_path())
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Advance to the next variant, wrapping to the first; returns the new index
    pub fn next_asset(&mut self) -> Option<usize> {
        if self.variants.is_empty() {
            return None;
        }
        self.active = (self.active + 1) % self.variants.len();
        if let Some(path) = self.active_path() {
            log::info!(
                "Switched to overlay {} ({}/{})",
                path.display(),
                self.active + 1,
                self.variants.len()
            );
        }
        Some(self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    fn solid(width: u32, height: u32) -> OverlayImage {
        OverlayImage::Transparent(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn test_from_dynamic_keeps_alpha_only_when_present() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])));
        assert!(!OverlayImage::from_dynamic(rgb).has_alpha());

        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4])));
        assert!(OverlayImage::from_dynamic(rgba).has_alpha());
    }

    #[test]
    fn test_resized() {
        let image = solid(300, 150);
        let resized = image.resized(60, 30).unwrap();
        assert_eq!(resized.dimensions(), (60, 30));
        assert!(resized.has_alpha());
        assert!(image.resized(0, 10).is_none());
    }

    #[test]
    fn test_next_asset_cycles() {
        let mut asset = OverlayAsset::from_images(vec![
            (PathBuf::from("a.png"), solid(2, 2)),
            (PathBuf::from("b.png"), solid(3, 3)),
            (PathBuf::from("c.png"), solid(4, 4)),
        ]);
        assert_eq!(asset.active_index(), 0);
        assert_eq!(asset.next_asset(), Some(1));
        assert_eq!(asset.next_asset(), Some(2));
        assert_eq!(asset.next_asset(), Some(0));
        assert_eq!(asset.active().unwrap().width(), 2);
        assert_eq!(asset.active_path(), Some(Path::new("a.png")));
    }

    #[test]
    fn test_empty_asset() {
        let mut asset = OverlayAsset::default();
        assert!(asset.next_asset().is_none());
        assert!(asset.active().is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_overlay("does/not/exist.png").unwrap_err();
        assert!(matches!(err, Error::AssetLoadFailed { .. }));

        let asset = OverlayAsset::load(&["does/not/exist.png"]);
        assert!(asset.is_empty());
    }
}
