//! Face bounding boxes and the detectors that produce them.

use crate::{Frame, Result};

/// Axis-aligned face rectangle in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Box of the given side length centred on a point
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Landmark coordinates are pixel-sized
    pub fn centered_square(cx: f32, cy: f32, side: i32) -> Self {
        Self {
            x: cx as i32 - side / 2,
            y: cy as i32 - side / 2,
            width: side,
            height: side,
        }
    }

    /// Horizontal centre
    #[must_use]
    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Vertical centre
    #[must_use]
    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

#[cfg(feature = "camera")]
impl From<opencv::core::Rect> for BoundingBox {
    fn from(rect: opencv::core::Rect) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
    }
}

/// Anything that finds faces in a frame
pub trait FaceDetector {
    /// Detect faces, returning one box per face
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying detector fails on this frame
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>>;

    /// Whether the detector is backed by a real model
    fn available(&self) -> bool {
        true
    }

    /// Detector name for logs
    fn name(&self) -> &str;
}

/// Detector used when no cascade could be loaded; never finds anything
pub struct NullFaceDetector;

impl FaceDetector for NullFaceDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<BoundingBox>> {
        Ok(Vec::new())
    }

    fn available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "NullFaceDetector"
    }
}

#[cfg(feature = "camera")]
pub use haar::HaarFaceDetector;

#[cfg(feature = "camera")]
mod haar {
    use super::{BoundingBox, FaceDetector};
    use crate::{utils::image_conversion::frame_to_mat, Error, Frame, Result};
    use opencv::{
        core::{Mat, Rect, Size, Vector},
        imgproc,
        objdetect::CascadeClassifier,
        prelude::*,
    };
    use std::path::{Path, PathBuf};

    /// Haar cascade frontal face detector
    pub struct HaarFaceDetector {
        cascade: CascadeClassifier,
        path: PathBuf,
    }

    impl HaarFaceDetector {
        /// Load the first usable cascade among `candidates`
        ///
        /// # Errors
        ///
        /// Returns `ProviderUnavailable` if none of the files loads
        pub fn new<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
            for candidate in candidates {
                let path = candidate.as_ref();
                if !path.exists() {
                    continue;
                }
                let cascade = CascadeClassifier::new(&path.to_string_lossy())?;
                if cascade.empty()? {
                    log::warn!("Cascade {} loaded empty, skipping", path.display());
                    continue;
                }
                log::info!("Haar cascade loaded: {}", path.display());
                return Ok(Self {
                    cascade,
                    path: path.to_path_buf(),
                });
            }
            Err(Error::ProviderUnavailable(
                "no Haar cascade could be loaded; face detection disabled".to_string(),
            ))
        }

        /// Path of the loaded cascade
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn run_cascade(&mut self, gray: &Mat, scale_factor: f64, min_neighbors: i32, min_side: i32) -> Result<Vector<Rect>> {
            let mut faces = Vector::<Rect>::new();
            self.cascade.detect_multi_scale(
                gray,
                &mut faces,
                scale_factor,
                min_neighbors,
                0,
                Size::new(min_side, min_side),
                Size::default(),
            )?;
            Ok(faces)
        }
    }

    impl FaceDetector for HaarFaceDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>> {
            let bgr = frame_to_mat(frame)?;
            let mut gray = Mat::default();
            imgproc::cvt_color(&bgr, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;

            // Improve contrast for low light
            let mut equalized = Mat::default();
            imgproc::equalize_hist(&gray, &mut equalized)?;

            let mut faces = self.run_cascade(&equalized, 1.1, 5, 40)?;
            if faces.is_empty() {
                // Second, more sensitive pass
                faces = self.run_cascade(&equalized, 1.05, 4, 30)?;
            }

            Ok(faces.iter().map(BoundingBox::from).collect())
        }

        fn name(&self) -> &str {
            "HaarFaceDetector"
        }
    }
}
