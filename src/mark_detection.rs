//! Facial landmark sets and the providers that produce them.

use crate::{face_detection::BoundingBox, utils::expand_to_square, Frame, Result};
use nalgebra::Point2;

/// Ordered landmark points of one face, in frame pixels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandmarkSet {
    points: Vec<Point2<f32>>,
}

impl LandmarkSet {
    #[must_use]
    pub fn new(points: Vec<Point2<f32>>) -> Self {
        Self { points }
    }

    /// Build from `(x, y)` pairs
    #[must_use]
    pub fn from_tuples(points: &[(f32, f32)]) -> Self {
        Self {
            points: points.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point2<f32>> {
        self.points.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point2<f32>> {
        self.points.iter()
    }

    /// Look up several indices at once; `None` if any is missing
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Option<Vec<Point2<f32>>> {
        indices.iter().map(|&i| self.get(i)).collect()
    }
}

/// Square regions a landmark model should run on
///
/// Each face box is expanded by `expansion` and squared. Without face boxes
/// the largest centred square of the frame is searched, so landmarks still
/// come through when the face detector misses or is unavailable.
#[must_use]
#[allow(clippy::cast_possible_wrap)] // Frame sides fit in i32
pub fn landmark_regions(faces: &[BoundingBox], frame_size: (u32, u32), expansion: f32) -> Vec<BoundingBox> {
    let (width, height) = (frame_size.0 as i32, frame_size.1 as i32);
    if faces.is_empty() {
        let side = width.min(height);
        if side <= 0 {
            return Vec::new();
        }
        return vec![BoundingBox::new((width - side) / 2, (height - side) / 2, side, side)];
    }
    faces
        .iter()
        .map(|face| expand_to_square(*face, width, height, expansion))
        .filter(|roi| !roi.is_empty())
        .collect()
}

/// Source of per-face landmark sets
pub trait LandmarkProvider {
    /// Landmarks for every face found in `frame`
    ///
    /// `faces` are region-of-interest hints; an empty slice means the whole frame.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails on this frame
    fn detect(&mut self, frame: &Frame, faces: &[BoundingBox]) -> Result<Vec<LandmarkSet>>;

    /// Whether the provider is backed by a real model
    fn available(&self) -> bool;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Provider used when no landmark model is available
pub struct NullLandmarkProvider;

impl LandmarkProvider for NullLandmarkProvider {
    fn detect(&mut self, _frame: &Frame, _faces: &[BoundingBox]) -> Result<Vec<LandmarkSet>> {
        Ok(Vec::new())
    }

    fn available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "NullLandmarkProvider"
    }
}

#[cfg(feature = "onnx")]
pub use face_mesh::FaceMeshDetector;

#[cfg(feature = "onnx")]
mod face_mesh {
    use super::{landmark_regions, LandmarkProvider, LandmarkSet};
    use crate::{constants::NUM_FACE_MESH_LANDMARKS, face_detection::BoundingBox, Error, Frame, Result};
    use image::imageops::{self, FilterType};
    use nalgebra::Point2;
    use ndarray::{Array4, CowArray};
    use ort::{Environment, Session, Value};
    use std::path::Path;
    use std::sync::Arc;

    /// Face mesh model input side
    const FACE_MESH_INPUT_SIZE: u32 = 192;

    /// Region of interest expansion around the detector box
    const ROI_EXPANSION: f32 = 0.25;

    /// 468-point face mesh landmark model run through `ONNX` Runtime
    pub struct FaceMeshDetector {
        session: Session,
        channels_first: bool,
    }

    impl FaceMeshDetector {
        /// Load a face mesh model
        ///
        /// # Errors
        ///
        /// Returns an error if the model cannot be loaded or has no inputs
        pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
            log::info!(
                "Initializing FaceMeshDetector with model: {}",
                model_path.as_ref().display()
            );
            let environment = Arc::new(
                Environment::builder()
                    .with_name("face_mesh")
                    .with_log_level(ort::LoggingLevel::Warning)
                    .build()?,
            );

            let session = ort::SessionBuilder::new(&environment)?
                .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
                .with_model_from_file(model_path)?;

            let input = session
                .inputs
                .first()
                .ok_or_else(|| Error::ProviderUnavailable("Face mesh model has no inputs".to_string()))?;

            // [1, 3, H, W] vs [1, H, W, 3]
            let channels_first = input.dimensions.get(1).copied().flatten() == Some(3);

            Ok(Self {
                session,
                channels_first,
            })
        }

        fn preprocess(&self, frame: &Frame, roi: BoundingBox) -> Result<Array4<f32>> {
            #[allow(clippy::cast_sign_loss)] // ROI is clamped inside the frame
            let crop = imageops::crop_imm(frame, roi.x as u32, roi.y as u32, roi.width as u32, roi.height as u32).to_image();
            let resized = imageops::resize(&crop, FACE_MESH_INPUT_SIZE, FACE_MESH_INPUT_SIZE, FilterType::Triangle);

            let size = FACE_MESH_INPUT_SIZE as usize;
            let shape = if self.channels_first {
                (1, 3, size, size)
            } else {
                (1, size, size, 3)
            };
            let mut input = Array4::<f32>::zeros(shape);
            for (x, y, pixel) in resized.enumerate_pixels() {
                for ch in 0..3 {
                    let value = f32::from(pixel[ch]) / 255.0;
                    if self.channels_first {
                        input[[0, ch, y as usize, x as usize]] = value;
                    } else {
                        input[[0, y as usize, x as usize, ch]] = value;
                    }
                }
            }
            Ok(input)
        }

        fn forward(&self, input: Array4<f32>) -> Result<Vec<f32>> {
            let cow_array = CowArray::from(input.into_dyn());
            let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

            let outputs = self.session.run(vec![input_tensor])?;
            let landmarks_output = outputs
                .into_iter()
                .next()
                .ok_or_else(|| Error::ProviderUnavailable("No output from face mesh model".to_string()))?;

            let tensor = landmarks_output.try_extract::<f32>()?;
            let view = tensor.view();
            Ok(view.iter().copied().collect())
        }

        #[allow(clippy::cast_precision_loss)]
        fn postprocess(raw: &[f32], roi: BoundingBox) -> Option<LandmarkSet> {
            if raw.len() < NUM_FACE_MESH_LANDMARKS * 3 {
                return None;
            }
            let scale_x = roi.width as f32 / FACE_MESH_INPUT_SIZE as f32;
            let scale_y = roi.height as f32 / FACE_MESH_INPUT_SIZE as f32;
            let points = raw
                .chunks_exact(3)
                .take(NUM_FACE_MESH_LANDMARKS)
                .map(|c| Point2::new(roi.x as f32 + c[0] * scale_x, roi.y as f32 + c[1] * scale_y))
                .collect();
            Some(LandmarkSet::new(points))
        }
    }

    impl LandmarkProvider for FaceMeshDetector {
        fn detect(&mut self, frame: &Frame, faces: &[BoundingBox]) -> Result<Vec<LandmarkSet>> {
            let regions = landmark_regions(faces, frame.dimensions(), ROI_EXPANSION);
            let mut results = Vec::with_capacity(regions.len());
            for roi in regions {
                let input = self.preprocess(frame, roi)?;
                let raw = self.forward(input)?;
                match Self::postprocess(&raw, roi) {
                    Some(set) => results.push(set),
                    None => log::warn!("Face mesh output too short: {} values", raw.len()),
                }
            }
            Ok(results)
        }

        fn available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "FaceMeshDetector"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::POSE_LANDMARK_INDICES;

    #[test]
    fn test_select_requires_all_indices() {
        let set = LandmarkSet::new((0..300).map(|i| Point2::new(i as f32, 0.0)).collect());
        let selected = set.select(&POSE_LANDMARK_INDICES).unwrap();
        assert_eq!(selected.len(), 6);
        assert_eq!(selected[2].x, 1.0);

        let short = LandmarkSet::new((0..100).map(|i| Point2::new(i as f32, 0.0)).collect());
        assert!(short.select(&POSE_LANDMARK_INDICES).is_none());
    }

    #[test]
    fn test_regions_without_faces_cover_frame_centre() {
        assert_eq!(
            landmark_regions(&[], (640, 480), 0.25),
            vec![BoundingBox::new(80, 0, 480, 480)]
        );
        assert_eq!(
            landmark_regions(&[], (300, 400), 0.25),
            vec![BoundingBox::new(0, 50, 300, 300)]
        );
        assert!(landmark_regions(&[], (0, 480), 0.25).is_empty());
    }

    #[test]
    fn test_regions_follow_face_boxes() {
        let faces = [BoundingBox::new(50, 50, 40, 60), BoundingBox::new(0, 0, 0, 0)];
        let regions = landmark_regions(&faces, (200, 200), 0.25);
        assert_eq!(regions, vec![BoundingBox::new(40, 35, 90, 90)]);
    }

    #[test]
    fn test_null_provider() {
        let mut provider = NullLandmarkProvider;
        assert!(!provider.available());
        let frame = Frame::new(8, 8);
        assert!(provider.detect(&frame, &[BoundingBox::new(0, 0, 8, 8)]).unwrap().is_empty());
    }
}
