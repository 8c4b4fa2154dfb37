//! Head-pose coordinate axes drawn over each face.

use super::Detections;
use crate::{
    compositor::blend_weighted,
    constants::AXIS_THICKNESS,
    pose_estimation::{project_points, CameraIntrinsics, Pose, PoseEstimator},
    utils::draw_thick_line,
    Error, Frame, Result,
};
use image::Rgb;
use nalgebra::Point3;
use std::path::{Path, PathBuf};

/// Axis colours in X, Y, Z order
const AXIS_COLORS: [Rgb<u8>; 3] = [Rgb([255, 0, 0]), Rgb([0, 255, 0]), Rgb([0, 0, 255])];

/// Pose-tracked placeholder for a 3D model: projected X/Y/Z axes
#[derive(Debug, Clone)]
pub struct PoseAxesFilter {
    estimator: PoseEstimator,
    model_path: Option<PathBuf>,
    model_loaded: bool,
    alpha: f64,
    axis_length: f64,
}

impl PoseAxesFilter {
    /// Build the filter; a missing model file disables it with a warning
    ///
    /// # Errors
    ///
    /// Returns an error if `alpha` is outside `[0, 1]` or `axis_length` is not positive
    pub fn new(estimator: PoseEstimator, model_path: Option<&Path>, alpha: f64, axis_length: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::InvalidInput(format!("Pose axes alpha {alpha} outside [0, 1]")));
        }
        if !axis_length.is_finite() || axis_length <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Pose axes length must be positive, got {axis_length}"
            )));
        }

        let model_loaded = match model_path {
            Some(path) if !path.exists() => {
                log::warn!("3D model not found: {}; pose axes disabled", path.display());
                false
            }
            Some(path) => {
                log::info!("3D model ready: {}", path.display());
                true
            }
            None => true,
        };

        Ok(Self {
            estimator,
            model_path: model_path.map(Path::to_path_buf),
            model_loaded,
            alpha,
            axis_length,
        })
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.model_loaded
    }

    #[must_use]
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Poses of every face whose landmarks allow a solve
    #[must_use]
    pub fn poses(&self, frame_size: (u32, u32), detections: &Detections) -> Vec<Pose> {
        detections
            .landmarks
            .iter()
            .filter_map(|set| match self.estimator.estimate_from_landmarks(frame_size, set) {
                Ok(pose) => Some(pose),
                Err(e) if e.is_per_frame() => {
                    log::debug!("Skipping face for pose axes: {e}");
                    None
                }
                Err(e) => {
                    log::warn!("Pose estimation failed: {e}");
                    None
                }
            })
            .collect()
    }

    /// Draw the axes for every posed face; returns the number of faces drawn
    #[allow(clippy::cast_possible_truncation)] // Projected pixels are drawn as f32
    pub fn render(&self, frame: &mut Frame, detections: &Detections) -> usize {
        if !self.model_loaded || detections.landmarks.is_empty() {
            return 0;
        }
        let poses = self.poses(frame.dimensions(), detections);
        if poses.is_empty() {
            return 0;
        }

        let intrinsics = CameraIntrinsics::from_frame_size(frame.width(), frame.height());
        let l = self.axis_length;
        let axis_points = [
            Point3::origin(),
            Point3::new(l, 0.0, 0.0),
            Point3::new(0.0, l, 0.0),
            Point3::new(0.0, 0.0, l),
        ];

        let mut layer = frame.clone();
        let mut drawn = 0;
        for pose in &poses {
            let projected = project_points(&axis_points, pose, &intrinsics);
            let Some(origin) = projected[0] else {
                continue;
            };
            let start = (origin.x as f32, origin.y as f32);
            for (end, color) in projected[1..].iter().zip(AXIS_COLORS) {
                if let Some(end) = end {
                    draw_thick_line(&mut layer, start, (end.x as f32, end.y as f32), color, AXIS_THICKNESS);
                }
            }
            drawn += 1;
        }

        if let Err(e) = blend_weighted(frame, &layer, self.alpha) {
            log::debug!("Pose axes blend failed: {e}");
            return 0;
        }
        drawn
    }
}
