use crate::{
    constants::{
        CAMERA_CENTER_FACTOR, CANONICAL_FACE_POINTS, DEGENERACY_TOLERANCE, EPSILON, MODEL_POINTS_TOTAL_VALUES,
        PNP_MAX_ITERATIONS, POSE_LANDMARK_INDICES,
    },
    mark_detection::LandmarkSet,
    Error, Result,
};
use nalgebra::{DMatrix, DVector, Matrix3, Point2, Point3, Rotation3, UnitQuaternion, Vector2, Vector3};
use std::fs;
use std::path::Path;

/// Pinhole camera parameters derived from the frame size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Focal length equal to the frame width, principal point at the image centre
    #[must_use]
    pub fn from_frame_size(width: u32, height: u32) -> Self {
        let focal_length = f64::from(width);
        Self {
            fx: focal_length,
            fy: focal_length,
            cx: f64::from(width) / CAMERA_CENTER_FACTOR,
            cy: f64::from(height) / CAMERA_CENTER_FACTOR,
        }
    }

    /// The 3×3 camera matrix
    #[must_use]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(self.fx, 0.0, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0)
    }

    /// Project a camera-space point to pixels; `None` if it is not in front of the camera
    #[must_use]
    pub fn project(&self, point: &Point3<f64>) -> Option<Point2<f64>> {
        if point.z <= EPSILON {
            return None;
        }
        Some(Point2::new(
            self.fx * point.x / point.z + self.cx,
            self.fy * point.y / point.z + self.cy,
        ))
    }

    /// Pixel to normalised image coordinates (`K⁻¹ · p`)
    #[must_use]
    pub fn normalize(&self, pixel: &Point2<f64>) -> Point2<f64> {
        Point2::new((pixel.x - self.cx) / self.fx, (pixel.y - self.cy) / self.fy)
    }
}

/// Object-to-camera transform of a face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Rotation vector (axis × angle in radians)
    pub rotation: Vector3<f64>,
    /// Translation in model units
    pub translation: Vector3<f64>,
}

impl Pose {
    #[must_use]
    pub fn new(rotation: Vector3<f64>, translation: Vector3<f64>) -> Self {
        Self { rotation, translation }
    }

    #[must_use]
    pub fn rotation_matrix(&self) -> Rotation3<f64> {
        Rotation3::new(self.rotation)
    }

    /// Map an object-space point into camera space
    #[must_use]
    pub fn transform(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation_matrix() * point + self.translation
    }

    /// Pitch, yaw and roll in degrees
    #[must_use]
    pub fn euler_degrees(&self) -> Vector3<f64> {
        rotation_matrix_to_euler(self.rotation_matrix().matrix())
    }
}

/// Convert rotation matrix to Euler angles (pitch, yaw, roll) in degrees
#[must_use]
pub fn rotation_matrix_to_euler(rotation_matrix: &Matrix3<f64>) -> Vector3<f64> {
    let r13 = rotation_matrix[(0, 2)];
    let r21 = rotation_matrix[(1, 0)];
    let r22 = rotation_matrix[(1, 1)];
    let r23 = rotation_matrix[(1, 2)];
    let r33 = rotation_matrix[(2, 2)];

    let pitch = (-r23).clamp(-1.0, 1.0).asin();
    let yaw = r13.atan2(r33);
    let roll = r21.atan2(r22);

    Vector3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// Project object-space points through `pose`; points behind the camera map to `None`
#[must_use]
pub fn project_points(points: &[Point3<f64>], pose: &Pose, intrinsics: &CameraIntrinsics) -> Vec<Option<Point2<f64>>> {
    let rotation = pose.rotation_matrix();
    points
        .iter()
        .map(|p| intrinsics.project(&(rotation * p + pose.translation)))
        .collect()
}

/// Head pose estimator solving the perspective-n-point problem against a small face model
#[derive(Debug, Clone)]
pub struct PoseEstimator {
    model_points: Vec<Point3<f64>>,
    max_iterations: usize,
}

impl Default for PoseEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseEstimator {
    /// Estimator over the built-in canonical face model
    #[must_use]
    pub fn new() -> Self {
        Self {
            model_points: CANONICAL_FACE_POINTS
                .iter()
                .map(|&[x, y, z]| Point3::new(x, y, z))
                .collect(),
            max_iterations: PNP_MAX_ITERATIONS,
        }
    }

    /// Estimator over model points read from a text file (one value per line)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model file cannot be read
    /// - The model file does not hold exactly 6 points
    pub fn from_file<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!("Loading 3D face model: {}", model_path.as_ref().display());
        let content = fs::read_to_string(model_path)?;
        Ok(Self {
            model_points: Self::parse_model_points(&content)?,
            max_iterations: PNP_MAX_ITERATIONS,
        })
    }

    /// Object-space points, in landmark order
    #[must_use]
    pub fn model_points(&self) -> &[Point3<f64>] {
        &self.model_points
    }

    fn parse_model_points(content: &str) -> Result<Vec<Point3<f64>>> {
        let values: Vec<f64> = content
            .lines()
            .filter_map(|line| line.trim().parse::<f64>().ok())
            .collect();

        if values.len() != MODEL_POINTS_TOTAL_VALUES {
            return Err(Error::ConfigError(format!(
                "Expected {} coordinate values ({} points × 3), got {}",
                MODEL_POINTS_TOTAL_VALUES,
                POSE_LANDMARK_INDICES.len(),
                values.len()
            )));
        }

        Ok(values.chunks_exact(3).map(|c| Point3::new(c[0], c[1], c[2])).collect())
    }

    /// Estimate the face pose from a full landmark set
    ///
    /// # Errors
    ///
    /// Returns `InsufficientLandmarks` if any pose landmark index is missing,
    /// otherwise the errors of [`PoseEstimator::estimate`]
    pub fn estimate_from_landmarks(&self, frame_size: (u32, u32), landmarks: &LandmarkSet) -> Result<Pose> {
        let selected = landmarks
            .select(&POSE_LANDMARK_INDICES)
            .ok_or(Error::InsufficientLandmarks {
                required: POSE_LANDMARK_INDICES.len(),
                available: POSE_LANDMARK_INDICES.iter().filter(|&&i| i < landmarks.len()).count(),
            })?;
        let image_points: Vec<Point2<f64>> = selected
            .iter()
            .map(|p| Point2::new(f64::from(p.x), f64::from(p.y)))
            .collect();
        self.estimate(frame_size, &image_points)
    }

    /// Estimate the face pose from the 2D pixels of the model points
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than 6 finite points are given (`InsufficientLandmarks`)
    /// - More points than the model has are given (`InvalidInput`)
    /// - The configuration is degenerate or the solve does not converge (`PoseSolveFailed`)
    pub fn estimate(&self, frame_size: (u32, u32), image_points: &[Point2<f64>]) -> Result<Pose> {
        let required = self.model_points.len();
        let valid = image_points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .count();
        if valid < required {
            return Err(Error::InsufficientLandmarks {
                required,
                available: valid,
            });
        }
        if image_points.len() != required {
            return Err(Error::InvalidInput(format!(
                "Expected {required} image points, got {}",
                image_points.len()
            )));
        }
        if frame_size.0 == 0 || frame_size.1 == 0 {
            return Err(Error::InvalidInput("Frame size must be non-zero".to_string()));
        }

        Self::check_spread(image_points)?;

        let intrinsics = CameraIntrinsics::from_frame_size(frame_size.0, frame_size.1);
        let normalized: Vec<Point2<f64>> = image_points.iter().map(|p| intrinsics.normalize(p)).collect();

        // The minimal linear solve fits pixel noise exactly and can place part
        // of the face behind the camera, so a frontal seed is always refined too
        let mut seeds = Vec::with_capacity(2);
        seeds.extend(self.initial_guess(&normalized)?);
        seeds.push(self.frontal_guess(image_points, &intrinsics)?);

        let mut best: Option<(Pose, f64)> = None;
        let mut last_error = None;
        for seed in seeds {
            match self.refine(seed, image_points, &intrinsics) {
                Ok((pose, cost)) => {
                    if best.as_ref().map_or(true, |(_, best_cost)| cost < *best_cost) {
                        best = Some((pose, cost));
                    }
                }
                Err(e) => last_error = Some(e),
            }
        }
        let pose = match (best, last_error) {
            (Some((pose, _)), _) => pose,
            (None, Some(e)) => return Err(e),
            (None, None) => return Err(Error::PoseSolveFailed("no initial estimate".to_string())),
        };

        let finite = pose.rotation.iter().chain(pose.translation.iter()).all(|v| v.is_finite());
        if !finite {
            return Err(Error::PoseSolveFailed("non-finite pose".to_string()));
        }
        if pose.translation.z <= 0.0 {
            return Err(Error::PoseSolveFailed("face lies behind the camera".to_string()));
        }
        Ok(pose)
    }

    /// Reject collinear or coincident image points
    fn check_spread(points: &[Point2<f64>]) -> Result<()> {
        #[allow(clippy::cast_precision_loss)]
        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for p in points {
            let (dx, dy) = (p.x - mean_x, p.y - mean_y);
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        let trace = sxx + syy;
        let det = sxx * syy - sxy * sxy;
        let disc = (trace * trace - 4.0 * det).max(0.0).sqrt();
        let largest = (trace + disc) / 2.0;
        let smallest = (trace - disc) / 2.0;

        if largest <= EPSILON || smallest <= DEGENERACY_TOLERANCE * largest {
            return Err(Error::PoseSolveFailed("image points are collinear".to_string()));
        }
        Ok(())
    }

    /// Direct linear estimate from normalised image coordinates
    ///
    /// `None` if the estimate is unusable as a seed: no scale, non-finite, or
    /// with model points behind the camera.
    fn initial_guess(&self, normalized: &[Point2<f64>]) -> Result<Option<Pose>> {
        let n = self.model_points.len();
        let mut system = DMatrix::<f64>::zeros(2 * n, 12);
        for (i, (object, image)) in self.model_points.iter().zip(normalized).enumerate() {
            let homogeneous = [object.x, object.y, object.z, 1.0];
            for (k, &value) in homogeneous.iter().enumerate() {
                system[(2 * i, k)] = value;
                system[(2 * i, 8 + k)] = -image.x * value;
                system[(2 * i + 1, 4 + k)] = value;
                system[(2 * i + 1, 8 + k)] = -image.y * value;
            }
        }

        let svd = system.svd(false, true);
        let v_t = svd
            .v_t
            .ok_or_else(|| Error::PoseSolveFailed("SVD of the linear system failed".to_string()))?;

        let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
        order.sort_by(|&a, &b| svd.singular_values[a].total_cmp(&svd.singular_values[b]));
        let smallest = order[0];
        let second = svd.singular_values[order[1]];
        let largest = svd.singular_values[order[order.len() - 1]];
        if largest <= EPSILON || second <= DEGENERACY_TOLERANCE * largest {
            return Err(Error::PoseSolveFailed("degenerate point configuration".to_string()));
        }

        let p = v_t.row(smallest);
        let mut m = Matrix3::new(p[0], p[1], p[2], p[4], p[5], p[6], p[8], p[9], p[10]);
        let mut t = Vector3::new(p[3], p[7], p[11]);
        if m.determinant() < 0.0 {
            m = -m;
            t = -t;
        }

        let block = m.svd(true, true);
        let (u, v_t) = block
            .u
            .zip(block.v_t)
            .ok_or_else(|| Error::PoseSolveFailed("SVD of the rotation block failed".to_string()))?;
        let scale = block.singular_values.sum() / 3.0;
        if !scale.is_finite() || scale <= EPSILON {
            log::trace!("Linear PnP seed has no projection scale");
            return Ok(None);
        }

        // Quaternion axis-angle stays finite for rotations near the identity
        let rotation = Rotation3::from_matrix_unchecked(u * v_t);
        let seed = Pose::new(UnitQuaternion::from_rotation_matrix(&rotation).scaled_axis(), t / scale);

        let finite = seed.rotation.iter().chain(seed.translation.iter()).all(|v| v.is_finite());
        if !finite || self.model_points.iter().any(|p| seed.transform(p).z <= EPSILON) {
            log::trace!("Linear PnP seed unusable: {seed:?}");
            return Ok(None);
        }
        Ok(Some(seed))
    }

    /// Face looking straight at the camera, at the depth that matches its image size
    fn frontal_guess(&self, image_points: &[Point2<f64>], intrinsics: &CameraIntrinsics) -> Result<Pose> {
        #[allow(clippy::cast_precision_loss)]
        let n = self.model_points.len() as f64;
        let model_center = self.model_points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / n;
        let image_center = image_points.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords) / n;

        let model_spread = self
            .model_points
            .iter()
            .map(|p| (p.coords.xy() - model_center.xy()).norm_squared())
            .sum::<f64>()
            .sqrt();
        let image_spread = image_points
            .iter()
            .map(|p| (p.coords - image_center).norm_squared())
            .sum::<f64>()
            .sqrt();
        if model_spread <= EPSILON || image_spread <= EPSILON {
            return Err(Error::PoseSolveFailed("no spread to estimate depth from".to_string()));
        }

        let depth = intrinsics.fx * model_spread / image_spread;
        let translation = Vector3::new(
            (image_center.x - intrinsics.cx) / intrinsics.fx * depth - model_center.x,
            (image_center.y - intrinsics.cy) / intrinsics.fy * depth - model_center.y,
            depth - model_center.z,
        );
        Ok(Pose::new(Vector3::zeros(), translation))
    }

    fn residuals(&self, params: &DVector<f64>, image_points: &[Point2<f64>], intrinsics: &CameraIntrinsics) -> Option<DVector<f64>> {
        let pose = params_to_pose(params);
        let rotation = pose.rotation_matrix();
        let mut residuals = DVector::zeros(2 * image_points.len());
        for (i, (object, observed)) in self.model_points.iter().zip(image_points).enumerate() {
            let projected = intrinsics.project(&(rotation * object + pose.translation))?;
            residuals[2 * i] = projected.x - observed.x;
            residuals[2 * i + 1] = projected.y - observed.y;
        }
        Some(residuals)
    }

    fn jacobian(&self, params: &DVector<f64>, image_points: &[Point2<f64>], intrinsics: &CameraIntrinsics) -> Option<DMatrix<f64>> {
        let mut jacobian = DMatrix::zeros(2 * image_points.len(), params.len());
        for j in 0..params.len() {
            let step = 1e-7 * params[j].abs().max(1.0);
            let mut forward = params.clone();
            forward[j] += step;
            let mut backward = params.clone();
            backward[j] -= step;
            let diff = (self.residuals(&forward, image_points, intrinsics)?
                - self.residuals(&backward, image_points, intrinsics)?)
                / (2.0 * step);
            jacobian.set_column(j, &diff);
        }
        Some(jacobian)
    }

    /// Levenberg-Marquardt refinement of the reprojection error in pixels
    ///
    /// Returns the refined pose with its squared reprojection error.
    fn refine(&self, initial: Pose, image_points: &[Point2<f64>], intrinsics: &CameraIntrinsics) -> Result<(Pose, f64)> {
        let mut params = pose_to_params(&initial);
        let mut residual = self
            .residuals(&params, image_points, intrinsics)
            .ok_or_else(|| Error::PoseSolveFailed("initial estimate is behind the camera".to_string()))?;
        let mut cost = residual.norm_squared();
        if !cost.is_finite() {
            return Err(Error::PoseSolveFailed("non-finite reprojection error".to_string()));
        }
        let mut lambda = 1e-3;
        let mut converged = cost < 1e-18;

        let mut iteration = 0;
        while !converged && iteration < self.max_iterations {
            iteration += 1;

            let jacobian = self
                .jacobian(&params, image_points, intrinsics)
                .ok_or_else(|| Error::PoseSolveFailed("model point crossed the camera plane".to_string()))?;
            let jt = jacobian.transpose();
            let hessian = &jt * &jacobian;
            let gradient = &jt * &residual;
            if !gradient.iter().all(|g| g.is_finite()) {
                return Err(Error::PoseSolveFailed("non-finite Jacobian".to_string()));
            }
            if gradient.amax() < 1e-12 {
                converged = true;
                break;
            }

            let mut damped = hessian.clone();
            for k in 0..damped.nrows() {
                damped[(k, k)] += lambda * hessian[(k, k)].max(1e-12);
            }

            let candidate = damped
                .lu()
                .solve(&(-&gradient))
                .map(|step| (&params + &step, step.norm()));

            match candidate {
                Some((next, step_norm)) => match self.residuals(&next, image_points, intrinsics) {
                    Some(next_residual) if next_residual.norm_squared() < cost => {
                        let next_cost = next_residual.norm_squared();
                        let improvement = cost - next_cost;
                        params = next;
                        residual = next_residual;
                        cost = next_cost;
                        lambda = (lambda * 0.1).max(1e-12);
                        converged = cost < 1e-18
                            || step_norm <= 1e-10 * (1.0 + params.norm())
                            || improvement <= 1e-12 * cost;
                    }
                    _ => lambda *= 10.0,
                },
                None => lambda *= 10.0,
            }

            // No descent direction left: local minimum within numeric precision
            if lambda > 1e10 {
                converged = true;
            }
        }

        if !converged {
            return Err(Error::PoseSolveFailed(format!(
                "no convergence after {} iterations",
                self.max_iterations
            )));
        }

        log::trace!("PnP converged after {iteration} iterations, cost {cost:.3e}");
        Ok((params_to_pose(&params), cost))
    }
}

fn pose_to_params(pose: &Pose) -> DVector<f64> {
    DVector::from_iterator(6, pose.rotation.iter().chain(pose.translation.iter()).copied())
}

fn params_to_pose(params: &DVector<f64>) -> Pose {
    Pose::new(
        Vector3::new(params[0], params[1], params[2]),
        Vector3::new(params[3], params[4], params[5]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_points(pose: &Pose, size: (u32, u32)) -> Vec<Point2<f64>> {
        let estimator = PoseEstimator::new();
        let intrinsics = CameraIntrinsics::from_frame_size(size.0, size.1);
        project_points(estimator.model_points(), pose, &intrinsics)
            .into_iter()
            .map(|p| p.unwrap())
            .collect()
    }

    #[test]
    fn test_camera_intrinsics() {
        let k = CameraIntrinsics::from_frame_size(640, 480);
        assert_eq!(k.fx, 640.0);
        assert_eq!(k.fy, 640.0);
        assert_eq!(k.cx, 320.0);
        assert_eq!(k.cy, 240.0);
        assert_eq!(k.matrix()[(2, 2)], 1.0);
        assert!(k.project(&Point3::new(0.0, 0.0, -1.0)).is_none());
        let p = k.project(&Point3::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(p, Point2::new(320.0, 240.0));
    }

    #[test]
    fn test_euler_angle_conversion() {
        let angles = rotation_matrix_to_euler(&Matrix3::identity());
        assert!(angles[0].abs() < 1e-9);
        assert!(angles[1].abs() < 1e-9);
        assert!(angles[2].abs() < 1e-9);

        let yaw = Pose::new(Vector3::new(0.0, 30f64.to_radians(), 0.0), Vector3::zeros());
        let angles = yaw.euler_degrees();
        assert!((angles[1] - 30.0).abs() < 1e-9);
        assert!(angles[0].abs() < 1e-9);
    }

    #[test]
    fn test_parse_model_points() {
        let values: Vec<String> = (0..18).map(|i| format!("{i}.0")).collect();
        let points = PoseEstimator::parse_model_points(&values.join("\n")).unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points[1], Point3::new(3.0, 4.0, 5.0));

        assert!(PoseEstimator::parse_model_points("1.0\n2.0\n3.0").is_err());
        assert!(PoseEstimator::parse_model_points("").is_err());
    }

    #[test]
    fn test_recovers_synthetic_pose() {
        let truth = Pose::new(Vector3::new(0.1, -0.2, 0.05), Vector3::new(0.1, -0.05, 5.0));
        let points = synthetic_points(&truth, (640, 480));

        let pose = PoseEstimator::new().estimate((640, 480), &points).unwrap();
        assert!((pose.rotation - truth.rotation).norm() < 1e-6, "{pose:?}");
        assert!((pose.translation - truth.translation).norm() < 1e-6, "{pose:?}");
    }

    #[test]
    fn test_recovers_frontal_pose_from_exact_points() {
        for translation in [
            Vector3::new(0.0, 0.0, 3.0),
            Vector3::new(0.5, -0.3, 6.0),
            Vector3::new(0.0, 0.0, 12.0),
        ] {
            let truth = Pose::new(Vector3::zeros(), translation);
            let points = synthetic_points(&truth, (640, 480));

            let pose = PoseEstimator::new().estimate((640, 480), &points).unwrap();
            assert!(pose.rotation.norm() < 1e-6, "{pose:?}");
            assert!((pose.translation - translation).norm() < 1e-6, "{pose:?}");
        }
    }

    #[test]
    fn test_linear_seed_is_finite_near_identity() {
        let truth = Pose::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 3.0));
        let points = synthetic_points(&truth, (640, 480));
        let intrinsics = CameraIntrinsics::from_frame_size(640, 480);
        let normalized: Vec<Point2<f64>> = points.iter().map(|p| intrinsics.normalize(p)).collect();

        let seed = PoseEstimator::new().initial_guess(&normalized).unwrap().unwrap();
        assert!(seed.rotation.iter().all(|v| v.is_finite()), "{seed:?}");
        assert!(seed.rotation.norm() < 1e-6);
    }

    #[test]
    fn test_frontal_seed_depth() {
        let truth = Pose::new(Vector3::zeros(), Vector3::new(0.2, 0.1, 5.0));
        let points = synthetic_points(&truth, (640, 480));
        let intrinsics = CameraIntrinsics::from_frame_size(640, 480);

        let seed = PoseEstimator::new().frontal_guess(&points, &intrinsics).unwrap();
        assert_eq!(seed.rotation, Vector3::zeros());
        assert!((seed.translation.z - 5.0).abs() < 1.0, "{seed:?}");
    }

    #[test]
    fn test_insufficient_points() {
        let points = vec![Point2::new(10.0, 10.0); 5];
        match PoseEstimator::new().estimate((640, 480), &points) {
            Err(Error::InsufficientLandmarks { required, available }) => {
                assert_eq!(required, 6);
                assert_eq!(available, 5);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_points_count_as_missing() {
        let truth = Pose::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 4.0));
        let mut points = synthetic_points(&truth, (640, 480));
        points[3].x = f64::NAN;
        assert!(matches!(
            PoseEstimator::new().estimate((640, 480), &points),
            Err(Error::InsufficientLandmarks { available: 5, .. })
        ));
    }

    #[test]
    fn test_collinear_points_fail() {
        let points: Vec<Point2<f64>> = (0..6).map(|i| Point2::new(100.0 + 10.0 * f64::from(i), 200.0 + 5.0 * f64::from(i))).collect();
        assert!(matches!(
            PoseEstimator::new().estimate((640, 480), &points),
            Err(Error::PoseSolveFailed(_))
        ));
    }
}
