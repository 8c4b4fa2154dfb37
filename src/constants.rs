//! Constants used throughout the application

/// Number of landmarks produced by the face mesh model
pub const NUM_FACE_MESH_LANDMARKS: usize = 468;

/// Face mesh index of the left eye outer corner
pub const LEFT_EYE_OUTER: usize = 33;
/// Face mesh index of the right eye outer corner
pub const RIGHT_EYE_OUTER: usize = 263;
/// Face mesh index of the nose tip
pub const NOSE_TIP: usize = 1;
/// Face mesh index of the left mouth corner
pub const MOUTH_LEFT: usize = 61;
/// Face mesh index of the right mouth corner
pub const MOUTH_RIGHT: usize = 291;
/// Face mesh index of the chin
pub const CHIN: usize = 199;

/// Landmarks used for the pose solve, in canonical model order
pub const POSE_LANDMARK_INDICES: [usize; 6] = [LEFT_EYE_OUTER, RIGHT_EYE_OUTER, NOSE_TIP, MOUTH_LEFT, MOUTH_RIGHT, CHIN];

/// Canonical 3D face points (relative units) matching `POSE_LANDMARK_INDICES`
pub const CANONICAL_FACE_POINTS: [[f64; 3]; 6] = [
    [-0.5, -0.3, 0.0],
    [0.5, -0.3, 0.0],
    [0.0, 0.0, 0.5],
    [-0.3, 0.4, 0.2],
    [0.3, 0.4, 0.2],
    [0.0, 0.8, 0.3],
];

/// Total number of values in a 3D face model file (6 points × 3 dimensions)
pub const MODEL_POINTS_TOTAL_VALUES: usize = 18;

/// Camera matrix center factor
pub const CAMERA_CENTER_FACTOR: f64 = 2.0;

/// Placement scale bounds
pub const SCALE_MIN: f64 = 0.1;
pub const SCALE_MAX: f64 = 2.0;

/// Default scale for face-box overlays
pub const DEFAULT_OVERLAY_SCALE: f64 = 1.2;

/// Side of the pseudo box centred on the nose tip
pub const NOSE_BOX_SIZE: i32 = 40;

/// Mustache width relative to the mouth corner distance
pub const MUSTACHE_WIDTH_FACTOR: f64 = 1.5;

/// Mustache width when the mouth corners are not available
pub const MUSTACHE_FALLBACK_WIDTH: i32 = 80;

/// Default opacity of the pose axes layer
pub const DEFAULT_AXES_ALPHA: f64 = 0.6;

/// Default axis length in model units
pub const DEFAULT_AXIS_LENGTH: f64 = 1.0;

/// Pose axes line thickness in pixels
pub const AXIS_THICKNESS: i32 = 3;

/// Levenberg-Marquardt iteration budget
pub const PNP_MAX_ITERATIONS: usize = 100;

/// Relative singular value below which a system is treated as degenerate
pub const DEGENERACY_TOLERANCE: f64 = 1e-9;

/// Offset step applied by the nudge keys, in pixels
pub const OFFSET_STEP: i32 = 2;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
