//! Configuration management for the AR face filter application

use crate::{
    assets::OverlayAsset,
    constants::{DEFAULT_AXES_ALPHA, DEFAULT_AXIS_LENGTH, DEFAULT_OVERLAY_SCALE, SCALE_MAX, SCALE_MIN},
    filters::{Anchor, FilterKind, FilterRegistry, OverlayFilter, PoseAxesFilter},
    placement::Placement,
    pose_estimation::PoseEstimator,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame source configuration
    pub source: SourceConfig,

    /// Model file paths
    pub models: ModelConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Filter units, in registration order
    pub filters: Vec<FilterEntry>,
}

/// Where frames come from and where they go
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Camera index
    pub camera: i32,

    /// Requested capture resolution `[width, height]`
    pub resolution: Option<(u32, u32)>,

    /// Read still images from this directory instead of the camera
    pub input_dir: Option<PathBuf>,

    /// Write processed frames to this directory instead of a window
    pub output_dir: Option<PathBuf>,
}

/// Model file paths configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Haar cascade XML files, tried in order
    pub face_cascades: Vec<PathBuf>,

    /// Path to the face mesh ONNX model
    pub face_mesh: PathBuf,

    /// Optional 18-value 3D face model overriding the built-in points
    pub face_model_3d: Option<PathBuf>,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub window_title: String,

    /// Draw detector face boxes
    pub show_boxes: bool,

    /// Draw landmark points
    pub show_mesh: bool,

    /// Draw the face count and FPS text
    pub show_hud: bool,
}

/// One named filter unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEntry {
    /// Unique unit name
    pub name: String,

    /// Initial state
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Draw-order key, lower values are drawn first
    #[serde(default)]
    pub z_order: i32,

    #[serde(flatten)]
    pub kind: FilterKindConfig,
}

/// Renderer-specific settings, selected by the `type` tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKindConfig {
    /// Image overlay with one or more variants
    Overlay {
        assets: Vec<PathBuf>,
        #[serde(default = "default_scale")]
        scale: f64,
        #[serde(default)]
        offset_x: i32,
        #[serde(default)]
        offset_y: i32,
        #[serde(default)]
        anchor: AnchorConfig,
    },
    /// Projected pose axes
    PoseAxes {
        #[serde(default)]
        model: Option<PathBuf>,
        #[serde(default = "default_alpha")]
        alpha: f64,
        #[serde(default = "default_axis_length")]
        axis_length: f64,
    },
}

/// Overlay anchor names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorConfig {
    #[default]
    FaceBox,
    NoseTip,
    Mustache,
}

impl From<AnchorConfig> for Anchor {
    fn from(anchor: AnchorConfig) -> Self {
        match anchor {
            AnchorConfig::FaceBox => Self::FaceBox,
            AnchorConfig::NoseTip => Self::NoseTip,
            AnchorConfig::Mustache => Self::Mustache,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_scale() -> f64 {
    DEFAULT_OVERLAY_SCALE
}

fn default_alpha() -> f64 {
    DEFAULT_AXES_ALPHA
}

fn default_axis_length() -> f64 {
    DEFAULT_AXIS_LENGTH
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_cascades: vec![
                PathBuf::from("assets/haarcascade_frontalface_default.xml"),
                PathBuf::from("/usr/share/opencv4/haarcascades/haarcascade_frontalface_default.xml"),
            ],
            face_mesh: PathBuf::from("assets/face_mesh.onnx"),
            face_model_3d: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: "AR Face Filters".to_string(),
            show_boxes: true,
            show_mesh: false,
            show_hud: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The bundled demo configuration
    ///
    /// # Errors
    ///
    /// Returns an error only if [`EXAMPLE_CONFIG`] is malformed
    pub fn example() -> Result<Self> {
        Self::from_yaml(EXAMPLE_CONFIG)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidScale` for an out-of-range overlay scale and
    /// `ConfigError` for every other invalid value
    pub fn validate(&self) -> Result<()> {
        if let Some((width, height)) = self.source.resolution {
            if width == 0 || height == 0 {
                return Err(Error::ConfigError(format!(
                    "Resolution must be positive, got {width}x{height}"
                )));
            }
        }

        for entry in &self.filters {
            if entry.name.trim().is_empty() {
                return Err(Error::ConfigError("Filter name must not be empty".to_string()));
            }
            match &entry.kind {
                FilterKindConfig::Overlay { assets, scale, .. } => {
                    if assets.is_empty() {
                        return Err(Error::ConfigError(format!(
                            "Overlay filter '{}' has no assets",
                            entry.name
                        )));
                    }
                    if !scale.is_finite() || !(SCALE_MIN..=SCALE_MAX).contains(scale) {
                        return Err(Error::InvalidScale {
                            scale: *scale,
                            min: SCALE_MIN,
                            max: SCALE_MAX,
                        });
                    }
                }
                FilterKindConfig::PoseAxes { alpha, axis_length, .. } => {
                    if !(0.0..=1.0).contains(alpha) {
                        return Err(Error::ConfigError(format!(
                            "Pose axes alpha for '{}' must be between 0.0 and 1.0",
                            entry.name
                        )));
                    }
                    if !axis_length.is_finite() || *axis_length <= 0.0 {
                        return Err(Error::ConfigError(format!(
                            "Pose axes length for '{}' must be greater than 0",
                            entry.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Pose estimator over the configured 3D face model, or the built-in one
    ///
    /// # Errors
    ///
    /// Returns an error if a configured model file is unreadable or malformed
    pub fn pose_estimator(&self) -> Result<PoseEstimator> {
        match &self.models.face_model_3d {
            Some(path) => PoseEstimator::from_file(path),
            None => Ok(PoseEstimator::new()),
        }
    }

    /// Load every filter's assets and register it
    ///
    /// Missing asset files leave their unit in place as a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn build_registry(&self) -> Result<FilterRegistry> {
        self.validate()?;
        let estimator = self.pose_estimator()?;

        let mut registry = FilterRegistry::new();
        for entry in &self.filters {
            let kind = match &entry.kind {
                FilterKindConfig::Overlay {
                    assets,
                    scale,
                    offset_x,
                    offset_y,
                    anchor,
                } => {
                    let placement = Placement::new(*scale)?.with_offset(*offset_x, *offset_y);
                    FilterKind::Overlay(OverlayFilter::new(OverlayAsset::load(assets), placement, (*anchor).into()))
                }
                FilterKindConfig::PoseAxes {
                    model,
                    alpha,
                    axis_length,
                } => FilterKind::PoseAxes(PoseAxesFilter::new(
                    estimator.clone(),
                    model.as_deref(),
                    *alpha,
                    *axis_length,
                )?),
            };
            registry.add(entry.name.clone(), kind, entry.enabled, entry.z_order);
        }
        Ok(registry)
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# AR Face Filters Configuration

# Frame source
source:
  camera: 0
  resolution: [640, 480]

# Model paths
models:
  face_cascades:
    - "assets/haarcascade_frontalface_default.xml"
    - "/usr/share/opencv4/haarcascades/haarcascade_frontalface_default.xml"
  face_mesh: "assets/face_mesh.onnx"

# Display settings
display:
  window_title: "AR Face Filters"
  show_boxes: true
  show_mesh: false
  show_hud: true

# Filters, drawn in ascending z_order
filters:
  - name: "sunglasses"
    type: overlay
    enabled: true
    z_order: 10
    assets: ["assets/sunglasses.png"]
    scale: 1.2
    anchor: face_box

  - name: "red_nose"
    type: overlay
    enabled: false
    z_order: 20
    assets: ["assets/red_dot.png"]
    scale: 1.0
    anchor: nose_tip

  - name: "mustache"
    type: overlay
    enabled: true
    z_order: 30
    assets:
      - "assets/mustache_black_classic.png"
      - "assets/mustache_brown_classic.png"
      - "assets/mustache_red_thin.png"
      - "assets/mustache_handlebar.png"
      - "assets/mustache_pencil.png"
    scale: 0.8
    offset_y: -5
    anchor: mustache

  - name: "pose_axes"
    type: pose_axes
    enabled: false
    z_order: 100
    model: "assets/cube.obj"
    alpha: 0.6
    axis_length: 1.0
"#;
