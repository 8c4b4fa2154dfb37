//! Real-time augmented-reality face filters.
//!
//! This library composites 2D overlays and pose-tracked 3D axes onto video
//! frames using:
//! - A face detector producing face boxes (Haar cascade with the `camera` feature)
//! - A landmark provider producing 468-point face meshes (ONNX with the `onnx` feature)
//! - A perspective-n-point solver for head pose
//! - An alpha compositor and an ordered filter registry
//!
//! The frame pipeline consists of:
//! 1. Face detection to locate faces in the frame
//! 2. Landmark detection inside each face box
//! 3. 2D placement from boxes/landmarks, or 3D pose from landmarks
//! 4. Rendering of every enabled filter in draw order
//!
//! # Examples
//!
//! ## Compositing an overlay
//!
//! ```no_run
//! use ar_face_filters::{assets::load_overlay, compositor::blend, placement::Placement,
//!                       face_detection::BoundingBox, Frame};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut frame: Frame = image::open("face.jpg")?.into_rgb8();
//! let glasses = load_overlay("assets/sunglasses.png")?;
//!
//! let placement = Placement::new(1.2)?;
//! let face = BoundingBox::new(200, 150, 180, 180);
//! if let Some(rect) = placement.place(face, glasses.dimensions()) {
//!     if let Some(scaled) = glasses.resized(rect.width, rect.height) {
//!         blend(&mut frame, &scaled, rect.x, rect.y);
//!     }
//! }
//! frame.save("out.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Estimating head pose
//!
//! ```no_run
//! use ar_face_filters::{mark_detection::LandmarkSet, pose_estimation::PoseEstimator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let estimator = PoseEstimator::new();
//! # let landmarks = LandmarkSet::default();
//! let pose = estimator.estimate_from_landmarks((640, 480), &landmarks)?;
//! let euler = pose.euler_degrees();
//! println!("Pitch: {:.2}°, Yaw: {:.2}°, Roll: {:.2}°", euler[0], euler[1], euler[2]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Running a filter registry
//!
//! ```no_run
//! use ar_face_filters::{config::Config, filters::Detections, Frame};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::example()?;
//! let mut registry = config.build_registry()?;
//! registry.toggle("red_nose");
//!
//! let mut frame = Frame::new(640, 480);
//! let applied = registry.apply(&mut frame, &Detections::default());
//! println!("{applied} filters applied");
//! # Ok(())
//! # }
//! ```

/// Face bounding boxes and detectors
pub mod face_detection;

/// Facial landmark sets and providers
pub mod mark_detection;

/// Head pose estimation using `PnP` (Perspective-n-Point)
pub mod pose_estimation;

/// Overlay images and multi-variant assets
pub mod assets;

/// Alpha compositing onto frames
pub mod compositor;

/// Overlay size and position from boxes and landmarks
pub mod placement;

/// Filter units and the ordered filter registry
pub mod filters;

/// Frame sources and sinks
pub mod frame_source;

/// Utility functions for geometry and debug drawing
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};

/// Video frame: 8-bit RGB pixels, mutated in place by the pipeline
pub type Frame = image::RgbImage;
