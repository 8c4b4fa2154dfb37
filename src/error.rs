//! Error types for the AR face filter pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[cfg(feature = "camera")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// A detection or landmark capability is missing or failed to initialise
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Not enough landmarks to run the pose solve
    #[error("Insufficient landmarks: need {required}, got {available}")]
    InsufficientLandmarks {
        /// Number of points the solve needs
        required: usize,
        /// Number of points that were usable
        available: usize,
    },

    /// The perspective-n-point solve did not produce a usable pose
    #[error("Pose solve failed: {0}")]
    PoseSolveFailed(String),

    /// Placement scale outside the accepted range
    #[error("Invalid scale {scale}: must be within [{min}, {max}]")]
    InvalidScale {
        /// Rejected value
        scale: f64,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// An overlay asset could not be read or decoded
    #[error("Failed to load asset {}: {reason}", path.display())]
    AssetLoadFailed {
        /// Path of the asset
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// The frame source could not deliver a frame
    #[error("Frame read failed: {0}")]
    FrameReadFailed(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether the error only affects the current frame and the loop can go on
    #[must_use]
    pub fn is_per_frame(&self) -> bool {
        matches!(
            self,
            Self::InsufficientLandmarks { .. } | Self::PoseSolveFailed(_) | Self::ProviderUnavailable(_)
        )
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
