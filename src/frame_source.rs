//! Frame sources and sinks around the processing loop.

use crate::{Error, Frame, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Image file extensions read by [`ImageDirSource`]
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tiff"];

/// Keyboard command read from a sink between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    ToggleMesh,
    ToggleBoxes,
    ToggleNose,
    SelectNext,
    ToggleSelected,
    NextAsset,
    /// Move the selected overlay by the given number of steps
    Nudge { dx: i32, dy: i32 },
    RaiseOrder,
    LowerOrder,
}

impl Key {
    /// Map a raw key code (as returned by a window toolkit) to a command
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        if code < 0 {
            return None;
        }
        let key = match u8::try_from(code & 0xFF).ok()? {
            27 | b'q' => Self::Quit,
            b'm' => Self::ToggleMesh,
            b'f' => Self::ToggleBoxes,
            b'n' => Self::ToggleNose,
            b'\t' => Self::SelectNext,
            b't' => Self::ToggleSelected,
            b'c' => Self::NextAsset,
            b'i' => Self::Nudge { dx: 0, dy: -1 },
            b'k' => Self::Nudge { dx: 0, dy: 1 },
            b'j' => Self::Nudge { dx: -1, dy: 0 },
            b'l' => Self::Nudge { dx: 1, dy: 0 },
            b'+' | b'=' => Self::RaiseOrder,
            b'-' => Self::LowerOrder,
            _ => return None,
        };
        Some(key)
    }
}

/// Per-frame numbers shown alongside the output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frame_index: u64,
    pub faces: usize,
    /// Faces with a landmark set
    pub landmarks: usize,
    /// Points in the first landmark set
    pub landmark_points: usize,
    pub filters_applied: usize,
    pub fps: f64,
}

impl FrameStats {
    /// Heads-up display line
    #[must_use]
    pub fn hud_text(&self) -> String {
        format!("faces:{} landmarks:{}", self.faces, self.landmark_points)
    }
}

/// Where frames come from
pub trait FrameSource {
    /// Next frame, or `None` at the end of the stream
    ///
    /// # Errors
    ///
    /// Returns `FrameReadFailed` if the source cannot deliver a frame
    fn read(&mut self) -> Result<Option<Frame>>;

    /// Release the underlying device
    fn release(&mut self) {}

    fn name(&self) -> &str;
}

/// Where processed frames go
pub trait FrameSink {
    /// Show or store a frame; returns a key command if one was pressed
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be presented
    fn present(&mut self, frame: &Frame, stats: &FrameStats) -> Result<Option<Key>>;

    fn close(&mut self) {}
}

/// Still images of a directory, read in file name order
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageDirSource {
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed or holds no images
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_image_extension(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(Error::FrameReadFailed(format!("No images found in {}", dir.display())));
        }
        log::info!("Reading {} images from {}", paths.len(), dir.display());
        Ok(Self { paths, next: 0 })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

impl FrameSource for ImageDirSource {
    fn read(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let image = image::open(path)
            .map_err(|e| Error::FrameReadFailed(format!("{}: {e}", path.display())))?;
        log::debug!("Read frame {}", path.display());
        Ok(Some(image.into_rgb8()))
    }

    fn name(&self) -> &str {
        "ImageDirSource"
    }
}

/// Writes every frame as a numbered PNG
pub struct DirectorySink {
    dir: PathBuf,
    written: u64,
}

impl DirectorySink {
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        log::info!("Writing frames to {}", dir.display());
        Ok(Self { dir, written: 0 })
    }

    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for DirectorySink {
    fn present(&mut self, frame: &Frame, stats: &FrameStats) -> Result<Option<Key>> {
        let path = self.dir.join(format!("frame_{:05}.png", stats.frame_index));
        frame.save(&path)?;
        self.written += 1;
        log::debug!("Saved {} ({})", path.display(), stats.hud_text());
        Ok(None)
    }
}

#[cfg(feature = "camera")]
pub use camera::{CameraSource, WindowSink};

#[cfg(feature = "camera")]
mod camera {
    use super::{FrameSink, FrameSource, FrameStats, Key};
    use crate::{
        utils::image_conversion::{frame_to_mat, mat_to_frame},
        Error, Frame, Result,
    };
    use opencv::{
        core::{Mat, Point, Scalar},
        highgui::{self, WINDOW_NORMAL},
        imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
        prelude::*,
        videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
    };

    /// Webcam capture through OpenCV
    pub struct CameraSource {
        capture: VideoCapture,
        index: i32,
    }

    impl CameraSource {
        /// # Errors
        ///
        /// Returns an error if the camera cannot be opened
        pub fn new(index: i32, resolution: Option<(u32, u32)>) -> Result<Self> {
            log::info!("Opening camera {index}");
            let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
            if !capture.is_opened()? {
                return Err(Error::FrameReadFailed(format!("Could not open camera {index}")));
            }

            // Low latency: keep at most one frame queued
            capture.set(CAP_PROP_BUFFERSIZE, 1.0)?;

            if let Some((width, height)) = resolution {
                capture.set(CAP_PROP_FRAME_WIDTH, f64::from(width))?;
                capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(height))?;
                log::info!("Requested resolution {width}x{height}");
            }
            Ok(Self { capture, index })
        }
    }

    impl FrameSource for CameraSource {
        fn read(&mut self) -> Result<Option<Frame>> {
            let mut mat = Mat::default();
            if !self.capture.read(&mut mat)? {
                return Err(Error::FrameReadFailed(format!("Camera {} returned no frame", self.index)));
            }
            if mat.empty() {
                return Ok(None);
            }
            mat_to_frame(&mat).map(Some)
        }

        fn release(&mut self) {
            if let Err(e) = self.capture.release() {
                log::warn!("Failed to release camera {}: {e}", self.index);
            }
        }

        fn name(&self) -> &str {
            "CameraSource"
        }
    }

    /// OpenCV window with a text HUD
    pub struct WindowSink {
        title: String,
        show_hud: bool,
    }

    impl WindowSink {
        /// # Errors
        ///
        /// Returns an error if the window cannot be created
        pub fn new(title: &str, show_hud: bool) -> Result<Self> {
            highgui::named_window(title, WINDOW_NORMAL)?;
            Ok(Self {
                title: title.to_string(),
                show_hud,
            })
        }

        fn draw_hud(mat: &mut Mat, stats: &FrameStats) -> Result<()> {
            let green = Scalar::new(0.0, 255.0, 0.0, 0.0);
            imgproc::put_text(
                mat,
                &stats.hud_text(),
                Point::new(10, 30),
                FONT_HERSHEY_SIMPLEX,
                0.7,
                green,
                2,
                LINE_8,
                false,
            )?;
            imgproc::put_text(
                mat,
                &format!("FPS: {:.1}", stats.fps),
                Point::new(10, 60),
                FONT_HERSHEY_SIMPLEX,
                0.7,
                green,
                2,
                LINE_8,
                false,
            )?;
            Ok(())
        }
    }

    impl FrameSink for WindowSink {
        fn present(&mut self, frame: &Frame, stats: &FrameStats) -> Result<Option<Key>> {
            let mut mat = frame_to_mat(frame)?;
            if self.show_hud {
                Self::draw_hud(&mut mat, stats)?;
            }
            highgui::imshow(&self.title, &mat)?;
            Ok(Key::from_code(highgui::wait_key(1)?))
        }

        fn close(&mut self) {
            if let Err(e) = highgui::destroy_window(&self.title) {
                log::debug!("Failed to close window: {e}");
            }
        }
    }
}
