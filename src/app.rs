//! Main application module for the AR face filter loop.

use crate::{
    config::{Config, ModelConfig, SourceConfig},
    constants::OFFSET_STEP,
    error::Result,
    face_detection::{FaceDetector, NullFaceDetector},
    filters::{Detections, FilterRegistry},
    frame_source::{DirectorySink, FrameSink, FrameSource, FrameStats, ImageDirSource, Key},
    mark_detection::{LandmarkProvider, LandmarkSet, NullLandmarkProvider},
    utils::{draw_face_boxes, draw_landmarks},
    Frame,
};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Debug overlays that can be switched on and off while running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayToggles {
    /// Detector face rectangles
    pub show_boxes: bool,
    /// Landmark points
    pub show_mesh: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            show_boxes: true,
            show_mesh: false,
        }
    }
}

/// Main application struct
pub struct ArApp {
    source: Box<dyn FrameSource>,
    face_detector: Box<dyn FaceDetector>,
    landmark_provider: Box<dyn LandmarkProvider>,
    registry: FilterRegistry,
    sink: Box<dyn FrameSink>,
    display: DisplayToggles,
    selected: Option<String>,
    frame_index: u64,
}

impl ArApp {
    #[must_use]
    pub fn new(
        source: Box<dyn FrameSource>,
        face_detector: Box<dyn FaceDetector>,
        landmark_provider: Box<dyn LandmarkProvider>,
        registry: FilterRegistry,
        sink: Box<dyn FrameSink>,
    ) -> Self {
        info!(
            "Pipeline: source={}, detector={}, landmarks={}",
            source.name(),
            face_detector.name(),
            landmark_provider.name()
        );
        if !face_detector.available() {
            warn!("Face detector unavailable: face box filters will render nothing");
        }
        if !landmark_provider.available() {
            warn!("Landmark provider unavailable: pose and landmark filters will render nothing");
        }
        let selected = registry.names().first().map(|name| (*name).to_string());
        Self {
            source,
            face_detector,
            landmark_provider,
            registry,
            sink,
            display: DisplayToggles::default(),
            selected,
            frame_index: 0,
        }
    }

    /// Build the whole pipeline from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the source/sink cannot be opened
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = config.build_registry()?;
        registry.log_summary();
        let source = open_source(&config.source)?;
        let sink = open_sink(config)?;
        Ok(Self::new(
            source,
            build_face_detector(&config.models),
            build_landmark_provider(&config.models),
            registry,
            sink,
        )
        .with_display(DisplayToggles {
            show_boxes: config.display.show_boxes,
            show_mesh: config.display.show_mesh,
        }))
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayToggles) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn display(&self) -> DisplayToggles {
        self.display
    }

    #[must_use]
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FilterRegistry {
        &mut self.registry
    }

    /// Name of the unit targeted by per-unit key commands
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Detect, composite and decorate one frame in place
    pub fn process_frame(&mut self, frame: &mut Frame) -> FrameStats {
        let faces = if self.face_detector.available() {
            match self.face_detector.detect(frame) {
                Ok(faces) => faces,
                Err(e) => {
                    warn!("Face detection failed: {e}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let landmarks = if self.landmark_provider.available() {
            match self.landmark_provider.detect(frame, &faces) {
                Ok(landmarks) => landmarks,
                Err(e) => {
                    warn!("Landmark detection failed: {e}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let detections = Detections { faces, landmarks };
        let filters_applied = self.registry.apply(frame, &detections);

        if self.display.show_boxes {
            draw_face_boxes(frame, &detections.faces);
        }
        if self.display.show_mesh {
            draw_landmarks(frame, &detections.landmarks);
        }

        let stats = FrameStats {
            frame_index: self.frame_index,
            faces: detections.faces.len(),
            landmarks: detections.landmarks.len(),
            landmark_points: detections.landmarks.first().map_or(0, LandmarkSet::len),
            filters_applied,
            fps: 0.0,
        };
        self.frame_index += 1;
        stats
    }

    /// Apply a key command; returns false when the loop should stop
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Quit => {
                info!("Exit requested by user");
                return false;
            }
            Key::ToggleMesh => {
                self.display.show_mesh = !self.display.show_mesh;
                info!("Mesh display {}", on_off(self.display.show_mesh));
            }
            Key::ToggleBoxes => {
                self.display.show_boxes = !self.display.show_boxes;
                info!("Face boxes {}", on_off(self.display.show_boxes));
            }
            Key::ToggleNose => {
                let nose = self
                    .registry
                    .iter()
                    .find(|unit| unit.kind().is_nose_tip())
                    .map(|unit| unit.name().to_string());
                match nose {
                    Some(name) => {
                        if let Some(enabled) = self.registry.toggle(&name) {
                            info!("{name} {}", on_off(enabled));
                        }
                    }
                    None => debug!("No nose filter registered"),
                }
            }
            Key::SelectNext => self.select_next(),
            Key::ToggleSelected => {
                if let Some(name) = self.selected.clone() {
                    if let Some(enabled) = self.registry.toggle(&name) {
                        info!("{name} {}", on_off(enabled));
                    }
                }
            }
            Key::NextAsset => {
                if let Some(name) = self.selected.as_deref() {
                    if self.registry.next_asset(name).is_none() {
                        debug!("{name} has no asset variants");
                    }
                }
            }
            Key::Nudge { dx, dy } => {
                if let Some(name) = self.selected.as_deref() {
                    if let Some(unit) = self.registry.get_mut(name) {
                        unit.kind_mut().adjust_offset(dx * OFFSET_STEP, dy * OFFSET_STEP);
                    }
                }
            }
            Key::RaiseOrder => self.shift_selected_order(1),
            Key::LowerOrder => self.shift_selected_order(-1),
        }
        true
    }

    fn select_next(&mut self) {
        let names = self.registry.names();
        if names.is_empty() {
            self.selected = None;
            return;
        }
        let next = self
            .selected
            .as_deref()
            .and_then(|current| names.iter().position(|name| *name == current))
            .map_or(0, |i| (i + 1) % names.len());
        let name = names[next].to_string();
        info!("Selected filter: {name}");
        self.selected = Some(name);
    }

    fn shift_selected_order(&mut self, delta: i32) {
        let Some(name) = self.selected.as_deref() else {
            return;
        };
        if let Some(order) = self.registry.get(name).map(|unit| unit.draw_order()) {
            let new_order = order.saturating_add(delta);
            self.registry.move_to(name, new_order);
            info!("{name} moved to z={new_order}");
        }
    }

    /// Run the main loop until the stream ends, the user quits, or the source fails
    ///
    /// Returns the number of frames processed.
    ///
    /// # Errors
    ///
    /// Returns the source or sink error that ended the loop
    pub fn run(&mut self) -> Result<u64> {
        info!("Starting main application loop");
        let result = self.run_loop();
        self.source.release();
        self.sink.close();
        info!("Application shutting down");
        result
    }

    #[allow(clippy::cast_precision_loss)]
    fn run_loop(&mut self) -> Result<u64> {
        let mut frame_count: u64 = 0;
        let start_time = Instant::now();
        let mut last_fps_update = Instant::now();
        let mut fps = 0.0;

        loop {
            let Some(mut frame) = self.source.read()? else {
                info!("End of stream reached");
                break;
            };

            let mut stats = self.process_frame(&mut frame);

            frame_count += 1;
            if last_fps_update.elapsed() >= Duration::from_secs(1) {
                fps = frame_count as f64 / start_time.elapsed().as_secs_f64();
                last_fps_update = Instant::now();
            }
            stats.fps = fps;

            if let Some(key) = self.sink.present(&frame, &stats)? {
                if !self.handle_key(key) {
                    break;
                }
            }
        }

        Ok(frame_count)
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Haar detector when available, otherwise the null detector
#[must_use]
pub fn build_face_detector(models: &ModelConfig) -> Box<dyn FaceDetector> {
    #[cfg(feature = "camera")]
    {
        match crate::face_detection::HaarFaceDetector::new(&models.face_cascades) {
            Ok(detector) => return Box::new(detector),
            Err(e) => warn!("{e}"),
        }
    }
    #[cfg(not(feature = "camera"))]
    {
        debug!(
            "Built without camera support; ignoring {} cascade path(s)",
            models.face_cascades.len()
        );
    }
    Box::new(NullFaceDetector)
}

/// Face mesh provider when available, otherwise the null provider
#[must_use]
pub fn build_landmark_provider(models: &ModelConfig) -> Box<dyn LandmarkProvider> {
    #[cfg(feature = "onnx")]
    {
        if models.face_mesh.exists() {
            match crate::mark_detection::FaceMeshDetector::new(&models.face_mesh) {
                Ok(provider) => return Box::new(provider),
                Err(e) => warn!("Failed to load face mesh model: {e}"),
            }
        } else {
            warn!("Face mesh model not found: {}", models.face_mesh.display());
        }
    }
    #[cfg(not(feature = "onnx"))]
    {
        debug!(
            "Built without ONNX support; ignoring {}",
            models.face_mesh.display()
        );
    }
    Box::new(NullLandmarkProvider)
}

/// Image directory when configured, otherwise the camera
///
/// # Errors
///
/// Returns an error if the source cannot be opened
pub fn open_source(source: &SourceConfig) -> Result<Box<dyn FrameSource>> {
    if let Some(dir) = &source.input_dir {
        return Ok(Box::new(ImageDirSource::new(dir)?));
    }
    #[cfg(feature = "camera")]
    {
        Ok(Box::new(crate::frame_source::CameraSource::new(
            source.camera,
            source.resolution,
        )?))
    }
    #[cfg(not(feature = "camera"))]
    {
        Err(crate::Error::ConfigError(format!(
            "Camera {} requested but built without camera support; use --input-dir",
            source.camera
        )))
    }
}

/// PNG directory when configured, otherwise a window
///
/// # Errors
///
/// Returns an error if the sink cannot be opened
pub fn open_sink(config: &Config) -> Result<Box<dyn FrameSink>> {
    if let Some(dir) = &config.source.output_dir {
        return Ok(Box::new(DirectorySink::new(dir)?));
    }
    #[cfg(feature = "camera")]
    {
        Ok(Box::new(crate::frame_source::WindowSink::new(
            &config.display.window_title,
            config.display.show_hud,
        )?))
    }
    #[cfg(not(feature = "camera"))]
    {
        Err(crate::Error::ConfigError(
            "No window support in this build; use --output-dir".to_string(),
        ))
    }
}
