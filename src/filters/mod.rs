//! Filter units and the ordered registry that renders them.
//!
//! A filter unit is a named renderer with an enabled flag and a draw-order
//! key. The registry keeps units sorted by `(draw_order, insertion sequence)`
//! and renders every enabled unit onto the same frame in that order, so later
//! units are composited on top of earlier ones.

/// Image overlays anchored to face boxes or landmarks
pub mod overlay;

/// Projected head-pose axes
pub mod pose_axes;

pub use overlay::{Anchor, OverlayFilter};
pub use pose_axes::PoseAxesFilter;

use crate::{face_detection::BoundingBox, mark_detection::LandmarkSet, Frame};

/// Per-frame placement anchors handed to every unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    /// Face detector boxes
    pub faces: Vec<BoundingBox>,
    /// One landmark set per face found by the landmark provider
    pub landmarks: Vec<LandmarkSet>,
}

impl Detections {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.landmarks.is_empty()
    }
}

/// The renderers a unit can hold
#[derive(Debug, Clone)]
pub enum FilterKind {
    Overlay(OverlayFilter),
    PoseAxes(PoseAxesFilter),
}

impl FilterKind {
    /// Render onto `frame`; returns the number of faces decorated
    pub fn render(&self, frame: &mut Frame, detections: &Detections) -> usize {
        match self {
            Self::Overlay(filter) => filter.render(frame, detections),
            Self::PoseAxes(filter) => filter.render(frame, detections),
        }
    }

    /// Cycle to the next asset variant; `None` for units without variants
    pub fn next_asset(&mut self) -> Option<usize> {
        match self {
            Self::Overlay(filter) => filter.next_asset(),
            Self::PoseAxes(_) => None,
        }
    }

    /// Nudge the unit; returns false if it has no position to adjust
    pub fn adjust_offset(&mut self, dx: i32, dy: i32) -> bool {
        match self {
            Self::Overlay(filter) => {
                filter.adjust_offset(dx, dy);
                true
            }
            Self::PoseAxes(_) => false,
        }
    }

    /// Whether the unit is anchored on the nose tip
    #[must_use]
    pub fn is_nose_tip(&self) -> bool {
        matches!(self, Self::Overlay(filter) if filter.anchor() == Anchor::NoseTip)
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Overlay(_) => "overlay",
            Self::PoseAxes(_) => "pose_axes",
        }
    }
}

/// A named, independently enabled renderer with a draw-order key
#[derive(Debug, Clone)]
pub struct FilterUnit {
    name: String,
    kind: FilterKind,
    enabled: bool,
    draw_order: i32,
    seq: u64,
}

impl FilterUnit {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut FilterKind {
        &mut self.kind
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn draw_order(&self) -> i32 {
        self.draw_order
    }
}

/// Ordered collection of filter units, unique by name
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    units: Vec<FilterUnit>,
    next_seq: u64,
}

impl FilterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit, replacing any unit with the same name
    pub fn add(&mut self, name: impl Into<String>, kind: FilterKind, enabled: bool, draw_order: i32) {
        let name = name.into();
        if self.remove(&name) {
            log::debug!("Replacing filter '{name}'");
        }
        log::info!(
            "Filter registered: {name} ({}, z={draw_order}, {})",
            kind.kind_name(),
            if enabled { "on" } else { "off" }
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.units.push(FilterUnit {
            name,
            kind,
            enabled,
            draw_order,
            seq,
        });
        self.sort();
    }

    /// Returns false if no unit has this name
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.get_mut(name) {
            Some(unit) => {
                unit.enabled = enabled;
                log::debug!("Filter '{name}' {}", if enabled { "enabled" } else { "disabled" });
                true
            }
            None => false,
        }
    }

    /// Flip a unit on or off; returns its new state
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let unit = self.get_mut(name)?;
        unit.enabled = !unit.enabled;
        let enabled = unit.enabled;
        log::debug!("Filter '{name}' {}", if enabled { "enabled" } else { "disabled" });
        Some(enabled)
    }

    /// Change a unit's draw-order key and re-sort
    pub fn move_to(&mut self, name: &str, draw_order: i32) -> bool {
        let Some(unit) = self.get_mut(name) else {
            return false;
        };
        unit.draw_order = draw_order;
        self.sort();
        log::debug!("Filter '{name}' moved to z={draw_order}");
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.units.len();
        self.units.retain(|unit| unit.name != name);
        self.units.len() != before
    }

    /// Render every enabled unit in draw order; returns the number of units applied
    pub fn apply(&self, frame: &mut Frame, detections: &Detections) -> usize {
        let mut applied = 0;
        for unit in self.units.iter().filter(|unit| unit.enabled) {
            unit.kind.render(frame, detections);
            applied += 1;
        }
        applied
    }

    /// Cycle an overlay unit to its next asset variant
    pub fn next_asset(&mut self, name: &str) -> Option<usize> {
        self.get_mut(name)?.kind.next_asset()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterUnit> {
        self.units.iter().find(|unit| unit.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FilterUnit> {
        self.units.iter_mut().find(|unit| unit.name == name)
    }

    /// Units in draw order
    pub fn iter(&self) -> impl Iterator<Item = &FilterUnit> {
        self.units.iter()
    }

    /// Unit names in draw order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.name.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.enabled).count()
    }

    /// Log every unit with its state, in draw order
    pub fn log_summary(&self) {
        log::info!("Filters: {} registered, {} active", self.len(), self.active_count());
        for unit in &self.units {
            log::info!(
                "  [{}] {} ({}, z={})",
                if unit.enabled { "x" } else { " " },
                unit.name,
                unit.kind.kind_name(),
                unit.draw_order
            );
        }
    }

    fn sort(&mut self) {
        self.units.sort_by_key(|unit| (unit.draw_order, unit.seq));
    }
}
