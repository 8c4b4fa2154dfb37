//! 2D image overlays anchored to face boxes or landmarks.

use super::Detections;
use crate::{
    assets::OverlayAsset,
    compositor::blend,
    placement::{nose_anchor, Placement, PlacementRect, VerticalAlign},
    Frame,
};

/// What an overlay is positioned against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Detector face box, overlay sits over its top edge
    FaceBox,
    /// Pseudo-box around the nose tip landmark
    NoseTip,
    /// Under the nose, sized from the mouth corners
    Mustache,
}

impl Anchor {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FaceBox => "face_box",
            Self::NoseTip => "nose_tip",
            Self::Mustache => "mustache",
        }
    }
}

/// Image overlay drawn once per detected face
#[derive(Debug, Clone)]
pub struct OverlayFilter {
    asset: OverlayAsset,
    placement: Placement,
    anchor: Anchor,
}

impl OverlayFilter {
    /// Nose overlays are centred on their anchor; face box overlays keep the
    /// alignment of `placement`.
    #[must_use]
    pub fn new(asset: OverlayAsset, placement: Placement, anchor: Anchor) -> Self {
        let placement = match anchor {
            Anchor::NoseTip => placement.with_align(VerticalAlign::Center),
            Anchor::FaceBox | Anchor::Mustache => placement,
        };
        Self {
            asset,
            placement,
            anchor,
        }
    }

    #[must_use]
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    #[must_use]
    pub fn asset(&self) -> &OverlayAsset {
        &self.asset
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn next_asset(&mut self) -> Option<usize> {
        self.asset.next_asset()
    }

    pub fn adjust_offset(&mut self, dx: i32, dy: i32) {
        self.placement.adjust_offset(dx, dy);
        let (x, y) = self.placement.offset();
        log::debug!("{} overlay offset now ({x}, {y})", self.anchor.as_str());
    }

    /// Where the overlay goes for every face of this frame
    #[must_use]
    pub fn placements(&self, detections: &Detections) -> Vec<PlacementRect> {
        let Some(image) = self.asset.active() else {
            return Vec::new();
        };
        let native = image.dimensions();
        match self.anchor {
            Anchor::FaceBox => detections
                .faces
                .iter()
                .filter_map(|face| self.placement.place(*face, native))
                .collect(),
            Anchor::NoseTip => detections
                .landmarks
                .iter()
                .filter_map(nose_anchor)
                .filter_map(|anchor| self.placement.place(anchor, native))
                .collect(),
            Anchor::Mustache => detections
                .landmarks
                .iter()
                .filter_map(|landmarks| self.placement.place_mustache(landmarks, native))
                .collect(),
        }
    }

    /// Composite onto `frame`; returns the number of faces decorated
    pub fn render(&self, frame: &mut Frame, detections: &Detections) -> usize {
        let Some(image) = self.asset.active() else {
            return 0;
        };
        let mut drawn = 0;
        for rect in self.placements(detections) {
            let Some(scaled) = image.resized(rect.width, rect.height) else {
                continue;
            };
            if blend(frame, &scaled, rect.x, rect.y) > 0 {
                drawn += 1;
            }
        }
        drawn
    }
}
