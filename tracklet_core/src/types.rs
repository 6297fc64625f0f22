//! Fundamental types shared by the tracklet record and its collaborators.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 3D point in detector coordinates (millimetres).
pub type Point3D = Point3<f64>;

// ---------------------------------------------------------------------------
// Identifier types — newtype wrappers so IDs are never confused at compile time
// ---------------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TrackletId(pub u64);

/// Signed PDG-style particle code.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ParticleId(pub i32);

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EventId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HitId(pub u64);

impl fmt::Display for TrackletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Hit
// ---------------------------------------------------------------------------

/// Which part of the detector recorded a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorSide {
    /// Front face of a double-sided sensor plane
    Front,
    /// Back face of a double-sided sensor plane
    Back,
    /// Barrel layer between planes
    Barrel,
    /// Side not recorded
    Unknown,
}

impl DetectorSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorSide::Front => "front",
            DetectorSide::Back => "back",
            DetectorSide::Barrel => "barrel",
            DetectorSide::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DetectorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detector measurement point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Unique hit identifier within an event
    pub id: HitId,
    /// Reconstructed hit position
    pub position: Point3D,
    /// Detector side that recorded the hit
    pub detector_side: DetectorSide,
    /// Layer index, counted outwards from the interaction point
    pub layer: u32,
    /// Deposited energy (MeV)
    pub energy: f64,
    /// Hit time relative to the bunch crossing (ns)
    pub time: f64,
}

impl Hit {
    /// Hit with zero energy and time; enough for geometry-only uses.
    pub fn new(id: u64, position: Point3D, detector_side: DetectorSide, layer: u32) -> Self {
        Self {
            id: HitId(id),
            position,
            detector_side,
            layer,
            energy: 0.0,
            time: 0.0,
        }
    }

    pub fn is_front(&self) -> bool {
        self.detector_side == DetectorSide::Front
    }

    pub fn is_back(&self) -> bool {
        self.detector_side == DetectorSide::Back
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_side_serializes_lowercase() {
        let json = serde_json::to_string(&DetectorSide::Front).unwrap();
        assert_eq!(json, "\"front\"");
        let side: DetectorSide = serde_json::from_str("\"back\"").unwrap();
        assert_eq!(side, DetectorSide::Back);
        assert_eq!(DetectorSide::Barrel.to_string(), "barrel");
    }

    #[test]
    fn side_predicates() {
        let h = Hit::new(0, Point3D::origin(), DetectorSide::Barrel, 1);
        assert!(!h.is_front());
        assert!(!h.is_back());
        let h = Hit::new(1, Point3D::new(0.0, 0.0, 10.0), DetectorSide::Front, 1);
        assert!(h.is_front());
    }
}
