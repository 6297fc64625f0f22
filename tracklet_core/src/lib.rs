//! `tracklet_core` — Tracklet record and its collaborators.
//!
//! # Module layout
//! - [`types`]    — IDs, 3D points, hits and detector sides
//! - [`particle`] — Particle-id → name/colour table with guaranteed default
//! - [`fit`]      — Fitter capability, fit results, straight-line fitter
//! - [`tracklet`] — The tracklet record itself
//! - [`error`]    — Error type for tracklet operations

pub mod error;
pub mod fit;
pub mod particle;
pub mod tracklet;
pub mod types;

pub use error::TrackletError;
pub use fit::{line_endpoints, FitResults, Fitter, LineFitConfig, LineFitter};
pub use particle::{ParticleInfo, ParticleTable};
pub use tracklet::{ExtraInfo, Tracklet};
pub use types::{DetectorSide, EventId, Hit, HitId, ParticleId, Point3D, TrackletId};
