//! `sim` — Synthetic event generator: straight tracks through double-sided
//! sensor planes, emitted as [`tracklet_core::Tracklet`]s.

pub mod generator;

pub use generator::{EventGenerator, SimConfig};
