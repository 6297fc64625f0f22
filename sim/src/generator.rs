//! Tracklet generator.
//!
//! The detector is a telescope of sensor planes perpendicular to z, one every
//! `plane_spacing` mm. Each plane is double-sided: the front sensor sits at
//! the plane position and the back sensor `sensor_gap` mm behind it. A
//! straight track from a vertex near the origin leaves one front and one back
//! hit per plane, with:
//! - uniform position noise of half-width `position_noise`
//! - per-hit detection probability `p_detection`
//! - probability `p_unassigned` that a hit carries no side information
//! - probability `barrel_fraction` that the track also crosses a barrel
//!   layer, recorded as one [`DetectorSide::Barrel`] hit halfway between two
//!   adjacent planes
//!
//! Front and back hits therefore both lie at z > 0; the side names the sensor
//! face, not a hemisphere.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracklet_core::{
    DetectorSide, EventId, Hit, HitId, ParticleId, ParticleTable, Point3D, Tracklet, TrackletId,
};

/// Speed of light (mm/ns)
const C_MM_PER_NS: f64 = 299.792_458;

/// Particle codes drawn by the generator. 99 is deliberately absent from the
/// standard particle table.
const PARTICLE_POOL: [i32; 7] = [13, -13, 11, 211, -211, 2212, 99];

/// Generator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Tracklets per event
    pub n_tracklets: usize,
    /// Number of sensor planes
    pub n_planes: usize,
    /// Distance between planes along z (mm)
    pub plane_spacing: f64,
    /// Front-to-back sensor distance within a plane (mm)
    pub sensor_gap: f64,
    /// Half-width of the uniform position noise (mm)
    pub position_noise: f64,
    /// Maximum track slope |dx/dz|, |dy/dz|
    pub max_slope: f64,
    /// Probability that a sensor records the crossing
    pub p_detection: f64,
    /// Probability that a recorded hit has unknown side
    pub p_unassigned: f64,
    /// Probability that a tracklet carries one barrel hit
    pub barrel_fraction: f64,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_tracklets: 5,
            n_planes: 4,
            plane_spacing: 100.0,
            sensor_gap: 0.3,
            position_noise: 0.05,
            max_slope: 0.2,
            p_detection: 0.95,
            p_unassigned: 0.02,
            barrel_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Seeded source of synthetic tracklets.
pub struct EventGenerator {
    pub config: SimConfig,
    rng: ChaCha8Rng,
    next_tracklet_id: u64,
    next_hit_id: u64,
}

impl EventGenerator {
    pub fn new(config: SimConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            next_tracklet_id: 0,
            next_hit_id: 0,
        }
    }

    fn next_tracklet_id(&mut self) -> TrackletId {
        let id = TrackletId(self.next_tracklet_id);
        self.next_tracklet_id += 1;
        id
    }

    fn next_hit_id(&mut self) -> HitId {
        let id = HitId(self.next_hit_id);
        self.next_hit_id += 1;
        id
    }

    fn uniform(&mut self, half_width: f64) -> f64 {
        self.rng.gen::<f64>() * half_width * 2.0 - half_width
    }

    /// Generate all tracklets of one event. Tracklet ids keep increasing
    /// across events.
    pub fn generate(&mut self, e_id: EventId, table: &ParticleTable) -> Vec<Tracklet> {
        let n = self.config.n_tracklets;
        let tracklets: Vec<Tracklet> = (0..n).map(|_| self.generate_one(e_id, table)).collect();
        tracing::debug!(
            e_id = e_id.0,
            tracklets = tracklets.len(),
            hits = tracklets.iter().map(|t| t.hits.len()).sum::<usize>(),
            "generated event"
        );
        tracklets
    }

    fn generate_one(&mut self, e_id: EventId, table: &ParticleTable) -> Tracklet {
        let id = self.next_tracklet_id();
        let particle = PARTICLE_POOL[self.rng.gen_range(0..PARTICLE_POOL.len())];

        let vx = self.uniform(1.0);
        let vy = self.uniform(1.0);
        let tx = self.uniform(self.config.max_slope);
        let ty = self.uniform(self.config.max_slope);

        // Barrel layer sits after this plane, if crossed
        let barrel_after = if self.config.n_planes >= 2
            && self.rng.gen::<f64>() < self.config.barrel_fraction
        {
            Some(self.rng.gen_range(1..self.config.n_planes))
        } else {
            None
        };

        let mut hits = Vec::with_capacity(self.config.n_planes * 2 + 1);
        for plane in 1..=self.config.n_planes {
            let z_front = plane as f64 * self.config.plane_spacing;
            for (side, z) in [
                (DetectorSide::Front, z_front),
                (DetectorSide::Back, z_front + self.config.sensor_gap),
            ] {
                if self.rng.gen::<f64>() > self.config.p_detection {
                    continue;
                }
                let side = if self.rng.gen::<f64>() < self.config.p_unassigned {
                    DetectorSide::Unknown
                } else {
                    side
                };
                let hit = self.track_hit(vx, vy, tx, ty, z, side, plane as u32);
                hits.push(hit);
            }

            if barrel_after == Some(plane) {
                let z = (plane as f64 + 0.5) * self.config.plane_spacing;
                let hit = self.track_hit(vx, vy, tx, ty, z, DetectorSide::Barrel, 0);
                hits.push(hit);
            }
        }

        Tracklet::new(id, ParticleId(particle), e_id, hits, table)
    }

    /// Noisy hit where the track (vx, vy) + z·(tx, ty) crosses `z`.
    #[allow(clippy::too_many_arguments)]
    fn track_hit(
        &mut self,
        vx: f64,
        vy: f64,
        tx: f64,
        ty: f64,
        z: f64,
        side: DetectorSide,
        layer: u32,
    ) -> Hit {
        let x = vx + tx * z + self.uniform(self.config.position_noise);
        let y = vy + ty * z + self.uniform(self.config.position_noise);
        let path = (z * z * (1.0 + tx * tx + ty * ty)).sqrt();
        Hit {
            id: self.next_hit_id(),
            position: Point3D::new(x, y, z),
            detector_side: side,
            layer,
            energy: 0.08 + self.rng.gen::<f64>() * 0.12,
            time: path / C_MM_PER_NS,
        }
    }
}
