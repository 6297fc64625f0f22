//! Tracklet: one candidate particle trajectory built from detector hits.

use crate::{
    error::{Result, TrackletError},
    fit::{line_endpoints, FitResults, Fitter},
    particle::ParticleTable,
    types::{EventId, Hit, ParticleId, Point3D, TrackletId},
};
use std::fmt;
use std::sync::Arc;

/// Derived artifacts attached to a tracklet after construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtraInfo {
    /// Output of the last successful `fit` call
    pub fit_results: Option<FitResults>,
}

impl ExtraInfo {
    /// Names of the populated slots.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.fit_results.is_some() {
            keys.push("fit_results");
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.fit_results.is_none()
    }
}

/// A candidate particle trajectory.
#[derive(Clone)]
pub struct Tracklet {
    pub tracklet_id: TrackletId,
    pub particle_id: ParticleId,
    pub e_id: EventId,
    /// Hits in the order they were associated
    pub hits: Vec<Hit>,
    particle_name: String,
    particle_color: String,
    fitter: Option<Arc<dyn Fitter>>,
    endpoint_0: Option<Point3D>,
    endpoint_1: Option<Point3D>,
    extra_info: ExtraInfo,
}

impl Tracklet {
    /// Create a tracklet, resolving its display name and colour from `table`.
    pub fn new(
        tracklet_id: TrackletId,
        particle_id: ParticleId,
        e_id: EventId,
        hits: Vec<Hit>,
        table: &ParticleTable,
    ) -> Self {
        let (particle_name, particle_color) = Self::get_particle_info(table, particle_id);
        Self {
            tracklet_id,
            particle_id,
            e_id,
            hits,
            particle_name,
            particle_color,
            fitter: None,
            endpoint_0: None,
            endpoint_1: None,
            extra_info: ExtraInfo::default(),
        }
    }

    pub fn with_fitter(mut self, fitter: Arc<dyn Fitter>) -> Self {
        self.fitter = Some(fitter);
        self
    }

    pub fn with_endpoint_0(mut self, point: Point3D) -> Self {
        self.endpoint_0 = Some(point);
        self
    }

    pub fn with_endpoint_1(mut self, point: Point3D) -> Self {
        self.endpoint_1 = Some(point);
        self
    }

    pub fn with_endpoints(self, point_0: Point3D, point_1: Point3D) -> Self {
        self.with_endpoint_0(point_0).with_endpoint_1(point_1)
    }

    /// `(name, color)` for `particle_id`, falling back to the table default.
    pub fn get_particle_info(table: &ParticleTable, particle_id: ParticleId) -> (String, String) {
        let info = table.get(particle_id);
        (info.name.clone(), info.color.clone())
    }

    pub fn particle_name(&self) -> &str {
        &self.particle_name
    }

    pub fn particle_color(&self) -> &str {
        &self.particle_color
    }

    pub fn has_fitter(&self) -> bool {
        self.fitter.is_some()
    }

    pub fn extra_info(&self) -> &ExtraInfo {
        &self.extra_info
    }

    /// Hits recorded on the front side, in original order.
    pub fn get_front_hits(&self) -> Vec<&Hit> {
        self.hits.iter().filter(|h| h.is_front()).collect()
    }

    /// Hits recorded on the back side, in original order.
    pub fn get_back_hits(&self) -> Vec<&Hit> {
        self.hits.iter().filter(|h| h.is_back()).collect()
    }

    pub fn get_endpoints(&self) -> (Option<Point3D>, Option<Point3D>) {
        (self.endpoint_0, self.endpoint_1)
    }

    pub fn set_endpoints(&mut self, point_0: Point3D, point_1: Point3D) {
        self.endpoint_0 = Some(point_0);
        self.endpoint_1 = Some(point_1);
    }

    /// Run the configured fitter over all hits and store its output.
    ///
    /// Every call re-runs the fitter and replaces any earlier result.
    pub fn fit(&mut self) -> Result<FitResults> {
        let Some(fitter) = self.fitter.as_ref() else {
            tracing::warn!(tracklet_id = self.tracklet_id.0, "fit requested without a fitter");
            return Err(TrackletError::MissingFitter {
                tracklet_id: self.tracklet_id,
            });
        };

        tracing::debug!(
            tracklet_id = self.tracklet_id.0,
            hits = self.hits.len(),
            "fitting tracklet"
        );
        let results = fitter.fit(&self.hits);
        self.extra_info.fit_results = Some(results.clone());
        Ok(results)
    }

    pub fn get_fit_results(&self) -> Option<&FitResults> {
        self.extra_info.fit_results.as_ref()
    }

    /// Fit, then set the endpoints from the fitted line.
    ///
    /// Endpoints are left untouched when the results carry no line (too few
    /// hits, or a fitter that does not write the line keys). Returns whether
    /// they were set.
    pub fn fit_and_set_endpoints(&mut self) -> Result<bool> {
        let results = self.fit()?;
        match line_endpoints(&results, &self.hits) {
            Some((p0, p1)) => {
                self.set_endpoints(p0, p1);
                Ok(true)
            }
            None => {
                tracing::debug!(
                    tracklet_id = self.tracklet_id.0,
                    hits = self.hits.len(),
                    "no fitted line, endpoints left unset"
                );
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Tracklet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tracklet(id={}, particle_id={}, name={}, color={}, e_id={}, hits={}, extra_info_keys=",
            self.tracklet_id,
            self.particle_id,
            self.particle_name,
            self.particle_color,
            self.e_id,
            self.hits.len(),
        )?;
        if self.extra_info.is_empty() {
            f.write_str("None")?;
        } else {
            write!(f, "[{}]", self.extra_info.keys().join(", "))?;
        }
        if let (Some(p0), Some(p1)) = (&self.endpoint_0, &self.endpoint_1) {
            write!(f, ", endpoints=({}, {})", p0, p1)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Tracklet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracklet")
            .field("tracklet_id", &self.tracklet_id)
            .field("particle_id", &self.particle_id)
            .field("e_id", &self.e_id)
            .field("hits", &self.hits)
            .field("particle_name", &self.particle_name)
            .field("particle_color", &self.particle_color)
            .field("fitter", &self.fitter.as_ref().map(|_| "<fitter>"))
            .field("endpoint_0", &self.endpoint_0)
            .field("endpoint_1", &self.endpoint_1)
            .field("extra_info", &self.extra_info)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
