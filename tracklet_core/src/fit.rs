//! Fitting capability: the [`Fitter`] trait, its result map, and a
//! straight-line least-squares fitter.
//!
//! # Line fit
//! For hit positions pᵢ with centroid c, the scatter matrix
//! S = Σ (pᵢ − c)(pᵢ − c)ᵀ is diagonalised; the eigenvector with the largest
//! eigenvalue is the best-fit direction d. The residual of each hit is its
//! perpendicular distance to the line c + t·d.
//!
//! Output keys: `n_hits`, `ndf`, and for a valid fit `x0 y0 z0` (centroid),
//! `dx dy dz` (unit direction, pointing from the first hit to the last),
//! `chi2` (sum of squared perpendicular distances), `rms`. Hit sets below
//! `min_hits` or with a non-finite position yield only `n_hits` and `ndf = 0`.

use crate::types::{Hit, Point3D};
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Named scalar outputs of a fit. Keys and units are defined by the fitter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitResults(BTreeMap<String, f64>);

impl FitResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FitResults {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A fitting routine: ordered hits in, named results out.
///
/// Any `Fn(&[Hit]) -> FitResults` closure is a `Fitter`.
pub trait Fitter: Send + Sync {
    fn fit(&self, hits: &[Hit]) -> FitResults;
}

impl<F> Fitter for F
where
    F: Fn(&[Hit]) -> FitResults + Send + Sync,
{
    fn fit(&self, hits: &[Hit]) -> FitResults {
        self(hits)
    }
}

// ---------------------------------------------------------------------------
// Straight-line fitter
// ---------------------------------------------------------------------------

/// Configuration for [`LineFitter`].
#[derive(Clone, Debug)]
pub struct LineFitConfig {
    /// Minimum number of hits for a line to be fitted
    pub min_hits: usize,
}

impl Default for LineFitConfig {
    fn default() -> Self {
        Self { min_hits: 2 }
    }
}

/// Least-squares 3D straight-line fit through hit positions.
#[derive(Clone, Debug, Default)]
pub struct LineFitter {
    pub config: LineFitConfig,
}

impl LineFitter {
    pub fn new(config: LineFitConfig) -> Self {
        Self { config }
    }
}

impl Fitter for LineFitter {
    fn fit(&self, hits: &[Hit]) -> FitResults {
        let n = hits.len();
        let mut out = FitResults::new();
        out.insert("n_hits", n as f64);

        if n < self.config.min_hits.max(2) {
            out.insert("ndf", 0.0);
            return out;
        }

        let centroid = hits
            .iter()
            .fold(Vector3::zeros(), |acc, h| acc + h.position.coords)
            / n as f64;
        if !centroid.iter().all(|c| c.is_finite()) {
            tracing::debug!(hits = n, "non-finite hit position, line not fitted");
            out.insert("ndf", 0.0);
            return out;
        }

        let scatter = hits.iter().fold(Matrix3::zeros(), |acc, h| {
            let r = h.position.coords - centroid;
            acc + r * r.transpose()
        });

        let eigen = SymmetricEigen::new(scatter);
        let principal = eigen.eigenvalues.imax();
        let mut dir: Vector3<f64> = eigen.eigenvectors.column(principal).into_owned();

        // Orient along hit order
        let span = hits[n - 1].position - hits[0].position;
        if dir.dot(&span) < 0.0 {
            dir = -dir;
        }

        let chi2: f64 = hits
            .iter()
            .map(|h| {
                let r = h.position.coords - centroid;
                (r - dir * r.dot(&dir)).norm_squared()
            })
            .sum();
        let ndf = (2 * n).saturating_sub(4);

        out.insert("x0", centroid.x);
        out.insert("y0", centroid.y);
        out.insert("z0", centroid.z);
        out.insert("dx", dir.x);
        out.insert("dy", dir.y);
        out.insert("dz", dir.z);
        out.insert("chi2", chi2);
        out.insert("ndf", ndf as f64);
        out.insert("rms", (chi2 / n as f64).sqrt());
        out
    }
}

/// Project the first and last hit onto a fitted line.
///
/// Returns `None` when `results` lacks the line keys written by
/// [`LineFitter`] or `hits` is empty.
pub fn line_endpoints(results: &FitResults, hits: &[Hit]) -> Option<(Point3D, Point3D)> {
    let origin = Vector3::new(results.get("x0")?, results.get("y0")?, results.get("z0")?);
    let dir = Vector3::new(results.get("dx")?, results.get("dy")?, results.get("dz")?);
    let first = hits.first()?;
    let last = hits.last()?;

    let project = |p: &Point3D| {
        let t = (p.coords - origin).dot(&dir);
        Point3D::from(origin + dir * t)
    };
    Some((project(&first.position), project(&last.position)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetectorSide;
    use approx::assert_abs_diff_eq;

    fn hits_on_line(origin: Vector3<f64>, dir: Vector3<f64>, n: usize) -> Vec<Hit> {
        (0..n)
            .map(|i| {
                let p = origin + dir * (i as f64 * 10.0);
                Hit::new(i as u64, Point3D::from(p), DetectorSide::Front, i as u32)
            })
            .collect()
    }

    #[test]
    fn collinear_hits_fit_exactly() {
        let dir = Vector3::new(1.0, 2.0, 2.0).normalize();
        let hits = hits_on_line(Vector3::new(5.0, -3.0, 1.0), dir, 6);
        let res = LineFitter::default().fit(&hits);

        assert_abs_diff_eq!(res.get("chi2").unwrap(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(res.get("dx").unwrap(), dir.x, epsilon = 1e-9);
        assert_abs_diff_eq!(res.get("dy").unwrap(), dir.y, epsilon = 1e-9);
        assert_abs_diff_eq!(res.get("dz").unwrap(), dir.z, epsilon = 1e-9);
        assert_eq!(res.get("n_hits"), Some(6.0));
        assert_eq!(res.get("ndf"), Some(8.0));
    }

    #[test]
    fn direction_follows_hit_order() {
        let dir = Vector3::new(0.0, 0.0, -1.0);
        let hits = hits_on_line(Vector3::zeros(), dir, 4);
        let res = LineFitter::default().fit(&hits);
        assert_abs_diff_eq!(res.get("dz").unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn offset_hit_gives_positive_chi2() {
        let mut hits = hits_on_line(Vector3::zeros(), Vector3::x(), 5);
        hits[2].position.y += 1.0;
        let res = LineFitter::default().fit(&hits);
        assert!(res.get("chi2").unwrap() > 0.0);
        assert!(res.get("rms").unwrap() > 0.0);
    }

    #[test]
    fn too_few_hits_reports_count_only() {
        let hits = hits_on_line(Vector3::zeros(), Vector3::x(), 1);
        let res = LineFitter::default().fit(&hits);
        assert_eq!(res.get("n_hits"), Some(1.0));
        assert_eq!(res.get("ndf"), Some(0.0));
        assert!(!res.contains_key("chi2"));
        assert!(line_endpoints(&res, &hits).is_none());
    }

    #[test]
    fn non_finite_hit_is_not_fitted() {
        let mut hits = hits_on_line(Vector3::zeros(), Vector3::z(), 3);
        hits[1].position.x = f64::NAN;
        let res = LineFitter::default().fit(&hits);
        assert_eq!(res.get("n_hits"), Some(3.0));
        assert_eq!(res.get("ndf"), Some(0.0));
        assert_eq!(res.len(), 2);
        assert!(line_endpoints(&res, &hits).is_none());
    }

    #[test]
    fn results_iterate_in_key_order() {
        let hits = hits_on_line(Vector3::zeros(), Vector3::x(), 3);
        let res = LineFitter::default().fit(&hits);
        let keys: Vec<&str> = res.iter().map(|(k, _)| k).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), res.len());
        assert!(res.iter().any(|(k, v)| k == "n_hits" && v == 3.0));
    }

    #[test]
    fn min_hits_is_configurable() {
        let hits = hits_on_line(Vector3::zeros(), Vector3::x(), 3);
        let fitter = LineFitter::new(LineFitConfig { min_hits: 4 });
        assert!(!fitter.fit(&hits).contains_key("dx"));
    }

    #[test]
    fn endpoints_are_projected_hits() {
        let mut hits = hits_on_line(Vector3::zeros(), Vector3::x(), 3);
        hits[0].position.y = 0.5;
        hits[2].position.y = 0.5;
        hits[1].position.y = -1.0;
        let res = LineFitter::default().fit(&hits);
        let (a, b) = line_endpoints(&res, &hits).unwrap();
        assert_abs_diff_eq!(a.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.x, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn closures_are_fitters() {
        let f = |hits: &[Hit]| FitResults::from_iter([("n", hits.len() as f64)]);
        let res = Fitter::fit(&f, &[]);
        assert_eq!(res.get("n"), Some(0.0));
    }
}
