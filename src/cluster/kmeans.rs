//! K-means clustering of voxel point clouds.
//!
//! Lloyd's algorithm with k-means++ seeding. Each of the `n_init` restarts draws
//! its seeds from one [`StdRng`] seeded with [`KMeansConfig::seed`], so results
//! are reproducible, and the restart with the lowest inertia wins.
//!
//! A run stops after `max_iter` iterations or once the summed squared centroid
//! movement drops to `tolerance` times the mean per-axis variance of the input.

#![forbid(unsafe_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::cluster::ClusterError;
use crate::io::points::Point3;

/// Default number of restarts.
pub const DEFAULT_N_INIT: usize = 10;
/// Default iteration cap per restart.
pub const DEFAULT_MAX_ITER: usize = 300;
/// Default relative convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// K-means settings.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::cluster::KMeansConfigBuilder;
///
/// let config = KMeansConfigBuilder::default().k(25).seed(7).build().unwrap();
/// assert_eq!(config.k(), 25);
/// assert_eq!(config.n_init(), 10);
/// assert_eq!(config.max_iter(), 300);
///
/// assert!(KMeansConfigBuilder::default().k(0).build().is_err());
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct KMeansConfig {
    /// Number of clusters.
    k: usize,
    /// Number of seeded restarts.
    #[builder(default = "DEFAULT_N_INIT")]
    #[serde(default = "default_n_init")]
    n_init: usize,
    /// Iteration cap per restart.
    #[builder(default = "DEFAULT_MAX_ITER")]
    #[serde(default = "default_max_iter")]
    max_iter: usize,
    /// Relative convergence tolerance.
    #[builder(default = "DEFAULT_TOLERANCE")]
    #[serde(default = "default_tolerance")]
    tolerance: f64,
    /// RNG seed.
    #[builder(default)]
    #[serde(default)]
    seed: u64,
}

const fn default_n_init() -> usize {
    DEFAULT_N_INIT
}

const fn default_max_iter() -> usize {
    DEFAULT_MAX_ITER
}

const fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl KMeansConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        check_parameters(
            self.k.unwrap_or(1),
            self.n_init.unwrap_or(DEFAULT_N_INIT),
            self.max_iter.unwrap_or(DEFAULT_MAX_ITER),
            self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
        )
    }
}

fn check_parameters(k: usize, n_init: usize, max_iter: usize, tolerance: f64) -> Result<(), String> {
    if k == 0 {
        return Err("k must be positive".to_owned());
    }
    if n_init == 0 {
        return Err("n_init must be positive".to_owned());
    }
    if max_iter == 0 {
        return Err("max_iter must be positive".to_owned());
    }
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return Err(format!(
            "tolerance must be finite and non-negative, got {tolerance}"
        ));
    }
    Ok(())
}

impl KMeansConfig {
    /// `k` clusters with default restarts, iterations, tolerance and seed 0.
    #[must_use]
    pub const fn new(k: usize) -> Self {
        Self {
            k,
            n_init: DEFAULT_N_INIT,
            max_iter: DEFAULT_MAX_ITER,
            tolerance: DEFAULT_TOLERANCE,
            seed: 0,
        }
    }

    /// Number of clusters.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Number of restarts.
    #[must_use]
    pub const fn n_init(&self) -> usize {
        self.n_init
    }

    /// Iteration cap per restart.
    #[must_use]
    pub const fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Relative convergence tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// RNG seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// [`ClusterError::ZeroClusters`] for `k == 0`, otherwise
    /// [`ClusterError::InvalidConfig`] describing the bad value.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.k == 0 {
            return Err(ClusterError::ZeroClusters);
        }
        check_parameters(self.k, self.n_init, self.max_iter, self.tolerance)
            .map_err(|message| ClusterError::InvalidConfig { message })
    }
}

// =============================================================================
// CLUSTERING
// =============================================================================

/// Outcome of [`kmeans`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KMeansResult {
    /// One centroid per cluster, indexed by label.
    pub centroids: Vec<Point3>,
    /// Cluster label of each input point.
    pub labels: Vec<usize>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
    /// Lloyd iterations of the winning restart.
    pub iterations: usize,
}

#[expect(clippy::cast_precision_loss)]
const fn count_to_f64(count: usize) -> f64 {
    count as f64
}

/// Clusters `points` into `config.k()` groups.
///
/// # Errors
///
/// - [`ClusterError::ZeroClusters`] or [`ClusterError::InvalidConfig`] for bad
///   settings.
/// - [`ClusterError::EmptyInput`] if `points` is empty.
/// - [`ClusterError::TooFewPoints`] if there are fewer points than clusters.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::cluster::{KMeansConfig, kmeans};
/// use delaunay2d::io::Point3;
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(10.0, 0.0, 0.0),
///     Point3::new(10.0, 1.0, 0.0),
/// ];
/// let result = kmeans(&points, &KMeansConfig::new(2)).unwrap();
/// assert_eq!(result.labels[0], result.labels[1]);
/// assert_ne!(result.labels[0], result.labels[2]);
/// assert!((result.inertia - 1.0).abs() < 1e-9);
/// ```
pub fn kmeans(points: &[Point3], config: &KMeansConfig) -> Result<KMeansResult, ClusterError> {
    config.validate()?;
    if points.is_empty() {
        return Err(ClusterError::EmptyInput);
    }
    let k = config.k();
    if points.len() < k {
        return Err(ClusterError::TooFewPoints {
            k,
            points: points.len(),
        });
    }

    let threshold = config.tolerance() * mean_variance(points);
    let mut rng = StdRng::seed_from_u64(config.seed());
    let mut best: Option<KMeansResult> = None;

    for run in 0..config.n_init() {
        let seeds = seed_centroids(points, k, &mut rng);
        let result = lloyd(points, seeds, config.max_iter(), threshold);
        tracing::trace!(
            run,
            inertia = result.inertia,
            iterations = result.iterations,
            "k-means restart"
        );
        if best.as_ref().is_none_or(|b| result.inertia < b.inertia) {
            best = Some(result);
        }
    }

    let best = best.ok_or_else(|| ClusterError::InvalidConfig {
        message: "n_init must be positive".to_owned(),
    })?;
    tracing::debug!(
        points = points.len(),
        k,
        inertia = best.inertia,
        iterations = best.iterations,
        "k-means finished"
    );
    Ok(best)
}

fn mean_variance(points: &[Point3]) -> f64 {
    let n = count_to_f64(points.len());
    let mut mean = [0.0; 3];
    for p in points {
        for (m, c) in mean.iter_mut().zip(p.coords()) {
            *m += c;
        }
    }
    for m in &mut mean {
        *m /= n;
    }
    let centroid = Point3::from(mean);
    let total: f64 = points.iter().map(|p| p.distance_squared(&centroid)).sum();
    total / (3.0 * n)
}

/// k-means++ seeding: each new seed is drawn with probability proportional to
/// its squared distance from the nearest seed so far.
fn seed_centroids(points: &[Point3], k: usize, rng: &mut StdRng) -> Vec<Point3> {
    let mut centroids = Vec::with_capacity(k);
    let first = points[rng.random_range(0..points.len())];
    centroids.push(first);
    let mut nearest: Vec<f64> = points.iter().map(|p| p.distance_squared(&first)).collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let index = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            nearest
                .iter()
                .position(|&d| {
                    if target < d {
                        true
                    } else {
                        target -= d;
                        false
                    }
                })
                .or_else(|| nearest.iter().rposition(|&d| d > 0.0))
                .unwrap_or(0)
        } else {
            // Every point already coincides with a seed.
            rng.random_range(0..points.len())
        };

        let seed = points[index];
        centroids.push(seed);
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(p.distance_squared(&seed));
        }
    }
    centroids
}

/// Labels every point with its nearest centroid, lowest label on ties.
/// Returns the inertia.
fn assign(points: &[Point3], centroids: &[Point3], labels: &mut [usize]) -> f64 {
    let mut inertia = 0.0;
    for (label, p) in labels.iter_mut().zip(points) {
        let mut best = (0, f64::INFINITY);
        for (j, c) in centroids.iter().enumerate() {
            let d = p.distance_squared(c);
            if d < best.1 {
                best = (j, d);
            }
        }
        *label = best.0;
        inertia += best.1;
    }
    inertia
}

fn lloyd(points: &[Point3], mut centroids: Vec<Point3>, max_iter: usize, threshold: f64) -> KMeansResult {
    let k = centroids.len();
    let mut labels = vec![0; points.len()];
    let mut iterations = 0;

    while iterations < max_iter {
        iterations += 1;
        assign(points, &centroids, &mut labels);

        let mut sums = vec![[0.0_f64; 3]; k];
        let mut counts = vec![0_usize; k];
        for (&label, p) in labels.iter().zip(points) {
            for (s, c) in sums[label].iter_mut().zip(p.coords()) {
                *s += c;
            }
            counts[label] += 1;
        }

        let mut shift = 0.0;
        for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            // Empty clusters keep their previous centroid.
            if count == 0 {
                continue;
            }
            let n = count_to_f64(count);
            let updated = Point3::new(sum[0] / n, sum[1] / n, sum[2] / n);
            shift += updated.distance_squared(centroid);
            *centroid = updated;
        }

        if shift <= threshold {
            break;
        }
    }

    let inertia = assign(points, &centroids, &mut labels);
    KMeansResult {
        centroids,
        labels,
        inertia,
        iterations,
    }
}

// =============================================================================
// REDUCTION AND SPLITTING
// =============================================================================

/// Replaces `points` by `k` centroids, or returns them unchanged if there are at
/// most `k`.
///
/// # Errors
///
/// [`ClusterError::ZeroClusters`] for `k == 0`, [`ClusterError::EmptyInput`] for
/// an empty slice.
pub fn reduce(points: &[Point3], k: usize) -> Result<Vec<Point3>, ClusterError> {
    reduce_with(points, &KMeansConfig::new(k))
}

/// [`reduce`] with explicit settings.
///
/// # Errors
///
/// Same as [`kmeans`], except that `points.len() <= k` is not an error.
pub fn reduce_with(points: &[Point3], config: &KMeansConfig) -> Result<Vec<Point3>, ClusterError> {
    config.validate()?;
    if points.is_empty() {
        return Err(ClusterError::EmptyInput);
    }
    if points.len() <= config.k() {
        tracing::debug!(
            points = points.len(),
            k = config.k(),
            "too few points to reduce, keeping all"
        );
        return Ok(points.to_vec());
    }
    Ok(kmeans(points, config)?.centroids)
}

/// Partitions `points` into `k` groups, ordered by cluster label.
///
/// Points keep their relative order within a group. A group can be empty when
/// the input has fewer than `k` distinct points.
///
/// # Errors
///
/// Same as [`kmeans`].
///
/// # Examples
///
/// ```rust
/// use delaunay2d::cluster::split_groups;
/// use delaunay2d::io::Point3;
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(20.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(21.0, 0.0, 0.0),
/// ];
/// let groups = split_groups(&points, 2).unwrap();
/// assert_eq!(groups.len(), 2);
/// assert!(groups.iter().all(|g| g.len() == 2));
/// ```
pub fn split_groups(points: &[Point3], k: usize) -> Result<Vec<Vec<Point3>>, ClusterError> {
    split_groups_with(points, &KMeansConfig::new(k))
}

/// [`split_groups`] with explicit settings.
///
/// # Errors
///
/// Same as [`kmeans`].
pub fn split_groups_with(
    points: &[Point3],
    config: &KMeansConfig,
) -> Result<Vec<Vec<Point3>>, ClusterError> {
    let result = kmeans(points, config)?;
    let mut groups = vec![Vec::new(); config.k()];
    for (&label, &p) in result.labels.iter().zip(points) {
        groups[label].push(p);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_blobs() -> Vec<Point3> {
        let mut points = Vec::new();
        for (cx, cy) in [(0.0, 0.0), (50.0, 40.0)] {
            for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
                points.push(Point3::new(cx + dx, cy + dy, 2.0));
            }
        }
        points
    }

    #[test]
    fn separates_two_blobs() {
        let points = two_blobs();
        let result = kmeans(&points, &KMeansConfig::new(2)).unwrap();
        assert!(result.labels[..4].iter().all(|&l| l == result.labels[0]));
        assert!(result.labels[4..].iter().all(|&l| l == result.labels[4]));
        assert_ne!(result.labels[0], result.labels[4]);

        let centroid = result.centroids[result.labels[0]];
        assert_relative_eq!(centroid.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(centroid.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(centroid.z, 2.0, epsilon = 1e-12);
        // 8 points, each at squared distance 0.5 from its centroid.
        assert_relative_eq!(result.inertia, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let points: Vec<Point3> = (0..40_u32)
            .map(|i| {
                let t = f64::from(i);
                Point3::new((t * 1.7).sin() * 10.0, (t * 0.3).cos() * 10.0, t % 5.0)
            })
            .collect();
        let config = KMeansConfigBuilder::default().k(4).seed(99).build().unwrap();
        let a = kmeans(&points, &config).unwrap();
        let b = kmeans(&points, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn reduce_keeps_small_inputs() {
        let points = two_blobs();
        assert_eq!(reduce(&points, 8).unwrap(), points);
        assert_eq!(reduce(&points, 100).unwrap(), points);
        let reduced = reduce(&points, 2).unwrap();
        assert_eq!(reduced.len(), 2);
    }

    #[test]
    fn split_groups_preserves_every_point() {
        let points = two_blobs();
        let groups = split_groups(&points, 2).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), points.len());
        for group in &groups {
            assert_eq!(group.len(), 4);
            let near_origin = group[0].x < 25.0;
            assert!(group.iter().all(|p| (p.x < 25.0) == near_origin));
        }
    }

    #[test]
    fn identical_points_do_not_panic() {
        let points = vec![Point3::new(1.0, 1.0, 1.0); 5];
        let result = kmeans(&points, &KMeansConfig::new(3)).unwrap();
        assert_relative_eq!(result.inertia, 0.0);
        assert_eq!(result.centroids.len(), 3);
        let groups = split_groups(&points, 3).unwrap();
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 5);
    }

    #[test]
    fn error_cases() {
        let points = two_blobs();
        assert_eq!(reduce(&points, 0), Err(ClusterError::ZeroClusters));
        assert_eq!(reduce(&[], 3), Err(ClusterError::EmptyInput));
        assert_eq!(
            kmeans(&points[..2], &KMeansConfig::new(3)),
            Err(ClusterError::TooFewPoints { k: 3, points: 2 })
        );
        let config: KMeansConfig =
            serde_json::from_str(r#"{"k": 2, "n_init": 0}"#).unwrap();
        assert!(matches!(
            kmeans(&points, &config),
            Err(ClusterError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn config_defaults() {
        let config: KMeansConfig = serde_json::from_str(r#"{"k": 25}"#).unwrap();
        assert_eq!(config, KMeansConfig::new(25));
        assert_eq!(
            KMeansConfigBuilder::default().k(25).build().unwrap(),
            KMeansConfig::new(25)
        );
        assert!(KMeansConfigBuilder::default().k(2).tolerance(-1.0).build().is_err());
        assert!(KMeansConfigBuilder::default().build().is_err());
    }
}
