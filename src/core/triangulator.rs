//! Incremental Bowyer-Watson triangulator.
//!
//! [`Triangulator`] owns the [`Mesh`], the [`PointRegistry`] and the
//! configuration, and is the only writer of the mesh.
//!
//! # Algorithm Overview
//!
//! 1. **Seeding**: the corners `(±R, ±R)` of a square of half-width `R` are
//!    registered and split into two triangles along the `(-R, R)`–`(R, -R)`
//!    diagonal.
//! 2. **Insertion** ([`Triangulator::add_point`]): the point is registered
//!    (near-duplicates are a silent no-op), the cavity of triangles whose
//!    circumcircle contains it is removed, and every boundary edge `(a, b)` is
//!    replaced by the triangle `(a, p, b)`.
//! 3. **Finalization** ([`Triangulator::finalize`]): triangles touching a
//!    bounding corner are pruned and the triangulator is closed.
//!
//! # Invariants
//!
//! Between insertions no inserted point lies strictly inside the circumcircle of a
//! live triangle. Points exactly on a circumcircle count as outside, so four or
//! more cocircular points can be triangulated differently depending on insertion
//! order. Every resulting triangulation is valid.
//!
//! The bounding square must enclose every point that will be inserted. This is
//! not checked.
//!
//! # Failure Model
//!
//! A [`TriangulationError::DegenerateGeometry`] leaves the mesh as it was before
//! the failing insertion and poisons the triangulator: later insertions return
//! [`TriangulationError::InvalidState`], reads keep working.
//!
//! # References
//!
//! - **Bowyer, A.** "Computing Dirichlet tessellations." *The Computer Journal*
//!   24.2 (1981): 162-166.
//! - **Watson, D.F.** "Computing the n-dimensional Delaunay tessellation with
//!   application to Voronoi polytopes." *The Computer Journal* 24.2 (1981): 167-172.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::algorithms::cavity::{CavityError, extract_cavity};
use crate::core::mesh::{Mesh, TriangleId};
use crate::core::registry::PointRegistry;
use crate::core::triangle::Triangle;
use crate::core::util::{DelaunayValidationError, is_delaunay};
use crate::geometry::point::{Point, PointValidationError};

/// Default identity tolerance for points and edges.
pub const DEFAULT_EPSILON: f64 = 1e-4;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by [`Triangulator`].
///
/// Rejecting a near-duplicate point is not an error; see
/// [`Triangulator::add_point`].
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum TriangulationError {
    /// A circumcircle could not be computed while inserting `point`.
    ///
    /// The triangulator is poisoned afterwards.
    #[error("Degenerate geometry while inserting {point}: {source}")]
    DegenerateGeometry {
        /// The point whose insertion failed.
        point: Point,
        /// The cavity extraction failure.
        #[source]
        source: CavityError,
    },

    /// The operation is not allowed in the current state, or the configuration
    /// is invalid.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the violated precondition.
        message: String,
    },

    /// The point has a non-finite coordinate.
    #[error("Invalid point: {source}")]
    InvalidPoint {
        /// Validation failure.
        #[from]
        source: PointValidationError,
    },
}

impl TriangulationError {
    fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Triangulator configuration: bounding half-width and identity tolerance.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::triangulator::TriangulatorConfigBuilder;
///
/// let config = TriangulatorConfigBuilder::default()
///     .bounding_radius(50.0)
///     .epsilon(1e-6)
///     .build()
///     .unwrap();
/// assert_eq!(config.bounding_radius(), 50.0);
///
/// // Only the radius is required.
/// let config = TriangulatorConfigBuilder::default().bounding_radius(10.0).build().unwrap();
/// assert_eq!(config.epsilon(), 1e-4);
///
/// assert!(TriangulatorConfigBuilder::default().bounding_radius(0.0).build().is_err());
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct TriangulatorConfig {
    /// Half-width `R` of the bounding square.
    bounding_radius: f64,
    /// Distance below which two points are the same point.
    #[builder(default = "DEFAULT_EPSILON")]
    #[serde(default = "default_epsilon")]
    epsilon: f64,
}

const fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl TriangulatorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let radius = self.bounding_radius;
        let epsilon = self.epsilon.unwrap_or(DEFAULT_EPSILON);
        if let Some(radius) = radius {
            check_parameters(radius, epsilon)
        } else {
            Ok(())
        }
    }
}

fn check_parameters(bounding_radius: f64, epsilon: f64) -> Result<(), String> {
    if !(bounding_radius.is_finite() && bounding_radius > 0.0) {
        return Err(format!(
            "bounding radius must be finite and positive, got {bounding_radius}"
        ));
    }
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(format!(
            "epsilon must be finite and positive, got {epsilon}"
        ));
    }
    Ok(())
}

impl TriangulatorConfig {
    /// Configuration with the given radius and [`DEFAULT_EPSILON`].
    ///
    /// Values are checked when the triangulator is built.
    #[must_use]
    pub const fn new(bounding_radius: f64) -> Self {
        Self {
            bounding_radius,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Half-width of the bounding square.
    #[must_use]
    pub const fn bounding_radius(&self) -> f64 {
        self.bounding_radius
    }

    /// Identity tolerance.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Checks that radius and epsilon are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::InvalidState`] describing the bad value.
    pub fn validate(&self) -> Result<(), TriangulationError> {
        check_parameters(self.bounding_radius, self.epsilon).map_err(TriangulationError::invalid_state)
    }
}

// =============================================================================
// TRIANGULATOR
// =============================================================================

/// Lifecycle of a [`Triangulator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriangulatorState {
    /// Accepting insertions.
    Open,
    /// [`Triangulator::finalize`] has run; the mesh is final.
    Finalized,
    /// An insertion failed with degenerate geometry; the mesh is readable but
    /// not guaranteed complete.
    Poisoned,
}

/// Incremental 2D Delaunay triangulator.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::triangulator::Triangulator;
///
/// let mut tri = Triangulator::new(10.0).unwrap();
/// assert!(tri.add_point(0.0, 0.0).unwrap());
/// assert!(!tri.add_point(0.0, 1e-6).unwrap()); // near-duplicate, no-op
/// assert_eq!(tri.number_of_triangles(), 4);
///
/// for (a, b, c) in tri.iterate_triangles().map(Into::into) {
///     println!("{a} {b} {c}");
/// }
///
/// tri.finalize().unwrap();
/// assert!(tri.add_point(1.0, 1.0).is_err());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "TriangulatorParts")]
pub struct Triangulator {
    mesh: Mesh,
    registry: PointRegistry,
    config: TriangulatorConfig,
    corners: [Point; 4],
    state: TriangulatorState,
}

/// Unchecked serialized form of a [`Triangulator`].
#[derive(Deserialize)]
struct TriangulatorParts {
    mesh: Mesh,
    registry: PointRegistry,
    config: TriangulatorConfig,
    corners: [Point; 4],
    state: TriangulatorState,
}

impl TryFrom<TriangulatorParts> for Triangulator {
    type Error = TriangulationError;

    /// Re-checks what [`Triangulator::with_config`] establishes: a valid
    /// configuration, the canonical corners for its radius, a registry that
    /// starts with those corners under the configured epsilon, and triangle ids
    /// below the mesh's id counter.
    fn try_from(parts: TriangulatorParts) -> Result<Self, Self::Error> {
        let TriangulatorParts {
            mesh,
            registry,
            config,
            corners,
            state,
        } = parts;

        config.validate()?;
        if corners != seed_corners(config.bounding_radius()) {
            return Err(TriangulationError::invalid_state(format!(
                "bounding corners {corners:?} do not match bounding radius {}",
                config.bounding_radius()
            )));
        }
        if registry.epsilon().to_bits() != config.epsilon().to_bits() {
            return Err(TriangulationError::invalid_state(format!(
                "registry epsilon {} differs from configured epsilon {}",
                registry.epsilon(),
                config.epsilon()
            )));
        }
        if !registry.as_slice().starts_with(&corners) {
            return Err(TriangulationError::invalid_state(
                "registry does not start with the bounding corners",
            ));
        }
        if let Some((id, _)) = mesh.iter_with_ids().find(|(id, _)| *id >= mesh.next_id()) {
            return Err(TriangulationError::invalid_state(format!(
                "triangle id {id} is not below the next id {}",
                mesh.next_id()
            )));
        }

        tracing::debug!(
            points = registry.len() - corners.len(),
            triangles = mesh.len(),
            ?state,
            "restored triangulator"
        );

        Ok(Self {
            mesh,
            registry,
            config,
            corners,
            state,
        })
    }
}

/// Corners `(R, R)`, `(-R, R)`, `(R, -R)`, `(-R, -R)` in registry order.
const fn seed_corners(r: f64) -> [Point; 4] {
    [
        Point::new(r, r),
        Point::new(-r, r),
        Point::new(r, -r),
        Point::new(-r, -r),
    ]
}

impl Triangulator {
    /// Triangulator with bounding half-width `bounding_radius` and
    /// [`DEFAULT_EPSILON`].
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::InvalidState`] if `bounding_radius` is not
    /// finite and positive.
    pub fn new(bounding_radius: f64) -> Result<Self, TriangulationError> {
        Self::with_config(TriangulatorConfig::new(bounding_radius))
    }

    /// Triangulator with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::InvalidState`] if the configuration is
    /// invalid.
    pub fn with_config(config: TriangulatorConfig) -> Result<Self, TriangulationError> {
        config.validate()?;
        let r = config.bounding_radius();

        // Registry order and diagonal follow the canonical seeding.
        let corners = seed_corners(r);
        let [top_right, top_left, bottom_right, bottom_left] = corners;

        let mut mesh = Mesh::new();
        mesh.insert(Triangle::new(top_left, top_right, bottom_right));
        mesh.insert(Triangle::new(top_left, bottom_left, bottom_right));

        let mut registry = PointRegistry::new(config.epsilon());
        for corner in corners {
            registry.add(corner);
        }

        tracing::debug!(
            bounding_radius = r,
            epsilon = config.epsilon(),
            "seeded bounding square"
        );

        Ok(Self {
            mesh,
            registry,
            config,
            corners,
            state: TriangulatorState::Open,
        })
    }

    /// Inserts the point `(x, y)`.
    ///
    /// Returns `Ok(true)` if the point was newly accepted and `Ok(false)` if it
    /// lies within epsilon of an already accepted point (including a bounding
    /// corner), in which case the mesh is unchanged.
    ///
    /// # Errors
    ///
    /// - [`TriangulationError::InvalidState`] after [`finalize`](Self::finalize)
    ///   or after a previous degenerate insertion.
    /// - [`TriangulationError::InvalidPoint`] for non-finite coordinates.
    /// - [`TriangulationError::DegenerateGeometry`] if a live triangle has no
    ///   circumcircle; the mesh is left untouched and the triangulator poisoned.
    pub fn add_point(&mut self, x: f64, y: f64) -> Result<bool, TriangulationError> {
        self.insert(Point::new(x, y))
    }

    /// Inserts `point`; see [`add_point`](Self::add_point).
    ///
    /// # Errors
    ///
    /// Same as [`add_point`](Self::add_point).
    pub fn insert(&mut self, point: Point) -> Result<bool, TriangulationError> {
        match self.state {
            TriangulatorState::Open => {}
            TriangulatorState::Finalized => {
                return Err(TriangulationError::invalid_state(
                    "cannot add points after finalize()",
                ));
            }
            TriangulatorState::Poisoned => {
                return Err(TriangulationError::invalid_state(
                    "cannot add points after a degenerate insertion",
                ));
            }
        }
        point.validate()?;

        if !self.registry.add(point) {
            return Ok(false);
        }

        let cavity = match extract_cavity(&self.mesh, &point, self.config.epsilon()) {
            Ok(cavity) => cavity,
            Err(source) => {
                self.state = TriangulatorState::Poisoned;
                tracing::warn!(%point, error = %source, "degenerate insertion, triangulator poisoned");
                return Err(TriangulationError::DegenerateGeometry { point, source });
            }
        };

        for &key in cavity.bad_triangles() {
            self.mesh.remove(key);
        }

        for edge in cavity.boundary() {
            self.mesh.insert(Triangle::new(edge.a(), point, edge.b()));
        }

        tracing::debug!(
            %point,
            removed = cavity.bad_triangles().len(),
            created = cavity.boundary().len(),
            triangles = self.mesh.len(),
            "inserted point"
        );
        Ok(true)
    }

    /// Inserts points in iteration order.
    ///
    /// Returns how many were newly accepted. Stops at the first error; points
    /// before it stay inserted.
    ///
    /// # Errors
    ///
    /// The first error returned by [`insert`](Self::insert).
    pub fn add_points<I, P>(&mut self, points: I) -> Result<usize, TriangulationError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut accepted = 0;
        for point in points {
            if self.insert(point.into())? {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// Removes every triangle touching a bounding corner and closes the
    /// triangulator.
    ///
    /// Corners are matched with the configured epsilon. Returns the number of
    /// removed triangles. Only call this once all points are inserted: the pruned
    /// triangles are needed for any later insertion.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::InvalidState`] if the triangulator is already
    /// finalized or poisoned.
    pub fn finalize(&mut self) -> Result<usize, TriangulationError> {
        match self.state {
            TriangulatorState::Open => {}
            TriangulatorState::Finalized => {
                return Err(TriangulationError::invalid_state(
                    "finalize() has already been called",
                ));
            }
            TriangulatorState::Poisoned => {
                return Err(TriangulationError::invalid_state(
                    "cannot finalize after a degenerate insertion",
                ));
            }
        }

        let eps = self.config.epsilon();
        let corners = self.corners;
        let removed = self
            .mesh
            .retain(|t| !corners.iter().any(|corner| t.has_vertex(corner, eps)));
        self.state = TriangulatorState::Finalized;

        tracing::debug!(
            removed,
            remaining = self.mesh.len(),
            "finalized triangulation"
        );
        Ok(removed)
    }

    /// Current triangles. Restartable and non-mutating.
    pub fn iterate_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.mesh.triangles().copied()
    }

    /// Alias of [`iterate_triangles`](Self::iterate_triangles).
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.iterate_triangles()
    }

    /// Current triangles with their ids.
    pub fn triangles_with_ids(&self) -> impl Iterator<Item = (TriangleId, Triangle)> + '_ {
        self.mesh.iter_with_ids().map(|(id, t)| (id, *t))
    }

    /// Number of live triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.mesh.len()
    }

    /// Number of accepted points, bounding corners excluded.
    #[must_use]
    pub fn number_of_points(&self) -> usize {
        self.registry.len() - self.corners.len()
    }

    /// Accepted points in insertion order, bounding corners excluded.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.registry.as_slice()[self.corners.len()..]
    }

    /// Every registered point, bounding corners first.
    #[must_use]
    pub fn registered_points(&self) -> &[Point] {
        self.registry.as_slice()
    }

    /// The seeded corners `(R, R)`, `(-R, R)`, `(R, -R)`, `(-R, -R)`.
    #[must_use]
    pub const fn bounding_corners(&self) -> [Point; 4] {
        self.corners
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &TriangulatorConfig {
        &self.config
    }

    /// The underlying mesh.
    #[must_use]
    pub const fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TriangulatorState {
        self.state
    }

    /// `true` once [`finalize`](Self::finalize) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == TriangulatorState::Finalized
    }

    /// `true` after a degenerate insertion.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.state == TriangulatorState::Poisoned
    }

    /// Checks the empty-circumcircle property against every registered point.
    ///
    /// # Errors
    ///
    /// Returns the first [`DelaunayValidationError`] found.
    pub fn validate_delaunay(&self) -> Result<(), DelaunayValidationError> {
        is_delaunay(&self.mesh, self.registry.as_slice())
    }
}

// =============================================================================
// TESTS
// =============================================================================
