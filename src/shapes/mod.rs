//! The four conic-section orbit shapes and their closed tagged union.
//!
//! A shape is fixed at construction — there are no transitions between
//! shapes on one value, and no field-by-field mutation. The formulas the
//! shapes share diverge at the exact boundary eccentricities (e = 0, e = 1),
//! so the shapes are a closed enum over four concrete structs rather than a
//! trait hierarchy: dispatch is an exhaustive `match` the compiler checks.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod circular;
mod elliptic;
mod hyperbolic;
mod parabolic;

pub use circular::CircularOrbit;
pub use elliptic::EllipticOrbit;
pub use hyperbolic::HyperbolicOrbit;
pub use parabolic::ParabolicOrbit;

use crate::error::{ConvergenceError, DomainError, Element, ElementError};
use crate::mass::GravitationalMass;
use crate::position::OrbitalPosition;

/// The bare shape tag, without elements. Also used inside error values to
/// name which shape's factory rejected an eccentricity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    /// `e = 0`.
    Circular,
    /// `0 <= e < 1`.
    Elliptic,
    /// `e = 1` exactly.
    Parabolic,
    /// `e > 1`.
    Hyperbolic,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Circular => "circular",
            ShapeKind::Elliptic => "elliptic",
            ShapeKind::Parabolic => "parabolic",
            ShapeKind::Hyperbolic => "hyperbolic",
        })
    }
}

// Shared by every factory: the two masses couple into the engine only
// through mu, which must be positive for any motion to exist.
pub(crate) fn validate_mu(
    primary: &GravitationalMass,
    secondary: &GravitationalMass,
) -> Result<f64, ElementError> {
    let mu = primary.combined_parameter(secondary);
    if !(mu > 0.0) {
        return Err(ElementError::NonPositive {
            element: Element::GravitationalParameter,
            value: mu,
        });
    }
    Ok(mu)
}

/// An orbit of any of the four conic shapes.
///
/// This is the engine's main sum type: construct one of the four concrete
/// shapes through its factories and convert with `From`/`Into`, or match on
/// the variants directly when shape-specific data (an apoapsis, an
/// asymptote) is needed.
///
/// The common operations below dispatch exhaustively; variants whose
/// operation cannot fail are wrapped in `Ok` so the union presents one
/// signature.
///
/// # Example
/// ```
/// use conic_orbits::{EllipticOrbit, GravitationalMass, OrbitShape};
///
/// let primary = GravitationalMass::from_gm(1.0).unwrap();
/// let probe = GravitationalMass::massless();
///
/// let shape: OrbitShape = EllipticOrbit::from_apsides(primary, probe, 1.0, 3.0)
///     .unwrap()
///     .into();
///
/// assert_eq!(shape.get_periapsis(), 1.0);
/// assert_eq!(shape.get_apoapsis(), Some(3.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrbitShape {
    /// A perfect circle.
    Circular(CircularOrbit),
    /// A closed ellipse.
    Elliptic(EllipticOrbit),
    /// A parabolic escape trajectory.
    Parabolic(ParabolicOrbit),
    /// A hyperbolic flyby trajectory.
    Hyperbolic(HyperbolicOrbit),
}

impl OrbitShape {
    /// The bare shape tag.
    pub fn kind(&self) -> ShapeKind {
        match self {
            OrbitShape::Circular(_) => ShapeKind::Circular,
            OrbitShape::Elliptic(_) => ShapeKind::Elliptic,
            OrbitShape::Parabolic(_) => ShapeKind::Parabolic,
            OrbitShape::Hyperbolic(_) => ShapeKind::Hyperbolic,
        }
    }

    /// The eccentricity.
    pub fn get_eccentricity(&self) -> f64 {
        match self {
            OrbitShape::Circular(orbit) => orbit.get_eccentricity(),
            OrbitShape::Elliptic(orbit) => orbit.get_eccentricity(),
            OrbitShape::Parabolic(orbit) => orbit.get_eccentricity(),
            OrbitShape::Hyperbolic(orbit) => orbit.get_eccentricity(),
        }
    }

    /// The semi-latus rectum.
    pub fn get_semi_latus_rectum(&self) -> f64 {
        match self {
            OrbitShape::Circular(orbit) => orbit.get_semi_latus_rectum(),
            OrbitShape::Elliptic(orbit) => orbit.get_semi_latus_rectum(),
            OrbitShape::Parabolic(orbit) => orbit.get_semi_latus_rectum(),
            OrbitShape::Hyperbolic(orbit) => orbit.get_semi_latus_rectum(),
        }
    }

    /// The periapsis distance; defined and positive for every shape.
    pub fn get_periapsis(&self) -> f64 {
        match self {
            OrbitShape::Circular(orbit) => orbit.get_periapsis(),
            OrbitShape::Elliptic(orbit) => orbit.get_periapsis(),
            OrbitShape::Parabolic(orbit) => orbit.get_periapsis(),
            OrbitShape::Hyperbolic(orbit) => orbit.get_periapsis(),
        }
    }

    /// The apoapsis distance, for the closed shapes; `None` on open
    /// trajectories.
    pub fn get_apoapsis(&self) -> Option<f64> {
        match self {
            OrbitShape::Circular(orbit) => Some(orbit.get_apoapsis()),
            OrbitShape::Elliptic(orbit) => Some(orbit.get_apoapsis()),
            OrbitShape::Parabolic(_) | OrbitShape::Hyperbolic(_) => None,
        }
    }

    /// The orbital period, for the closed shapes; `None` on open
    /// trajectories.
    pub fn get_period(&self) -> Option<f64> {
        match self {
            OrbitShape::Circular(orbit) => Some(orbit.get_period()),
            OrbitShape::Elliptic(orbit) => Some(orbit.get_period()),
            OrbitShape::Parabolic(_) | OrbitShape::Hyperbolic(_) => None,
        }
    }

    /// The mean motion.
    pub fn get_mean_motion(&self) -> f64 {
        match self {
            OrbitShape::Circular(orbit) => orbit.get_mean_motion(),
            OrbitShape::Elliptic(orbit) => orbit.get_mean_motion(),
            OrbitShape::Parabolic(orbit) => orbit.get_mean_motion(),
            OrbitShape::Hyperbolic(orbit) => orbit.get_mean_motion(),
        }
    }

    /// The combined gravitational parameter `mu`.
    pub fn get_gravitational_parameter(&self) -> f64 {
        match self {
            OrbitShape::Circular(orbit) => orbit.get_gravitational_parameter(),
            OrbitShape::Elliptic(orbit) => orbit.get_gravitational_parameter(),
            OrbitShape::Parabolic(orbit) => orbit.get_gravitational_parameter(),
            OrbitShape::Hyperbolic(orbit) => orbit.get_gravitational_parameter(),
        }
    }

    /// The radius at a true anomaly (the circular shape ignores the
    /// argument).
    pub fn get_radius_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        match self {
            OrbitShape::Circular(orbit) => orbit.get_radius_at_true_anomaly(true_anomaly),
            OrbitShape::Elliptic(orbit) => orbit.get_radius_at_true_anomaly(true_anomaly),
            OrbitShape::Parabolic(orbit) => orbit.get_radius_at_true_anomaly(true_anomaly),
            OrbitShape::Hyperbolic(orbit) => orbit.get_radius_at_true_anomaly(true_anomaly),
        }
    }

    /// The true anomaly at which the orbit reaches a radius.
    ///
    /// Unreachable radii are a [`DomainError`]; on a circular orbit an
    /// exact match returns `Ok(NaN)` (no unique solution — check for NaN
    /// explicitly).
    pub fn get_true_anomaly_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        match self {
            OrbitShape::Circular(orbit) => orbit.get_true_anomaly_at_radius(radius),
            OrbitShape::Elliptic(orbit) => orbit.get_true_anomaly_at_radius(radius),
            OrbitShape::Parabolic(orbit) => orbit.get_true_anomaly_at_radius(radius),
            OrbitShape::Hyperbolic(orbit) => orbit.get_true_anomaly_at_radius(radius),
        }
    }

    /// Propagates to time `t`, producing the plane-relative state.
    ///
    /// Only the shapes that run a Newton solver (elliptic, hyperbolic) can
    /// actually fail; the circle and the parabola are closed-form and always
    /// return `Ok`.
    pub fn get_position_at_time(&self, time: f64) -> Result<OrbitalPosition, ConvergenceError> {
        match self {
            OrbitShape::Circular(orbit) => Ok(orbit.get_position_at_time(time)),
            OrbitShape::Elliptic(orbit) => orbit.get_position_at_time(time),
            OrbitShape::Parabolic(orbit) => Ok(orbit.get_position_at_time(time)),
            OrbitShape::Hyperbolic(orbit) => orbit.get_position_at_time(time),
        }
    }

    /// The orbital speed at a radius, via the vis-viva family.
    pub fn get_speed_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        match self {
            OrbitShape::Circular(orbit) => orbit.get_speed_at_radius(radius),
            OrbitShape::Elliptic(orbit) => orbit.get_speed_at_radius(radius),
            OrbitShape::Parabolic(orbit) => orbit.get_speed_at_radius(radius),
            OrbitShape::Hyperbolic(orbit) => orbit.get_speed_at_radius(radius),
        }
    }

    /// The orbital speed at a true anomaly.
    ///
    /// Only the hyperbola can fail, for angles at or beyond its asymptote.
    pub fn get_speed_at_true_anomaly(&self, true_anomaly: f64) -> Result<f64, DomainError> {
        match self {
            OrbitShape::Circular(orbit) => Ok(orbit.get_speed_at_true_anomaly(true_anomaly)),
            OrbitShape::Elliptic(orbit) => Ok(orbit.get_speed_at_true_anomaly(true_anomaly)),
            OrbitShape::Parabolic(orbit) => Ok(orbit.get_speed_at_true_anomaly(true_anomaly)),
            OrbitShape::Hyperbolic(orbit) => orbit.get_speed_at_true_anomaly(true_anomaly),
        }
    }
}

impl From<CircularOrbit> for OrbitShape {
    fn from(orbit: CircularOrbit) -> Self {
        OrbitShape::Circular(orbit)
    }
}

impl From<EllipticOrbit> for OrbitShape {
    fn from(orbit: EllipticOrbit) -> Self {
        OrbitShape::Elliptic(orbit)
    }
}

impl From<ParabolicOrbit> for OrbitShape {
    fn from(orbit: ParabolicOrbit) -> Self {
        OrbitShape::Parabolic(orbit)
    }
}

impl From<HyperbolicOrbit> for OrbitShape {
    fn from(orbit: HyperbolicOrbit) -> Self {
        OrbitShape::Hyperbolic(orbit)
    }
}
