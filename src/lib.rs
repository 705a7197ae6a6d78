//! # Two-Body Conic Orbit Propagation
//! This library crate models two-body Keplerian orbits as immutable conic
//! sections and propagates them analytically: given the elements and a time,
//! it produces the exact position and velocity on the trajectory, with no
//! time-stepping and no accumulated integration error.
//!
//! All four conic shapes are first-class. A perfect circle, a closed
//! ellipse, a parabolic escape trajectory, and a hyperbolic flyby each get
//! their own struct with the formulas that are exact for that shape, rather
//! than one struct stretched across boundary cases where the shared formulas
//! degenerate. The shapes are collected in the closed [`OrbitShape`] union
//! for code that handles any of them.
//!
//! ## Getting started
//! The main types are:
//! - [`GravitationalMass`]: one participant of the two-body system, storing
//!   its standard gravitational parameter alongside the raw mass.
//! - [`CircularOrbit`], [`EllipticOrbit`], [`ParabolicOrbit`],
//!   [`HyperbolicOrbit`]: the four shapes. Each is built through factories
//!   that validate the inputs and derive every dependent element up front.
//! - [`OrbitShape`]: the closed union over the four shapes, dispatching the
//!   operations they share.
//! - [`Orbit`]: a shape plus a [`SpatialOrientation`], producing full 3D
//!   [`StateVectors`] at a time.
//!
//! ## Example
//!
//! ```rust
//! use conic_orbits::{EllipticOrbit, GravitationalMass, Orbit};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let primary = GravitationalMass::from_gm(1.0)?;
//! let probe = GravitationalMass::massless();
//!
//! // An ellipse with rp = 1 and ra = 3, in the reference plane.
//! let shape = EllipticOrbit::from_apsides(primary, probe, 1.0, 3.0)?;
//! let orbit = Orbit::new(shape.into());
//!
//! // At t = 0 the probe sits at periapsis on the +X axis.
//! let state = orbit.get_state_vectors_at_time(0.0)?;
//! assert!((state.position.x - 1.0).abs() < 1e-12);
//! assert!(state.position.y.abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod conic;
mod error;
mod mass;
mod orientation;
mod position;
pub mod solvers;

mod shapes;

#[cfg(test)]
mod tests;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use error::{ConvergenceError, DomainError, Element, ElementError};
pub use mass::{GravitationalMass, GRAVITATIONAL_CONSTANT};
pub use orientation::SpatialOrientation;
pub use position::{OrbitalPosition, StateVectors};
pub use shapes::{
    CircularOrbit, EllipticOrbit, HyperbolicOrbit, OrbitShape, ParabolicOrbit, ShapeKind,
};
pub use solvers::SolverConfig;

/// A shape placed in 3D space: the conic plus a [`SpatialOrientation`].
///
/// The shape owns the in-plane physics; the orientation owns the rotation
/// out of the reference plane. Composing the two yields full 3D state
/// vectors. The default orientation is the identity, which leaves the orbit
/// in the reference plane with periapsis on the +X axis.
///
/// # Example
/// ```
/// use core::f64::consts::FRAC_PI_2;
///
/// use conic_orbits::{CircularOrbit, GravitationalMass, Orbit, SpatialOrientation};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let primary = GravitationalMass::from_gm(1.0)?;
/// let probe = GravitationalMass::massless();
///
/// let shape = CircularOrbit::from_radius(primary, probe, 1.0)?;
/// let orbit = Orbit::new(shape.into())
///     .with_orientation(SpatialOrientation::new(FRAC_PI_2, 0.0, 0.0));
///
/// // A quarter period after epoch, the 90-degree inclination has carried
/// // the probe out of the plane onto the +Z axis.
/// let quarter = shape.get_period() / 4.0;
/// let state = orbit.get_state_vectors_at_time(quarter)?;
/// assert!(state.position.x.abs() < 1e-12);
/// assert!((state.position.z - 1.0).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orbit {
    shape: OrbitShape,
    orientation: SpatialOrientation,
}

impl Orbit {
    /// Places a shape in the reference plane (identity orientation).
    pub fn new(shape: OrbitShape) -> Self {
        Self {
            shape,
            orientation: SpatialOrientation::default(),
        }
    }

    /// Replaces the orientation.
    pub fn with_orientation(mut self, orientation: SpatialOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the orientation from the three angles: inclination, longitude
    /// of ascending node, argument of periapsis.
    pub fn set_orientation(&mut self, inclination: f64, long_asc_node: f64, arg_pe: f64) {
        self.orientation = SpatialOrientation::new(inclination, long_asc_node, arg_pe);
    }

    /// The underlying shape.
    pub fn get_shape(&self) -> &OrbitShape {
        &self.shape
    }

    /// The orientation in use.
    pub fn get_orientation(&self) -> &SpatialOrientation {
        &self.orientation
    }

    /// Propagates to time `t` and rotates the planar state into 3D.
    ///
    /// Both the position and the velocity go through the same rotation;
    /// lengths and speeds are unchanged by it.
    pub fn get_state_vectors_at_time(&self, time: f64) -> Result<StateVectors, ConvergenceError> {
        let planar = self.shape.get_position_at_time(time)?;
        Ok(StateVectors {
            position: self.orientation.transform(planar.position),
            velocity: self.orientation.transform(planar.velocity),
        })
    }
}

impl From<OrbitShape> for Orbit {
    fn from(shape: OrbitShape) -> Self {
        Self::new(shape)
    }
}
