use glam::{DVec2, DVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The plane-relative state produced by propagating an orbit to a time.
///
/// All coordinates live in the orbital plane (the perifocal frame), with the
/// x axis pointing at the periapsis. Project through a
/// [`SpatialOrientation`][crate::SpatialOrientation] to get inertial-frame
/// vectors.
///
/// The value is fully immutable and cheap to construct; the orbit does not
/// store it, a fresh one comes out of every propagation call.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalPosition {
    /// The evaluation time the state was propagated to.
    pub time: f64,

    /// The mean anomaly at that time, in radians.
    ///
    /// Range-reduced to (-pi, pi] for closed orbits; continuous and
    /// unbounded for open trajectories.
    pub mean_anomaly: f64,

    /// The auxiliary anomaly the Kepler solver produced: the eccentric
    /// anomaly `E` for an ellipse, the hyperbolic anomaly `H` for a
    /// hyperbola, and the Barker parameter `D = tan(nu / 2)` for a
    /// parabola. Equal to the mean anomaly on a circle.
    pub eccentric_anomaly: f64,

    /// Planar Cartesian position, periapsis along +x.
    pub position: DVec2,

    /// Distance from the focus.
    pub radius: f64,

    /// The true anomaly, in radians.
    pub true_anomaly: f64,

    /// Planar velocity.
    pub velocity: DVec2,

    /// The magnitude of the velocity.
    pub speed: f64,
}

/// A 3-D position/velocity pair in the inertial frame.
///
/// Produced by [`Orbit::get_state_vectors_at_time`][crate::Orbit::get_state_vectors_at_time]
/// after the planar state has been tilted through the orbit's PQR matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors {
    /// The 3-D position.
    pub position: DVec3,
    /// The 3-D velocity.
    pub velocity: DVec3,
}
