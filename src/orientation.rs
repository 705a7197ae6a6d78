use glam::{DMat3, DVec2, DVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The Euler-angle orientation of an orbital plane in inertial space.
///
/// Holds the inclination, the longitude of the ascending node, and the
/// argument of periapsis, plus the derived "PQR" rotation matrix
/// `Rz(node) * Rx(inclination) * Rz(arg_pe)` — a 3-1-3 Euler sequence,
/// composed once at construction rather than applied angle by angle.
///
/// Applying the matrix to a planar perifocal vector (embedded with z = 0)
/// yields the inertial-frame vector. Any real angles are valid; there are
/// no error conditions here.
///
/// # Example
/// ```
/// use core::f64::consts::FRAC_PI_2;
/// use glam::{DVec2, DVec3};
///
/// use conic_orbits::SpatialOrientation;
///
/// // A 90-degree inclination turns in-plane +y into inertial +z.
/// let orientation = SpatialOrientation::new(FRAC_PI_2, 0.0, 0.0);
/// let tilted = orientation.transform(DVec2::new(0.0, 1.0));
///
/// assert!((tilted - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialOrientation {
    inclination: f64,
    long_asc_node: f64,
    arg_pe: f64,
    matrix: DMat3,
}

impl SpatialOrientation {
    /// Builds an orientation from the three angles, in radians, and
    /// precomputes the PQR matrix.
    pub fn new(inclination: f64, long_asc_node: f64, arg_pe: f64) -> Self {
        Self {
            inclination,
            long_asc_node,
            arg_pe,
            matrix: Self::pqr_matrix(inclination, long_asc_node, arg_pe),
        }
    }

    fn pqr_matrix(inclination: f64, long_asc_node: f64, arg_pe: f64) -> DMat3 {
        DMat3::from_rotation_z(long_asc_node)
            * DMat3::from_rotation_x(inclination)
            * DMat3::from_rotation_z(arg_pe)
    }

    /// Replaces the three angles and rebuilds the PQR matrix.
    pub fn set_orientation(&mut self, inclination: f64, long_asc_node: f64, arg_pe: f64) {
        *self = Self::new(inclination, long_asc_node, arg_pe);
    }

    /// Tilts a planar perifocal vector into the inertial frame.
    ///
    /// Works for positions and velocities alike; the transform is a pure
    /// rotation.
    pub fn transform(&self, planar: DVec2) -> DVec3 {
        self.matrix * planar.extend(0.0)
    }

    /// The inclination, in radians.
    pub fn get_inclination(&self) -> f64 {
        self.inclination
    }

    /// The longitude of the ascending node, in radians.
    pub fn get_long_asc_node(&self) -> f64 {
        self.long_asc_node
    }

    /// The argument of periapsis, in radians.
    pub fn get_arg_pe(&self) -> f64 {
        self.arg_pe
    }

    /// The precomputed PQR rotation matrix.
    pub fn get_matrix(&self) -> DMat3 {
        self.matrix
    }
}

impl Default for SpatialOrientation {
    /// The identity orientation: an untilted orbit whose plane is the
    /// reference plane.
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}
