#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Element, ElementError};

/// The Newtonian gravitational constant G, in m^3 kg^-1 s^-2.
///
/// CODATA 2018 value.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// A validated wrapper around a body's gravitational strength.
///
/// Exactly one of the three representations — mass `M`, gravitational
/// parameter `GM`, or `sqrt(GM)` — is the canonical input; the other two are
/// derived at construction so all three stay mutually consistent. The value
/// is immutable once built: construction is the only mutation point.
///
/// A zero mass is legal and models a massless probe whose own gravity is
/// negligible next to the central body's.
///
/// # Example
/// ```
/// use conic_orbits::GravitationalMass;
///
/// let sun = GravitationalMass::from_gm(1.327_124_400_18e20).unwrap();
/// let probe = GravitationalMass::massless();
///
/// assert_eq!(sun.combined_parameter(&probe), sun.gm());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GravitationalMass {
    mass: f64,
    gm: f64,
    sqrt_gm: f64,
}

impl GravitationalMass {
    /// Builds from a body mass in kilograms, deriving `GM = G * M`.
    ///
    /// Fails if the mass is negative or NaN.
    pub fn from_mass(mass: f64) -> Result<Self, ElementError> {
        if !(mass >= 0.0) {
            return Err(ElementError::Negative {
                element: Element::Mass,
                value: mass,
            });
        }
        let gm = GRAVITATIONAL_CONSTANT * mass;
        Ok(Self {
            mass,
            gm,
            sqrt_gm: gm.sqrt(),
        })
    }

    /// Builds from a gravitational parameter `GM`, deriving the mass.
    ///
    /// This is the usual entry point in practice, since `GM` is known to far
    /// better precision than G and M separately.
    ///
    /// Fails if the parameter is negative or NaN.
    pub fn from_gm(gm: f64) -> Result<Self, ElementError> {
        if !(gm >= 0.0) {
            return Err(ElementError::Negative {
                element: Element::GravitationalParameter,
                value: gm,
            });
        }
        Ok(Self {
            mass: gm / GRAVITATIONAL_CONSTANT,
            gm,
            sqrt_gm: gm.sqrt(),
        })
    }

    /// Builds from `sqrt(GM)`, deriving the parameter and the mass.
    ///
    /// Fails if the value is negative or NaN.
    pub fn from_sqrt_gm(sqrt_gm: f64) -> Result<Self, ElementError> {
        if !(sqrt_gm >= 0.0) {
            return Err(ElementError::Negative {
                element: Element::SqrtGravitationalParameter,
                value: sqrt_gm,
            });
        }
        let gm = sqrt_gm * sqrt_gm;
        Ok(Self {
            mass: gm / GRAVITATIONAL_CONSTANT,
            gm,
            sqrt_gm,
        })
    }

    /// A massless probe: all three representations are zero.
    pub fn massless() -> Self {
        Self {
            mass: 0.0,
            gm: 0.0,
            sqrt_gm: 0.0,
        }
    }

    /// The body mass, in kilograms.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// The gravitational parameter `GM`.
    pub fn gm(&self) -> f64 {
        self.gm
    }

    /// The square root of the gravitational parameter.
    pub fn sqrt_gm(&self) -> f64 {
        self.sqrt_gm
    }

    /// The two-body coupling constant `mu = GM_self + GM_other`.
    ///
    /// This is the only way the orbit engine consumes a pair of masses.
    pub fn combined_parameter(&self, other: &Self) -> f64 {
        self.gm + other.gm
    }
}
