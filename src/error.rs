//! Error types for orbital-element validation, inverse queries, and the
//! numeric solvers.
//!
//! Every error here is terminal to the call that raised it: element errors
//! are raised by the shape factories *before* any orbit value exists, domain
//! errors are raised by inverse queries on an unreachable input, and
//! convergence errors come out of the bounded Newton loop. Nothing is
//! retried internally.

use core::fmt;

use thiserror::Error;

use crate::shapes::ShapeKind;

/// The orbital element (or physical input) an [`ElementError`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    /// A body mass, in kilograms.
    Mass,
    /// A gravitational parameter, GM.
    GravitationalParameter,
    /// The square root of a gravitational parameter.
    SqrtGravitationalParameter,
    /// A circular orbit radius.
    Radius,
    /// A semi-major axis (positive magnitude).
    SemiMajorAxis,
    /// A periapsis distance.
    Periapsis,
    /// An apoapsis distance.
    Apoapsis,
    /// A mean motion, in radians per unit time.
    MeanMotion,
    /// An orbital period.
    Period,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Mass => "mass",
            Element::GravitationalParameter => "gravitational parameter",
            Element::SqrtGravitationalParameter => "sqrt of gravitational parameter",
            Element::Radius => "radius",
            Element::SemiMajorAxis => "semi-major axis",
            Element::Periapsis => "periapsis",
            Element::Apoapsis => "apoapsis",
            Element::MeanMotion => "mean motion",
            Element::Period => "period",
        };
        f.write_str(name)
    }
}

/// A physically invalid input to a mass factory or an orbit-shape factory.
///
/// These are raised before any field of the orbit is populated, so a shape
/// value can never be observed in a partially-initialized state.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementError {
    /// A quantity that must be non-negative (a mass or gravitational
    /// parameter) was negative or NaN. Zero is legal and denotes a
    /// massless probe.
    #[error("{element} must be non-negative, got {value}")]
    Negative {
        /// The offending element.
        element: Element,
        /// The rejected value.
        value: f64,
    },

    /// A quantity that must be strictly positive (a distance, mean motion,
    /// or period) was zero, negative, or NaN.
    #[error("{element} must be positive, got {value}")]
    NonPositive {
        /// The offending element.
        element: Element,
        /// The rejected value.
        value: f64,
    },

    /// The eccentricity does not belong to the requested shape's interval.
    ///
    /// This is distinct from the generic range errors so callers can tell
    /// "wrong shape chosen" apart from "bad input": an ellipse wants
    /// `0 <= e < 1`, a hyperbola wants `e > 1`.
    #[error("eccentricity {value} is out of range for a {shape} orbit")]
    EccentricityOutOfRange {
        /// The shape whose factory rejected the value.
        shape: ShapeKind,
        /// The rejected eccentricity.
        value: f64,
    },

    /// An apsis-distance pair with the apoapsis below the periapsis.
    #[error("apoapsis {apoapsis} is smaller than periapsis {periapsis}")]
    ApsidesOutOfOrder {
        /// The given periapsis distance.
        periapsis: f64,
        /// The given apoapsis distance.
        apoapsis: f64,
    },
}

/// An inverse query was made with a value the orbit never reaches.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DomainError {
    /// The queried radius is below the periapsis distance.
    #[error("radius {radius} is below the periapsis {periapsis}")]
    BelowPeriapsis {
        /// The queried radius.
        radius: f64,
        /// The orbit's periapsis distance.
        periapsis: f64,
    },

    /// The queried radius is above the apoapsis distance of a closed orbit.
    #[error("radius {radius} is above the apoapsis {apoapsis}")]
    AboveApoapsis {
        /// The queried radius.
        radius: f64,
        /// The orbit's apoapsis distance.
        apoapsis: f64,
    },

    /// The queried true anomaly lies at or beyond the asymptote of a
    /// hyperbolic trajectory.
    #[error("true anomaly {true_anomaly} is at or beyond the asymptote {asymptote}")]
    BeyondAsymptote {
        /// The queried true anomaly, in radians.
        true_anomaly: f64,
        /// The asymptotic true-anomaly bound, `acos(-1/e)`.
        asymptote: f64,
    },
}

/// The Newton–Raphson loop ran out of iterations before the step size
/// dropped below the configured tolerance.
///
/// The basin of convergence narrows near `e -> 1` with the mean anomaly as
/// the initial seed, so callers propagating near-parabolic orbits should be
/// prepared to see this; widening [`SolverConfig`][crate::SolverConfig] is
/// the usual remedy.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("solver did not converge within {iterations} iterations (last step {last_delta:e})")]
pub struct ConvergenceError {
    /// How many iterations ran before giving up.
    pub iterations: u32,
    /// The magnitude of the last Newton step taken.
    pub last_delta: f64,
}
