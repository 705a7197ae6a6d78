//! Stateless conic-section formulae shared by all four orbit shapes.
//!
//! These are the pure building blocks the shape factories compose, in a
//! fixed order: geometry (p, a, rp/ra) first, then the angular-momentum
//! auxiliary, then motion (n, T), then the periapsis speed. Later
//! derivations depend on earlier ones.

use core::f64::consts::{PI, TAU};

/// The conic-section radius at a true anomaly: `r = p / (1 + e cos(nu))`.
///
/// Valid for every shape; for a hyperbola the caller is responsible for
/// staying inside the asymptotic bound, beyond which the denominator turns
/// non-positive.
#[inline]
pub fn radius(semi_latus_rectum: f64, eccentricity: f64, true_anomaly: f64) -> f64 {
    semi_latus_rectum / (1.0 + eccentricity * true_anomaly.cos())
}

/// The semi-major axis magnitude from the mean motion: `a = cbrt(mu / n^2)`.
///
/// Always returns a positive magnitude; for hyperbolas any sign convention
/// is the caller's business.
#[inline]
pub fn semi_major_axis_from_mean_motion(mu: f64, mean_motion: f64) -> f64 {
    (mu / (mean_motion * mean_motion)).cbrt()
}

/// The semi-major axis from the orbital period:
/// `a = cbrt(mu T^2 / (4 pi^2))`.
#[inline]
pub fn semi_major_axis_from_period(mu: f64, period: f64) -> f64 {
    (mu * period * period / (4.0 * PI * PI)).cbrt()
}

/// The mean motion from the semi-major axis magnitude:
/// `n = sqrt(mu / a) / a`.
///
/// Shared by the ellipse and the hyperbola (pass `|a|` for the latter).
#[inline]
pub fn mean_motion(mu: f64, semi_major_axis: f64) -> f64 {
    (mu / semi_major_axis).sqrt() / semi_major_axis
}

/// The orbital period of a closed orbit: `T = 2 pi / n`.
#[inline]
pub fn period_from_mean_motion(mean_motion: f64) -> f64 {
    TAU / mean_motion
}

/// The mean motion of a closed orbit from its period: `n = 2 pi / T`.
#[inline]
pub fn mean_motion_from_period(period: f64) -> f64 {
    TAU / period
}

/// The escape velocity at a radius: `v = sqrt(2 mu / r)`.
///
/// This is also the exact speed everywhere on a parabolic trajectory.
#[inline]
pub fn escape_velocity(mu: f64, radius: f64) -> f64 {
    (2.0 * mu / radius).sqrt()
}

/// The specific angular momentum from the semi-latus rectum:
/// `h = sqrt(mu p)`.
#[inline]
pub fn angular_momentum(mu: f64, semi_latus_rectum: f64) -> f64 {
    (mu * semi_latus_rectum).sqrt()
}

/// Whether an eccentricity belongs to the (possibly circular) elliptic
/// regime, `0 <= e < 1`.
#[inline]
pub fn is_ellipse_eccentricity(eccentricity: f64) -> bool {
    (0.0..1.0).contains(&eccentricity)
}

/// Whether an eccentricity belongs to the hyperbolic regime, `e > 1`.
#[inline]
pub fn is_hyperbola_eccentricity(eccentricity: f64) -> bool {
    eccentricity > 1.0
}
