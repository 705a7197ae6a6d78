//! Nonlinear-equation solvers for orbital timing.
//!
//! A generic bounded [Newton–Raphson](newton_raphson) loop backs the elliptic
//! and hyperbolic Kepler equations; the parabolic case never iterates, since
//! Barker's equation has a [closed-form cubic root](solve_barker).

use core::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConvergenceError;

/// The default convergence tolerance, in radians of anomaly.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// The default iteration cap for the Newton–Raphson loop.
///
/// This exists to prevent an infinite loop when the method fails to
/// converge; hitting it surfaces as a [`ConvergenceError`].
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Numeric-solver settings: convergence tolerance and iteration cap.
///
/// Every orbit shape that has to solve a transcendental Kepler equation
/// carries one of these; the default reproduces the engine-wide historical
/// tolerance of 1e-12 radians.
///
/// # Example
/// ```
/// use conic_orbits::SolverConfig;
///
/// let cfg = SolverConfig::default();
/// assert_eq!(cfg.tolerance, 1e-12);
///
/// let loose = SolverConfig { tolerance: 1e-6, ..cfg };
/// assert_eq!(loose.max_iterations, cfg.max_iterations);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Stop once the magnitude of the Newton step drops below this.
    pub tolerance: f64,
    /// Give up with a [`ConvergenceError`] after this many iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Finds a root of `f` by Newton–Raphson iteration.
///
/// Iterates `x <- x - f(x) / derivative(x)` from `initial_guess` until the
/// step magnitude drops below `config.tolerance`.
///
/// The caller must supply a function that is differentiable with a
/// non-vanishing derivative in the basin of the initial guess. The loop is
/// bounded by `config.max_iterations`; exhausting it, or stepping to a
/// non-finite value, returns a [`ConvergenceError`] instead of looping
/// forever.
pub fn newton_raphson(
    f: impl Fn(f64) -> f64,
    derivative: impl Fn(f64) -> f64,
    initial_guess: f64,
    config: &SolverConfig,
) -> Result<f64, ConvergenceError> {
    let mut x = initial_guess;
    let mut last_delta = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        let delta = f(x) / derivative(x);

        if !delta.is_finite() {
            return Err(ConvergenceError {
                iterations: iteration,
                last_delta: delta.abs(),
            });
        }

        x -= delta;
        last_delta = delta.abs();

        if last_delta < config.tolerance {
            return Ok(x);
        }
    }

    Err(ConvergenceError {
        iterations: config.max_iterations,
        last_delta,
    })
}

/// Solves the elliptic Kepler equation `E - e sin(E) = M` for the eccentric
/// anomaly `E`.
///
/// The mean anomaly itself seeds the iteration, which converges quickly for
/// eccentricities not too close to 1. Near `e -> 1` the basin narrows and a
/// [`ConvergenceError`] becomes possible.
pub fn elliptic_eccentric_anomaly(
    eccentricity: f64,
    mean_anomaly: f64,
    config: &SolverConfig,
) -> Result<f64, ConvergenceError> {
    newton_raphson(
        |ecc_anom| ecc_anom - eccentricity * ecc_anom.sin() - mean_anomaly,
        |ecc_anom| 1.0 - eccentricity * ecc_anom.cos(),
        mean_anomaly,
        config,
    )
}

/// Solves the hyperbolic Kepler equation `e sinh(H) - H = M` for the
/// hyperbolic anomaly `H`.
///
/// Seeded with the mean anomaly, like the elliptic case.
pub fn hyperbolic_eccentric_anomaly(
    eccentricity: f64,
    mean_anomaly: f64,
    config: &SolverConfig,
) -> Result<f64, ConvergenceError> {
    newton_raphson(
        |hyp_anom| eccentricity * hyp_anom.sinh() - hyp_anom - mean_anomaly,
        |hyp_anom| eccentricity * hyp_anom.cosh() - 1.0,
        mean_anomaly,
        config,
    )
}

/// Solves Barker's equation for a parabolic trajectory, returning
/// `D = tan(nu / 2)`.
///
/// Barker's equation in the parameter `D` reads `D^3 + 3D = 3M`, with
/// `M = sqrt(mu / (2 rp^3)) * (t - t0)`. The cubic is monotone, so Cardano's
/// formula gives the single real root directly:
///
/// ```text
/// W = 3M / 2
/// B = cbrt(W + sqrt(W^2 + 1))
/// D = B - 1/B
/// ```
///
/// (`B - 1/B` cubes to `2W - 3(B - 1/B)`, so `D^3 + 3D = 2W = 3M`.)
/// No iteration; exact to floating-point precision. The discriminant
/// `W^2 + 1` is always positive, so there is no failure case.
///
/// # Example
/// ```
/// use conic_orbits::solvers::solve_barker;
///
/// // At periapsis the anomaly is zero.
/// assert_eq!(solve_barker(0.0), 0.0);
/// ```
pub fn solve_barker(mean_anomaly: f64) -> f64 {
    let w = 1.5 * mean_anomaly;
    let b = (w + (w * w + 1.0).sqrt()).cbrt();
    b - b.recip()
}

/// Range-reduces a mean anomaly of a closed orbit to (-pi, pi].
///
/// Open trajectories pass their mean anomaly through unwrapped; this is only
/// meaningful where the motion is periodic.
pub(crate) fn wrap_mean_anomaly(mean_anomaly: f64) -> f64 {
    let mut wrapped = mean_anomaly % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}
