use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::conic;
use crate::error::{DomainError, Element, ElementError};
use crate::mass::GravitationalMass;
use crate::position::OrbitalPosition;
use crate::solvers::solve_barker;

use super::validate_mu;

/// A parabolic escape trajectory: `e = 1` exactly.
///
/// The semi-major axis is undefined (infinite) and never stored; the
/// geometry hangs off the periapsis distance alone, with `p = 2 rp`. Timing
/// uses the parabolic mean motion `n = sqrt(mu / (2 rp^3))`, and propagation
/// is fully closed-form through Barker's equation — no numeric solver, so
/// none of the methods here can fail to converge.
///
/// The speed everywhere on the trajectory is exactly the local escape
/// velocity `sqrt(2 mu / r)`.
///
/// # Example
/// ```
/// use core::f64::consts::FRAC_PI_2;
///
/// use conic_orbits::{GravitationalMass, ParabolicOrbit};
///
/// let primary = GravitationalMass::from_gm(1.0).unwrap();
/// let probe = GravitationalMass::massless();
///
/// let orbit = ParabolicOrbit::from_periapsis(primary, probe, 2.0).unwrap();
///
/// // p = 2 rp = 4, and r(pi/2) = p.
/// assert_eq!(orbit.get_radius_at_true_anomaly(FRAC_PI_2), 4.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParabolicOrbit {
    primary: GravitationalMass,
    secondary: GravitationalMass,
    mu: f64,
    periapsis: f64,
    semi_latus_rectum: f64,
    angular_momentum: f64,
    mean_motion: f64,
    periapsis_speed: f64,
    epoch: f64,
}

impl ParabolicOrbit {
    /// Builds a parabola from its periapsis distance.
    pub fn from_periapsis(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        periapsis: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        if !(periapsis > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Periapsis,
                value: periapsis,
            });
        }
        Ok(Self::derive(primary, secondary, mu, periapsis))
    }

    /// Builds a parabola from its mean motion, via
    /// `rp = cbrt(mu / (2 n^2))`.
    pub fn from_mean_motion(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        mean_motion: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        if !(mean_motion > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::MeanMotion,
                value: mean_motion,
            });
        }
        let periapsis = (mu / (2.0 * mean_motion * mean_motion)).cbrt();
        Ok(Self::derive(primary, secondary, mu, periapsis))
    }

    fn derive(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        mu: f64,
        periapsis: f64,
    ) -> Self {
        let semi_latus_rectum = 2.0 * periapsis;
        let angular_momentum = conic::angular_momentum(mu, semi_latus_rectum);
        let mean_motion = (mu / (2.0 * periapsis.powi(3))).sqrt();
        let periapsis_speed = conic::escape_velocity(mu, periapsis);
        Self {
            primary,
            secondary,
            mu,
            periapsis,
            semi_latus_rectum,
            angular_momentum,
            mean_motion,
            periapsis_speed,
            epoch: 0.0,
        }
    }

    /// Moves the epoch of periapsis passage `t0`.
    pub fn at_epoch(mut self, epoch: f64) -> Self {
        self.epoch = epoch;
        self
    }

    /// The radius at a true anomaly, `r = p / (1 + cos(nu))`.
    ///
    /// Diverges to infinity as `nu` approaches pi, the parabola's open end.
    pub fn get_radius_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        conic::radius(self.semi_latus_rectum, 1.0, true_anomaly)
    }

    /// The true anomaly at which the trajectory reaches a radius, as the
    /// principal value in [0, pi).
    ///
    /// Radii below the periapsis are a [`DomainError`]; there is no upper
    /// bound on an open trajectory.
    pub fn get_true_anomaly_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        if radius < self.periapsis {
            return Err(DomainError::BelowPeriapsis {
                radius,
                periapsis: self.periapsis,
            });
        }
        let cos_nu = self.semi_latus_rectum / radius - 1.0;
        Ok(cos_nu.clamp(-1.0, 1.0).acos())
    }

    /// Propagates to time `t`.
    ///
    /// The mean anomaly `n (t - t0)` stays unwrapped (the trajectory is not
    /// periodic), Barker's equation yields `D = tan(nu / 2)` in closed form,
    /// and the planar state follows from `x = rp (1 - D^2)`, `y = 2 rp D`.
    /// The stored eccentric anomaly is the Barker parameter `D`.
    pub fn get_position_at_time(&self, time: f64) -> OrbitalPosition {
        let mean_anomaly = self.mean_motion * (time - self.epoch);
        let barker = solve_barker(mean_anomaly);

        let position = DVec2::new(
            self.periapsis * (1.0 - barker * barker),
            2.0 * self.periapsis * barker,
        );
        let radius = self.periapsis * (1.0 + barker * barker);
        let true_anomaly = 2.0 * barker.atan();

        // v = mu / h * (-sin nu, 1 + cos nu); |v| is the escape velocity.
        let (sin_nu, cos_nu) = true_anomaly.sin_cos();
        let velocity_scale = self.mu / self.angular_momentum;
        let velocity = DVec2::new(
            -velocity_scale * sin_nu,
            velocity_scale * (1.0 + cos_nu),
        );

        OrbitalPosition {
            time,
            mean_anomaly,
            eccentric_anomaly: barker,
            position,
            radius,
            true_anomaly,
            velocity,
            speed: conic::escape_velocity(self.mu, radius),
        }
    }

    /// The speed at a radius: exactly the escape velocity
    /// `sqrt(2 mu / r)`.
    ///
    /// Radii below the periapsis are a [`DomainError`].
    pub fn get_speed_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        if radius < self.periapsis {
            return Err(DomainError::BelowPeriapsis {
                radius,
                periapsis: self.periapsis,
            });
        }
        Ok(conic::escape_velocity(self.mu, radius))
    }

    /// The speed at a true anomaly: the escape velocity at that angle's
    /// radius, tending to zero as `nu` approaches pi.
    pub fn get_speed_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        conic::escape_velocity(self.mu, self.get_radius_at_true_anomaly(true_anomaly))
    }

    /// The eccentricity; exactly one by construction.
    pub fn get_eccentricity(&self) -> f64 {
        1.0
    }

    /// The periapsis distance.
    pub fn get_periapsis(&self) -> f64 {
        self.periapsis
    }

    /// The semi-latus rectum, `p = 2 rp`.
    pub fn get_semi_latus_rectum(&self) -> f64 {
        self.semi_latus_rectum
    }

    /// The specific angular momentum, `h = sqrt(mu p)`.
    pub fn get_angular_momentum(&self) -> f64 {
        self.angular_momentum
    }

    /// The parabolic mean motion, `n = sqrt(mu / (2 rp^3))`.
    pub fn get_mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// The speed at periapsis, `sqrt(2 mu / rp)`.
    pub fn get_periapsis_speed(&self) -> f64 {
        self.periapsis_speed
    }

    /// The combined gravitational parameter `mu` the orbit was built with.
    pub fn get_gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// The central body.
    pub fn get_primary(&self) -> &GravitationalMass {
        &self.primary
    }

    /// The orbiting body.
    pub fn get_secondary(&self) -> &GravitationalMass {
        &self.secondary
    }

    /// The epoch of periapsis passage `t0`.
    pub fn get_epoch(&self) -> f64 {
        self.epoch
    }
}
