use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::conic;
use crate::error::{DomainError, Element, ElementError};
use crate::mass::GravitationalMass;
use crate::position::OrbitalPosition;
use crate::solvers::wrap_mean_anomaly;

use super::validate_mu;

/// A perfectly circular orbit: `e = 0`, and the radius doubles as `a`, `p`,
/// `rp`, and `ra`.
///
/// Every element is derived at construction and immutable afterwards. The
/// circle is the one shape whose propagation needs no equation solver: the
/// true anomaly *is* the mean anomaly.
///
/// # Example
/// ```
/// use conic_orbits::{CircularOrbit, GravitationalMass};
///
/// let primary = GravitationalMass::from_gm(1.0).unwrap();
/// let probe = GravitationalMass::massless();
///
/// let orbit = CircularOrbit::from_radius(primary, probe, 2.0).unwrap();
///
/// assert_eq!(orbit.get_radius_at_true_anomaly(1.234), 2.0);
/// assert!(orbit.get_true_anomaly_at_radius(2.0).unwrap().is_nan());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircularOrbit {
    primary: GravitationalMass,
    secondary: GravitationalMass,
    mu: f64,
    radius: f64,
    angular_momentum: f64,
    mean_motion: f64,
    period: f64,
    speed: f64,
    epoch: f64,
}

impl CircularOrbit {
    /// Builds a circular orbit from its radius.
    pub fn from_radius(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        radius: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        if !(radius > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Radius,
                value: radius,
            });
        }
        Ok(Self::derive(primary, secondary, mu, radius))
    }

    /// Builds a circular orbit from its mean motion.
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
        let radius = conic::semi_major_axis_from_mean_motion(mu, mean_motion);
        Ok(Self::derive(primary, secondary, mu, radius))
    }

    /// Builds a circular orbit from its orbital period.
    pub fn from_period(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        period: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        if !(period > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Period,
                value: period,
            });
        }
        let radius = conic::semi_major_axis_from_period(mu, period);
        Ok(Self::derive(primary, secondary, mu, radius))
    }

    // Inputs are validated by the factories; the derivation order is
    // geometry, angular momentum, motion, speed.
    fn derive(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        mu: f64,
        radius: f64,
    ) -> Self {
        let angular_momentum = conic::angular_momentum(mu, radius);
        let mean_motion = conic::mean_motion(mu, radius);
        let period = conic::period_from_mean_motion(mean_motion);
        let speed = angular_momentum / radius;
        Self {
            primary,
            secondary,
            mu,
            radius,
            angular_momentum,
            mean_motion,
            period,
            speed,
            epoch: 0.0,
        }
    }

    /// Moves the reference epoch `t0` (the time at mean anomaly zero).
    pub fn at_epoch(mut self, epoch: f64) -> Self {
        self.epoch = epoch;
        self
    }

    /// The orbital radius. The true-anomaly argument carries no information
    /// on a circle and is ignored.
    pub fn get_radius_at_true_anomaly(&self, _true_anomaly: f64) -> f64 {
        self.radius
    }

    /// The inverse radius query, which is singular on a circle: every true
    /// anomaly maps to the same radius.
    ///
    /// An exact-radius match returns `Ok(NaN)` — the equation has no unique
    /// solution and the value carries no information, so callers must check
    /// for NaN explicitly. Any other radius is a [`DomainError`].
    pub fn get_true_anomaly_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        if radius == self.radius {
            Ok(f64::NAN)
        } else if radius < self.radius {
            Err(DomainError::BelowPeriapsis {
                radius,
                periapsis: self.radius,
            })
        } else {
            Err(DomainError::AboveApoapsis {
                radius,
                apoapsis: self.radius,
            })
        }
    }

    /// Propagates to time `t`.
    ///
    /// The mean anomaly `n (t - t0)` is range-reduced to (-pi, pi] and used
    /// directly as both eccentric and true anomaly; no solver runs.
    pub fn get_position_at_time(&self, time: f64) -> OrbitalPosition {
        let mean_anomaly = wrap_mean_anomaly(self.mean_motion * (time - self.epoch));
        let (sin_m, cos_m) = mean_anomaly.sin_cos();

        OrbitalPosition {
            time,
            mean_anomaly,
            eccentric_anomaly: mean_anomaly,
            position: DVec2::new(self.radius * cos_m, self.radius * sin_m),
            radius: self.radius,
            true_anomaly: mean_anomaly,
            velocity: DVec2::new(-self.speed * sin_m, self.speed * cos_m),
            speed: self.speed,
        }
    }

    /// The orbital speed for a given radius.
    ///
    /// On a circle only the fixed radius is reachable; anything else is a
    /// [`DomainError`].
    pub fn get_speed_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        if radius == self.radius {
            Ok(self.speed)
        } else if radius < self.radius {
            Err(DomainError::BelowPeriapsis {
                radius,
                periapsis: self.radius,
            })
        } else {
            Err(DomainError::AboveApoapsis {
                radius,
                apoapsis: self.radius,
            })
        }
    }

    /// The orbital speed, `sqrt(mu / r)`, constant around the circle.
    pub fn get_speed_at_true_anomaly(&self, _true_anomaly: f64) -> f64 {
        self.speed
    }

    /// The orbital radius.
    pub fn get_radius(&self) -> f64 {
        self.radius
    }

    /// The eccentricity; exactly zero by construction.
    pub fn get_eccentricity(&self) -> f64 {
        0.0
    }

    /// The semi-latus rectum; equals the radius.
    pub fn get_semi_latus_rectum(&self) -> f64 {
        self.radius
    }

    /// The semi-major axis; equals the radius.
    pub fn get_semi_major_axis(&self) -> f64 {
        self.radius
    }

    /// The periapsis distance; equals the radius.
    pub fn get_periapsis(&self) -> f64 {
        self.radius
    }

    /// The apoapsis distance; equals the radius.
    pub fn get_apoapsis(&self) -> f64 {
        self.radius
    }

    /// The mean motion, in radians per unit time.
    pub fn get_mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// The orbital period.
    pub fn get_period(&self) -> f64 {
        self.period
    }

    /// The specific angular momentum, `sqrt(mu r)`.
    pub fn get_angular_momentum(&self) -> f64 {
        self.angular_momentum
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

    /// The reference epoch `t0`.
    pub fn get_epoch(&self) -> f64 {
        self.epoch
    }
}
