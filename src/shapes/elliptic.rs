use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::conic;
use crate::error::{ConvergenceError, DomainError, Element, ElementError};
use crate::mass::GravitationalMass;
use crate::position::OrbitalPosition;
use crate::solvers::{elliptic_eccentric_anomaly, wrap_mean_anomaly, SolverConfig};

use super::{validate_mu, ShapeKind};

/// A closed elliptic orbit, `0 <= e < 1`.
///
/// Every alternative parametrization is a factory that validates its inputs
/// and derives the full element tuple in one step — a partially-initialized
/// orbit is never observable. The derivation order is fixed: geometry
/// (a, p, rp, ra), then angular momentum, then motion (n, T), then the
/// periapsis speed.
///
/// `e = 0` is accepted (the half-open elliptic interval includes it) but a
/// perfect circle is better served by
/// [`CircularOrbit`][crate::CircularOrbit]; the two shapes agree exactly at
/// the boundary.
///
/// # Example
/// ```
/// use conic_orbits::{EllipticOrbit, GravitationalMass};
///
/// let primary = GravitationalMass::from_gm(1.0).unwrap();
/// let probe = GravitationalMass::massless();
///
/// let orbit = EllipticOrbit::from_apsides(primary, probe, 1.0, 3.0).unwrap();
///
/// assert_eq!(orbit.get_eccentricity(), 0.5);
/// assert_eq!(orbit.get_semi_major_axis(), 2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EllipticOrbit {
    primary: GravitationalMass,
    secondary: GravitationalMass,
    mu: f64,
    eccentricity: f64,
    semi_major_axis: f64,
    semi_latus_rectum: f64,
    periapsis: f64,
    apoapsis: f64,
    angular_momentum: f64,
    mean_motion: f64,
    period: f64,
    periapsis_speed: f64,
    epoch: f64,
    solver: SolverConfig,
}

fn validate_eccentricity(eccentricity: f64) -> Result<(), ElementError> {
    if conic::is_ellipse_eccentricity(eccentricity) {
        Ok(())
    } else {
        Err(ElementError::EccentricityOutOfRange {
            shape: ShapeKind::Elliptic,
            value: eccentricity,
        })
    }
}

impl EllipticOrbit {
    /// Builds an ellipse from its semi-major axis and eccentricity.
    pub fn from_semi_major_axis(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        semi_major_axis: f64,
        eccentricity: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        validate_eccentricity(eccentricity)?;
        if !(semi_major_axis > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::SemiMajorAxis,
                value: semi_major_axis,
            });
        }
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    /// Builds an ellipse from its mean motion and eccentricity.
    pub fn from_mean_motion(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        mean_motion: f64,
        eccentricity: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        validate_eccentricity(eccentricity)?;
        if !(mean_motion > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::MeanMotion,
                value: mean_motion,
            });
        }
        let semi_major_axis = conic::semi_major_axis_from_mean_motion(mu, mean_motion);
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    /// Builds an ellipse from its orbital period and eccentricity.
    pub fn from_period(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        period: f64,
        eccentricity: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        validate_eccentricity(eccentricity)?;
        if !(period > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Period,
                value: period,
            });
        }
        let semi_major_axis = conic::semi_major_axis_from_period(mu, period);
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    /// Builds an ellipse from its periapsis distance and eccentricity,
    /// via `a = rp / (1 - e)`.
    pub fn from_periapsis(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        periapsis: f64,
        eccentricity: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        validate_eccentricity(eccentricity)?;
        if !(periapsis > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Periapsis,
                value: periapsis,
            });
        }
        let semi_major_axis = periapsis / (1.0 - eccentricity);
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    /// Builds an ellipse from its apoapsis distance and eccentricity,
    /// via `a = ra / (1 + e)`.
    pub fn from_apoapsis(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        apoapsis: f64,
        eccentricity: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        validate_eccentricity(eccentricity)?;
        if !(apoapsis > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Apoapsis,
                value: apoapsis,
            });
        }
        let semi_major_axis = apoapsis / (1.0 + eccentricity);
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    /// Builds an ellipse from its periapsis distance and mean motion.
    ///
    /// The mean motion fixes the semi-major axis; the eccentricity follows
    /// as `e = 1 - rp / a` and must land in the elliptic interval, which
    /// requires `rp <= a`.
    pub fn from_periapsis_mean_motion(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        periapsis: f64,
        mean_motion: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        if !(periapsis > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Periapsis,
                value: periapsis,
            });
        }
        if !(mean_motion > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::MeanMotion,
                value: mean_motion,
            });
        }
        let semi_major_axis = conic::semi_major_axis_from_mean_motion(mu, mean_motion);
        let eccentricity = 1.0 - periapsis / semi_major_axis;
        validate_eccentricity(eccentricity)?;
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    /// Builds an ellipse from its apsis-distance pair, via
    /// `e = (ra - rp) / (ra + rp)` and `a = (ra + rp) / 2`.
    pub fn from_apsides(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        periapsis: f64,
        apoapsis: f64,
    ) -> Result<Self, ElementError> {
        let mu = validate_mu(&primary, &secondary)?;
        if !(periapsis > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Periapsis,
                value: periapsis,
            });
        }
        if !(apoapsis > 0.0) {
            return Err(ElementError::NonPositive {
                element: Element::Apoapsis,
                value: apoapsis,
            });
        }
        if apoapsis < periapsis {
            return Err(ElementError::ApsidesOutOfOrder {
                periapsis,
                apoapsis,
            });
        }
        let eccentricity = (apoapsis - periapsis) / (apoapsis + periapsis);
        let semi_major_axis = 0.5 * (periapsis + apoapsis);
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    // Inputs are validated by the factories. Order matters: geometry, then
    // angular momentum, then motion, then periapsis speed.
    fn derive(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        mu: f64,
        semi_major_axis: f64,
        eccentricity: f64,
    ) -> Self {
        let semi_latus_rectum = semi_major_axis * (1.0 - eccentricity * eccentricity);
        let periapsis = semi_major_axis * (1.0 - eccentricity);
        let apoapsis = semi_major_axis * (1.0 + eccentricity);
        let angular_momentum = conic::angular_momentum(mu, semi_latus_rectum);
        let mean_motion = conic::mean_motion(mu, semi_major_axis);
        let period = conic::period_from_mean_motion(mean_motion);
        let periapsis_speed = angular_momentum / periapsis;
        Self {
            primary,
            secondary,
            mu,
            eccentricity,
            semi_major_axis,
            semi_latus_rectum,
            periapsis,
            apoapsis,
            angular_momentum,
            mean_motion,
            period,
            periapsis_speed,
            epoch: 0.0,
            solver: SolverConfig::default(),
        }
    }

    /// Moves the epoch of periapsis passage `t0`.
    pub fn at_epoch(mut self, epoch: f64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Replaces the Kepler-solver settings.
    pub fn with_solver_config(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// The radius at a true anomaly, `r = p / (1 + e cos(nu))`.
    ///
    /// Bounded by the apsides: `rp <= r <= ra` for every angle.
    pub fn get_radius_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        conic::radius(self.semi_latus_rectum, self.eccentricity, true_anomaly)
    }

    /// The true anomaly at which the orbit reaches a radius; the algebraic
    /// inverse of [`get_radius_at_true_anomaly`][Self::get_radius_at_true_anomaly],
    /// returned as the principal value in [0, pi].
    ///
    /// Radii outside [rp, ra] are a [`DomainError`]. For the degenerate
    /// `e = 0` case the circular-orbit rule applies: an exact-radius match
    /// returns `Ok(NaN)` because every angle solves the equation.
    pub fn get_true_anomaly_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        if radius < self.periapsis {
            return Err(DomainError::BelowPeriapsis {
                radius,
                periapsis: self.periapsis,
            });
        }
        if radius > self.apoapsis {
            return Err(DomainError::AboveApoapsis {
                radius,
                apoapsis: self.apoapsis,
            });
        }
        if self.eccentricity == 0.0 {
            return Ok(f64::NAN);
        }
        let cos_nu = (self.semi_latus_rectum / radius - 1.0) / self.eccentricity;
        Ok(cos_nu.clamp(-1.0, 1.0).acos())
    }

    /// Propagates to time `t`.
    ///
    /// The mean anomaly `n (t - t0)` is range-reduced to (-pi, pi], solved
    /// to the eccentric anomaly through Kepler's equation, and converted to
    /// planar state with `x = a (cos E - e)`, `y = a sqrt(1 - e^2) sin E`.
    pub fn get_position_at_time(&self, time: f64) -> Result<OrbitalPosition, ConvergenceError> {
        let mean_anomaly = wrap_mean_anomaly(self.mean_motion * (time - self.epoch));
        let eccentric_anomaly =
            elliptic_eccentric_anomaly(self.eccentricity, mean_anomaly, &self.solver)?;

        let (sin_e, cos_e) = eccentric_anomaly.sin_cos();
        let axis_ratio = (1.0 - self.eccentricity * self.eccentricity).sqrt();

        let position = DVec2::new(
            self.semi_major_axis * (cos_e - self.eccentricity),
            self.semi_major_axis * axis_ratio * sin_e,
        );
        let radius = self.semi_major_axis * (1.0 - self.eccentricity * cos_e);
        let true_anomaly = position.y.atan2(position.x);

        // v = sqrt(mu a) / r * (-sin E, sqrt(1 - e^2) cos E)
        let velocity_scale = (self.mu * self.semi_major_axis).sqrt() / radius;
        let velocity = DVec2::new(
            -velocity_scale * sin_e,
            velocity_scale * axis_ratio * cos_e,
        );

        Ok(OrbitalPosition {
            time,
            mean_anomaly,
            eccentric_anomaly,
            position,
            radius,
            true_anomaly,
            velocity,
            speed: velocity.length(),
        })
    }

    /// The vis-viva speed at a radius, `sqrt(mu (2/r - 1/a))`.
    ///
    /// Radii outside [rp, ra] are a [`DomainError`].
    pub fn get_speed_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        if radius < self.periapsis {
            return Err(DomainError::BelowPeriapsis {
                radius,
                periapsis: self.periapsis,
            });
        }
        if radius > self.apoapsis {
            return Err(DomainError::AboveApoapsis {
                radius,
                apoapsis: self.apoapsis,
            });
        }
        Ok((self.mu * (2.0 / radius - 1.0 / self.semi_major_axis)).sqrt())
    }

    /// The vis-viva speed at a true anomaly.
    ///
    /// Cannot fail: every angle maps to a radius inside the apsides.
    pub fn get_speed_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        let radius = self.get_radius_at_true_anomaly(true_anomaly);
        (self.mu * (2.0 / radius - 1.0 / self.semi_major_axis)).sqrt()
    }

    /// The eccentricity.
    pub fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// The semi-major axis.
    pub fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// The semi-latus rectum, `p = a (1 - e^2)`.
    pub fn get_semi_latus_rectum(&self) -> f64 {
        self.semi_latus_rectum
    }

    /// The periapsis distance, `rp = a (1 - e)`.
    pub fn get_periapsis(&self) -> f64 {
        self.periapsis
    }

    /// The apoapsis distance, `ra = a (1 + e)`.
    pub fn get_apoapsis(&self) -> f64 {
        self.apoapsis
    }

    /// The specific angular momentum, `h = sqrt(mu p)`.
    pub fn get_angular_momentum(&self) -> f64 {
        self.angular_momentum
    }

    /// The mean motion, `n = sqrt(mu / a) / a`.
    pub fn get_mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// The orbital period, `T = 2 pi / n`.
    pub fn get_period(&self) -> f64 {
        self.period
    }

    /// The speed at periapsis, `h / rp`.
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

    /// The Kepler-solver settings in use.
    pub fn get_solver_config(&self) -> &SolverConfig {
        &self.solver
    }
}
