use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::conic;
use crate::error::{ConvergenceError, DomainError, Element, ElementError};
use crate::mass::GravitationalMass;
use crate::position::OrbitalPosition;
use crate::solvers::{hyperbolic_eccentric_anomaly, SolverConfig};

use super::{validate_mu, ShapeKind};

/// A hyperbolic flyby trajectory: `e > 1`.
///
/// The semi-major axis is stored as a **positive magnitude** alongside the
/// shape tag; the textbook `a < 0` convention for hyperbolas appears nowhere
/// in the stored state, and the sign is folded into the formulas where an
/// identity needs it (`p = |a| (e^2 - 1)`, `rp = |a| (e - 1)`,
/// `x = |a| (e - cosh H)`). There is no apoapsis and no period.
///
/// True anomalies are bounded by the asymptote `acos(-1/e)`: the radius
/// diverges as the angle approaches it, and inverse queries can never return
/// an angle at or beyond it.
///
/// # Example
/// ```
/// use core::f64::consts::FRAC_PI_3;
///
/// use conic_orbits::{GravitationalMass, HyperbolicOrbit};
///
/// let primary = GravitationalMass::from_gm(1.0).unwrap();
/// let probe = GravitationalMass::massless();
///
/// let orbit = HyperbolicOrbit::from_periapsis(primary, probe, 2.0, 2.0).unwrap();
///
/// // p = |a|(e^2 - 1) = 6, and r(pi/3) = 6 / (1 + 2 cos(pi/3)) = 3.
/// assert!((orbit.get_radius_at_true_anomaly(FRAC_PI_3) - 3.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HyperbolicOrbit {
    primary: GravitationalMass,
    secondary: GravitationalMass,
    mu: f64,
    eccentricity: f64,
    /// Positive magnitude; see the type-level docs for the sign convention.
    semi_major_axis: f64,
    semi_latus_rectum: f64,
    periapsis: f64,
    asymptote: f64,
    angular_momentum: f64,
    mean_motion: f64,
    periapsis_speed: f64,
    epoch: f64,
    solver: SolverConfig,
}

fn validate_eccentricity(eccentricity: f64) -> Result<(), ElementError> {
    if conic::is_hyperbola_eccentricity(eccentricity) {
        Ok(())
    } else {
        Err(ElementError::EccentricityOutOfRange {
            shape: ShapeKind::Hyperbolic,
            value: eccentricity,
        })
    }
}

impl HyperbolicOrbit {
    /// Builds a hyperbola from its semi-major-axis magnitude and
    /// eccentricity.
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

    /// Builds a hyperbola from its periapsis distance and eccentricity,
    /// via `|a| = rp / (e - 1)`.
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
        let semi_major_axis = periapsis / (eccentricity - 1.0);
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    /// Builds a hyperbola from its mean motion and eccentricity, via
    /// `|a| = cbrt(mu / n^2)`.
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

    /// Builds a hyperbola from its periapsis distance and mean motion.
    ///
    /// The mean motion fixes `|a|`; the eccentricity follows as
    /// `e = 1 + rp / |a|`, which is always in the hyperbolic regime for
    /// positive inputs.
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
        let eccentricity = 1.0 + periapsis / semi_major_axis;
        Ok(Self::derive(
            primary,
            secondary,
            mu,
            semi_major_axis,
            eccentricity,
        ))
    }

    // Inputs are validated by the factories; `semi_major_axis` is the
    // positive magnitude.
    fn derive(
        primary: GravitationalMass,
        secondary: GravitationalMass,
        mu: f64,
        semi_major_axis: f64,
        eccentricity: f64,
    ) -> Self {
        let semi_latus_rectum = semi_major_axis * (eccentricity * eccentricity - 1.0);
        let periapsis = semi_major_axis * (eccentricity - 1.0);
        let asymptote = (-1.0 / eccentricity).acos();
        let angular_momentum = conic::angular_momentum(mu, semi_latus_rectum);
        let mean_motion = conic::mean_motion(mu, semi_major_axis);
        let periapsis_speed = angular_momentum / periapsis;
        Self {
            primary,
            secondary,
            mu,
            eccentricity,
            semi_major_axis,
            semi_latus_rectum,
            periapsis,
            asymptote,
            angular_momentum,
            mean_motion,
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
    /// Diverges to infinity as the angle approaches the asymptote; angles
    /// at or beyond it are outside the trajectory and yield non-positive
    /// denominators (garbage in, garbage out — use
    /// [`get_speed_at_true_anomaly`][Self::get_speed_at_true_anomaly] for a
    /// checked query).
    pub fn get_radius_at_true_anomaly(&self, true_anomaly: f64) -> f64 {
        conic::radius(self.semi_latus_rectum, self.eccentricity, true_anomaly)
    }

    /// The true anomaly at which the trajectory reaches a radius, as the
    /// principal value in [0, asymptote).
    ///
    /// Radii below the periapsis are a [`DomainError`]; as the radius grows
    /// the angle tends to the asymptote from below.
    pub fn get_true_anomaly_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        if radius < self.periapsis {
            return Err(DomainError::BelowPeriapsis {
                radius,
                periapsis: self.periapsis,
            });
        }
        let cos_nu = (self.semi_latus_rectum / radius - 1.0) / self.eccentricity;
        Ok(cos_nu.clamp(-1.0, 1.0).acos())
    }

    /// Propagates to time `t`.
    ///
    /// The mean anomaly `n (t - t0)` stays unwrapped (the trajectory is not
    /// periodic), the hyperbolic Kepler equation is solved for `H`, and the
    /// planar state follows from `x = |a| (e - cosh H)`,
    /// `y = |a| sqrt(e^2 - 1) sinh H`.
    pub fn get_position_at_time(&self, time: f64) -> Result<OrbitalPosition, ConvergenceError> {
        let mean_anomaly = self.mean_motion * (time - self.epoch);
        let hyperbolic_anomaly =
            hyperbolic_eccentric_anomaly(self.eccentricity, mean_anomaly, &self.solver)?;

        let sinh_h = hyperbolic_anomaly.sinh();
        let cosh_h = hyperbolic_anomaly.cosh();
        let axis_ratio = (self.eccentricity * self.eccentricity - 1.0).sqrt();

        let position = DVec2::new(
            self.semi_major_axis * (self.eccentricity - cosh_h),
            self.semi_major_axis * axis_ratio * sinh_h,
        );
        let radius = self.semi_major_axis * (self.eccentricity * cosh_h - 1.0);
        let true_anomaly = position.y.atan2(position.x);

        // v = sqrt(mu |a|) / r * (-sinh H, sqrt(e^2 - 1) cosh H)
        let velocity_scale = (self.mu * self.semi_major_axis).sqrt() / radius;
        let velocity = DVec2::new(
            -velocity_scale * sinh_h,
            velocity_scale * axis_ratio * cosh_h,
        );

        Ok(OrbitalPosition {
            time,
            mean_anomaly,
            eccentric_anomaly: hyperbolic_anomaly,
            position,
            radius,
            true_anomaly,
            velocity,
            speed: velocity.length(),
        })
    }

    /// The vis-viva speed at a radius, `sqrt(mu (2/r + 1/|a|))`.
    ///
    /// Radii below the periapsis are a [`DomainError`]. The speed tends to
    /// the hyperbolic excess velocity `sqrt(mu / |a|)` as the radius grows.
    pub fn get_speed_at_radius(&self, radius: f64) -> Result<f64, DomainError> {
        if radius < self.periapsis {
            return Err(DomainError::BelowPeriapsis {
                radius,
                periapsis: self.periapsis,
            });
        }
        Ok((self.mu * (2.0 / radius + 1.0 / self.semi_major_axis)).sqrt())
    }

    /// The vis-viva speed at a true anomaly.
    ///
    /// Angles at or beyond the asymptote are a
    /// [`DomainError::BeyondAsymptote`].
    pub fn get_speed_at_true_anomaly(&self, true_anomaly: f64) -> Result<f64, DomainError> {
        if true_anomaly.abs() >= self.asymptote {
            return Err(DomainError::BeyondAsymptote {
                true_anomaly,
                asymptote: self.asymptote,
            });
        }
        let radius = self.get_radius_at_true_anomaly(true_anomaly);
        Ok((self.mu * (2.0 / radius + 1.0 / self.semi_major_axis)).sqrt())
    }

    /// The eccentricity.
    pub fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// The semi-major-axis magnitude `|a|` (always positive; see the
    /// type-level docs).
    pub fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// The semi-latus rectum, `p = |a| (e^2 - 1)`.
    pub fn get_semi_latus_rectum(&self) -> f64 {
        self.semi_latus_rectum
    }

    /// The periapsis distance, `rp = |a| (e - 1)`.
    pub fn get_periapsis(&self) -> f64 {
        self.periapsis
    }

    /// The asymptotic true-anomaly bound, `acos(-1/e)`, in (pi/2, pi).
    pub fn get_asymptote(&self) -> f64 {
        self.asymptote
    }

    /// The specific angular momentum, `h = sqrt(mu p)`.
    pub fn get_angular_momentum(&self) -> f64 {
        self.angular_momentum
    }

    /// The mean motion, `n = sqrt(mu / |a|) / |a|`.
    pub fn get_mean_motion(&self) -> f64 {
        self.mean_motion
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
