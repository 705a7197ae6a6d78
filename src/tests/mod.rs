use core::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI, TAU};

use glam::{DVec2, DVec3};

use crate::solvers::{
    elliptic_eccentric_anomaly, hyperbolic_eccentric_anomaly, newton_raphson, solve_barker,
    wrap_mean_anomaly,
};
use crate::{
    conic, CircularOrbit, DomainError, Element, ElementError, EllipticOrbit, GravitationalMass,
    HyperbolicOrbit, Orbit, OrbitShape, ParabolicOrbit, ShapeKind, SolverConfig,
    SpatialOrientation, GRAVITATIONAL_CONSTANT,
};


use assertions::*;

/// The Gaussian gravitational constant, sqrt(GM_sun) in AU^(3/2)/day.
const GAUSS_K: f64 = 0.017_202_098_95;

fn unit_primary() -> GravitationalMass {
    GravitationalMass::from_gm(1.0).unwrap()
}

fn probe() -> GravitationalMass {
    GravitationalMass::massless()
}

fn sun() -> GravitationalMass {
    GravitationalMass::from_sqrt_gm(GAUSS_K).unwrap()
}

// ---- GravitationalMass ----

#[test]
fn mass_representations_stay_consistent() {
    let by_mass = GravitationalMass::from_mass(1.0e24).unwrap();
    assert_almost_eq(
        by_mass.gm() / (GRAVITATIONAL_CONSTANT * 1.0e24),
        1.0,
        "GM derived from mass",
    );
    assert_almost_eq(
        by_mass.sqrt_gm() * by_mass.sqrt_gm() / by_mass.gm(),
        1.0,
        "sqrtGM squared vs GM",
    );

    let by_gm = GravitationalMass::from_gm(4.0).unwrap();
    assert_eq!(by_gm.sqrt_gm(), 2.0);

    let by_sqrt = GravitationalMass::from_sqrt_gm(3.0).unwrap();
    assert_eq!(by_sqrt.gm(), 9.0);
}

#[test]
fn mass_factories_reject_negative_and_nan() {
    assert_eq!(
        GravitationalMass::from_mass(-1.0),
        Err(ElementError::Negative {
            element: Element::Mass,
            value: -1.0,
        })
    );
    assert!(GravitationalMass::from_gm(f64::NAN).is_err());
    assert!(GravitationalMass::from_sqrt_gm(-0.5).is_err());
}

#[test]
fn massless_probe_is_legal() {
    let zero = GravitationalMass::from_mass(0.0).unwrap();
    assert_eq!(zero.gm(), 0.0);
    assert_eq!(probe().mass(), 0.0);

    let sun = sun();
    assert_eq!(sun.combined_parameter(&probe()), sun.gm());
}

#[test]
fn combined_parameter_adds_both_bodies() {
    let a = GravitationalMass::from_gm(3.0).unwrap();
    let b = GravitationalMass::from_gm(2.0).unwrap();
    assert_eq!(a.combined_parameter(&b), 5.0);
    assert_eq!(b.combined_parameter(&a), 5.0);
}

#[test]
fn two_massless_bodies_cannot_orbit() {
    let result = CircularOrbit::from_radius(probe(), probe(), 1.0);
    assert_eq!(
        result,
        Err(ElementError::NonPositive {
            element: Element::GravitationalParameter,
            value: 0.0,
        })
    );
}

// ---- EquationSolvers ----

#[test]
fn newton_raphson_finds_square_root() {
    let root = newton_raphson(
        |x| x * x - 2.0,
        |x| 2.0 * x,
        1.0,
        &SolverConfig::default(),
    )
    .unwrap();
    assert_within(root, core::f64::consts::SQRT_2, 1e-12, "sqrt(2) root");
}

#[test]
fn newton_raphson_rejects_vanishing_derivative() {
    // f has no real root and f'(0) = 0, so the very first step is infinite.
    let result = newton_raphson(|x| x * x + 1.0, |x| 2.0 * x, 0.0, &SolverConfig::default());
    let err = result.unwrap_err();
    assert_eq!(err.iterations, 0);
}

#[test]
fn newton_raphson_respects_iteration_cap() {
    let strict = SolverConfig {
        tolerance: 0.0,
        max_iterations: 5,
    };
    // A zero tolerance can never be met, so the cap must fire.
    let err = elliptic_eccentric_anomaly(0.5, 1.0, &strict).unwrap_err();
    assert_eq!(err.iterations, 5);
}

#[test]
fn elliptic_kepler_is_exact_at_the_apsides() {
    let cfg = SolverConfig::default();
    for e in [0.0, 0.25, 0.7, 0.999999] {
        assert_eq!(
            elliptic_eccentric_anomaly(e, 0.0, &cfg).unwrap(),
            0.0,
            "E(M=0) should be 0 for e={e}"
        );
        assert_eq!(
            elliptic_eccentric_anomaly(e, PI, &cfg).unwrap(),
            PI,
            "E(M=pi) should be pi for e={e}"
        );
    }
}

#[test]
fn elliptic_kepler_residual_vanishes() {
    let cfg = SolverConfig::default();
    for e in [0.25, 0.7, 0.999999] {
        for m in [-2.5, -0.3, 0.1, 1.0, 3.0] {
            let ecc_anom = elliptic_eccentric_anomaly(e, m, &cfg).unwrap();
            assert_within(
                ecc_anom - e * ecc_anom.sin(),
                m,
                1e-9,
                &format!("Kepler residual at e={e}, M={m}"),
            );
        }
    }
}

#[test]
fn hyperbolic_kepler_residual_vanishes() {
    let cfg = SolverConfig::default();
    for e in [1.5, 2.0] {
        for m in [-10.0, -1.0, 0.5, 2.0, 10.0] {
            let hyp_anom = hyperbolic_eccentric_anomaly(e, m, &cfg).unwrap();
            assert_within(
                e * hyp_anom.sinh() - hyp_anom,
                m,
                1e-9,
                &format!("hyperbolic Kepler residual at e={e}, M={m}"),
            );
        }
    }
}

#[test]
fn barker_is_zero_at_periapsis() {
    assert_eq!(solve_barker(0.0), 0.0);
}

#[test]
fn barker_satisfies_its_cubic() {
    for m in [-10.0, -2.0, -0.5, 0.5, 2.0, 10.0] {
        let d = solve_barker(m);
        assert_within(
            d * d * d + 3.0 * d,
            3.0 * m,
            1e-9,
            &format!("Barker cubic at M={m}"),
        );
    }
}

#[test]
fn barker_is_odd_in_the_mean_anomaly() {
    for m in [0.25, 1.0, 7.5] {
        assert_almost_eq(solve_barker(-m), -solve_barker(m), "Barker oddness");
    }
}

#[test]
fn mean_anomaly_wraps_to_half_open_interval() {
    assert_eq!(wrap_mean_anomaly(0.0), 0.0);
    assert_eq!(wrap_mean_anomaly(PI), PI);
    assert_eq!(wrap_mean_anomaly(-PI), PI);
    assert_eq!(wrap_mean_anomaly(TAU), 0.0);
    assert_almost_eq(wrap_mean_anomaly(3.0 * PI), PI, "3 pi wraps to pi");
    assert_almost_eq(wrap_mean_anomaly(-2.5 * PI), -0.5 * PI, "-2.5 pi wraps");

    for m in [-100.0, -7.3, 0.4, 12.9, 1000.0] {
        let wrapped = wrap_mean_anomaly(m);
        assert!(wrapped > -PI && wrapped <= PI, "{m} wrapped to {wrapped}");
        assert_almost_eq(wrapped.sin(), m.sin(), "sine preserved by wrapping");
    }
}

// ---- ConicSectionFormulae ----

#[test]
fn conic_radius_formula() {
    // e = 0: the radius is p at every angle.
    assert_eq!(conic::radius(2.0, 0.0, 1.234), 2.0);
    // At nu = 0 the radius is p / (1 + e).
    assert_eq!(conic::radius(3.0, 0.5, 0.0), 2.0);
}

#[test]
fn semi_major_axis_round_trips_through_mean_motion() {
    let mu = 1.0;
    for a in [0.5, 1.0, 2.0, 1000.0] {
        let n = conic::mean_motion(mu, a);
        assert_within(
            conic::semi_major_axis_from_mean_motion(mu, n),
            a,
            1e-12 * a,
            "a round trip through n",
        );
        let t = conic::period_from_mean_motion(n);
        assert_within(
            conic::semi_major_axis_from_period(mu, t),
            a,
            1e-12 * a,
            "a round trip through T",
        );
        assert_within(
            conic::mean_motion_from_period(t),
            n,
            1e-12 * n,
            "n round trip through T",
        );
    }
}

#[test]
fn eccentricity_predicates_split_at_the_boundaries() {
    assert!(conic::is_ellipse_eccentricity(0.0));
    assert!(conic::is_ellipse_eccentricity(0.999999));
    assert!(!conic::is_ellipse_eccentricity(1.0));
    assert!(!conic::is_ellipse_eccentricity(-0.1));

    assert!(!conic::is_hyperbola_eccentricity(1.0));
    assert!(conic::is_hyperbola_eccentricity(1.0000001));
}

#[test]
fn escape_velocity_matches_vis_viva_limit() {
    assert_eq!(conic::escape_velocity(2.0, 1.0), 2.0);
    assert_eq!(conic::angular_momentum(4.0, 1.0), 2.0);
}

// ---- CircularOrbit ----

#[test]
fn circular_radius_ignores_the_angle() {
    let orbit = CircularOrbit::from_radius(unit_primary(), probe(), 2.0).unwrap();

    for nu in [0.0, 0.5, PI, -2.8, 100.0] {
        assert_eq!(orbit.get_radius_at_true_anomaly(nu), 2.0);
    }
    assert_eq!(orbit.get_eccentricity(), 0.0);
    assert_eq!(orbit.get_periapsis(), 2.0);
    assert_eq!(orbit.get_apoapsis(), 2.0);
    assert_eq!(orbit.get_semi_latus_rectum(), 2.0);
}

#[test]
fn circular_inverse_radius_is_singular() {
    let orbit = CircularOrbit::from_radius(unit_primary(), probe(), 2.0).unwrap();

    // An exact match has no unique solution and comes back as NaN.
    assert!(orbit.get_true_anomaly_at_radius(2.0).unwrap().is_nan());

    assert_eq!(
        orbit.get_true_anomaly_at_radius(2.1),
        Err(DomainError::AboveApoapsis {
            radius: 2.1,
            apoapsis: 2.0,
        })
    );
    assert_eq!(
        orbit.get_true_anomaly_at_radius(1.9),
        Err(DomainError::BelowPeriapsis {
            radius: 1.9,
            periapsis: 2.0,
        })
    );
}

#[test]
fn circular_factories_agree() {
    let by_radius = CircularOrbit::from_radius(unit_primary(), probe(), 2.0).unwrap();
    let by_motion =
        CircularOrbit::from_mean_motion(unit_primary(), probe(), by_radius.get_mean_motion())
            .unwrap();
    let by_period =
        CircularOrbit::from_period(unit_primary(), probe(), by_radius.get_period()).unwrap();

    assert_within(by_motion.get_radius(), 2.0, 1e-12, "radius via mean motion");
    assert_within(by_period.get_radius(), 2.0, 1e-12, "radius via period");
}

#[test]
fn circular_propagation_walks_the_circle() {
    let orbit = CircularOrbit::from_radius(unit_primary(), probe(), 1.0).unwrap();
    let quarter = orbit.get_period() / 4.0;

    let at_epoch = orbit.get_position_at_time(0.0);
    assert_almost_eq_vec2(at_epoch.position, DVec2::new(1.0, 0.0), "t = 0");
    assert_almost_eq_vec2(at_epoch.velocity, DVec2::new(0.0, 1.0), "v at t = 0");

    let at_quarter = orbit.get_position_at_time(quarter);
    assert_almost_eq_vec2(at_quarter.position, DVec2::new(0.0, 1.0), "t = T/4");

    let at_half = orbit.get_position_at_time(2.0 * quarter);
    assert_almost_eq_vec2(at_half.position, DVec2::new(-1.0, 0.0), "t = T/2");

    // Constant speed sqrt(mu / r) all the way around.
    assert_almost_eq(at_quarter.speed, 1.0, "circular speed");
    assert_eq!(orbit.get_speed_at_true_anomaly(1.234), at_quarter.speed);
}

#[test]
fn circular_speed_at_radius_accepts_only_the_fixed_radius() {
    let orbit = CircularOrbit::from_radius(unit_primary(), probe(), 4.0).unwrap();
    assert_almost_eq(orbit.get_speed_at_radius(4.0).unwrap(), 0.5, "sqrt(mu/r)");
    assert!(orbit.get_speed_at_radius(4.5).is_err());
}

#[test]
fn circular_factory_rejects_bad_inputs() {
    assert!(CircularOrbit::from_radius(unit_primary(), probe(), 0.0).is_err());
    assert!(CircularOrbit::from_mean_motion(unit_primary(), probe(), -1.0).is_err());
    assert!(CircularOrbit::from_period(unit_primary(), probe(), f64::NAN).is_err());
}

// ---- EllipticOrbit ----

#[test]
fn elliptic_radius_is_bounded_by_the_apsides() {
    let orbit = EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, 0.5).unwrap();
    let rp = orbit.get_periapsis();
    let ra = orbit.get_apoapsis();

    assert_eq!(rp, 1.0);
    assert_eq!(ra, 3.0);
    assert_almost_eq(orbit.get_radius_at_true_anomaly(0.0), rp, "radius(0) = rp");
    assert_almost_eq(orbit.get_radius_at_true_anomaly(PI), ra, "radius(pi) = ra");

    let mut nu = -PI;
    while nu < PI {
        let r = orbit.get_radius_at_true_anomaly(nu);
        assert!(rp <= r + 1e-12 && r <= ra + 1e-12, "r({nu}) = {r}");
        nu += 0.05;
    }
}

#[test]
fn elliptic_elements_round_trip_through_mean_motion() {
    let orbit = EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, 0.25).unwrap();
    let rebuilt =
        EllipticOrbit::from_mean_motion(unit_primary(), probe(), orbit.get_mean_motion(), 0.25)
            .unwrap();

    assert_within(
        rebuilt.get_semi_major_axis(),
        2.0,
        1e-12,
        "a reconstructed from (n, mu)",
    );
    assert_within(rebuilt.get_period(), orbit.get_period(), 1e-9, "period");
}

#[test]
fn elliptic_factories_agree() {
    let reference = EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, 0.5).unwrap();

    let candidates = [
        EllipticOrbit::from_periapsis(unit_primary(), probe(), 1.0, 0.5).unwrap(),
        EllipticOrbit::from_apoapsis(unit_primary(), probe(), 3.0, 0.5).unwrap(),
        EllipticOrbit::from_apsides(unit_primary(), probe(), 1.0, 3.0).unwrap(),
        EllipticOrbit::from_period(unit_primary(), probe(), reference.get_period(), 0.5).unwrap(),
        EllipticOrbit::from_periapsis_mean_motion(
            unit_primary(),
            probe(),
            1.0,
            reference.get_mean_motion(),
        )
        .unwrap(),
    ];

    for (i, orbit) in candidates.iter().enumerate() {
        let what = format!("factory #{i}");
        assert_within(orbit.get_semi_major_axis(), 2.0, 1e-9, &format!("a of {what}"));
        assert_within(orbit.get_eccentricity(), 0.5, 1e-9, &format!("e of {what}"));
        assert_within(orbit.get_periapsis(), 1.0, 1e-9, &format!("rp of {what}"));
        assert_within(orbit.get_apoapsis(), 3.0, 1e-9, &format!("ra of {what}"));
    }
}

#[test]
fn elliptic_true_anomaly_round_trips() {
    for e in [0.25, 0.7, 0.999999] {
        let orbit = EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 1.0, e).unwrap();
        for nu in [0.1, 0.5, 1.0, 2.0, 3.0] {
            let r = orbit.get_radius_at_true_anomaly(nu);
            let back = orbit.get_true_anomaly_at_radius(r).unwrap();
            assert_almost_eq(back, nu, &format!("nu round trip at e={e}, nu={nu}"));
        }
    }
}

#[test]
fn elliptic_inverse_radius_rejects_unreachable_radii() {
    let orbit = EllipticOrbit::from_apsides(unit_primary(), probe(), 1.0, 3.0).unwrap();
    assert!(matches!(
        orbit.get_true_anomaly_at_radius(0.5),
        Err(DomainError::BelowPeriapsis { .. })
    ));
    assert!(matches!(
        orbit.get_true_anomaly_at_radius(3.5),
        Err(DomainError::AboveApoapsis { .. })
    ));
}

#[test]
fn degenerate_ellipse_follows_the_circular_rule() {
    // e = 0 sits inside the half-open elliptic interval; the inverse radius
    // query degenerates exactly like the circular orbit's.
    let orbit = EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, 0.0).unwrap();
    assert!(orbit.get_true_anomaly_at_radius(2.0).unwrap().is_nan());
}

#[test]
fn sun_centered_ellipse_reproduces_reference_elements() {
    // e = 0.25, a just under one AU, Sun-centered, in AU/day units.
    let orbit =
        EllipticOrbit::from_semi_major_axis(sun(), probe(), 0.999999022929777, 0.25).unwrap();

    assert_within(
        orbit.get_semi_latus_rectum(),
        0.937499083996666,
        1e-12,
        "semi-latus rectum",
    );
    assert_within(orbit.get_periapsis(), 0.749999267197333, 1e-12, "periapsis");
    assert_within(orbit.get_apoapsis(), 1.249998778662221, 1e-12, "apoapsis");
    assert_within(
        orbit.get_mean_motion(),
        0.0172021241615188,
        1e-12,
        "mean motion in rad/day",
    );
    assert_within(orbit.get_period(), 365.256363004, 1e-6, "period in days");
}

#[test]
fn elliptic_propagation_starts_at_periapsis() {
    let orbit = EllipticOrbit::from_apsides(unit_primary(), probe(), 1.0, 3.0).unwrap();
    let state = orbit.get_position_at_time(0.0).unwrap();

    assert_eq!(state.mean_anomaly, 0.0);
    assert_eq!(state.eccentric_anomaly, 0.0);
    assert_almost_eq_vec2(state.position, DVec2::new(1.0, 0.0), "periapsis position");
    assert_almost_eq(state.speed, orbit.get_periapsis_speed(), "periapsis speed");
    assert_almost_eq(state.velocity.x, 0.0, "radial velocity at periapsis");
}

#[test]
fn elliptic_propagation_reaches_apoapsis_at_half_period() {
    let orbit = EllipticOrbit::from_apsides(unit_primary(), probe(), 1.0, 3.0).unwrap();
    let state = orbit.get_position_at_time(orbit.get_period() / 2.0).unwrap();

    assert_almost_eq_vec2(state.position, DVec2::new(-3.0, 0.0), "apoapsis position");
    assert_almost_eq(state.radius, orbit.get_apoapsis(), "apoapsis radius");
}

#[test]
fn elliptic_propagation_conserves_energy() {
    let orbit = EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, 0.6).unwrap();
    let expected = -1.0 / (2.0 * orbit.get_semi_major_axis());

    for t in [-13.7, 0.0, 1.0, 4.2, 25.0] {
        let state = orbit.get_position_at_time(t).unwrap();
        let energy = state.speed * state.speed / 2.0 - 1.0 / state.radius;
        assert_within(energy, expected, 1e-9, &format!("orbital energy at t={t}"));
    }
}

#[test]
fn elliptic_propagation_is_periodic() {
    let orbit = EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 1.5, 0.3).unwrap();
    let period = orbit.get_period();

    let a = orbit.get_position_at_time(0.7).unwrap();
    let b = orbit.get_position_at_time(0.7 + 3.0 * period).unwrap();
    assert_almost_eq_vec2(a.position, b.position, "position three periods later");
    assert_almost_eq_vec2(a.velocity, b.velocity, "velocity three periods later");
}

#[test]
fn elliptic_epoch_shifts_the_periapsis_passage() {
    let orbit = EllipticOrbit::from_apsides(unit_primary(), probe(), 1.0, 3.0)
        .unwrap()
        .at_epoch(10.0);

    assert_eq!(orbit.get_epoch(), 10.0);
    let state = orbit.get_position_at_time(10.0).unwrap();
    assert_almost_eq(state.radius, 1.0, "periapsis radius at t = t0");
}

#[test]
fn elliptic_speeds_follow_vis_viva() {
    let orbit = EllipticOrbit::from_apsides(unit_primary(), probe(), 1.0, 3.0).unwrap();

    // v_p = h / rp, and vis-viva at rp must agree.
    assert_almost_eq(
        orbit.get_speed_at_radius(1.0).unwrap(),
        orbit.get_periapsis_speed(),
        "vis-viva at periapsis",
    );
    assert_almost_eq(
        orbit.get_speed_at_true_anomaly(0.0),
        orbit.get_periapsis_speed(),
        "speed at nu = 0",
    );
    assert!(orbit.get_speed_at_radius(10.0).is_err());

    // Slower at apoapsis than at periapsis, by the ratio rp/ra.
    let at_apoapsis = orbit.get_speed_at_radius(3.0).unwrap();
    assert_almost_eq(
        at_apoapsis * 3.0,
        orbit.get_periapsis_speed() * 1.0,
        "angular momentum balance",
    );
}

#[test]
fn elliptic_factory_rejects_bad_inputs() {
    assert_eq!(
        EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, 1.0),
        Err(ElementError::EccentricityOutOfRange {
            shape: ShapeKind::Elliptic,
            value: 1.0,
        })
    );
    assert!(EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, -0.1).is_err());
    assert!(EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), -2.0, 0.5).is_err());
    assert_eq!(
        EllipticOrbit::from_apsides(unit_primary(), probe(), 3.0, 1.0),
        Err(ElementError::ApsidesOutOfOrder {
            periapsis: 3.0,
            apoapsis: 1.0,
        })
    );
    // rp > a forces a negative eccentricity out of the derivation.
    assert!(matches!(
        EllipticOrbit::from_periapsis_mean_motion(unit_primary(), probe(), 5.0, 1.0),
        Err(ElementError::EccentricityOutOfRange { .. })
    ));
}

#[test]
fn near_parabolic_ellipse_surfaces_convergence_failure() {
    let strict = SolverConfig {
        tolerance: 0.0,
        max_iterations: 8,
    };
    let orbit = EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), 1.0, 0.999999)
        .unwrap()
        .with_solver_config(strict);

    let err = orbit.get_position_at_time(0.37).unwrap_err();
    assert_eq!(err.iterations, 8);
}

// ---- ParabolicOrbit ----

#[test]
fn parabolic_geometry_hangs_off_the_periapsis() {
    let orbit = ParabolicOrbit::from_periapsis(unit_primary(), probe(), 2.0).unwrap();

    assert_eq!(orbit.get_eccentricity(), 1.0);
    assert_eq!(orbit.get_semi_latus_rectum(), 4.0);
    assert_almost_eq(
        orbit.get_radius_at_true_anomaly(FRAC_PI_2),
        4.0,
        "r(pi/2) = p",
    );
}

#[test]
fn parabolic_mean_motion_round_trips() {
    let orbit = ParabolicOrbit::from_periapsis(unit_primary(), probe(), 2.0).unwrap();
    let rebuilt =
        ParabolicOrbit::from_mean_motion(unit_primary(), probe(), orbit.get_mean_motion()).unwrap();
    assert_within(rebuilt.get_periapsis(), 2.0, 1e-12, "rp from mean motion");
}

#[test]
fn parabolic_propagation_starts_at_periapsis() {
    let orbit = ParabolicOrbit::from_periapsis(unit_primary(), probe(), 2.0).unwrap();
    let state = orbit.get_position_at_time(0.0);

    assert_eq!(state.eccentric_anomaly, 0.0);
    assert_almost_eq_vec2(state.position, DVec2::new(2.0, 0.0), "periapsis position");
    assert_almost_eq(state.true_anomaly, 0.0, "true anomaly at periapsis");
    assert_almost_eq(state.speed, orbit.get_periapsis_speed(), "periapsis speed");
}

#[test]
fn parabolic_speed_is_escape_velocity_everywhere() {
    let orbit = ParabolicOrbit::from_periapsis(unit_primary(), probe(), 2.0).unwrap();

    for t in [-40.0, -1.0, 0.5, 7.0, 300.0] {
        let state = orbit.get_position_at_time(t);
        // Zero total energy: v^2 / 2 == mu / r.
        assert_within(
            state.speed * state.speed / 2.0,
            1.0 / state.radius,
            1e-12,
            &format!("zero energy at t={t}"),
        );
        assert_almost_eq(
            state.velocity.length(),
            state.speed,
            "velocity magnitude consistency",
        );
    }

    assert_almost_eq(
        orbit.get_speed_at_radius(8.0).unwrap(),
        0.5,
        "sqrt(2 mu / r) at r = 8",
    );
    assert!(orbit.get_speed_at_radius(1.0).is_err());
}

#[test]
fn parabolic_mean_anomaly_stays_unwrapped() {
    let orbit = ParabolicOrbit::from_periapsis(unit_primary(), probe(), 1.0).unwrap();
    let far_out = orbit.get_position_at_time(1.0e4);
    assert!(far_out.mean_anomaly > PI);
    // Outbound forever: the true anomaly creeps toward pi from below.
    assert!(far_out.true_anomaly > FRAC_PI_2 && far_out.true_anomaly < PI);
}

#[test]
fn parabolic_inverse_radius_has_no_upper_bound() {
    let orbit = ParabolicOrbit::from_periapsis(unit_primary(), probe(), 2.0).unwrap();

    assert_almost_eq(
        orbit.get_true_anomaly_at_radius(4.0).unwrap(),
        FRAC_PI_2,
        "nu at r = p",
    );
    assert!(orbit.get_true_anomaly_at_radius(1.0e9).is_ok());
    assert!(matches!(
        orbit.get_true_anomaly_at_radius(1.9),
        Err(DomainError::BelowPeriapsis { .. })
    ));
}

// ---- HyperbolicOrbit ----

#[test]
fn hyperbolic_flyby_scenario() {
    // rp = 2, e = 2 puts the asymptote at acos(-1/2) = 2 pi / 3.
    let orbit = HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 2.0).unwrap();

    assert_eq!(orbit.get_semi_major_axis(), 2.0);
    assert_eq!(orbit.get_semi_latus_rectum(), 6.0);
    assert_almost_eq(orbit.get_asymptote(), 2.0 * PI / 3.0, "asymptote angle");

    assert_almost_eq(orbit.get_radius_at_true_anomaly(FRAC_PI_3), 3.0, "r(pi/3)");
    assert_almost_eq(orbit.get_radius_at_true_anomaly(FRAC_PI_2), 6.0, "r(pi/2)");

    // The radius blows up approaching the asymptote.
    let near_asymptote = orbit.get_radius_at_true_anomaly(2.0 * PI / 3.0 - 1e-6);
    assert!(near_asymptote > 1.0e5, "r near asymptote was {near_asymptote}");
}

#[test]
fn hyperbolic_semi_major_axis_is_a_positive_magnitude() {
    let orbit = HyperbolicOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, 1.5).unwrap();
    assert!(orbit.get_semi_major_axis() > 0.0);
    assert_eq!(orbit.get_periapsis(), 1.0);
    assert!(HyperbolicOrbit::from_semi_major_axis(unit_primary(), probe(), -2.0, 1.5).is_err());
}

#[test]
fn hyperbolic_factories_agree() {
    let reference =
        HyperbolicOrbit::from_semi_major_axis(unit_primary(), probe(), 2.0, 2.0).unwrap();

    let candidates = [
        HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 2.0).unwrap(),
        HyperbolicOrbit::from_mean_motion(unit_primary(), probe(), reference.get_mean_motion(), 2.0)
            .unwrap(),
        HyperbolicOrbit::from_periapsis_mean_motion(
            unit_primary(),
            probe(),
            2.0,
            reference.get_mean_motion(),
        )
        .unwrap(),
    ];

    for (i, orbit) in candidates.iter().enumerate() {
        let what = format!("factory #{i}");
        assert_within(orbit.get_semi_major_axis(), 2.0, 1e-9, &format!("|a| of {what}"));
        assert_within(orbit.get_eccentricity(), 2.0, 1e-9, &format!("e of {what}"));
        assert_within(orbit.get_periapsis(), 2.0, 1e-9, &format!("rp of {what}"));
    }
}

#[test]
fn hyperbolic_true_anomaly_round_trips() {
    for e in [1.5, 2.0] {
        let orbit = HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 1.0, e).unwrap();
        let asymptote = orbit.get_asymptote();
        for nu in [0.1, 0.5, 1.0, asymptote - 0.3] {
            let r = orbit.get_radius_at_true_anomaly(nu);
            let back = orbit.get_true_anomaly_at_radius(r).unwrap();
            assert_almost_eq(back, nu, &format!("nu round trip at e={e}, nu={nu}"));
            assert!(back < asymptote);
        }
    }
}

#[test]
fn hyperbolic_propagation_starts_at_periapsis() {
    let orbit = HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 2.0).unwrap();
    let state = orbit.get_position_at_time(0.0).unwrap();

    assert_eq!(state.eccentric_anomaly, 0.0);
    assert_almost_eq_vec2(state.position, DVec2::new(2.0, 0.0), "periapsis position");
    assert_almost_eq(state.speed, orbit.get_periapsis_speed(), "periapsis speed");
}

#[test]
fn hyperbolic_propagation_conserves_energy() {
    let orbit = HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 2.0).unwrap();
    let expected = 1.0 / (2.0 * orbit.get_semi_major_axis());

    for t in [-50.0, -3.0, 0.0, 3.0, 50.0] {
        let state = orbit.get_position_at_time(t).unwrap();
        let energy = state.speed * state.speed / 2.0 - 1.0 / state.radius;
        assert_within(energy, expected, 1e-9, &format!("orbital energy at t={t}"));
    }
}

#[test]
fn hyperbolic_speed_tends_to_the_excess_velocity() {
    let orbit = HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 2.0).unwrap();
    let excess = (1.0 / orbit.get_semi_major_axis()).sqrt();

    let far = orbit.get_speed_at_radius(1.0e12).unwrap();
    assert_almost_eq(far, excess, "speed at a very large radius");
    assert!(orbit.get_speed_at_radius(1.0).is_err());
}

#[test]
fn hyperbolic_speed_rejects_angles_beyond_the_asymptote() {
    let orbit = HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 2.0).unwrap();

    assert!(orbit.get_speed_at_true_anomaly(1.0).is_ok());
    assert!(matches!(
        orbit.get_speed_at_true_anomaly(2.0 * PI / 3.0),
        Err(DomainError::BeyondAsymptote { .. })
    ));
    assert!(matches!(
        orbit.get_speed_at_true_anomaly(-3.0),
        Err(DomainError::BeyondAsymptote { .. })
    ));
}

#[test]
fn hyperbolic_factory_rejects_elliptic_eccentricities() {
    assert_eq!(
        HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 1.0),
        Err(ElementError::EccentricityOutOfRange {
            shape: ShapeKind::Hyperbolic,
            value: 1.0,
        })
    );
    assert!(HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 0.5).is_err());
}

// ---- OrbitShape union ----

fn one_of_each() -> [OrbitShape; 4] {
    [
        CircularOrbit::from_radius(unit_primary(), probe(), 2.0)
            .unwrap()
            .into(),
        EllipticOrbit::from_apsides(unit_primary(), probe(), 1.0, 3.0)
            .unwrap()
            .into(),
        ParabolicOrbit::from_periapsis(unit_primary(), probe(), 2.0)
            .unwrap()
            .into(),
        HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 2.0)
            .unwrap()
            .into(),
    ]
}

#[test]
fn shape_union_tags_match_the_variants() {
    let kinds: Vec<ShapeKind> = one_of_each().iter().map(OrbitShape::kind).collect();
    assert_eq!(
        kinds,
        [
            ShapeKind::Circular,
            ShapeKind::Elliptic,
            ShapeKind::Parabolic,
            ShapeKind::Hyperbolic,
        ]
    );
}

#[test]
fn shape_union_eccentricities_are_ordered() {
    let shapes = one_of_each();
    assert_eq!(shapes[0].get_eccentricity(), 0.0);
    assert_eq!(shapes[1].get_eccentricity(), 0.5);
    assert_eq!(shapes[2].get_eccentricity(), 1.0);
    assert_eq!(shapes[3].get_eccentricity(), 2.0);
}

#[test]
fn only_closed_shapes_have_apoapsis_and_period() {
    let shapes = one_of_each();

    assert_eq!(shapes[0].get_apoapsis(), Some(2.0));
    assert_eq!(shapes[1].get_apoapsis(), Some(3.0));
    assert_eq!(shapes[2].get_apoapsis(), None);
    assert_eq!(shapes[3].get_apoapsis(), None);

    assert!(shapes[0].get_period().is_some());
    assert!(shapes[1].get_period().is_some());
    assert!(shapes[2].get_period().is_none());
    assert!(shapes[3].get_period().is_none());
}

#[test]
fn shape_union_propagates_every_variant() {
    for shape in one_of_each() {
        let state = shape.get_position_at_time(0.0).unwrap();
        assert_almost_eq(
            state.radius,
            shape.get_periapsis(),
            "every shape starts at periapsis",
        );
        assert_almost_eq(
            state.velocity.length(),
            state.speed,
            "speed matches the velocity vector",
        );
    }
}

#[test]
fn shape_union_common_queries_dispatch() {
    for shape in one_of_each() {
        assert_eq!(shape.get_gravitational_parameter(), 1.0);
        assert!(shape.get_periapsis() > 0.0);
        assert!(shape.get_semi_latus_rectum() > 0.0);
        assert!(shape.get_mean_motion() > 0.0);

        let rp = shape.get_periapsis();
        assert_almost_eq(
            shape.get_radius_at_true_anomaly(0.0),
            rp,
            "dispatched radius at nu = 0",
        );
        assert!(shape.get_speed_at_radius(rp).is_ok());
        assert!(shape.get_speed_at_true_anomaly(0.0).is_ok());
        assert!(shape.get_true_anomaly_at_radius(rp * 0.5).is_err());
    }
}

// ---- randomized sweeps ----

fn random_ellipse() -> EllipticOrbit {
    let semi_major_axis = rand::random_range(0.5f64..50.0);
    let eccentricity = rand::random_range(0.0f64..0.95);
    EllipticOrbit::from_semi_major_axis(unit_primary(), probe(), semi_major_axis, eccentricity)
        .unwrap()
}

fn random_hyperbola() -> HyperbolicOrbit {
    let periapsis = rand::random_range(0.5f64..50.0);
    let eccentricity = rand::random_range(1.1f64..5.0);
    HyperbolicOrbit::from_periapsis(unit_primary(), probe(), periapsis, eccentricity).unwrap()
}

#[test]
fn random_ellipses_conserve_energy() {
    for _ in 0..64 {
        let orbit = random_ellipse();
        let expected = -1.0 / (2.0 * orbit.get_semi_major_axis());
        let t = rand::random_range(-2.0..2.0) * orbit.get_period();

        let state = orbit.get_position_at_time(t).unwrap();
        let energy = state.speed * state.speed / 2.0 - 1.0 / state.radius;
        assert_within(
            energy / expected.abs(),
            expected / expected.abs(),
            1e-8,
            &format!("relative energy of a random ellipse at t={t}"),
        );
    }
}

#[test]
fn random_hyperbolas_round_trip_true_anomaly() {
    for _ in 0..64 {
        let orbit = random_hyperbola();
        let nu = rand::random_range(0.05..orbit.get_asymptote() - 0.05);

        let r = orbit.get_radius_at_true_anomaly(nu);
        let back = orbit.get_true_anomaly_at_radius(r).unwrap();
        assert_within(back, nu, 1e-6, "random hyperbolic nu round trip");
    }
}

// ---- SpatialOrientation ----

#[test]
fn identity_orientation_embeds_the_plane() {
    let orientation = SpatialOrientation::default();
    assert_eq!(
        orientation.transform(DVec2::new(1.0, 2.0)),
        DVec3::new(1.0, 2.0, 0.0)
    );
}

#[test]
fn ninety_degree_inclination_tilts_y_into_z() {
    let orientation = SpatialOrientation::new(FRAC_PI_2, 0.0, 0.0);

    assert_almost_eq_vec3(
        orientation.transform(DVec2::new(0.0, 1.0)),
        DVec3::new(0.0, 0.0, 1.0),
        "in-plane +y under i = 90 deg",
    );
    assert_almost_eq_vec3(
        orientation.transform(DVec2::new(1.0, 0.0)),
        DVec3::new(1.0, 0.0, 0.0),
        "the node line stays put",
    );
}

#[test]
fn node_and_periapsis_angles_rotate_in_the_plane() {
    let by_node = SpatialOrientation::new(0.0, FRAC_PI_2, 0.0);
    let by_arg_pe = SpatialOrientation::new(0.0, 0.0, FRAC_PI_2);

    // With zero inclination the two z-rotations act identically.
    assert_almost_eq_vec3(
        by_node.transform(DVec2::new(1.0, 0.0)),
        DVec3::new(0.0, 1.0, 0.0),
        "node rotation",
    );
    assert_almost_eq_vec3(
        by_arg_pe.transform(DVec2::new(1.0, 0.0)),
        DVec3::new(0.0, 1.0, 0.0),
        "periapsis-argument rotation",
    );
}

#[test]
fn orientation_transform_preserves_length() {
    let orientation = SpatialOrientation::new(0.4, 1.9, -2.7);
    let planar = DVec2::new(3.0, -4.0);
    assert_almost_eq(
        orientation.transform(planar).length(),
        planar.length(),
        "rotation preserves length",
    );
}

#[test]
fn set_orientation_rebuilds_the_matrix() {
    let mut orientation = SpatialOrientation::default();
    orientation.set_orientation(FRAC_PI_2, 0.0, 0.0);

    assert_eq!(orientation.get_inclination(), FRAC_PI_2);
    assert_almost_eq_vec3(
        orientation.transform(DVec2::new(0.0, 1.0)),
        DVec3::new(0.0, 0.0, 1.0),
        "matrix rebuilt after set",
    );
}

// ---- Orbit wrapper ----

#[test]
fn untilted_orbit_matches_the_planar_state() {
    let shape: OrbitShape = EllipticOrbit::from_apsides(unit_primary(), probe(), 1.0, 3.0)
        .unwrap()
        .into();
    let orbit = Orbit::new(shape);

    let planar = shape.get_position_at_time(1.7).unwrap();
    let state = orbit.get_state_vectors_at_time(1.7).unwrap();

    assert_almost_eq_vec3(
        state.position,
        planar.position.extend(0.0),
        "untilted position",
    );
    assert_almost_eq_vec3(
        state.velocity,
        planar.velocity.extend(0.0),
        "untilted velocity",
    );
}

#[test]
fn inclined_circular_orbit_climbs_out_of_the_plane() {
    let shape = CircularOrbit::from_radius(unit_primary(), probe(), 1.0).unwrap();
    let orbit = Orbit::new(shape.into())
        .with_orientation(SpatialOrientation::new(FRAC_PI_2, 0.0, 0.0));

    let quarter = shape.get_period() / 4.0;
    let state = orbit.get_state_vectors_at_time(quarter).unwrap();

    assert_almost_eq_vec3(
        state.position,
        DVec3::new(0.0, 0.0, 1.0),
        "quarter period on a polar orbit",
    );
}

#[test]
fn rotation_preserves_the_propagated_speed() {
    let shape: OrbitShape = HyperbolicOrbit::from_periapsis(unit_primary(), probe(), 2.0, 2.0)
        .unwrap()
        .into();
    let orbit = Orbit::new(shape).with_orientation(SpatialOrientation::new(0.7, -1.1, 2.3));

    for t in [-5.0, 0.0, 9.0] {
        let planar = shape.get_position_at_time(t).unwrap();
        let state = orbit.get_state_vectors_at_time(t).unwrap();
        assert_almost_eq(
            state.velocity.length(),
            planar.speed,
            &format!("speed under rotation at t={t}"),
        );
        assert_almost_eq(
            state.position.length(),
            planar.radius,
            &format!("radius under rotation at t={t}"),
        );
    }
}

#[test]
fn set_orientation_on_the_orbit_takes_effect() {
    let shape: OrbitShape = CircularOrbit::from_radius(unit_primary(), probe(), 1.0)
        .unwrap()
        .into();
    let mut orbit = Orbit::new(shape);
    orbit.set_orientation(FRAC_PI_2, 0.0, 0.0);

    assert_eq!(orbit.get_orientation().get_inclination(), FRAC_PI_2);
}
