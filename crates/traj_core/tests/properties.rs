use approx::{assert_abs_diff_eq, assert_relative_eq};
use traj_core::{
    ConfigurationError, Integrator, SolveError, SolverKind, Status, StepSettings, Trajectory,
};

fn decay() -> Integrator {
    let mut integrator = Integrator::new(1, vec![1.0]).expect("integrator");
    integrator.set_function(0, |p| -p[0]).expect("slot 0");
    integrator
}

fn lorenz() -> Integrator {
    let (sigma, beta, rho) = (10.0, 2.667, 28.0);
    let mut integrator = Integrator::new(3, vec![0.0, 1.0, 1.05]).expect("integrator");
    integrator
        .set_function(0, move |p| -sigma * (p[0] - p[1]))
        .expect("x");
    integrator
        .set_function(1, move |p| rho * p[0] - p[1] - p[0] * p[2])
        .expect("y");
    integrator
        .set_function(2, move |p| -beta * p[2] + p[0] * p[1])
        .expect("z");
    integrator
}

fn oscillator(x0: f64, v0: f64) -> Integrator {
    let mut integrator = Integrator::new(2, vec![x0, v0]).expect("integrator");
    integrator.set_function(0, |p| p[1]).expect("position");
    integrator.set_function(1, |p| -p[0]).expect("velocity");
    integrator
}

/// Error of the decay solution at t = 1 for step `h`.
fn decay_error_at_one(solver: SolverKind, h: f64) -> f64 {
    let mut integrator = decay();
    let trajectory = integrator
        .solve(solver, StepSettings::new(2.0, h))
        .expect("solve");
    let index = (1.0 / h).round() as usize;
    let point = &trajectory[index];
    assert_abs_diff_eq!(point.time(), 1.0, epsilon = 1e-12);
    (point[0] - (-point.time()).exp()).abs()
}

fn assert_well_formed(trajectory: &Trajectory<f64>, time: f64, step: f64, initial: &[f64]) {
    assert_eq!(trajectory.len(), (time / step).floor() as usize);
    assert_eq!(trajectory[0].time(), 0.0);
    assert_eq!(trajectory[0].state().as_slice(), initial);
    for (i, point) in trajectory.points().iter().enumerate() {
        assert_eq!(point.dimension(), initial.len());
        assert_abs_diff_eq!(point.time(), i as f64 * step, epsilon = 1e-9);
    }
}

#[test]
fn trajectory_length_and_times_follow_settings() {
    for &(time, step) in &[(1.0, 0.1), (2.5, 0.2), (1.0, 0.3), (10.0, 1e-2), (1.0, 1.0)] {
        for solver in [SolverKind::Euler, SolverKind::Rk4] {
            let mut integrator = oscillator(0.5, -0.25);
            let trajectory = integrator
                .solve(solver, StepSettings::new(time, step))
                .expect("solve");
            assert!(trajectory.is_complete());
            assert_well_formed(trajectory, time, step, &[0.5, -0.25]);
        }
    }

    for solver in [SolverKind::Euler, SolverKind::Rk4] {
        let mut integrator = lorenz();
        let trajectory = integrator
            .solve(solver, StepSettings::new(2.0, 1e-3))
            .expect("solve");
        assert_well_formed(trajectory, 2.0, 1e-3, &[0.0, 1.0, 1.05]);
    }
}

#[test]
fn euler_reproduces_closed_form_recurrence() {
    let mut integrator = decay();
    let trajectory = integrator.euler_solve(1.0, 0.1).expect("solve");
    assert_eq!(trajectory.len(), 10);
    assert_abs_diff_eq!(trajectory[9][0], 0.387420489, epsilon = 1e-9);
    for (i, point) in trajectory.points().iter().enumerate() {
        assert_relative_eq!(point[0], 0.9f64.powi(i as i32), max_relative = 1e-12);
    }
}

#[test]
fn rk4_error_shrinks_with_fourth_power_of_step() {
    let steps = [0.1, 0.05, 0.025, 0.0125];
    let errors: Vec<f64> = steps
        .iter()
        .map(|&h| decay_error_at_one(SolverKind::Rk4, h))
        .collect();

    for pair in errors.windows(2) {
        let ratio = pair[0] / pair[1];
        assert!(
            (12.0..20.0).contains(&ratio),
            "expected ~16x reduction per halving, got {ratio} ({errors:?})"
        );
    }
}

#[test]
fn rk4_is_far_more_accurate_than_euler() {
    for &h in &[0.1, 0.05] {
        let euler = decay_error_at_one(SolverKind::Euler, h);
        let rk4 = decay_error_at_one(SolverKind::Rk4, h);
        assert!(rk4 * 1e3 < euler, "rk4 {rk4} vs euler {euler} at h = {h}");
    }

    // Euler itself is first order.
    let ratio =
        decay_error_at_one(SolverKind::Euler, 0.05) / decay_error_at_one(SolverKind::Euler, 0.025);
    assert!((1.8..2.2).contains(&ratio), "euler ratio {ratio}");
}

#[test]
fn repeated_solves_are_bit_identical() {
    for solver in [SolverKind::Euler, SolverKind::Rk4] {
        let mut integrator = lorenz();
        let first = integrator
            .solve(solver, StepSettings::new(5.0, 1e-3))
            .expect("first")
            .clone();
        let second = integrator
            .solve(solver, StepSettings::new(5.0, 1e-3))
            .expect("second");
        assert_eq!(&first, second);

        let mut other = lorenz();
        let third = other
            .solve(solver, StepSettings::new(5.0, 1e-3))
            .expect("third");
        assert_eq!(&first, third);
    }
}

#[test]
fn columns_match_points() {
    let mut integrator = lorenz();
    let trajectory = integrator.rk4_solve(1.0, 0.01).expect("solve");
    let times = trajectory.times_vec();
    assert_eq!(times.len(), trajectory.len());
    for dim in 0..3 {
        let column = trajectory.column_vec(dim).expect("column");
        for (value, point) in column.iter().zip(trajectory) {
            assert_eq!(*value, point[dim]);
        }
    }
    assert!(trajectory.column(3).is_none());
}

#[test]
fn leapfrog_rejects_other_dimensions() {
    let mut integrator = lorenz();
    let err = integrator
        .leapfrog_solve(1.0, 0.1)
        .expect_err("three components");
    assert_eq!(
        err,
        SolveError::Configuration(ConfigurationError::SolverDimension {
            solver: SolverKind::Leapfrog,
            required: 2,
            actual: 3
        })
    );
    assert!(integrator.trajectory().is_none());

    let mut integrator = decay();
    assert!(matches!(
        integrator.leapfrog_solve(1.0, 0.1),
        Err(SolveError::Configuration(ConfigurationError::SolverDimension { actual: 1, .. }))
    ));
}

#[test]
fn leapfrog_with_zero_derivatives_stays_put() {
    let mut integrator = Integrator::new(2, vec![0.3, -1.2]).expect("integrator");
    integrator.set_function(0, |_| 0.0).expect("slot 0");
    integrator.set_function(1, |_| 0.0).expect("slot 1");
    let trajectory = integrator.leapfrog_solve(1.0, 0.01).expect("solve");
    assert_eq!(trajectory.len(), 100);
    for point in trajectory {
        assert_eq!(point.state().as_slice(), &[0.3, -1.2]);
    }
}

#[test]
fn leapfrog_tracks_harmonic_oscillator() {
    let mut integrator = oscillator(1.0, 0.0);
    let trajectory = integrator.leapfrog_solve(10.0, 0.01).expect("solve");
    assert_eq!(trajectory.len(), 1000);

    let mut max_energy_drift: f64 = 0.0;
    for point in trajectory {
        let t = point.time();
        assert_abs_diff_eq!(point[0], t.cos(), epsilon = 1e-2);
        assert_abs_diff_eq!(point[1], -t.sin(), epsilon = 1e-2);
        let energy = 0.5 * (point[0] * point[0] + point[1] * point[1]);
        max_energy_drift = max_energy_drift.max((energy - 0.5).abs());
    }
    assert!(max_energy_drift < 1e-3, "energy drift {max_energy_drift}");
}

#[test]
fn leapfrog_single_point_horizon() {
    let mut integrator = oscillator(1.0, 0.0);
    let trajectory = integrator.leapfrog_solve(0.15, 0.1).expect("solve");
    assert_eq!(trajectory.len(), 1);
    assert_eq!(trajectory[0].state().as_slice(), &[1.0, 0.0]);
}

#[test]
fn divergence_stops_at_first_non_finite_derivative() {
    for solver in [SolverKind::Euler, SolverKind::Rk4] {
        let mut integrator = Integrator::new(1, vec![1.0]).expect("integrator");
        // x' = x, which is undefined once x passes 2.
        integrator
            .set_function(0, |p| if p[0] > 2.0 { f64::NAN } else { p[0] })
            .expect("slot 0");

        let err = integrator
            .solve(solver, StepSettings::new(5.0, 0.1))
            .expect_err("should diverge");
        let (index, dimension, last_valid) = match err {
            SolveError::NumericDivergence {
                index,
                dimension,
                last_valid,
            } => (index, dimension, last_valid),
            other => panic!("expected divergence, got {other:?}"),
        };
        assert_eq!(dimension, 0);
        assert_eq!(last_valid + 1, index);

        let trajectory = integrator.trajectory().expect("truncated trajectory");
        assert_eq!(trajectory.status(), Status::Truncated { last_valid });
        assert_eq!(trajectory.len(), index);
        assert!(trajectory.column(0).expect("x").all(f64::is_finite));
        // The threshold is crossed within one step of the last kept point.
        assert!(trajectory[last_valid][0] > 1.5);
    }
}

#[test]
fn divergence_in_leapfrog_reports_velocity_dimension() {
    let mut integrator = Integrator::new(2, vec![0.0, 1.0]).expect("integrator");
    integrator.set_function(0, |p| p[1]).expect("position");
    integrator
        .set_function(1, |p| if p[0] > 0.5 { f64::INFINITY } else { 0.0 })
        .expect("velocity");

    let err = integrator.leapfrog_solve(2.0, 0.1).expect_err("should diverge");
    assert!(matches!(
        err,
        SolveError::NumericDivergence { dimension: 1, .. }
    ));
    let trajectory = integrator.trajectory().expect("truncated trajectory");
    assert!(!trajectory.is_complete());
    assert!(trajectory.column(1).expect("v").all(f64::is_finite));
}

#[test]
fn invalid_parameters_are_rejected_by_every_solver() {
    for solver in [SolverKind::Euler, SolverKind::Rk4, SolverKind::Leapfrog] {
        let mut integrator = oscillator(1.0, 0.0);
        for (time, step) in [(0.0, 0.1), (-1.0, 0.1), (1.0, 0.0), (1.0, -0.1), (1.0, 2.0)] {
            let err = integrator
                .solve(solver, StepSettings::new(time, step))
                .expect_err("invalid parameters");
            assert!(
                matches!(err, SolveError::InvalidParameter(_)),
                "{solver} accepted ({time}, {step}): {err:?}"
            );
        }
    }
}

#[test]
fn single_precision_integrates() {
    let mut integrator = Integrator::<f32>::new(1, vec![1.0]).expect("integrator");
    integrator.set_function(0, |p| -p[0]).expect("slot 0");
    let trajectory = integrator.rk4_solve(1.5, 0.5).expect("solve");
    assert_eq!(trajectory.len(), 3);
    assert_relative_eq!(trajectory[2][0], (-1.0f32).exp(), max_relative = 1e-2);
}

#[test]
fn single_precision_times_stay_on_grid() {
    let mut integrator = Integrator::<f32>::new(1, vec![0.0]).expect("integrator");
    integrator.set_function(0, |_| 0.0).expect("slot 0");
    let trajectory = integrator.euler_solve(1000.0, 0.01).expect("solve");
    assert_eq!(trajectory.len(), 100_000);

    for (i, point) in trajectory.points().iter().enumerate() {
        assert_abs_diff_eq!(f64::from(point.time()), i as f64 * 0.01, epsilon = 1e-3);
    }
    let last = trajectory.last().expect("last point");
    assert!(last.time() <= 1000.0, "last time {} past horizon", last.time());
}
