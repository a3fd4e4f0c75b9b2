//! End-to-end scenario tests driving the engine the way a front-end does:
//! configure, start, advance one frame at a time, poll accessors.
//!
//! Each test is designed to falsify a hypothesis about the system; the
//! expected values come from the closed-form physics of each scenario.

use mecsim::engine::{ModeContext, RunState, SimEngine};
use mecsim::prelude::*;

const FRAME: f64 = 1.0 / 60.0;

fn drive(engine: &mut SimEngine, dt: f64, max_frames: usize) {
    for _ in 0..max_frames {
        if engine.state() != RunState::Running {
            break;
        }
        engine.advance(dt);
    }
}

/// Hypothesis to falsify: pushing a 2 kg box with 10 N over 5 m does not
/// accumulate exactly W = F·d = 50 J of applied work.
#[test]
fn constant_work_box_accumulates_force_times_distance() {
    let mut engine = SimEngine::new();
    engine.configure_constant_work(&ConstantWorkParams {
        mass_kg: 2.0,
        force_n: 10.0,
        goal_distance_m: 5.0,
        ..ConstantWorkParams::default()
    });
    engine.start().expect("valid parameters");
    drive(&mut engine, FRAME, 10_000);

    assert_eq!(engine.state(), RunState::Finished);
    let applied = engine.metric("applied_work").unwrap_or(0.0);
    assert!(
        (applied - 50.0).abs() < 1e-6,
        "applied work {applied} J != 50 J"
    );
    // Without friction, net work equals applied work.
    assert!((engine.metric("net_work").unwrap_or(0.0) - applied).abs() < 1e-9);
    // The time series is monotone in time and ends at the goal distance.
    let distance = engine.metric_series("distance").unwrap_or_default();
    assert!(distance.windows(2).all(|w| w[0].1 <= w[1].1 + 1e-12));
    assert!((distance.last().map(|(_, d)| *d).unwrap_or(0.0) - 5.0).abs() < 1e-9);
}

/// Hypothesis to falsify: an applied force below the static friction limit
/// still produces motion, or fails to auto-pause the run.
#[test]
fn static_friction_holds_box_and_pauses_run() {
    let mut engine = SimEngine::new();
    engine.configure_constant_work(&ConstantWorkParams {
        mass_kg: 2.0,
        force_n: 5.0,
        goal_distance_m: 5.0,
        friction_active: true,
        friction_mu: 0.5, // limit = 0.5·2·9.81 = 9.81 N > 5 N
    });
    engine.start().expect("valid parameters");
    // Enabling friction before starting leaves the run pre-paused.
    assert_eq!(engine.state(), RunState::Paused);
    engine.resume();
    engine.advance(FRAME);

    assert_eq!(engine.state(), RunState::Paused);
    assert!((engine.metric("distance").unwrap_or(1.0)).abs() < f64::EPSILON);
    assert!((engine.metric("applied_work").unwrap_or(1.0)).abs() < f64::EPSILON);

    // Releasing friction resumes and the box completes the run.
    engine.set_friction_active(false);
    assert_eq!(engine.state(), RunState::Running);
    drive(&mut engine, FRAME, 20_000);
    assert_eq!(engine.state(), RunState::Finished);
    assert_eq!(engine.summary().rows.len(), 1);
}

/// Hypothesis to falsify: kinetic friction fails to dissipate μ·m·g·d of
/// the applied work.
#[test]
fn kinetic_friction_dissipates_expected_work() {
    let mut engine = SimEngine::new();
    engine.configure_constant_work(&ConstantWorkParams {
        mass_kg: 2.0,
        force_n: 20.0,
        goal_distance_m: 5.0,
        friction_active: true,
        friction_mu: 0.2,
    });
    engine.start().expect("valid parameters");
    engine.resume();
    drive(&mut engine, FRAME, 20_000);

    assert_eq!(engine.state(), RunState::Finished);
    let friction = engine.metric("friction_work").unwrap_or(0.0);
    // W_fric = -μ·m·g·d = -0.2·2·9.81·5 = -19.62 J
    assert!((friction + 19.62).abs() < 1e-6, "friction work {friction} J");
    let net = engine.metric("net_work").unwrap_or(0.0);
    assert!((net - (100.0 - 19.62)).abs() < 1e-6);
}

/// Hypothesis to falsify: the variable-force mode does not accumulate the
/// integral F0·d + ½·k·d² of applied work.
#[test]
fn variable_work_matches_force_integral() {
    let mut engine = SimEngine::new();
    engine.configure_variable_work(&VariableWorkParams {
        mass_kg: 1.0,
        stiffness_n_per_m: 4.0,
        goal_distance_m: 3.0,
        ..VariableWorkParams::default()
    });
    engine.start().expect("valid parameters");
    drive(&mut engine, FRAME, 20_000);

    assert_eq!(engine.state(), RunState::Finished);
    // W = 0.1·3 + ½·4·3² = 18.3 J, within sub-step discretization error.
    let applied = engine.metric("applied_work").unwrap_or(0.0);
    assert!((applied - 18.3).abs() < 0.5, "applied work {applied} J");
    // The final recorded force approaches F(d) = 0.1 + 4·3 = 12.1 N.
    let force = engine.metric("force").unwrap_or(0.0);
    assert!((force - 12.1).abs() < 0.5, "final force {force} N");
}

/// Hypothesis to falsify: the two elevators do not deliver average powers
/// of W/t_fast and W/t_slow for the same total work.
#[test]
fn power_elevators_deliver_average_power() {
    // 1/64 s frames accumulate exactly onto the 4 s and 16 s targets.
    let frame = 1.0 / 64.0;
    let mut engine = SimEngine::new();
    engine.configure_power(&PowerParams {
        mass_kg: 100.0,
        height_m: 2.0,
        fast_time_s: 4.0,
        slow_time_s: 16.0,
    });
    engine.start().expect("valid parameters");
    drive(&mut engine, frame, 10_000);

    assert_eq!(engine.state(), RunState::Finished);
    // W = m·g·h = 100·9.81·2 = 1962 J; P = 490.5 W and 122.625 W.
    assert!((engine.metric("total_work").unwrap_or(0.0) - 1962.0).abs() < 1e-6);
    assert!((engine.metric("power_fast").unwrap_or(0.0) - 490.5).abs() < 1e-6);
    assert!((engine.metric("power_slow").unwrap_or(0.0) - 122.625).abs() < 1e-6);
    // Both cars end at the target height.
    assert!((engine.metric("height_fast").unwrap_or(0.0) - 2.0).abs() < 1e-9);
    assert!((engine.metric("height_slow").unwrap_or(0.0) - 2.0).abs() < 1e-9);
}

/// Hypothesis to falsify: the vehicle arrives at the goal with an energy
/// other than ½·m·v_target².
#[test]
fn kinetic_energy_vehicle_reaches_target_exactly() {
    let mut engine = SimEngine::new();
    engine.configure_kinetic_energy(&KineticEnergyParams {
        mass_kg: 1200.0,
        target_velocity_ms: 25.0,
        goal_distance_m: 150.0,
    });
    engine.start().expect("valid parameters");
    drive(&mut engine, FRAME, 20_000);

    assert_eq!(engine.state(), RunState::Finished);
    // K = ½·1200·25² = 375 kJ exactly at arrival.
    assert!((engine.metric("kinetic_energy").unwrap_or(0.0) - 375_000.0).abs() < 1e-9);
    assert!((engine.metric("velocity").unwrap_or(0.0) - 25.0).abs() < f64::EPSILON);
    assert!((engine.metric("distance").unwrap_or(0.0) - 150.0).abs() < f64::EPSILON);
    // Energy grows monotonically until the goal.
    let energy = engine.metric_series("kinetic_energy").unwrap_or_default();
    assert!(energy.windows(2).all(|w| w[0].1 <= w[1].1 + 1e-9));
}

/// Hypothesis to falsify: a ball dropped from 5 m hits the ground at a
/// speed other than √(2·g·h), or gravity does other than m·g·h of work.
#[test]
fn conservative_fall_impact_speed_and_gravity_work() {
    let mut engine = SimEngine::new();
    engine.configure_conservative(&ConservativeParams {
        mass_kg: 1.0,
        initial_height_m: 5.0,
        ..ConservativeParams::default()
    });
    engine.start().expect("valid parameters");
    drive(&mut engine, FRAME, 10_000);

    assert_eq!(engine.state(), RunState::Finished);
    let expected_impact = (2.0_f64 * GRAVITY * 5.0).sqrt();
    let impact = engine
        .outcome()
        .metrics
        .get("impact_velocity")
        .unwrap_or(0.0);
    assert!(
        (impact - expected_impact).abs() < 1e-9,
        "impact speed {impact} m/s != {expected_impact} m/s"
    );
    assert!((engine.metric("gravity_work").unwrap_or(0.0) - 49.05).abs() < 1e-9);
    assert!((engine.metric("height").unwrap_or(1.0)).abs() < f64::EPSILON);
    // The summary row reports the same impact speed at full precision.
    let rows = engine.summary().rows;
    assert!((rows[0][3] - expected_impact).abs() < 1e-9);
}

/// Hypothesis to falsify: mechanical energy drifts by more than the
/// display tolerance of 1e-2 J at any sampled instant of the fall.
#[test]
fn conservative_fall_conserves_mechanical_energy() {
    let mut engine = SimEngine::new();
    engine.configure_conservative(&ConservativeParams {
        mass_kg: 2.0,
        initial_height_m: 12.0,
        ..ConservativeParams::default()
    });
    engine.start().expect("valid parameters");
    let initial_energy = 2.0 * GRAVITY * 12.0;

    drive(&mut engine, FRAME, 10_000);
    assert_eq!(engine.state(), RunState::Finished);
    let series = engine
        .metric_series("mechanical_energy")
        .unwrap_or_default();
    assert!(!series.is_empty());
    for (time, energy) in series {
        assert!(
            (energy - initial_energy).abs() < 1e-2,
            "energy {energy} J at t={time} s drifted from {initial_energy} J"
        );
    }
}

/// Hypothesis to falsify: lifecycle operations are not idempotent or the
/// clock keeps accumulating outside the running state.
#[test]
fn lifecycle_pause_resume_reset_semantics() {
    let mut engine = SimEngine::new();
    engine.configure_constant_work(&ConstantWorkParams {
        mass_kg: 2.0,
        force_n: 10.0,
        goal_distance_m: 50.0,
        ..ConstantWorkParams::default()
    });
    engine.start().expect("valid parameters");
    for _ in 0..30 {
        engine.advance(FRAME);
    }
    let elapsed = engine.elapsed();
    assert!(elapsed > 0.0);

    engine.pause();
    engine.pause();
    engine.advance(FRAME);
    assert!((engine.elapsed() - elapsed).abs() < f64::EPSILON);

    engine.resume();
    engine.resume();
    assert_eq!(engine.state(), RunState::Running);

    engine.reset();
    assert_eq!(engine.state(), RunState::Configuring);
    assert!((engine.elapsed()).abs() < f64::EPSILON);
    // Metrics are emptied; a fresh start works without reconfiguration.
    assert_eq!(engine.metric("applied_work"), None);
    engine.start().expect("still configured");
    assert_eq!(engine.state(), RunState::Running);
}

/// Hypothesis to falsify: invalid parameters pass `start`, or a valid
/// engine reports the wrong error before configuration.
#[test]
fn start_validation_errors() {
    let mut engine = SimEngine::new();
    assert!(!engine.validate());
    assert!(matches!(engine.start(), Err(SimError::NotConfigured)));

    engine.configure_power(&PowerParams {
        mass_kg: 100.0,
        height_m: 30.0, // above the 25 m cap
        fast_time_s: 4.0,
        slow_time_s: 16.0,
    });
    assert!(!engine.validate());
    assert!(engine.start().is_err());
    assert_eq!(engine.state(), RunState::Configuring);

    engine.configure_power(&PowerParams {
        mass_kg: 100.0,
        height_m: 10.0,
        fast_time_s: 4.0,
        slow_time_s: 16.0,
    });
    assert!(engine.validate());
    assert!(engine.start().is_ok());
}

/// Hypothesis to falsify: summary rows do not accumulate across runs of
/// one mode, or the columns are rewritten when the mode is unchanged.
#[test]
fn summary_accumulates_rows_per_mode() {
    let params = KineticEnergyParams {
        mass_kg: 1000.0,
        target_velocity_ms: 10.0,
        goal_distance_m: 20.0,
    };
    let mut engine = SimEngine::new();
    engine.configure_kinetic_energy(&params);
    engine.start().expect("valid parameters");
    drive(&mut engine, FRAME, 20_000);
    let columns = engine.summary().columns;
    assert_eq!(engine.summary().rows.len(), 1);

    engine.configure_kinetic_energy(&params);
    engine.start().expect("valid parameters");
    drive(&mut engine, FRAME, 20_000);
    let summary = engine.summary();
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.columns, columns);

    // Switching modes rewrites the headers but keeps existing rows.
    engine.configure_conservative(&ConservativeParams {
        mass_kg: 1.0,
        initial_height_m: 5.0,
        ..ConservativeParams::default()
    });
    let switched = engine.summary();
    assert_ne!(switched.columns, columns);
    assert_eq!(switched.rows.len(), 2);
}

/// Hypothesis to falsify: YAML-loaded parameters behave differently from
/// programmatically built ones.
#[test]
fn yaml_parameters_drive_a_full_run() {
    let yaml = r"
mode: conservative
conservative:
  mass_kg: 1.0
  initial_height_m: 5.0
";
    let params = SimParams::from_yaml(yaml).expect("valid yaml");
    let mut engine = SimEngine::from_params(params).expect("valid parameters");
    assert_eq!(engine.mode(), Some(Mode::Conservative));

    engine.start().expect("valid parameters");
    drive(&mut engine, FRAME, 10_000);
    assert_eq!(engine.state(), RunState::Finished);
    assert!((engine.metric("gravity_work").unwrap_or(0.0) - 49.05).abs() < 1e-9);
}

/// Hypothesis to falsify: the context resets to a state that differs from
/// the freshly configured one.
#[test]
fn reset_restores_initial_body_state() {
    let mut engine = SimEngine::new();
    engine.configure_conservative(&ConservativeParams {
        mass_kg: 1.0,
        initial_height_m: 8.0,
        initial_velocity_ms: 1.0,
        ground_height_m: 0.0,
    });
    engine.start().expect("valid parameters");
    drive(&mut engine, FRAME, 10_000);
    assert_eq!(engine.state(), RunState::Finished);

    engine.reset();
    match engine.context() {
        Some(ModeContext::Conservative(ctx)) => {
            assert!((ctx.ball.height - 8.0).abs() < f64::EPSILON);
            assert!((ctx.ball.velocity - 1.0).abs() < f64::EPSILON);
            assert!((ctx.ball.gravity_work).abs() < f64::EPSILON);
            assert!(!ctx.ball.completed);
        }
        other => panic!("expected conservative context, got {other:?}"),
    }
}
