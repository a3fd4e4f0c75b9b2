//! Per-frame advancement for each mode.
//!
//! Each stepper consumes the frame delta, mutates its context, refreshes
//! the metric and graph registries and, on completion, writes the summary
//! row and interpretation before finishing the run.

use super::context::{CarTrack, ConservativeContext, KineticContext, PowerContext, WorkContext};
use super::{format_value, SimEngine};
use crate::config::Mode;
use crate::engine::WorkForce;
use crate::forces::{integrate_slice, STEP_EPSILON};
use crate::motion::Kinematics;
use crate::GRAVITY;

/// Goal band treated as arrival after a frame of sub-steps.
const GOAL_TOLERANCE: f64 = 1e-6;

/// Work and average power delivered by one elevator car this frame.
#[derive(Debug, Clone, Copy)]
struct LiftInfo {
    work: f64,
    power: f64,
}

impl SimEngine {
    // --- Work modes --------------------------------------------------------

    pub(crate) fn advance_work(
        &mut self,
        mut ctx: WorkContext,
        mode: Mode,
        dt: f64,
        now: f64,
    ) -> WorkContext {
        let mass = ctx.body.effective_mass();
        let goal = ctx.body.goal_distance;
        let step_dt = ctx.step_dt.clamp(1e-4, 0.02);
        let friction_limit = if self.friction_active {
            ctx.friction_mu.max(0.0) * mass * GRAVITY
        } else {
            0.0
        };

        let mut remaining = dt;
        let mut moved = false;
        let mut last_applied = ctx.force.at(ctx.body.position);
        let mut last_friction = 0.0;
        let mut last_block = false;

        while remaining > STEP_EPSILON && !ctx.body.completed {
            let slice = step_dt.min(remaining);
            let position = ctx.body.position;
            let applied = ctx.force.at(position);

            let out = integrate_slice(applied, ctx.body.velocity, mass, friction_limit, slice);

            let mut displacement = out.displacement;
            let mut new_position = position + displacement;
            let mut new_velocity = out.velocity;

            if displacement.abs() > STEP_EPSILON {
                if goal > 0.0 && new_position >= goal {
                    displacement = goal - position;
                    new_position = goal;
                    ctx.body.completed = true;
                } else if new_position < 0.0 {
                    displacement = -position;
                    new_position = 0.0;
                    new_velocity = 0.0;
                }
                moved = true;
                last_block = false;
                ctx.applied_work += applied * displacement;
                ctx.friction_work += out.friction_force * displacement;
            } else {
                last_block = out.stuck;
            }

            ctx.body.position = new_position;
            ctx.body.velocity = new_velocity;
            ctx.body.kinetic_energy = 0.5 * mass * new_velocity * new_velocity;

            last_applied = applied;
            last_friction = out.friction_force;
            remaining -= out.time_consumed;

            // A frame that only produced a static-friction hold is over;
            // the remaining slices would change nothing.
            if last_block && !moved {
                break;
            }
        }

        ctx.moved = ctx.moved || moved;
        ctx.blocked_by_friction = last_block && self.friction_active;
        ctx.last_applied_force = last_applied;
        ctx.last_friction_force = last_friction;

        let net_work = ctx.applied_work + ctx.friction_work;
        self.record_metric("time", now, now);
        self.record_metric("applied_work", now, ctx.applied_work);
        self.record_metric("friction_work", now, ctx.friction_work);
        self.record_metric("net_work", now, net_work);
        self.record_metric("force", now, ctx.last_applied_force);
        self.record_metric("distance", now, ctx.body.position);
        self.record_metric("velocity", now, ctx.body.velocity);

        if moved {
            self.record_graph("work_vs_distance", ctx.body.position, net_work);
            self.record_graph("force_vs_distance", ctx.body.position, ctx.last_applied_force);
        }

        if goal > 0.0 && ctx.body.position >= goal - GOAL_TOLERANCE {
            ctx.body.position = goal;
            ctx.body.completed = true;
        }

        if ctx.body.completed {
            if !ctx.summary_recorded {
                self.record_work_summary(&mut ctx, mode, now, net_work);
            }
            self.finish();
        } else if ctx.blocked_by_friction {
            self.pause();
        }
        ctx
    }

    fn record_work_summary(&mut self, ctx: &mut WorkContext, mode: Mode, now: f64, net_work: f64) {
        let mut row = vec![
            now,
            ctx.applied_work,
            ctx.friction_work,
            net_work,
            ctx.last_applied_force,
            ctx.body.position,
            ctx.body.velocity,
        ];
        if let WorkForce::Variable(force) = &ctx.force {
            row.push(force.stiffness);
            row.push(force.offset);
        }
        self.outcome
            .add_summary_row(Some(ctx.columns.clone()), row);
        ctx.summary_recorded = true;

        self.outcome.set_metric("applied_work", ctx.applied_work);
        self.outcome.set_metric("friction_work", ctx.friction_work);
        self.outcome.set_metric("net_work", net_work);
        self.outcome.set_metric("distance", ctx.body.position);

        let friction_text = if ctx.friction_work.abs() > 1e-3 {
            format!(
                "Friction dissipated {} J, which is why the net work ended at {} J.",
                format_value(ctx.friction_work.abs()),
                format_value(net_work)
            )
        } else {
            "There were no friction losses, so the applied and net work coincide.".to_string()
        };
        let mode_text = if mode == Mode::VariableWork {
            "The force grew with distance, so the slope of the applied-work curve steepens as the box advances."
        } else {
            "The applied force stayed essentially constant, so the applied-work curve climbs with a nearly uniform slope."
        };
        let graph_text = if ctx.friction_work.abs() > 1e-3 {
            "On the work-versus-distance graph the net-work curve climbs more slowly than the applied-work curve; the gap between them is the energy lost to friction."
        } else {
            "On the work-versus-distance graph both curves overlap, showing that all the applied energy became useful work."
        };
        let text = format!(
            "In {} s the box travelled {} m, receiving {} J of applied work with a final force of {} N. {friction_text} {mode_text} {graph_text}",
            format_value(now),
            format_value(ctx.body.position),
            format_value(ctx.applied_work),
            format_value(ctx.last_applied_force)
        );
        self.set_interpretation(text);
    }

    // --- Power mode --------------------------------------------------------

    pub(crate) fn advance_power(&mut self, mut ctx: PowerContext, dt: f64, now: f64) -> PowerContext {
        let mass = ctx.mass_kg;
        let height = ctx.height_m;
        let fast = Self::lift_car(&mut ctx.fast, mass, height, dt);
        let slow = Self::lift_car(&mut ctx.slow, mass, height, dt);

        self.record_metric("time", now, now);
        self.record_metric("power_fast", now, fast.power);
        self.record_metric("power_slow", now, slow.power);
        self.record_metric("total_work", now, fast.work);
        self.record_metric("height_fast", now, ctx.fast.car.position);
        self.record_metric("height_slow", now, ctx.slow.car.position);
        self.record_graph("power_fast_vs_time", now, fast.power);
        self.record_graph("power_slow_vs_time", now, slow.power);

        if ctx.fast.car.completed && ctx.slow.car.completed {
            if !ctx.summary_recorded {
                self.record_power_summary(&mut ctx, now, fast, slow);
            }
            self.finish();
        }
        ctx
    }

    /// Advance one car along its scripted lift: position follows the ratio
    /// of elapsed to target time, so the car arrives exactly on schedule.
    fn lift_car(track: &mut CarTrack, mass: f64, height: f64, dt: f64) -> LiftInfo {
        if track.car.completed {
            let work = mass * GRAVITY * height;
            return LiftInfo {
                work,
                power: if track.target_time > 0.0 {
                    work / track.target_time
                } else {
                    0.0
                },
            };
        }

        track.elapsed += dt;
        let ratio = (track.elapsed / track.target_time).min(1.0);
        track.car.position = height * ratio;
        track.car.velocity = if track.target_time > 0.0 {
            height / track.target_time
        } else {
            0.0
        };
        let work = mass * GRAVITY * track.car.position;

        let goal = track.car.goal_distance;
        if goal > 0.0 && track.car.position >= goal {
            track.car.position = goal;
            track.car.velocity = 0.0;
            track.car.completed = true;
        } else if ratio >= 1.0 {
            track.car.completed = true;
        }

        LiftInfo {
            work,
            power: if track.elapsed > 0.0 {
                work / track.elapsed
            } else {
                0.0
            },
        }
    }

    fn record_power_summary(
        &mut self,
        ctx: &mut PowerContext,
        now: f64,
        fast: LiftInfo,
        slow: LiftInfo,
    ) {
        let row = vec![
            now,
            fast.work,
            fast.power,
            slow.power,
            ctx.fast.car.position,
            ctx.slow.car.position,
        ];
        self.outcome.add_summary_row(Some(ctx.columns.clone()), row);
        ctx.summary_recorded = true;

        self.outcome.set_metric("total_work", fast.work);
        self.outcome.set_metric("power_fast", fast.power);
        self.outcome.set_metric("power_slow", slow.power);

        let difference = fast.power - slow.power;
        let winner = if difference >= 0.0 { "fast" } else { "slow" };
        let comparison = if difference.abs() < 1e-3 {
            "Both elevators delivered practically the same average power.".to_string()
        } else if slow.power.abs() > 1e-6 {
            format!(
                "The {winner} elevator was {} times as powerful because it completed the same work over a different duration.",
                format_value((fast.power / slow.power).abs())
            )
        } else {
            format!("The {winner} elevator delivered most of the useful power; the other barely contributed energy during the trial.")
        };
        let text = format!(
            "Lifting the load {} m required {} J of work. The fast elevator took {} s delivering {} W while the slow one took {} s with {} W. {comparison} On the power-versus-time graph the fast elevator's curve stays above whenever it reaches the target height sooner.",
            format_value(ctx.height_m),
            format_value(fast.work),
            format_value(ctx.fast.elapsed),
            format_value(fast.power),
            format_value(ctx.slow.elapsed),
            format_value(slow.power)
        );
        self.set_interpretation(text);
    }

    // --- Kinetic-energy mode -----------------------------------------------

    pub(crate) fn advance_kinetic(
        &mut self,
        mut ctx: KineticContext,
        dt: f64,
        now: f64,
    ) -> KineticContext {
        if !ctx.vehicle.completed {
            Kinematics::apply(&mut ctx.vehicle, ctx.drive_force, dt);
            // Arrival snaps to the analytic end state so the displayed
            // energy equals ½·m·v_target² independent of step size.
            if ctx.goal_distance > 0.0 && ctx.vehicle.distance >= ctx.goal_distance {
                let mass = ctx.vehicle.mass_kg.max(0.0);
                ctx.vehicle.distance = ctx.goal_distance;
                ctx.vehicle.position = ctx.goal_distance;
                ctx.vehicle.velocity = ctx.target_velocity;
                ctx.vehicle.kinetic_energy =
                    0.5 * mass * ctx.target_velocity * ctx.target_velocity;
                ctx.vehicle.completed = true;
            }
        }

        self.record_metric("time", now, now);
        self.record_metric("kinetic_energy", now, ctx.vehicle.kinetic_energy);
        self.record_metric("velocity", now, ctx.vehicle.velocity);
        self.record_metric("distance", now, ctx.vehicle.distance);
        self.record_graph("energy_vs_time", now, ctx.vehicle.kinetic_energy);
        self.record_graph("velocity_vs_time", now, ctx.vehicle.velocity);

        if ctx.vehicle.completed {
            if !ctx.summary_recorded {
                self.record_kinetic_summary(&mut ctx, now);
            }
            self.finish();
        }
        ctx
    }

    fn record_kinetic_summary(&mut self, ctx: &mut KineticContext, now: f64) {
        let row = vec![
            now,
            ctx.vehicle.distance,
            ctx.vehicle.velocity,
            ctx.vehicle.kinetic_energy,
        ];
        self.outcome.add_summary_row(Some(ctx.columns.clone()), row);
        ctx.summary_recorded = true;

        self.outcome.set_metric("distance", ctx.vehicle.distance);
        self.outcome.set_metric("velocity", ctx.vehicle.velocity);
        self.outcome
            .set_metric("kinetic_energy", ctx.vehicle.kinetic_energy);

        let goal_text = if ctx.goal_distance > 0.0 {
            format!(
                "The proposed goal of {} m of travel was reached.",
                format_value(ctx.goal_distance)
            )
        } else {
            format!(
                "The vehicle advanced {} m during the simulation.",
                format_value(ctx.vehicle.distance)
            )
        };
        let text = format!(
            "In {} s the vehicle advanced {} m and finished at {} m/s, corresponding to a kinetic energy of {} J. {goal_text} The energy-versus-time graph shows kinetic energy growing as velocity rises; the velocity-versus-time graph lets you check whether the increase was steady.",
            format_value(now),
            format_value(ctx.vehicle.distance),
            format_value(ctx.vehicle.velocity),
            format_value(ctx.vehicle.kinetic_energy)
        );
        self.set_interpretation(text);
    }

    // --- Conservative-forces mode ------------------------------------------

    pub(crate) fn advance_conservative(
        &mut self,
        mut ctx: ConservativeContext,
        dt: f64,
        now: f64,
    ) -> ConservativeContext {
        let step = ctx.integrator.advance(&mut ctx.ball, dt, ctx.ground_height);

        ctx.current_energy = step.mechanical_energy;
        ctx.final_velocity = ctx.ball.velocity;

        self.record_metric("time", now, now);
        self.record_metric("height", now, ctx.ball.height);
        self.record_metric("velocity", now, ctx.ball.velocity);
        self.record_metric("acceleration", now, ctx.integrator.gravity);
        self.record_metric("gravity_work", now, ctx.ball.gravity_work);
        self.record_metric("potential_energy", now, step.potential_energy);
        self.record_metric("kinetic_energy", now, step.kinetic_energy);
        self.record_metric("mechanical_energy", now, step.mechanical_energy);

        self.record_graph("height_vs_time", now, ctx.ball.height);
        self.record_graph("velocity_vs_time", now, ctx.ball.velocity);
        self.record_graph("mechanical_energy_vs_time", now, step.mechanical_energy);

        if ctx.ball.completed && !ctx.summary_recorded {
            ctx.final_velocity = step.impact_velocity;
            self.record_conservative_summary(&mut ctx, now);
            self.finish();
        }
        ctx
    }

    fn record_conservative_summary(&mut self, ctx: &mut ConservativeContext, now: f64) {
        let row = vec![
            now,
            ctx.initial_height,
            ctx.ball.height,
            ctx.final_velocity,
            ctx.ball.gravity_work,
            ctx.initial_energy,
            ctx.current_energy,
        ];
        self.outcome.add_summary_row(Some(ctx.columns.clone()), row);
        ctx.summary_recorded = true;

        self.outcome.set_metric("gravity_work", ctx.ball.gravity_work);
        self.outcome.set_metric("impact_velocity", ctx.final_velocity);
        self.outcome.set_metric("mechanical_energy", ctx.current_energy);

        let height_text = if ctx.ball.height > ctx.ground_height {
            format!(
                "The ball is still {} m above the ground, retaining part of its potential energy.",
                format_value(ctx.ball.height - ctx.ground_height)
            )
        } else {
            "The ball reached the ground and, in this ideal model, the potential energy turned entirely into kinetic energy just before impact.".to_string()
        };
        let conservation_text = if (ctx.initial_energy - ctx.current_energy).abs() < 1e-2 {
            format!(
                "The final mechanical energy ({} J) matches the initial one, evidence that mechanical energy is conserved when only gravity acts.",
                format_value(ctx.current_energy)
            )
        } else {
            format!(
                "The initial ({} J) and final ({} J) mechanical energies differ slightly due to numerical effects; in an ideal conservative system they would coincide.",
                format_value(ctx.initial_energy),
                format_value(ctx.current_energy)
            )
        };
        let text = format!(
            "Gravity acts as a conservative force: in {} s the ball descended from {} m. Gravity did {} J of work and the ball hit the ground at {} m/s. {height_text} {conservation_text}",
            format_value(now),
            format_value(ctx.initial_height),
            format_value(ctx.ball.gravity_work),
            format_value(ctx.final_velocity)
        );
        self.set_interpretation(text);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{
        ConservativeParams, ConstantWorkParams, KineticEnergyParams, PowerParams,
        VariableWorkParams,
    };
    use crate::engine::{ModeContext, RunState, SimEngine};
    use crate::GRAVITY;

    const FRAME: f64 = 1.0 / 60.0;

    fn run_to_completion(engine: &mut SimEngine, max_frames: usize) {
        for _ in 0..max_frames {
            if engine.state() != RunState::Running {
                break;
            }
            engine.advance(FRAME);
        }
    }

    #[test]
    fn test_constant_work_reaches_goal_with_exact_work() {
        let mut engine = SimEngine::new();
        engine.configure_constant_work(&ConstantWorkParams {
            mass_kg: 2.0,
            force_n: 10.0,
            goal_distance_m: 5.0,
            ..ConstantWorkParams::default()
        });
        assert!(engine.start().is_ok());
        run_to_completion(&mut engine, 10_000);

        assert_eq!(engine.state(), RunState::Finished);
        // W = F·d = 10 N × 5 m = 50 J
        assert!((engine.metric("applied_work").unwrap_or(0.0) - 50.0).abs() < 1e-6);
        assert!((engine.metric("net_work").unwrap_or(0.0) - 50.0).abs() < 1e-6);
        assert!((engine.metric("distance").unwrap_or(0.0) - 5.0).abs() < 1e-9);
        assert_eq!(engine.summary().rows.len(), 1);
        assert!(!engine.outcome().interpretation.is_empty());
    }

    #[test]
    fn test_constant_work_friction_reduces_net_work() {
        let mut engine = SimEngine::new();
        engine.configure_constant_work(&ConstantWorkParams {
            mass_kg: 2.0,
            force_n: 20.0,
            goal_distance_m: 5.0,
            friction_active: true,
            friction_mu: 0.2,
        });
        assert!(engine.start().is_ok());
        // Active friction pre-pauses the run; resume to begin moving.
        engine.resume();
        run_to_completion(&mut engine, 10_000);

        assert_eq!(engine.state(), RunState::Finished);
        let applied = engine.metric("applied_work").unwrap_or(0.0);
        let friction = engine.metric("friction_work").unwrap_or(0.0);
        let net = engine.metric("net_work").unwrap_or(0.0);
        assert!((applied - 100.0).abs() < 1e-6);
        // W_fric = -μ·m·g·d = -0.2·2·9.81·5 = -19.62 J
        assert!((friction + 19.62).abs() < 1e-6);
        assert!((net - (applied + friction)).abs() < 1e-9);
    }

    #[test]
    fn test_static_friction_locks_and_auto_pauses() {
        // Applied 2 N below the static limit μ·m·g = 0.5·2·9.81 = 9.81 N.
        let mut engine = SimEngine::new();
        engine.configure_constant_work(&ConstantWorkParams {
            mass_kg: 2.0,
            force_n: 2.0,
            goal_distance_m: 5.0,
            friction_active: true,
            friction_mu: 0.5,
        });
        assert!(engine.start().is_ok());
        assert_eq!(engine.state(), RunState::Paused);
        engine.resume();
        engine.advance(FRAME);

        assert_eq!(engine.state(), RunState::Paused);
        assert!((engine.metric("distance").unwrap_or(1.0) - 0.0).abs() < f64::EPSILON);

        // Disabling friction releases the lock and the box starts moving.
        engine.set_friction_active(false);
        assert_eq!(engine.state(), RunState::Running);
        run_to_completion(&mut engine, 10_000);
        assert_eq!(engine.state(), RunState::Finished);
    }

    #[test]
    fn test_variable_work_grows_with_distance() {
        let mut engine = SimEngine::new();
        engine.configure_variable_work(&VariableWorkParams {
            mass_kg: 1.0,
            stiffness_n_per_m: 4.0,
            goal_distance_m: 3.0,
            ..VariableWorkParams::default()
        });
        assert!(engine.start().is_ok());
        run_to_completion(&mut engine, 20_000);

        assert_eq!(engine.state(), RunState::Finished);
        // W = F0·d + ½·k·d² = 0.1·3 + ½·4·9 = 18.3 J, up to sub-step
        // discretization of the position-dependent force.
        let applied = engine.metric("applied_work").unwrap_or(0.0);
        assert!((applied - 18.3).abs() < 0.5);
        // Summary row carries the stiffness and offset columns.
        let rows = engine.summary().rows;
        assert_eq!(rows[0].len(), 9);
    }

    #[test]
    fn test_power_average_powers() {
        // A frame of 1/64 s is exactly representable, so the accumulated
        // lift times land exactly on the 4 s and 16 s targets.
        let lift_frame = 1.0 / 64.0;
        let mut engine = SimEngine::new();
        engine.configure_power(&PowerParams {
            mass_kg: 20.0,
            height_m: 10.0,
            fast_time_s: 4.0,
            slow_time_s: 16.0,
        });
        assert!(engine.start().is_ok());
        for _ in 0..10_000 {
            if engine.state() != RunState::Running {
                break;
            }
            engine.advance(lift_frame);
        }

        assert_eq!(engine.state(), RunState::Finished);
        // W = m·g·h = 20·9.81·10 = 1962 J; P_fast = 490.5 W, P_slow = 122.625 W
        let total = engine.metric("total_work").unwrap_or(0.0);
        assert!((total - 1962.0).abs() < 1e-6);
        let fast = engine.metric("power_fast").unwrap_or(0.0);
        let slow = engine.metric("power_slow").unwrap_or(0.0);
        assert!((fast - 490.5).abs() < 1e-6);
        assert!((slow - 122.625).abs() < 1e-6);
        assert!((engine.metric("height_fast").unwrap_or(0.0) - 10.0).abs() < 1e-9);
        assert!((engine.metric("height_slow").unwrap_or(0.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_power_fast_car_arrives_first() {
        let mut engine = SimEngine::new();
        engine.configure_power(&PowerParams {
            mass_kg: 20.0,
            height_m: 10.0,
            fast_time_s: 1.0,
            slow_time_s: 5.0,
        });
        assert!(engine.start().is_ok());
        for _ in 0..128 {
            engine.advance(1.0 / 64.0);
        }
        // After 2 s the fast car is done, the slow one is still lifting.
        assert_eq!(engine.state(), RunState::Running);
        assert!((engine.metric("height_fast").unwrap_or(0.0) - 10.0).abs() < 1e-9);
        assert!(engine.metric("height_slow").unwrap_or(10.0) < 10.0);
    }

    #[test]
    fn test_kinetic_snaps_to_target_energy() {
        let mut engine = SimEngine::new();
        engine.configure_kinetic_energy(&KineticEnergyParams {
            mass_kg: 1000.0,
            target_velocity_ms: 20.0,
            goal_distance_m: 100.0,
        });
        assert!(engine.start().is_ok());
        run_to_completion(&mut engine, 10_000);

        assert_eq!(engine.state(), RunState::Finished);
        // K = ½·m·v² = ½·1000·400 = 200 kJ exactly, thanks to the snap.
        assert!((engine.metric("kinetic_energy").unwrap_or(0.0) - 200_000.0).abs() < 1e-9);
        assert!((engine.metric("velocity").unwrap_or(0.0) - 20.0).abs() < f64::EPSILON);
        assert!((engine.metric("distance").unwrap_or(0.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_conservative_impact_speed_and_work() {
        let mut engine = SimEngine::new();
        engine.configure_conservative(&ConservativeParams {
            mass_kg: 1.0,
            initial_height_m: 5.0,
            ..ConservativeParams::default()
        });
        assert!(engine.start().is_ok());
        run_to_completion(&mut engine, 10_000);

        assert_eq!(engine.state(), RunState::Finished);
        // v = √(2·g·h) = √(2·9.81·5) ≈ 9.9045 m/s; W_g = m·g·h = 49.05 J
        let expected = (2.0_f64 * GRAVITY * 5.0).sqrt();
        let impact = engine.outcome().metrics.get("impact_velocity").unwrap_or(0.0);
        assert!((impact - expected).abs() < 1e-9);
        assert!((engine.metric("gravity_work").unwrap_or(0.0) - 49.05).abs() < 1e-9);
        assert!((engine.metric("height").unwrap_or(1.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_conservative_summary_row_keeps_raw_values() {
        let mut engine = SimEngine::new();
        engine.configure_conservative(&ConservativeParams {
            mass_kg: 1.0,
            initial_height_m: 5.0,
            ..ConservativeParams::default()
        });
        assert!(engine.start().is_ok());
        run_to_completion(&mut engine, 10_000);
        assert_eq!(engine.state(), RunState::Finished);

        // The summary row carries the engine's own impact speed at full
        // precision, not a display rounding of it.
        let rows = engine.summary().rows;
        let expected = (2.0_f64 * GRAVITY * 5.0).sqrt();
        assert!((rows[0][3] - expected).abs() < 1e-9);
        let recorded = engine
            .outcome()
            .metrics
            .get("impact_velocity")
            .unwrap_or(0.0);
        assert!((rows[0][3] - recorded).abs() < f64::EPSILON);
    }

    #[test]
    fn test_conservative_energy_conserved_during_fall() {
        let mut engine = SimEngine::new();
        engine.configure_conservative(&ConservativeParams {
            mass_kg: 2.0,
            initial_height_m: 10.0,
            ..ConservativeParams::default()
        });
        assert!(engine.start().is_ok());
        let initial = 2.0 * GRAVITY * 10.0;
        for _ in 0..30 {
            engine.advance(FRAME);
            let energy = engine.metric("mechanical_energy").unwrap_or(0.0);
            assert!((energy - initial).abs() < 1e-2);
        }
    }

    #[test]
    fn test_summary_rows_accumulate_across_runs() {
        let params = ConstantWorkParams {
            mass_kg: 2.0,
            force_n: 10.0,
            goal_distance_m: 1.0,
            ..ConstantWorkParams::default()
        };
        let mut engine = SimEngine::new();
        engine.configure_constant_work(&params);
        assert!(engine.start().is_ok());
        run_to_completion(&mut engine, 10_000);
        assert_eq!(engine.summary().rows.len(), 1);

        engine.configure_constant_work(&params);
        assert!(engine.start().is_ok());
        run_to_completion(&mut engine, 10_000);
        assert_eq!(engine.summary().rows.len(), 2);

        engine.remove_row(0);
        assert_eq!(engine.summary().rows.len(), 1);
        engine.remove_row(7);
        assert_eq!(engine.summary().rows.len(), 1);
    }

    #[test]
    fn test_reset_mid_run_allows_fresh_start() {
        let mut engine = SimEngine::new();
        engine.configure_kinetic_energy(&KineticEnergyParams {
            mass_kg: 1000.0,
            target_velocity_ms: 20.0,
            goal_distance_m: 100.0,
        });
        assert!(engine.start().is_ok());
        for _ in 0..60 {
            engine.advance(FRAME);
        }
        let mid_distance = engine.metric("distance").unwrap_or(0.0);
        assert!(mid_distance > 0.0);

        engine.reset();
        if let Some(ModeContext::KineticEnergy(ctx)) = engine.context() {
            assert!((ctx.vehicle.distance - 0.0).abs() < f64::EPSILON);
        } else {
            unreachable!("kinetic context expected");
        }
        assert!(engine.start().is_ok());
        run_to_completion(&mut engine, 10_000);
        assert_eq!(engine.state(), RunState::Finished);
    }

    #[test]
    fn test_work_graphs_only_record_movement() {
        // Stuck box: graphs must stay empty, metrics still tick.
        let mut engine = SimEngine::new();
        engine.configure_constant_work(&ConstantWorkParams {
            mass_kg: 2.0,
            force_n: 2.0,
            goal_distance_m: 5.0,
            friction_active: true,
            friction_mu: 0.5,
        });
        assert!(engine.start().is_ok());
        engine.resume();
        engine.advance(FRAME);

        assert!(engine
            .graph("work_vs_distance")
            .map(|g| g.points().is_empty())
            .unwrap_or(false));
        assert!(engine.metric("time").is_some());
    }
}
