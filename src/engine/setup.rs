//! Mode configuration: builds bodies, registers metrics and graphs and
//! installs the per-mode context.
//!
//! Configuring always discards the previous context and visualization
//! registries. Summary columns are only rewritten when the mode differs
//! from the previously configured one, so consecutive runs of one mode
//! accumulate rows under shared headers.

use super::context::{
    CarTrack, ConservativeContext, KineticContext, ModeContext, PowerContext, WorkContext,
    WorkForce,
};
use super::SimEngine;
use crate::bodies::{Ball, BoxBody, Vehicle};
use crate::config::{
    ConservativeParams, ConstantWorkParams, KineticEnergyParams, Mode, PowerParams,
    VariableWorkParams,
};
use crate::forces::{ConstantForce, VariableForce};
use crate::motion::FreeFall;
use crate::GRAVITY;

/// Default work-mode integration sub-step (s).
const WORK_SUB_STEP: f64 = 0.01;

/// Release heights above this are clamped for energy bookkeeping.
const MAX_RELEASE_HEIGHT: f64 = 20.0;

fn columns(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| (*h).to_string()).collect()
}

impl SimEngine {
    fn register_work_visuals(&mut self) {
        self.register_metric("time", "Time", "s");
        self.register_metric("applied_work", "Applied work", "J");
        self.register_metric("friction_work", "Friction work", "J");
        self.register_metric("net_work", "Net work", "J");
        self.register_metric("force", "Force", "N");
        self.register_metric("distance", "Distance", "m");
        self.register_metric("velocity", "Velocity", "m/s");

        self.register_graph("work_vs_distance", "Work vs Distance", "Distance (m)", "Work (J)");
        self.register_graph(
            "force_vs_distance",
            "Force vs Distance",
            "Distance (m)",
            "Force (N)",
        );
    }

    /// Configure the constant-force work mode.
    pub fn configure_constant_work(&mut self, params: &ConstantWorkParams) -> &mut Self {
        self.begin_configuration(Mode::ConstantWork);
        self.params.constant_work = params.clone();
        self.register_work_visuals();

        let headers = columns(&[
            "Time (s)",
            "Applied work (J)",
            "Friction work (J)",
            "Net work (J)",
            "Force (N)",
            "Distance (m)",
            "Velocity (m/s)",
        ]);

        let body = BoxBody::new("constant-work-box", params.mass_kg, params.goal_distance_m);
        let context = WorkContext {
            body,
            force: WorkForce::Constant(ConstantForce::new(params.force_n)),
            friction_mu: params.friction_mu.max(0.0),
            step_dt: WORK_SUB_STEP,
            applied_work: 0.0,
            friction_work: 0.0,
            blocked_by_friction: false,
            moved: false,
            last_applied_force: 0.0,
            last_friction_force: 0.0,
            summary_recorded: false,
            columns: headers.clone(),
        };
        self.context = Some(ModeContext::ConstantWork(context));
        self.finish_configuration(Mode::ConstantWork, &headers);
        self.set_friction_active(params.friction_active);
        self
    }

    /// Configure the variable-force work mode.
    pub fn configure_variable_work(&mut self, params: &VariableWorkParams) -> &mut Self {
        self.begin_configuration(Mode::VariableWork);
        self.params.variable_work = params.clone();
        self.register_work_visuals();

        let headers = columns(&[
            "Time (s)",
            "Applied work (J)",
            "Friction work (J)",
            "Net work (J)",
            "Final force (N)",
            "Distance (m)",
            "Velocity (m/s)",
            "Stiffness k (N/m)",
            "Offset (N)",
        ]);

        let offset = if params.offset_n.is_finite() {
            params.offset_n
        } else {
            0.1
        };
        let body = BoxBody::new("variable-work-box", params.mass_kg, params.goal_distance_m);
        let context = WorkContext {
            body,
            force: WorkForce::Variable(VariableForce::new(params.stiffness_n_per_m, offset)),
            friction_mu: params.friction_mu.max(0.0),
            step_dt: WORK_SUB_STEP,
            applied_work: 0.0,
            friction_work: 0.0,
            blocked_by_friction: false,
            moved: false,
            last_applied_force: 0.0,
            last_friction_force: 0.0,
            summary_recorded: false,
            columns: headers.clone(),
        };
        self.context = Some(ModeContext::VariableWork(context));
        self.finish_configuration(Mode::VariableWork, &headers);
        self.set_friction_active(params.friction_active);
        self
    }

    /// Configure the power mode with a fast and a slow elevator car.
    pub fn configure_power(&mut self, params: &PowerParams) -> &mut Self {
        self.begin_configuration(Mode::Power);
        self.params.power = params.clone();

        self.register_metric("time", "Time", "s");
        self.register_metric("power_fast", "Fast power", "W");
        self.register_metric("power_slow", "Slow power", "W");
        self.register_metric("height_fast", "Fast height", "m");
        self.register_metric("height_slow", "Slow height", "m");
        self.register_metric("total_work", "Total work", "J");

        self.register_graph("power_fast_vs_time", "Fast power", "Time (s)", "Power (W)");
        self.register_graph("power_slow_vs_time", "Slow power", "Time (s)", "Power (W)");

        let headers = columns(&[
            "Total time (s)",
            "Total work (J)",
            "Fast power (W)",
            "Slow power (W)",
            "Fast height (m)",
            "Slow height (m)",
        ]);

        // Degenerate target times floor at 1 µs so the power ratio is
        // always defined.
        let fast_time = params.fast_time_s.max(1e-6);
        let slow_time = params.slow_time_s.max(1e-6);
        let context = PowerContext {
            mass_kg: params.mass_kg.max(0.0),
            height_m: params.height_m.max(0.0),
            fast: CarTrack {
                car: BoxBody::new("fast-car", params.mass_kg, params.height_m),
                target_time: fast_time,
                elapsed: 0.0,
            },
            slow: CarTrack {
                car: BoxBody::new("slow-car", params.mass_kg, params.height_m),
                target_time: slow_time,
                elapsed: 0.0,
            },
            summary_recorded: false,
            columns: headers.clone(),
        };
        self.context = Some(ModeContext::Power(context));
        self.finish_configuration(Mode::Power, &headers);
        self
    }

    /// Configure the kinetic-energy mode.
    ///
    /// The propulsion force is derived from the target velocity and goal
    /// distance through `v² = 2·a·d`, so under ideal integration the
    /// vehicle reaches the goal at exactly the target speed.
    pub fn configure_kinetic_energy(&mut self, params: &KineticEnergyParams) -> &mut Self {
        self.begin_configuration(Mode::KineticEnergy);
        self.params.kinetic_energy = params.clone();

        self.register_metric("time", "Time", "s");
        self.register_metric("kinetic_energy", "Kinetic energy", "J");
        self.register_metric("velocity", "Velocity", "m/s");
        self.register_metric("distance", "Distance", "m");

        self.register_graph("energy_vs_time", "Kinetic energy", "Time (s)", "Energy (J)");
        self.register_graph("velocity_vs_time", "Velocity", "Time (s)", "Velocity (m/s)");

        let headers = columns(&[
            "Total time (s)",
            "Final distance (m)",
            "Final velocity (m/s)",
            "Kinetic energy (J)",
        ]);

        let goal = params.goal_distance_m.max(0.0);
        let target_velocity = params.target_velocity_ms.max(0.0);
        let acceleration = if goal > 0.0 {
            target_velocity * target_velocity / (2.0 * goal)
        } else {
            0.0
        };
        let context = KineticContext {
            vehicle: Vehicle::new("kinetic-vehicle", params.mass_kg, goal),
            goal_distance: goal,
            target_velocity,
            drive_force: params.mass_kg.max(0.0) * acceleration,
            summary_recorded: false,
            columns: headers.clone(),
        };
        self.context = Some(ModeContext::KineticEnergy(context));
        self.finish_configuration(Mode::KineticEnergy, &headers);
        self
    }

    /// Configure the conservative-forces mode.
    pub fn configure_conservative(&mut self, params: &ConservativeParams) -> &mut Self {
        self.begin_configuration(Mode::Conservative);
        self.params.conservative = params.clone();

        self.register_metric("time", "Time", "s");
        self.register_metric("height", "Height", "m");
        self.register_metric("velocity", "Velocity", "m/s");
        self.register_metric("acceleration", "Acceleration", "m/s²");
        self.register_metric("gravity_work", "Gravity work", "J");
        self.register_metric("potential_energy", "Potential energy", "J");
        self.register_metric("kinetic_energy", "Kinetic energy", "J");
        self.register_metric("mechanical_energy", "Mechanical energy", "J");

        self.register_graph("height_vs_time", "Height vs Time", "Time (s)", "Height (m)");
        self.register_graph(
            "velocity_vs_time",
            "Velocity vs Time",
            "Time (s)",
            "Velocity (m/s)",
        );
        self.register_graph(
            "mechanical_energy_vs_time",
            "Mechanical energy vs Time",
            "Time (s)",
            "Energy (J)",
        );

        let headers = columns(&[
            "Total time (s)",
            "Initial height (m)",
            "Final height (m)",
            "Final velocity (m/s)",
            "Gravity work (J)",
            "Initial mechanical energy (J)",
            "Final mechanical energy (J)",
        ]);

        let ground = params.ground_height_m.max(0.0);
        let release_height = params
            .initial_height_m
            .min(MAX_RELEASE_HEIGHT)
            .max(ground);
        let mass = params.mass_kg.max(0.0);
        let initial_velocity = params.initial_velocity_ms;
        let initial_energy = mass * GRAVITY * (release_height - ground).max(0.0)
            + 0.5 * mass * initial_velocity * initial_velocity;

        let context = ConservativeContext {
            ball: Ball::new("free-fall-ball", params.mass_kg, release_height, initial_velocity),
            integrator: FreeFall::default(),
            ground_height: ground,
            initial_height: release_height,
            initial_velocity,
            initial_energy,
            current_energy: initial_energy,
            final_velocity: initial_velocity,
            summary_recorded: false,
            columns: headers.clone(),
        };
        self.context = Some(ModeContext::Conservative(context));
        self.finish_configuration(Mode::Conservative, &headers);
        // Free fall has no friction channel.
        self.set_friction_active(false);
        self
    }
}
