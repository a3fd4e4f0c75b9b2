//! Per-mode run state.
//!
//! Exactly one [`ModeContext`] exists per configured mode. The variant
//! carries everything a stepper accumulates across frames: bodies, work
//! integrals, friction flags, the summary column headers and whether the
//! final summary row has been written.

use serde::{Deserialize, Serialize};

use crate::bodies::{Ball, BoxBody, Vehicle};
use crate::config::Mode;
use crate::forces::{ConstantForce, VariableForce};
use crate::motion::FreeFall;

/// Applied-force model for the two work modes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum WorkForce {
    /// Constant force.
    Constant(ConstantForce),
    /// Position-dependent force.
    Variable(VariableForce),
}

impl WorkForce {
    /// Instantaneous force at position `x` (N).
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        match self {
            Self::Constant(force) => force.value(),
            Self::Variable(force) => force.value(x),
        }
    }
}

/// Accumulated state for the constant- and variable-force work modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkContext {
    /// The box being pushed.
    pub body: BoxBody,
    /// Applied-force model.
    pub force: WorkForce,
    /// Friction coefficient used while friction is enabled.
    pub friction_mu: f64,
    /// Integration sub-step (s), clamped to [1e-4, 0.02].
    pub step_dt: f64,
    /// Accumulated work done by the applied force (J).
    pub applied_work: f64,
    /// Accumulated work done by friction (J, ≤ 0).
    pub friction_work: f64,
    /// Whether static friction currently holds the box.
    pub blocked_by_friction: bool,
    /// Whether any movement has happened this run.
    pub moved: bool,
    /// Applied force at the last integrated slice (N).
    pub last_applied_force: f64,
    /// Friction force at the last integrated slice (N).
    pub last_friction_force: f64,
    /// Whether the final summary row has been written.
    pub summary_recorded: bool,
    /// Summary column headers for this mode.
    pub columns: Vec<String>,
}

impl WorkContext {
    fn reset(&mut self) {
        self.body.reset();
        self.applied_work = 0.0;
        self.friction_work = 0.0;
        self.blocked_by_friction = false;
        self.moved = false;
        self.last_applied_force = 0.0;
        self.last_friction_force = 0.0;
        self.summary_recorded = false;
    }
}

/// One elevator car racing the clock to the target height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarTrack {
    /// The car; `position` is the height reached.
    pub car: BoxBody,
    /// Seconds the car takes to complete the lift.
    pub target_time: f64,
    /// Seconds accumulated so far.
    pub elapsed: f64,
}

impl CarTrack {
    fn reset(&mut self) {
        self.car.reset();
        self.elapsed = 0.0;
    }
}

/// Accumulated state for the power mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerContext {
    /// Load mass (kg).
    pub mass_kg: f64,
    /// Target lift height (m).
    pub height_m: f64,
    /// The faster car.
    pub fast: CarTrack,
    /// The slower car.
    pub slow: CarTrack,
    /// Whether the final summary row has been written.
    pub summary_recorded: bool,
    /// Summary column headers for this mode.
    pub columns: Vec<String>,
}

impl PowerContext {
    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.summary_recorded = false;
    }
}

/// Accumulated state for the kinetic-energy mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KineticContext {
    /// The vehicle under propulsion.
    pub vehicle: Vehicle,
    /// Goal distance (m).
    pub goal_distance: f64,
    /// Velocity the vehicle should have at the goal (m/s).
    pub target_velocity: f64,
    /// Constant propulsion force derived from `v² = 2·a·d` (N).
    pub drive_force: f64,
    /// Whether the final summary row has been written.
    pub summary_recorded: bool,
    /// Summary column headers for this mode.
    pub columns: Vec<String>,
}

impl KineticContext {
    fn reset(&mut self) {
        self.vehicle.reset();
        self.summary_recorded = false;
    }
}

/// Accumulated state for the conservative-forces mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConservativeContext {
    /// The falling ball.
    pub ball: Ball,
    /// The free-fall integrator.
    pub integrator: FreeFall,
    /// Ground reference height (m).
    pub ground_height: f64,
    /// Release height used for energy bookkeeping (m).
    pub initial_height: f64,
    /// Release speed (m/s).
    pub initial_velocity: f64,
    /// Mechanical energy at release (J).
    pub initial_energy: f64,
    /// Mechanical energy after the last step (J).
    pub current_energy: f64,
    /// Speed reported in the summary; the impact speed once grounded.
    pub final_velocity: f64,
    /// Whether the final summary row has been written.
    pub summary_recorded: bool,
    /// Summary column headers for this mode.
    pub columns: Vec<String>,
}

impl ConservativeContext {
    fn reset(&mut self) {
        self.ball.reset();
        self.current_energy = self.initial_energy;
        self.final_velocity = self.initial_velocity;
        self.summary_recorded = false;
    }
}

/// Tagged union of all per-mode run states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModeContext {
    /// Constant-force work mode.
    ConstantWork(WorkContext),
    /// Variable-force work mode.
    VariableWork(WorkContext),
    /// Power mode.
    Power(PowerContext),
    /// Kinetic-energy mode.
    KineticEnergy(KineticContext),
    /// Conservative-forces mode.
    Conservative(ConservativeContext),
}

impl ModeContext {
    /// The mode this context belongs to.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::ConstantWork(_) => Mode::ConstantWork,
            Self::VariableWork(_) => Mode::VariableWork,
            Self::Power(_) => Mode::Power,
            Self::KineticEnergy(_) => Mode::KineticEnergy,
            Self::Conservative(_) => Mode::Conservative,
        }
    }

    /// Restore the context to its pre-run state.
    pub fn reset(&mut self) {
        match self {
            Self::ConstantWork(ctx) | Self::VariableWork(ctx) => ctx.reset(),
            Self::Power(ctx) => ctx.reset(),
            Self::KineticEnergy(ctx) => ctx.reset(),
            Self::Conservative(ctx) => ctx.reset(),
        }
    }

    /// Whether the context belongs to a work mode with a friction channel.
    #[must_use]
    pub const fn has_friction(&self) -> bool {
        matches!(self, Self::ConstantWork(_) | Self::VariableWork(_))
    }
}
