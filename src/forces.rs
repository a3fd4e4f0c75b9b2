//! Force models for the two work modes.
//!
//! [`ConstantForce`] and [`VariableForce`] are pure functions from state to
//! instantaneous applied force. Each also knows how to integrate one raw
//! timestep against a [`BoxBody`] ([`ConstantForce::apply_step`]), using the
//! same slice integrator the engine's sub-stepped work loop is built on:
//! stick/slip friction resolution followed by a constant-acceleration
//! kinematic update with an exact zero-crossing solve.

use serde::{Deserialize, Serialize};

use crate::bodies::BoxBody;
use crate::GRAVITY;

/// Velocities below this magnitude are treated as rest.
pub const VELOCITY_EPSILON: f64 = 1e-6;

/// Time slices below this are considered consumed.
pub const STEP_EPSILON: f64 = 1e-8;

/// Friction regime resolved for one integration slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrictionRegime {
    /// No friction channel (limit is zero).
    Inactive,
    /// Body in motion; friction opposes velocity at its maximum magnitude.
    Kinetic,
    /// Static friction fully cancels the applied force; body stays at rest.
    Stick,
    /// Applied force exceeds the static limit; body begins to slip.
    Slip,
}

/// Resolved friction force for one slice.
#[derive(Debug, Clone, Copy)]
pub struct FrictionForce {
    /// Which regime applied.
    pub regime: FrictionRegime,
    /// Signed friction force (N), opposing motion or applied force.
    pub force: f64,
}

/// Resolve the friction direction and magnitude for one slice.
///
/// `limit` is the maximum static/kinetic friction magnitude `μ·m·g`.
#[must_use]
pub fn resolve_friction(applied: f64, velocity: f64, limit: f64) -> FrictionForce {
    if limit <= 0.0 {
        return FrictionForce {
            regime: FrictionRegime::Inactive,
            force: 0.0,
        };
    }
    if velocity.abs() > VELOCITY_EPSILON {
        FrictionForce {
            regime: FrictionRegime::Kinetic,
            force: -limit * velocity.signum(),
        }
    } else if applied.abs() <= limit + 1e-9 {
        FrictionForce {
            regime: FrictionRegime::Stick,
            force: -applied,
        }
    } else {
        FrictionForce {
            regime: FrictionRegime::Slip,
            force: -limit * applied.signum(),
        }
    }
}

/// Outcome of integrating one bounded slice of time.
#[derive(Debug, Clone, Copy)]
pub struct SliceOutcome {
    /// Net displacement over the consumed time (m).
    pub displacement: f64,
    /// Velocity at the end of the consumed time (m/s, snapped to 0 at rest).
    pub velocity: f64,
    /// Time actually consumed (≤ the requested slice).
    pub time_consumed: f64,
    /// Signed friction force in effect (N).
    pub friction_force: f64,
    /// Whether static friction held the body at rest this slice.
    pub stuck: bool,
}

/// Integrate one slice of constant applied force over at most `dt` seconds.
///
/// Friction is resolved first; if the body sticks, no time-consuming motion
/// happens. Otherwise constant-acceleration kinematics apply, except that a
/// velocity sign change is resolved exactly: only the sub-interval up to the
/// zero crossing is consumed and the velocity lands on exactly zero, so a
/// stick transition never overshoots into oscillation.
#[must_use]
pub fn integrate_slice(
    applied: f64,
    velocity: f64,
    mass: f64,
    friction_limit: f64,
    dt: f64,
) -> SliceOutcome {
    let friction = resolve_friction(applied, velocity, friction_limit);
    if friction.regime == FrictionRegime::Stick {
        return SliceOutcome {
            displacement: 0.0,
            velocity: 0.0,
            time_consumed: dt,
            friction_force: friction.force,
            stuck: true,
        };
    }

    let net = applied + friction.force;
    let mass = mass.max(crate::bodies::MASS_EPSILON);

    let (displacement, new_velocity, time_consumed) = if net.abs() > 0.0 {
        let accel = net / mass;
        let tentative = velocity + accel * dt;
        if velocity.abs() > VELOCITY_EPSILON && tentative * velocity <= 0.0 {
            // Solve the exact instant the velocity reaches zero and consume
            // only that much of the slice.
            let t_stop = (velocity / accel).abs().min(dt).max(0.0);
            let disp = velocity * t_stop + 0.5 * accel * t_stop * t_stop;
            (disp, 0.0, t_stop.max(STEP_EPSILON))
        } else {
            let disp = velocity * dt + 0.5 * accel * dt * dt;
            (disp, tentative, dt)
        }
    } else if velocity.abs() > VELOCITY_EPSILON {
        (velocity * dt, velocity, dt)
    } else {
        (0.0, velocity, dt)
    };

    let snapped = if new_velocity.abs() < VELOCITY_EPSILON {
        0.0
    } else {
        new_velocity
    };

    SliceOutcome {
        displacement,
        velocity: snapped,
        time_consumed,
        friction_force: friction.force,
        stuck: false,
    }
}

/// Per-step data reported by a raw force-model application.
#[derive(Debug, Clone, Copy)]
pub struct StepData {
    /// Instantaneous applied force (N).
    pub applied_force: f64,
    /// Signed friction force (N).
    pub friction_force: f64,
    /// Displacement this step (m).
    pub displacement: f64,
    /// Work done by the applied force this step (J).
    pub applied_work: f64,
    /// Work done by friction this step (J, ≤ 0).
    pub friction_work: f64,
}

/// Apply one raw timestep of `applied` force to a box, honoring its surface
/// friction coefficient and goal clamping. Shared by both force models.
fn apply_to_box(body: &mut BoxBody, applied: f64, dt: f64) -> StepData {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mass = body.effective_mass();
    let limit = body.friction_mu.max(0.0) * mass * GRAVITY;

    let outcome = integrate_slice(applied, body.velocity, mass, limit, dt);

    let mut displacement = outcome.displacement;
    let mut position = body.position + displacement;
    let mut velocity = outcome.velocity;

    if body.goal_distance > 0.0 && position >= body.goal_distance {
        displacement = body.goal_distance - body.position;
        position = body.goal_distance;
        body.completed = true;
    } else if position < 0.0 {
        displacement = -body.position;
        position = 0.0;
        velocity = 0.0;
    }

    body.position = position;
    body.velocity = velocity;
    body.kinetic_energy = 0.5 * mass * velocity * velocity;

    StepData {
        applied_force: applied,
        friction_force: outcome.friction_force,
        displacement,
        applied_work: applied * displacement,
        friction_work: outcome.friction_force * displacement,
    }
}

/// Constant applied force (N).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ConstantForce {
    /// Force magnitude (N).
    pub magnitude: f64,
}

impl ConstantForce {
    /// Create a constant force.
    #[must_use]
    pub const fn new(magnitude: f64) -> Self {
        Self { magnitude }
    }

    /// Instantaneous force value (N).
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.magnitude
    }

    /// Analytic work done over a displacement `d`: `F·d`.
    #[must_use]
    pub fn work_over(&self, d: f64) -> f64 {
        self.magnitude * d
    }

    /// Integrate one raw timestep against a box.
    pub fn apply_step(&self, body: &mut BoxBody, dt: f64) -> StepData {
        apply_to_box(body, self.magnitude, dt)
    }
}

/// Position-dependent applied force: `offset + stiffness·max(0, x)` (N).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableForce {
    /// Growth per metre of travel (N/m).
    pub stiffness: f64,
    /// Force at the origin (N).
    pub offset: f64,
}

impl Default for VariableForce {
    fn default() -> Self {
        Self {
            stiffness: 0.0,
            offset: 0.1,
        }
    }
}

impl VariableForce {
    /// Create a variable force.
    #[must_use]
    pub const fn new(stiffness: f64, offset: f64) -> Self {
        Self { stiffness, offset }
    }

    /// Instantaneous force at position `x` (N).
    #[must_use]
    pub fn value(&self, x: f64) -> f64 {
        self.offset + self.stiffness * x.max(0.0)
    }

    /// Replace the offset term.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = if offset.is_finite() { offset } else { 0.0 };
    }

    /// Analytic work done from the origin to `d`: `F0·d + ½·k·d²`.
    #[must_use]
    pub fn work_over(&self, d: f64) -> f64 {
        self.offset * d + 0.5 * self.stiffness * d * d
    }

    /// Integrate one raw timestep against a box, evaluating the force at
    /// the box's current position.
    pub fn apply_step(&self, body: &mut BoxBody, dt: f64) -> StepData {
        let applied = self.value(body.position);
        apply_to_box(body, applied, dt)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: friction work against displacement is never positive
        /// when the body moves in the direction of the applied force.
        #[test]
        fn prop_friction_opposes_motion(
            applied in 0.1f64..100.0,
            velocity in 0.0f64..10.0,
            limit in 0.0f64..50.0,
        ) {
            let f = resolve_friction(applied, velocity, limit);
            if velocity > VELOCITY_EPSILON {
                prop_assert!(f.force <= 0.0);
            }
        }

        /// Falsification: integrate_slice never consumes more time than asked.
        #[test]
        fn prop_slice_time_bounded(
            applied in -50.0f64..50.0,
            velocity in -10.0f64..10.0,
            mass in 0.1f64..100.0,
            limit in 0.0f64..20.0,
            dt in 1e-4f64..0.02,
        ) {
            let out = integrate_slice(applied, velocity, mass, limit, dt);
            prop_assert!(out.time_consumed <= dt + 1e-12);
            prop_assert!(out.time_consumed >= 0.0);
        }

        /// Falsification: a stuck slice reports zero displacement.
        #[test]
        fn prop_stick_means_no_motion(
            applied in 0.0f64..10.0,
            limit in 10.0f64..100.0,
            dt in 1e-4f64..0.02,
        ) {
            let out = integrate_slice(applied, 0.0, 1.0, limit, dt);
            prop_assert!(out.stuck);
            prop_assert!((out.displacement - 0.0).abs() < f64::EPSILON);
        }
    }
}
