//! Motion models for the kinetic-energy and conservative-forces modes.
//!
//! [`Kinematics`] is the frictionless constant-acceleration integrator for
//! vehicles; [`FreeFall`] integrates a ball under gravity with fixed
//! sub-steps and an exact ground-crossing solve.

use serde::{Deserialize, Serialize};

use crate::bodies::{Ball, Vehicle};
use crate::GRAVITY;

/// Height band around the ground treated as contact.
pub const GROUND_TOLERANCE: f64 = 1e-4;

/// Default free-fall sub-step (s).
pub const FALL_SUB_STEP: f64 = 0.016;

/// Per-step data reported by the kinematic integrator.
#[derive(Debug, Clone, Copy)]
pub struct KinematicsStep {
    /// Acceleration this step (m/s²).
    pub acceleration: f64,
    /// Displacement this step (m).
    pub displacement: f64,
    /// Change in kinetic energy this step (J).
    pub delta_kinetic: f64,
}

/// Frictionless constant-acceleration integrator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Kinematics;

impl Kinematics {
    /// Final velocity after `t` seconds: `v = v0 + a·t`.
    #[must_use]
    pub fn final_velocity(v0: f64, accel: f64, t: f64) -> f64 {
        v0 + accel * t
    }

    /// Displacement after `t` seconds: `x = v0·t + ½·a·t²`.
    #[must_use]
    pub fn displacement(v0: f64, accel: f64, t: f64) -> f64 {
        v0 * t + 0.5 * accel * t * t
    }

    /// Impulse delivered by a constant force over `t` seconds: `J = F·t`.
    #[must_use]
    pub fn impulse(force: f64, t: f64) -> f64 {
        force * t
    }

    /// Advance a vehicle one timestep under a constant propulsion force.
    ///
    /// Position, travelled distance, velocity and kinetic energy are updated
    /// in place. Reaching the goal clamps position and distance to the goal
    /// and zeroes any remaining forward velocity.
    pub fn apply(vehicle: &mut Vehicle, force: f64, dt: f64) -> KinematicsStep {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if dt <= 0.0 {
            return KinematicsStep {
                acceleration: 0.0,
                displacement: 0.0,
                delta_kinetic: 0.0,
            };
        }

        let mass = vehicle.effective_mass();
        let accel = force / mass;
        let displacement = Self::displacement(vehicle.velocity, accel, dt);
        let previous_kinetic = vehicle.kinetic_energy;

        vehicle.position += displacement;
        vehicle.distance += displacement;
        vehicle.velocity = Self::final_velocity(vehicle.velocity, accel, dt);

        if vehicle.goal_distance > 0.0 && vehicle.position >= vehicle.goal_distance {
            vehicle.position = vehicle.goal_distance;
            vehicle.distance = vehicle.goal_distance;
            if vehicle.velocity > 0.0 {
                vehicle.velocity = 0.0;
            }
            vehicle.completed = true;
        }

        vehicle.kinetic_energy = 0.5 * mass * vehicle.velocity * vehicle.velocity;

        KinematicsStep {
            acceleration: accel,
            displacement,
            delta_kinetic: vehicle.kinetic_energy - previous_kinetic,
        }
    }
}

/// Per-step data reported by the free-fall integrator.
#[derive(Debug, Clone, Copy)]
pub struct FreeFallStep {
    /// Work done by gravity this step (J, ≥ 0).
    pub work_delta: f64,
    /// Speed at ground contact, or the current speed if still airborne.
    pub impact_velocity: f64,
    /// Potential energy above the ground after the step (J).
    pub potential_energy: f64,
    /// Kinetic energy after the step (J).
    pub kinetic_energy: f64,
    /// Mechanical energy after the step (J).
    pub mechanical_energy: f64,
}

/// Free-fall integrator under constant gravity.
///
/// The requested frame delta is split into sub-steps of at most
/// [`FALL_SUB_STEP`] seconds. A sub-step that would carry the ball at or
/// below the ground is resolved analytically: the height lands on the
/// ground exactly and the impact speed comes from `v² = v0² + 2·g·Δh`
/// over the remaining fall, not from the overshooting Euler update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FreeFall {
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
}

impl Default for FreeFall {
    fn default() -> Self {
        Self { gravity: GRAVITY }
    }
}

impl FreeFall {
    /// Create an integrator with a custom gravity.
    #[must_use]
    pub fn new(gravity: f64) -> Self {
        let gravity = if gravity.is_finite() && gravity > 0.0 {
            gravity
        } else {
            GRAVITY
        };
        Self { gravity }
    }

    /// Advance a ball by `dt` seconds of fall toward `ground_height`.
    ///
    /// Gravity work accumulates on the ball; height, velocity and the
    /// completed flag are updated in place. A completed ball is left
    /// untouched.
    pub fn advance(&self, ball: &mut Ball, dt: f64, ground_height: f64) -> FreeFallStep {
        let mass = ball.mass_kg.max(0.0);
        let mut remaining = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut height = ball.height.max(0.0);
        let mut velocity = ball.velocity;
        let mut impact_velocity = velocity;
        let mut work_delta = 0.0;

        while remaining > 0.0 && !ball.completed {
            let step = FALL_SUB_STEP.min(remaining);
            let fall = velocity * step + 0.5 * self.gravity * step * step;
            let proposed = height - fall;

            if proposed <= ground_height + GROUND_TOLERANCE {
                let drop = (height - ground_height).max(0.0);
                height = ground_height;
                work_delta += mass * self.gravity * drop;
                impact_velocity =
                    (velocity * velocity + 2.0 * self.gravity * drop).max(0.0).sqrt();
                velocity = impact_velocity;
                ball.completed = true;
            } else {
                height = proposed;
                velocity += self.gravity * step;
                work_delta += mass * self.gravity * fall.max(0.0);
            }

            remaining -= step;
        }

        ball.height = height;
        ball.velocity = velocity;
        ball.gravity_work += work_delta;

        let potential_energy = mass * self.gravity * (height - ground_height).max(0.0);
        let kinetic_energy = 0.5 * mass * velocity * velocity;

        FreeFallStep {
            work_delta,
            impact_velocity,
            potential_energy,
            kinetic_energy,
            mechanical_energy: potential_energy + kinetic_energy,
        }
    }
}
