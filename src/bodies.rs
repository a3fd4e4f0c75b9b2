//! Physical entities owned by the simulation engine.
//!
//! Three variants: [`BoxBody`] (boxes and elevator cars sliding toward a
//! goal distance), [`Vehicle`] (kinetic-energy mode), [`Ball`] (free
//! fall). Each captures an immutable snapshot of its initial kinematic
//! state at construction so `reset` restores it in place without
//! re-allocating.

use serde::{Deserialize, Serialize};

/// Floor for masses at integration time so accelerations stay defined.
pub const MASS_EPSILON: f64 = 1e-6;

/// Clamp a configured mass to the valid range (≥ 0).
fn clamp_mass(mass_kg: f64) -> f64 {
    if mass_kg.is_finite() {
        mass_kg.max(0.0)
    } else {
        0.0
    }
}

/// Clamp a goal distance/height to the valid range (≥ 0).
fn clamp_goal(goal: f64) -> f64 {
    if goal.is_finite() {
        goal.max(0.0)
    } else {
        0.0
    }
}

/// Box sliding along a horizontal surface toward a goal distance.
///
/// Also models an elevator car in the power mode, where `position` is the
/// height reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxBody {
    /// Identifier used by the front-end to address the body.
    pub id: String,
    /// Mass in kilograms (≥ 0).
    pub mass_kg: f64,
    /// Position along the track (m, never negative).
    pub position: f64,
    /// Velocity along the track (m/s).
    pub velocity: f64,
    /// Kinetic energy (J), refreshed by the integrators.
    pub kinetic_energy: f64,
    /// Target distance; 0 means no goal.
    pub goal_distance: f64,
    /// Surface friction coefficient; 0 when friction is inactive.
    pub friction_mu: f64,
    /// Whether the goal has been reached.
    pub completed: bool,
    initial: BoxSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoxSnapshot {
    position: f64,
    velocity: f64,
    completed: bool,
}

impl BoxBody {
    /// Create a box at rest at the origin.
    #[must_use]
    pub fn new(id: impl Into<String>, mass_kg: f64, goal_distance: f64) -> Self {
        Self {
            id: id.into(),
            mass_kg: clamp_mass(mass_kg),
            position: 0.0,
            velocity: 0.0,
            kinetic_energy: 0.0,
            goal_distance: clamp_goal(goal_distance),
            friction_mu: 0.0,
            completed: false,
            initial: BoxSnapshot {
                position: 0.0,
                velocity: 0.0,
                completed: false,
            },
        }
    }

    /// Mass floored to [`MASS_EPSILON`] for integration.
    #[must_use]
    pub fn effective_mass(&self) -> f64 {
        self.mass_kg.max(MASS_EPSILON)
    }

    /// Restore the initial kinematic state in place.
    pub fn reset(&mut self) {
        self.position = self.initial.position;
        self.velocity = self.initial.velocity;
        self.completed = self.initial.completed;
        self.kinetic_energy = 0.0;
    }
}

/// Vehicle accelerating under constant propulsion (kinetic-energy mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Identifier used by the front-end to address the body.
    pub id: String,
    /// Mass in kilograms (≥ 0).
    pub mass_kg: f64,
    /// Position along the track (m).
    pub position: f64,
    /// Total distance travelled (m, never negative).
    pub distance: f64,
    /// Velocity (m/s).
    pub velocity: f64,
    /// Kinetic energy (J).
    pub kinetic_energy: f64,
    /// Target distance; 0 means no goal.
    pub goal_distance: f64,
    /// Whether the goal has been reached.
    pub completed: bool,
    initial: VehicleSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VehicleSnapshot {
    position: f64,
    distance: f64,
    velocity: f64,
    kinetic_energy: f64,
    completed: bool,
}

impl Vehicle {
    /// Create a vehicle at rest at the origin.
    #[must_use]
    pub fn new(id: impl Into<String>, mass_kg: f64, goal_distance: f64) -> Self {
        Self {
            id: id.into(),
            mass_kg: clamp_mass(mass_kg),
            position: 0.0,
            distance: 0.0,
            velocity: 0.0,
            kinetic_energy: 0.0,
            goal_distance: clamp_goal(goal_distance),
            completed: false,
            initial: VehicleSnapshot {
                position: 0.0,
                distance: 0.0,
                velocity: 0.0,
                kinetic_energy: 0.0,
                completed: false,
            },
        }
    }

    /// Mass floored to [`MASS_EPSILON`] for integration.
    #[must_use]
    pub fn effective_mass(&self) -> f64 {
        self.mass_kg.max(MASS_EPSILON)
    }

    /// Restore the initial kinematic state in place.
    pub fn reset(&mut self) {
        self.position = self.initial.position;
        self.distance = self.initial.distance;
        self.velocity = self.initial.velocity;
        self.kinetic_energy = self.initial.kinetic_energy;
        self.completed = self.initial.completed;
    }
}

/// Ball falling under gravity (conservative-forces mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Identifier used by the front-end to address the body.
    pub id: String,
    /// Mass in kilograms (≥ 0).
    pub mass_kg: f64,
    /// Height above the reference origin (m, never negative).
    pub height: f64,
    /// Downward speed (m/s, positive is falling).
    pub velocity: f64,
    /// Accumulated work done by gravity (J).
    pub gravity_work: f64,
    /// Whether the ball has reached the ground.
    pub completed: bool,
    initial: BallSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BallSnapshot {
    height: f64,
    velocity: f64,
    gravity_work: f64,
    completed: bool,
}

impl Ball {
    /// Create a ball at `height` with an initial downward speed.
    #[must_use]
    pub fn new(id: impl Into<String>, mass_kg: f64, height: f64, velocity: f64) -> Self {
        let height = clamp_goal(height);
        Self {
            id: id.into(),
            mass_kg: clamp_mass(mass_kg),
            height,
            velocity,
            gravity_work: 0.0,
            completed: false,
            initial: BallSnapshot {
                height,
                velocity,
                gravity_work: 0.0,
                completed: false,
            },
        }
    }

    /// Restore the initial kinematic state in place.
    pub fn reset(&mut self) {
        self.height = self.initial.height;
        self.velocity = self.initial.velocity;
        self.gravity_work = self.initial.gravity_work;
        self.completed = self.initial.completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_clamps_negative_mass_and_goal() {
        let body = BoxBody::new("box", -3.0, -5.0);
        assert!((body.mass_kg - 0.0).abs() < f64::EPSILON);
        assert!((body.goal_distance - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_box_effective_mass_floor() {
        let body = BoxBody::new("box", 0.0, 1.0);
        assert!((body.effective_mass() - MASS_EPSILON).abs() < f64::EPSILON);

        let heavy = BoxBody::new("box", 2.0, 1.0);
        assert!((heavy.effective_mass() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_box_reset_restores_initial_state() {
        let mut body = BoxBody::new("box", 1.0, 10.0);
        body.position = 4.0;
        body.velocity = 2.0;
        body.kinetic_energy = 2.0;
        body.completed = true;

        body.reset();
        assert!((body.position - 0.0).abs() < f64::EPSILON);
        assert!((body.velocity - 0.0).abs() < f64::EPSILON);
        assert!((body.kinetic_energy - 0.0).abs() < f64::EPSILON);
        assert!(!body.completed);
    }

    #[test]
    fn test_vehicle_reset() {
        let mut vehicle = Vehicle::new("car", 1.0, 100.0);
        vehicle.position = 50.0;
        vehicle.distance = 50.0;
        vehicle.velocity = 20.0;
        vehicle.kinetic_energy = 200.0;
        vehicle.completed = true;

        vehicle.reset();
        assert!((vehicle.distance - 0.0).abs() < f64::EPSILON);
        assert!((vehicle.velocity - 0.0).abs() < f64::EPSILON);
        assert!(!vehicle.completed);
    }

    #[test]
    fn test_ball_clamps_negative_height() {
        let ball = Ball::new("ball", 1.0, -2.0, 0.0);
        assert!((ball.height - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ball_reset_restores_height_and_velocity() {
        let mut ball = Ball::new("ball", 1.0, 5.0, 0.5);
        ball.height = 0.0;
        ball.velocity = 9.9;
        ball.gravity_work = 49.0;
        ball.completed = true;

        ball.reset();
        assert!((ball.height - 5.0).abs() < f64::EPSILON);
        assert!((ball.velocity - 0.5).abs() < f64::EPSILON);
        assert!((ball.gravity_work - 0.0).abs() < f64::EPSILON);
        assert!(!ball.completed);
    }

    #[test]
    fn test_non_finite_mass_clamped() {
        let body = BoxBody::new("box", f64::NAN, 1.0);
        assert!((body.mass_kg - 0.0).abs() < f64::EPSILON);
    }
}
