//! # mecsim
//!
//! Interactive mechanics simulation engine for instructional physics
//! scenarios. Models five classroom experiments behind one lifecycle:
//! - Work done by a constant force (with optional stick/slip friction)
//! - Work done by a position-dependent force
//! - Power delivered by two elevators racing to the same height
//! - Kinetic energy of a vehicle under constant propulsion
//! - Conservative free fall with energy bookkeeping
//!
//! The crate is the simulation core only: an external front-end configures
//! a mode, starts the run, calls [`engine::SimEngine::advance`] once per
//! animation frame, and polls metrics, graphs and the summary table through
//! read-only accessors.
//!
//! ## Example
//!
//! ```rust
//! use mecsim::prelude::*;
//!
//! let params = ConstantWorkParams {
//!     mass_kg: 2.0,
//!     force_n: 10.0,
//!     goal_distance_m: 5.0,
//!     ..Default::default()
//! };
//! let mut engine = SimEngine::new();
//! engine.configure_constant_work(&params);
//! engine.start().expect("valid parameters");
//! while engine.state() == RunState::Running {
//!     engine.advance(1.0 / 60.0);
//! }
//! assert!((engine.metric("applied_work").unwrap_or(0.0) - 50.0).abs() < 1e-6);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Numerical code choices are intentional
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
)]

pub mod bodies;
pub mod config;
pub mod engine;
pub mod error;
pub mod forces;
pub mod metrics;
pub mod motion;
pub mod results;

/// Standard gravitational acceleration used by every mode (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{
        ConservativeParams, ConstantWorkParams, KineticEnergyParams, Mode, PowerParams, SimParams,
        VariableWorkParams,
    };
    pub use crate::engine::{RunState, SimClock, SimEngine};
    pub use crate::error::{SimError, SimResult};
    pub use crate::results::Summary;
    pub use crate::GRAVITY;
}

/// Re-export for public API
pub use error::{SimError, SimResult};
