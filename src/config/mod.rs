//! Mode parameters with YAML schema and validation.
//!
//! Each mode carries its own parameter struct; [`SimParams`] aggregates all
//! five plus the active [`Mode`] and validates only the active block, so a
//! half-filled form for an inactive mode never blocks a run.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{SimError, SimResult};

/// Maximum lift height accepted by the power mode (m).
pub const MAX_LIFT_HEIGHT: f64 = 25.0;

/// The five instructional modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Box pushed by a constant force toward a goal distance.
    #[default]
    ConstantWork,
    /// Box pushed by a position-dependent force toward a goal distance.
    VariableWork,
    /// Two elevator cars lifting the same load over different durations.
    Power,
    /// Vehicle accelerated to a target velocity over a goal distance.
    KineticEnergy,
    /// Ball in free fall exchanging potential for kinetic energy.
    Conservative,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ConstantWork => "constant-work",
            Self::VariableWork => "variable-work",
            Self::Power => "power",
            Self::KineticEnergy => "kinetic-energy",
            Self::Conservative => "conservative",
        };
        f.write_str(name)
    }
}

/// Parameters for the constant-force work mode.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConstantWorkParams {
    /// Box mass (kg).
    #[validate(range(exclusive_min = 0.0))]
    pub mass_kg: f64,
    /// Applied force (N); may be zero or negative.
    pub force_n: f64,
    /// Goal distance (m).
    #[validate(range(exclusive_min = 0.0))]
    pub goal_distance_m: f64,
    /// Whether friction starts enabled.
    #[serde(default)]
    pub friction_active: bool,
    /// Friction coefficient applied while friction is enabled.
    #[serde(default)]
    pub friction_mu: f64,
}

impl Default for ConstantWorkParams {
    fn default() -> Self {
        Self {
            mass_kg: 0.0,
            force_n: 0.0,
            goal_distance_m: 0.0,
            friction_active: false,
            friction_mu: 0.0,
        }
    }
}

impl ConstantWorkParams {
    /// Validate constraints the schema cannot express.
    fn validate_semantic(&self) -> SimResult<()> {
        if !self.force_n.is_finite() {
            return Err(SimError::invalid_params("force must be finite"));
        }
        if self.friction_active && !(self.friction_mu >= 0.0) {
            return Err(SimError::invalid_params(
                "friction coefficient must be non-negative when friction is active",
            ));
        }
        Ok(())
    }
}

/// Parameters for the variable-force work mode.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VariableWorkParams {
    /// Box mass (kg).
    #[validate(range(exclusive_min = 0.0))]
    pub mass_kg: f64,
    /// Force growth per metre of travel (N/m).
    #[validate(range(min = 0.0))]
    pub stiffness_n_per_m: f64,
    /// Goal distance (m).
    #[validate(range(exclusive_min = 0.0))]
    pub goal_distance_m: f64,
    /// Whether friction starts enabled.
    #[serde(default)]
    pub friction_active: bool,
    /// Friction coefficient applied while friction is enabled.
    #[serde(default)]
    pub friction_mu: f64,
    /// Force at the origin (N); keeps a box at rest from staying stuck
    /// forever at zero stiffness.
    #[serde(default = "default_force_offset")]
    pub offset_n: f64,
}

fn default_force_offset() -> f64 {
    0.1
}

impl Default for VariableWorkParams {
    fn default() -> Self {
        Self {
            mass_kg: 0.0,
            stiffness_n_per_m: 0.0,
            goal_distance_m: 0.0,
            friction_active: false,
            friction_mu: 0.0,
            offset_n: default_force_offset(),
        }
    }
}

impl VariableWorkParams {
    fn validate_semantic(&self) -> SimResult<()> {
        if !self.stiffness_n_per_m.is_finite() {
            return Err(SimError::invalid_params("stiffness must be finite"));
        }
        if self.friction_active && !(self.friction_mu >= 0.0) {
            return Err(SimError::invalid_params(
                "friction coefficient must be non-negative when friction is active",
            ));
        }
        Ok(())
    }
}

/// Parameters for the power mode.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PowerParams {
    /// Load mass (kg).
    #[validate(range(exclusive_min = 0.0))]
    pub mass_kg: f64,
    /// Lift height (m), capped at [`MAX_LIFT_HEIGHT`].
    #[validate(range(exclusive_min = 0.0, max = 25.0))]
    pub height_m: f64,
    /// Duration of the fast car's lift (s).
    #[validate(range(exclusive_min = 0.0))]
    pub fast_time_s: f64,
    /// Duration of the slow car's lift (s).
    #[validate(range(exclusive_min = 0.0))]
    pub slow_time_s: f64,
}

impl Default for PowerParams {
    fn default() -> Self {
        Self {
            mass_kg: 0.0,
            height_m: 0.0,
            fast_time_s: 0.0,
            slow_time_s: 0.0,
        }
    }
}

/// Parameters for the kinetic-energy mode.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct KineticEnergyParams {
    /// Vehicle mass (kg).
    #[validate(range(exclusive_min = 0.0))]
    pub mass_kg: f64,
    /// Velocity the vehicle should reach at the goal (m/s).
    #[validate(range(exclusive_min = 0.0))]
    pub target_velocity_ms: f64,
    /// Goal distance (m).
    #[validate(range(exclusive_min = 0.0))]
    pub goal_distance_m: f64,
}

impl Default for KineticEnergyParams {
    fn default() -> Self {
        Self {
            mass_kg: 0.0,
            target_velocity_ms: 0.0,
            goal_distance_m: 0.0,
        }
    }
}

/// Parameters for the conservative-forces mode.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConservativeParams {
    /// Ball mass (kg).
    #[validate(range(exclusive_min = 0.0))]
    pub mass_kg: f64,
    /// Release height (m).
    #[validate(range(min = 0.0))]
    pub initial_height_m: f64,
    /// Initial downward speed (m/s).
    #[serde(default)]
    pub initial_velocity_ms: f64,
    /// Ground reference height (m).
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub ground_height_m: f64,
}

impl Default for ConservativeParams {
    fn default() -> Self {
        Self {
            mass_kg: 0.0,
            initial_height_m: 0.0,
            initial_velocity_ms: 0.0,
            ground_height_m: 0.0,
        }
    }
}

/// Aggregate of all mode parameter blocks plus the active mode.
///
/// Every block is always present (defaulted when absent from YAML) so a
/// front-end can keep all five forms populated and switch modes freely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimParams {
    /// The mode the next run will use.
    #[serde(default)]
    pub mode: Mode,
    /// Constant-force work parameters.
    #[serde(default)]
    pub constant_work: ConstantWorkParams,
    /// Variable-force work parameters.
    #[serde(default)]
    pub variable_work: VariableWorkParams,
    /// Power parameters.
    #[serde(default)]
    pub power: PowerParams,
    /// Kinetic-energy parameters.
    #[serde(default)]
    pub kinetic_energy: KineticEnergyParams,
    /// Conservative-forces parameters.
    #[serde(default)]
    pub conservative: ConservativeParams,
}

impl SimParams {
    /// Load parameters from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the YAML does not
    /// parse, or the active mode's block fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse parameters from a YAML string and validate the active block.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let params: Self = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    /// Create a builder.
    #[must_use]
    pub fn builder() -> SimParamsBuilder {
        SimParamsBuilder::default()
    }

    /// Validate the block belonging to the active mode.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameters`] or
    /// [`SimError::Validation`] describing the failed constraint.
    pub fn validate(&self) -> SimResult<()> {
        match self.mode {
            Mode::ConstantWork => {
                Validate::validate(&self.constant_work)?;
                self.constant_work.validate_semantic()
            }
            Mode::VariableWork => {
                Validate::validate(&self.variable_work)?;
                self.variable_work.validate_semantic()
            }
            Mode::Power => Ok(Validate::validate(&self.power)?),
            Mode::KineticEnergy => Ok(Validate::validate(&self.kinetic_energy)?),
            Mode::Conservative => Ok(Validate::validate(&self.conservative)?),
        }
    }
}

/// Builder for programmatic parameter construction.
#[derive(Debug, Default)]
pub struct SimParamsBuilder {
    mode: Option<Mode>,
    constant_work: Option<ConstantWorkParams>,
    variable_work: Option<VariableWorkParams>,
    power: Option<PowerParams>,
    kinetic_energy: Option<KineticEnergyParams>,
    conservative: Option<ConservativeParams>,
}

impl SimParamsBuilder {
    /// Set the active mode.
    #[must_use]
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the constant-force work block.
    #[must_use]
    pub fn constant_work(mut self, params: ConstantWorkParams) -> Self {
        self.constant_work = Some(params);
        self
    }

    /// Set the variable-force work block.
    #[must_use]
    pub fn variable_work(mut self, params: VariableWorkParams) -> Self {
        self.variable_work = Some(params);
        self
    }

    /// Set the power block.
    #[must_use]
    pub fn power(mut self, params: PowerParams) -> Self {
        self.power = Some(params);
        self
    }

    /// Set the kinetic-energy block.
    #[must_use]
    pub fn kinetic_energy(mut self, params: KineticEnergyParams) -> Self {
        self.kinetic_energy = Some(params);
        self
    }

    /// Set the conservative-forces block.
    #[must_use]
    pub fn conservative(mut self, params: ConservativeParams) -> Self {
        self.conservative = Some(params);
        self
    }

    /// Build the aggregate. Unset blocks default.
    #[must_use]
    pub fn build(self) -> SimParams {
        let mut params = SimParams::default();
        if let Some(mode) = self.mode {
            params.mode = mode;
        }
        if let Some(block) = self.constant_work {
            params.constant_work = block;
        }
        if let Some(block) = self.variable_work {
            params.variable_work = block;
        }
        if let Some(block) = self.power {
            params.power = block;
        }
        if let Some(block) = self.kinetic_energy {
            params.kinetic_energy = block;
        }
        if let Some(block) = self.conservative {
            params.conservative = block;
        }
        params
    }
}
