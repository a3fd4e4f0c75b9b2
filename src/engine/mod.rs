//! Simulation engine: lifecycle, per-frame advancement and read accessors.
//!
//! A [`SimEngine`] owns the clock, the active [`ModeContext`], the metric
//! and graph registries and the accumulated [`RunOutcome`]. The intended
//! driver is a front-end loop: configure a mode, `start`, call `advance`
//! once per frame with the frame delta, and poll the accessors. The engine
//! is single-threaded by design; callers needing shared access wrap it in
//! their own lock.

pub mod clock;
pub mod context;
mod setup;
mod step;

pub use clock::SimClock;
pub use context::{
    CarTrack, ConservativeContext, KineticContext, ModeContext, PowerContext, WorkContext,
    WorkForce,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{Mode, SimParams};
use crate::error::{SimError, SimResult};
use crate::metrics::{Graph, Metric};
use crate::results::{RunOutcome, Summary};

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    /// A mode is being configured; the clock is stopped.
    #[default]
    Configuring,
    /// The run is advancing.
    Running,
    /// The run is suspended; `resume` continues it.
    Paused,
    /// The run reached its goal; only `reset` or reconfiguration leave
    /// this state.
    Finished,
}

/// The simulation engine.
#[derive(Debug, Clone, Default)]
pub struct SimEngine {
    params: SimParams,
    state: RunState,
    clock: SimClock,
    context: Option<ModeContext>,
    metrics: IndexMap<String, Metric>,
    graphs: IndexMap<String, Graph>,
    outcome: RunOutcome,
    friction_active: bool,
    state_before_friction: Option<RunState>,
    last_summary_mode: Option<Mode>,
}

impl SimEngine {
    /// Create an unconfigured engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine configured for the active mode of `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the active mode's parameter block is invalid.
    pub fn from_params(params: SimParams) -> SimResult<Self> {
        params.validate()?;
        let mut engine = Self::new();
        match params.mode {
            Mode::ConstantWork => {
                engine.configure_constant_work(&params.constant_work);
            }
            Mode::VariableWork => {
                engine.configure_variable_work(&params.variable_work);
            }
            Mode::Power => {
                engine.configure_power(&params.power);
            }
            Mode::KineticEnergy => {
                engine.configure_kinetic_energy(&params.kinetic_energy);
            }
            Mode::Conservative => {
                engine.configure_conservative(&params.conservative);
            }
        }
        engine.params = params;
        Ok(engine)
    }

    // --- Lifecycle ---------------------------------------------------------

    /// Validate the active parameters and start the run from time zero.
    ///
    /// If friction was toggled on before starting, the run begins paused
    /// with the pre-friction state remembered as running, so disabling
    /// friction resumes it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotConfigured`] when no mode has been
    /// configured, or a validation error when the active parameter block
    /// is invalid.
    pub fn start(&mut self) -> SimResult<()> {
        if self.context.is_none() {
            return Err(SimError::NotConfigured);
        }
        self.params.validate()?;
        self.clock.reset();
        self.clock.start();
        self.state = RunState::Running;
        if self.friction_active {
            self.state_before_friction = Some(RunState::Running);
            self.pause();
        }
        Ok(())
    }

    /// Whether a mode is configured and its parameter block would pass the
    /// checks `start` performs.
    ///
    /// Front-ends call this to gate the start control without attempting a
    /// run.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.context.is_some() && self.params.validate().is_ok()
    }

    /// Suspend a running simulation. No-op in any other state.
    pub fn pause(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        self.clock.stop();
        self.state = RunState::Paused;
    }

    /// Continue a paused simulation. No-op in any other state.
    pub fn resume(&mut self) {
        if self.state != RunState::Paused {
            return;
        }
        self.clock.start();
        self.state = RunState::Running;
    }

    /// Return to the configured state: clock at zero, bodies at their
    /// initial positions, metric and graph series emptied, friction off.
    ///
    /// Summary rows from previous runs are kept.
    pub fn reset(&mut self) {
        self.clock.reset();
        if let Some(context) = self.context.as_mut() {
            context.reset();
        }
        for metric in self.metrics.values_mut() {
            metric.clear();
        }
        for graph in self.graphs.values_mut() {
            graph.clear();
        }
        self.friction_active = false;
        self.state_before_friction = None;
        self.state = RunState::Configuring;
    }

    /// Stop the clock and mark the run finished.
    pub fn finish(&mut self) {
        self.clock.stop();
        self.state = RunState::Finished;
        self.state_before_friction = None;
    }

    /// Toggle the friction channel.
    ///
    /// The conservative mode has no friction channel; enabling it there is
    /// ignored. Disabling friction while static friction holds the box
    /// releases the lock and resumes a paused run.
    pub fn set_friction_active(&mut self, active: bool) {
        self.friction_active = active;

        let Some(context) = self.context.as_mut() else {
            return;
        };
        if matches!(context, ModeContext::Conservative(_)) {
            self.friction_active = false;
            return;
        }

        let mut released = false;
        if !active {
            if let ModeContext::ConstantWork(ctx) | ModeContext::VariableWork(ctx) = context {
                if ctx.blocked_by_friction {
                    ctx.blocked_by_friction = false;
                    released = true;
                }
            }
            if self.state_before_friction.take() == Some(RunState::Running) {
                released = true;
            }
        }
        if released && self.state == RunState::Paused {
            self.resume();
        }
    }

    /// Advance the simulation by one frame of `dt` seconds.
    ///
    /// Does nothing unless the run is in [`RunState::Running`]. Negative
    /// and non-finite deltas are clamped to zero.
    pub fn advance(&mut self, dt: f64) {
        if self.state != RunState::Running {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if dt <= 0.0 {
            return;
        }

        let now = self.clock.advance(dt);
        let Some(context) = self.context.take() else {
            return;
        };
        let context = match context {
            ModeContext::ConstantWork(ctx) => {
                ModeContext::ConstantWork(self.advance_work(ctx, Mode::ConstantWork, dt, now))
            }
            ModeContext::VariableWork(ctx) => {
                ModeContext::VariableWork(self.advance_work(ctx, Mode::VariableWork, dt, now))
            }
            ModeContext::Power(ctx) => ModeContext::Power(self.advance_power(ctx, dt, now)),
            ModeContext::KineticEnergy(ctx) => {
                ModeContext::KineticEnergy(self.advance_kinetic(ctx, dt, now))
            }
            ModeContext::Conservative(ctx) => {
                ModeContext::Conservative(self.advance_conservative(ctx, dt, now))
            }
        };
        self.context = Some(context);
    }

    // --- Accessors ---------------------------------------------------------

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Active mode, `None` before the first configuration.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.context.as_ref().map(ModeContext::mode)
    }

    /// Simulated seconds elapsed in the current run.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Whether the friction channel is enabled.
    #[must_use]
    pub const fn friction_active(&self) -> bool {
        self.friction_active
    }

    /// Latest value of a metric, `None` for unknown ids or empty series.
    #[must_use]
    pub fn metric(&self, id: &str) -> Option<f64> {
        self.metrics.get(id).and_then(Metric::latest)
    }

    /// Full series of a metric as `(time, value)` pairs.
    #[must_use]
    pub fn metric_series(&self, id: &str) -> Option<Vec<(f64, f64)>> {
        self.metrics.get(id).map(Metric::series)
    }

    /// A graph by id.
    #[must_use]
    pub fn graph(&self, id: &str) -> Option<&Graph> {
        self.graphs.get(id)
    }

    /// Ids of all registered metrics, in registration order.
    pub fn metric_ids(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    /// Ids of all registered graphs, in registration order.
    pub fn graph_ids(&self) -> impl Iterator<Item = &str> {
        self.graphs.keys().map(String::as_str)
    }

    /// Snapshot of the summary table.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from(&self.outcome.table)
    }

    /// Remove a summary row; out-of-range indices are a no-op.
    pub fn remove_row(&mut self, index: usize) {
        self.outcome.table.remove_row(index);
    }

    /// The accumulated run outcome: summary table, final metrics and the
    /// interpretation text.
    #[must_use]
    pub const fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    /// The parameter aggregate currently held by the engine.
    #[must_use]
    pub const fn params(&self) -> &SimParams {
        &self.params
    }

    /// The active mode context, `None` before the first configuration.
    #[must_use]
    pub const fn context(&self) -> Option<&ModeContext> {
        self.context.as_ref()
    }

    // --- Internals shared by setup and step --------------------------------

    pub(crate) fn register_metric(&mut self, id: &str, name: &str, unit: &str) {
        self.metrics.insert(id.to_string(), Metric::new(name, unit));
    }

    pub(crate) fn register_graph(&mut self, id: &str, title: &str, x_label: &str, y_label: &str) {
        self.graphs
            .insert(id.to_string(), Graph::new(title, x_label, y_label));
    }

    pub(crate) fn record_metric(&mut self, id: &str, time: f64, value: f64) {
        if let Some(metric) = self.metrics.get_mut(id) {
            metric.record(time, value);
        }
    }

    pub(crate) fn record_graph(&mut self, id: &str, x: f64, y: f64) {
        if let Some(graph) = self.graphs.get_mut(id) {
            graph.push(x, y);
        }
    }

    pub(crate) fn begin_configuration(&mut self, mode: Mode) {
        self.params.mode = mode;
        self.state = RunState::Configuring;
        self.clock.reset();
        self.metrics.clear();
        self.graphs.clear();
        self.friction_active = false;
        self.state_before_friction = None;
    }

    /// Install summary columns only when the mode changed since the last
    /// configuration, so rows from repeated runs of one mode share headers.
    pub(crate) fn finish_configuration(&mut self, mode: Mode, columns: &[String]) {
        if self.last_summary_mode != Some(mode) {
            self.outcome.table.set_columns(columns.to_vec());
        }
        self.last_summary_mode = Some(mode);
    }

    pub(crate) fn set_interpretation(&mut self, text: String) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.outcome.interpretation = trimmed.to_string();
    }
}

/// Format a value for interpretation text.
pub(crate) fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "0".to_string()
    }
}
