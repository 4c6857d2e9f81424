//! Search and planner configuration.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::evaluation::{COST_PER_DRIVER_MINUTE, MAX_ROUTE_DURATION};

/// Configuration for one solve-loop run.
///
/// # Examples
///
/// ```
/// use u_pickup::config::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_annealing(true)
///     .with_prioritize(true)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_duration, 720.0);
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Routes must take strictly less than this many minutes.
    pub max_duration: f64,

    /// Coefficient of the `drivers × minutes` cost formula.
    pub cost_per_driver_minute: f64,

    /// Temperature when nothing has been routed yet.
    pub initial_temperature: f64,

    /// Temperature once every node has been routed.
    pub final_temperature: f64,

    /// Share of loads taken from the top of each distance ranking.
    pub priority_fraction: f64,

    /// Shuffle neighbour order with probability equal to the temperature.
    pub annealing: bool,

    /// Visit hard-to-schedule pickups first.
    pub prioritize: bool,

    /// Random seed. `None` draws a fresh one per run.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_duration: MAX_ROUTE_DURATION,
            cost_per_driver_minute: COST_PER_DRIVER_MINUTE,
            initial_temperature: 1.0,
            final_temperature: 0.01,
            priority_fraction: 0.2,
            annealing: false,
            prioritize: false,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Sets the route duration limit in minutes.
    pub fn with_max_duration(mut self, minutes: f64) -> Self {
        self.max_duration = minutes;
        self
    }

    /// Sets the cost coefficient.
    pub fn with_cost_per_driver_minute(mut self, cost: f64) -> Self {
        self.cost_per_driver_minute = cost;
        self
    }

    /// Sets the start and end of the annealing schedule.
    pub fn with_temperatures(mut self, initial: f64, final_: f64) -> Self {
        self.initial_temperature = initial;
        self.final_temperature = final_;
        self
    }

    /// Sets the share of each ranking that counts as priority.
    pub fn with_priority_fraction(mut self, fraction: f64) -> Self {
        self.priority_fraction = fraction;
        self
    }

    /// Enables or disables annealed neighbour shuffling.
    pub fn with_annealing(mut self, enabled: bool) -> Self {
        self.annealing = enabled;
        self
    }

    /// Enables or disables the priority bias.
    pub fn with_prioritize(mut self, enabled: bool) -> Self {
        self.prioritize = enabled;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Temperature for a given share of routed nodes:
    /// `T0 · exp(-ln(T0 / T1) · solved_fraction)`.
    ///
    /// Equals `initial_temperature` at 0 and `final_temperature` at 1.
    pub fn temperature(&self, solved_fraction: f64) -> f64 {
        let lambda = (self.initial_temperature / self.final_temperature).ln();
        self.initial_temperature * (-lambda * solved_fraction).exp()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.max_duration) {
            return Err(invalid(format!(
                "max_duration must be positive, got {}",
                self.max_duration
            )));
        }
        if !is_positive(self.cost_per_driver_minute) {
            return Err(invalid("cost_per_driver_minute must be positive".into()));
        }
        if !is_positive(self.initial_temperature) || !is_positive(self.final_temperature) {
            return Err(invalid("temperatures must be positive".into()));
        }
        if self.final_temperature >= self.initial_temperature {
            return Err(invalid(
                "final_temperature must be less than initial_temperature".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.priority_fraction) {
            return Err(invalid(format!(
                "priority_fraction must be in [0, 1], got {}",
                self.priority_fraction
            )));
        }
        Ok(())
    }
}

/// Configuration for the multi-run planner.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pickup::config::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_time_budget(Duration::from_millis(500))
///     .with_max_runs(10)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// No new run starts once this much wall-clock time has elapsed.
    pub time_budget: Duration,

    /// Upper bound on the number of runs, baseline included.
    pub max_runs: Option<usize>,

    /// Seed for run 0; run `i` uses `seed + i`. `None` draws one.
    pub seed: Option<u64>,

    /// Settings shared by every run. `annealing`, `prioritize` and `seed`
    /// are overridden per run.
    pub search: SearchConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(25_000),
            max_runs: None,
            seed: None,
            search: SearchConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Sets the wall-clock budget for starting runs.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Caps the number of runs.
    pub fn with_max_runs(mut self, runs: usize) -> Self {
        self.max_runs = Some(runs);
        self
    }

    /// Fixes the base seed; run `i` uses `seed + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the per-run search settings.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_runs == Some(0) {
            return Err(invalid("max_runs must be at least 1".into()));
        }
        self.search.validate()
    }
}

/// `false` for NaN as well as for non-positive values.
fn is_positive(value: f64) -> bool {
    value > 0.0
}

fn invalid(msg: String) -> Error {
    Error::InvalidConfig(msg)
}
