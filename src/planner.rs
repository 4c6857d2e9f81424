//! Multi-run planner.
//!
//! Runs the solve loop repeatedly under a wall-clock budget and keeps the
//! cheapest solution. Run 0 is a deterministic baseline (no annealing, no
//! priority bias); every later run anneals, and every other one also
//! prioritizes hard-to-schedule loads. Run `i` is seeded with `seed + i`, so
//! a seeded plan is reproducible up to how many runs fit in the budget.
//!
//! A run that has started is never interrupted; the budget only stops new
//! runs from starting.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{PlannerConfig, SearchConfig};
use crate::constructive::{create_rng, priority_nodes, solve};
use crate::error::Result;
use crate::evaluation::RouteEvaluator;
use crate::graph::TaskGraph;
use crate::models::{Load, Solution};

/// Outcome of a planning session.
#[derive(Debug, Clone)]
pub struct PlanReport {
    /// Cheapest solution found.
    pub best: Solution,
    /// Run that produced `best`.
    pub best_run: usize,
    /// Number of runs completed.
    pub runs: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Repeats independent solve runs and keeps the best.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pickup::config::PlannerConfig;
/// use u_pickup::models::{Load, Point};
/// use u_pickup::planner::Planner;
///
/// let loads = vec![
///     Load::new(1, Point::new(10.0, 0.0), Point::new(20.0, 0.0)),
///     Load::new(2, Point::new(-10.0, 5.0), Point::new(-20.0, 5.0)),
/// ];
/// let config = PlannerConfig::default()
///     .with_time_budget(Duration::from_secs(5))
///     .with_max_runs(8)
///     .with_seed(3);
/// let report = Planner::new(config).plan(&loads).unwrap();
/// assert_eq!(report.runs, 8);
/// assert!(report.best.is_complete());
/// ```
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Creates a planner.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Settings of run `run`, given the planner's base seed.
    pub fn run_config(&self, run: usize, base_seed: u64) -> SearchConfig {
        let annealed = run > 0;
        self.config
            .search
            .clone()
            .with_annealing(annealed)
            .with_prioritize(annealed && (run - 1) % 2 == 0)
            .with_seed(base_seed.wrapping_add(run as u64))
    }

    /// Plans routes for `loads`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or invalid load ids.
    pub fn plan(&self, loads: &[Load]) -> Result<PlanReport> {
        self.config.validate()?;
        let graph = TaskGraph::from_loads(loads)?;
        let priority = priority_nodes(loads, self.config.search.priority_fraction);
        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let started = Instant::now();

        let (best_run, best, runs) = self.run_all(&graph, &priority, base_seed, started);

        let report = PlanReport {
            best,
            best_run,
            runs,
            elapsed: started.elapsed(),
        };
        self.check(&graph, &report.best);
        info!(
            runs = report.runs,
            best_run = report.best_run,
            routes = report.best.num_routes(),
            total_cost = report.best.total_cost(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "planning finished"
        );
        Ok(report)
    }

    fn solve_run(
        &self,
        graph: &TaskGraph,
        priority: &BTreeSet<usize>,
        run: usize,
        base_seed: u64,
    ) -> Solution {
        let config = self.run_config(run, base_seed);
        let empty = BTreeSet::new();
        let priority = if config.prioritize { priority } else { &empty };
        let mut rng = create_rng(config.seed);
        solve(graph, priority, &config, &mut rng)
    }

    fn may_start(&self, run: usize, started: Instant) -> bool {
        if run == 0 {
            return true;
        }
        if self.config.max_runs.is_some_and(|max| run >= max) {
            return false;
        }
        started.elapsed() < self.config.time_budget
    }

    #[cfg(not(feature = "parallel"))]
    fn run_all(
        &self,
        graph: &TaskGraph,
        priority: &BTreeSet<usize>,
        base_seed: u64,
        started: Instant,
    ) -> (usize, Solution, usize) {
        let mut best: Option<(usize, Solution)> = None;
        let mut run = 0;
        while self.may_start(run, started) {
            let solution = self.solve_run(graph, priority, run, base_seed);
            keep_better(&mut best, run, solution);
            run += 1;
        }
        let (best_run, best) = best.unwrap_or_default();
        (best_run, best, run)
    }

    #[cfg(feature = "parallel")]
    fn run_all(
        &self,
        graph: &TaskGraph,
        priority: &BTreeSet<usize>,
        base_seed: u64,
        started: Instant,
    ) -> (usize, Solution, usize) {
        use rayon::prelude::*;
        use std::sync::Mutex;

        let best: Mutex<Option<(usize, Solution)>> = Mutex::new(None);
        let round = rayon::current_num_threads().max(1);
        let mut next = 0;

        while self.may_start(next, started) {
            // the baseline runs alone so a zero budget still yields one run
            let width = if next == 0 { 1 } else { round };
            let end = match self.config.max_runs {
                Some(max) => (next + width).min(max),
                None => next + width,
            };
            (next..end).into_par_iter().for_each(|run| {
                let solution = self.solve_run(graph, priority, run, base_seed);
                let mut guard = best.lock().unwrap_or_else(|e| e.into_inner());
                keep_better(&mut *guard, run, solution);
            });
            next = end;
        }

        let (best_run, best) = best
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .unwrap_or_default();
        (best_run, best, next)
    }

    fn check(&self, graph: &TaskGraph, solution: &Solution) {
        let evaluator = RouteEvaluator::new(graph, self.config.search.max_duration);
        let (_, violations) = evaluator.evaluate_solution(solution);
        for v in &violations {
            warn!(violation = ?v.kind, "best solution failed its re-check");
        }
        if !solution.is_complete() {
            warn!(loads = ?solution.unassigned(), "some loads could not be routed");
        }
    }
}

/// Replaces the incumbent when `candidate` is better, or equally good but
/// from an earlier run (so parallel rounds pick the same winner as a
/// sequential pass).
fn keep_better(best: &mut Option<(usize, Solution)>, run: usize, candidate: Solution) {
    let replace = match best {
        None => true,
        Some((best_run, incumbent)) => {
            candidate.is_better_than(incumbent)
                || (!incumbent.is_better_than(&candidate) && run < *best_run)
        }
    };
    if replace {
        debug!(run, total_cost = candidate.total_cost(), "new best solution");
        *best = Some((run, candidate));
    }
}
