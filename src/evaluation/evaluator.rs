//! Route evaluator that re-walks routes over the task graph.

use std::collections::HashSet;

use crate::graph::{end_node, start_node, TaskGraph, DEPOT};
use crate::models::{Route, Solution, Violation, ViolationType};

/// Tolerance used when comparing a stored route cost with the re-walk.
const COST_TOLERANCE: f64 = 1e-6;

/// Checks routes against the task graph: depot framing, edge presence,
/// duration limit and stored cost. At solution level it also checks that
/// every load is either fully routed exactly once or reported unassigned.
///
/// # Examples
///
/// ```
/// use u_pickup::models::{Load, Point, Route};
/// use u_pickup::graph::TaskGraph;
/// use u_pickup::evaluation::RouteEvaluator;
///
/// let loads = vec![Load::new(1, Point::new(3.0, 4.0), Point::new(3.0, 0.0))];
/// let graph = TaskGraph::from_loads(&loads).unwrap();
/// let evaluator = RouteEvaluator::new(&graph, 720.0);
///
/// let (duration, violations) = evaluator.evaluate_route(0, &Route::new(vec![0, 1, 2, 0], 12.0));
/// assert!((duration - 12.0).abs() < 1e-10);
/// assert!(violations.is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    graph: &'a TaskGraph,
    max_duration: f64,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator.
    pub fn new(graph: &'a TaskGraph, max_duration: f64) -> Self {
        Self {
            graph,
            max_duration,
        }
    }

    /// Re-walks one route, returning its recomputed duration and any
    /// violations. Missing edges contribute nothing to the duration.
    pub fn evaluate_route(&self, route_index: usize, route: &Route) -> (f64, Vec<Violation>) {
        let mut violations = Vec::new();
        let nodes = route.nodes();

        if nodes.len() < 2 || nodes[0] != DEPOT || nodes[nodes.len() - 1] != DEPOT {
            violations.push(Violation::new(ViolationType::NotDepotFramed { route_index }));
        }

        let mut duration = 0.0;
        for pair in nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let edge = (from < self.graph.size() && to < self.graph.size())
                .then(|| self.graph.edge(from, to))
                .flatten();
            match edge {
                Some(w) => duration += w,
                None => violations.push(Violation::new(ViolationType::MissingEdge {
                    route_index,
                    from,
                    to,
                })),
            }
        }

        if duration >= self.max_duration {
            violations.push(Violation::new(ViolationType::MaxDurationExceeded {
                route_index,
                duration,
                max_duration: self.max_duration,
            }));
        }

        if (duration - route.cost()).abs() > COST_TOLERANCE {
            violations.push(Violation::new(ViolationType::CostMismatch {
                route_index,
                stored: route.cost(),
                computed: duration,
            }));
        }

        (duration, violations)
    }

    /// Evaluates an entire solution, returning its total driving time and
    /// all violations found.
    pub fn evaluate_solution(&self, solution: &Solution) -> (f64, Vec<Violation>) {
        let mut total = 0.0;
        let mut all_violations = Vec::new();
        let mut seen = HashSet::new();

        for (idx, route) in solution.routes().iter().enumerate() {
            let (duration, mut violations) = self.evaluate_route(idx, route);
            total += duration;
            all_violations.append(&mut violations);

            for node in route.stops() {
                if !seen.insert(node) {
                    all_violations.push(Violation::new(ViolationType::DuplicateNode { node }));
                }
            }
        }

        for slot in self.graph.slots() {
            let id = self.graph.load_id(slot);
            let routed = seen.contains(&start_node(slot)) && seen.contains(&end_node(slot));
            if !routed && !solution.unassigned().contains(&id) {
                all_violations.push(Violation::new(ViolationType::LoadNotCovered { load_id: id }));
            }
        }

        (total, all_violations)
    }
}
