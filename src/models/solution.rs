//! Solution and violation types.

use serde::Serialize;

use super::Route;

/// A type of constraint violation in a route or solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// A route does not start and end at the depot.
    NotDepotFramed {
        /// Route index in the solution.
        route_index: usize,
    },
    /// A route traverses an edge the task graph does not have.
    MissingEdge {
        /// Route index.
        route_index: usize,
        /// Tail node.
        from: usize,
        /// Head node.
        to: usize,
    },
    /// Route duration is not below the limit.
    MaxDurationExceeded {
        /// Route index.
        route_index: usize,
        /// Actual duration.
        duration: f64,
        /// Maximum allowed duration (exclusive).
        max_duration: f64,
    },
    /// The stored route cost disagrees with the re-walked edge weights.
    CostMismatch {
        /// Route index.
        route_index: usize,
        /// Cost stored on the route.
        stored: f64,
        /// Cost recomputed from the graph.
        computed: f64,
    },
    /// A node is visited more than once across the solution.
    DuplicateNode {
        /// Node id.
        node: usize,
    },
    /// A load is neither fully routed nor reported as unassigned.
    LoadNotCovered {
        /// Load id.
        load_id: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A full set of routes plus the loads that could not be served.
///
/// # Examples
///
/// ```
/// use u_pickup::models::{Route, Solution};
///
/// let mut sol = Solution::new();
/// sol.add_route(Route::new(vec![0, 1, 2, 0], 30.0));
/// sol.add_route(Route::new(vec![0, 3, 4, 0], 50.0));
/// assert_eq!(sol.num_routes(), 2);
/// assert!((sol.total_duration() - 80.0).abs() < 1e-10);
/// assert!(sol.is_complete());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    routes: Vec<Route>,
    unassigned: Vec<usize>,
    total_cost: f64,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            unassigned: Vec::new(),
            total_cost: 0.0,
        }
    }

    /// Adds a route to this solution.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Marks a load as unassigned.
    pub fn add_unassigned(&mut self, load_id: usize) {
        if !self.unassigned.contains(&load_id) {
            self.unassigned.push(load_id);
        }
    }

    /// Returns the routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of routes (drivers used).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Returns the ids of loads no route could serve.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    /// Returns the number of unassigned loads.
    pub fn num_unassigned(&self) -> usize {
        self.unassigned.len()
    }

    /// Returns `true` if every load is on some route.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Returns the total cost of this solution.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Sets the total cost.
    pub fn set_total_cost(&mut self, cost: f64) {
        self.total_cost = cost;
    }

    /// Total driving time across all routes.
    pub fn total_duration(&self) -> f64 {
        self.routes.iter().map(|r| r.cost()).sum()
    }

    /// Total number of loads served (across all routes).
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.num_loads()).sum()
    }

    /// Returns `true` if `self` should replace `other` as the best known.
    ///
    /// Serving more loads wins; otherwise the strictly lower total cost wins.
    pub fn is_better_than(&self, other: &Solution) -> bool {
        match self.num_unassigned().cmp(&other.num_unassigned()) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => self.total_cost < other.total_cost,
        }
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}
