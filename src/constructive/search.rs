//! Duration-bounded nearest-neighbour route search.
//!
//! Builds one depot-to-depot route per call by depth-first descent from the
//! depot. At each node the open neighbours are ordered either greedily
//! (priority pickups first, then nearest) or, with probability equal to the
//! current temperature when annealing is on, uniformly at random.
//!
//! The first branch to resolve wins: a branch resolves either by committing
//! a route or by unwinding, and in both cases its ancestors stop exploring.
//! Unwinding happens when the accumulated duration passes the limit or a
//! node has nowhere left to go; the route is then committed at the deepest
//! ancestor that has an edge back to the depot and still fits the limit.
//! The search is therefore greedy, not exhaustive.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::config::SearchConfig;
use crate::graph::{ResidualGraph, DEPOT};
use crate::models::Route;

/// Result of one route search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A route that fits the duration limit.
    Found(Route),
    /// No route could be formed from the remaining graph.
    NotFound,
}

impl SearchOutcome {
    /// The route, if one was found.
    pub fn into_route(self) -> Option<Route> {
        match self {
            SearchOutcome::Found(route) => Some(route),
            SearchOutcome::NotFound => None,
        }
    }

    /// Returns `true` if a route was found.
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// How a subtree of the descent resolved.
enum Descent {
    /// A route was committed somewhere below; pass it straight up.
    Committed(Route),
    /// The branch is exhausted or over budget; an ancestor must commit.
    Unwinding,
}

/// One route search over a residual graph.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_pickup::config::SearchConfig;
/// use u_pickup::constructive::RouteSearch;
/// use u_pickup::graph::{ResidualGraph, TaskGraph};
/// use u_pickup::models::{Load, Point};
///
/// let loads = vec![
///     Load::new(1, Point::new(10.0, 0.0), Point::new(20.0, 0.0)),
///     Load::new(2, Point::new(22.0, 0.0), Point::new(30.0, 0.0)),
/// ];
/// let graph = TaskGraph::from_loads(&loads).unwrap();
/// let residual = ResidualGraph::new(&graph);
/// let priority = BTreeSet::new();
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let outcome = RouteSearch::new(&residual, &priority, &SearchConfig::default(), 0.0, &mut rng).run();
/// let route = outcome.into_route().unwrap();
/// assert_eq!(route.load_ids(), &[1, 2]);
/// ```
pub struct RouteSearch<'a, R: Rng> {
    graph: &'a ResidualGraph<'a>,
    priority: &'a BTreeSet<usize>,
    max_duration: f64,
    temperature: f64,
    annealing: bool,
    rng: &'a mut R,
}

impl<'a, R: Rng> RouteSearch<'a, R> {
    /// Prepares a search.
    ///
    /// `solved_fraction` is the share of task nodes already routed; it sets
    /// the temperature for the whole search.
    pub fn new(
        graph: &'a ResidualGraph<'a>,
        priority: &'a BTreeSet<usize>,
        config: &SearchConfig,
        solved_fraction: f64,
        rng: &'a mut R,
    ) -> Self {
        Self {
            graph,
            priority,
            max_duration: config.max_duration,
            temperature: config.temperature(solved_fraction),
            annealing: config.annealing,
            rng,
        }
    }

    /// Temperature this search runs at.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Runs the search from the depot.
    pub fn run(&mut self) -> SearchOutcome {
        let mut visited = vec![false; self.graph.size()];
        let mut path = vec![DEPOT];
        match self.descend(DEPOT, 0.0, &mut path, &mut visited) {
            Descent::Committed(route) => {
                trace!(nodes = ?route.nodes(), cost = route.cost(), "route committed");
                SearchOutcome::Found(route)
            }
            Descent::Unwinding => SearchOutcome::NotFound,
        }
    }

    fn descend(
        &mut self,
        current: usize,
        cost: f64,
        path: &mut Vec<usize>,
        visited: &mut [bool],
    ) -> Descent {
        if cost > self.max_duration {
            return Descent::Unwinding;
        }

        visited[current] = true;
        let neighbors = self.ordered_neighbors(current, visited);

        // Every branch resolves, so only the first neighbour is entered.
        if let Some(&(next, weight)) = neighbors.first() {
            path.push(next);
            let below = self.descend(next, cost + weight, path, visited);
            path.pop();
            if let Descent::Committed(route) = below {
                return Descent::Committed(route);
            }
        }

        if let Some(back) = self.graph.edge(current, DEPOT) {
            let total = cost + back;
            if total < self.max_duration {
                let mut nodes = path.clone();
                nodes.push(DEPOT);
                return Descent::Committed(self.graph.base().route(nodes, total));
            }
        }

        visited[current] = false;
        Descent::Unwinding
    }

    /// Open neighbours of `current` in the order they would be tried.
    ///
    /// Only present edges with positive weight to unvisited nodes count.
    fn ordered_neighbors(&mut self, current: usize, visited: &[bool]) -> Vec<(usize, f64)> {
        let mut neighbors: Vec<(usize, f64)> = (0..self.graph.size())
            .filter(|&n| !visited[n])
            .filter_map(|n| {
                self.graph
                    .edge(current, n)
                    .filter(|&w| w > 0.0)
                    .map(|w| (n, w))
            })
            .collect();

        if self.annealing && self.rng.random_range(0.0..1.0) < self.temperature {
            neighbors.shuffle(&mut *self.rng);
        } else {
            let priority = self.priority;
            neighbors.sort_by(|a, b| {
                priority
                    .contains(&b.0)
                    .cmp(&priority.contains(&a.0))
                    .then_with(|| a.1.total_cmp(&b.1))
            });
        }
        neighbors
    }
}
