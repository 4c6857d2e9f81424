//! Route type.

use serde::Serialize;

use crate::graph::{slot_of, DEPOT};

/// One driver's depot-to-depot path over task-graph nodes.
///
/// `cost` is the sum of the traversed edge weights, return leg included,
/// and is the route's driving time in minutes. Nodes are slot-numbered;
/// `load_ids` holds the real ids of the loads visited.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Route;
///
/// // depot -> start(2) -> end(2) -> start(1) -> end(1) -> depot
/// let route = Route::new(vec![0, 3, 4, 1, 2, 0], 42.0);
/// assert_eq!(route.load_ids(), &[2, 1]);
/// assert_eq!(route.num_loads(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    nodes: Vec<usize>,
    load_ids: Vec<usize>,
    cost: f64,
}

impl Route {
    /// Creates a route from its full node path (depot at both ends), taking
    /// each load's id to be its slot.
    ///
    /// Use [`TaskGraph::route`](crate::graph::TaskGraph::route) when ids
    /// differ from slots.
    pub fn new(nodes: Vec<usize>, cost: f64) -> Self {
        let mut load_ids: Vec<usize> = Vec::new();
        for slot in nodes.iter().filter(|&&n| n != DEPOT).map(|&n| slot_of(n)) {
            if !load_ids.contains(&slot) {
                load_ids.push(slot);
            }
        }
        Self::with_load_ids(nodes, load_ids, cost)
    }

    /// Creates a route with explicit load ids, in visiting order.
    pub fn with_load_ids(nodes: Vec<usize>, load_ids: Vec<usize>, cost: f64) -> Self {
        Self {
            nodes,
            load_ids,
            cost,
        }
    }

    /// Node path, depot included at both ends.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Nodes visited between the two depot stops.
    pub fn stops(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().copied().filter(|&n| n != DEPOT)
    }

    /// Total driving time.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Load ids in visiting order, each listed once.
    pub fn load_ids(&self) -> &[usize] {
        &self.load_ids
    }

    /// Number of distinct loads served.
    pub fn num_loads(&self) -> usize {
        self.load_ids().len()
    }

    /// Returns `true` if the route serves no load.
    pub fn is_empty(&self) -> bool {
        self.stops().next().is_none()
    }
}
