//! Dense directed task graph.

use std::collections::HashSet;

use super::node::{end_node, slot_of, start_node, DEPOT};
use crate::error::{Error, Result};
use crate::evaluation::distance;
use crate::models::{Load, Route};

/// A dense n×n directed graph over `{depot, load starts, load ends}`,
/// stored in row-major order as a weight grid plus a parallel presence grid.
///
/// Loads are addressed by slot (their 1-based input position), so the
/// matrix has `2 × loads + 1` rows however sparse or large the ids are.
/// [`TaskGraph::load_id`] maps a slot back to the load's id.
///
/// An absent edge is not traversable, which is distinct from a present edge
/// of weight zero. The search never *expands* along a zero-weight edge, so
/// a coincident pickup/drop-off pair is only usable as a return leg.
///
/// # Examples
///
/// ```
/// use u_pickup::models::{Load, Point};
/// use u_pickup::graph::TaskGraph;
///
/// let loads = vec![
///     Load::new(7, Point::new(3.0, 4.0), Point::new(6.0, 8.0)),
///     Load::new(40, Point::new(0.0, 8.0), Point::new(0.0, 1.0)),
/// ];
/// let g = TaskGraph::from_loads(&loads).unwrap();
/// assert_eq!(g.size(), 5);
/// assert_eq!(g.load_id(2), 40);
/// assert!((g.edge(0, 1).unwrap() - 5.0).abs() < 1e-10);
/// assert!(g.edge(2, 1).is_none()); // never from a load's end to its own start
/// assert!(g.edge(2, 3).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TaskGraph {
    weights: Vec<f64>,
    present: Vec<bool>,
    size: usize,
    load_ids: Vec<usize>,
}

impl TaskGraph {
    /// Creates a graph with `size` nodes and no edges.
    pub fn new(size: usize) -> Self {
        Self {
            weights: vec![0.0; size * size],
            present: vec![false; size * size],
            size,
            load_ids: Vec::new(),
        }
    }

    /// Builds the task graph for a list of loads, depot at the origin.
    ///
    /// For every load: depot→start, start→end and end→depot. For every pair
    /// of distinct loads `j`, `k`: end(j)→start(k). Weights are Euclidean
    /// distances. The load at input position `i` takes slot `i + 1`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLoadId`] for id 0, [`Error::DuplicateLoad`] for a
    /// repeated id.
    pub fn from_loads(loads: &[Load]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(loads.len());
        for load in loads {
            if load.id() == 0 {
                return Err(Error::InvalidLoadId { id: load.id() });
            }
            if !seen.insert(load.id()) {
                return Err(Error::DuplicateLoad { id: load.id() });
            }
        }

        let mut graph = Self::new(2 * loads.len() + 1);
        graph.load_ids = loads.iter().map(Load::id).collect();

        for (slot, load) in (1..).zip(loads) {
            let (s, e) = (start_node(slot), end_node(slot));
            graph.add_edge(DEPOT, s, load.depot_to_start());
            graph.add_edge(s, e, load.leg_distance());
            graph.add_edge(e, DEPOT, load.end_to_depot());
        }

        for (from_slot, from) in (1..).zip(loads) {
            for (to_slot, to) in (1..).zip(loads) {
                if from_slot == to_slot {
                    continue;
                }
                graph.add_edge(
                    end_node(from_slot),
                    start_node(to_slot),
                    distance(&from.end(), &to.start()),
                );
            }
        }

        Ok(graph)
    }

    /// Adds (or overwrites) the edge `from → to`.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) {
        let idx = from * self.size + to;
        self.weights[idx] = weight;
        self.present[idx] = true;
    }

    /// Weight of `from → to`, or `None` if the edge is absent.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn edge(&self, from: usize, to: usize) -> Option<f64> {
        let idx = from * self.size + to;
        self.present[idx].then(|| self.weights[idx])
    }

    /// Returns `true` if the edge `from → to` is present.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.present[from * self.size + to]
    }

    /// Number of nodes (matrix dimension).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Ids of the loads the graph was built from, in slot order.
    pub fn load_ids(&self) -> &[usize] {
        &self.load_ids
    }

    /// Number of loads.
    pub fn num_loads(&self) -> usize {
        self.load_ids.len()
    }

    /// Slots `1..=num_loads`.
    pub fn slots(&self) -> impl Iterator<Item = usize> {
        1..=self.load_ids.len()
    }

    /// Id of the load in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is 0 or past the last load.
    pub fn load_id(&self, slot: usize) -> usize {
        self.load_ids[slot - 1]
    }

    /// Id of the load owning a non-depot `node`.
    pub fn load_at(&self, node: usize) -> usize {
        self.load_id(slot_of(node))
    }

    /// Number of load nodes plus the depot.
    pub fn num_task_nodes(&self) -> usize {
        2 * self.load_ids.len() + 1
    }

    /// Duration of the depot → start → end → depot round trip for the load
    /// in `slot`.
    ///
    /// `None` if any of the three edges is absent.
    pub fn round_trip(&self, slot: usize) -> Option<f64> {
        let (s, e) = (start_node(slot), end_node(slot));
        if e >= self.size {
            return None;
        }
        Some(self.edge(DEPOT, s)? + self.edge(s, e)? + self.edge(e, DEPOT)?)
    }

    /// Wraps a depot-framed node path as a [`Route`] carrying the ids of
    /// the loads it visits.
    pub fn route(&self, nodes: Vec<usize>, cost: f64) -> Route {
        let mut ids: Vec<usize> = Vec::new();
        for id in nodes.iter().filter(|&&n| n != DEPOT).map(|&n| self.load_at(n)) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Route::with_load_ids(nodes, ids, cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn sample_loads() -> Vec<Load> {
        vec![
            Load::new(1, Point::new(3.0, 4.0), Point::new(6.0, 8.0)),
            Load::new(2, Point::new(0.0, 8.0), Point::new(0.0, 1.0)),
            Load::new(3, Point::new(-5.0, 0.0), Point::new(-5.0, -5.0)),
        ]
    }

    #[test]
    fn test_load_edges() {
        let g = TaskGraph::from_loads(&sample_loads()).expect("valid loads");
        assert_eq!(g.size(), 7);
        assert!((g.edge(DEPOT, 1).expect("depot->start") - 5.0).abs() < 1e-10);
        assert!((g.edge(1, 2).expect("leg") - 5.0).abs() < 1e-10);
        assert!((g.edge(2, DEPOT).expect("return") - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_chain_edges() {
        let g = TaskGraph::from_loads(&sample_loads()).expect("valid loads");
        // end(2) = (0,1) -> start(1) = (3,4)
        assert!((g.edge(4, 1).expect("chain") - 18f64.sqrt()).abs() < 1e-10);
        // end(1) = (6,8) -> start(2) = (0,8)
        assert!((g.edge(2, 3).expect("chain") - 6.0).abs() < 1e-10);
        for slot in 1..=3 {
            assert!(!g.has_edge(end_node(slot), start_node(slot)));
        }
    }

    #[test]
    fn test_no_other_edges() {
        let g = TaskGraph::from_loads(&sample_loads()).expect("valid loads");
        // start nodes only lead to their own end
        assert!(!g.has_edge(1, DEPOT));
        assert!(!g.has_edge(1, 3));
        assert!(!g.has_edge(1, 4));
        // ends never lead to other ends
        assert!(!g.has_edge(2, 4));
        // the depot never leads to an end
        assert!(!g.has_edge(DEPOT, 2));
        assert!(!g.has_edge(DEPOT, DEPOT));
    }

    #[test]
    fn test_directed() {
        let g = TaskGraph::from_loads(&sample_loads()).expect("valid loads");
        assert!(g.has_edge(DEPOT, 1));
        assert!(!g.has_edge(1, DEPOT));
    }

    #[test]
    fn test_zero_weight_edge_is_present() {
        let loads = vec![Load::new(1, Point::ORIGIN, Point::new(1.0, 0.0))];
        let g = TaskGraph::from_loads(&loads).expect("valid loads");
        assert_eq!(g.edge(DEPOT, 1), Some(0.0));
    }

    #[test]
    fn test_sparse_ids_use_dense_slots() {
        let loads = vec![
            Load::new(5, Point::new(1.0, 0.0), Point::new(2.0, 0.0)),
            Load::new(2, Point::new(3.0, 0.0), Point::new(4.0, 0.0)),
        ];
        let g = TaskGraph::from_loads(&loads).expect("valid loads");
        assert_eq!(g.size(), 5);
        assert_eq!(g.num_task_nodes(), 5);
        assert_eq!(g.load_ids(), &[5, 2]);
        assert_eq!(g.load_id(1), 5);
        assert_eq!(g.load_at(4), 2);
        assert!((g.edge(DEPOT, 3).expect("depot->start of id 2") - 3.0).abs() < 1e-10);
        assert!(g.has_edge(2, 3));
        assert!(g.has_edge(4, 1));
    }

    #[test]
    fn test_huge_id_stays_small() {
        let loads = vec![Load::new(1_000_000_000, Point::new(10.0, 0.0), Point::new(20.0, 0.0))];
        let g = TaskGraph::from_loads(&loads).expect("valid loads");
        assert_eq!(g.size(), 3);
        assert_eq!(g.load_id(1), 1_000_000_000);
        assert!((g.round_trip(1).expect("load") - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_route_maps_slots_to_ids() {
        let loads = vec![
            Load::new(30, Point::new(1.0, 0.0), Point::new(2.0, 0.0)),
            Load::new(10, Point::new(3.0, 0.0), Point::new(4.0, 0.0)),
        ];
        let g = TaskGraph::from_loads(&loads).expect("valid loads");
        let route = g.route(vec![0, 3, 4, 1, 2, 0], 12.0);
        assert_eq!(route.load_ids(), &[10, 30]);
        assert_eq!(route.nodes(), &[0, 3, 4, 1, 2, 0]);
    }

    #[test]
    fn test_rejects_bad_ids() {
        let zero = vec![Load::new(0, Point::ORIGIN, Point::new(1.0, 1.0))];
        assert!(matches!(
            TaskGraph::from_loads(&zero),
            Err(Error::InvalidLoadId { id: 0 })
        ));

        let dup = vec![
            Load::new(1, Point::new(1.0, 1.0), Point::new(2.0, 2.0)),
            Load::new(1, Point::new(3.0, 3.0), Point::new(4.0, 4.0)),
        ];
        assert!(matches!(
            TaskGraph::from_loads(&dup),
            Err(Error::DuplicateLoad { id: 1 })
        ));
    }

    #[test]
    fn test_empty() {
        let g = TaskGraph::from_loads(&[]).expect("empty is valid");
        assert_eq!(g.size(), 1);
        assert_eq!(g.num_task_nodes(), 1);
    }

    #[test]
    fn test_round_trip() {
        let g = TaskGraph::from_loads(&sample_loads()).expect("valid loads");
        assert!((g.round_trip(1).expect("load 1") - 20.0).abs() < 1e-10);
        assert!(TaskGraph::new(3).round_trip(1).is_none());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_loads() -> impl Strategy<Value = Vec<Load>> {
            prop::collection::vec(
                (-100.0..100.0f64, -100.0..100.0f64, -100.0..100.0f64, -100.0..100.0f64),
                0..12,
            )
            .prop_map(|coords| {
                coords
                    .into_iter()
                    .enumerate()
                    .map(|(i, (a, b, c, d))| {
                        Load::new((i + 1) * 7919, Point::new(a, b), Point::new(c, d))
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn matrix_is_sized_by_load_count(loads in arb_loads()) {
                let g = TaskGraph::from_loads(&loads).unwrap();
                prop_assert_eq!(g.size(), 2 * loads.len() + 1);
                for (slot, l) in (1..).zip(&loads) {
                    prop_assert_eq!(g.load_id(slot), l.id());
                }
            }

            #[test]
            fn every_load_has_its_three_edges(loads in arb_loads()) {
                let g = TaskGraph::from_loads(&loads).unwrap();
                for (slot, l) in (1..).zip(&loads) {
                    let (s, e) = (start_node(slot), end_node(slot));
                    prop_assert_eq!(g.edge(DEPOT, s), Some(l.start().distance_to(&Point::ORIGIN)));
                    prop_assert_eq!(g.edge(s, e), Some(l.start().distance_to(&l.end())));
                    prop_assert_eq!(g.edge(e, DEPOT), Some(l.end().distance_to(&Point::ORIGIN)));
                }
            }

            #[test]
            fn chains_between_distinct_loads_only(loads in arb_loads()) {
                let g = TaskGraph::from_loads(&loads).unwrap();
                for (i, a) in (1..).zip(&loads) {
                    for (j, b) in (1..).zip(&loads) {
                        let edge = g.edge(end_node(i), start_node(j));
                        if i == j {
                            prop_assert!(edge.is_none());
                        } else {
                            let w = edge.unwrap();
                            prop_assert!((w - a.end().distance_to(&b.start())).abs() < 1e-9);
                        }
                    }
                }
            }
        }
    }
}
