//! Removed-edge overlay over a [`TaskGraph`].

use super::{TaskGraph, DEPOT};

/// The part of a [`TaskGraph`] still open to the solve loop.
///
/// Routing a node *retires* it: every edge into it is hidden, and so is its
/// edge back to the depot. Its outgoing edges to other nodes are left in
/// place. Retired nodes are unreachable, so those surviving edges are never
/// walked, but the asymmetry is kept explicit here rather than hidden in a
/// matrix write.
///
/// The base graph is only borrowed, so independent solve runs can share it.
///
/// # Examples
///
/// ```
/// use u_pickup::models::{Load, Point};
/// use u_pickup::graph::{ResidualGraph, TaskGraph};
///
/// let loads = vec![
///     Load::new(1, Point::new(1.0, 0.0), Point::new(2.0, 0.0)),
///     Load::new(2, Point::new(3.0, 0.0), Point::new(4.0, 0.0)),
/// ];
/// let base = TaskGraph::from_loads(&loads).unwrap();
/// let mut residual = ResidualGraph::new(&base);
/// residual.retire(&[0, 1, 2, 0]);
///
/// assert!(residual.edge(0, 1).is_none()); // into a retired node
/// assert!(residual.edge(2, 0).is_none()); // retired node back to depot
/// assert!(residual.edge(2, 3).is_some()); // out of a retired node
/// assert!(residual.edge(0, 3).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ResidualGraph<'g> {
    base: &'g TaskGraph,
    retired: Vec<bool>,
    depot_closed: Vec<bool>,
}

impl<'g> ResidualGraph<'g> {
    /// Creates an overlay with nothing retired.
    pub fn new(base: &'g TaskGraph) -> Self {
        Self {
            base,
            retired: vec![false; base.size()],
            depot_closed: vec![false; base.size()],
        }
    }

    /// Underlying task graph.
    pub fn base(&self) -> &'g TaskGraph {
        self.base
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.base.size()
    }

    /// Weight of `from → to` if it is present in the base graph and not
    /// hidden by a retirement.
    pub fn edge(&self, from: usize, to: usize) -> Option<f64> {
        if to == DEPOT {
            if self.depot_closed[from] {
                return None;
            }
        } else if self.retired[to] {
            return None;
        }
        self.base.edge(from, to)
    }

    /// Retires every node of a routed path.
    ///
    /// Non-depot nodes lose all incoming edges; every node on the path,
    /// depot included, loses its edge to the depot.
    pub fn retire(&mut self, nodes: &[usize]) {
        for &node in nodes {
            if node != DEPOT {
                self.retired[node] = true;
            }
            self.depot_closed[node] = true;
        }
    }

    /// Returns `true` if `node` has been retired.
    pub fn is_retired(&self, node: usize) -> bool {
        node != DEPOT && self.retired[node]
    }
}
