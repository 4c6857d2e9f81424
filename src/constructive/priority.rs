//! Hard-to-schedule load detection.
//!
//! Loads with the longest legs, the farthest pickups and the farthest
//! drop-offs are the ones most likely to be stranded once cheaper loads
//! have been chained together, so the greedy ordering visits them first.

use std::collections::BTreeSet;

use crate::graph::start_node;
use crate::models::Load;

/// Start nodes of the hard-to-schedule loads.
///
/// Ranks the loads three times in descending order (leg distance,
/// depot→start, end→depot), keeps the top `fraction` of each ranking
/// (count truncated, not rounded) and unions their start nodes. Nodes are
/// slot-numbered, so the load at input position `i` maps to start node
/// `2i + 1`. Ranking is stable, so ties keep input order.
///
/// # Examples
///
/// ```
/// use u_pickup::models::{Load, Point};
/// use u_pickup::constructive::priority_nodes;
///
/// let loads: Vec<Load> = (1..=5)
///     .map(|i| Load::new(i, Point::new(i as f64, 0.0), Point::new(i as f64, 1.0)))
///     .collect();
/// // 5 × 0.2 = 1 load per ranking; load 5 is farthest out and back
/// let nodes = priority_nodes(&loads, 0.2);
/// assert!(nodes.contains(&9));
/// ```
pub fn priority_nodes(loads: &[Load], fraction: f64) -> BTreeSet<usize> {
    let take = (loads.len() as f64 * fraction) as usize;
    if take == 0 {
        return BTreeSet::new();
    }

    let rankings: [fn(&Load) -> f64; 3] = [
        Load::leg_distance,
        Load::depot_to_start,
        Load::end_to_depot,
    ];

    let mut nodes = BTreeSet::new();
    for metric in rankings {
        let mut ranked: Vec<(usize, &Load)> = (1..).zip(loads).collect();
        ranked.sort_by(|a, b| metric(b.1).total_cmp(&metric(a.1)));
        nodes.extend(ranked.iter().take(take).map(|&(slot, _)| start_node(slot)));
    }
    nodes
}
