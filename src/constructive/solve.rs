//! Solve loop: one route at a time until every load is routed.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::priority::priority_nodes;
use super::search::{RouteSearch, SearchOutcome};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::evaluation::weighted_route_cost;
use crate::graph::{end_node, slot_of, start_node, ResidualGraph, TaskGraph};
use crate::models::{Load, Solution};

/// Builds a full solution over `graph`.
///
/// Each iteration searches one route on the residual graph, retires the
/// routed nodes and repeats until no load is left. Loads that cannot be
/// served are reported in [`Solution::unassigned`] instead of being
/// retried:
///
/// - up front, a load whose solo round trip is not below the duration
///   limit, or whose carry leg has zero length (the search never expands
///   along a zero-weight edge, so its drop-off is unreachable);
/// - every load still open when a search finds no route. A pickup at the
///   depot itself can only be reached by chaining from another load's
///   drop-off, so it ends up here when no route does that.
///
/// The total cost is `cost_per_driver_minute × routes × Σ route durations`.
pub fn solve<R: Rng>(
    graph: &TaskGraph,
    priority: &BTreeSet<usize>,
    config: &SearchConfig,
    rng: &mut R,
) -> Solution {
    let mut residual = ResidualGraph::new(graph);
    let mut solution = Solution::new();
    let mut unsolved: BTreeSet<usize> = BTreeSet::new();
    let mut solved = 0usize;
    let total_nodes = graph.num_task_nodes() as f64;

    for slot in graph.slots() {
        let (s, e) = (start_node(slot), end_node(slot));
        if is_servable(graph, slot, config.max_duration) {
            unsolved.insert(s);
            unsolved.insert(e);
        } else {
            let id = graph.load_id(slot);
            warn!(load = id, "load cannot be served within the duration limit");
            solution.add_unassigned(id);
            residual.retire(&[s, e]);
        }
    }

    while !unsolved.is_empty() {
        let solved_fraction = solved as f64 / total_nodes;
        let outcome =
            RouteSearch::new(&residual, priority, config, solved_fraction, rng).run();

        match outcome {
            SearchOutcome::Found(route) => {
                residual.retire(route.nodes());
                for node in route.stops() {
                    if unsolved.remove(&node) {
                        solved += 1;
                    }
                }
                debug!(
                    loads = ?route.load_ids(),
                    cost = route.cost(),
                    remaining = unsolved.len(),
                    "route built"
                );
                solution.add_route(route);
            }
            SearchOutcome::NotFound => {
                let stranded: BTreeSet<usize> = unsolved.iter().map(|&n| slot_of(n)).collect();
                let ids: Vec<usize> = stranded.into_iter().map(|slot| graph.load_id(slot)).collect();
                warn!(loads = ?ids, "no route reaches the remaining loads");
                for id in ids {
                    solution.add_unassigned(id);
                }
                break;
            }
        }
    }

    let total = weighted_route_cost(
        config.cost_per_driver_minute,
        solution.num_routes(),
        solution.total_duration(),
    );
    solution.set_total_cost(total);

    info!(
        routes = solution.num_routes(),
        unassigned = solution.num_unassigned(),
        total_cost = total,
        "solve finished"
    );
    solution
}

/// Builds the graph and priority set for `loads` and runs [`solve`] once.
///
/// # Errors
///
/// Fails on an invalid configuration or invalid load ids.
///
/// # Examples
///
/// ```
/// use u_pickup::config::SearchConfig;
/// use u_pickup::constructive::solve_loads;
/// use u_pickup::models::{Load, Point};
///
/// let loads = vec![
///     Load::new(1, Point::new(10.0, 0.0), Point::new(20.0, 0.0)),
///     Load::new(2, Point::new(22.0, 0.0), Point::new(30.0, 0.0)),
/// ];
/// let solution = solve_loads(&loads, &SearchConfig::default()).unwrap();
/// assert_eq!(solution.num_routes(), 1);
/// assert_eq!(solution.routes()[0].load_ids(), &[1, 2]);
/// assert!((solution.total_cost() - 500.0 * 1.0 * 60.0).abs() < 1e-6);
/// ```
pub fn solve_loads(loads: &[Load], config: &SearchConfig) -> Result<Solution> {
    config.validate()?;
    let graph = TaskGraph::from_loads(loads)?;
    let priority = if config.prioritize {
        priority_nodes(loads, config.priority_fraction)
    } else {
        BTreeSet::new()
    };
    let mut rng = create_rng(config.seed);
    Ok(solve(&graph, &priority, config, &mut rng))
}

/// Seeded generator, or a fresh seed when none is given.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

/// The load in `slot` fits a route on its own and its drop-off can be
/// reached from its pickup.
fn is_servable(graph: &TaskGraph, slot: usize, max_duration: f64) -> bool {
    let (s, e) = (start_node(slot), end_node(slot));
    graph.edge(s, e).is_some_and(|w| w > 0.0)
        && graph.round_trip(slot).is_some_and(|t| t < max_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::RouteEvaluator;
    use crate::models::Point;

    fn load(id: usize, a: (f64, f64), b: (f64, f64)) -> Load {
        Load::new(id, Point::new(a.0, a.1), Point::new(b.0, b.1))
    }

    fn greedy() -> SearchConfig {
        SearchConfig::default().with_seed(42)
    }

    #[test]
    fn test_two_close_loads_share_a_route() {
        let loads = vec![load(1, (50.0, 50.0), (100.0, 100.0)), load(2, (101.0, 101.0), (60.0, 0.0))];
        let sol = solve_loads(&loads, &greedy()).expect("valid");
        assert_eq!(sol.num_routes(), 1);
        let ids = sol.routes()[0].load_ids();
        assert!(ids == [1, 2] || ids == [2, 1]);
        assert!(sol.is_complete());
    }

    #[test]
    fn test_far_load_is_unassigned() {
        // (300,0) -> (400,0): 300 + 100 + 400 = 800 minutes alone
        let loads = vec![load(1, (10.0, 0.0), (20.0, 0.0)), load(2, (300.0, 0.0), (400.0, 0.0))];
        let sol = solve_loads(&loads, &greedy()).expect("valid");
        assert_eq!(sol.unassigned(), &[2]);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes()[0].load_ids(), &[1]);
    }

    #[test]
    fn test_only_infeasible_loads() {
        let loads = vec![load(1, (300.0, 0.0), (400.0, 0.0))];
        let sol = solve_loads(&loads, &greedy()).expect("valid");
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.unassigned(), &[1]);
        assert_eq!(sol.total_cost(), 0.0);
    }

    #[test]
    fn test_zero_length_carry_leg_is_unassigned() {
        let loads = vec![
            load(1, (0.0, 0.0), (10.0, 0.0)),
            load(2, (5.0, 5.0), (5.0, 5.0)),
            load(3, (20.0, 0.0), (30.0, 0.0)),
        ];
        let sol = solve_loads(&loads, &greedy()).expect("valid");
        assert_eq!(sol.unassigned(), &[2]);
        // 20 + 10 + 30 + 10 + 10: load 1 is reached from load 3's drop-off
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes()[0].load_ids(), &[3, 1]);
        assert!((sol.routes()[0].cost() - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_pickup_at_depot_is_chained() {
        let loads = vec![load(1, (10.0, 0.0), (20.0, 0.0)), load(2, (0.0, 0.0), (5.0, 0.0))];
        let sol = solve_loads(&loads, &greedy()).expect("valid");
        assert!(sol.is_complete());
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes()[0].load_ids(), &[1, 2]);
        assert!((sol.routes()[0].cost() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_pickup_at_depot_alone_is_unassigned() {
        let loads = vec![load(4, (0.0, 0.0), (5.0, 0.0))];
        let sol = solve_loads(&loads, &greedy()).expect("valid");
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.unassigned(), &[4]);
    }

    #[test]
    fn test_huge_sparse_ids() {
        let text = "loadNumber pickup dropoff\n1000000000 (10,0) (20,0)\n3 (22,0) (30,0)\n";
        let loads = crate::io::parse_loads(text).expect("valid file");
        let sol = solve_loads(&loads, &greedy()).expect("valid");
        assert!(sol.is_complete());
        assert_eq!(sol.routes()[0].load_ids(), &[1_000_000_000, 3]);
        assert_eq!(crate::io::format_solution(&sol), "[1000000000,3]");
    }

    #[test]
    fn test_splits_when_duration_runs_out() {
        // each load alone is 600 minutes; no two fit together
        let loads = vec![load(1, (200.0, 0.0), (300.0, 0.0)), load(2, (-200.0, 0.0), (-300.0, 0.0))];
        let sol = solve_loads(&loads, &greedy()).expect("valid");
        assert_eq!(sol.num_routes(), 2);
        assert!(sol.is_complete());
        let expected = 500.0 * 2.0 * 1200.0;
        assert!((sol.total_cost() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_empty_input() {
        let sol = solve_loads(&[], &greedy()).expect("valid");
        assert_eq!(sol.num_routes(), 0);
        assert!(sol.is_complete());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SearchConfig::default().with_max_duration(-1.0);
        assert!(solve_loads(&[], &config).is_err());
    }

    #[test]
    fn test_deterministic_without_annealing() {
        let loads: Vec<Load> = (1..=15)
            .map(|i| {
                let f = i as f64;
                load(i, (f * 7.0 % 90.0 - 45.0, f * 13.0 % 80.0 - 40.0), (f * 11.0 % 70.0, -f * 3.0))
            })
            .collect();
        let a = solve_loads(&loads, &SearchConfig::default().with_seed(1)).expect("valid");
        let b = solve_loads(&loads, &SearchConfig::default().with_seed(2)).expect("valid");
        assert_eq!(a.routes(), b.routes());
        assert_eq!(a.total_cost(), b.total_cost());
    }

    #[test]
    fn test_seeded_annealing_is_reproducible() {
        let loads: Vec<Load> = (1..=15)
            .map(|i| {
                let f = i as f64;
                load(i, (f * 7.0 % 90.0 - 45.0, f * 13.0 % 80.0 - 40.0), (f * 11.0 % 70.0, -f * 3.0))
            })
            .collect();
        let config = SearchConfig::default()
            .with_annealing(true)
            .with_prioritize(true)
            .with_seed(99);
        let a = solve_loads(&loads, &config).expect("valid");
        let b = solve_loads(&loads, &config).expect("valid");
        assert_eq!(a.routes(), b.routes());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_loads() -> impl Strategy<Value = Vec<Load>> {
            prop::collection::vec(
                (-250.0..250.0f64, -250.0..250.0f64, -250.0..250.0f64, -250.0..250.0f64),
                1..25,
            )
            .prop_map(|coords| {
                coords
                    .into_iter()
                    .enumerate()
                    .map(|(i, (a, b, c, d))| load(3 * i + 2, (a, b), (c, d)))
                    .collect()
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn routes_partition_servable_loads(
                loads in arb_loads(),
                seed in any::<u64>(),
                annealing in any::<bool>(),
                prioritize in any::<bool>(),
            ) {
                let config = SearchConfig::default()
                    .with_annealing(annealing)
                    .with_prioritize(prioritize)
                    .with_seed(seed);
                let sol = solve_loads(&loads, &config).unwrap();
                let graph = TaskGraph::from_loads(&loads).unwrap();

                let (total, violations) =
                    RouteEvaluator::new(&graph, config.max_duration).evaluate_solution(&sol);
                prop_assert!(violations.is_empty(), "{:?}", violations);

                for route in sol.routes() {
                    prop_assert!(route.cost() < 720.0);
                    prop_assert!(!route.is_empty());
                }
                for l in &loads {
                    let unassigned = sol.unassigned().contains(&l.id());
                    prop_assert_eq!(unassigned, l.round_trip() >= 720.0);
                }

                let expected = 500.0 * sol.num_routes() as f64 * total;
                prop_assert!((sol.total_cost() - expected).abs() <= 1e-6 * expected.max(1.0));
            }
        }
    }
}
