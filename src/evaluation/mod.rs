//! Cost model and route checking.
//!
//! - [`distance`], [`route_cost`] — the geometry and operating-cost formulas
//! - [`RouteEvaluator`] — re-walks routes over the task graph and reports
//!   [`Violation`](crate::models::Violation)s

mod cost;
mod evaluator;

pub use cost::{
    distance, route_cost, weighted_route_cost, COST_PER_DRIVER_MINUTE, MAX_ROUTE_DURATION,
};
pub use evaluator::RouteEvaluator;
