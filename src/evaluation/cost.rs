//! Geometry and cost model.

use crate::models::Point;

/// Longest allowed route, in minutes (12 hours). Routes must stay strictly
/// below it.
pub const MAX_ROUTE_DURATION: f64 = 720.0;

/// Cost charged per driver per minute driven.
pub const COST_PER_DRIVER_MINUTE: f64 = 500.0;

/// Euclidean distance between two points; one unit of distance is one
/// minute of driving.
pub fn distance(a: &Point, b: &Point) -> f64 {
    a.distance_to(b)
}

/// Operating cost of a solution: `500 × drivers × total minutes`.
///
/// # Examples
///
/// ```
/// use u_pickup::evaluation::route_cost;
///
/// assert_eq!(route_cost(2, 100.0), 100_000.0);
/// assert_eq!(route_cost(0, 100.0), 0.0);
/// ```
pub fn route_cost(drivers: usize, total_minutes: f64) -> f64 {
    weighted_route_cost(COST_PER_DRIVER_MINUTE, drivers, total_minutes)
}

/// [`route_cost`] with an explicit coefficient.
pub fn weighted_route_cost(coefficient: f64, drivers: usize, total_minutes: f64) -> f64 {
    coefficient * drivers as f64 * total_minutes
}
