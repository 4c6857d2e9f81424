//! Route construction.
//!
//! - [`priority_nodes`] — hard-to-schedule pickups, visited first when prioritizing
//! - [`RouteSearch`] — one duration-bounded nearest-neighbour route, with
//!   optional annealed neighbour shuffling
//! - [`solve`] — repeated route searches over a shrinking graph until every
//!   load is routed or reported unassigned

mod priority;
mod search;
mod solve;

pub use priority::priority_nodes;
pub use search::{RouteSearch, SearchOutcome};
pub use solve::{create_rng, solve, solve_loads};
