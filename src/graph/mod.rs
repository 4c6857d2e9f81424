//! Task graph over the depot and load nodes.
//!
//! Provides the dense directed graph built from a load list and the
//! removed-edge overlay the solve loop shrinks between routes.

mod matrix;
mod node;
mod residual;

pub use matrix::TaskGraph;
pub use node::{end_node, slot_of, start_node, DEPOT};
pub use residual::ResidualGraph;
