//! Domain model types for pickup-and-delivery routing.
//!
//! Provides the core abstractions: points and loads (a pickup/drop-off
//! pair), routes as depot-framed node paths, and solutions that collect
//! routes together with the loads no route could serve.

mod load;
mod route;
mod solution;

pub use load::{Load, Point};
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};
