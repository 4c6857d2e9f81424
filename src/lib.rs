//! # u-pickup
//!
//! Pickup-and-delivery route construction: assigns loads (a pickup point and
//! a drop-off point each) to depot-based driver routes that each stay under a
//! maximum duration, trying to keep `drivers × minutes driven` low.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Point, Load, Route, Solution)
//! - [`graph`] — Directed task graph over depot/pickup/drop-off nodes and its residual overlay
//! - [`evaluation`] — Distance and cost formulas, route re-checking
//! - [`constructive`] — Priority detection, annealed nearest-neighbour route search, solve loop
//! - [`planner`] — Repeated solve runs under a wall-clock budget
//! - [`config`] — Search and planner settings
//! - [`io`] — Load-file parsing and route report formatting
//!
//! ## Features
//!
//! - `cli` (default) — builds the `u-pickup` binary
//! - `parallel` — runs planner rounds on rayon

pub mod config;
pub mod constructive;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod io;
pub mod models;
pub mod planner;

pub use error::{Error, Result};
