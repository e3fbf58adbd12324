//! Adapters connecting the dispatch engine to external data sources.
//!
//! Responsibilities:
//! - Implement [`dispatch_core::DistanceMatrixProvider`] over routing
//!   services reachable via HTTP.
//! - Translate transport and service failures into
//!   [`dispatch_core::MatrixError`] without retrying.
//!
//! Boundaries:
//! - Do not encode dispatch rules (live in `dispatch-solver`).
//! - Keep blocking I/O off async executors; the provider bridges to the
//!   synchronous trait internally.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

pub mod routing;
