//! Facade crate for the dispatch engine.
//!
//! This crate re-exports the core domain types and exposes the greedy
//! dispatcher and the OSRM matrix provider behind feature flags.

#![forbid(unsafe_code)]

pub use dispatch_core::{
    Diagnostics, DispatchPlan, DispatchRequest, DispatchSnapshot, DistanceMatrix,
    DistanceMatrixProvider, InputError, MatrixError, Order, OrderInput, RESERVED_TIER,
    RouteSummary, ShiftStart, SolveError, Solver, Task, VehicleProfile, Worker, WorkerInput,
};

#[cfg(feature = "solver")]
pub use dispatch_solver::{DispatchPolicy, GreedyDispatcher, solve, solve_with_policy};

#[cfg(feature = "osrm")]
pub use dispatch_data::routing::{OsrmMatrixProvider, OsrmMatrixProviderConfig, ProviderBuildError};
