//! Core domain types for the dispatch engine.
//!
//! The types in this crate describe one solve invocation: the couriers
//! ([`Worker`]) and the pending deliveries ([`Order`]) captured from the
//! caller's snapshot, the per-worker visit plans produced by a [`Solver`]
//! ([`DispatchPlan`]) and the travel-cost oracle the solver depends on
//! ([`DistanceMatrixProvider`]).
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod input;
pub mod matrix;
mod order;
mod plan;
mod profile;
mod solver;
mod worker;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use input::{DispatchRequest, DispatchSnapshot, InputError, OrderInput, ShiftStart, WorkerInput};
pub use matrix::{DistanceMatrix, DistanceMatrixProvider, MatrixError};
pub use order::{Order, RESERVED_TIER};
pub use plan::{Diagnostics, DispatchPlan, RouteSummary, Task};
pub use profile::{UnknownVehicleProfile, VehicleProfile};
pub use solver::{SolveError, Solver};
pub use worker::Worker;
