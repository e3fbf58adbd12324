//! Greedy courier dispatch for the dispatch engine.
//!
//! This crate provides [`solve`], the orchestration entry point, and
//! [`GreedyDispatcher`], the default implementation of the
//! [`Solver`](dispatch_core::Solver) trait. A solve call fetches one distance
//! matrix for every worker depot and order location, then runs a fixed
//! pipeline of pure stages over it:
//!
//! 1. classify orders into reserved and normal buckets;
//! 2. spread reserved orders round-robin under a per-worker cap;
//! 3. greedily commit the cheapest eligible (worker, order) pair until none
//!    remain;
//! 4. sequence each worker's stops by nearest neighbour from the depot;
//! 5. walk each sequence to estimate arrival times.
//!
//! Only the matrix fetch can fail. Orders that cannot be placed are reported
//! in [`DispatchPlan::unassigned_orders`](dispatch_core::DispatchPlan).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod arrival;
mod classify;
mod greedy;
mod load;
mod locations;
mod reserved;
mod sequence;
mod solver;

pub use solver::{DispatchPolicy, GreedyDispatcher, solve, solve_with_policy};
