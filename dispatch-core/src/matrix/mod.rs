//! Pairwise travel costs between the locations of one solve call.
//!
//! The [`DistanceMatrixProvider`] trait abstracts the external routing
//! oracle. Callers supply an ordered slice of coordinates and receive a
//! [`DistanceMatrix`] holding both durations and road distances, where
//! `[i][j]` is the cost of travelling from location `i` to location `j`.
//!
//! Every provider failure is reported as a [`MatrixError`]; the solver never
//! retries and never substitutes estimated costs.

mod error;
mod provider;

pub use error::MatrixError;
pub use provider::{DistanceMatrix, DistanceMatrixProvider};
