//! HTTP-based distance-matrix providers for routing services.
//!
//! This module provides [`OsrmMatrixProvider`], an implementation of
//! [`dispatch_core::DistanceMatrixProvider`] that fetches duration and
//! distance tables from an OSRM routing service.
//!
//! # Architecture
//!
//! The provider calls the OSRM Table API once per solve with every location
//! of the call. The synchronous [`DistanceMatrixProvider`] trait is
//! implemented by blocking on async HTTP calls internally, keeping the
//! solver embeddable in synchronous contexts.
//!
//! [`DistanceMatrixProvider`]: dispatch_core::DistanceMatrixProvider
//!
//! # Example
//!
//! ```no_run
//! use dispatch_core::{DistanceMatrixProvider, VehicleProfile};
//! use dispatch_data::routing::{OsrmMatrixProvider, OsrmMatrixProviderConfig};
//! use geo::Coord;
//! use std::time::Duration;
//!
//! let config = OsrmMatrixProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("dispatch-worker/1.0");
//! let provider = OsrmMatrixProvider::with_config(config)?;
//!
//! let locations = [Coord { x: 13.40, y: 52.52 }, Coord { x: 13.42, y: 52.50 }];
//! let matrix = provider.get_distance_matrix(&locations, VehicleProfile::Driving)?;
//! println!("Depot to first stop: {:?}", matrix.duration(0, 1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_USER_AGENT, OsrmMatrixProvider, OsrmMatrixProviderConfig, ProviderBuildError,
};
