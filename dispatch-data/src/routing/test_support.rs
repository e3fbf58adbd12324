//! Test utilities for routing providers.
//!
//! [`StubMatrixProvider`] is a deterministic test double for
//! [`DistanceMatrixProvider`] that returns pre-configured responses without
//! making HTTP requests.

use std::time::Duration;

use dispatch_core::{DistanceMatrix, DistanceMatrixProvider, MatrixError, VehicleProfile};
use geo::Coord;

/// Stub `DistanceMatrixProvider` for testing.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use dispatch_core::{DistanceMatrix, DistanceMatrixProvider, VehicleProfile};
/// use dispatch_data::routing::test_support::StubMatrixProvider;
/// use geo::Coord;
///
/// let matrix = DistanceMatrix::from_durations(vec![
///     vec![Duration::ZERO, Duration::from_secs(60)],
///     vec![Duration::from_secs(60), Duration::ZERO],
/// ])?;
/// let provider = StubMatrixProvider::with_matrix(matrix);
///
/// let locations = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];
/// let result = provider.get_distance_matrix(&locations, VehicleProfile::Driving);
/// assert!(result.is_ok());
/// # Ok::<(), dispatch_core::MatrixError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StubMatrixProvider {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Matrix(DistanceMatrix),
    Error(MatrixError),
}

impl StubMatrixProvider {
    /// Create a provider that returns the given matrix for any non-empty
    /// input, regardless of its size.
    #[must_use]
    pub const fn with_matrix(matrix: DistanceMatrix) -> Self {
        Self {
            response: StubResponse::Matrix(matrix),
        }
    }

    /// Create a provider that returns the given error for any non-empty
    /// input. Empty input still returns `MatrixError::EmptyInput`.
    #[must_use]
    pub const fn with_error(error: MatrixError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }

    /// Create a provider returning a unit matrix of the given size.
    ///
    /// Durations are zero on the diagonal and one second elsewhere;
    /// distances are zero on the diagonal and one metre elsewhere.
    #[must_use]
    pub fn with_unit_matrix(size: usize) -> Self {
        let durations = (0..size)
            .map(|i| (0..size).map(|j| unit_duration(i, j)).collect())
            .collect();
        let distances = (0..size)
            .map(|i| (0..size).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
            .collect();
        match DistanceMatrix::new(durations, distances) {
            Ok(matrix) => Self::with_matrix(matrix),
            Err(err) => Self::with_error(err),
        }
    }
}

fn unit_duration(i: usize, j: usize) -> Duration {
    if i == j {
        Duration::ZERO
    } else {
        Duration::from_secs(1)
    }
}

impl DistanceMatrixProvider for StubMatrixProvider {
    fn get_distance_matrix(
        &self,
        locations: &[Coord<f64>],
        _profile: VehicleProfile,
    ) -> Result<DistanceMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }

        match &self.response {
            StubResponse::Matrix(matrix) => Ok(matrix.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
