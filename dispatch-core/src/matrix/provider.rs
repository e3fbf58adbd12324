//! Distance-matrix value type and the provider trait for routing oracles.

use std::time::Duration;

use geo::Coord;

use crate::VehicleProfile;

use super::error::MatrixError;

/// Square tables of travel durations and road distances.
///
/// Unreachable pairs hold [`Duration::MAX`] and an infinite distance. Lookups
/// outside the table behave as unreachable rather than panicking.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use dispatch_core::DistanceMatrix;
///
/// let matrix = DistanceMatrix::new(
///     vec![
///         vec![Duration::ZERO, Duration::from_secs(60)],
///         vec![Duration::from_secs(75), Duration::ZERO],
///     ],
///     vec![vec![0.0, 500.0], vec![620.0, 0.0]],
/// )?;
/// assert_eq!(matrix.len(), 2);
/// assert_eq!(matrix.duration(1, 0), Duration::from_secs(75));
/// assert_eq!(matrix.duration(5, 0), Duration::MAX);
/// # Ok::<(), dispatch_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    durations: Vec<Vec<Duration>>,
    distances: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Validate and construct a matrix from duration and distance tables.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] when either table is not
    /// square or the tables differ in size.
    pub fn new(
        durations: Vec<Vec<Duration>>,
        distances: Vec<Vec<f64>>,
    ) -> Result<Self, MatrixError> {
        let size = durations.len();
        ensure_square(&durations, size, "durations")?;
        ensure_square(&distances, size, "distances")?;
        Ok(Self {
            durations,
            distances,
        })
    }

    /// Construct a matrix from durations alone, recording zero distances.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] when the table is not square.
    pub fn from_durations(durations: Vec<Vec<Duration>>) -> Result<Self, MatrixError> {
        let size = durations.len();
        Self::new(durations, vec![vec![0.0; size]; size])
    }

    /// Number of locations covered by the matrix.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.durations.len()
    }

    /// Return whether the matrix covers no locations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Travel duration from location `from` to location `to`.
    #[must_use]
    pub fn duration(&self, from: usize, to: usize) -> Duration {
        self.durations
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(Duration::MAX)
    }

    /// Road distance in metres from location `from` to location `to`.
    #[must_use]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Return whether the pair has a finite route.
    #[must_use]
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.duration(from, to) != Duration::MAX
    }

    /// Check the matrix covers exactly `expected` locations.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] when the sizes differ.
    pub fn ensure_len(&self, expected: usize) -> Result<(), MatrixError> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(MatrixError::DimensionMismatch {
                expected,
                detail: format!("matrix covers {} locations", self.len()),
            })
        }
    }
}

fn ensure_square<T>(rows: &[Vec<T>], size: usize, table: &str) -> Result<(), MatrixError> {
    if rows.len() != size {
        return Err(MatrixError::DimensionMismatch {
            expected: size,
            detail: format!("{table} has {} rows", rows.len()),
        });
    }
    match rows.iter().position(|row| row.len() != size) {
        Some(row_idx) => Err(MatrixError::DimensionMismatch {
            expected: size,
            detail: format!("{table} row {row_idx} is not square"),
        }),
        None => Ok(()),
    }
}

/// Fetch pairwise travel costs for an ordered list of locations.
///
/// Implementers must return a matrix covering exactly `locations.len()`
/// entries, where index `i` corresponds to `locations[i]`. Any transport
/// failure, timeout or non-success response is reported as an error; partial
/// or estimated matrices must never be returned.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use geo::Coord;
/// use dispatch_core::{DistanceMatrix, DistanceMatrixProvider, MatrixError, VehicleProfile};
///
/// struct FlatProvider;
///
/// impl DistanceMatrixProvider for FlatProvider {
///     fn get_distance_matrix(
///         &self,
///         locations: &[Coord<f64>],
///         _profile: VehicleProfile,
///     ) -> Result<DistanceMatrix, MatrixError> {
///         if locations.is_empty() {
///             return Err(MatrixError::EmptyInput);
///         }
///         let n = locations.len();
///         DistanceMatrix::from_durations(vec![vec![Duration::from_secs(60); n]; n])
///     }
/// }
///
/// let matrix = FlatProvider.get_distance_matrix(
///     &[Coord { x: 0.0, y: 0.0 }],
///     VehicleProfile::Driving,
/// )?;
/// assert_eq!(matrix.len(), 1);
/// # Ok::<(), MatrixError>(())
/// ```
pub trait DistanceMatrixProvider {
    /// Return durations and distances between every pair of `locations`.
    ///
    /// Implementations must return `Err(MatrixError::EmptyInput)` when
    /// `locations` is empty.
    fn get_distance_matrix(
        &self,
        locations: &[Coord<f64>],
        profile: VehicleProfile,
    ) -> Result<DistanceMatrix, MatrixError>;
}
