//! Deterministic providers and fixtures used by unit and behaviour tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use geo::Coord;

use crate::{DistanceMatrix, DistanceMatrixProvider, MatrixError, Order, VehicleProfile, Worker};

/// `DistanceMatrixProvider` returning the same cost for every off-diagonal
/// pair.
///
/// The default uses one-second legs and a distance of one metre.
#[derive(Debug, Copy, Clone)]
pub struct UniformMatrixProvider {
    leg: Duration,
    metres: f64,
}

impl UniformMatrixProvider {
    /// Create a provider returning `leg` and `metres` for every pair of
    /// distinct locations.
    #[must_use]
    pub const fn new(leg: Duration, metres: f64) -> Self {
        Self { leg, metres }
    }
}

impl Default for UniformMatrixProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 1.0)
    }
}

impl DistanceMatrixProvider for UniformMatrixProvider {
    fn get_distance_matrix(
        &self,
        locations: &[Coord<f64>],
        _profile: VehicleProfile,
    ) -> Result<DistanceMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        let n = locations.len();
        let durations = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { Duration::ZERO } else { self.leg })
                    .collect()
            })
            .collect();
        let distances = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { self.metres }).collect())
            .collect();
        DistanceMatrix::new(durations, distances)
    }
}

/// Provider that always fails with the configured error.
#[derive(Debug, Clone)]
pub struct FailingMatrixProvider(pub MatrixError);

impl DistanceMatrixProvider for FailingMatrixProvider {
    fn get_distance_matrix(
        &self,
        _locations: &[Coord<f64>],
        _profile: VehicleProfile,
    ) -> Result<DistanceMatrix, MatrixError> {
        Err(self.0.clone())
    }
}

/// A [`DistanceMatrixProvider`] returning a fixed, pre-defined matrix.
///
/// The matrix must match the number of locations requested; dimension
/// mismatches produce [`MatrixError::DimensionMismatch`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use geo::Coord;
/// use dispatch_core::{DistanceMatrixProvider, VehicleProfile};
/// use dispatch_core::test_support::FixedMatrixProvider;
///
/// let provider = FixedMatrixProvider::from_seconds(vec![
///     vec![0, 30],
///     vec![45, 0],
/// ]);
/// let locations = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }];
/// let matrix = provider.get_distance_matrix(&locations, VehicleProfile::Driving)?;
/// assert_eq!(matrix.duration(1, 0), Duration::from_secs(45));
/// # Ok::<(), dispatch_core::MatrixError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FixedMatrixProvider {
    durations: Vec<Vec<Duration>>,
    distances: Option<Vec<Vec<f64>>>,
}

impl FixedMatrixProvider {
    /// Build from integer seconds; distances are reported as zero.
    #[must_use]
    pub fn from_seconds(seconds: Vec<Vec<u64>>) -> Self {
        let durations = seconds
            .into_iter()
            .map(|row| row.into_iter().map(Duration::from_secs).collect())
            .collect();
        Self {
            durations,
            distances: None,
        }
    }

    /// Build from a pre-built duration table; distances are reported as zero.
    #[must_use]
    pub const fn from_durations(durations: Vec<Vec<Duration>>) -> Self {
        Self {
            durations,
            distances: None,
        }
    }

    /// Attach a distance table in metres.
    #[must_use]
    pub fn with_distances(mut self, distances: Vec<Vec<f64>>) -> Self {
        self.distances = Some(distances);
        self
    }
}

impl DistanceMatrixProvider for FixedMatrixProvider {
    fn get_distance_matrix(
        &self,
        locations: &[Coord<f64>],
        _profile: VehicleProfile,
    ) -> Result<DistanceMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        let matrix = match &self.distances {
            Some(distances) => DistanceMatrix::new(self.durations.clone(), distances.clone())?,
            None => DistanceMatrix::from_durations(self.durations.clone())?,
        };
        matrix.ensure_len(locations.len())?;
        Ok(matrix)
    }
}

/// Wrap a provider and record how it was called.
#[derive(Debug, Default)]
pub struct RecordingProvider<P> {
    inner: P,
    calls: AtomicUsize,
    last_len: AtomicUsize,
    last_profile: Mutex<Option<VehicleProfile>>,
}

impl<P> RecordingProvider<P> {
    /// Wrap `inner`.
    pub const fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            last_len: AtomicUsize::new(0),
            last_profile: Mutex::new(None),
        }
    }

    /// Number of matrix requests made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of locations in the most recent request.
    #[must_use]
    pub fn last_request_len(&self) -> usize {
        self.last_len.load(Ordering::SeqCst)
    }

    /// Profile of the most recent request, if any.
    #[must_use]
    pub fn last_profile(&self) -> Option<VehicleProfile> {
        self.last_profile.lock().ok().and_then(|guard| *guard)
    }
}

impl<P: DistanceMatrixProvider> DistanceMatrixProvider for RecordingProvider<P> {
    fn get_distance_matrix(
        &self,
        locations: &[Coord<f64>],
        profile: VehicleProfile,
    ) -> Result<DistanceMatrix, MatrixError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_len.store(locations.len(), Ordering::SeqCst);
        if let Ok(mut guard) = self.last_profile.lock() {
            *guard = Some(profile);
        }
        self.inner.get_distance_matrix(locations, profile)
    }
}

/// Fixed shift start shared by fixtures: 2024-05-01 08:00 UTC.
#[must_use]
pub fn shift_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Unrestricted worker at the origin with an eight-hour session.
#[must_use]
pub fn worker(id: &str, capacity: usize) -> Worker {
    Worker::new(
        id,
        Coord { x: 0.0, y: 0.0 },
        shift_start(),
        Duration::from_secs(8 * 3600),
        capacity,
    )
}

/// Order at the origin with the given service time and tier.
#[must_use]
pub fn order(id: &str, service_secs: u64, tier: i32) -> Order {
    Order::new(
        id,
        Coord { x: 0.0, y: 0.0 },
        Duration::from_secs(service_secs),
        tier,
    )
}
