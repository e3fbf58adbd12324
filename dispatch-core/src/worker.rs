use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geo::Coord;

use crate::VehicleProfile;

/// A courier available for assignment during one solve call.
///
/// The depot is the worker's starting position for the call, typically the
/// courier's current location. An empty `zone_ids` set places no restriction
/// on which orders the worker may serve.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use chrono::{TimeZone, Utc};
/// use geo::Coord;
/// use dispatch_core::Worker;
///
/// let worker = Worker::new(
///     "w1",
///     Coord { x: 13.40, y: 52.52 },
///     Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
///     Duration::from_secs(8 * 3600),
///     10,
/// )
/// .with_zones(["zoneA"]);
///
/// assert!(worker.serves_zone(Some("zoneA")));
/// assert!(!worker.serves_zone(Some("zoneB")));
/// assert!(worker.serves_zone(None));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    /// Caller-assigned identifier.
    pub id: String,
    /// Starting position for this call.
    pub depot: Coord<f64>,
    /// Instant the worker starts their shift.
    pub shift_start: DateTime<Utc>,
    /// Maximum length of the working session.
    pub max_session: Duration,
    /// Maximum number of stops the worker may receive.
    pub capacity: usize,
    /// Zones the worker is eligible for; empty means unrestricted.
    pub zone_ids: BTreeSet<String>,
    /// Declared vehicle, if any.
    pub vehicle: Option<VehicleProfile>,
}

impl Worker {
    /// Construct an unrestricted worker without a declared vehicle.
    pub fn new(
        id: impl Into<String>,
        depot: Coord<f64>,
        shift_start: DateTime<Utc>,
        max_session: Duration,
        capacity: usize,
    ) -> Self {
        Self {
            id: id.into(),
            depot,
            shift_start,
            max_session,
            capacity,
            zone_ids: BTreeSet::new(),
            vehicle: None,
        }
    }

    /// Restrict the worker to the given zones.
    #[must_use]
    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zone_ids = zones.into_iter().map(Into::into).collect();
        self
    }

    /// Record the worker's vehicle.
    #[must_use]
    pub const fn with_vehicle(mut self, vehicle: VehicleProfile) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    /// Return whether an order declaring `zone` may be given to this worker.
    ///
    /// Orders without a zone are acceptable to every worker.
    #[must_use]
    pub fn serves_zone(&self, zone: Option<&str>) -> bool {
        match zone {
            Some(zone) if !self.zone_ids.is_empty() => self.zone_ids.contains(zone),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn worker() -> Worker {
        let start = Utc
            .with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
            .single()
            .expect("valid instant");
        Worker::new(
            "w1",
            Coord { x: 0.0, y: 0.0 },
            start,
            Duration::from_secs(3600),
            5,
        )
    }

    #[rstest]
    #[case(None)]
    #[case(Some("anywhere"))]
    fn unrestricted_worker_serves_every_zone(worker: Worker, #[case] zone: Option<&str>) {
        assert!(worker.serves_zone(zone));
    }

    #[rstest]
    #[case(Some("zoneA"), true)]
    #[case(Some("zoneB"), false)]
    #[case(None, true)]
    fn zoned_worker_filters_declared_zones(
        worker: Worker,
        #[case] zone: Option<&str>,
        #[case] expected: bool,
    ) {
        let zoned = worker.with_zones(["zoneA"]);
        assert_eq!(zoned.serves_zone(zone), expected);
    }
}
