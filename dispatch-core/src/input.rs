//! Caller-facing input shapes and their resolution into solve snapshots.
//!
//! A [`DispatchRequest`] mirrors the JSON a hosting service submits. Resolving
//! it against a service date validates every field and yields the immutable
//! [`DispatchSnapshot`] a [`crate::Solver`] consumes. Validation happens here
//! so that solving itself has a single failure mode.
//!
//! # Examples
//! ```
//! use chrono::NaiveDate;
//! use dispatch_core::{DispatchRequest, OrderInput, ShiftStart, WorkerInput};
//!
//! let request = DispatchRequest {
//!     vehicle_profile: Default::default(),
//!     workers: vec![WorkerInput {
//!         id: "w1".into(),
//!         lat: 52.52,
//!         lon: 13.40,
//!         shift_start: "08:00:00".parse::<ShiftStart>()?,
//!         max_session_hours: 8.0,
//!         capacity: 10,
//!         zone_ids: None,
//!         vehicle: None,
//!     }],
//!     orders: vec![OrderInput {
//!         id: "o1".into(),
//!         lat: 52.50,
//!         lon: 13.42,
//!         service_time_seconds: 120.0,
//!         priority_tier: 1,
//!         zone_id: None,
//!     }],
//! };
//! let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let snapshot = request.resolve(date)?;
//! assert_eq!(snapshot.workers()[0].max_session.as_secs(), 8 * 3600);
//! # Ok::<(), dispatch_core::InputError>(())
//! ```

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use geo::Coord;
use thiserror::Error;

use crate::{Order, VehicleProfile, Worker};

/// Seconds per hour, used to convert session lengths.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Errors raised while resolving a [`DispatchRequest`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A shift start was neither a timestamp nor a time of day.
    #[error("invalid shift start '{value}': expected RFC 3339, epoch milliseconds or HH:MM:SS")]
    InvalidShiftStart {
        /// Offending value.
        value: String,
    },
    /// A latitude or longitude was missing, non-finite or out of range.
    #[error("{kind} '{id}' has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinate {
        /// `"worker"` or `"order"`.
        kind: &'static str,
        /// Entity identifier.
        id: String,
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
    /// A session length was negative, non-finite or too large.
    #[error("worker '{worker_id}' has invalid maxSessionHours {hours}")]
    InvalidSessionHours {
        /// Worker identifier.
        worker_id: String,
        /// Supplied value.
        hours: f64,
    },
    /// A service time was negative, non-finite or too large.
    #[error("order '{order_id}' has invalid serviceTimeSeconds {seconds}")]
    InvalidServiceTime {
        /// Order identifier.
        order_id: String,
        /// Supplied value.
        seconds: f64,
    },
    /// Two workers share an identifier.
    #[error("duplicate worker id '{0}'")]
    DuplicateWorkerId(String),
    /// Two orders share an identifier.
    #[error("duplicate order id '{0}'")]
    DuplicateOrderId(String),
}

/// When a worker's shift begins.
///
/// A time of day is interpreted on the service date supplied at resolution,
/// in UTC.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use dispatch_core::ShiftStart;
///
/// let start: ShiftStart = "09:15:00".parse()?;
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// assert_eq!(start.resolve(date).to_rfc3339(), "2024-05-01T09:15:00+00:00");
/// # Ok::<(), dispatch_core::InputError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ShiftStartRepr", into = "String"))]
pub enum ShiftStart {
    /// An absolute instant.
    At(DateTime<Utc>),
    /// A wall-clock time on the service date.
    TimeOfDay(NaiveTime),
}

impl ShiftStart {
    /// Build a shift start from epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidShiftStart`] when the value is outside
    /// the representable range.
    pub fn from_epoch_millis(millis: i64) -> Result<Self, InputError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self::At)
            .ok_or_else(|| InputError::InvalidShiftStart {
                value: millis.to_string(),
            })
    }

    /// Resolve the shift start to an instant.
    #[must_use]
    pub fn resolve(self, service_date: NaiveDate) -> DateTime<Utc> {
        match self {
            Self::At(instant) => instant,
            Self::TimeOfDay(time) => service_date.and_time(time).and_utc(),
        }
    }
}

impl FromStr for ShiftStart {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::At(instant.with_timezone(&Utc)));
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map(Self::TimeOfDay)
            .map_err(|_| InputError::InvalidShiftStart {
                value: s.to_owned(),
            })
    }
}

impl std::fmt::Display for ShiftStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::At(instant) => f.write_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::TimeOfDay(time) => write!(f, "{}", time.format("%H:%M:%S")),
        }
    }
}

impl From<ShiftStart> for String {
    fn from(value: ShiftStart) -> Self {
        value.to_string()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ShiftStartRepr {
    Millis(i64),
    Text(String),
}

#[cfg(feature = "serde")]
impl TryFrom<ShiftStartRepr> for ShiftStart {
    type Error = InputError;

    fn try_from(repr: ShiftStartRepr) -> Result<Self, Self::Error> {
        match repr {
            ShiftStartRepr::Millis(millis) => Self::from_epoch_millis(millis),
            ShiftStartRepr::Text(text) => text.parse(),
        }
    }
}

/// A worker as submitted by the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WorkerInput {
    /// Worker identifier.
    pub id: String,
    /// Depot latitude.
    pub lat: f64,
    /// Depot longitude.
    pub lon: f64,
    /// Shift start as an instant or time of day.
    pub shift_start: ShiftStart,
    /// Session length in hours.
    pub max_session_hours: f64,
    /// Maximum number of stops.
    pub capacity: usize,
    /// Zones the worker may serve.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub zone_ids: Option<Vec<String>>,
    /// Vehicle the worker rides.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub vehicle: Option<VehicleProfile>,
}

impl WorkerInput {
    /// Validate the input and build a [`Worker`].
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for invalid coordinates or session length.
    pub fn resolve(&self, service_date: NaiveDate) -> Result<Worker, InputError> {
        let depot = coordinate("worker", &self.id, self.lat, self.lon)?;
        let max_session = session_length(self.max_session_hours).ok_or_else(|| {
            InputError::InvalidSessionHours {
                worker_id: self.id.clone(),
                hours: self.max_session_hours,
            }
        })?;
        let mut worker = Worker::new(
            self.id.clone(),
            depot,
            self.shift_start.resolve(service_date),
            max_session,
            self.capacity,
        );
        if let Some(zones) = &self.zone_ids {
            worker = worker.with_zones(zones.iter().cloned());
        }
        worker.vehicle = self.vehicle;
        Ok(worker)
    }
}

/// An order as submitted by the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OrderInput {
    /// Order identifier.
    pub id: String,
    /// Delivery latitude.
    pub lat: f64,
    /// Delivery longitude.
    pub lon: f64,
    /// On-site service time in seconds.
    pub service_time_seconds: f64,
    /// Priority tier; `0` is reserved.
    pub priority_tier: i32,
    /// Zone the delivery belongs to.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub zone_id: Option<String>,
}

impl OrderInput {
    /// Validate the input and build an [`Order`].
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for invalid coordinates or service time.
    pub fn resolve(&self) -> Result<Order, InputError> {
        let location = coordinate("order", &self.id, self.lat, self.lon)?;
        let service = Duration::try_from_secs_f64(self.service_time_seconds).map_err(|_| {
            InputError::InvalidServiceTime {
                order_id: self.id.clone(),
                seconds: self.service_time_seconds,
            }
        })?;
        let mut order = Order::new(self.id.clone(), location, service, self.priority_tier);
        order.zone_id.clone_from(&self.zone_id);
        Ok(order)
    }
}

/// A complete solve request as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DispatchRequest {
    /// Profile used for the distance matrix.
    #[cfg_attr(feature = "serde", serde(default))]
    pub vehicle_profile: VehicleProfile,
    /// Available workers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub workers: Vec<WorkerInput>,
    /// Pending orders.
    #[cfg_attr(feature = "serde", serde(default))]
    pub orders: Vec<OrderInput>,
}

impl DispatchRequest {
    /// Validate every entry and build the immutable solve snapshot.
    ///
    /// Entry order is preserved; it drives every tie-break in the solver.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] encountered.
    pub fn resolve(&self, service_date: NaiveDate) -> Result<DispatchSnapshot, InputError> {
        let workers = self
            .workers
            .iter()
            .map(|input| input.resolve(service_date))
            .collect::<Result<Vec<_>, _>>()?;
        let orders = self
            .orders
            .iter()
            .map(OrderInput::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        DispatchSnapshot::new(self.vehicle_profile, workers, orders)
    }
}

/// The immutable inputs of one solve call.
///
/// Worker ids and order ids are unique within a snapshot; the only way to
/// build one is through [`DispatchSnapshot::new`] or
/// [`DispatchRequest::resolve`], which both enforce it.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSnapshot {
    vehicle_profile: VehicleProfile,
    workers: Vec<Worker>,
    orders: Vec<Order>,
}

impl DispatchSnapshot {
    /// Assemble a snapshot from already-resolved workers and orders.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::DuplicateWorkerId`] or
    /// [`InputError::DuplicateOrderId`] for the first repeated id.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use dispatch_core::{DispatchSnapshot, InputError, Order, VehicleProfile};
    /// use geo::Coord;
    ///
    /// let order = Order::new("o1", Coord { x: 0.0, y: 0.0 }, Duration::from_secs(60), 1);
    /// let err = DispatchSnapshot::new(VehicleProfile::Driving, Vec::new(), vec![order.clone(), order])
    ///     .unwrap_err();
    /// assert_eq!(err, InputError::DuplicateOrderId("o1".into()));
    /// ```
    pub fn new(
        vehicle_profile: VehicleProfile,
        workers: Vec<Worker>,
        orders: Vec<Order>,
    ) -> Result<Self, InputError> {
        let mut worker_ids = HashSet::with_capacity(workers.len());
        if let Some(repeat) = workers.iter().find(|worker| !worker_ids.insert(worker.id.as_str())) {
            return Err(InputError::DuplicateWorkerId(repeat.id.clone()));
        }
        let mut order_ids = HashSet::with_capacity(orders.len());
        if let Some(repeat) = orders.iter().find(|order| !order_ids.insert(order.id.as_str())) {
            return Err(InputError::DuplicateOrderId(repeat.id.clone()));
        }
        Ok(Self {
            vehicle_profile,
            workers,
            orders,
        })
    }

    /// Profile used for the distance matrix.
    #[must_use]
    pub const fn vehicle_profile(&self) -> VehicleProfile {
        self.vehicle_profile
    }

    /// Workers in caller order.
    #[must_use]
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Orders in caller order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}

fn coordinate(kind: &'static str, id: &str, lat: f64, lon: f64) -> Result<Coord<f64>, InputError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(Coord { x: lon, y: lat })
    } else {
        Err(InputError::InvalidCoordinate {
            kind,
            id: id.to_owned(),
            lat,
            lon,
        })
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "session hours arrive as fractional values"
)]
fn session_length(hours: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(hours * SECONDS_PER_HOUR).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn service_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
    }

    fn worker_input(id: &str) -> WorkerInput {
        WorkerInput {
            id: id.to_owned(),
            lat: 52.52,
            lon: 13.40,
            shift_start: ShiftStart::TimeOfDay(
                NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
            ),
            max_session_hours: 1.5,
            capacity: 4,
            zone_ids: None,
            vehicle: None,
        }
    }

    fn order_input(id: &str) -> OrderInput {
        OrderInput {
            id: id.to_owned(),
            lat: 52.50,
            lon: 13.42,
            service_time_seconds: 90.5,
            priority_tier: 2,
            zone_id: Some("zoneA".to_owned()),
        }
    }

    #[rstest]
    #[case("08:30:00", 8, 30)]
    #[case("17:05", 17, 5)]
    fn time_of_day_resolves_on_service_date(
        service_date: NaiveDate,
        #[case] raw: &str,
        #[case] hour: u32,
        #[case] minute: u32,
    ) {
        let start: ShiftStart = raw.parse().expect("time of day parses");
        let expected = Utc
            .with_ymd_and_hms(2024, 5, 1, hour, minute, 0)
            .single()
            .expect("valid instant");
        assert_eq!(start.resolve(service_date), expected);
    }

    #[rstest]
    fn rfc3339_start_ignores_service_date(service_date: NaiveDate) {
        let start: ShiftStart = "2024-06-02T10:00:00+02:00".parse().expect("timestamp parses");
        let expected = Utc
            .with_ymd_and_hms(2024, 6, 2, 8, 0, 0)
            .single()
            .expect("valid instant");
        assert_eq!(start.resolve(service_date), expected);
    }

    #[rstest]
    #[case("tomorrow morning")]
    #[case("25:00:00")]
    #[case("")]
    fn rejects_unparseable_shift_start(#[case] raw: &str) {
        let err = raw.parse::<ShiftStart>().expect_err("should fail");
        assert!(matches!(err, InputError::InvalidShiftStart { .. }));
    }

    #[rstest]
    fn resolves_worker_and_order_fields(service_date: NaiveDate) {
        let mut worker = worker_input("w1");
        worker.zone_ids = Some(vec!["zoneA".to_owned()]);
        let request = DispatchRequest {
            vehicle_profile: VehicleProfile::Cycling,
            workers: vec![worker],
            orders: vec![order_input("o1")],
        };

        let snapshot = request.resolve(service_date).expect("request resolves");

        let worker = snapshot.workers().first().expect("one worker");
        assert_eq!(worker.max_session, Duration::from_secs(5400));
        assert_eq!(worker.depot, Coord { x: 13.40, y: 52.52 });
        assert!(worker.serves_zone(Some("zoneA")));
        assert!(!worker.serves_zone(Some("zoneB")));
        let order = snapshot.orders().first().expect("one order");
        assert_eq!(order.service_duration, Duration::from_millis(90_500));
        assert_eq!(order.zone_id.as_deref(), Some("zoneA"));
        assert_eq!(snapshot.vehicle_profile(), VehicleProfile::Cycling);
    }

    #[rstest]
    fn empty_zone_list_is_unrestricted(service_date: NaiveDate) {
        let mut input = worker_input("w1");
        input.zone_ids = Some(Vec::new());
        let worker = input.resolve(service_date).expect("worker resolves");
        assert!(worker.serves_zone(Some("anything")));
    }

    #[rstest]
    fn rejects_duplicate_order_ids(service_date: NaiveDate) {
        let request = DispatchRequest {
            vehicle_profile: VehicleProfile::Driving,
            workers: vec![worker_input("w1")],
            orders: vec![order_input("o1"), order_input("o1")],
        };
        let err = request.resolve(service_date).expect_err("duplicate ids");
        assert_eq!(err, InputError::DuplicateOrderId("o1".to_owned()));
    }

    #[rstest]
    fn rejects_duplicate_worker_ids(service_date: NaiveDate) {
        let request = DispatchRequest {
            vehicle_profile: VehicleProfile::Driving,
            workers: vec![worker_input("w1"), worker_input("w1")],
            orders: Vec::new(),
        };
        let err = request.resolve(service_date).expect_err("duplicate ids");
        assert_eq!(err, InputError::DuplicateWorkerId("w1".to_owned()));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_session_hours(service_date: NaiveDate, #[case] hours: f64) {
        let mut input = worker_input("w1");
        input.max_session_hours = hours;
        let err = input.resolve(service_date).expect_err("invalid hours");
        assert!(matches!(err, InputError::InvalidSessionHours { .. }));
    }

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(0.0, -181.0)]
    #[case(f64::NAN, 0.0)]
    fn rejects_invalid_order_coordinates(#[case] lat: f64, #[case] lon: f64) {
        let mut input = order_input("o1");
        input.lat = lat;
        input.lon = lon;
        let err = input.resolve().expect_err("invalid coordinates");
        assert!(matches!(err, InputError::InvalidCoordinate { kind: "order", .. }));
    }

    #[rstest]
    fn rejects_negative_service_time() {
        let mut input = order_input("o1");
        input.service_time_seconds = -5.0;
        let err = input.resolve().expect_err("negative service time");
        assert!(matches!(err, InputError::InvalidServiceTime { .. }));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn decodes_camel_case_request(service_date: NaiveDate) {
        let json = r#"{
            "vehicleProfile": "bike",
            "workers": [
                {"id": "w1", "lat": 52.5, "lon": 13.4, "shiftStart": "08:00:00",
                 "maxSessionHours": 8, "capacity": 10, "zoneIds": ["zoneA"]},
                {"id": "w2", "lat": 52.6, "lon": 13.5, "shiftStart": 1714550400000,
                 "maxSessionHours": 4, "capacity": 5, "vehicle": "car"}
            ],
            "orders": [
                {"id": "o1", "lat": 52.51, "lon": 13.41, "serviceTimeSeconds": 120,
                 "priorityTier": 0, "zoneId": "zoneA"}
            ]
        }"#;

        let request: DispatchRequest = serde_json::from_str(json).expect("request decodes");
        let snapshot = request.resolve(service_date).expect("request resolves");

        assert_eq!(snapshot.vehicle_profile(), VehicleProfile::Cycling);
        let second = snapshot.workers().get(1).expect("second worker");
        assert_eq!(
            second.shift_start,
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).single().expect("valid instant")
        );
        assert_eq!(second.vehicle, Some(VehicleProfile::Driving));
        let order = snapshot.orders().first().expect("one order");
        assert!(order.is_reserved());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn rejects_invalid_shift_start_in_json() {
        let json = r#"{"id": "w1", "lat": 0, "lon": 0, "shiftStart": "noon",
                       "maxSessionHours": 1, "capacity": 1}"#;
        let err = serde_json::from_str::<WorkerInput>(json).expect_err("should fail");
        assert!(err.to_string().contains("invalid shift start"));
    }
}
