//! Visit plans produced by a solve call.
//!
//! A [`DispatchPlan`] maps each worker that received work to its ordered
//! [`Task`] list and reports the orders nobody could take. Per-worker
//! [`RouteSummary`] values aggregate the same walk the arrival times were
//! derived from.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// One stop in a worker's route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Task {
    /// Identifier of the order served at this stop.
    pub order_id: String,
    /// Zero-based position in the worker's route.
    pub sequence_index: usize,
    /// Estimated instant the worker reaches the stop.
    pub estimated_arrival_time: DateTime<Utc>,
    /// Travel time from the previous stop, or from the depot for the first.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub travel_time_from_previous_stop: Duration,
}

/// Aggregate figures for one worker's sequenced route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RouteSummary {
    /// Sum of every leg's travel time.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub total_travel_time: Duration,
    /// Sum of on-site service time.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub total_service_time: Duration,
    /// Sum of every leg's road distance in metres.
    pub total_distance_meters: f64,
    /// Instant the worker finishes the last stop's service.
    pub completion_time: DateTime<Utc>,
    /// Number of reserved-tier tasks in the route.
    pub reserved_tasks: usize,
    /// Whether travel plus service exceeds the worker's session length.
    ///
    /// The assignment throttle is applied before sequencing, so a route may
    /// legitimately run over.
    pub exceeds_session_budget: bool,
}

/// Facts about how a solve call ran.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Diagnostics {
    /// Wall-clock time spent inside the solver.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub solve_time: Duration,
    /// Number of locations in the fetched matrix (zero when skipped).
    pub matrix_size: usize,
    /// Number of orders committed by the greedy assignment loop.
    pub greedy_rounds: usize,
    /// Reserved orders left over once every worker reached the cap.
    pub reserved_overflow: usize,
}

/// The result of a successful solve call.
///
/// Every input order id appears exactly once: either inside one worker's
/// task list or in `unassigned_orders`.
///
/// # Examples
/// ```
/// use dispatch_core::DispatchPlan;
///
/// let plan = DispatchPlan::unassigned(["o1", "o2"]);
/// assert!(plan.assignments.is_empty());
/// assert_eq!(plan.unassigned_orders, vec!["o1".to_owned(), "o2".to_owned()]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DispatchPlan {
    /// Ordered tasks keyed by worker id; workers without tasks are absent.
    pub assignments: BTreeMap<String, Vec<Task>>,
    /// Orders nobody could take, in input order.
    pub unassigned_orders: Vec<String>,
    /// Route aggregates keyed by worker id.
    #[cfg_attr(feature = "serde", serde(default))]
    pub summaries: BTreeMap<String, RouteSummary>,
    /// Facts about the solve call.
    #[cfg_attr(feature = "serde", serde(default))]
    pub diagnostics: Diagnostics,
}

impl DispatchPlan {
    /// Build a plan in which every listed order is unassigned.
    pub fn unassigned<I, S>(order_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unassigned_orders: order_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Return the total number of assigned tasks across all workers.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.assignments.values().map(Vec::len).sum()
    }

    /// Iterate over every assigned order id.
    pub fn assigned_order_ids(&self) -> impl Iterator<Item = &str> {
        self.assignments
            .values()
            .flatten()
            .map(|task| task.order_id.as_str())
    }
}

#[cfg(feature = "serde")]
mod duration_secs {
    //! Serialise [`Duration`] values as fractional seconds.

    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
