//! Arrival-time propagation along a sequenced route.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dispatch_core::{DistanceMatrix, Order, RouteSummary, Task, Worker};
use log::warn;

use crate::locations::LocationTable;

/// Tasks and aggregates for one worker's route.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TimedRoute {
    pub(crate) tasks: Vec<Task>,
    pub(crate) summary: RouteSummary,
}

/// Walk `route` from the worker's depot, accumulating travel and service.
///
/// Each arrival is the previous departure plus the leg's travel time, and
/// each departure is the arrival plus the order's service time. Instants
/// saturate at [`DateTime::<Utc>::MAX_UTC`] so arrivals never decrease.
pub(crate) fn estimate_arrivals(
    worker: &Worker,
    depot: usize,
    route: &[usize],
    orders: &[Order],
    table: &LocationTable,
    matrix: &DistanceMatrix,
) -> TimedRoute {
    let mut clock = worker.shift_start;
    let mut position = depot;
    let mut tasks = Vec::with_capacity(route.len());
    let mut total_travel = Duration::ZERO;
    let mut total_service = Duration::ZERO;
    let mut total_distance = 0.0_f64;
    let mut reserved_tasks = 0_usize;

    for (sequence_index, (stop, order)) in route
        .iter()
        .filter_map(|&idx| orders.get(idx).map(|order| (table.stop(idx), order)))
        .enumerate()
    {
        let travel = matrix.duration(position, stop);
        let arrival = advance(clock, travel);
        tasks.push(Task {
            order_id: order.id.clone(),
            sequence_index,
            estimated_arrival_time: arrival,
            travel_time_from_previous_stop: travel,
        });

        total_travel = total_travel.saturating_add(travel);
        total_service = total_service.saturating_add(order.service_duration);
        total_distance = add_distance(total_distance, matrix.distance(position, stop));
        if order.is_reserved() {
            reserved_tasks = reserved_tasks.saturating_add(1);
        }
        clock = advance(arrival, order.service_duration);
        position = stop;
    }

    let exceeds_session_budget = total_travel.saturating_add(total_service) > worker.max_session;
    if exceeds_session_budget {
        warn!(
            "route for worker {} runs {:?} against a session of {:?}",
            worker.id,
            total_travel.saturating_add(total_service),
            worker.max_session
        );
    }

    TimedRoute {
        tasks,
        summary: RouteSummary {
            total_travel_time: total_travel,
            total_service_time: total_service,
            total_distance_meters: total_distance,
            completion_time: clock,
            reserved_tasks,
            exceeds_session_budget,
        },
    }
}

fn advance(instant: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(by)
        .ok()
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[expect(
    clippy::float_arithmetic,
    reason = "road distances are fractional metres"
)]
fn add_distance(total: f64, leg: f64) -> f64 {
    total + leg
}
