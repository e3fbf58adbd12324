//! Solve orchestration and the [`GreedyDispatcher`] solver.
//!
//! A call moves through a fixed sequence of stages. Only the matrix fetch
//! can fail; every later stage is total over its inputs.

use std::fmt;
use std::time::{Duration, Instant};

use dispatch_core::{
    Diagnostics, DispatchPlan, DispatchSnapshot, DistanceMatrix, DistanceMatrixProvider,
    SolveError, Solver,
};
use log::{debug, info};

use crate::arrival::estimate_arrivals;
use crate::classify::classify;
use crate::greedy::assign_normal;
use crate::load::WorkerLoad;
use crate::locations::LocationTable;
use crate::reserved::{AllocationContext, allocate_reserved};
use crate::sequence::nearest_neighbour;

/// Tunables for one solve call.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use dispatch_solver::DispatchPolicy;
///
/// let policy = DispatchPolicy::default();
/// assert_eq!(policy.reserved_cap, 3);
/// assert_eq!(policy.session_threshold(Duration::from_secs(1000)), Duration::from_secs(900));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Maximum reserved orders per worker.
    pub reserved_cap: usize,
    /// Share of the session, in percent, a worker may fill before normal
    /// assignment stops offering it orders.
    pub session_threshold_percent: u32,
    /// Surcharge per already-assigned stop in the greedy cost.
    pub workload_penalty: Duration,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            reserved_cap: 3,
            session_threshold_percent: 90,
            workload_penalty: Duration::from_secs(60),
        }
    }
}

impl DispatchPolicy {
    /// Committed duration at which a worker stops receiving normal orders.
    #[must_use]
    pub fn session_threshold(&self, max_session: Duration) -> Duration {
        max_session
            .checked_mul(self.session_threshold_percent)
            .map_or(Duration::MAX, |scaled| scaled / 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    MatrixFetching,
    Classifying,
    ReservedAllocating,
    NormalAssigning,
    Sequencing,
    TimeEstimating,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MatrixFetching => "matrix-fetching",
            Self::Classifying => "classifying",
            Self::ReservedAllocating => "reserved-allocating",
            Self::NormalAssigning => "normal-assigning",
            Self::Sequencing => "sequencing",
            Self::TimeEstimating => "time-estimating",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Assign `snapshot`'s orders to its workers using the default policy.
///
/// # Errors
///
/// Returns [`SolveError::MatrixUnavailable`] when the provider fails or
/// returns a matrix that does not cover every location. No partial plan is
/// produced.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use chrono::{TimeZone, Utc};
/// use dispatch_core::test_support::FixedMatrixProvider;
/// use dispatch_core::{DispatchSnapshot, Order, VehicleProfile, Worker};
/// use geo::Coord;
///
/// let snapshot = DispatchSnapshot::new(
///     VehicleProfile::Driving,
///     vec![Worker::new(
///         "w1",
///         Coord { x: 0.0, y: 0.0 },
///         Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
///         Duration::from_secs(8 * 3600),
///         10,
///     )],
///     vec![Order::new("o1", Coord { x: 0.01, y: 0.0 }, Duration::from_secs(60), 1)],
/// )
/// .unwrap();
/// let provider = FixedMatrixProvider::from_seconds(vec![vec![0, 120], vec![120, 0]]);
///
/// let plan = dispatch_solver::solve(&snapshot, &provider)?;
/// assert_eq!(plan.assignments["w1"][0].order_id, "o1");
/// assert!(plan.unassigned_orders.is_empty());
/// # Ok::<(), dispatch_core::SolveError>(())
/// ```
pub fn solve<P>(snapshot: &DispatchSnapshot, provider: &P) -> Result<DispatchPlan, SolveError>
where
    P: DistanceMatrixProvider + ?Sized,
{
    solve_with_policy(snapshot, provider, &DispatchPolicy::default())
}

/// Assign `snapshot`'s orders to its workers under an explicit policy.
///
/// # Errors
///
/// Returns [`SolveError::MatrixUnavailable`] when the provider fails or
/// returns a matrix that does not cover every location.
pub fn solve_with_policy<P>(
    snapshot: &DispatchSnapshot,
    provider: &P,
    policy: &DispatchPolicy,
) -> Result<DispatchPlan, SolveError>
where
    P: DistanceMatrixProvider + ?Sized,
{
    let started_at = Instant::now();
    let workers = snapshot.workers();
    let orders = snapshot.orders();

    if workers.is_empty() || orders.is_empty() {
        let mut plan = DispatchPlan::unassigned(orders.iter().map(|order| order.id.clone()));
        plan.diagnostics.solve_time = started_at.elapsed();
        info!(
            "dispatch skipped matrix fetch: {} workers, {} orders unassigned",
            workers.len(),
            plan.unassigned_orders.len()
        );
        return Ok(plan);
    }

    let table = LocationTable::new(workers, orders);
    enter(Stage::MatrixFetching, format_args!("{} locations", table.len()));
    let matrix = fetch_matrix(provider, snapshot, &table)?;

    enter(Stage::Classifying, format_args!("{} orders", orders.len()));
    let buckets = classify(orders);

    let ctx = AllocationContext {
        workers,
        orders,
        table: &table,
        matrix: &matrix,
        policy,
    };
    let mut loads = vec![WorkerLoad::default(); workers.len()];

    enter(
        Stage::ReservedAllocating,
        format_args!("{} reserved orders", buckets.reserved.len()),
    );
    let reserved = allocate_reserved(&ctx, &buckets.reserved, &mut loads);

    enter(
        Stage::NormalAssigning,
        format_args!("{} normal orders", buckets.normal.len()),
    );
    let greedy = assign_normal(&ctx, &buckets.normal, &mut loads);
    debug!(
        "placement left {} reserved outside every worker's zones, {} reserved over the cap, {} normal without an eligible worker",
        reserved.skipped.len(),
        reserved.overflow.len(),
        greedy.unassigned.len()
    );

    enter(Stage::Sequencing, format_args!("{} workers", workers.len()));
    let routes: Vec<(usize, Vec<usize>)> = loads
        .iter()
        .enumerate()
        .filter(|(_, load)| load.task_count() > 0)
        .map(|(worker_idx, load)| {
            let depot = table.depot(worker_idx);
            (worker_idx, nearest_neighbour(&matrix, &table, depot, load.orders()))
        })
        .collect();

    enter(Stage::TimeEstimating, format_args!("{} routes", routes.len()));
    let mut plan = DispatchPlan::default();
    let mut assigned = vec![false; orders.len()];
    for (worker_idx, route) in &routes {
        let Some(worker) = workers.get(*worker_idx) else {
            continue;
        };
        for &order_idx in route {
            if let Some(flag) = assigned.get_mut(order_idx) {
                *flag = true;
            }
        }
        let timed = estimate_arrivals(
            worker,
            table.depot(*worker_idx),
            route,
            orders,
            &table,
            &matrix,
        );
        plan.assignments.insert(worker.id.clone(), timed.tasks);
        plan.summaries.insert(worker.id.clone(), timed.summary);
    }

    plan.unassigned_orders = orders
        .iter()
        .zip(&assigned)
        .filter(|(_, is_assigned)| !**is_assigned)
        .map(|(order, _)| order.id.clone())
        .collect();
    plan.diagnostics = Diagnostics {
        solve_time: started_at.elapsed(),
        matrix_size: matrix.len(),
        greedy_rounds: greedy.rounds,
        reserved_overflow: reserved.overflow.len(),
    };

    enter(Stage::Done, format_args!("{} tasks", plan.assigned_count()));
    info!(
        "dispatched {} orders to {} workers, {} unassigned, in {:?}",
        plan.assigned_count(),
        plan.assignments.len(),
        plan.unassigned_orders.len(),
        plan.diagnostics.solve_time
    );
    Ok(plan)
}

fn enter(stage: Stage, detail: fmt::Arguments<'_>) {
    debug!("dispatch stage {stage}: {detail}");
}

fn fetch_matrix<P>(
    provider: &P,
    snapshot: &DispatchSnapshot,
    table: &LocationTable,
) -> Result<DistanceMatrix, SolveError>
where
    P: DistanceMatrixProvider + ?Sized,
{
    for worker in snapshot.workers() {
        if let Some(vehicle) = worker.vehicle
            && vehicle != snapshot.vehicle_profile()
        {
            debug!(
                "worker {} declares {vehicle} but the matrix uses {}",
                worker.id,
                snapshot.vehicle_profile()
            );
        }
    }
    let matrix = provider.get_distance_matrix(table.coords(), snapshot.vehicle_profile())?;
    matrix.ensure_len(table.len())?;
    Ok(matrix)
}

/// Greedy dispatcher bound to a distance-matrix provider.
///
/// The dispatcher holds no per-call state, so one instance may serve
/// concurrent solve calls when its provider allows it.
#[derive(Debug, Clone)]
pub struct GreedyDispatcher<P> {
    provider: P,
    policy: DispatchPolicy,
}

impl<P> GreedyDispatcher<P>
where
    P: DistanceMatrixProvider,
{
    /// Construct a dispatcher using the default policy.
    pub fn new(provider: P) -> Self {
        Self::with_policy(provider, DispatchPolicy::default())
    }

    /// Construct a dispatcher with an explicit policy.
    pub const fn with_policy(provider: P, policy: DispatchPolicy) -> Self {
        Self { provider, policy }
    }

    /// Return the active policy.
    pub const fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }
}

impl<P> Solver for GreedyDispatcher<P>
where
    P: DistanceMatrixProvider + Send + Sync,
{
    fn solve(&self, snapshot: &DispatchSnapshot) -> Result<DispatchPlan, SolveError> {
        solve_with_policy(snapshot, &self.provider, &self.policy)
    }
}
