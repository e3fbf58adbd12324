//! Global-minimum greedy assignment of normal orders.

use std::time::Duration;

use dispatch_core::Order;

use crate::load::WorkerLoad;
use crate::reserved::AllocationContext;

/// Result of the normal assignment loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GreedyOutcome {
    /// Number of committed pairs.
    pub(crate) rounds: usize,
    /// Normal orders still unassigned when no eligible pair remained.
    pub(crate) unassigned: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: Duration,
    depot_leg: Duration,
    worker_idx: usize,
    slot: usize,
}

/// Commit normal orders one at a time, cheapest eligible pair first.
///
/// A pair is eligible when the worker has capacity, has committed less than
/// the session threshold, serves the order's zone and can reach the order
/// from its depot. Cost is the depot leg plus the worker's workload penalty;
/// it is always measured from the depot, never from the worker's last stop.
/// Equal costs keep the first pair met scanning workers, then orders in
/// bucket order.
pub(crate) fn assign_normal(
    ctx: &AllocationContext<'_>,
    normal: &[usize],
    loads: &mut [WorkerLoad],
) -> GreedyOutcome {
    let mut remaining: Vec<(usize, &Order)> = normal
        .iter()
        .filter_map(|&idx| ctx.orders.get(idx).map(|order| (idx, order)))
        .collect();
    let mut rounds = 0_usize;

    while let Some(best) = cheapest_pair(ctx, &remaining, loads) {
        let (order_idx, order) = remaining.remove(best.slot);
        if let Some(load) = loads.get_mut(best.worker_idx) {
            load.commit_normal(order_idx, best.depot_leg, order.service_duration);
        }
        rounds = rounds.saturating_add(1);
    }

    GreedyOutcome {
        rounds,
        unassigned: remaining.into_iter().map(|(idx, _)| idx).collect(),
    }
}

fn cheapest_pair(
    ctx: &AllocationContext<'_>,
    remaining: &[(usize, &Order)],
    loads: &[WorkerLoad],
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (worker_idx, (worker, load)) in ctx.workers.iter().zip(loads).enumerate() {
        if !load.accepts_normal(worker, ctx.policy) {
            continue;
        }
        let penalty = load.workload_penalty(ctx.policy);
        for (slot, &(order_idx, order)) in remaining.iter().enumerate() {
            if !worker.serves_zone(order.zone_id.as_deref()) {
                continue;
            }
            let depot_leg = ctx.depot_leg(worker_idx, order_idx);
            if depot_leg == Duration::MAX {
                continue;
            }
            let cost = depot_leg.saturating_add(penalty);
            if best.is_none_or(|current| cost < current.cost) {
                best = Some(Candidate {
                    cost,
                    depot_leg,
                    worker_idx,
                    slot,
                });
            }
        }
    }
    best
}
