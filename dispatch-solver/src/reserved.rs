//! Round-robin allocation of reserved orders.

use dispatch_core::{DistanceMatrix, Order, Worker};
use log::warn;

use crate::DispatchPolicy;
use crate::load::WorkerLoad;
use crate::locations::LocationTable;

/// Reserved orders that were not placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ReservedOutcome {
    /// Orders skipped because no worker was eligible at their turn.
    pub(crate) skipped: Vec<usize>,
    /// Orders left once every worker reached the reserved cap or capacity.
    pub(crate) overflow: Vec<usize>,
}

/// Inputs shared by the allocation stages.
pub(crate) struct AllocationContext<'a> {
    pub(crate) workers: &'a [Worker],
    pub(crate) orders: &'a [Order],
    pub(crate) table: &'a LocationTable,
    pub(crate) matrix: &'a DistanceMatrix,
    pub(crate) policy: &'a DispatchPolicy,
}

impl AllocationContext<'_> {
    /// Travel time from worker `worker_idx`'s depot to order `order_idx`.
    pub(crate) fn depot_leg(&self, worker_idx: usize, order_idx: usize) -> std::time::Duration {
        self.matrix
            .duration(self.table.depot(worker_idx), self.table.stop(order_idx))
    }
}

/// Spread reserved orders across workers.
///
/// Orders are taken shortest service first (ties keep input order). A cursor
/// walks the workers in input order: each order goes to the first worker at
/// or after the cursor that is below the reserved cap, has capacity and
/// serves the order's zone, and the cursor then moves past that worker.
/// Reserved overflow is never handed to the normal stage.
pub(crate) fn allocate_reserved(
    ctx: &AllocationContext<'_>,
    reserved: &[usize],
    loads: &mut [WorkerLoad],
) -> ReservedOutcome {
    let mut queue: Vec<(usize, &Order)> = reserved
        .iter()
        .filter_map(|&idx| ctx.orders.get(idx).map(|order| (idx, order)))
        .collect();
    queue.sort_by_key(|(_, order)| order.service_duration);

    let mut outcome = ReservedOutcome::default();
    let worker_count = ctx.workers.len();
    let mut cursor = 0_usize;

    for (position, &(order_idx, order)) in queue.iter().enumerate() {
        let saturated = ctx
            .workers
            .iter()
            .zip(loads.iter())
            .all(|(worker, load)| !load.accepts_reserved(worker, ctx.policy));
        if saturated {
            outcome
                .overflow
                .extend(queue.iter().skip(position).map(|&(idx, _)| idx));
            break;
        }

        let chosen = (0..worker_count)
            .map(|step| wrap(cursor.saturating_add(step), worker_count))
            .find(|&worker_idx| {
                let (Some(worker), Some(load)) = (ctx.workers.get(worker_idx), loads.get(worker_idx))
                else {
                    return false;
                };
                load.accepts_reserved(worker, ctx.policy)
                    && worker.serves_zone(order.zone_id.as_deref())
            });

        match chosen.and_then(|worker_idx| loads.get_mut(worker_idx).map(|load| (worker_idx, load))) {
            Some((worker_idx, load)) => {
                load.commit_reserved(
                    order_idx,
                    ctx.depot_leg(worker_idx, order_idx),
                    order.service_duration,
                );
                cursor = wrap(worker_idx.saturating_add(1), worker_count);
            }
            None => outcome.skipped.push(order_idx),
        }
    }

    if !outcome.overflow.is_empty() {
        warn!(
            "{} reserved orders exceed the cap of {} per worker across {} workers; leaving them unassigned",
            outcome.overflow.len(),
            ctx.policy.reserved_cap,
            worker_count
        );
    }
    outcome
}

/// `index` wrapped into `0..len` for indices below `2 * len`.
const fn wrap(index: usize, len: usize) -> usize {
    if index >= len { index.saturating_sub(len) } else { index }
}
