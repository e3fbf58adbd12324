//! Index table mapping workers and orders onto matrix rows.

use dispatch_core::{Order, Worker};
use geo::Coord;

/// Immutable list of every location in one solve call.
///
/// Worker depots come first in worker input order, followed by order
/// locations in order input order. Worker `w` therefore sits at row `w` and
/// order `o` at row `worker_count + o`.
#[derive(Debug, Clone)]
pub(crate) struct LocationTable {
    coords: Vec<Coord<f64>>,
    worker_count: usize,
}

impl LocationTable {
    pub(crate) fn new(workers: &[Worker], orders: &[Order]) -> Self {
        let coords = workers
            .iter()
            .map(|worker| worker.depot)
            .chain(orders.iter().map(|order| order.location))
            .collect();
        Self {
            coords,
            worker_count: workers.len(),
        }
    }

    /// All locations in matrix order.
    pub(crate) fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }

    pub(crate) const fn len(&self) -> usize {
        self.coords.len()
    }

    /// Matrix row of worker `worker_idx`'s depot.
    pub(crate) const fn depot(&self, worker_idx: usize) -> usize {
        worker_idx
    }

    /// Matrix row of order `order_idx`'s location.
    pub(crate) const fn stop(&self, order_idx: usize) -> usize {
        self.worker_count.saturating_add(order_idx)
    }
}
