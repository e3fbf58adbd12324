//! Nearest-neighbour ordering of one worker's stops.

use dispatch_core::DistanceMatrix;

use crate::locations::LocationTable;

/// Order `stops` by repeatedly visiting the closest remaining stop.
///
/// The walk starts at `depot` (a matrix row). Ties go to the stop listed
/// first in `stops`; unreachable stops compare as [`std::time::Duration::MAX`]
/// and therefore come last.
pub(crate) fn nearest_neighbour(
    matrix: &DistanceMatrix,
    table: &LocationTable,
    depot: usize,
    stops: &[usize],
) -> Vec<usize> {
    let mut remaining = stops.to_vec();
    let mut route = Vec::with_capacity(stops.len());
    let mut position = depot;

    while let Some(slot) = closest(matrix, table, position, &remaining) {
        let order_idx = remaining.remove(slot);
        position = table.stop(order_idx);
        route.push(order_idx);
    }
    route
}

fn closest(
    matrix: &DistanceMatrix,
    table: &LocationTable,
    from: usize,
    remaining: &[usize],
) -> Option<usize> {
    remaining
        .iter()
        .enumerate()
        .min_by_key(|&(slot, &order_idx)| (matrix.duration(from, table.stop(order_idx)), slot))
        .map(|(slot, _)| slot)
}
