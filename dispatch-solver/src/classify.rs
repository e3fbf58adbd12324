//! Partition orders into reserved and normal buckets.

use dispatch_core::Order;

/// Order indices split by priority class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Buckets {
    /// Reserved orders in input order.
    pub(crate) reserved: Vec<usize>,
    /// Normal orders sorted by ascending tier; equal tiers keep input order.
    pub(crate) normal: Vec<usize>,
}

pub(crate) fn classify(orders: &[Order]) -> Buckets {
    let (reserved, mut normal): (Vec<_>, Vec<_>) = orders
        .iter()
        .enumerate()
        .partition(|(_, order)| order.is_reserved());
    normal.sort_by_key(|(_, order)| order.priority_tier);
    Buckets {
        reserved: reserved.into_iter().map(|(idx, _)| idx).collect(),
        normal: normal.into_iter().map(|(idx, _)| idx).collect(),
    }
}
