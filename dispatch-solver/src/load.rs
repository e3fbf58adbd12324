//! Per-worker bookkeeping shared by the allocation stages.

use std::time::Duration;

use dispatch_core::Worker;

use crate::DispatchPolicy;

/// Orders committed to one worker so far.
///
/// `orders` holds reserved orders first, then normal orders in commit order;
/// sequencing consumes them in that order so ties resolve the same way on
/// every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WorkerLoad {
    orders: Vec<usize>,
    reserved: usize,
    accumulated: Duration,
}

impl WorkerLoad {
    pub(crate) fn orders(&self) -> &[usize] {
        &self.orders
    }

    pub(crate) const fn task_count(&self) -> usize {
        self.orders.len()
    }

    pub(crate) const fn reserved_count(&self) -> usize {
        self.reserved
    }

    /// Depot legs plus service time of every committed order.
    pub(crate) const fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub(crate) fn commit_reserved(&mut self, order_idx: usize, depot_leg: Duration, service: Duration) {
        self.reserved = self.reserved.saturating_add(1);
        self.commit(order_idx, depot_leg, service);
    }

    pub(crate) fn commit_normal(&mut self, order_idx: usize, depot_leg: Duration, service: Duration) {
        self.commit(order_idx, depot_leg, service);
    }

    fn commit(&mut self, order_idx: usize, depot_leg: Duration, service: Duration) {
        self.orders.push(order_idx);
        self.accumulated = self.accumulated.saturating_add(depot_leg).saturating_add(service);
    }

    /// Whether the worker may take another stop of any kind.
    pub(crate) fn has_capacity(&self, worker: &Worker) -> bool {
        self.task_count() < worker.capacity
    }

    /// Whether the worker may take another reserved stop.
    pub(crate) fn accepts_reserved(&self, worker: &Worker, policy: &DispatchPolicy) -> bool {
        self.reserved < policy.reserved_cap && self.has_capacity(worker)
    }

    /// Whether the worker may take another normal stop.
    ///
    /// The session check is a soft throttle on work committed so far; the
    /// sequenced route may still run past the session length.
    pub(crate) fn accepts_normal(&self, worker: &Worker, policy: &DispatchPolicy) -> bool {
        self.has_capacity(worker) && self.accumulated < policy.session_threshold(worker.max_session)
    }

    /// Fairness surcharge for giving this worker one more stop.
    pub(crate) fn workload_penalty(&self, policy: &DispatchPolicy) -> Duration {
        let count = u32::try_from(self.task_count()).unwrap_or(u32::MAX);
        policy.workload_penalty.saturating_mul(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::test_support::worker;
    use rstest::rstest;

    #[rstest]
    fn counts_reserved_and_accumulates_duration() {
        let mut load = WorkerLoad::default();
        load.commit_reserved(3, Duration::from_secs(100), Duration::from_secs(20));
        load.commit_normal(1, Duration::from_secs(50), Duration::from_secs(10));

        assert_eq!(load.orders(), &[3, 1]);
        assert_eq!(load.reserved_count(), 1);
        assert_eq!(load.task_count(), 2);
        assert_eq!(load.accumulated(), Duration::from_secs(180));
        assert_eq!(
            load.workload_penalty(&DispatchPolicy::default()),
            Duration::from_secs(120)
        );
    }

    #[rstest]
    fn unreachable_legs_saturate() {
        let mut load = WorkerLoad::default();
        load.commit_normal(0, Duration::MAX, Duration::from_secs(1));
        assert_eq!(load.accumulated(), Duration::MAX);
    }

    #[rstest]
    #[case(8 * 3600 - 1, true)]
    #[case(9 * 3600, false)]
    fn normal_throttle_uses_ninety_percent_of_session(#[case] committed: u64, #[case] accepts: bool) {
        let mut courier = worker("w1", 10);
        courier.max_session = Duration::from_secs(10 * 3600);
        let mut load = WorkerLoad::default();
        load.commit_normal(0, Duration::from_secs(committed), Duration::ZERO);

        assert_eq!(load.accepts_normal(&courier, &DispatchPolicy::default()), accepts);
    }

    #[rstest]
    fn reserved_cap_and_capacity_both_limit() {
        let policy = DispatchPolicy::default();
        let roomy = worker("w1", 10);
        let tight = worker("w2", 1);
        let mut load = WorkerLoad::default();
        for idx in 0..3 {
            assert!(load.accepts_reserved(&roomy, &policy));
            load.commit_reserved(idx, Duration::ZERO, Duration::ZERO);
        }
        assert!(!load.accepts_reserved(&roomy, &policy));

        let mut single = WorkerLoad::default();
        single.commit_reserved(0, Duration::ZERO, Duration::ZERO);
        assert!(!single.accepts_reserved(&tight, &policy));
        assert!(!single.accepts_normal(&tight, &policy));
    }
}
