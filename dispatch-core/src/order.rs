use std::time::Duration;

use geo::Coord;

/// Priority tier marking an order as reserved.
///
/// Reserved orders are allocated before every other tier and are capped per
/// worker.
pub const RESERVED_TIER: i32 = 0;

/// A pending delivery awaiting assignment.
///
/// Lower tiers are more urgent among normal orders; tier
/// [`RESERVED_TIER`] marks the reserved class.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::Coord;
/// use dispatch_core::Order;
///
/// let order = Order::new("o1", Coord { x: 13.40, y: 52.52 }, Duration::from_secs(120), 0);
/// assert!(order.is_reserved());
/// assert!(order.zone_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Caller-assigned identifier.
    pub id: String,
    /// Delivery location.
    pub location: Coord<f64>,
    /// Time spent on site once the worker arrives.
    pub service_duration: Duration,
    /// Priority tier; `0` is reserved.
    pub priority_tier: i32,
    /// Zone the delivery belongs to, if declared.
    pub zone_id: Option<String>,
}

impl Order {
    /// Construct an order without a zone.
    pub fn new(
        id: impl Into<String>,
        location: Coord<f64>,
        service_duration: Duration,
        priority_tier: i32,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            service_duration,
            priority_tier,
            zone_id: None,
        }
    }

    /// Attach a zone to the order.
    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone_id = Some(zone.into());
        self
    }

    /// Return whether the order belongs to the reserved tier.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        self.priority_tier == RESERVED_TIER
    }
}
