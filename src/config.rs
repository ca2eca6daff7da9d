use crate::network::Timestamp;

/// Timing rules applied while ingesting the schedule and searching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteConfig {
    /// Minimum wait between two consecutive legs flown by the same carrier.
    pub min_layover: Timestamp,

    /// Buffer that must elapse after arriving somewhere before an onward leg can be boarded.
    pub transfer_time: Timestamp,
}

impl RouteConfig {
    pub fn new(min_layover: Timestamp, transfer_time: Timestamp) -> Self {
        Self { min_layover, transfer_time }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            min_layover: 4,
            transfer_time: 4,
        }
    }
}
