use crate::config::RouteConfig;
use crate::network::{Leg, Location, LocationIndex, RouteGraph};
use crate::queue::PriorityQueue;

// Arrival times are measured from the start of the schedule, the source counts as reached at 0.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("from {source_name}, unreachable: {}", unreachable.join(", "))]
pub struct ReachabilityError {
    pub source_name: String,
    pub unreachable: Vec<String>,
}

/// Result of a completed search. The full shortest-arrival tree stays on the graph's locations
/// until the next search resets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub source: LocationIndex,
    pub farthest: LocationIndex,
}

impl RouteGraph {
    /// Earliest-arrival search from `source` to every registered location.
    ///
    /// The cost of an edge is not fixed: from a location reached at time `t` the usable legs are
    /// those departing at or after `t + transfer_time` (or `t` at the source), and the first of them
    /// in departure order is taken. Locations are settled in order of arrival time, so the last one
    /// settled is the farthest from `source`.
    pub fn search(&mut self, source: LocationIndex, config: &RouteConfig) -> Result<SearchOutcome, ReachabilityError> {
        self.reset();
        self.arena[source].best_leg = Leg::ORIGIN;

        let mut queue: PriorityQueue<Location, _> = PriorityQueue::with_capacity(self.locations().len(), Location::compare);
        for i in 0..self.locations().len() {
            let location_idx = self.locations()[i];
            queue.push(&mut self.arena, location_idx);
        }
        queue.decrease_key(&mut self.arena, source);

        let mut farthest = source;
        while let Some(current) = queue.pop_min(&mut self.arena) {
            if queue.is_empty() {
                farthest = current;
                break;
            }

            let current_leg = self.arena[current].best_leg;
            // Everything left in the queue is unreachable as well.
            if !current_leg.is_reached() {
                continue;
            }
            // No transfer is needed to leave the source.
            let threshold = if current == source {
                current_leg.arrival_time
            } else {
                current_leg.arrival_time.saturating_add(config.transfer_time)
            };

            for e in 0..self.arena[current].edges.len() {
                let edge = &mut self.edges[self.arena[current].edges[e]];
                edge.sort();
                let destination = edge.destination;
                let Some(leg) = edge.earliest_departure(threshold) else {
                    continue;
                };
                if leg.arrival_time < self.arena[destination].arrival_time() {
                    let location = &mut self.arena[destination];
                    location.predecessor = Some(current);
                    location.best_leg = leg;
                    queue.decrease_key(&mut self.arena, destination);
                }
            }
        }

        self.check_reachable(source)?;
        Ok(SearchOutcome { source, farthest })
    }

    fn check_reachable(&self, source: LocationIndex) -> Result<(), ReachabilityError> {
        let unreachable: Vec<String> = self
            .locations()
            .iter()
            .map(|&idx| &self.arena[idx])
            .filter(|location| !location.best_leg.is_reached())
            .map(|location| location.name.to_string())
            .collect();
        if unreachable.is_empty() {
            Ok(())
        } else {
            Err(ReachabilityError { source_name: self.arena[source].name.to_string(), unreachable })
        }
    }

    /// Location names along the predecessor chain, from `destination` back to the source.
    pub fn predecessors(&self, destination: LocationIndex) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(destination);
        while let Some(idx) = current {
            if names.len() > self.arena.len() {
                break;
            }
            names.push(&*self.arena[idx].name);
            current = self.arena[idx].predecessor;
        }
        names
    }
}
