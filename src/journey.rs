use std::fmt::Display;

use crate::network::{Leg, LocationIndex, RouteGraph, Timestamp};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum JourneyError {
    #[error("No route from {origin} to {destination}.")]
    NoJourneyFound { origin: String, destination: String },
    #[error("Predecessor chain ending at {0} never reaches the origin.")]
    Cycle(String),
}

/// A route found by a search, from its origin to a single destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    pub origin: LocationIndex,
    // (location arrived at, leg used to get there), in travel order.
    pub stops: Vec<(LocationIndex, Leg)>,
}

/// One leg of an itinerary with every id resolved to a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryRecord {
    pub carrier: String,
    pub origin: String,
    pub departure_time: Timestamp,
    pub destination: String,
    pub arrival_time: Timestamp,
}

impl Display for ItineraryRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.carrier, self.origin, self.departure_time, self.destination, self.arrival_time
        )
    }
}

impl Itinerary {
    pub fn empty(origin: LocationIndex) -> Self {
        Self { origin, stops: Vec::new() }
    }

    /// Walks the predecessor links left by the last search from `destination` back to `origin`.
    pub fn from_search(network: &RouteGraph, origin: LocationIndex, destination: LocationIndex) -> Result<Self, JourneyError> {
        let max_legs = network.arena.len();
        let mut stops = Vec::new();
        let mut current = destination;
        while current != origin {
            let location = network.location(current);
            let Some(predecessor) = location.predecessor else {
                return Err(JourneyError::NoJourneyFound {
                    origin: network.location(origin).name.to_string(),
                    destination: network.location(destination).name.to_string(),
                });
            };
            if stops.len() >= max_legs {
                return Err(JourneyError::Cycle(network.location(destination).name.to_string()));
            }
            stops.push((current, location.best_leg));
            current = predecessor;
        }
        stops.reverse();
        Ok(Self { origin, stops })
    }

    pub fn destination(&self) -> LocationIndex {
        self.stops.last().map_or(self.origin, |&(location, _)| location)
    }

    /// Arrival time at the final destination, 0 for an itinerary that goes nowhere.
    pub fn arrival_time(&self) -> Timestamp {
        self.stops.last().map_or(0, |(_, leg)| leg.arrival_time)
    }

    pub fn len(&self) -> usize { self.stops.len() }

    pub fn is_empty(&self) -> bool { self.stops.is_empty() }

    pub fn records(&self, network: &RouteGraph) -> Vec<ItineraryRecord> {
        let mut from = self.origin;
        self.stops
            .iter()
            .map(|&(to, leg)| {
                let record = ItineraryRecord {
                    carrier: leg.carrier.map(|id| network.carriers.name(id)).unwrap_or_default().to_string(),
                    origin: network.location(from).name.to_string(),
                    departure_time: leg.departure_time,
                    destination: network.location(to).name.to_string(),
                    arrival_time: leg.arrival_time,
                };
                from = to;
                record
            })
            .collect()
    }
}

/// An itinerary paired with the network it was found in, for printing.
pub struct Journey<'a> {
    pub itinerary: &'a Itinerary,
    pub network: &'a RouteGraph,
}

impl<'a> Journey<'a> {
    pub fn new(itinerary: &'a Itinerary, network: &'a RouteGraph) -> Self {
        Self { itinerary, network }
    }
}

impl Display for Journey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for record in self.itinerary.records(self.network) {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}

impl RouteGraph {
    /// Keeps `itinerary` as the network diameter if it arrives later than any itinerary recorded
    /// so far. Returns whether it replaced the previous one.
    pub fn record_diameter(&mut self, itinerary: &Itinerary) -> bool {
        let longest = self.diameter.as_ref().map_or(0, Itinerary::arrival_time);
        if itinerary.arrival_time() > longest {
            self.diameter = Some(itinerary.clone());
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use crate::ingest::load_network;

    const TIMETABLE: &str = "A\tB\t4\nB\tC\t4\nA\tC\t30\n";
    const SCHEDULE: &str = "X\tA\t0\tC\t30\nY\tA\t0\tB\t4\nY\tB\t8\tC\t12\nZ\tC\t40\tA\t70\nW\tA\t80\tB\t84\n";

    fn network() -> RouteGraph {
        load_network(TIMETABLE.as_bytes(), SCHEDULE.as_bytes(), RouteConfig::default()).unwrap()
    }

    #[test]
    fn itinerary_is_chronological() {
        let mut network = network();
        let a = network.location_idx("A").unwrap();
        let outcome = network.search(a, &RouteConfig::default()).unwrap();
        let itinerary = Itinerary::from_search(&network, a, outcome.farthest).unwrap();

        let records = itinerary.records(&network);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].to_string(), "Y\tA\t0\tB\t4");
        assert_eq!(records[1].to_string(), "Y\tB\t8\tC\t12");
        assert_eq!(itinerary.arrival_time(), 12);
        assert_eq!(network.location(itinerary.destination()).name.as_ref(), "C");
        assert_eq!(Journey::new(&itinerary, &network).to_string(), "Y\tA\t0\tB\t4\nY\tB\t8\tC\t12\n");
    }

    #[test]
    fn itinerary_to_origin_is_empty() {
        let mut network = network();
        let a = network.location_idx("A").unwrap();
        network.search(a, &RouteConfig::default()).unwrap();

        let itinerary = Itinerary::from_search(&network, a, a).unwrap();
        assert!(itinerary.is_empty());
        assert_eq!(itinerary.arrival_time(), 0);
        assert_eq!(itinerary.destination(), a);
        assert_eq!(Journey::new(&itinerary, &network).to_string(), "");
    }

    #[test]
    fn missing_predecessor_is_an_error() {
        let network = network();
        let a = network.location_idx("A").unwrap();
        let c = network.location_idx("C").unwrap();

        // No search has been run, so C has no predecessor.
        let err = Itinerary::from_search(&network, a, c).unwrap_err();
        assert_eq!(err, JourneyError::NoJourneyFound { origin: "A".into(), destination: "C".into() });
    }

    #[test]
    fn diameter_only_grows() {
        let mut network = network();
        let a = network.location_idx("A").unwrap();
        let c = network.location_idx("C").unwrap();

        let outcome = network.search(c, &RouteConfig::default()).unwrap();
        let from_c = Itinerary::from_search(&network, c, outcome.farthest).unwrap();
        assert_eq!(from_c.arrival_time(), 84);
        assert!(network.record_diameter(&from_c));

        let outcome = network.search(a, &RouteConfig::default()).unwrap();
        let from_a = Itinerary::from_search(&network, a, outcome.farthest).unwrap();
        assert!(!network.record_diameter(&from_a));
        assert!(!network.record_diameter(&from_c));
        assert_eq!(network.diameter(), Some(&from_c));
        assert!(!network.record_diameter(&Itinerary::empty(a)));
    }
}
