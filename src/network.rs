use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;

use crate::journey::Itinerary;
use crate::queue::HeapSlot;

pub type Timestamp = u32;
pub type LocationIndex = usize;
pub type EdgeIndex = usize;
pub type CarrierId = u32;

/// One scheduled hop between two locations. The carrier is `None` for the synthetic legs used
/// by the search (the origin marker and the unreached sentinel).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leg {
    pub carrier: Option<CarrierId>,
    pub departure_time: Timestamp,
    pub arrival_time: Timestamp,
}

impl Leg {
    /// Sentinel for a location the search has not reached.
    pub const UNREACHED: Leg = Leg { carrier: None, departure_time: Timestamp::MAX, arrival_time: Timestamp::MAX };

    /// Zero-cost leg placed on the source of a search.
    pub const ORIGIN: Leg = Leg { carrier: None, departure_time: 0, arrival_time: 0 };

    pub fn new(carrier: CarrierId, departure_time: Timestamp, arrival_time: Timestamp) -> Self {
        Self { carrier: Some(carrier), departure_time, arrival_time }
    }

    pub fn is_reached(&self) -> bool { self.arrival_time != Timestamp::MAX }

    // Legs are ranked by when they get you there, nothing else.
    pub fn compare_arrival(&self, other: &Leg) -> Ordering {
        self.arrival_time.cmp(&other.arrival_time)
    }
}

impl Default for Leg {
    fn default() -> Self { Leg::UNREACHED }
}

/// All legs flying from one location to a single destination.
pub struct Edge {
    pub destination: LocationIndex,
    legs: Vec<Leg>,
    sorted: bool,
}

impl Edge {
    pub fn new(destination: LocationIndex) -> Self {
        Self { destination, legs: Vec::new(), sorted: true }
    }

    pub fn push(&mut self, leg: Leg) {
        self.sorted = self.sorted && self.legs.last().map_or(true, |last| last.departure_time <= leg.departure_time);
        self.legs.push(leg);
    }

    /// Orders the legs by departure time. Cheap to call repeatedly.
    pub fn sort(&mut self) {
        if !self.sorted {
            self.legs.sort_by_key(|leg| leg.departure_time);
            self.sorted = true;
        }
    }

    pub fn is_sorted(&self) -> bool { self.sorted }

    pub fn legs(&self) -> &[Leg] { &self.legs }

    /// The first leg (in departure order) leaving no earlier than `threshold`.
    pub fn earliest_departure(&self, threshold: Timestamp) -> Option<Leg> {
        debug_assert!(self.sorted, "Edge must be sorted before searching it.");
        let idx = self.legs.partition_point(|leg| leg.departure_time < threshold);
        self.legs.get(idx).copied()
    }
}

pub struct Location {
    pub name: Box<str>,
    pub edges: Vec<EdgeIndex>,
    // Search state, only meaningful after a search from some source.
    pub predecessor: Option<LocationIndex>,
    pub best_leg: Leg,
    heap_slot: Option<usize>,
}

impl Location {
    pub fn new(name: &str) -> Self {
        Self {
            name: Box::from(name),
            edges: Vec::new(),
            predecessor: None,
            best_leg: Leg::UNREACHED,
            heap_slot: None,
        }
    }

    pub fn reset(&mut self) {
        self.predecessor = None;
        self.best_leg = Leg::UNREACHED;
        self.heap_slot = None;
    }

    pub fn arrival_time(&self) -> Timestamp { self.best_leg.arrival_time }

    pub fn compare(left: &Location, right: &Location) -> Ordering {
        left.best_leg.compare_arrival(&right.best_leg)
    }
}

impl HeapSlot for Location {
    fn heap_slot(&self) -> Option<usize> { self.heap_slot }

    fn set_heap_slot(&mut self, slot: Option<usize>) { self.heap_slot = slot; }
}

/// Maps carrier names to the small ids stored in legs, and back.
#[derive(Default)]
pub struct CarrierRegistry {
    names: Vec<Box<str>>,
    ids: HashMap<Box<str>, CarrierId>,
}

impl CarrierRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, name: &str) -> CarrierId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as CarrierId;
        self.names.push(Box::from(name));
        self.ids.insert(Box::from(name), id);
        id
    }

    pub fn name(&self, id: CarrierId) -> &str { &self.names[id as usize] }
}

pub struct RouteGraph {
    pub(crate) arena: Vec<Location>,
    pub(crate) edges: Vec<Edge>,
    location_index: HashMap<Box<str>, LocationIndex>,
    edge_index: HashMap<(LocationIndex, LocationIndex), EdgeIndex>,
    // Registered locations, in name order. This is the order searches are run in.
    locations: Vec<LocationIndex>,
    pub carriers: CarrierRegistry,
    pub(crate) diameter: Option<Itinerary>,
}

impl Default for RouteGraph {
    fn default() -> Self { Self::new() }
}

impl RouteGraph {
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            edges: Vec::new(),
            location_index: HashMap::new(),
            edge_index: HashMap::new(),
            locations: Vec::new(),
            carriers: CarrierRegistry::new(),
            diameter: None,
        }
    }

    /// Returns the location with this name, creating it on first reference.
    pub fn add_location(&mut self, name: &str) -> LocationIndex {
        if let Some(&idx) = self.location_index.get(name) {
            return idx;
        }
        let idx = self.arena.len();
        self.arena.push(Location::new(name));
        self.location_index.insert(Box::from(name), idx);
        idx
    }

    /// Appends a leg to the edge `origin -> destination`, creating the edge if needed.
    pub fn add_leg(&mut self, origin: LocationIndex, destination: LocationIndex, leg: Leg) -> EdgeIndex {
        let edge_idx = match self.edge_index.get(&(origin, destination)) {
            Some(&edge_idx) => edge_idx,
            None => {
                let edge_idx = self.edges.len();
                self.edges.push(Edge::new(destination));
                self.edge_index.insert((origin, destination), edge_idx);
                self.arena[origin].edges.push(edge_idx);
                edge_idx
            }
        };
        self.edges[edge_idx].push(leg);
        edge_idx
    }

    /// Makes every created location part of the searchable network.
    pub fn register_locations(&mut self) {
        let mut locations: Vec<LocationIndex> = (0..self.arena.len()).collect();
        locations.sort_unstable_by(|&a, &b| self.arena[a].name.cmp(&self.arena[b].name));
        self.locations = locations;
    }

    /// Sorts the legs of every edge by departure time.
    pub fn sort_edges(&mut self) {
        for edge in self.edges.iter_mut() {
            edge.sort();
        }
    }

    /// Clears the search state of every location.
    pub fn reset(&mut self) {
        for location in self.arena.iter_mut() {
            location.reset();
        }
    }

    pub fn locations(&self) -> &[LocationIndex] { &self.locations }

    pub fn location(&self, idx: LocationIndex) -> &Location { &self.arena[idx] }

    pub fn location_idx(&self, name: &str) -> Option<LocationIndex> { self.location_index.get(name).copied() }

    pub fn edge_between(&self, origin: LocationIndex, destination: LocationIndex) -> Option<&Edge> {
        self.edge_index.get(&(origin, destination)).map(|&idx| &self.edges[idx])
    }

    pub fn edges_from(&self, origin: LocationIndex) -> impl Iterator<Item = &Edge> + '_ {
        self.arena[origin].edges.iter().map(|&idx| &self.edges[idx])
    }

    pub fn num_locations(&self) -> usize { self.locations.len() }

    pub fn num_edges(&self) -> usize { self.edges.len() }

    pub fn num_legs(&self) -> usize { self.edges.iter().map(|edge| edge.legs.len()).sum() }

    pub fn num_carriers(&self) -> usize { self.carriers.names.len() }

    pub fn diameter(&self) -> Option<&Itinerary> { self.diameter.as_ref() }

    pub fn print_stats(&self) {
        log::info!(
            "Network has {} locations, {} edges, {} legs and {} carriers.",
            self.num_locations(),
            self.num_edges(),
            self.num_legs(),
            self.num_carriers()
        );
    }
}

// Debug dump of the whole route structure.
impl Display for RouteGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &location_idx in self.locations.iter() {
            let location = &self.arena[location_idx];
            writeln!(f, "--------------------------------------------------------------------------")?;
            writeln!(f, "HOME LOCATION: {}", location.name)?;
            writeln!(f)?;
            for edge in self.edges_from(location_idx) {
                writeln!(f, "-->DESTINATION: {}", self.arena[edge.destination].name)?;
                for leg in edge.legs() {
                    let carrier = leg.carrier.map(|id| self.carriers.name(id)).unwrap_or("-");
                    writeln!(f, "CARRIER: {}, {} {}", carrier, leg.departure_time, leg.arrival_time)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
