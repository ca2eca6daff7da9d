//! Where finished itineraries go, and the loop that produces them for every source location.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::config::RouteConfig;
use crate::error::{Error, Result};
use crate::journey::{Itinerary, ItineraryRecord};
use crate::network::RouteGraph;

pub trait ItinerarySink {
    /// The itinerary from one source to its farthest location.
    fn itinerary(&mut self, records: &[ItineraryRecord]) -> std::io::Result<()>;

    /// Called every time a longer diameter is found. The last call holds the network diameter.
    fn diameter(&mut self, records: &[ItineraryRecord]) -> std::io::Result<()>;

    /// Whether [`ItinerarySink::route`] should receive every source/destination pair.
    fn wants_all_routes(&self) -> bool { false }

    fn route(&mut self, _records: &[ItineraryRecord]) -> std::io::Result<()> { Ok(()) }
}

fn write_records(out: &mut impl Write, records: &[ItineraryRecord]) -> std::io::Result<()> {
    for record in records {
        writeln!(out, "{record}")?;
    }
    Ok(())
}

/// Writes tab-separated itineraries, each followed by a blank line. The diameter is rewritten to
/// its own file whenever it changes.
pub struct TsvSink<W: Write> {
    results: W,
    diameter_path: PathBuf,
    all_routes: Option<BufWriter<File>>,
}

impl<W: Write> TsvSink<W> {
    /// Creates (or truncates) the diameter file right away, so a run that finds no diameter
    /// leaves it empty instead of keeping an older one.
    pub fn new(results: W, diameter_path: impl Into<PathBuf>) -> Result<Self> {
        let diameter_path = diameter_path.into();
        if let Err(source) = File::create(&diameter_path) {
            return Err(Error::Open { path: diameter_path, source });
        }
        Ok(Self { results, diameter_path, all_routes: None })
    }

    /// Also write the route between every pair of locations to `path`.
    pub fn with_all_routes(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|source| Error::Open { path, source })?;
        self.all_routes = Some(BufWriter::new(file));
        Ok(self)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(all_routes) = self.all_routes.as_mut() {
            all_routes.flush()?;
        }
        self.results.flush()
    }
}

impl<W: Write> ItinerarySink for TsvSink<W> {
    fn itinerary(&mut self, records: &[ItineraryRecord]) -> std::io::Result<()> {
        write_records(&mut self.results, records)?;
        writeln!(self.results)
    }

    fn diameter(&mut self, records: &[ItineraryRecord]) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(&self.diameter_path)?);
        write_records(&mut out, records)?;
        out.flush()
    }

    fn wants_all_routes(&self) -> bool { self.all_routes.is_some() }

    fn route(&mut self, records: &[ItineraryRecord]) -> std::io::Result<()> {
        match self.all_routes.as_mut() {
            Some(out) => {
                write_records(out, records)?;
                writeln!(out)
            }
            None => Ok(()),
        }
    }
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub itineraries: Vec<Vec<ItineraryRecord>>,
    pub diameter: Vec<ItineraryRecord>,
    pub diameter_updates: usize,
    pub all_routes: Option<Vec<Vec<ItineraryRecord>>>,
}

impl CollectingSink {
    pub fn new() -> Self { Self::default() }

    pub fn with_all_routes() -> Self {
        Self { all_routes: Some(Vec::new()), ..Self::default() }
    }
}

impl ItinerarySink for CollectingSink {
    fn itinerary(&mut self, records: &[ItineraryRecord]) -> std::io::Result<()> {
        self.itineraries.push(records.to_vec());
        Ok(())
    }

    fn diameter(&mut self, records: &[ItineraryRecord]) -> std::io::Result<()> {
        self.diameter = records.to_vec();
        self.diameter_updates += 1;
        Ok(())
    }

    fn wants_all_routes(&self) -> bool { self.all_routes.is_some() }

    fn route(&mut self, records: &[ItineraryRecord]) -> std::io::Result<()> {
        if let Some(all_routes) = self.all_routes.as_mut() {
            all_routes.push(records.to_vec());
        }
        Ok(())
    }
}

impl RouteGraph {
    /// Searches from every registered location in turn, handing each farthest-location itinerary
    /// to `sink` and keeping the diameter up to date. Stops at the first failing search.
    pub fn search_all(&mut self, config: &RouteConfig, sink: &mut impl ItinerarySink) -> Result<()> {
        if self.num_locations() == 0 {
            log::warn!("The schedule has no locations, nothing to search.");
            return Ok(());
        }

        for i in 0..self.num_locations() {
            let source = self.locations()[i];
            let outcome = self.search(source, config)?;
            log::debug!(
                "Farthest from {} is {} at {} (via {}).",
                self.location(source).name,
                self.location(outcome.farthest).name,
                self.location(outcome.farthest).arrival_time(),
                self.predecessors(outcome.farthest).join(" <- ")
            );

            let itinerary = Itinerary::from_search(self, source, outcome.farthest)?;
            let records = itinerary.records(self);
            sink.itinerary(&records)?;
            if self.record_diameter(&itinerary) {
                log::debug!("New diameter candidate arriving at {}.", itinerary.arrival_time());
                sink.diameter(&records)?;
            }

            if sink.wants_all_routes() {
                for j in 0..self.num_locations() {
                    let destination = self.locations()[j];
                    if destination == source {
                        continue;
                    }
                    let route = Itinerary::from_search(self, source, destination)?;
                    sink.route(&route.records(self))?;
                }
            }
        }

        if let Some(diameter) = self.diameter() {
            log::info!(
                "Network diameter: {} to {}, arriving at {} over {} legs.",
                self.location(diameter.origin).name,
                self.location(diameter.destination()).name,
                diameter.arrival_time(),
                diameter.len()
            );
        }
        Ok(())
    }
}
