//! Baseline travel durations between pairs of locations.
//!
//! The timetable is the ground truth that scheduled legs are checked against. Durations are
//! symmetric: `A -> B` and `B -> A` take the same time.

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::{Error, Result};
use crate::network::Timestamp;
use crate::utils;

#[derive(Debug, Default)]
pub struct TimetableValidator {
    durations: HashMap<Box<str>, HashMap<Box<str>, Timestamp>>,
}

impl TimetableValidator {
    pub fn new() -> Self { Self::default() }

    /// Reads `<origin>\t<destination>\t<duration>` lines.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut timetable = Self::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            let [origin, destination, duration] = utils::split_fields::<3>(&line, line_number).map_err(Error::Timetable)?;
            let origin = utils::parse_name(origin, line_number).map_err(Error::Timetable)?;
            let destination = utils::parse_name(destination, line_number).map_err(Error::Timetable)?;
            let duration = utils::parse_time(duration, line_number).map_err(Error::Timetable)?;
            timetable.insert(origin, destination, duration);
        }

        if timetable.is_empty() {
            log::warn!("Timetable has no entries, every continuation leg will be rejected.");
        } else {
            log::info!("Timetable loaded with {} location pairs.", timetable.len());
        }
        if log::log_enabled!(log::Level::Debug) {
            for (origin, destination, duration) in timetable.iter() {
                log::debug!("First: {origin}, Second: {destination}, Weight: {duration}");
            }
        }
        Ok(timetable)
    }

    /// Records the duration under both orderings of the pair.
    pub fn insert(&mut self, origin: &str, destination: &str, duration: Timestamp) {
        self.durations.entry(Box::from(origin)).or_default().insert(Box::from(destination), duration);
        self.durations.entry(Box::from(destination)).or_default().insert(Box::from(origin), duration);
    }

    pub fn duration(&self, origin: &str, destination: &str) -> Option<Timestamp> {
        self.durations.get(origin)?.get(destination).copied()
    }

    /// Number of directed entries (each pair is stored twice unless origin == destination).
    pub fn len(&self) -> usize { self.durations.values().map(HashMap::len).sum() }

    pub fn is_empty(&self) -> bool { self.durations.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Timestamp)> + '_ {
        self.durations.iter().flat_map(|(origin, destinations)| {
            destinations.iter().map(move |(destination, &duration)| (&**origin, &**destination, duration))
        })
    }
}
