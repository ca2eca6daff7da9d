//! Builds a [`RouteGraph`] from a carrier schedule, checking every leg against the timetable and
//! against the carrier's previous leg as it streams in.

use std::fmt::Display;
use std::io::BufRead;

use crate::config::RouteConfig;
use crate::error::{Error, ParseError, ParseErrorKind, Result};
use crate::network::{CarrierId, Leg, LocationIndex, RouteGraph, Timestamp};
use crate::timetable::TimetableValidator;
use crate::utils;

/// One line of the schedule, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegRecord {
    pub carrier: String,
    pub origin: String,
    pub departure_time: Timestamp,
    pub destination: String,
    pub arrival_time: Timestamp,
}

impl LegRecord {
    /// Parses `<carrier>\t<origin>\t<departure>\t<destination>\t<arrival>`.
    pub fn parse(line: &str, line_number: usize) -> Result<Self, ParseError> {
        let [carrier, origin, departure, destination, arrival] = utils::split_fields::<5>(line, line_number)?;
        let record = Self {
            carrier: utils::parse_name(carrier, line_number)?.to_owned(),
            origin: utils::parse_name(origin, line_number)?.to_owned(),
            departure_time: utils::parse_time(departure, line_number)?,
            destination: utils::parse_name(destination, line_number)?.to_owned(),
            arrival_time: utils::parse_time(arrival, line_number)?,
        };
        // Every leg takes time, including the unchecked first leg of a route.
        if record.arrival_time <= record.departure_time {
            let kind = ParseErrorKind::NotAfterDeparture { departure: record.departure_time, arrival: record.arrival_time };
            return Err(ParseError { line: line_number, kind });
        }
        Ok(record)
    }
}

impl Display for LegRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {} {}", self.carrier, self.origin, self.departure_time, self.destination, self.arrival_time)
    }
}

/// Which rule a leg broke relative to the previous leg of its carrier.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatViolation {
    #[error("travel time does not match the timetable duration of {expected}")]
    Duration { expected: Timestamp },
    #[error("no timetable duration for this pair of locations")]
    MissingBaseline,
    #[error("layover too short, earliest departure is {earliest}")]
    Layover { earliest: Timestamp },
    #[error("does not depart from where the previous leg arrived")]
    Continuity,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("leg on line {line} is not well-formed ({violation}): {record}")]
pub struct FormatError {
    pub line: usize,
    pub record: LegRecord,
    pub violation: FormatViolation,
}

/// The last accepted leg, carried from one record to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousLeg {
    pub carrier: CarrierId,
    pub destination: LocationIndex,
    pub arrival_time: Timestamp,
}

/// A leg after name resolution, ready to be checked.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLeg<'r> {
    pub carrier: CarrierId,
    pub origin: LocationIndex,
    pub destination: LocationIndex,
    pub origin_name: &'r str,
    pub destination_name: &'r str,
    pub departure_time: Timestamp,
    pub arrival_time: Timestamp,
}

/// Checks `leg` as the continuation of `previous`. A leg that starts a new carrier's route is
/// always accepted.
pub fn validate_leg(
    previous: Option<&PreviousLeg>,
    leg: &ResolvedLeg,
    timetable: &TimetableValidator,
    config: &RouteConfig,
) -> Result<(), FormatViolation> {
    let previous = match previous {
        Some(previous) if previous.carrier == leg.carrier => previous,
        _ => return Ok(()),
    };

    let expected = timetable
        .duration(leg.origin_name, leg.destination_name)
        .ok_or(FormatViolation::MissingBaseline)?;
    if leg.departure_time.checked_add(expected) != Some(leg.arrival_time) {
        return Err(FormatViolation::Duration { expected });
    }
    let earliest = previous.arrival_time.saturating_add(config.min_layover);
    if leg.departure_time < earliest {
        return Err(FormatViolation::Layover { earliest });
    }
    if leg.origin != previous.destination {
        return Err(FormatViolation::Continuity);
    }
    Ok(())
}

pub struct ScheduleIngester<'a> {
    timetable: &'a TimetableValidator,
    config: RouteConfig,
    graph: RouteGraph,
}

impl<'a> ScheduleIngester<'a> {
    pub fn new(timetable: &'a TimetableValidator, config: RouteConfig) -> Self {
        Self { timetable, config, graph: RouteGraph::new() }
    }

    /// Consumes the whole schedule. Any malformed or invalid leg aborts ingestion and no graph is
    /// returned.
    pub fn ingest(mut self, reader: impl BufRead) -> Result<RouteGraph> {
        let mut previous: Option<PreviousLeg> = None;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;
            if utils::is_skippable(&line) {
                continue;
            }
            let record = LegRecord::parse(&line, line_number).map_err(Error::Schedule)?;
            previous = Some(self.accept(previous, record, line_number)?);
        }

        self.graph.register_locations();
        self.graph.print_stats();
        Ok(self.graph)
    }

    fn accept(&mut self, previous: Option<PreviousLeg>, record: LegRecord, line: usize) -> Result<PreviousLeg, FormatError> {
        let origin = self.graph.add_location(&record.origin);
        let destination = self.graph.add_location(&record.destination);
        let carrier = self.graph.carriers.add(&record.carrier);

        let leg = ResolvedLeg {
            carrier,
            origin,
            destination,
            origin_name: &record.origin,
            destination_name: &record.destination,
            departure_time: record.departure_time,
            arrival_time: record.arrival_time,
        };
        if let Err(violation) = validate_leg(previous.as_ref(), &leg, self.timetable, &self.config) {
            return Err(FormatError { line, record, violation });
        }

        self.graph.add_leg(origin, destination, Leg::new(carrier, record.departure_time, record.arrival_time));
        log::trace!("Accepted leg {record}");
        Ok(PreviousLeg { carrier, destination, arrival_time: record.arrival_time })
    }
}

/// Reads the timetable and the schedule and builds the validated network.
pub fn load_network(timetable: impl BufRead, schedule: impl BufRead, config: RouteConfig) -> Result<RouteGraph> {
    let timetable = TimetableValidator::from_reader(timetable)?;
    ScheduleIngester::new(&timetable, config).ingest(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timetable() -> TimetableValidator {
        TimetableValidator::from_reader("A\tB\t4\nB\tC\t6\nA\tC\t9\n".as_bytes()).unwrap()
    }

    fn ingest(schedule: &str) -> Result<RouteGraph> {
        ScheduleIngester::new(&timetable(), RouteConfig::default()).ingest(schedule.as_bytes())
    }

    fn violation(schedule: &str) -> (usize, FormatViolation) {
        match ingest(schedule) {
            Err(Error::Format(err)) => (err.line, err.violation),
            Err(err) => panic!("unexpected error: {err}"),
            Ok(_) => panic!("schedule should have been rejected"),
        }
    }

    #[test]
    fn builds_graph_from_valid_schedule() {
        let graph = ingest("# round trip\nX\tA\t0\tB\t4\n\nX\tB\t10\tA\t14\nY\tB\t0\tC\t6\n").unwrap();

        assert_eq!(graph.num_locations(), 3);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.num_legs(), 3);
        assert_eq!(graph.num_carriers(), 2);

        let a = graph.location_idx("A").unwrap();
        let b = graph.location_idx("B").unwrap();
        let legs = graph.edge_between(a, b).unwrap().legs();
        assert_eq!(legs.len(), 1);
        assert_eq!((legs[0].departure_time, legs[0].arrival_time), (0, 4));
        assert_eq!(legs[0].carrier.map(|id| graph.carriers.name(id)), Some("X"));
    }

    #[test]
    fn first_leg_of_a_route_is_not_checked() {
        // Wrong duration, but it is the first leg flown by Y.
        let graph = ingest("X\tA\t0\tB\t4\nY\tA\t0\tB\t100\n").unwrap();
        assert_eq!(graph.num_legs(), 2);
    }

    #[test]
    fn rejects_legs_that_do_not_move_forward_in_time() {
        // First leg of Y, so only the record itself can catch it.
        match ingest("X\tA\t0\tB\t4\nY\tC\t20\tA\t1\n") {
            Err(Error::Schedule(err)) => {
                assert_eq!(err.line, 2);
                assert_eq!(err.kind, ParseErrorKind::NotAfterDeparture { departure: 20, arrival: 1 });
            }
            _ => panic!("backwards leg should be rejected"),
        }

        let err = LegRecord::parse("X\tA\t5\tB\t5", 1).unwrap_err();
        assert_eq!(err.to_string(), "line 1: arrival at 5 is not after departure at 5");
    }

    #[test]
    fn legs_of_one_edge_accumulate() {
        let graph = ingest("X\tA\t0\tB\t4\nY\tA\t2\tB\t6\nZ\tA\t30\tB\t34\n").unwrap();
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.num_legs(), 3);
    }

    #[test]
    fn rejects_wrong_duration() {
        assert_eq!(violation("X\tA\t0\tB\t4\nX\tB\t10\tA\t15\n"), (2, FormatViolation::Duration { expected: 4 }));
    }

    #[test]
    fn rejects_short_layover() {
        assert_eq!(violation("X\tA\t0\tB\t4\nX\tB\t7\tA\t11\n"), (2, FormatViolation::Layover { earliest: 8 }));
    }

    #[test]
    fn accepts_exact_minimum_layover() {
        assert!(ingest("X\tA\t0\tB\t4\nX\tB\t8\tA\t12\n").is_ok());
    }

    #[test]
    fn rejects_discontinuous_route() {
        assert_eq!(violation("X\tA\t0\tB\t4\nX\tA\t10\tC\t19\n"), (2, FormatViolation::Continuity));
    }

    #[test]
    fn rejects_pair_missing_from_timetable() {
        assert_eq!(violation("X\tA\t0\tB\t4\nX\tB\t10\tD\t14\n"), (2, FormatViolation::MissingBaseline));
    }

    #[test]
    fn reports_line_numbers_including_skipped_lines() {
        let (line, _) = violation("X\tA\t0\tB\t4\n\n# comment\nX\tB\t10\tA\t15\n");
        assert_eq!(line, 4);
    }

    #[test]
    fn format_error_names_the_record() {
        let err = match ingest("X\tA\t0\tB\t4\nX\tB\t10\tA\t15\n") {
            Err(Error::Format(err)) => err,
            _ => panic!("expected a format error"),
        };
        assert_eq!(
            err.to_string(),
            "leg on line 2 is not well-formed (travel time does not match the timetable duration of 4): X B 10 A 15"
        );
    }

    #[test]
    fn malformed_record_is_a_parse_error() {
        assert!(matches!(ingest("X\tA\t0\tB\n"), Err(Error::Schedule(_))));
        assert!(matches!(ingest("X\tA\tnoon\tB\t4\n"), Err(Error::Schedule(_))));
    }

    #[test]
    fn validate_leg_checks_only_same_carrier() {
        let timetable = timetable();
        let config = RouteConfig::default();
        let previous = PreviousLeg { carrier: 0, destination: 1, arrival_time: 4 };
        let leg = ResolvedLeg {
            carrier: 1,
            origin: 5,
            destination: 6,
            origin_name: "Q",
            destination_name: "R",
            departure_time: 0,
            arrival_time: 1,
        };

        assert_eq!(validate_leg(Some(&previous), &leg, &timetable, &config), Ok(()));
        assert_eq!(validate_leg(None, &leg, &timetable, &config), Ok(()));
        let same_carrier = ResolvedLeg { carrier: 0, ..leg };
        assert_eq!(
            validate_leg(Some(&previous), &same_carrier, &timetable, &config),
            Err(FormatViolation::MissingBaseline)
        );
    }
}
