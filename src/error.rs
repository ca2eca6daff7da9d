use std::path::PathBuf;

use crate::dijkstra::ReachabilityError;
use crate::ingest::FormatError;
use crate::journey::JourneyError;
use crate::network::Timestamp;

/// A line of input that could not be read as a record.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid time {0:?}")]
    InvalidTime(String),
    #[error("empty name")]
    EmptyName,
    #[error("arrival at {arrival} is not after departure at {departure}")]
    NotAfterDeparture { departure: Timestamp, arrival: Timestamp },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: std::io::Error },
    #[error("malformed timetable, {0}")]
    Timetable(ParseError),
    #[error("malformed schedule, {0}")]
    Schedule(ParseError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Reachability(#[from] ReachabilityError),
    #[error(transparent)]
    Journey(#[from] JourneyError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError { line: 3, kind: ParseErrorKind::FieldCount { expected: 5, found: 2 } };
        assert_eq!(err.to_string(), "line 3: expected 5 tab-separated fields, found 2");

        let err = Error::Schedule(ParseError { line: 7, kind: ParseErrorKind::InvalidTime("x1".into()) });
        assert_eq!(err.to_string(), "malformed schedule, line 7: invalid time \"x1\"");

        let err = Error::Open {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot open missing.txt: not found");
    }
}
