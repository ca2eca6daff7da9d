use crate::error::{ParseError, ParseErrorKind};
use crate::network::Timestamp;

/// Lines that carry no record: blank lines and `#` comments.
pub fn is_skippable(line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    line.trim().is_empty() || line.starts_with('#')
}

/// Splits a tab-separated record into exactly `N` fields.
pub fn split_fields<const N: usize>(line: &str, line_number: usize) -> Result<[&str; N], ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = [""; N];
    let mut found = 0;
    for field in line.split('\t') {
        if found < N {
            fields[found] = field;
        }
        found += 1;
    }
    if found != N {
        return Err(ParseError { line: line_number, kind: ParseErrorKind::FieldCount { expected: N, found } });
    }
    Ok(fields)
}

pub fn parse_name(field: &str, line_number: usize) -> Result<&str, ParseError> {
    let name = field.trim();
    if name.is_empty() {
        return Err(ParseError { line: line_number, kind: ParseErrorKind::EmptyName });
    }
    Ok(name)
}

pub fn parse_time(field: &str, line_number: usize) -> Result<Timestamp, ParseError> {
    match field.trim().parse::<Timestamp>() {
        // MAX is reserved for "unreached".
        Ok(time) if time != Timestamp::MAX => Ok(time),
        _ => Err(ParseError { line: line_number, kind: ParseErrorKind::InvalidTime(field.to_owned()) }),
    }
}
