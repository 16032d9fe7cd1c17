//! Input loader for `|`-delimited device readings.
//!
//! Layout of each line after the header:
//! `id|device|count|YYYY-MM-DD[...]|temperature|humidity|luminosity|noise|eco2|etvoc`

use std::{fs::File, path::Path, time::Instant};

use memmap2::Mmap;
use time::{macros::format_description, Date};
use tracing::{debug, warn};

use crate::{
    config::YearMonth,
    error::{Error, RecordError, Result},
    record::{Reading, Record, RecordStore, SENSOR_COUNT},
};

const DELIMITER: char = '|';

#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub store: RecordStore,
    /// Malformed records dropped with a diagnostic
    pub skipped: usize,
    /// Well-formed records dated before the cutoff
    pub filtered: usize,
}

/// Map `path` and parse every record dated `since` or later
pub fn load(path: &Path, since: YearMonth) -> Result<ParseOutcome> {
    let start = Instant::now();
    let file = File::open(path).map_err(|source| Error::InputOpen {
        path: path.to_owned(),
        source,
    })?;
    let len = file
        .metadata()
        .map_err(|source| Error::InputOpen {
            path: path.to_owned(),
            source,
        })?
        .len();
    if len == 0 {
        return Err(Error::MissingHeader {
            path: path.to_owned(),
        });
    }
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| Error::InputOpen {
        path: path.to_owned(),
        source,
    })?;

    let outcome = parse_records(&mmap, since).ok_or_else(|| Error::MissingHeader {
        path: path.to_owned(),
    })?;
    debug!(
        records = outcome.store.len(),
        skipped = outcome.skipped,
        filtered = outcome.filtered,
        "load elapsed={:.2}ms buf={}",
        start.elapsed().as_secs_f64() * 1000.,
        mmap.len()
    );
    Ok(outcome)
}

/// Parse a whole input buffer, header included.
///
/// Returns `None` when there is no header line.
pub fn parse_records(buf: &[u8], since: YearMonth) -> Option<ParseOutcome> {
    if buf.is_empty() {
        return None;
    }
    let body = match buf.iter().position(|&c| c == b'\n') {
        Some(header_end) => &buf[header_end + 1..],
        None => &[],
    };

    let mut records = vec![];
    let mut skipped = 0;
    let mut filtered = 0;
    for (i, line) in body.split(|&c| c == b'\n').enumerate() {
        // header is line 1
        let line_no = i + 2;
        let parsed = std::str::from_utf8(line)
            .map_err(|_| RecordError::InvalidUtf8)
            .and_then(|line| {
                let line = line.trim_end();
                if line.is_empty() {
                    Ok(None)
                } else {
                    parse_line(line, since).map(Some)
                }
            });
        match parsed {
            Ok(None) => {}
            Ok(Some(Some(record))) => records.push(record),
            Ok(Some(None)) => filtered += 1,
            Err(err) => {
                warn!(
                    record = records.len() + 1,
                    line = line_no,
                    "{}, skipping record",
                    err
                );
                skipped += 1;
            }
        }
    }

    Some(ParseOutcome {
        store: RecordStore::new(records),
        skipped,
        filtered,
    })
}

/// Parse one data line. `Ok(None)` means the record predates `since`.
///
/// The device field is taken verbatim; date and sensor fields may carry
/// surrounding whitespace.
pub fn parse_line(line: &str, since: YearMonth) -> std::result::Result<Option<Record>, RecordError> {
    let mut fields = line.split(DELIMITER);
    let mut next_field = |name| {
        fields
            .next()
            .filter(|field| !field.is_empty())
            .ok_or(RecordError::MissingField(name))
    };

    next_field("id")?;
    let device = next_field("device")?;
    next_field("count")?;
    let date = parse_date(next_field("date")?.trim())?;

    let year = date.year();
    let month = u8::from(date.month());
    if YearMonth::new(year, month) < since {
        return Ok(None);
    }

    let mut readings = [Reading::default(); SENSOR_COUNT];
    for (index, reading) in readings.iter_mut().enumerate() {
        let value = fields
            .next()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or(RecordError::MissingSensor { index })?;
        *reading = Reading::parse(value).ok_or_else(|| RecordError::InvalidSensor {
            index,
            value: value.to_owned(),
        })?;
    }

    Ok(Some(Record::new(device, year, month, readings)))
}

/// Parse the leading `YYYY-MM-DD` of a date or timestamp field
fn parse_date(field: &str) -> std::result::Result<Date, RecordError> {
    let format = format_description!("[year]-[month]-[day]");
    let date = field.get(..10).unwrap_or(field);
    Date::parse(date, format).map_err(|_| RecordError::InvalidDate(field.to_owned()))
}
