use std::{fmt, ops::Range};

pub const SENSOR_COUNT: usize = 6;

/// Device identifiers are kept to at most this many bytes
pub const DEVICE_MAX_LEN: usize = 63;

/// Sensor channels, in the column order of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sensor {
    Temperature,
    Humidity,
    Luminosity,
    Noise,
    Eco2,
    Etvoc,
}

impl Sensor {
    pub const ALL: [Sensor; SENSOR_COUNT] = [
        Sensor::Temperature,
        Sensor::Humidity,
        Sensor::Luminosity,
        Sensor::Noise,
        Sensor::Eco2,
        Sensor::Etvoc,
    ];

    const NAMES: [&'static str; SENSOR_COUNT] = [
        "temperatura",
        "umidade",
        "luminosidade",
        "ruido",
        "eco2",
        "etvoc",
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sensor value in fixed point, `SCALE` units per whole unit.
///
/// Readings are summed as integers so a series total does not depend on the
/// order or grouping of the additions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reading(i64);

impl Reading {
    /// Decimal digits kept after the point
    pub const DIGITS: usize = 4;
    pub const SCALE: i64 = 10_000;

    pub const fn from_scaled(scaled: i64) -> Self {
        Self(scaled)
    }

    pub const fn scaled(self) -> i64 {
        self.0
    }

    /// Nearest representable reading, ties away from zero
    pub fn from_f64(value: f64) -> Self {
        Self((value * Self::SCALE as f64).round() as i64)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Parse a plain decimal such as `-12.5` or `400`.
    ///
    /// Digits beyond `DIGITS` after the point are rounded half away from zero.
    /// Exponents, `inf` and `NaN` are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let (negative, digits) = match s.as_bytes().first()? {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if int.is_empty() && frac.is_empty() {
            return None;
        }
        if !int.bytes().chain(frac.bytes()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let mut scaled = 0i64;
        for c in int.bytes() {
            scaled = scaled.checked_mul(10)?.checked_add((c - b'0') as i64)?;
        }
        scaled = scaled.checked_mul(Self::SCALE)?;
        let mut unit = Self::SCALE;
        for c in frac.bytes().take(Self::DIGITS) {
            unit /= 10;
            scaled = scaled.checked_add((c - b'0') as i64 * unit)?;
        }
        if frac.as_bytes().get(Self::DIGITS).is_some_and(|&c| c >= b'5') {
            scaled = scaled.checked_add(1)?;
        }

        Some(Self(if negative { -scaled } else { scaled }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    device: String,
    pub year: i32,
    pub month: u8,
    pub readings: [Reading; SENSOR_COUNT],
}

impl Record {
    pub fn new(device: &str, year: i32, month: u8, readings: [Reading; SENSOR_COUNT]) -> Self {
        Self {
            device: truncate(device, DEVICE_MAX_LEN).to_owned(),
            year,
            month,
            readings,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Readings paired with their channel
    pub fn readings(&self) -> impl Iterator<Item = (Sensor, Reading)> + '_ {
        Sensor::ALL.into_iter().zip(self.readings)
    }
}

/// Cut `s` to at most `max_len` bytes without splitting a character
fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Read-only set of parsed records shared by every worker
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn range(&self, range: Range<usize>) -> &[Record] {
        &self.records[range]
    }
}

impl FromIterator<Record> for RecordStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
