use std::{fmt, num::NonZeroUsize, path::PathBuf, str::FromStr, thread};

/// Calendar month, ordered by year then month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u8,
}

impl YearMonth {
    pub const fn new(year: i32, month: u8) -> Self {
        Self { year, month }
    }
}

impl Default for YearMonth {
    fn default() -> Self {
        Self::new(2024, 3)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("expected YYYY-MM, got {:?}", s);
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u8>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self::new(year, month))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputOrder {
    /// Order in which keys first reached the global table
    #[default]
    Insertion,
    /// Sorted by device, month and sensor
    Sorted,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub workers: NonZeroUsize,
    /// Records dated before this month are ignored
    pub since: YearMonth,
    pub order: OutputOrder,
    /// Also print the rows to stdout
    pub echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("devices.csv"),
            output: PathBuf::from("resumo.csv"),
            workers: default_workers(),
            since: YearMonth::default(),
            order: OutputOrder::default(),
            echo: true,
        }
    }
}

pub fn default_workers() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
