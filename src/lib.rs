pub mod config;
pub mod engine;
pub mod error;
pub mod job;
pub mod parse;
pub mod partition;
pub mod record;
pub mod report;
pub mod table;

#[cfg(test)]
mod test;

pub use config::{Config, OutputOrder, YearMonth};
pub use engine::{aggregate, aggregate_partition, merge};
pub use error::{Error, RecordError};
pub use job::{run, JobSummary};
pub use parse::{load, parse_records, ParseOutcome};
pub use partition::partition;
pub use record::{Reading, Record, RecordStore, Sensor, SENSOR_COUNT};
pub use report::{echo_rows, write_rows, Row};
pub use table::{AggregateTable, StatKey};

/// Running statistic of one (device, month, sensor) series.
///
/// The sum is kept in `Reading` fixed point, so folding partial statistics in
/// any grouping gives the same result as a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub min: Reading,
    pub max: Reading,
    pub sum: i128,
    pub count: u64,
}

impl Stat {
    pub fn new(value: Reading) -> Self {
        Self {
            min: value,
            max: value,
            sum: value.scaled() as i128,
            count: 1,
        }
    }

    pub fn update(&mut self, value: Reading) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value.scaled() as i128;
        self.count += 1;
    }

    /// Fold another partial statistic of the same key into this one
    pub fn merge(&mut self, other: &Stat) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn mean(&self) -> f64 {
        self.sum as f64 / (self.count as f64 * Reading::SCALE as f64)
    }
}
