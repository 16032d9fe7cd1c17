//! One-shot batch job: load, partition, aggregate in parallel, merge, report.

use std::{io, path::PathBuf, time::Instant};

use tracing::info;

use crate::{
    config::Config,
    engine::aggregate,
    error::{Error, Result},
    parse::load,
    report,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub records: usize,
    pub skipped: usize,
    pub filtered: usize,
    pub rows: usize,
}

pub fn run(config: &Config) -> Result<JobSummary> {
    let start = Instant::now();
    info!(input = %config.input.display(), "loading records");
    let outcome = load(&config.input, config.since)?;
    if outcome.store.is_empty() {
        return Err(Error::NoRecords {
            since: config.since,
        });
    }

    info!(
        records = outcome.store.len(),
        skipped = outcome.skipped,
        filtered = outcome.filtered,
        workers = config.workers.get(),
        "aggregating"
    );
    let table = aggregate(&outcome.store, config.workers);

    let rows = report::rows(&table, config.order);
    report::write_report(&config.output, &rows)?;
    if config.echo {
        report::echo_rows(io::stdout().lock(), &rows).map_err(|source| Error::OutputWrite {
            path: PathBuf::from("<stdout>"),
            source,
        })?;
    }

    info!(
        output = %config.output.display(),
        rows = rows.len(),
        "done elapsed={:.2}ms",
        start.elapsed().as_secs_f64() * 1000.
    );
    Ok(JobSummary {
        records: outcome.store.len(),
        skipped: outcome.skipped,
        filtered: outcome.filtered,
        rows: rows.len(),
    })
}
