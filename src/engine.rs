use std::{num::NonZeroUsize, ops::Range, panic, thread, time::Instant};

use tracing::debug;

use crate::{
    partition::partition,
    record::{Record, RecordStore},
    table::{AggregateTable, StatKey},
};

/// Fold every reading of `records` into a fresh private table
pub fn aggregate_partition(records: &[Record]) -> AggregateTable<'_> {
    let mut table = AggregateTable::new();
    for record in records {
        for (sensor, value) in record.readings() {
            let key = StatKey {
                device: record.device(),
                year: record.year,
                month: record.month,
                sensor,
            };
            table.upsert(key, value);
        }
    }
    table
}

/// Fold worker tables into one global table, in the order given
pub fn merge<'a, I>(tables: I) -> AggregateTable<'a>
where
    I: IntoIterator<Item = AggregateTable<'a>>,
{
    let mut global = AggregateTable::new();
    for local in tables {
        for (key, stat) in local {
            global.upsert_stat(key, &stat);
        }
    }
    global
}

fn run_worker<'a>(id: usize, store: &'a RecordStore, range: Range<usize>) -> AggregateTable<'a> {
    let start = Instant::now();
    let len = range.len();
    let table = aggregate_partition(store.range(range));
    debug!(
        worker = id,
        records = len,
        entries = table.len(),
        "worker done elapsed={:.2}ms",
        start.elapsed().as_secs_f64() * 1000.
    );
    table
}

/// Aggregate the whole store with `workers` threads.
///
/// Each thread owns one partition and one private table. The calling thread
/// joins every worker before merging, so the global table is never shared.
pub fn aggregate(store: &RecordStore, workers: NonZeroUsize) -> AggregateTable<'_> {
    let ranges = partition(store.len(), workers);

    let locals = thread::scope(|s| {
        let handles = ranges
            .into_iter()
            .enumerate()
            .map(|(id, range)| s.spawn(move || run_worker(id, store, range)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
            .collect::<Vec<_>>()
    });

    let start = Instant::now();
    let global = merge(locals);
    debug!(
        entries = global.len(),
        "merge done elapsed={:.2}ms",
        start.elapsed().as_secs_f64() * 1000.
    );
    global
}
