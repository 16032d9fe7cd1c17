use std::num::NonZeroUsize;

use crate::{
    config::{OutputOrder, YearMonth},
    parse::parse_records,
    record::RecordStore,
    report::{rows, write_rows},
    table::AggregateTable,
};

struct Sample {
    name: &'static str,
    csv: &'static str,
    out: &'static str,
}

macro_rules! sample {
    ($name:literal) => {
        Sample {
            name: $name,
            csv: include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/tests/",
                concat!($name, ".csv")
            )),
            out: include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/tests/",
                concat!($name, ".out")
            )),
        }
    };
}

const SAMPLES: [Sample; 3] = [
    sample!("devices-basic"),
    sample!("devices-boundaries"),
    sample!("devices-months"),
];

const MAX_WORKERS: usize = 8;

/// Run `process` over every sample with 1 to `MAX_WORKERS` workers and compare
/// the rendered report with the expected output
pub fn correctness<F>(process: F)
where
    F: for<'a> Fn(&'a RecordStore, NonZeroUsize) -> AggregateTable<'a>,
{
    for sample in SAMPLES {
        let outcome = parse_records(sample.csv.as_bytes(), YearMonth::default()).unwrap();
        for workers in (1..=MAX_WORKERS).filter_map(NonZeroUsize::new) {
            println!("Sample {} workers={}", sample.name, workers);
            let table = process(&outcome.store, workers);
            let mut actual = vec![];
            write_rows(&mut actual, &rows(&table, OutputOrder::Insertion)).unwrap();
            assert_eq!(String::from_utf8(actual).unwrap(), sample.out);
        }
    }
}
