use std::{
    ffi::OsString,
    fmt, fs,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    config::{OutputOrder, YearMonth},
    error::{Error, Result},
    record::Sensor,
    table::AggregateTable,
};

pub const HEADER: &str = "dispositivo;ano-mes;sensor;maximo;media;minimo";

/// Printed above the report when it is echoed to the console
pub const ECHO_BANNER: &str = "Resultado:";

/// One output line: max, mean and min of a (device, month, sensor) series
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub device: &'a str,
    pub period: YearMonth,
    pub sensor: Sensor,
    pub max: f64,
    pub mean: f64,
    pub min: f64,
}

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{:.2};{:.2};{:.2}",
            self.device, self.period, self.sensor, self.max, self.mean, self.min
        )
    }
}

/// Rows of the finished table, in table order unless sorting was requested
pub fn rows<'a>(table: &AggregateTable<'a>, order: OutputOrder) -> Vec<Row<'a>> {
    let mut entries = table.iter().collect::<Vec<_>>();
    if order == OutputOrder::Sorted {
        entries.sort_unstable_by_key(|(key, _)| **key);
    }
    entries
        .into_iter()
        .map(|(key, stat)| Row {
            device: key.device,
            period: YearMonth::new(key.year, key.month),
            sensor: key.sensor,
            max: stat.max.to_f64(),
            mean: stat.mean(),
            min: stat.min.to_f64(),
        })
        .collect()
}

pub fn write_rows<W: Write>(mut w: W, rows: &[Row<'_>]) -> io::Result<()> {
    writeln!(w, "{}", HEADER)?;
    for row in rows {
        writeln!(w, "{}", row)?;
    }
    w.flush()
}

/// Console rendering of the report: a banner line, then the file contents
pub fn echo_rows<W: Write>(mut w: W, rows: &[Row<'_>]) -> io::Result<()> {
    writeln!(w, "{}", ECHO_BANNER)?;
    write_rows(w, rows)
}

/// Write `rows` to `path`.
///
/// The file is first written next to its destination and renamed into place,
/// so a failure never leaves a truncated report behind.
pub fn write_report(path: &Path, rows: &[Row<'_>]) -> Result<()> {
    let tmp_path = tmp_path(path);
    let file = File::create(&tmp_path).map_err(|source| Error::OutputOpen {
        path: path.to_owned(),
        source,
    })?;

    let written = write_rows(BufWriter::new(file), rows).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::OutputWrite {
            path: path.to_owned(),
            source,
        });
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record::Reading, table::StatKey, Stat};

    fn key(device: &str, month: u8, sensor: Sensor) -> StatKey<'_> {
        StatKey {
            device,
            year: 2024,
            month,
            sensor,
        }
    }

    #[test]
    fn test_row_format() {
        let row = Row {
            device: "B",
            period: YearMonth::new(2024, 3),
            sensor: Sensor::Temperature,
            max: 3.,
            mean: 2.,
            min: 1.,
        };
        assert_eq!(row.to_string(), "B;2024-03;temperatura;3.00;2.00;1.00");

        let row = Row {
            device: "lab",
            period: YearMonth::new(987, 11),
            sensor: Sensor::Etvoc,
            max: 1.005,
            mean: 2. / 3.,
            min: -0.126,
        };
        assert_eq!(row.to_string(), "lab;0987-11;etvoc;1.00;0.67;-0.13");
    }

    #[test]
    fn test_rows_order() {
        let mut table = AggregateTable::new();
        let r = Reading::from_f64;
        table.upsert(key("b", 4, Sensor::Noise), r(1.));
        table.upsert(key("a", 5, Sensor::Humidity), r(2.));
        table.upsert(key("a", 5, Sensor::Temperature), r(3.));
        table.upsert(key("a", 4, Sensor::Eco2), r(4.));

        fn names(rows: Vec<Row<'_>>) -> Vec<String> {
            rows.iter()
                .map(|r| format!("{}/{}/{}", r.device, r.period, r.sensor))
                .collect()
        }
        assert_eq!(
            names(rows(&table, OutputOrder::Insertion)),
            ["b/2024-04/ruido", "a/2024-05/umidade", "a/2024-05/temperatura", "a/2024-04/eco2"]
        );
        assert_eq!(
            names(rows(&table, OutputOrder::Sorted)),
            ["a/2024-04/eco2", "a/2024-05/temperatura", "a/2024-05/umidade", "b/2024-04/ruido"]
        );
    }

    #[test]
    fn test_mean() {
        let mut table = AggregateTable::new();
        table.upsert_stat(
            key("x", 3, Sensor::Luminosity),
            &Stat {
                min: Reading::from_f64(1.),
                max: Reading::from_f64(10.),
                sum: 200_000,
                count: 8,
            },
        );
        let rows = rows(&table, OutputOrder::Insertion);
        assert_eq!(rows[0].mean, 2.5);
        assert_eq!(rows[0].min, 1.);
        assert_eq!(rows[0].max, 10.);
    }

    #[test]
    fn test_echo_banner() {
        let rows = [Row {
            device: "B",
            period: YearMonth::new(2024, 3),
            sensor: Sensor::Noise,
            max: 2.,
            mean: 1.5,
            min: 1.,
        }];
        let mut out = vec![];
        echo_rows(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Resultado:\n\
             dispositivo;ano-mes;sensor;maximo;media;minimo\n\
             B;2024-03;ruido;2.00;1.50;1.00\n"
        );
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumo.csv");
        let rows = [Row {
            device: "B",
            period: YearMonth::new(2024, 3),
            sensor: Sensor::Humidity,
            max: 5.,
            mean: 5.,
            min: 5.,
        }];
        write_report(&path, &rows).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "dispositivo;ano-mes;sensor;maximo;media;minimo\nB;2024-03;umidade;5.00;5.00;5.00\n"
        );
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_write_report_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("resumo.csv");
        assert!(matches!(
            write_report(&path, &[]),
            Err(Error::OutputOpen { .. })
        ));
    }
}
