//! Labeled single-column result table, exported as CSV.
use custom_error::custom_error;
use log::info;
use tabled::{builder::Builder, settings::Style};

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

custom_error! {
    /// Error while writing or reading a result table
    pub TableError
    /// When the CSV layer fails
    Csv{/// underlying CSV error
        source: csv::Error} = "could not process the result table: {source}",
    /// When the output cannot be flushed
    Io{/// underlying I/O error
        source: io::Error} = "could not write the result table: {source}",
    /// When a CSV file does not hold a result table
    Malformed{/// what is wrong with the file
        reason: String} = "malformed result table: {reason}"
}

/// Ordered rows of `(label, value)` under a single named column.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantumYieldTable {
    column: String,
    rows: Vec<(String, f64)>,
}

impl QuantumYieldTable {
    /// Empty table with the given column header
    pub fn new(column: &str) -> Self {
        QuantumYieldTable {
            column: column.to_owned(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    pub fn push(&mut self, label: &str, value: f64) {
        self.rows.push((label.to_owned(), value));
    }

    /// Column header
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[(String, f64)] {
        &self.rows
    }

    /// Value of the first row labeled `label`
    pub fn get(&self, label: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|(row, _)| row == label)
            .map(|(_, value)| *value)
    }

    /// Write the table as comma-separated values.
    ///
    /// The header is an empty cell followed by the column name; each row is the
    /// label followed by the value in shortest round-trip form. NaN is written as
    /// an empty cell.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["", self.column.as_str()])?;
        for (label, value) in self.rows.iter() {
            let cell = if value.is_nan() {
                String::new()
            } else {
                value.to_string()
            };
            writer.write_record([label.as_str(), cell.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the table to a CSV file at `path`, replacing any previous content.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_csv(file)?;
        info!("wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Read back a table written by [`QuantumYieldTable::to_csv`].
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let mut reader = csv::Reader::from_path(path)?;
        let column = match reader.headers()?.get(1) {
            Some(column) => column.to_owned(),
            None => {
                return Err(TableError::Malformed {
                    reason: String::from("header has no value column"),
                })
            }
        };
        let mut table = QuantumYieldTable::new(&column);
        for record in reader.records() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(label), Some("")) => table.push(label, f64::NAN),
                (Some(label), Some(value)) => {
                    let value = value.parse::<f64>().map_err(|e| TableError::Malformed {
                        reason: format!("value of {} is not a number: {}", label, e),
                    })?;
                    table.push(label, value);
                }
                _ => {
                    return Err(TableError::Malformed {
                        reason: String::from("row without a value"),
                    })
                }
            }
        }
        Ok(table)
    }
}

impl fmt::Display for QuantumYieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(vec![String::new(), self.column.to_owned()]);
        for (label, value) in self.rows.iter() {
            builder.push_record(vec![label.to_owned(), format!("{:.6}", value)]);
        }
        let mut table = builder.build();
        table.with(Style::blank());
        write!(f, "{}", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_rows() -> QuantumYieldTable {
        let mut table = QuantumYieldTable::new("Quantum Yield");
        table.push("Original Model", 0.08123456789012345);
        table.push("Created Diel Model", 1. / 3.);
        table
    }

    #[test]
    fn rows_keep_their_order() {
        let table = two_rows();
        let labels: Vec<&str> = table.rows().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["Original Model", "Created Diel Model"]);
        assert_eq!(table.column(), "Quantum Yield");
        assert_eq!(table.get("Created Diel Model"), Some(1. / 3.));
        assert_eq!(table.get("Night Model"), None);
    }

    #[test]
    fn csv_layout() {
        let mut table = QuantumYieldTable::new("Quantum Yield");
        table.push("Original Model", 0.25);
        table.push("Created Diel Model", 0.2);
        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            ",Quantum Yield\nOriginal Model,0.25\nCreated Diel Model,0.2\n"
        );
    }

    #[test]
    fn nan_is_an_empty_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("QY_Tomato22.csv");
        let mut table = QuantumYieldTable::new("Quantum Yield");
        table.push("Original Model", f64::NAN);
        table.push("Created Diel Model", f64::INFINITY);
        table.to_csv(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            ",Quantum Yield\nOriginal Model,\nCreated Diel Model,inf\n"
        );
        let read = QuantumYieldTable::from_csv(&path).unwrap();
        assert!(read.get("Original Model").unwrap().is_nan());
        assert_eq!(read.get("Created Diel Model"), Some(f64::INFINITY));
    }

    #[test]
    fn csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("QY_Tomato22.csv");
        let table = two_rows();
        table.to_csv(&path).unwrap();
        let read = QuantumYieldTable::from_csv(&path).unwrap();
        assert_eq!(read.column(), "Quantum Yield");
        assert_eq!(read.rows().len(), 2);
        for ((label, value), (read_label, read_value)) in table.rows().iter().zip(read.rows()) {
            assert_eq!(label, read_label);
            assert_abs_diff_eq!(*value, *read_value, epsilon = 1e-9);
        }
    }

    #[test]
    fn non_numeric_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, ",Quantum Yield\nOriginal Model,high\n").unwrap();
        assert!(matches!(
            QuantumYieldTable::from_csv(&path),
            Err(TableError::Malformed { .. })
        ));
    }

    #[test]
    fn display_lists_every_row() {
        let shown = two_rows().to_string();
        assert!(shown.contains("Quantum Yield"));
        assert!(shown.contains("Original Model"));
        assert!(shown.contains("0.081235"));
        assert!(shown.contains("0.333333"));
    }
}
