//! Tabular projection of metrics results
//!
//! A [`MetricsTable`] has one column per flattened key and one row per
//! result. [`to_table`] produces the single-row table for one result; tables
//! for separately fetched objects can be stacked with [`MetricsTable::append`].

use crate::error::{AltmetricError, Result};
use crate::models::MetricsResult;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io;
use tracing::debug;

/// Rows of text cells under a shared set of column names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Project a metrics result into a one-row table
///
/// # Example
///
/// ```no_run
/// use altmetric_client::{AltmetricClient, Identifier, to_table};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = AltmetricClient::new();
///     let result = client
///         .fetch_metrics(&Identifier::doi("10.1038/480426a")?)
///         .await?;
///
///     let table = to_table(&result);
///     println!("{}", table.to_csv()?);
///     Ok(())
/// }
/// ```
pub fn to_table(result: &MetricsResult) -> MetricsTable {
    MetricsTable::from_result(result)
}

impl MetricsTable {
    pub fn from_result(result: &MetricsResult) -> Self {
        let (columns, row): (Vec<String>, Vec<String>) = result
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .unzip();

        Self {
            columns,
            rows: vec![row],
        }
    }

    /// Build a table from a serialized [`MetricsResult`]
    ///
    /// # Errors
    ///
    /// Returns `AltmetricError::NotAMetricsResult` when the value was not
    /// produced by serializing a `MetricsResult`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let result = MetricsResult::from_json_value(value)?;
        Ok(Self::from_result(&result))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of the first row under `column`
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cell(0, column)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(index))
            .map(String::as_str)
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Stack another table's rows under this one
    ///
    /// Columns missing from this table are added at the end; cells with no
    /// value in a given row are left empty. A column name repeated within a
    /// table (colliding flattened paths) is matched occurrence by occurrence.
    pub fn append(&mut self, other: MetricsTable) {
        let mut mapping = Vec::with_capacity(other.columns.len());
        for (position, column) in other.columns.iter().enumerate() {
            let occurrence = other.columns[..position]
                .iter()
                .filter(|c| *c == column)
                .count();
            let existing = self
                .columns
                .iter()
                .enumerate()
                .filter(|(_, c)| *c == column)
                .nth(occurrence)
                .map(|(index, _)| index);

            let index = match existing {
                Some(index) => index,
                None => {
                    self.columns.push(column.clone());
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.columns.len() - 1
                }
            };
            mapping.push(index);
        }

        for cells in other.rows {
            let mut row = vec![String::new(); self.columns.len()];
            for (index, cell) in mapping.iter().zip(cells) {
                row[*index] = cell;
            }
            self.rows.push(row);
        }

        debug!(
            columns = self.columns.len(),
            rows = self.rows.len(),
            "Appended table rows"
        );
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush().map_err(|err| AltmetricError::CsvError {
            message: err.to_string(),
        })?;
        Ok(())
    }

    /// Render the table as a CSV string
    pub fn to_csv(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|err| AltmetricError::CsvError {
            message: err.to_string(),
        })
    }
}

impl From<&MetricsResult> for MetricsTable {
    fn from(result: &MetricsResult) -> Self {
        Self::from_result(result)
    }
}

impl fmt::Display for MetricsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_row(f, &self.columns, &widths)?;
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", separator.join("-+-"))?;
        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(f, "{}", line.trim_end())
}
