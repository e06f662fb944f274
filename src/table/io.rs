//! CSV and JSON-record conversion for [`Table`].

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde_json::{Map, Number, Value};

use super::resolve::parse_number;
use super::types::Table;
use crate::error::{Error, Result};

impl Table {
    /// Parses CSV with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns = csv.headers()?.iter().map(str::to_string).collect();
        let mut table = Table::new(columns);
        for record in csv.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect())?;
        }
        Ok(table)
    }

    /// Reads a CSV file with a header row.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Writes the table as CSV, header first.
    ///
    /// An empty table still writes its header row.
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.columns())?;
        for row in self.rows() {
            csv.write_record(row)?;
        }
        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Writes the table to a CSV file, creating parent directories.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = create_file(path)?;
        self.to_csv_writer(file)
    }

    /// Converts rows into JSON objects keyed by column name.
    ///
    /// Numeric cells become numbers, empty cells `null`, the rest strings.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows()
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .columns()
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.clone(), cell_to_json(cell)))
                    .collect();
                Value::Object(object)
            })
            .collect()
    }

    /// Writes [`Table::to_records`] as a pretty-printed JSON array.
    pub fn write_records(&self, path: &Path) -> Result<()> {
        let file = create_file(path)?;
        serde_json::to_writer_pretty(file, &self.to_records())?;
        Ok(())
    }
}

fn cell_to_json(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match parse_number(cell).and_then(Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(cell.to_string()),
    }
}

pub(crate) fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::WriteFile {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    File::create(path).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
