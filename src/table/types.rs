//! The [`Table`] type.

use super::resolve::{parse_number, resolve_column};
use crate::error::{Error, Result};

/// Named columns over row-major string cells.
///
/// Rows keep the order they were inserted in; every derived table
/// (filtered, ranked) preserves the relative order of surviving rows.
///
/// # Examples
///
/// ```
/// use u_mrprank::table::Table;
///
/// let table = Table::from_rows(
///     vec!["model".into(), "f1_score".into()],
///     vec![
///         vec!["resnet".into(), "0.8".into()],
///         vec!["vit".into(), "0.6".into()],
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.numeric_column(1), vec![Some(0.8), Some(0.6)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table, checking that every row has one cell per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// A single row, if in range.
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// The cell at `(row, col)`. Panics when out of range, like slice indexing.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    /// Index of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of the column matching `key` through the resolver.
    pub fn resolve_column(&self, key: &str) -> Option<usize> {
        resolve_column(&self.columns, key)
    }

    /// Iterates over the cells of one column.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[col].as_str())
    }

    /// Coerces a column to numbers; non-coercible cells become `None`.
    pub fn numeric_column(&self, col: usize) -> Vec<Option<f64>> {
        self.column_values(col).map(parse_number).collect()
    }

    /// Whether at least one cell of the column coerces to a number.
    pub fn is_numeric(&self, col: usize) -> bool {
        self.column_values(col).any(|cell| parse_number(cell).is_some())
    }

    /// Builds a new table from the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Keeps the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }

    /// Sets a column, replacing an existing one with the same name.
    ///
    /// `values` must have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(Error::LengthMismatch {
                what: "column",
                expected: self.rows.len(),
                got: values.len(),
            });
        }
        match self.column_index(name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Sets a numeric column, formatting each value with `Display`.
    pub fn set_numeric_column(&mut self, name: &str, values: &[f64]) -> Result<()> {
        self.set_column(name, values.iter().map(|v| v.to_string()).collect())
    }
}
