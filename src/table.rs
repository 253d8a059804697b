//! Tabular results shared by every aggregation and exporter.
//!
//! A [`Table`] has named index columns (text such as log name, date or
//! period) followed by numeric value columns whose headers may have
//! several levels, e.g. `Leq` / `63`.

use crate::constants::HEADER_SEPARATOR;
use serde::Serialize;
use std::fmt;

/// Multi-level column header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnKey(Vec<String>);

impl ColumnKey {
    /// Create a header from its levels, outermost first.
    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(levels.into_iter().map(Into::into).collect())
    }

    /// Create a single-level header.
    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Header levels, outermost first.
    pub fn levels(&self) -> &[String] {
        &self.0
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Level `i`, or an empty string when the header is shallower.
    pub fn level(&self, i: usize) -> &str {
        self.0.get(i).map_or("", String::as_str)
    }

    /// Join the non-empty levels with `separator`.
    pub fn flattened(&self, separator: &str) -> String {
        self.0
            .iter()
            .filter(|level| !level.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flattened(HEADER_SEPARATOR))
    }
}

/// One table row: index labels then numeric values (`None` = missing).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Index labels, one per index column.
    pub index: Vec<String>,
    /// Values, one per value column.
    pub values: Vec<Option<f64>>,
}

/// An aggregation result.
///
/// An empty table is a legitimate result (for example Lmax spectra for
/// disabled evenings) and is distinct from an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    index_names: Vec<String>,
    columns: Vec<ColumnKey>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given index names and value columns.
    pub fn new<I, S>(index_names: I, columns: Vec<ColumnKey>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index_names: index_names.into_iter().map(Into::into).collect(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, index: Vec<String>, values: Vec<Option<f64>>) {
        debug_assert_eq!(index.len(), self.index_names.len());
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(Row { index, values });
    }

    /// Index column names.
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    /// Value column headers.
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Rows in output order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of header levels (at least one).
    pub fn header_depth(&self) -> usize {
        self.columns
            .iter()
            .map(ColumnKey::depth)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Position of a value column.
    pub fn column_position(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    /// Value at `row` in column `key`.
    pub fn value(&self, row: usize, key: &ColumnKey) -> Option<f64> {
        let col = self.column_position(key)?;
        self.rows.get(row).and_then(|r| r.values[col])
    }

    /// All values of column `key`, in row order.
    pub fn column_values(&self, key: &ColumnKey) -> Vec<Option<f64>> {
        self.column_position(key).map_or_else(Vec::new, |col| {
            self.rows.iter().map(|r| r.values[col]).collect()
        })
    }

    /// Rows whose index label in column `index_name` equals `label`.
    pub fn rows_where<'a>(
        &'a self,
        index_name: &str,
        label: &'a str,
    ) -> impl Iterator<Item = &'a Row> + 'a {
        let pos = self.index_names.iter().position(|n| n == index_name);
        self.rows
            .iter()
            .filter(move |r| pos.is_some_and(|p| r.index[p] == label))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(
            ["Period"],
            vec![ColumnKey::new(["Leq", "A"]), ColumnKey::new(["Leq", "63"])],
        );
        table.push_row(vec!["Daytime".into()], vec![Some(55.0), Some(60.1)]);
        table.push_row(vec!["Night-time".into()], vec![Some(42.5), None]);
        table
    }

    #[test]
    fn test_column_key_flattened_skips_empty_levels() {
        assert_eq!(ColumnKey::new(["Leq", "A"]).to_string(), "Leq | A");
        assert_eq!(ColumnKey::new(["Count", ""]).to_string(), "Count");
        assert_eq!(ColumnKey::single("Count").level(1), "");
    }

    #[test]
    fn test_value_lookup() {
        let table = sample();
        let key = ColumnKey::new(["Leq", "63"]);
        assert_eq!(table.value(0, &key), Some(60.1));
        assert_eq!(table.value(1, &key), None);
        assert_eq!(table.column_values(&key), vec![Some(60.1), None]);
        assert_eq!(table.header_depth(), 2);
    }

    #[test]
    fn test_rows_where() {
        let table = sample();
        assert_eq!(table.rows_where("Period", "Night-time").count(), 1);
        assert_eq!(table.rows_where("Log", "Night-time").count(), 0);
    }

    #[test]
    fn test_empty_table_is_not_an_error() {
        let table = Table::new(["Period"], vec![ColumnKey::single("Count")]);
        assert!(table.is_empty());
        assert_eq!(table.header_depth(), 1);
    }
}
