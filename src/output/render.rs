//! Rendering tables for the terminal, CSV consumers and JSON clients.

use crate::constants::HEADER_SEPARATOR;
use crate::error::{Error, Result};
use crate::export::{CsvOptions, write_sections, write_table};
use crate::table::{Row, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Decimals used for text output when none are configured.
const TEXT_DECIMALS: usize = 1;

/// Supported table output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned columns for the terminal.
    #[default]
    Text,
    /// Comma separated values.
    Csv,
    /// JSON document.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// JSON view of a table.
#[derive(Debug, Serialize)]
struct JsonTable<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    index: &'a [String],
    columns: Vec<String>,
    rows: &'a [Row],
}

impl<'a> JsonTable<'a> {
    fn new(title: Option<&'a str>, table: &'a Table) -> Self {
        Self {
            title,
            index: table.index_names(),
            columns: table
                .columns()
                .iter()
                .map(|c| c.flattened(HEADER_SEPARATOR))
                .collect(),
            rows: table.rows(),
        }
    }
}

/// Render one table.
pub fn render_table(table: &Table, format: OutputFormat, options: &CsvOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        OutputFormat::Text => out.extend_from_slice(text_table(table, options.decimals).as_bytes()),
        OutputFormat::Csv => write_table(&mut out, table, options)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &JsonTable::new(None, table))
                .map_err(|source| Error::JsonWrite { source })?;
            out.push(b'\n');
        }
    }
    Ok(out)
}

/// Render titled tables as one document.
///
/// CSV and text skip empty tables; JSON keeps them so clients see every title.
pub fn render_sections(
    sections: &[(&str, &Table)],
    format: OutputFormat,
    options: &CsvOptions,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        OutputFormat::Text => {
            let blocks: Vec<String> = sections
                .iter()
                .filter(|(_, table)| !table.is_empty())
                .map(|(title, table)| format!("{title}\n\n{}", text_table(table, options.decimals)))
                .collect();
            out.extend_from_slice(blocks.join("\n").as_bytes());
        }
        OutputFormat::Csv => write_sections(&mut out, sections, options)?,
        OutputFormat::Json => {
            let tables: Vec<JsonTable<'_>> = sections
                .iter()
                .map(|(title, table)| JsonTable::new(Some(title), table))
                .collect();
            serde_json::to_writer_pretty(&mut out, &tables)
                .map_err(|source| Error::JsonWrite { source })?;
            out.push(b'\n');
        }
    }
    Ok(out)
}

/// Write rendered output to a file, or to stdout when `path` is `None`.
pub fn emit(bytes: &[u8], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes).map_err(|source| Error::OutputWrite {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Aligned plain-text rendering. Index columns are left aligned, values
/// right aligned and missing values shown as `-`.
pub fn text_table(table: &Table, decimals: Option<usize>) -> String {
    if table.is_empty() {
        return "(no rows)\n".to_string();
    }
    let decimals = decimals.unwrap_or(TEXT_DECIMALS);
    let index_count = table.index_names().len();

    let header: Vec<String> = table
        .index_names()
        .iter()
        .cloned()
        .chain(table.columns().iter().map(|c| c.flattened(HEADER_SEPARATOR)))
        .collect();
    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            row.index
                .iter()
                .cloned()
                .chain(row.values.iter().map(|v| {
                    v.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
                }))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i < index_count {
                    format!("{cell:<w$}")
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&header);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));
    for cells in &body {
        out.push_str(&line(cells));
    }
    out
}
