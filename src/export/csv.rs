//! CSV table writer and reader.

use crate::constants::{HEADER_SEPARATOR, UTF8_BOM};
use crate::error::{Error, Result};
use crate::log::Channel;
use crate::table::{ColumnKey, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// How multi-level column headers are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// One header row; levels joined with `" | "`.
    #[default]
    Flat,
    /// One header row per level; index names on the last row.
    #[serde(rename = "multi")]
    MultiRow,
}

impl fmt::Display for HeaderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => write!(f, "flat"),
            Self::MultiRow => write!(f, "multi"),
        }
    }
}

impl FromStr for HeaderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "multi" | "multirow" | "multi-row" => Ok(Self::MultiRow),
            other => Err(format!("unknown header mode: {other} (expected flat or multi)")),
        }
    }
}

/// CSV formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Prefix the output with a UTF-8 BOM so spreadsheet apps detect the encoding.
    pub bom: bool,
    /// Header layout.
    pub header: HeaderMode,
    /// Fixed number of decimals; `None` writes the shortest exact form.
    pub decimals: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            bom: true,
            header: HeaderMode::Flat,
            decimals: None,
        }
    }
}

fn format_value(value: Option<f64>, decimals: Option<usize>) -> String {
    match (value, decimals) {
        (None, _) => String::new(),
        (Some(v), None) => v.to_string(),
        (Some(v), Some(d)) => format!("{v:.d$}"),
    }
}

fn header_records(table: &Table, mode: HeaderMode) -> Vec<Vec<String>> {
    match mode {
        HeaderMode::Flat => {
            let mut record = table.index_names().to_vec();
            record.extend(table.columns().iter().map(|c| c.flattened(HEADER_SEPARATOR)));
            vec![record]
        }
        HeaderMode::MultiRow => {
            let depth = table.header_depth();
            (0..depth)
                .map(|level| {
                    let last = level + 1 == depth;
                    let mut record: Vec<String> = table
                        .index_names()
                        .iter()
                        .map(|name| if last { name.clone() } else { String::new() })
                        .collect();
                    record.extend(table.columns().iter().map(|c| c.level(level).to_string()));
                    record
                })
                .collect()
        }
    }
}

fn write_records<W: Write>(wtr: &mut csv::Writer<W>, table: &Table, options: &CsvOptions) -> Result<()> {
    for record in header_records(table, options.header) {
        wtr.write_record(&record)
            .map_err(|source| Error::CsvWrite { source })?;
    }
    for row in table.rows() {
        let record = row
            .index
            .iter()
            .cloned()
            .chain(row.values.iter().map(|v| format_value(*v, options.decimals)));
        wtr.write_record(record)
            .map_err(|source| Error::CsvWrite { source })?;
    }
    Ok(())
}

/// Write one table as CSV.
pub fn write_table<W: Write>(mut writer: W, table: &Table, options: &CsvOptions) -> Result<()> {
    if options.bom {
        writer.write_all(UTF8_BOM)?;
    }
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    write_records(&mut wtr, table, options)?;
    wtr.flush()?;
    Ok(())
}

/// Render one table as CSV bytes.
pub fn table_to_csv(table: &Table, options: &CsvOptions) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_table(&mut buf, table, options)?;
    Ok(buf)
}

/// Write several titled tables into one CSV, separated by blank lines.
///
/// Empty tables are skipped.
pub fn write_sections<W: Write>(
    mut writer: W,
    sections: &[(&str, &Table)],
    options: &CsvOptions,
) -> Result<()> {
    if options.bom {
        writer.write_all(UTF8_BOM)?;
    }
    let mut first = true;
    for (title, table) in sections.iter().filter(|(_, t)| !t.is_empty()) {
        if !first {
            writer.write_all(b"\n")?;
        }
        first = false;
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(&mut writer);
        wtr.write_record([*title])
            .map_err(|source| Error::CsvWrite { source })?;
        write_records(&mut wtr, table, options)?;
        wtr.flush()?;
    }
    writer.flush()?;
    Ok(())
}

/// Write an empty log template: `Time` followed by every channel header.
pub fn write_template<W: Write>(writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let header = std::iter::once("Time".to_string()).chain(Channel::template().map(|c| c.to_string()));
    wtr.write_record(header)
        .map_err(|source| Error::CsvWrite { source })?;
    wtr.flush()?;
    Ok(())
}

/// Read a table written by [`write_table`].
///
/// The first `index_columns` columns are index labels. In
/// [`HeaderMode::MultiRow`] the header ends at the first row whose first
/// cell is non-empty, so at least one index column is required.
pub fn read_table<R: Read>(mut reader: R, mode: HeaderMode, index_columns: usize) -> Result<Table> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let body = bytes.strip_prefix(UTF8_BOM.as_slice()).unwrap_or(&bytes);

    let mut records = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body)
        .into_records();
    let mut next_record = |what: &str| -> Result<Option<csv::StringRecord>> {
        records
            .next()
            .transpose()
            .map_err(|e| Error::CsvRead {
                message: format!("{what}: {e}"),
            })
    };

    let mut header_rows: Vec<csv::StringRecord> = Vec::new();
    loop {
        let Some(record) = next_record("header")? else {
            return Err(Error::CsvRead {
                message: "missing header row".to_string(),
            });
        };
        let done = match mode {
            HeaderMode::Flat => true,
            HeaderMode::MultiRow => {
                if index_columns == 0 {
                    return Err(Error::CsvRead {
                        message: "multi-row headers need at least one index column".to_string(),
                    });
                }
                record.get(0).is_some_and(|cell| !cell.is_empty())
            }
        };
        header_rows.push(record);
        if done {
            break;
        }
    }

    let Some(last) = header_rows.last() else {
        return Err(Error::CsvRead {
            message: "missing header row".to_string(),
        });
    };
    if last.len() < index_columns {
        return Err(Error::CsvRead {
            message: format!("header has {} columns, expected at least {index_columns}", last.len()),
        });
    }
    let index_names: Vec<String> = last.iter().take(index_columns).map(str::to_string).collect();
    let columns: Vec<ColumnKey> = (index_columns..last.len())
        .map(|col| match mode {
            HeaderMode::Flat => ColumnKey::new(last.get(col).unwrap_or_default().split(HEADER_SEPARATOR)),
            HeaderMode::MultiRow => {
                let mut levels: Vec<&str> = header_rows
                    .iter()
                    .map(|r| r.get(col).unwrap_or_default())
                    .collect();
                while levels.last().is_some_and(|l| l.is_empty()) {
                    levels.pop();
                }
                ColumnKey::new(levels)
            }
        })
        .collect();

    let width = index_columns + columns.len();
    let mut table = Table::new(index_names, columns);
    let mut line = header_rows.len();
    while let Some(record) = next_record("row")? {
        line += 1;
        if record.len() != width {
            return Err(Error::CsvRead {
                message: format!("line {line}: expected {width} fields, found {}", record.len()),
            });
        }
        let index = record.iter().take(index_columns).map(str::to_string).collect();
        let values = record
            .iter()
            .skip(index_columns)
            .map(|cell| {
                if cell.is_empty() {
                    Ok(None)
                } else {
                    cell.parse::<f64>().map(Some).map_err(|_| Error::CsvRead {
                        message: format!("line {line}: '{cell}' is not a number"),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;
        table.push_row(index, values);
    }
    Ok(table)
}
