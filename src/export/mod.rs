//! Table export: CSV (flat or multi-row headers) and XLSX workbooks.

mod csv;
mod workbook;

pub use csv::{
    CsvOptions, HeaderMode, read_table, table_to_csv, write_sections, write_table,
    write_template,
};
pub use workbook::{Workbook, sanitize_sheet_name};
