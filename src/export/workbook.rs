//! Minimal XLSX workbook writer.
//!
//! Produces an Office Open XML package with one worksheet per table. Cells
//! hold inline strings for index labels and headers and plain numbers for
//! values, so no shared-string or style parts are needed.

use crate::constants::HEADER_SEPARATOR;
use crate::constants::workbook::{FALLBACK_SHEET_NAME, FORBIDDEN_SHEET_CHARS, MAX_SHEET_NAME_LEN};
use crate::error::{Error, Result};
use crate::table::Table;
use std::fmt::Write as _;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;

const CONTENT_TYPES_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
"#;

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Make a string usable as a sheet name: forbidden characters removed,
/// at most 31 characters, never empty.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
        .collect();
    let trimmed: String = cleaned
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let trimmed = trimmed.trim_end().to_string();
    if trimmed.is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        trimmed
    }
}

/// A workbook being assembled in memory.
#[derive(Debug, Default)]
pub struct Workbook {
    sheets: Vec<(String, String)>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table as a sheet. Empty tables are skipped.
    ///
    /// Returns whether a sheet was added. The name is sanitised and made
    /// unique among existing sheets (case-insensitively).
    pub fn add_sheet(&mut self, name: &str, table: &Table) -> bool {
        if table.is_empty() {
            debug!("Skipping empty sheet '{name}'");
            return false;
        }
        let name = self.unique_sheet_name(&sanitize_sheet_name(name));
        let xml = worksheet_xml(table);
        self.sheets.push((name, xml));
        true
    }

    /// Sheet names in order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(n, _)| n.as_str())
    }

    /// Whether no sheet has been added.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    fn unique_sheet_name(&self, base: &str) -> String {
        let taken = |candidate: &str| {
            self.sheets
                .iter()
                .any(|(n, _)| n.eq_ignore_ascii_case(candidate))
        };
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|k| {
                let suffix = format!("-{k}");
                let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.len());
                let stem: String = base.chars().take(keep).collect();
                format!("{stem}{suffix}")
            })
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Write the package to any seekable writer.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyWorkbook`] if no sheet was added, or
    /// [`Error::WorkbookWrite`] if the archive cannot be written.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        if self.sheets.is_empty() {
            return Err(Error::EmptyWorkbook);
        }

        let mut zip = zip::ZipWriter::new(writer);
        write_part(&mut zip, "[Content_Types].xml", &self.content_types_xml())?;
        write_part(&mut zip, "_rels/.rels", ROOT_RELS)?;
        write_part(&mut zip, "xl/workbook.xml", &self.workbook_xml())?;
        write_part(&mut zip, "xl/_rels/workbook.xml.rels", &self.workbook_rels_xml())?;
        for (i, (_, xml)) in self.sheets.iter().enumerate() {
            write_part(&mut zip, &format!("xl/worksheets/sheet{}.xml", i + 1), xml)?;
        }

        zip.finish().map_err(|source| Error::WorkbookWrite { source })
    }

    /// Serialise the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the package to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| Error::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote workbook {} ({} sheets)", path.display(), self.sheets.len());
        Ok(())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = CONTENT_TYPES_HEAD.to_string();
        for i in 1..=self.sheets.len() {
            let _ = write!(
                xml,
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            );
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut xml = format!(r#"{XML_DECL}<workbook xmlns="{SHEET_NS}" xmlns:r="{REL_NS}"><sheets>"#);
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            let id = i + 1;
            let _ = write!(
                xml,
                r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
                escape_xml(name)
            );
        }
        xml.push_str("</sheets></workbook>");
        xml
    }

    fn workbook_rels_xml(&self) -> String {
        let mut xml = format!(r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}">"#);
        for id in 1..=self.sheets.len() {
            let _ = write!(
                xml,
                r#"<Relationship Id="rId{id}" Type="{WORKSHEET_REL}" Target="worksheets/sheet{id}.xml"/>"#
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

fn write_part<W: Write + Seek>(zip: &mut zip::ZipWriter<W>, path: &str, body: &str) -> Result<()> {
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(path, options)
        .map_err(|source| Error::WorkbookWrite { source })?;
    zip.write_all(body.as_bytes())?;
    Ok(())
}

/// Spreadsheet column letters for a zero-based index (`0` → `A`, `26` → `AA`).
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + (index % 26) as u8));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

fn string_cell(xml: &mut String, reference: &str, text: &str) {
    let _ = write!(
        xml,
        r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        escape_xml(text)
    );
}

/// Worksheet part: one flattened header row, then index labels and values.
fn worksheet_xml(table: &Table) -> String {
    let mut xml = format!(r#"{XML_DECL}<worksheet xmlns="{SHEET_NS}"><sheetData>"#);

    xml.push_str(r#"<row r="1">"#);
    let headers = table
        .index_names()
        .iter()
        .cloned()
        .chain(table.columns().iter().map(|c| c.flattened(HEADER_SEPARATOR)));
    for (col, header) in headers.enumerate() {
        string_cell(&mut xml, &format!("{}1", column_letters(col)), &header);
    }
    xml.push_str("</row>");

    for (i, row) in table.rows().iter().enumerate() {
        let r = i + 2;
        let _ = write!(xml, r#"<row r="{r}">"#);
        for (col, label) in row.index.iter().enumerate() {
            string_cell(&mut xml, &format!("{}{r}", column_letters(col)), label);
        }
        let offset = row.index.len();
        for (col, value) in row.values.iter().enumerate() {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                let _ = write!(xml, r#"<c r="{}{r}"><v>{v}</v></c>"#, column_letters(offset + col));
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}
