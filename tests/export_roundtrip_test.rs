//! CSV and workbook export of survey tables.

#![allow(clippy::unwrap_used)]

mod common;

use common::{daily_pattern, log_csv, log_from};
use noise_survey::export::{CsvOptions, HeaderMode, Workbook, read_table, table_to_csv};
use noise_survey::log::{Interval, Metric, Channel};
use noise_survey::period::{PeriodSelector, PeriodTimes};
use noise_survey::survey::{PeriodIntervals, Survey};
use noise_survey::table::Table;
use std::io::Read;
use tempfile::TempDir;

fn survey() -> Survey {
    let mut survey = Survey::with_periods(PeriodTimes::from_hm((7, 0), (19, 0), (23, 0)).unwrap());
    survey.add_log("north", log_from(&log_csv("2025-08-14 07:00", 2880, 1, daily_pattern))).unwrap();
    survey.add_log("south", log_from(&log_csv("2025-08-14 12:00", 1440, 1, |i| daily_pattern(i) - 4.0))).unwrap();
    survey
}

fn assert_same_values(original: &Table, parsed: &Table) {
    assert_eq!(parsed.index_names(), original.index_names());
    assert_eq!(parsed.columns(), original.columns());
    assert_eq!(parsed.len(), original.len());
    for (a, b) in original.rows().iter().zip(parsed.rows()) {
        assert_eq!(a.index, b.index);
        for (x, y) in a.values.iter().zip(&b.values) {
            match (x, y) {
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-9, "{x} != {y}"),
                (None, None) => {}
                _ => panic!("missing value mismatch: {x:?} vs {y:?}"),
            }
        }
    }
}

#[test]
fn test_summary_round_trips_through_flat_csv() {
    let table = survey().residential_summary();
    let bytes = table_to_csv(&table, &CsvOptions::default()).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let parsed = read_table(bytes.as_slice(), HeaderMode::Flat, 3).unwrap();
    assert_same_values(&table, &parsed);
}

#[test]
fn test_lmax_spectra_round_trip_through_multi_row_csv() {
    let table = survey()
        .lmax_spectra(3, Interval::from_minutes(2).unwrap(), PeriodSelector::Nights)
        .unwrap();
    assert!(!table.is_empty());

    let options = CsvOptions {
        bom: false,
        header: HeaderMode::MultiRow,
        decimals: None,
    };
    let bytes = table_to_csv(&table, &options).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(",,,,Lmax,Lmax,Lmax"));
    assert_eq!(lines.next(), Some("Log,Date,Period,Time,A,63,125"));

    let parsed = read_table(bytes.as_slice(), HeaderMode::MultiRow, 4).unwrap();
    assert_same_values(&table, &parsed);
}

#[test]
fn test_workbook_holds_one_sheet_per_non_empty_table() {
    let survey = survey();
    let interval = Interval::from_minutes(15).unwrap();
    let modal = survey
        .modal(Channel::broadband(Metric::L90), false, &PeriodIntervals::uniform(interval))
        .unwrap();
    let evenings = survey
        .lmax_spectra(1, Interval::from_minutes(2).unwrap(), PeriodSelector::Evenings)
        .unwrap();

    let mut workbook = Workbook::new();
    workbook.add_sheet("Broadband Summary", &survey.residential_summary());
    workbook.add_sheet("Modal Values", &modal);
    workbook.add_sheet("Resampled - north", &survey.resampled_table("north", interval).unwrap());
    workbook.add_sheet("Lmax Spectra", &Table::new(["Period"], evenings.columns().to_vec()));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("survey.xlsx");
    workbook.save(&path).unwrap();

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
    let mut xml = String::new();
    archive.by_name("xl/workbook.xml").unwrap().read_to_string(&mut xml).unwrap();
    assert!(xml.contains(r#"name="Broadband Summary""#));
    assert!(xml.contains(r#"name="Resampled - north""#));
    assert!(!xml.contains("Lmax Spectra"));
    assert!(archive.by_name("xl/worksheets/sheet3.xml").is_ok());
    assert!(archive.by_name("xl/worksheets/sheet4.xml").is_err());
}
