//! Export Integration Tests for bankgl
//!
//! Exported workbooks are read back with calamine and inspected as ZIP archives
//! to check sheet layout, cell contents and file naming.

use bankgl::{
    BankGlError, DirectoryTarget, ExporterBuilder, NameNormalization, TableData, XLSX_MIME_TYPE,
};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use std::io::{Cursor, Read};
use tempfile::TempDir;

/// Read every cell of the named sheet as strings
fn read_sheet(bytes: &[u8], sheet: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec())).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

fn sheet_names(bytes: &[u8]) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec())).unwrap();
    workbook.sheet_names().to_vec()
}

#[test]
fn test_export_report_to_directory() {
    let dir = TempDir::new().unwrap();
    let exporter = ExporterBuilder::new().build().unwrap();
    let table = TableData::new(
        ["Date", "Amount"],
        [["2023-04-01", "$5,000.00"], ["2023-04-02", ""]],
    )
    .unwrap();

    let download = exporter
        .export(&table, "report", &DirectoryTarget::new(dir.path()))
        .unwrap();

    assert_eq!(download.file_name, "report.xlsx");
    assert_eq!(download.path, dir.path().join("report.xlsx"));

    let bytes = std::fs::read(&download.path).unwrap();
    assert_eq!(bytes.len(), download.size);
    assert_eq!(sheet_names(&bytes), vec!["Bank Statement".to_string()]);

    let cells = read_sheet(&bytes, "Bank Statement");
    assert_eq!(cells[0], vec!["Date", "Amount"]);
    assert_eq!(cells[1], vec!["2023-04-01", "$5,000.00"]);
    assert_eq!(cells[2][0], "2023-04-02");
}

#[test]
fn test_export_keeps_existing_extension() {
    let dir = TempDir::new().unwrap();
    let exporter = ExporterBuilder::new().build().unwrap();
    let table = TableData::sample_statement();

    let download = exporter
        .export(&table, "DetailedStatement_april.xlsx", &DirectoryTarget::new(dir.path()))
        .unwrap();
    assert_eq!(download.file_name, "DetailedStatement_april.xlsx");
}

#[test]
fn test_export_strip_source_extension() {
    let dir = TempDir::new().unwrap();
    let exporter = ExporterBuilder::new()
        .with_normalization(NameNormalization::StripSourceExtension)
        .build()
        .unwrap();

    let download = exporter
        .export(
            &TableData::sample_statement(),
            "statement.pdf",
            &DirectoryTarget::new(dir.path()),
        )
        .unwrap();
    assert_eq!(download.file_name, "statement.xlsx");
    assert!(dir.path().join("statement.xlsx").exists());
}

#[test]
fn test_sample_statement_round_trip() {
    let exporter = ExporterBuilder::new().build().unwrap();
    let table = TableData::sample_statement();
    let bytes = exporter.to_buffer(&table).unwrap();

    let cells = read_sheet(&bytes, "Bank Statement");
    // ヘッダー行 + データ行
    assert_eq!(cells.len(), table.row_count() + 1);
    assert_eq!(cells[0], table.headers().to_vec());
    for (exported, original) in cells[1..].iter().zip(table.rows()) {
        for (col, value) in original.iter().enumerate() {
            // 末尾の空セルはcalamineの範囲に含まれない場合がある
            assert_eq!(exported.get(col).map(String::as_str).unwrap_or(""), value);
        }
    }
}

#[test]
fn test_custom_sheet_name() {
    let exporter = ExporterBuilder::new()
        .with_sheet_name("Ledger 2023")
        .build()
        .unwrap();
    let bytes = exporter.to_buffer(&TableData::sample_statement()).unwrap();
    assert_eq!(sheet_names(&bytes), vec!["Ledger 2023".to_string()]);
}

#[test]
fn test_header_only_table() {
    let exporter = ExporterBuilder::new().build().unwrap();
    let table = TableData::new(["Date", "Amount"], Vec::<Vec<String>>::new()).unwrap();
    let bytes = exporter.to_buffer(&table).unwrap();

    let cells = read_sheet(&bytes, "Bank Statement");
    assert_eq!(cells, vec![vec!["Date".to_string(), "Amount".to_string()]]);
}

#[test]
fn test_export_is_a_single_sheet_archive() {
    let exporter = ExporterBuilder::new().build().unwrap();
    let bytes = exporter.to_buffer(&TableData::sample_statement()).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    assert!(names.contains(&"xl/workbook.xml".to_string()));
    assert!(names.contains(&"xl/worksheets/sheet1.xml".to_string()));
    assert!(!names.contains(&"xl/worksheets/sheet2.xml".to_string()));

    let mut content_types = String::new();
    archive
        .by_name("[Content_Types].xml")
        .unwrap()
        .read_to_string(&mut content_types)
        .unwrap();
    assert!(content_types.contains("spreadsheetml"));
}

#[test]
fn test_mime_type() {
    assert_eq!(
        XLSX_MIME_TYPE,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[test]
fn test_invalid_sheet_name_rejected_at_build() {
    let result = ExporterBuilder::new().with_sheet_name("Q1/Q2").build();
    assert!(matches!(result, Err(BankGlError::Config(_))));
}

#[test]
fn test_export_into_missing_directory_creates_it() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("downloads").join("april");
    let exporter = ExporterBuilder::new().build().unwrap();

    let download = exporter
        .export(&TableData::sample_statement(), "report", &DirectoryTarget::new(&nested))
        .unwrap();
    assert!(download.path.starts_with(&nested));
    assert!(download.path.exists());
}

#[test]
fn test_export_rejects_path_in_file_name() {
    let dir = TempDir::new().unwrap();
    let exporter = ExporterBuilder::new().build().unwrap();

    let result = exporter.export(
        &TableData::sample_statement(),
        "../escape",
        &DirectoryTarget::new(dir.path()),
    );
    assert!(result.is_err());
    assert!(!dir.path().join("../escape.xlsx").exists());
}
