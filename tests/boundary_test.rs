//! Boundary Tests for standards-map
//!
//! 空のシート、ヘッダーのみの入力、壊れたファイル、列のずれなど
//! 入力の境界条件での動作を検証する。

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::*;
use standards_map::{
    CalamineReader, ChartFormat, DatasetConfig, GeneratorBuilder, SpreadsheetReader,
    StandardsMapError,
};

// Helper module for generating boundary test fixtures
mod fixtures {
    use super::*;

    /// セルが1つもないシート
    pub fn generate_empty_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("EmptySheet")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// ヘッダー行のみのシート
    pub fn generate_header_only() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, title) in ["Name", "Categories", "Group", "Standard", "Link", "Status", "Date", "Media"]
            .iter()
            .enumerate()
        {
            worksheet.write_string(0, col as u16, *title)?;
        }
        Ok(workbook.save_to_buffer()?)
    }

    /// 先頭列（A列）が空のシート
    ///
    /// calamineのRangeは最初の非空セルから始まるため、列番号がずれないことを確認する。
    pub fn generate_leading_empty_column() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 1, "Categories")?;
        worksheet.write_string(0, 7, "Media")?;
        worksheet.write_string(1, 1, "Other")?;
        worksheet.write_string(1, 7, "Video")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 2枚目のシートにデータがあるワークブック
    pub fn generate_second_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.set_name("Notes")?;
        first.write_string(0, 0, "not a standards sheet")?;

        let second = workbook.add_worksheet();
        second.set_name("Standards")?;
        second.write_string(0, 0, "Name")?;
        second.write_string(1, 0, "STD-2")?;
        second.write_string(1, 1, "Other")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 特殊文字・長いセルを含むシート
    pub fn generate_special_content() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Name")?;
        worksheet.write_string(1, 0, "A|B <&>")?;
        worksheet.write_string(1, 1, "Other\n\n  \nOther")?;
        worksheet.write_string(1, 8, &"x".repeat(10_000))?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 1900年システムの日付境界
    pub fn generate_dates() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        worksheet.write_string(0, 0, "Name")?;
        worksheet.write_string(1, 0, "Early")?;
        worksheet.write_number_with_format(1, 6, 1.0, &date_format)?;
        worksheet.write_string(2, 0, "Plain number")?;
        worksheet.write_number(2, 6, 2024.0)?;
        Ok(workbook.save_to_buffer()?)
    }
}

fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_empty_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "empty.xlsx", &fixtures::generate_empty_sheet().unwrap());
    let output = dir.path().join("map.md");

    let report = GeneratorBuilder::new()
        .with_bubble_format(ChartFormat::Svg)
        .with_hierarchy_json(true)
        .build()
        .unwrap()
        .run(&input, &output)
        .unwrap();
    assert!(!report.has_errors(), "{:?}", report);

    // 行がない場合でも全成果物が書き出される
    assert_eq!(read(&output), "");
    let media = read(dir.path().join("map-media-table.md"));
    assert_eq!(media, "| Standard | Others |\n|:-----:|:-----:|\n");

    let hierarchy: serde_json::Value =
        serde_json::from_str(&read(dir.path().join("map-hierarchy.json"))).unwrap();
    assert_eq!(hierarchy, serde_json::json!({"name": "Standards", "value": 0.0}));
}

#[test]
fn test_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "header.xlsx", &fixtures::generate_header_only().unwrap());
    let output = dir.path().join("map.md");

    let report = GeneratorBuilder::new()
        .with_bubble_format(ChartFormat::Svg)
        .build()
        .unwrap()
        .run(&input, &output)
        .unwrap();
    assert!(!report.has_errors(), "{:?}", report);

    assert_eq!(read(&output), "");
    let table = read(dir.path().join("map-table.md"));
    assert_eq!(table.lines().count(), 2);
    assert!(table.starts_with("| Specification | Content Provenance |"));

    let bubble = read(dir.path().join("map-bubbleChart.svg"));
    assert!(bubble.starts_with("<svg"));
    assert!(!bubble.contains("<circle"));
}

#[test]
fn test_leading_empty_column_keeps_absolute_indices() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(
        dir.path(),
        "offset.xlsx",
        &fixtures::generate_leading_empty_column().unwrap(),
    );

    let rows = CalamineReader::default().read_rows(&input).unwrap();
    let layout = DatasetConfig::default().layout;
    assert_eq!(rows.len(), 2);
    // A列の分を補って8列になる
    assert!(rows.iter().all(|r| r.len() == 8));
    assert_eq!(rows[1].name(&layout), None);
    assert_eq!(rows[1].categories_raw(&layout).as_deref(), Some("Other"));
    assert_eq!(rows[1].media_raw(&layout).as_deref(), Some("Video"));
}

#[test]
fn test_sheet_selection_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "sheets.xlsx", &fixtures::generate_second_sheet().unwrap());

    let first = CalamineReader::default().read_rows(&input).unwrap();
    assert_eq!(first.len(), 1);

    let reader = CalamineReader::new(Some("Standards".to_string()), "%Y-%m-%d");
    let rows = reader.read_rows(&input).unwrap();
    let layout = DatasetConfig::default().layout;
    assert_eq!(rows[1].name(&layout).as_deref(), Some("STD-2"));
}

#[test]
fn test_special_content() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "special.xlsx", &fixtures::generate_special_content().unwrap());
    let output = dir.path().join("map.md");

    let report = GeneratorBuilder::new()
        .with_bubble_format(ChartFormat::Svg)
        .build()
        .unwrap()
        .run(&input, &output)
        .unwrap();
    assert!(!report.has_errors(), "{:?}", report);

    let overview = read(&output);
    assert!(overview.starts_with("## A|B <&>\n\n"));
    assert!(overview.contains(&"x".repeat(10_000)));

    // パイプはテーブルのセル内でエスケープされる。重複したカテゴリは1つの印になる
    let table = read(dir.path().join("map-table.md"));
    assert!(table.contains("| A\\|B <&> |  |  |  |  |  | X |\n"));

    // SVGではXMLエスケープされる
    let sunburst = read(dir.path().join("map-sunburst.svg"));
    assert!(sunburst.contains("&lt;&amp;&gt;"));
    assert!(!sunburst.contains("<&>"));
}

#[test]
fn test_date_cells() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "dates.xlsx", &fixtures::generate_dates().unwrap());

    let rows = CalamineReader::default().read_rows(&input).unwrap();
    let layout = DatasetConfig::default().layout;
    assert_eq!(rows[1].date(&layout).as_deref(), Some("1900-01-01"));
    // 日付書式のない数値はそのまま
    assert_eq!(rows[2].date(&layout).as_deref(), Some("2024"));

    let reader = CalamineReader::new(None, "%d/%m/%Y");
    let rows = reader.read_rows(&input).unwrap();
    assert_eq!(rows[1].date(&layout).as_deref(), Some("01/01/1900"));
}

#[test]
fn test_corrupted_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "broken.xlsx", b"PK\x03\x04 definitely not a workbook");
    let output = dir.path().join("map.md");

    let result = GeneratorBuilder::new().build().unwrap().run(&input, &output);
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = GeneratorBuilder::new()
        .build()
        .unwrap()
        .run(&dir.path().join("missing.xlsx"), &dir.path().join("map.md"));
    assert!(matches!(result, Err(StandardsMapError::Io(_))));
}

#[test]
fn test_unwritable_output_reports_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "header.xlsx", &fixtures::generate_header_only().unwrap());

    let report = GeneratorBuilder::new()
        .with_bubble_format(ChartFormat::Svg)
        .build()
        .unwrap()
        .run(&input, &dir.path().join("no-such-dir").join("map.md"))
        .unwrap();

    // 各成果物が個別に失敗として報告される
    assert_eq!(report.artifacts.len(), 7);
    assert_eq!(report.failures().count(), 7);
    for artifact in &report.artifacts {
        let message = artifact.outcome.as_ref().unwrap_err().to_string();
        assert!(!message.is_empty(), "{}", artifact.kind);
    }
}
