//! Workbook Reader
//!
//! calamineを使用したスプレッドシート読み込みの実装。
//! ワークシートを行の並び（`Vec<Row>`）として完全にメモリへ読み込みます。

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::StandardsMapError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, Row};

/// スプレッドシート読み込みのインターフェース
///
/// 入力はファイルパス、出力は行の並びです（行0はヘッダー）。
/// すべての行は同じ列数を持ちます。
pub trait SpreadsheetReader: Send + Sync {
    /// ファイルを読み込み、すべての行を返す
    fn read_rows(&self, path: &Path) -> Result<Vec<Row>, StandardsMapError>;
}

/// calamineによるスプレッドシートリーダー（xlsx / xls / ods）
#[derive(Debug, Clone)]
pub struct CalamineReader {
    /// 読み込むシート名（`None`の場合は先頭シート）
    sheet: Option<String>,
    /// 日付セルの出力形式
    date_format: String,
    security: SecurityConfig,
}

impl CalamineReader {
    /// 新しいリーダーを生成
    ///
    /// # 引数
    ///
    /// * `sheet` - 読み込むシート名（`None`の場合は先頭シート）
    /// * `date_format` - 日付セルを文字列化する際のchrono互換書式
    pub fn new(sheet: Option<String>, date_format: impl Into<String>) -> Self {
        Self {
            sheet,
            date_format: date_format.into(),
            security: SecurityConfig::default(),
        }
    }

    /// 任意のリーダーから行を読み込む
    ///
    /// 入力全体をメモリに読み込んでから解析します（セキュリティ: サイズ制限を適用）。
    pub fn read_from<R: Read + Seek>(&self, mut reader: R) -> Result<Vec<Row>, StandardsMapError> {
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;
        self.security.check_input_size(bytes_read as u64)?;

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;

        let range = match &self.sheet {
            Some(name) => {
                if !workbook.sheet_names().contains(name) {
                    return Err(StandardsMapError::Config(format!(
                        "Sheet '{}' not found",
                        name
                    )));
                }
                workbook.worksheet_range(name)?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or(StandardsMapError::EmptyWorkbook)??,
        };

        let rows = self.range_to_rows(&range);
        self.security.check_row_count(rows.len())?;
        debug!(rows = rows.len(), "worksheet loaded");
        Ok(rows)
    }

    /// calamineのRangeを行の並びに変換（内部ヘルパー）
    ///
    /// calamineのRangeは最初の非空セルから始まるため、先頭の空列を補って
    /// 列インデックスをシート上の絶対列番号に揃えます。
    fn range_to_rows(&self, range: &Range<Data>) -> Vec<Row> {
        let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);
        let width = col_offset + range.width();

        range
            .rows()
            .map(|cells| {
                let mut values = vec![CellValue::Empty; col_offset];
                values.extend(cells.iter().map(|cell| self.convert_cell(cell)));
                let mut row = Row::new(values);
                row.pad_to(width);
                row
            })
            .collect()
    }

    /// calamineのセル値を変換（内部ヘルパー）
    fn convert_cell(&self, cell: &Data) -> CellValue {
        match cell {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::String(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) if dt.is_datetime() => {
                match format_excel_serial(dt.as_f64(), &self.date_format) {
                    Some(text) => CellValue::String(text),
                    None => CellValue::Number(dt.as_f64()),
                }
            }
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => {
                debug!(error = ?e, "error cell read as empty");
                CellValue::Empty
            }
            Data::Empty => CellValue::Empty,
        }
    }
}

impl Default for CalamineReader {
    fn default() -> Self {
        Self::new(None, "%Y-%m-%d")
    }
}

impl SpreadsheetReader for CalamineReader {
    fn read_rows(&self, path: &Path) -> Result<Vec<Row>, StandardsMapError> {
        let file = File::open(path)?;
        self.read_from(file)
    }
}

/// Excelのシリアル日付値を文字列に変換
///
/// 1900年システム（1899年12月30日起算）として扱います。
/// シリアル値60以下はExcelの1900年うるう年バグを考慮して1日ずらします。
fn format_excel_serial(serial: f64, date_format: &str) -> Option<String> {
    use std::fmt::Write;

    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.floor() as i64;
    let days = if days < 61 { days + 1 } else { days };
    let seconds = ((serial - serial.floor()) * 86_400.0).round() as i64;
    let datetime: NaiveDateTime = epoch
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))?;

    let mut text = String::new();
    write!(text, "{}", datetime.format(date_format)).ok()?;
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_excel_serial_1900_system() {
        assert_eq!(
            format_excel_serial(1.0, "%Y-%m-%d").as_deref(),
            Some("1900-01-01")
        );
        assert_eq!(
            format_excel_serial(45658.0, "%Y-%m-%d").as_deref(),
            Some("2025-01-01")
        );
        assert_eq!(
            format_excel_serial(45658.5, "%Y-%m-%d %H:%M").as_deref(),
            Some("2025-01-01 12:00")
        );
    }

    #[test]
    fn test_format_excel_serial_custom_format() {
        assert_eq!(
            format_excel_serial(45658.0, "%Y年%m月%d日").as_deref(),
            Some("2025年01月01日")
        );
    }

    #[test]
    fn test_format_excel_serial_rejects_invalid() {
        assert_eq!(format_excel_serial(-1.0, "%Y"), None);
        assert_eq!(format_excel_serial(f64::NAN, "%Y"), None);
    }

    #[test]
    fn test_convert_cell() {
        let reader = CalamineReader::default();
        assert_eq!(reader.convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            reader.convert_cell(&Data::String("a".to_string())),
            CellValue::String("a".to_string())
        );
        assert_eq!(reader.convert_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            reader.convert_cell(&Data::Error(calamine::CellErrorType::NA)),
            CellValue::Empty
        );
        assert_eq!(reader.convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_read_from_invalid_input() {
        let reader = CalamineReader::default();
        let result = reader.read_from(Cursor::new(Vec::<u8>::new()));
        assert!(result.is_err());
    }
}
