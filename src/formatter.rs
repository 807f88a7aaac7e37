//! Formatter Module
//!
//! 1行の1フィールドをMarkdown断片に変換する処理を提供するモジュール。

use crate::api::Field;
use crate::config::{ColumnLayout, DatasetConfig, FieldTitles};
use crate::types::{split_multi_value, Row};

/// フィールドフォーマッター
///
/// `(row, field)`の組をMarkdown断片に変換します。純粋関数で、副作用はありません。
///
/// # 変換規則
///
/// 1. セルが空の場合は空文字列（見出しも出力しない）
/// 2. `Link`: 対になる`Standard`フィールドをアンカーテキストとするMarkdownリンク
/// 3. `Media`: 改行区切りの値を`", "`で連結
/// 4. それ以外: `<見出し> <改行を空白に置換した値>` + 空行
#[derive(Debug, Clone, Copy)]
pub struct FieldFormatter<'a> {
    layout: &'a ColumnLayout,
    titles: &'a FieldTitles,
}

impl<'a> FieldFormatter<'a> {
    /// データセット設定からフォーマッターを生成
    pub fn new(config: &'a DatasetConfig) -> Self {
        Self {
            layout: &config.layout,
            titles: &config.titles,
        }
    }

    /// フィールドをMarkdown断片に変換
    ///
    /// # 引数
    ///
    /// * `row` - 対象の行
    /// * `field` - 出力するフィールド
    ///
    /// # 戻り値
    ///
    /// Markdown断片（セルが空の場合は空文字列）
    pub fn format_field(&self, row: &Row, field: Field) -> String {
        let Some(value) = row.text(self.layout, field) else {
            return String::new();
        };
        let title = self.titles.title(field);

        match field {
            Field::Link => {
                // ラベルが空の場合はURL自体をアンカーテキストにする
                let label = row.standard_label(self.layout);
                let anchor = collapse_newlines(label.as_deref().unwrap_or(&*value));
                format!("{} [{}]({})\n\n", title, anchor, value.trim())
            }
            Field::Media => {
                let parts = split_multi_value(&value);
                format!("{} {}\n\n", title, parts.join(", "))
            }
            _ => format!("{} {}\n\n", title, collapse_newlines(&value)),
        }
    }
}

/// 改行（`\r\n`、`\n`）をそれぞれ1つの空白に置換
pub(crate) fn collapse_newlines(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Markdownテーブルのセル用にエスケープ
///
/// パイプをエスケープし、改行を空白に置換します。
pub(crate) fn escape_table_cell(s: &str) -> String {
    collapse_newlines(s).replace('|', "\\|")
}
