//! Grid Module
//!
//! 存在表の論理グリッド（ヘッダー × 真偽値の行列）と、その出力処理を提供するモジュール。
//! 同じグリッドをMarkdownパイプテーブル、HTMLテーブル、JSONとして出力できます。

use std::io::Write;

use serde::Serialize;

use crate::error::StandardsMapError;
use crate::formatter::escape_table_cell;

/// 存在表の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceRow {
    /// 先頭列に表示する規格名
    pub name: String,

    /// 分類エントリごとの該当有無（列順は分類と同じ）
    pub present: Vec<bool>,
}

/// 存在表の論理グリッド
///
/// 行数・列数は構築時に確定し、すべての行が`columns.len()`個の値を持ちます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceGrid {
    /// 先頭列の見出し
    label: String,

    /// 分類エントリ（2列目以降の見出し）
    columns: Vec<String>,

    /// データ行
    rows: Vec<PresenceRow>,

    /// 該当セルのマーカー
    #[serde(skip)]
    marker: String,
}

impl PresenceGrid {
    /// 空のグリッドを生成
    ///
    /// # 引数
    ///
    /// * `label` - 先頭列の見出し
    /// * `columns` - 分類エントリ
    /// * `marker` - 該当セルに出力する文字列
    pub fn new(label: impl Into<String>, columns: Vec<String>, marker: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            columns,
            rows: Vec::new(),
            marker: marker.into(),
        }
    }

    /// 行を追加
    ///
    /// `present`の長さが列数と異なる場合は、不足分を`false`で補い、余剰分を切り捨てます。
    pub fn push_row(&mut self, name: impl Into<String>, mut present: Vec<bool>) {
        present.resize(self.columns.len(), false);
        self.rows.push(PresenceRow {
            name: name.into(),
            present,
        });
    }

    /// 先頭列の見出し
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 分類エントリ
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// データ行
    pub fn rows(&self) -> &[PresenceRow] {
        &self.rows
    }

    /// Markdownパイプテーブルとして出力
    ///
    /// すべての列は中央揃え（`:-----:`）です。該当セルは` X |`、非該当セルは`  |`。
    ///
    /// # 引数
    ///
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(StandardsMapError)` - 書き込みに失敗した場合
    pub fn render_markdown<W: Write>(&self, writer: &mut W) -> Result<(), StandardsMapError> {
        // 1. ヘッダー行
        write!(writer, "| {} |", escape_table_cell(&self.label))?;
        for column in &self.columns {
            write!(writer, " {} |", escape_table_cell(column))?;
        }
        writeln!(writer)?;

        // 2. 区切り行（先頭列 + 分類エントリ数）
        writeln!(writer, "|{}", ":-----:|".repeat(self.columns.len() + 1))?;

        // 3. データ行
        for row in &self.rows {
            write!(writer, "| {} |", escape_table_cell(&row.name))?;
            for present in &row.present {
                if *present {
                    write!(writer, " {} |", self.marker)?;
                } else {
                    write!(writer, "  |")?;
                }
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// HTMLテーブルとして出力
    pub fn render_html<W: Write>(&self, writer: &mut W) -> Result<(), StandardsMapError> {
        writeln!(writer, "<table>")?;
        writeln!(writer, "  <tr>")?;
        writeln!(writer, "    <th>{}</th>", quick_xml::escape::escape(&self.label))?;
        for column in &self.columns {
            writeln!(writer, "    <th>{}</th>", quick_xml::escape::escape(column))?;
        }
        writeln!(writer, "  </tr>")?;

        for row in &self.rows {
            writeln!(writer, "  <tr>")?;
            writeln!(writer, "    <td>{}</td>", quick_xml::escape::escape(&row.name))?;
            for present in &row.present {
                let content = if *present {
                    quick_xml::escape::escape(&self.marker)
                } else {
                    "".into()
                };
                writeln!(writer, "    <td align=\"center\">{}</td>", content)?;
            }
            writeln!(writer, "  </tr>")?;
        }

        writeln!(writer, "</table>")?;
        writer.flush()?;
        Ok(())
    }

    /// JSONとして出力（`{label, columns, rows: [{name, present}]}`）
    pub fn render_json<W: Write>(&self, writer: &mut W) -> Result<(), StandardsMapError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
