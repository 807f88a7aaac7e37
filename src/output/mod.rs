//! Output Module
//!
//! 文書系の成果物（概要文書・存在表）の生成と、出力パスの導出を提供するモジュール。

mod overview;
mod paths;
mod presence;

use std::io::Write;

use crate::api::TableFormat;
use crate::error::StandardsMapError;
use crate::grid::PresenceGrid;

pub use overview::render_overview;
pub use paths::OutputPaths;
pub use presence::{build_presence_grid, render_presence_table};

/// 存在表の出力フォーマッター（Strategy Pattern）
///
/// 各出力形式（Markdown, HTML, JSON）をenumとして表現します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatter {
    Markdown,
    Html,
    Json,
}

impl OutputFormatter {
    /// 出力形式からフォーマッターを生成
    pub fn from_format(format: TableFormat) -> Self {
        match format {
            TableFormat::Markdown => OutputFormatter::Markdown,
            TableFormat::Html => OutputFormatter::Html,
            TableFormat::Json => OutputFormatter::Json,
        }
    }

    /// グリッドを指定された形式で出力する
    ///
    /// # 引数
    ///
    /// * `grid` - 出力する存在表
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(StandardsMapError)` - エラーが発生した場合
    pub fn render<W: Write>(
        &self,
        grid: &PresenceGrid,
        writer: &mut W,
    ) -> Result<(), StandardsMapError> {
        match self {
            OutputFormatter::Markdown => grid.render_markdown(writer),
            OutputFormatter::Html => grid.render_html(writer),
            OutputFormatter::Json => grid.render_json(writer),
        }
    }

    /// 文字列として出力
    pub fn render_to_string(&self, grid: &PresenceGrid) -> Result<String, StandardsMapError> {
        let mut buffer = Vec::new();
        self.render(grid, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            StandardsMapError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_dispatch() {
        let mut grid = PresenceGrid::new("S", vec!["A".to_string()], "X");
        grid.push_row("n", vec![true]);

        let markdown = OutputFormatter::from_format(TableFormat::Markdown)
            .render_to_string(&grid)
            .unwrap();
        assert!(markdown.starts_with("| S | A |"));

        let html = OutputFormatter::from_format(TableFormat::Html)
            .render_to_string(&grid)
            .unwrap();
        assert!(html.starts_with("<table>"));

        let json = OutputFormatter::from_format(TableFormat::Json)
            .render_to_string(&grid)
            .unwrap();
        assert!(json.contains("\"columns\""));
    }
}
