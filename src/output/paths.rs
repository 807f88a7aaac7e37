//! Output Paths
//!
//! 1つの基準出力パスから、すべての成果物の兄弟パスを導出します。

use std::path::{Path, PathBuf};

use crate::api::{ChartFormat, GroupingField, TableFormat};

/// 成果物の出力パス導出
///
/// 基準パス`dir/report.md`から次のように導出します:
///
/// | 成果物 | パス |
/// |---|---|
/// | 概要文書 | `dir/report.md` |
/// | カテゴリ存在表 | `dir/report-table.md` |
/// | メディア存在表 | `dir/report-media-table.md` |
/// | カテゴリバブル | `dir/report-bubbleChart.png` |
/// | メディアバブル | `dir/report-mediaTypes-bubbleChart.png` |
/// | カテゴリサンバースト | `dir/report-sunburst.svg` |
/// | メディアサンバースト | `dir/report-mediaTypes-sunburst.svg` |
/// | 階層ダンプ | `dir/report-hierarchy.json`, `dir/report-mediaTypes-hierarchy.json` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    base: PathBuf,
    dir: PathBuf,
    stem: String,
    /// ドット付きの拡張子（拡張子がない場合は空文字列）
    extension: String,
}

impl OutputPaths {
    /// 基準パスから生成
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let dir = base.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = base
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            base,
            dir,
            stem,
            extension,
        }
    }

    /// 概要文書のパス（基準パスそのもの）
    pub fn overview(&self) -> &Path {
        &self.base
    }

    /// 存在表のパス
    ///
    /// Markdown形式は基準パスの拡張子を引き継ぎ、HTML / JSON形式は固有の拡張子を使います。
    pub fn table(&self, grouping: GroupingField, format: TableFormat) -> PathBuf {
        let suffix = match grouping {
            GroupingField::Categories => "-table",
            GroupingField::Media => "-media-table",
        };
        match format.extension() {
            Some(ext) => self.sibling(suffix, &format!(".{}", ext)),
            None => self.sibling(suffix, &self.extension),
        }
    }

    /// バブルチャートのパス
    pub fn bubble(&self, grouping: GroupingField, format: ChartFormat) -> PathBuf {
        let suffix = match grouping {
            GroupingField::Categories => "-bubbleChart",
            GroupingField::Media => "-mediaTypes-bubbleChart",
        };
        self.sibling(suffix, &format!(".{}", format.extension()))
    }

    /// サンバーストのパス
    pub fn sunburst(&self, grouping: GroupingField, format: ChartFormat) -> PathBuf {
        let suffix = match grouping {
            GroupingField::Categories => "-sunburst",
            GroupingField::Media => "-mediaTypes-sunburst",
        };
        self.sibling(suffix, &format!(".{}", format.extension()))
    }

    /// 階層ダンプ（JSON）のパス
    pub fn hierarchy(&self, grouping: GroupingField) -> PathBuf {
        let suffix = match grouping {
            GroupingField::Categories => "-hierarchy",
            GroupingField::Media => "-mediaTypes-hierarchy",
        };
        self.sibling(suffix, ".json")
    }

    fn sibling(&self, suffix: &str, extension: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", self.stem, suffix, extension))
    }
}
