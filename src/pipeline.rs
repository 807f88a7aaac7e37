//! Generation Pipeline
//!
//! 読み込み済みの行から各成果物を独立したタスクとして生成するモジュール。
//! タスクはrayonで並列に実行され、結果は固定の成果物順で返されます。

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use crate::api::{ChartFormat, GroupingField, TableFormat};
use crate::builder::Generator;
use crate::chart::{render_error, ChartSpec};
use crate::error::StandardsMapError;
use crate::hierarchy::{build_hierarchy, HierarchyNode};
use crate::output::{build_presence_grid, render_overview, OutputFormatter, OutputPaths};
use crate::taxonomy::Taxonomy;
use crate::types::Row;

/// 成果物の種類（宣言順が出力順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Overview,
    CategoryTable,
    MediaTable,
    CategoryBubble,
    MediaBubble,
    CategorySunburst,
    MediaSunburst,
    CategoryHierarchy,
    MediaHierarchy,
}

impl ArtifactKind {
    /// すべての成果物（出力順）
    pub const ALL: [ArtifactKind; 9] = [
        ArtifactKind::Overview,
        ArtifactKind::CategoryTable,
        ArtifactKind::MediaTable,
        ArtifactKind::CategoryBubble,
        ArtifactKind::MediaBubble,
        ArtifactKind::CategorySunburst,
        ArtifactKind::MediaSunburst,
        ArtifactKind::CategoryHierarchy,
        ArtifactKind::MediaHierarchy,
    ];

    /// 成果物が依存するグループ化フィールド（概要文書は`None`）
    pub fn grouping(self) -> Option<GroupingField> {
        match self {
            ArtifactKind::Overview => None,
            ArtifactKind::CategoryTable
            | ArtifactKind::CategoryBubble
            | ArtifactKind::CategorySunburst
            | ArtifactKind::CategoryHierarchy => Some(GroupingField::Categories),
            ArtifactKind::MediaTable
            | ArtifactKind::MediaBubble
            | ArtifactKind::MediaSunburst
            | ArtifactKind::MediaHierarchy => Some(GroupingField::Media),
        }
    }

    /// チャート（`with_charts(false)`で省略される成果物）かどうか
    pub fn is_chart(self) -> bool {
        matches!(
            self,
            ArtifactKind::CategoryBubble
                | ArtifactKind::MediaBubble
                | ArtifactKind::CategorySunburst
                | ArtifactKind::MediaSunburst
        )
    }

    /// 階層ダンプかどうか
    pub fn is_hierarchy(self) -> bool {
        matches!(
            self,
            ArtifactKind::CategoryHierarchy | ArtifactKind::MediaHierarchy
        )
    }

    fn label(self) -> &'static str {
        match self {
            ArtifactKind::Overview => "overview",
            ArtifactKind::CategoryTable => "category-table",
            ArtifactKind::MediaTable => "media-table",
            ArtifactKind::CategoryBubble => "category-bubble",
            ArtifactKind::MediaBubble => "media-bubble",
            ArtifactKind::CategorySunburst => "category-sunburst",
            ArtifactKind::MediaSunburst => "media-sunburst",
            ArtifactKind::CategoryHierarchy => "category-hierarchy",
            ArtifactKind::MediaHierarchy => "media-hierarchy",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 1つの成果物の生成結果
#[derive(Debug)]
pub struct ArtifactReport {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub outcome: Result<(), StandardsMapError>,
}

impl ArtifactReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// 1回の実行で生成されたすべての成果物の結果（固定の成果物順）
#[derive(Debug, Default)]
pub struct RunReport {
    pub artifacts: Vec<ArtifactReport>,
}

impl RunReport {
    /// 失敗した成果物があるかどうか
    pub fn has_errors(&self) -> bool {
        self.artifacts.iter().any(|a| a.outcome.is_err())
    }

    /// 失敗した成果物
    pub fn failures(&self) -> impl Iterator<Item = &ArtifactReport> {
        self.artifacts.iter().filter(|a| a.outcome.is_err())
    }

    /// 種類から成果物の結果を探す
    pub fn get(&self, kind: ArtifactKind) -> Option<&ArtifactReport> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

/// 有効な成果物とその出力パスを列挙する
pub(crate) fn planned_artifacts(generator: &Generator, output: &Path) -> Vec<(ArtifactKind, PathBuf)> {
    let options = generator.options();
    let paths = OutputPaths::new(output);

    ArtifactKind::ALL
        .iter()
        .copied()
        .filter(|kind| options.charts || !kind.is_chart())
        .filter(|kind| options.hierarchy_json || !kind.is_hierarchy())
        .map(|kind| {
            let path = match (kind, kind.grouping()) {
                (ArtifactKind::Overview, _) | (_, None) => paths.overview().to_path_buf(),
                (k, Some(grouping)) if k.is_hierarchy() => paths.hierarchy(grouping),
                (ArtifactKind::CategoryTable | ArtifactKind::MediaTable, Some(grouping)) => {
                    paths.table(grouping, options.table_format)
                }
                (ArtifactKind::CategoryBubble | ArtifactKind::MediaBubble, Some(grouping)) => {
                    paths.bubble(grouping, options.bubble_format)
                }
                (_, Some(grouping)) => paths.sunburst(grouping, options.sunburst_format),
            };
            (kind, path)
        })
        .collect()
}

/// すべての成果物を並列に生成する
///
/// 各タスクは行と設定を読むだけで、互いに状態を共有しません。
/// 1つのタスクの失敗は他のタスクに影響せず、レポートに記録されます。
pub(crate) fn run_artifacts(generator: &Generator, rows: &[Row], output: &Path) -> RunReport {
    let planned = planned_artifacts(generator, output);

    // 並列生成（インデックス付き）
    let mut results: Vec<(usize, ArtifactReport)> = planned
        .into_par_iter()
        .enumerate()
        .map(|(index, (kind, path))| {
            let outcome = produce(generator, rows, kind, &path);
            match &outcome {
                Ok(()) => info!(artifact = %kind, path = %path.display(), "artifact written"),
                Err(e) => error!(artifact = %kind, path = %path.display(), error = %e, "artifact failed"),
            }
            (index, ArtifactReport { kind, path, outcome })
        })
        .collect();

    // インデックス順にソート（成果物の順序を保持）
    results.sort_by_key(|(index, _)| *index);

    RunReport {
        artifacts: results.into_iter().map(|(_, report)| report).collect(),
    }
}

/// 1つの成果物を生成する（内部ヘルパー）
fn produce(
    generator: &Generator,
    rows: &[Row],
    kind: ArtifactKind,
    path: &Path,
) -> Result<(), StandardsMapError> {
    let options = generator.options();
    let config = &options.dataset;

    let Some(grouping) = kind.grouping() else {
        let markdown = render_overview(rows, config);
        return generator.exporter_for(path).export(&markdown, path);
    };

    match kind {
        ArtifactKind::CategoryTable | ArtifactKind::MediaTable => {
            let taxonomy = Taxonomy::for_grouping(grouping, rows, config);
            let grid = build_presence_grid(rows, config, grouping, &taxonomy);
            let formatter = OutputFormatter::from_format(options.table_format);
            match options.table_format {
                TableFormat::Markdown => {
                    let markdown = formatter.render_to_string(&grid)?;
                    generator.exporter_for(path).export(&markdown, path)
                }
                _ => {
                    let mut writer = BufWriter::new(File::create(path)?);
                    formatter.render(&grid, &mut writer)?;
                    writer.flush()?;
                    Ok(())
                }
            }
        }
        ArtifactKind::CategoryBubble | ArtifactKind::MediaBubble => {
            let root = hierarchy_for(generator, rows, grouping);
            let taxonomy = Taxonomy::for_grouping(grouping, rows, config);
            let chart = ChartSpec::bubble(&root, &taxonomy, options.radius_policy, &config.charts);
            render_chart(generator, &chart, options.bubble_format, path)
        }
        ArtifactKind::CategorySunburst | ArtifactKind::MediaSunburst => {
            let root = hierarchy_for(generator, rows, grouping);
            let chart = ChartSpec::sunburst(&root, &config.charts);
            render_chart(generator, &chart, options.sunburst_format, path)
        }
        ArtifactKind::CategoryHierarchy | ArtifactKind::MediaHierarchy => {
            let root = hierarchy_for(generator, rows, grouping);
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &root)?;
            writeln!(writer)?;
            writer.flush()?;
            Ok(())
        }
        ArtifactKind::Overview => Ok(()),
    }
}

fn hierarchy_for(generator: &Generator, rows: &[Row], grouping: GroupingField) -> HierarchyNode {
    let options = generator.options();
    build_hierarchy(
        rows,
        &options.dataset.layout,
        grouping,
        options.weight_column,
        &options.dataset.root_label,
    )
}

fn render_chart(
    generator: &Generator,
    chart: &ChartSpec,
    format: ChartFormat,
    path: &Path,
) -> Result<(), StandardsMapError> {
    let renderer = generator
        .renderer_for(format)
        .ok_or_else(|| render_error(path, format!("no renderer for {}", format.extension())))?;
    renderer.render(chart, path)
}
