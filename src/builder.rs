//! Builder Module
//!
//! Fluent Builder APIを提供し、`Generator`インスタンスを段階的に構築する。

use std::fmt;
use std::path::{Path, PathBuf};

use crate::api::{ChartFormat, RadiusPolicy, TableFormat};
use crate::chart::{ChartRenderer, PngRenderer, SvgRenderer};
use crate::config::DatasetConfig;
use crate::error::StandardsMapError;
use crate::export::{is_markdown_path, DocumentExporter, MarkdownExporter, PandocExporter};
use crate::parser::{CalamineReader, SpreadsheetReader};
use crate::pipeline::{self, RunReport};
use crate::types::Row;

/// 生成処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct GenerationOptions {
    /// データセット設定（列レイアウト、分類、配色表）
    pub dataset: DatasetConfig,

    /// バブルチャートの出力形式
    pub bubble_format: ChartFormat,

    /// サンバーストの出力形式
    pub sunburst_format: ChartFormat,

    /// 存在表の出力形式
    pub table_format: TableFormat,

    /// チャートを生成するか
    pub charts: bool,

    /// 階層をJSONとして書き出すか
    pub hierarchy_json: bool,

    /// バブルの半径ポリシー
    pub radius_policy: RadiusPolicy,

    /// 葉の重みを読む列（Noneの場合はすべて1）
    pub weight_column: Option<usize>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            bubble_format: ChartFormat::Png,
            sunburst_format: ChartFormat::Svg,
            table_format: TableFormat::Markdown,
            charts: true,
            hierarchy_json: false,
            radius_policy: RadiusPolicy::default(),
            weight_column: None,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Generator`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use standards_map::{ChartFormat, GeneratorBuilder};
///
/// # fn main() -> Result<(), standards_map::StandardsMapError> {
/// let generator = GeneratorBuilder::new()
///     .with_bubble_format(ChartFormat::Svg)
///     .with_hierarchy_json(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct GeneratorBuilder {
    /// 内部設定（構築中）
    options: GenerationOptions,

    /// 設定ファイル（`build()`時に読み込む）
    config_file: Option<PathBuf>,

    reader: Option<Box<dyn SpreadsheetReader>>,
    exporter: Option<Box<dyn DocumentExporter>>,
    renderers: Vec<Box<dyn ChartRenderer>>,
}

impl fmt::Debug for GeneratorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorBuilder")
            .field("options", &self.options)
            .field("config_file", &self.config_file)
            .field("custom_reader", &self.reader.is_some())
            .field("custom_exporter", &self.exporter.is_some())
            .field("custom_renderers", &self.renderers.len())
            .finish()
    }
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - データセット設定: 組み込みの列レイアウトと6カテゴリ
    /// - バブルチャート: PNG
    /// - サンバースト: SVG
    /// - 存在表: Markdown
    /// - チャート生成: 有効
    /// - 階層JSON: 無効
    /// - 半径ポリシー: 固定10px
    pub fn new() -> Self {
        Self {
            options: GenerationOptions::default(),
            config_file: None,
            reader: None,
            exporter: None,
            renderers: Vec::new(),
        }
    }

    /// データセット設定を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use standards_map::{DatasetConfig, GeneratorBuilder};
    ///
    /// let mut config = DatasetConfig::default();
    /// config.marker = "✓".to_string();
    /// let builder = GeneratorBuilder::new().with_dataset_config(config);
    /// ```
    pub fn with_dataset_config(mut self, config: DatasetConfig) -> Self {
        self.options.dataset = config;
        self
    }

    /// TOML設定ファイルを指定する
    ///
    /// ファイルは`build()`時に読み込まれ、`with_dataset_config`の指定を置き換えます。
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// バブルチャートの出力形式を指定する
    pub fn with_bubble_format(mut self, format: ChartFormat) -> Self {
        self.options.bubble_format = format;
        self
    }

    /// サンバーストの出力形式を指定する
    pub fn with_sunburst_format(mut self, format: ChartFormat) -> Self {
        self.options.sunburst_format = format;
        self
    }

    /// 存在表の出力形式を指定する
    pub fn with_table_format(mut self, format: TableFormat) -> Self {
        self.options.table_format = format;
        self
    }

    /// チャートを生成するかを指定する
    ///
    /// # 引数
    ///
    /// * `enabled: bool`:
    ///   * `true`: バブルチャートとサンバーストを生成する（デフォルト）
    ///   * `false`: 文書系の成果物のみを生成する
    pub fn with_charts(mut self, enabled: bool) -> Self {
        self.options.charts = enabled;
        self
    }

    /// 階層をJSONとして書き出すかを指定する
    pub fn with_hierarchy_json(mut self, enabled: bool) -> Self {
        self.options.hierarchy_json = enabled;
        self
    }

    /// バブルの半径ポリシーを指定する
    ///
    /// # 制約
    ///
    /// * 半径（または値1あたりの半径）は正の有限値でなければならない
    /// * 制約違反の場合、`build()`時に`StandardsMapError::Config`を返す
    pub fn with_radius_policy(mut self, policy: RadiusPolicy) -> Self {
        self.options.radius_policy = policy;
        self
    }

    /// 葉の重みを読む列（0始まり）を指定する
    pub fn with_weight_column(mut self, column: usize) -> Self {
        self.options.weight_column = Some(column);
        self
    }

    /// スプレッドシートリーダーを差し替える
    pub fn with_reader(mut self, reader: Box<dyn SpreadsheetReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// 文書エクスポーターを差し替える
    ///
    /// 指定しない場合は、出力パスの拡張子に応じてMarkdown / pandocを選びます。
    pub fn with_exporter(mut self, exporter: Box<dyn DocumentExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// チャートレンダラーを追加する
    ///
    /// 同じ形式の組み込みレンダラーより優先されます。
    pub fn with_renderer(mut self, renderer: Box<dyn ChartRenderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    /// 設定を検証し、`Generator`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Generator)`: 設定が有効な場合、Generatorインスタンス
    /// * `Err(StandardsMapError)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * `StandardsMapError::Io` / `StandardsMapError::ConfigFile`: 設定ファイルを読めない場合
    /// * `StandardsMapError::Config(String)`: 設定の検証に失敗した場合
    ///   * データセット設定の検証エラー（`DatasetConfig::validate`）
    ///   * 半径が正の有限値でない
    pub fn build(mut self) -> Result<Generator, StandardsMapError> {
        // 1. 設定ファイルの読み込み
        if let Some(path) = &self.config_file {
            self.options.dataset = DatasetConfig::load(path)?;
        }

        // 2. データセット設定の検証
        self.options.dataset.validate()?;

        // 3. 半径ポリシーの検証
        let radius = match self.options.radius_policy {
            RadiusPolicy::Fixed(r) => r,
            RadiusPolicy::Scaled { per_unit } => per_unit,
        };
        if !radius.is_finite() || radius <= 0.0 {
            return Err(StandardsMapError::Config(format!(
                "Bubble radius must be positive: {}",
                radius
            )));
        }

        // 4. Generatorインスタンス生成
        let reader = self.reader.unwrap_or_else(|| {
            Box::new(CalamineReader::new(
                self.options.dataset.sheet.clone(),
                self.options.dataset.date_format.clone(),
            ))
        });
        let mut renderers = self.renderers;
        renderers.push(Box::new(SvgRenderer::new()));
        renderers.push(Box::new(PngRenderer::new()));

        Ok(Generator {
            options: self.options,
            reader,
            exporter: self.exporter,
            renderers,
            markdown: MarkdownExporter,
            pandoc: PandocExporter::default(),
        })
    }
}

/// 生成処理のファサード
///
/// スプレッドシートを1回読み込み、概要文書・存在表・チャートを
/// 1つの基準出力パスから導出した兄弟パスに書き出します。
///
/// # 使用例
///
/// ```rust,no_run
/// use standards_map::GeneratorBuilder;
/// use std::path::Path;
///
/// # fn main() -> Result<(), standards_map::StandardsMapError> {
/// let generator = GeneratorBuilder::new().build()?;
/// let report = generator.run(Path::new("standards.xlsx"), Path::new("out/standards.md"))?;
/// for artifact in &report.artifacts {
///     println!("{} -> {}", artifact.kind, artifact.path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Generator {
    options: GenerationOptions,
    reader: Box<dyn SpreadsheetReader>,
    exporter: Option<Box<dyn DocumentExporter>>,
    renderers: Vec<Box<dyn ChartRenderer>>,
    markdown: MarkdownExporter,
    pandoc: PandocExporter,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("options", &self.options)
            .field("custom_exporter", &self.exporter.is_some())
            .field("renderers", &self.renderers.len())
            .finish()
    }
}

impl Generator {
    /// 入力を読み込み、すべての成果物を生成する
    ///
    /// # 引数
    ///
    /// * `input` - 入力スプレッドシートのパス
    /// * `output` - 基準出力パス（概要文書のパス）
    ///
    /// # 戻り値
    ///
    /// * `Ok(RunReport)` - 入力を読み込めた場合。成果物ごとの成否を含む
    /// * `Err(StandardsMapError)` - 入力を読み込めなかった場合（成果物は書き出されない）
    pub fn run(&self, input: &Path, output: &Path) -> Result<RunReport, StandardsMapError> {
        let rows = self.reader.read_rows(input)?;
        Ok(self.generate(&rows, output))
    }

    /// 読み込み済みの行からすべての成果物を生成する
    ///
    /// 成果物は独立したタスクとして並列に生成されます。1つの失敗は他の成果物に影響しません。
    pub fn generate(&self, rows: &[Row], output: &Path) -> RunReport {
        pipeline::run_artifacts(self, rows, output)
    }

    pub(crate) fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// 出力パスに対応するエクスポーター
    pub(crate) fn exporter_for(&self, path: &Path) -> &dyn DocumentExporter {
        match &self.exporter {
            Some(exporter) => exporter.as_ref(),
            None if is_markdown_path(path) => &self.markdown,
            None => &self.pandoc,
        }
    }

    /// 形式に対応するレンダラー（先に登録されたものが優先）
    pub(crate) fn renderer_for(&self, format: ChartFormat) -> Option<&dyn ChartRenderer> {
        self.renderers
            .iter()
            .find(|r| r.format() == format)
            .map(|r| r.as_ref())
    }
}
