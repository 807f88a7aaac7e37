//! CLI Module
//!
//! clapのderiveによるコマンドライン引数の定義。
//! 値の列挙型はライブラリの型へ変換されます。

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use standards_map::{ChartFormat, LogFormat, TableFormat};

#[derive(Parser, Debug)]
#[command(
    name = "standards-map",
    version,
    about = "Generate a standards overview, presence tables and charts from a spreadsheet"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// ログを詳細にする（-vでdebug、-vvでtrace）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// ログの出力形式
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// スプレッドシートを読み込み、すべての成果物を生成する
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// 入力スプレッドシート（.xlsx / .xls / .ods）
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// 基準出力パス（概要文書）。拡張子が.md以外ならpandocで変換する
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// データセット設定ファイル（TOML）
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// バブルチャートの形式
    #[arg(long = "bubble-format", value_enum, default_value = "png")]
    pub bubble_format: ChartFormatArg,

    /// サンバーストの形式
    #[arg(long = "sunburst-format", value_enum, default_value = "svg")]
    pub sunburst_format: ChartFormatArg,

    /// 存在表の形式
    #[arg(long = "table-format", value_enum, default_value = "markdown")]
    pub table_format: TableFormatArg,

    /// チャートを生成しない
    #[arg(long = "no-charts")]
    pub no_charts: bool,

    /// 階層をJSONとしても書き出す
    #[arg(long = "emit-hierarchy-json")]
    pub emit_hierarchy_json: bool,

    /// 葉の重みを読む列（0始まり）
    #[arg(long = "weight-column", value_name = "INDEX")]
    pub weight_column: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ChartFormatArg {
    Png,
    Svg,
}

impl From<ChartFormatArg> for ChartFormat {
    fn from(value: ChartFormatArg) -> Self {
        match value {
            ChartFormatArg::Png => ChartFormat::Png,
            ChartFormatArg::Svg => ChartFormat::Svg,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TableFormatArg {
    Markdown,
    Html,
    Json,
}

impl From<TableFormatArg> for TableFormat {
    fn from(value: TableFormatArg) -> Self {
        match value {
            TableFormatArg::Markdown => TableFormat::Markdown,
            TableFormatArg::Html => TableFormat::Html,
            TableFormatArg::Json => TableFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
