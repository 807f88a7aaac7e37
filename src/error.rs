//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// standards-mapクレート全体で使用するエラー型
///
/// スプレッドシートの読み込み、設定の検証、成果物（文書・チャート）の書き出し中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの分類
///
/// - 入力エラー（`Io`, `Parse`, `EmptyWorkbook`, `SecurityViolation`）: 致命的。出力は生成されない
/// - 設定エラー（`Config`, `ConfigFile`）: 致命的。`GeneratorBuilder::build()`または設定ファイル読み込み時
/// - 成果物エラー（`Export`, `Render`, `Json`）: 成果物ごとに捕捉され、他の成果物の生成は継続される
///
/// # 使用例
///
/// ```rust,no_run
/// use standards_map::StandardsMapError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<(), StandardsMapError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum StandardsMapError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `GeneratorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、カテゴリ分類が空の場合や、日付形式が不正な場合などです。
    ///
    /// ```rust,no_run
    /// use standards_map::{DatasetConfig, GeneratorBuilder, StandardsMapError};
    ///
    /// let mut config = DatasetConfig::default();
    /// config.categories.clear();
    ///
    /// match GeneratorBuilder::new().with_dataset_config(config).build() {
    ///     Err(StandardsMapError::Config(msg)) => println!("設定エラー: {}", msg),
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML設定ファイルの解析エラー
    #[error("Failed to parse configuration file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    /// JSONシリアライズエラー（階層ダンプ出力時）
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// ワークブックに読み込めるシートが存在しない
    #[error("Workbook contains no worksheet")]
    EmptyWorkbook,

    /// 文書エクスポーターの失敗
    #[error("Failed to export document '{}': {message}", path.display())]
    Export {
        /// 書き出し先のパス
        path: PathBuf,
        /// 失敗の詳細
        message: String,
    },

    /// チャートレンダラーの失敗
    #[error("Failed to render chart '{}': {message}", path.display())]
    Render {
        /// 書き出し先のパス
        path: PathBuf,
        /// 失敗の詳細
        message: String,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限などに違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
