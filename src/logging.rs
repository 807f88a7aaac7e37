//! Logging Module
//!
//! `tracing`と`tracing-subscriber`によるログ出力の初期化を提供するモジュール。
//! ライブラリ内部はイベントを発行するだけで、購読者の設定はバイナリ側で行います。
//!
//! # ログレベル
//!
//! - `error`: 成果物の生成失敗、入力の読み込み失敗
//! - `info`: 書き出した成果物
//! - `debug`: スキップした行、発見したメディア分類、pandocの実行

use std::io;

use tracing::Level;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// ログ出力の形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// 人が読むための複数行形式
    #[default]
    Pretty,
    /// 1行形式
    Compact,
    /// 機械処理用のJSON形式
    Json,
}

/// ログ出力の設定
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 本クレートのログレベル（`RUST_LOG`が設定されていればそちらを優先）
    pub level: Level,
    /// 出力形式
    pub format: LogFormat,
    /// タイムスタンプを出力するか
    pub with_timestamps: bool,
    /// ANSIカラーを使うか
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::default(),
            with_timestamps: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// `-v`の回数から設定を生成する
    ///
    /// - 0: info
    /// - 1: debug
    /// - 2以上: trace
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    /// 購読者に渡すフィルター
    ///
    /// `RUST_LOG`が有効ならそれを使い、なければ本クレートを`level`、
    /// 外部クレートを`warn`に絞ります。
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = self.level.as_str().to_lowercase();
            EnvFilter::new(format!("warn,standards_map={}", level))
        })
    }
}

/// グローバルな購読者を標準エラー出力に設定する
///
/// 起動時に1回だけ呼び出します。
///
/// # 戻り値
///
/// * `Err` - 購読者がすでに設定されている場合
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    init_logging_with_writer(config, io::stderr)
}

/// 任意のライターに出力する購読者を設定する（テスト用）
pub fn init_logging_with_writer<W>(
    config: &LogConfig,
    writer: W,
) -> Result<(), tracing_subscriber::util::TryInitError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = config.env_filter();

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(writer).with_target(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(false);
            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(false);
            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verbosity() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(5).level, Level::TRACE);
    }

    #[test]
    fn test_builder_methods() {
        let config = LogConfig::default()
            .with_format(LogFormat::Json)
            .with_timestamps(true)
            .with_ansi(false);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.with_timestamps);
        assert!(!config.with_ansi);
    }
}
