//! Document Export Module
//!
//! Markdown文書を出力ファイルに書き出すエクスポーターを提供するモジュール。
//! 出力パスの拡張子がMarkdownならそのまま書き出し、それ以外はpandocで変換します。

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::StandardsMapError;

/// 文書エクスポーターのインターフェース
///
/// 成果物ごとに1回呼ばれます。実装は状態を共有せず、並列に呼ばれても安全である必要があります。
pub trait DocumentExporter: Send + Sync {
    /// Markdown文書を`path`に書き出す
    fn export(&self, markdown: &str, path: &Path) -> Result<(), StandardsMapError>;
}

/// Markdownをそのまま書き出すエクスポーター
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl DocumentExporter for MarkdownExporter {
    fn export(&self, markdown: &str, path: &Path) -> Result<(), StandardsMapError> {
        fs::write(path, markdown).map_err(|e| export_error(path, e))
    }
}

/// pandocで変換して書き出すエクスポーター
///
/// `pandoc -f markdown -o <path>`を実行し、Markdownを標準入力に渡します。
/// 出力形式はpandocが出力パスの拡張子から判断します（`.docx`, `.html`, `.pdf`など）。
#[derive(Debug, Clone)]
pub struct PandocExporter {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl Default for PandocExporter {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl PandocExporter {
    /// 実行ファイルを指定して生成
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// 追加のコマンドライン引数（`--reference-doc`など）
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl DocumentExporter for PandocExporter {
    fn export(&self, markdown: &str, path: &Path) -> Result<(), StandardsMapError> {
        debug!(program = %self.program.display(), path = %path.display(), "running pandoc");

        let mut child = Command::new(&self.program)
            .arg("-f")
            .arg("markdown")
            .arg("-o")
            .arg(path)
            .args(&self.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                export_error(
                    path,
                    format!("failed to run {}: {}", self.program.display(), e),
                )
            })?;

        // 書き込みに失敗してもプロセスの終了は必ず待つ。
        // pandocが入力を読む前に終了した場合、理由は標準エラーにある
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(markdown.as_bytes()),
            None => Ok(()),
        };
        let output = child
            .wait_with_output()
            .map_err(|e| export_error(path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(export_error(
                path,
                format!("pandoc exited with {}: {}", output.status, stderr.trim()),
            ));
        }
        write_result.map_err(|e| export_error(path, e))
    }
}

/// Markdownとして直接書き出すパスかどうか
///
/// `.md` / `.markdown` / 拡張子なし → `true`、それ以外はpandocで変換する
pub fn is_markdown_path(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        None => true,
        Some(ext) => ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"),
    }
}

fn export_error(path: &Path, message: impl ToString) -> StandardsMapError {
    StandardsMapError::Export {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
