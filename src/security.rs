//! Security Module
//!
//! 入力ファイルに対するセキュリティ制限を実装するモジュール。
//! 巨大な入力ファイルをメモリに読み込む前に拒否します。

use crate::error::StandardsMapError;

/// セキュリティ設定
///
/// ファイル処理時のセキュリティ制限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 256MB (268_435_456 bytes)
    pub max_input_file_size: u64,
    /// 読み込む最大行数（ヘッダー行を含む）
    /// デフォルト: 1_048_576（Excelの最大行数）
    pub max_rows: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 268_435_456, // 256MB
            max_rows: 1_048_576,
        }
    }
}

impl SecurityConfig {
    /// 入力サイズを検証する
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 上限以内の場合
    /// * `Err(StandardsMapError::SecurityViolation)` - 上限を超える場合
    pub fn check_input_size(&self, bytes: u64) -> Result<(), StandardsMapError> {
        if bytes > self.max_input_file_size {
            return Err(StandardsMapError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes, self.max_input_file_size
            )));
        }
        Ok(())
    }

    /// 行数を検証する
    pub fn check_row_count(&self, rows: usize) -> Result<(), StandardsMapError> {
        if rows > self.max_rows {
            return Err(StandardsMapError::SecurityViolation(format!(
                "Row count exceeds maximum: {} rows (max: {} rows)",
                rows, self.max_rows
            )));
        }
        Ok(())
    }
}
