//! Overview Renderer
//!
//! すべてのデータ行をフィールドフォーマッターに通し、1つのMarkdown文書にまとめます。

use tracing::debug;

use crate::config::DatasetConfig;
use crate::formatter::FieldFormatter;
use crate::types::{data_rows, Row};

/// 概要文書を生成する
///
/// 名前を持つデータ行ごとに、設定された順序（既定: 名前・団体・リンク・状況・日付・
/// メディア・概要）でフィールド断片を連結します。行は入力順に出力され、
/// 同じ入力に対して常にバイト単位で同じ文書を返します。
///
/// # 引数
///
/// * `rows` - ヘッダー行を含む全行
/// * `config` - データセット設定
///
/// # 戻り値
///
/// Markdown文書（データ行がない場合は空文字列）
pub fn render_overview(rows: &[Row], config: &DatasetConfig) -> String {
    let formatter = FieldFormatter::new(config);
    let mut markdown = String::new();

    for (index, row) in data_rows(rows).enumerate() {
        if row.name(&config.layout).is_none() {
            debug!(row = index + 1, "row without name skipped");
            continue;
        }
        for field in &config.overview_fields {
            markdown.push_str(&formatter.format_field(row, *field));
        }
    }

    markdown
}
