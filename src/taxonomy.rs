//! Taxonomy Module
//!
//! 存在表の列・チャートのx軸に使う分類（カテゴリ／メディア種別）を扱うモジュール。

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::api::{Field, GroupingField};
use crate::config::DatasetConfig;
use crate::types::{data_rows, Row};

/// 順序付きの分類ラベル列
///
/// 1回の実行の中で一度だけ計算し、ヘッダーとすべての行で再利用します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Taxonomy {
    entries: Vec<String>,
}

impl Taxonomy {
    /// 固定の分類を生成
    pub fn fixed<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// 設定されたカテゴリ分類
    pub fn categories(config: &DatasetConfig) -> Self {
        Self::fixed(config.categories.iter().cloned())
    }

    /// メディア種別の分類をデータから発見する
    ///
    /// すべてのデータ行（名前のない行も含む）を1回走査し、重複を除いて辞書順に並べ、
    /// 予約接頭辞（「すべてに該当」）で始まるエントリを除外して、
    /// 末尾に包括エントリを追加します。結果は行の順序に依存しません。
    pub fn discover_media(rows: &[Row], config: &DatasetConfig) -> Self {
        let layout = &config.layout;
        let mut discovered = BTreeSet::new();

        for row in data_rows(rows) {
            discovered.extend(row.multi_values(layout, Field::Media));
        }

        let mut entries: Vec<String> = discovered
            .into_iter()
            .filter(|value| {
                !value.starts_with(&config.reserved_media_prefix)
                    && *value != config.media_catch_all
            })
            .collect();
        entries.push(config.media_catch_all.clone());

        debug!(entries = entries.len(), "media taxonomy discovered");
        Self { entries }
    }

    /// グループ化フィールドに対応する分類
    ///
    /// カテゴリは固定分類、メディアは発見された分類です。
    pub fn for_grouping(grouping: GroupingField, rows: &[Row], config: &DatasetConfig) -> Self {
        match grouping {
            GroupingField::Categories => Self::categories(config),
            GroupingField::Media => Self::discover_media(rows, config),
        }
    }

    /// ラベルの並び
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// エントリ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// ラベルの位置
    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry == label)
    }
}

/// 値の中に「すべてに該当」を意味するエントリがあるか
pub fn matches_anything(values: &[String], reserved_prefix: &str) -> bool {
    !reserved_prefix.is_empty() && values.iter().any(|v| v.starts_with(reserved_prefix))
}
