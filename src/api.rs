//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use serde::{Deserialize, Serialize};

/// データセットのフィールド識別子
///
/// 行モデルの列と1対1で対応します。閉じた列挙型なので、
/// 未知のフィールドIDを渡すことは型システム上できません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// 規格名（見出しになる）
    Name,
    /// カテゴリ（改行区切りの複数値）
    Categories,
    /// 策定団体（SDO / グループ）
    Group,
    /// 規格ラベル（リンクのアンカーテキストに使用）
    Standard,
    /// 規格文書へのリンク
    Link,
    /// 策定状況
    Status,
    /// 日付
    Date,
    /// メディア種別（改行区切りの複数値）
    Media,
    /// 概要
    Summary,
}

impl Field {
    /// すべてのフィールド（列レイアウトの既定順）
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Categories,
        Field::Group,
        Field::Standard,
        Field::Link,
        Field::Status,
        Field::Date,
        Field::Media,
        Field::Summary,
    ];
}

/// 階層化・存在表で使用する複数値フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupingField {
    /// カテゴリ列でグループ化
    Categories,
    /// メディア種別列でグループ化
    Media,
}

impl GroupingField {
    /// 対応する行フィールド
    pub fn field(self) -> Field {
        match self {
            GroupingField::Categories => Field::Categories,
            GroupingField::Media => Field::Media,
        }
    }
}

/// チャートの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ChartFormat {
    /// ラスタ画像（resvgでSVGをラスタライズ）
    Png,
    /// ベクター画像
    Svg,
}

impl ChartFormat {
    /// 出力ファイルの拡張子（ドットなし）
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

/// 存在表の出力形式
///
/// `Markdown`は概要文書と同じエクスポーター（出力パスの拡張子で決まる）を通ります。
/// `Html`と`Json`はグリッドを直接書き出します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum TableFormat {
    /// Markdownパイプテーブル（デフォルト）
    #[default]
    Markdown,
    /// HTMLテーブル
    Html,
    /// JSON（`{label, columns, rows}`）
    Json,
}

impl TableFormat {
    /// 直接書き出す形式の拡張子（`Markdown`はエクスポーター任せなので`None`）
    pub fn extension(self) -> Option<&'static str> {
        match self {
            TableFormat::Markdown => None,
            TableFormat::Html => Some("html"),
            TableFormat::Json => Some("json"),
        }
    }
}

/// バブルチャートの点の半径ポリシー
///
/// 元の葉の値（既定では1）から半径を決める方法を指定します。
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum RadiusPolicy {
    /// すべての点で固定半径（既定: 10px）
    Fixed(f64),

    /// 葉の値に比例した半径（`value * per_unit`）
    ///
    /// 重み列を設定した場合に意味を持ちます。
    Scaled {
        /// 値1あたりの半径（px）
        per_unit: f64,
    },
}

impl RadiusPolicy {
    /// 葉の値から半径を計算する
    pub fn radius(self, value: f64) -> f64 {
        match self {
            RadiusPolicy::Fixed(r) => r,
            RadiusPolicy::Scaled { per_unit } => value * per_unit,
        }
    }
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        RadiusPolicy::Fixed(10.0)
    }
}
