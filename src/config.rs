//! Dataset Configuration Module
//!
//! データセットの形（列レイアウト、フィールド見出し、分類、配色表）を
//! 1つの設定構造体にまとめるモジュール。
//! 既定値は組み込みのデータセット形状で、TOMLファイルで上書きできます。

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::Field;
use crate::error::StandardsMapError;

/// 列レイアウト（フィールド → 0始まりの列インデックス）
///
/// 列の意味はデータではなく設定です。データセットを変える場合は
/// 行の形ではなくこの対応表を変更します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub name: usize,
    pub categories: usize,
    pub group: usize,
    pub standard: usize,
    pub link: usize,
    pub status: usize,
    /// 日付列（`None`の場合、日付フィールドは常に空として扱う）
    pub date: Option<usize>,
    pub media: usize,
    pub summary: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: 0,
            categories: 1,
            group: 2,
            standard: 3,
            link: 4,
            status: 5,
            date: Some(6),
            media: 7,
            summary: 8,
        }
    }
}

impl ColumnLayout {
    /// フィールドに対応する列インデックスを取得
    pub fn index(&self, field: Field) -> Option<usize> {
        match field {
            Field::Name => Some(self.name),
            Field::Categories => Some(self.categories),
            Field::Group => Some(self.group),
            Field::Standard => Some(self.standard),
            Field::Link => Some(self.link),
            Field::Status => Some(self.status),
            Field::Date => self.date,
            Field::Media => Some(self.media),
            Field::Summary => Some(self.summary),
        }
    }
}

/// フィールドごとの見出し（Markdown断片）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTitles {
    pub name: String,
    pub categories: String,
    pub group: String,
    pub standard: String,
    pub link: String,
    pub status: String,
    pub date: String,
    pub media: String,
    pub summary: String,
}

impl Default for FieldTitles {
    fn default() -> Self {
        Self {
            name: "##".to_string(),
            categories: "- **Categories:**".to_string(),
            group: "- **SDO/Group:**".to_string(),
            standard: "- **Standard:**".to_string(),
            link: "- **Link:**".to_string(),
            status: "- **Status:**".to_string(),
            date: "- **Date:**".to_string(),
            media: "- **Media:**".to_string(),
            summary: "- **Summary:**".to_string(),
        }
    }
}

impl FieldTitles {
    /// フィールドの見出しを取得
    pub fn title(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Categories => &self.categories,
            Field::Group => &self.group,
            Field::Standard => &self.standard,
            Field::Link => &self.link,
            Field::Status => &self.status,
            Field::Date => &self.date,
            Field::Media => &self.media,
            Field::Summary => &self.summary,
        }
    }
}

/// チャートの寸法と配色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// 幅（px）
    pub width: u32,
    /// 高さ（px）
    pub height: u32,
    /// サンバースト: グループ名 → 塗り色
    pub sunburst_colors: BTreeMap<String, String>,
    /// サンバースト: 配色表にない名前の塗り色
    pub neutral_color: String,
    /// バブルチャート: x軸ラベル → 点の色
    pub point_colors: BTreeMap<String, String>,
    /// バブルチャート: 配色表にないラベルの点の色
    pub default_point_color: String,
    /// サンバースト中央のラベル
    pub center_label: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        let sunburst_colors = [
            ("Content Provenance", "#FFD966"),
            ("Trust and Authenticity", "#B4A7D6"),
            ("Asset Identifiers", "#EA9999"),
            ("Rights Declarations", "#93C47D"),
            ("Watermarking", "#EAD1DC"),
            ("Other", "#CCCCCC"),
            ("Specification", "#F3F3F3"),
        ];
        let point_colors = [
            ("Content Provenance", "red"),
            ("Trust and Authenticity", "orange"),
            ("Asset Identifiers", "yellow"),
            ("Rights Declarations", "green"),
            ("Watermarking", "blue"),
            ("Other", "purple"),
        ];

        Self {
            width: 800,
            height: 800,
            sunburst_colors: sunburst_colors
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            neutral_color: "#eeeeee".to_string(),
            point_colors: point_colors
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            default_point_color: "rgba(75,192,192,1)".to_string(),
            center_label: "AI & Multimedia Authenticity Standardization Map".to_string(),
        }
    }
}

impl ChartStyle {
    /// サンバーストの塗り色を名前から引く
    pub fn fill_for(&self, name: &str) -> &str {
        self.sunburst_colors
            .get(name)
            .map(String::as_str)
            .unwrap_or(&self.neutral_color)
    }

    /// バブルの点の色をx軸ラベルから引く
    pub fn point_color_for(&self, label: &str) -> &str {
        self.point_colors
            .get(label)
            .map(String::as_str)
            .unwrap_or(&self.default_point_color)
    }
}

/// データセット設定
///
/// 列レイアウト、カテゴリ分類、配色表など、各コンポーネントで共有する
/// 固定語彙をまとめた構造体です。すべてのレンダラーに同じインスタンスが渡されます。
///
/// # 使用例
///
/// ```rust
/// use standards_map::DatasetConfig;
///
/// let config = DatasetConfig::from_toml_str(r#"
///     categories = ["Provenance", "Other"]
///
///     [layout]
///     date = 9
/// "#).unwrap();
///
/// assert_eq!(config.categories.len(), 2);
/// assert_eq!(config.layout.date, Some(9));
/// assert_eq!(config.layout.name, 0); // 未指定の項目は既定値
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// 読み込むシート名（`None`の場合は先頭シート）
    pub sheet: Option<String>,
    /// 列レイアウト
    pub layout: ColumnLayout,
    /// フィールド見出し
    pub titles: FieldTitles,
    /// 概要文書に出力するフィールドと順序
    pub overview_fields: Vec<Field>,
    /// 固定のカテゴリ分類（存在表の列順・チャートのx軸）
    pub categories: Vec<String>,
    /// 「すべてに該当」を意味するメディア値の接頭辞
    pub reserved_media_prefix: String,
    /// メディア分類の末尾に追加する包括エントリ
    pub media_catch_all: String,
    /// 存在表の「該当」マーカー
    pub marker: String,
    /// カテゴリ存在表の先頭列見出し
    pub category_table_label: String,
    /// メディア存在表の先頭列見出し
    pub media_table_label: String,
    /// 階層のルートノード名
    pub root_label: String,
    /// 日付セルの出力形式（chrono互換）
    pub date_format: String,
    /// チャートの寸法と配色
    pub charts: ChartStyle,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            layout: ColumnLayout::default(),
            titles: FieldTitles::default(),
            overview_fields: vec![
                Field::Name,
                Field::Group,
                Field::Link,
                Field::Status,
                Field::Date,
                Field::Media,
                Field::Summary,
            ],
            categories: [
                "Content Provenance",
                "Trust and Authenticity",
                "Asset Identifiers",
                "Rights Declarations",
                "Watermarking",
                "Other",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            reserved_media_prefix: "Any".to_string(),
            media_catch_all: "Others".to_string(),
            marker: "X".to_string(),
            category_table_label: "Specification".to_string(),
            media_table_label: "Standard".to_string(),
            root_label: "Standards".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            charts: ChartStyle::default(),
        }
    }
}

impl DatasetConfig {
    /// TOML文字列から設定を読み込む（未指定の項目は既定値）
    pub fn from_toml_str(source: &str) -> Result<Self, StandardsMapError> {
        Ok(toml::from_str(source)?)
    }

    /// TOMLファイルから設定を読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StandardsMapError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// 設定を検証する
    ///
    /// # 発生し得るエラー
    ///
    /// * `StandardsMapError::Config(String)`:
    ///   * カテゴリ分類が空、または重複エントリを含む
    ///   * メディアの予約接頭辞・包括エントリが空
    ///   * 名前列が他のフィールドの列と重複している
    ///   * 日付形式が不正な書式文字列
    ///   * チャートの寸法が0
    pub fn validate(&self) -> Result<(), StandardsMapError> {
        // 1. カテゴリ分類の検証
        if self.categories.is_empty() {
            return Err(StandardsMapError::Config(
                "Category taxonomy must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.trim().is_empty() {
                return Err(StandardsMapError::Config(
                    "Category taxonomy contains an empty entry".to_string(),
                ));
            }
            if !seen.insert(category.as_str()) {
                return Err(StandardsMapError::Config(format!(
                    "Duplicate category in taxonomy: '{}'",
                    category
                )));
            }
        }

        // 2. メディア分類の語彙
        if self.reserved_media_prefix.is_empty() {
            return Err(StandardsMapError::Config(
                "Reserved media prefix must not be empty".to_string(),
            ));
        }
        if self.media_catch_all.trim().is_empty() {
            return Err(StandardsMapError::Config(
                "Media catch-all label must not be empty".to_string(),
            ));
        }

        // 3. 列レイアウト: 名前列は他の列と共有できない
        let name = self.layout.name;
        for field in Field::ALL.iter().filter(|f| **f != Field::Name) {
            if self.layout.index(*field) == Some(name) {
                return Err(StandardsMapError::Config(format!(
                    "Column {} is assigned to both name and {:?}",
                    name, field
                )));
            }
        }

        // 4. 日付形式の検証（テスト用の日付でフォーマット試行）
        let test_date = NaiveDate::from_ymd_opt(2025, 1, 1)
            .ok_or_else(|| StandardsMapError::Config("Failed to create test date".to_string()))?;
        let mut formatted = String::new();
        if std::fmt::write(
            &mut formatted,
            format_args!("{}", test_date.format(&self.date_format)),
        )
        .is_err()
            || formatted.is_empty()
        {
            return Err(StandardsMapError::Config(format!(
                "Invalid date format string: '{}'",
                self.date_format
            )));
        }

        // 5. チャート寸法
        if self.charts.width == 0 || self.charts.height == 0 {
            return Err(StandardsMapError::Config(format!(
                "Chart size must be positive: {}x{}",
                self.charts.width, self.charts.height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DatasetConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_categories_order() {
        let config = DatasetConfig::default();
        assert_eq!(
            config.categories,
            vec![
                "Content Provenance",
                "Trust and Authenticity",
                "Asset Identifiers",
                "Rights Declarations",
                "Watermarking",
                "Other",
            ]
        );
    }

    #[test]
    fn test_layout_index() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.index(Field::Name), Some(0));
        assert_eq!(layout.index(Field::Media), Some(7));
        assert_eq!(layout.index(Field::Summary), Some(8));

        let without_date = ColumnLayout {
            date: None,
            ..Default::default()
        };
        assert_eq!(without_date.index(Field::Date), None);
    }

    #[test]
    fn test_fill_lookup_falls_back_to_neutral() {
        let style = ChartStyle::default();
        assert_eq!(style.fill_for("Watermarking"), "#EAD1DC");
        assert_eq!(style.fill_for("Unknown"), "#eeeeee");
        assert_eq!(style.point_color_for("Other"), "purple");
        assert_eq!(style.point_color_for("Video"), "rgba(75,192,192,1)");
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = DatasetConfig::from_toml_str(
            r##"
            marker = "✓"
            overview_fields = ["name", "summary"]

            [layout]
            media = 6
            summary = 7
            date = 10

            [charts]
            width = 1024
            neutral_color = "#000000"

            [charts.sunburst_colors]
            "Content Provenance" = "#111111"
            "##,
        )
        .unwrap();

        assert_eq!(config.marker, "✓");
        assert_eq!(config.overview_fields, vec![Field::Name, Field::Summary]);
        assert_eq!(config.layout.media, 6);
        assert_eq!(config.layout.date, Some(10));
        assert_eq!(config.layout.link, 4);
        assert_eq!(config.charts.width, 1024);
        assert_eq!(config.charts.height, 800);
        assert_eq!(config.charts.fill_for("Content Provenance"), "#111111");
        // テーブルを指定すると既定の配色表は置き換えられる
        assert_eq!(config.charts.fill_for("Watermarking"), "#000000");
        assert_eq!(config.categories.len(), 6);
    }

    #[test]
    fn test_from_toml_invalid() {
        let result = DatasetConfig::from_toml_str("marker = [");
        assert!(matches!(result, Err(StandardsMapError::ConfigFile(_))));
    }

    #[test]
    fn test_validate_empty_categories() {
        let config = DatasetConfig {
            categories: vec![],
            ..Default::default()
        };
        match config.validate() {
            Err(StandardsMapError::Config(msg)) => assert!(msg.contains("must not be empty")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_duplicate_category() {
        let config = DatasetConfig {
            categories: vec!["Other".to_string(), "Other".to_string()],
            ..Default::default()
        };
        match config.validate() {
            Err(StandardsMapError::Config(msg)) => assert!(msg.contains("Duplicate category")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_name_column_collision() {
        let config = DatasetConfig {
            layout: ColumnLayout {
                summary: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        match config.validate() {
            Err(StandardsMapError::Config(msg)) => assert!(msg.contains("both name and Summary")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_invalid_date_format() {
        let config = DatasetConfig {
            date_format: String::new(),
            ..Default::default()
        };
        match config.validate() {
            Err(StandardsMapError::Config(msg)) => assert!(msg.contains("Invalid date format")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_zero_chart_size() {
        let mut config = DatasetConfig::default();
        config.charts.height = 0;
        assert!(matches!(
            config.validate(),
            Err(StandardsMapError::Config(_))
        ));
    }
}
