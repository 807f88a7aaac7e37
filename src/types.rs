//! Types Module
//!
//! 行モデル（セル値・行・規格）を定義するモジュール。
//! 列の意味は`ColumnLayout`で与えられ、行自体は単なるセル値の並びです。

use std::borrow::Cow;

use serde::Serialize;

use crate::api::{Field, GroupingField};
use crate::config::ColumnLayout;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// 文字列（日付セルは読み込み時に文字列化される）
    String(String),

    /// 数値（f64）
    Number(f64),

    /// 論理値
    Bool(bool),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空文字列・空白のみの文字列も空として扱います。
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Bool(_) => false,
        }
    }

    /// 表示用の文字列を取得（空の場合は`None`）
    ///
    /// 整数値の数値は小数点なしで表示します（例: `2024.0` → `"2024"`）。
    pub fn text(&self) -> Option<Cow<'_, str>> {
        if self.is_empty() {
            return None;
        }
        match self {
            CellValue::String(s) => Some(Cow::Borrowed(s.as_str())),
            CellValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            CellValue::Bool(b) => Some(Cow::Borrowed(if *b { "TRUE" } else { "FALSE" })),
            CellValue::Empty => None,
        }
    }

    /// 数値として取得（数値セル、または数値として解釈できる文字列）
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 1行分のセル値
///
/// 行0はヘッダー（列見出し）で、データとして扱ってはいけません。
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    /// セル値の並びから行を生成
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// 文字列の並びから行を生成（空文字列は空セル）
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| {
                    let t = t.as_ref();
                    if t.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::String(t.to_string())
                    }
                })
                .collect(),
        )
    }

    /// 列数
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// 列が1つもないか
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 指定列のセル（範囲外は`None`）
    pub fn cell(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// 指定列までセル数を揃える（不足分は空セル）
    pub(crate) fn pad_to(&mut self, width: usize) {
        if self.cells.len() < width {
            self.cells.resize(width, CellValue::Empty);
        }
    }

    /// フィールドの表示文字列（空・範囲外・列未割り当ての場合は`None`）
    pub fn text(&self, layout: &ColumnLayout, field: Field) -> Option<Cow<'_, str>> {
        layout
            .index(field)
            .and_then(|i| self.cell(i))
            .and_then(CellValue::text)
    }

    pub fn name(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Name)
    }

    pub fn categories_raw(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Categories)
    }

    pub fn group(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Group)
    }

    pub fn standard_label(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Standard)
    }

    pub fn link(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Link)
    }

    pub fn status(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Status)
    }

    pub fn date(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Date)
    }

    pub fn media_raw(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Media)
    }

    pub fn summary(&self, layout: &ColumnLayout) -> Option<Cow<'_, str>> {
        self.text(layout, Field::Summary)
    }

    /// 複数値フィールドを分割した値の集合（挿入順、重複なし）
    pub fn multi_values(&self, layout: &ColumnLayout, field: Field) -> Vec<String> {
        self.text(layout, field)
            .map(|raw| split_multi_value(&raw))
            .unwrap_or_default()
    }
}

/// 改行区切りの複数値セルを分割する
///
/// 各要素をtrimし、空要素を捨て、重複は最初の出現のみ残します。
pub fn split_multi_value(raw: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for part in raw.lines() {
        let part = part.trim();
        if !part.is_empty() && !values.iter().any(|v| v == part) {
            values.push(part.to_string());
        }
    }
    values
}

/// 1行から導出される規格（論理モデル）
///
/// 行の純粋な射影で、構築後に変更されることはありません。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standard {
    pub name: String,
    pub categories: Vec<String>,
    pub group: Option<String>,
    pub standard_label: Option<String>,
    pub link: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub media_types: Vec<String>,
    pub summary: Option<String>,
}

impl Standard {
    /// 行から規格を導出する（名前が空の行は`None`）
    pub fn from_row(row: &Row, layout: &ColumnLayout) -> Option<Self> {
        Some(Self {
            name: row.name(layout)?.into_owned(),
            categories: row.multi_values(layout, Field::Categories),
            group: owned(row.group(layout)),
            standard_label: owned(row.standard_label(layout)),
            link: owned(row.link(layout)),
            status: owned(row.status(layout)),
            date: owned(row.date(layout)),
            media_types: row.multi_values(layout, Field::Media),
            summary: owned(row.summary(layout)),
        })
    }

    /// グループ化フィールドに対応する値集合
    pub fn values_for(&self, grouping: GroupingField) -> &[String] {
        match grouping {
            GroupingField::Categories => &self.categories,
            GroupingField::Media => &self.media_types,
        }
    }

    /// データ行（ヘッダー行を除く）から規格の一覧を導出する
    ///
    /// 名前が空の行はスキップされます。入力順は保持されます。
    pub fn collect(rows: &[Row], layout: &ColumnLayout) -> Vec<Standard> {
        data_rows(rows)
            .filter_map(|row| Standard::from_row(row, layout))
            .collect()
    }
}

fn owned(value: Option<Cow<'_, str>>) -> Option<String> {
    value.map(Cow::into_owned)
}

/// ヘッダー行（行0）を除いたデータ行
pub fn data_rows(rows: &[Row]) -> impl Iterator<Item = &Row> {
    rows.iter().skip(1)
}
