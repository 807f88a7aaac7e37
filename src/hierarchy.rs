//! Hierarchy Module
//!
//! データ行を「ルート → グループ → 規格（葉）」の2階層の木に集約するモジュール。
//! サンバースト・バブルチャートの入力になります。

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::api::GroupingField;
use crate::config::ColumnLayout;
use crate::types::{data_rows, Row};

/// 階層のノード
///
/// 葉の値は1（重み列を指定した場合はその数値）、内部ノードの値は配下の葉の値の合計です。
/// JSONでは`{name, value, children}`の形にシリアライズされます（葉は`children`を省略）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// 葉ノードを生成
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            children: Vec::new(),
        }
    }

    /// 子ノードを持つノードを生成（値は子の合計）
    pub fn branch(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        let value = children.iter().map(|c| c.value).sum();
        Self {
            name: name.into(),
            value,
            children,
        }
    }

    /// 葉かどうか
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// 木の高さ（葉のみの場合は0）
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// 葉の数
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(HierarchyNode::leaf_count).sum()
        }
    }

    /// 葉とその親の名前の組を深さ優先順で列挙する
    pub fn leaves_with_parent(&self) -> Vec<(&str, &HierarchyNode)> {
        let mut leaves = Vec::new();
        collect_leaves(self, &self.name, &mut leaves);
        leaves
    }
}

fn collect_leaves<'a>(
    node: &'a HierarchyNode,
    parent: &'a str,
    out: &mut Vec<(&'a str, &'a HierarchyNode)>,
) {
    if node.is_leaf() {
        out.push((parent, node));
    } else {
        for child in &node.children {
            collect_leaves(child, &node.name, out);
        }
    }
}

/// 行から階層を構築する
///
/// グループ化フィールドの値ごとに子ノードを1つ（最初に現れた順）作り、
/// その下に（行, 値）の所属ごとに葉を1つ追加します。複数のグループに属する規格は
/// グループ数と同じ数の葉になります。名前のない行、グループ化セルが空の行は無視されます。
///
/// # 引数
///
/// * `rows` - ヘッダー行を含む全行
/// * `layout` - 列レイアウト
/// * `grouping` - グループ化に使う複数値フィールド
/// * `weight_column` - 葉の値を読む列（`None`の場合はすべて1）
/// * `root_label` - ルートノードの名前
///
/// # 戻り値
///
/// ルートノード（データ行がない場合は子を持たないルート）
pub fn build_hierarchy(
    rows: &[Row],
    layout: &ColumnLayout,
    grouping: GroupingField,
    weight_column: Option<usize>,
    root_label: &str,
) -> HierarchyNode {
    let mut groups: Vec<(String, Vec<HierarchyNode>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row_index, row) in data_rows(rows).enumerate() {
        let Some(name) = row.name(layout) else {
            continue;
        };
        let values = row.multi_values(layout, grouping.field());
        if values.is_empty() {
            debug!(row = row_index + 1, ?grouping, "row without grouping value skipped");
            continue;
        }
        let weight = leaf_weight(row, weight_column, row_index + 1);

        for value in values {
            let slot = *index.entry(value.clone()).or_insert_with(|| {
                groups.push((value.clone(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(HierarchyNode::leaf(name.to_string(), weight));
        }
    }

    let children: Vec<HierarchyNode> = groups
        .into_iter()
        .map(|(name, leaves)| HierarchyNode::branch(name, leaves))
        .collect();
    debug!(
        groups = children.len(),
        leaves = children.iter().map(HierarchyNode::leaf_count).sum::<usize>(),
        ?grouping,
        "hierarchy built"
    );
    HierarchyNode::branch(root_label, children)
}

/// 葉の重みを読み取る（内部ヘルパー）
///
/// 重み列が未指定・空・数値でない・負の場合は1とします。
fn leaf_weight(row: &Row, weight_column: Option<usize>, row_number: usize) -> f64 {
    let Some(column) = weight_column else {
        return 1.0;
    };
    match row.cell(column).and_then(|cell| cell.as_number()) {
        Some(weight) if weight >= 0.0 => weight,
        _ => {
            debug!(row = row_number, column, "weight missing or invalid, using 1");
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn header() -> Row {
        Row::from_texts(&[
            "Name", "Categories", "Group", "Standard", "Link", "Status", "Date", "Media",
        ])
    }

    fn row(name: &str, categories: &str, media: &str) -> Row {
        Row::from_texts(&[name, categories, "", "", "", "", "", media])
    }

    #[test]
    fn test_build_hierarchy_multi_membership() {
        let rows = vec![header(), row("STD-1", "Content Provenance\nWatermarking", "")];
        let root = build_hierarchy(
            &rows,
            &ColumnLayout::default(),
            GroupingField::Categories,
            None,
            "Standards",
        );

        assert_eq!(root.name, "Standards");
        assert_eq!(root.value, 2.0);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].name, "Content Provenance");
        assert_eq!(root.children[1].name, "Watermarking");
        for group in &root.children {
            assert_eq!(group.children, vec![HierarchyNode::leaf("STD-1", 1.0)]);
            assert_eq!(group.value, 1.0);
        }
    }

    #[test]
    fn test_build_hierarchy_first_discovery_order() {
        let rows = vec![
            header(),
            row("A", "", "Video\nImage"),
            row("B", "", "Audio\nVideo"),
            row("C", "", ""),
            row("", "", "Text"),
        ];
        let root = build_hierarchy(
            &rows,
            &ColumnLayout::default(),
            GroupingField::Media,
            None,
            "Media",
        );

        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Video", "Image", "Audio"]);
        let video: Vec<&str> = root.children[0]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(video, vec!["A", "B"]);
        assert_eq!(root.leaf_count(), 4);
        assert_eq!(root.height(), 2);
    }

    #[test]
    fn test_build_hierarchy_empty_input() {
        let root = build_hierarchy(
            &[header()],
            &ColumnLayout::default(),
            GroupingField::Categories,
            None,
            "Standards",
        );
        assert!(root.children.is_empty());
        assert_eq!(root.value, 0.0);
        assert_eq!(root.height(), 0);
    }

    #[test]
    fn test_build_hierarchy_weight_column() {
        let mut weighted = row("A", "Other", "");
        weighted.pad_to(10);
        let mut cells: Vec<CellValue> = (0..weighted.len())
            .map(|i| weighted.cell(i).cloned().unwrap_or(CellValue::Empty))
            .collect();
        cells[9] = CellValue::Number(3.0);
        let weighted = Row::new(cells);

        let mut invalid = row("B", "Other", "");
        invalid.pad_to(10);

        let rows = vec![header(), weighted, invalid];
        let root = build_hierarchy(
            &rows,
            &ColumnLayout::default(),
            GroupingField::Categories,
            Some(9),
            "Standards",
        );
        let leaves: Vec<f64> = root.children[0].children.iter().map(|c| c.value).collect();
        assert_eq!(leaves, vec![3.0, 1.0]);
        assert_eq!(root.value, 4.0);
    }

    #[test]
    fn test_leaves_with_parent() {
        let rows = vec![header(), row("A", "X\nY", ""), row("B", "Y", "")];
        let root = build_hierarchy(
            &rows,
            &ColumnLayout::default(),
            GroupingField::Categories,
            None,
            "Standards",
        );
        let pairs: Vec<(&str, &str)> = root
            .leaves_with_parent()
            .into_iter()
            .map(|(parent, leaf)| (parent, leaf.name.as_str()))
            .collect();
        assert_eq!(pairs, vec![("X", "A"), ("Y", "A"), ("Y", "B")]);
    }

    #[test]
    fn test_hierarchy_json_shape() {
        let root = HierarchyNode::branch(
            "Standards",
            vec![HierarchyNode::branch(
                "Other",
                vec![HierarchyNode::leaf("A", 1.0)],
            )],
        );
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Standards",
                "value": 1.0,
                "children": [
                    {"name": "Other", "value": 1.0, "children": [{"name": "A", "value": 1.0}]}
                ]
            })
        );
    }

    mod property_tests {
        use super::*;
        use crate::types::split_multi_value;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_leaf_count_equals_memberships(
                entries in proptest::collection::vec(
                    ("[A-Z]{1,4}", proptest::collection::vec("[a-c ]{0,3}", 0..4)),
                    0..12
                )
            ) {
                let mut rows = vec![header()];
                let mut expected = 0;
                for (name, values) in &entries {
                    let raw = values.join("\n");
                    expected += split_multi_value(&raw).len();
                    rows.push(row(name, &raw, ""));
                }

                let root = build_hierarchy(
                    &rows,
                    &ColumnLayout::default(),
                    GroupingField::Categories,
                    None,
                    "Standards",
                );
                let leaves = if root.children.is_empty() { 0 } else { root.leaf_count() };
                prop_assert_eq!(leaves, expected);
                prop_assert_eq!(root.value, expected as f64);
            }
        }
    }
}
