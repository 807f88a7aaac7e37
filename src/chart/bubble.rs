//! Bubble Projection
//!
//! 階層を「グループ × 規格」のカテゴリ軸上の点の並びに平坦化します。

use serde::Serialize;

use crate::api::RadiusPolicy;
use crate::hierarchy::HierarchyNode;
use crate::taxonomy::Taxonomy;

/// バブルチャートの1点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    /// 親グループ名（x軸カテゴリ）
    pub x: String,
    /// 規格名（y軸カテゴリ）
    pub y: String,
    /// 半径（px）
    pub r: f64,
}

/// 葉ごとに1点を生成する
///
/// 点の順序は葉の深さ優先順（グループの発見順、グループ内は追加順）です。
pub fn bubble_points(root: &HierarchyNode, policy: RadiusPolicy) -> Vec<BubblePoint> {
    if root.is_leaf() {
        return Vec::new();
    }
    root.leaves_with_parent()
        .into_iter()
        .map(|(parent, leaf)| BubblePoint {
            x: parent.to_string(),
            y: leaf.name.clone(),
            r: policy.radius(leaf.value),
        })
        .collect()
}

/// バブルチャートの軸
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BubbleAxes {
    /// x軸ラベル（分類エントリ、その後に分類外のラベル）
    pub x_labels: Vec<String>,
    /// 分類外のx軸ラベルの数（末尾の列）
    pub overflow: usize,
    /// y軸ラベル（規格名、最初に現れた順）
    pub y_labels: Vec<String>,
}

/// 点の並びと固定分類から軸を決定する
///
/// データに現れない分類エントリは空の列になります。分類にないx値を持つ点は
/// 捨てずに、分類の後ろに追加するあふれ列に描画します。
pub fn bubble_axes(points: &[BubblePoint], taxonomy: &Taxonomy) -> BubbleAxes {
    let mut x_labels: Vec<String> = taxonomy.entries().to_vec();
    let mut overflow = 0;
    let mut y_labels: Vec<String> = Vec::new();

    for point in points {
        if !x_labels.contains(&point.x) {
            x_labels.push(point.x.clone());
            overflow += 1;
        }
        if !y_labels.contains(&point.y) {
            y_labels.push(point.y.clone());
        }
    }

    BubbleAxes {
        x_labels,
        overflow,
        y_labels,
    }
}
