//! Partition Layout
//!
//! 階層を同心円状の区画（サンバーストの弧）に展開するレイアウト。
//! 角度は12時方向を0として時計回りのラジアンです。

use std::collections::VecDeque;
use std::f64::consts::TAU;

use serde::Serialize;

use crate::config::ChartStyle;
use crate::hierarchy::HierarchyNode;

/// サンバーストの1区画
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arc {
    pub name: String,
    /// 親ノードの名前（深さ1の場合はルート名）
    pub parent: String,
    pub depth: usize,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub fill: String,
    pub is_leaf: bool,
}

impl Arc {
    /// 中心角（ラベル配置用）
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// 中心半径（ラベル配置用）
    pub fn mid_radius(&self) -> f64 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    /// 角度幅
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// 階層を`[0, 2π] × [0, radius]`に分割する
///
/// 各ノードの値は配下の葉の値の合計として計算し直し、兄弟は値の降順に並べます
/// （同値の場合は挿入順を保持）。各深さの帯の幅は`radius / (height + 1)`です。
/// 出力は深さ1以上のノードを幅優先順に並べたものです。
///
/// 塗り色は、深さ1ではノード自身の名前、深さ2では親の名前で配色表を引きます。
/// 深さ3以上は白です。
pub fn partition(root: &HierarchyNode, radius: f64, style: &ChartStyle) -> Vec<Arc> {
    let band = radius / (root.height() + 1) as f64;
    let mut arcs = Vec::new();

    // (ノード, 親の名前, 深さ, 開始角, 終了角)
    let mut queue: VecDeque<(&HierarchyNode, &str, usize, f64, f64)> = VecDeque::new();
    queue.push_back((root, "", 0, 0.0, TAU));

    while let Some((node, parent, depth, start, end)) = queue.pop_front() {
        if depth > 0 {
            let fill = match depth {
                1 => style.fill_for(&node.name),
                2 => style.fill_for(parent),
                _ => "#ffffff",
            };
            arcs.push(Arc {
                name: node.name.clone(),
                parent: parent.to_string(),
                depth,
                value: subtree_value(node),
                start_angle: start,
                end_angle: end,
                inner_radius: band * depth as f64,
                outer_radius: band * (depth + 1) as f64,
                fill: fill.to_string(),
                is_leaf: node.is_leaf(),
            });
        }

        let total = subtree_value(node);
        let scale = if total > 0.0 { (end - start) / total } else { 0.0 };

        let mut x = start;
        for child in sorted_children(node) {
            let child_start = x;
            x += subtree_value(child) * scale;
            queue.push_back((child, node.name.as_str(), depth + 1, child_start, x));
        }
    }

    arcs
}

/// 配下の葉の値の合計
fn subtree_value(node: &HierarchyNode) -> f64 {
    if node.is_leaf() {
        node.value.max(0.0)
    } else {
        node.children.iter().map(subtree_value).sum()
    }
}

/// 値の降順に並べた子（安定ソート）
fn sorted_children(node: &HierarchyNode) -> Vec<&HierarchyNode> {
    let mut children: Vec<(&HierarchyNode, f64)> = node
        .children
        .iter()
        .map(|c| (c, subtree_value(c)))
        .collect();
    children.sort_by(|a, b| b.1.total_cmp(&a.1));
    children.into_iter().map(|(c, _)| c).collect()
}
