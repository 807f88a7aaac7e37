//! Chart Module
//!
//! 階層からチャートの宣言的な設定（`ChartSpec`）を作り、SVG / PNGとして書き出すモジュール。

mod bubble;
mod partition;
mod raster;
mod svg;

use std::path::Path;

use serde::Serialize;

use crate::api::{ChartFormat, RadiusPolicy};
use crate::config::ChartStyle;
use crate::error::StandardsMapError;
use crate::hierarchy::HierarchyNode;
use crate::taxonomy::Taxonomy;

pub use bubble::{bubble_axes, bubble_points, BubbleAxes, BubblePoint};
pub use partition::{partition, Arc};
pub use raster::PngRenderer;
pub use svg::SvgRenderer;

/// 色付きのバブル
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledPoint {
    #[serde(flatten)]
    pub point: BubblePoint,
    /// x軸ラベルから引いた塗り色
    pub color: String,
}

/// チャートの宣言的な設定
///
/// レンダラーに依存しない中間表現で、JSONとしてシリアライズできます。
/// 寸法はピクセル単位です。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartSpec {
    Sunburst {
        width: u32,
        height: u32,
        radius: f64,
        center_label: String,
        arcs: Vec<Arc>,
    },
    Bubble {
        width: u32,
        height: u32,
        x_labels: Vec<String>,
        /// `x_labels`末尾のあふれ列の数
        overflow: usize,
        y_labels: Vec<String>,
        points: Vec<StyledPoint>,
        border_color: String,
    },
}

impl ChartSpec {
    /// 階層からサンバーストの設定を生成
    ///
    /// 半径は幅と高さの小さい方の半分です。
    pub fn sunburst(root: &HierarchyNode, style: &ChartStyle) -> Self {
        let radius = f64::from(style.width.min(style.height)) / 2.0;
        ChartSpec::Sunburst {
            width: style.width,
            height: style.height,
            radius,
            center_label: style.center_label.clone(),
            arcs: partition(root, radius, style),
        }
    }

    /// 階層からバブルチャートの設定を生成
    ///
    /// # 引数
    ///
    /// * `root` - 階層のルート
    /// * `taxonomy` - x軸の固定ラベル
    /// * `policy` - 点の半径ポリシー
    /// * `style` - 寸法と配色
    pub fn bubble(
        root: &HierarchyNode,
        taxonomy: &Taxonomy,
        policy: RadiusPolicy,
        style: &ChartStyle,
    ) -> Self {
        let points = bubble_points(root, policy);
        let axes = bubble_axes(&points, taxonomy);
        let points = points
            .into_iter()
            .map(|point| {
                let color = style.point_color_for(&point.x).to_string();
                StyledPoint { point, color }
            })
            .collect();

        ChartSpec::Bubble {
            width: style.width,
            height: style.height,
            x_labels: axes.x_labels,
            overflow: axes.overflow,
            y_labels: axes.y_labels,
            points,
            border_color: style.default_point_color.clone(),
        }
    }

    /// 寸法（幅, 高さ）
    pub fn size(&self) -> (u32, u32) {
        match self {
            ChartSpec::Sunburst { width, height, .. } | ChartSpec::Bubble { width, height, .. } => {
                (*width, *height)
            }
        }
    }
}

/// チャートレンダラーのインターフェース
///
/// `ChartSpec`を受け取り、指定されたパスに画像ファイルを書き出します。
pub trait ChartRenderer: Send + Sync {
    /// このレンダラーが書き出す形式
    fn format(&self) -> ChartFormat;

    /// チャートを書き出す
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 書き出しに成功した場合
    /// * `Err(StandardsMapError::Render)` - 描画または書き込みに失敗した場合
    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), StandardsMapError>;
}

/// 描画エラーを生成する（内部ヘルパー）
pub(crate) fn render_error(path: &Path, message: impl ToString) -> StandardsMapError {
    StandardsMapError::Render {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
