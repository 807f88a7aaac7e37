//! PNG Renderer
//!
//! SVGレンダラーの出力をresvgでラスタライズし、白背景のPNGとして書き出します。

use std::fs;
use std::path::Path;

use resvg::tiny_skia::{self, Pixmap};
use resvg::usvg::{Options, Tree};
use tracing::debug;

use super::{render_error, ChartRenderer, ChartSpec, SvgRenderer};
use crate::api::ChartFormat;
use crate::error::StandardsMapError;

/// PNGレンダラー
///
/// テキストの描画にはシステムフォントを使用します。フォントが見つからない環境では
/// テキストのない画像になります。
#[derive(Debug, Clone, Copy, Default)]
pub struct PngRenderer {
    svg: SvgRenderer,
}

impl PngRenderer {
    pub fn new() -> Self {
        Self {
            svg: SvgRenderer::new(),
        }
    }

    /// チャートをPNGのバイト列に変換
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<u8>)` - PNGエンコード済みのバイト列
    /// * `Err(StandardsMapError::Render)` - SVGの解析・ピクスマップの確保・エンコードに失敗した場合
    pub fn to_png(&self, chart: &ChartSpec, path: &Path) -> Result<Vec<u8>, StandardsMapError> {
        let svg = self.svg.to_svg(chart);

        let mut options = Options::default();
        options.fontdb_mut().load_system_fonts();
        debug!(faces = options.fontdb.len(), "font database loaded");

        let tree = Tree::from_str(&svg, &options).map_err(|e| render_error(path, e))?;

        let (width, height) = chart.size();
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| render_error(path, format!("invalid pixmap size {}x{}", width, height)))?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap.encode_png().map_err(|e| render_error(path, e))
    }
}

impl ChartRenderer for PngRenderer {
    fn format(&self) -> ChartFormat {
        ChartFormat::Png
    }

    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), StandardsMapError> {
        let png = self.to_png(chart, path)?;
        fs::write(path, png).map_err(|e| render_error(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RadiusPolicy;
    use crate::config::ChartStyle;
    use crate::hierarchy::HierarchyNode;
    use crate::taxonomy::Taxonomy;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn sample() -> HierarchyNode {
        HierarchyNode::branch(
            "Standards",
            vec![HierarchyNode::branch(
                "Watermarking",
                vec![HierarchyNode::leaf("A", 1.0), HierarchyNode::leaf("B", 1.0)],
            )],
        )
    }

    #[test]
    fn test_render_bubble_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bubble.png");
        let mut style = ChartStyle::default();
        style.width = 200;
        style.height = 120;
        let spec = ChartSpec::bubble(
            &sample(),
            &Taxonomy::fixed(["Watermarking"]),
            RadiusPolicy::default(),
            &style,
        );

        let renderer = PngRenderer::new();
        assert_eq!(renderer.format(), ChartFormat::Png);
        renderer.render(&spec, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_render_sunburst_png() {
        let spec = ChartSpec::sunburst(&sample(), &ChartStyle::default());
        let bytes = PngRenderer::new()
            .to_png(&spec, Path::new("sunburst.png"))
            .unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }
}
