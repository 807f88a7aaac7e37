//! SVG Renderer
//!
//! `ChartSpec`をSVG文書に変換します。テキストはすべてXMLエスケープされ、
//! ラベル幅は`unicode-width`による表示幅から概算します。

use std::borrow::Cow;
use std::f64::consts::{PI, TAU};
use std::fs;
use std::path::Path;

use quick_xml::escape::escape;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{render_error, Arc, ChartRenderer, ChartSpec, StyledPoint};
use crate::api::ChartFormat;
use crate::error::StandardsMapError;

/// 半角1文字あたりの幅（フォントサイズ比）
const CHAR_WIDTH_RATIO: f64 = 0.6;

const GROUP_LABEL_PX: f64 = 16.0;
const LEAF_LABEL_PX: f64 = 12.0;
const CENTER_LABEL_PX: f64 = 20.0;
const AXIS_LABEL_PX: f64 = 12.0;

/// SVGレンダラー
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }

    /// チャートをSVG文字列に変換
    pub fn to_svg(&self, chart: &ChartSpec) -> String {
        match chart {
            ChartSpec::Sunburst {
                width,
                height,
                radius,
                center_label,
                arcs,
            } => sunburst_svg(*width, *height, *radius, center_label, arcs),
            ChartSpec::Bubble {
                width,
                height,
                x_labels,
                overflow,
                y_labels,
                points,
                border_color,
            } => bubble_svg(
                *width,
                *height,
                x_labels,
                *overflow,
                y_labels,
                points,
                border_color,
            ),
        }
    }
}

impl ChartRenderer for SvgRenderer {
    fn format(&self) -> ChartFormat {
        ChartFormat::Svg
    }

    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), StandardsMapError> {
        fs::write(path, self.to_svg(chart)).map_err(|e| render_error(path, e))
    }
}

fn svg_open(width: u32, height: u32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = width,
        h = height
    )
}

fn sunburst_svg(width: u32, height: u32, radius: f64, center_label: &str, arcs: &[Arc]) -> String {
    let mut svg = svg_open(width, height);
    svg.push_str(&format!(
        r#"<g transform="translate({:.2},{:.2})">"#,
        f64::from(width) / 2.0,
        f64::from(height) / 2.0
    ));

    // 1. 区画
    for arc in arcs.iter().filter(|a| a.span() > 0.0) {
        svg.push_str(&format!(
            r##"<path d="{}" fill="{}" stroke="#fff"/>"##,
            arc_path(arc),
            escape(&arc.fill)
        ));
    }

    // 2. グループのラベル（太字16px）と葉のラベル（12px）
    for arc in arcs.iter().filter(|a| a.span() > 0.0) {
        if arc.depth == 1 {
            svg.push_str(&radial_label(arc, GROUP_LABEL_PX, true));
        }
    }
    for arc in arcs.iter().filter(|a| a.span() > 0.0) {
        if arc.is_leaf && arc.depth > 1 {
            svg.push_str(&radial_label(arc, LEAF_LABEL_PX, false));
        }
    }

    // 3. 中央のラベル（最内周の帯の内側に収まるよう折り返す）
    let hole = arcs
        .iter()
        .map(|a| a.inner_radius)
        .fold(f64::INFINITY, f64::min);
    let hole = if hole.is_finite() { hole } else { radius / 2.0 };
    let lines = wrap_label(center_label, CENTER_LABEL_PX, hole * 1.8);
    let line_height = CENTER_LABEL_PX * 1.2;
    let first = -(lines.len().saturating_sub(1) as f64) * line_height / 2.0;
    svg.push_str(&format!(
        r#"<text text-anchor="middle" font-size="{}px" font-weight="bold">"#,
        CENTER_LABEL_PX
    ));
    for (i, line) in lines.iter().enumerate() {
        svg.push_str(&format!(
            r#"<tspan x="0" y="{:.2}" dy="0.35em">{}</tspan>"#,
            first + i as f64 * line_height,
            escape(line.as_str())
        ));
    }
    svg.push_str("</text>");

    svg.push_str("</g></svg>");
    svg
}

/// 円環扇形のパスを生成する（内部ヘルパー）
fn arc_path(arc: &Arc) -> String {
    let (ri, ro) = (arc.inner_radius, arc.outer_radius);

    if arc.span() >= TAU - 1e-9 {
        // 完全な円環は半円2つで描く（内周は逆回り）
        let mut d = format!(
            "M0,{:.2}A{ro:.2},{ro:.2},0,1,1,0,{:.2}A{ro:.2},{ro:.2},0,1,1,0,{:.2}Z",
            -ro,
            ro,
            -ro,
            ro = ro
        );
        if ri > 0.0 {
            d.push_str(&format!(
                "M0,{:.2}A{ri:.2},{ri:.2},0,1,0,0,{:.2}A{ri:.2},{ri:.2},0,1,0,0,{:.2}Z",
                -ri,
                ri,
                -ri,
                ri = ri
            ));
        }
        return d;
    }

    let large = if arc.span() > PI { 1 } else { 0 };
    let (x0, y0) = polar(arc.start_angle, ro);
    let (x1, y1) = polar(arc.end_angle, ro);
    let mut d = format!(
        "M{:.2},{:.2}A{:.2},{:.2},0,{},1,{:.2},{:.2}",
        x0, y0, ro, ro, large, x1, y1
    );
    if ri > 0.0 {
        let (x2, y2) = polar(arc.end_angle, ri);
        let (x3, y3) = polar(arc.start_angle, ri);
        d.push_str(&format!(
            "L{:.2},{:.2}A{:.2},{:.2},0,{},0,{:.2},{:.2}Z",
            x2, y2, ri, ri, large, x3, y3
        ));
    } else {
        d.push_str("L0,0Z");
    }
    d
}

/// 12時方向から時計回りの角度を座標に変換
fn polar(angle: f64, r: f64) -> (f64, f64) {
    (r * angle.sin(), -r * angle.cos())
}

/// 区画の中心に半径方向のラベルを置く（内部ヘルパー）
///
/// 左半分のラベルは上下が逆にならないよう180度回転します。
fn radial_label(arc: &Arc, font_px: f64, bold: bool) -> String {
    let angle = arc.mid_angle().to_degrees() - 90.0;
    let flip = if angle > 90.0 { 180 } else { 0 };
    let text = fit_label(&arc.name, font_px, arc.outer_radius - arc.inner_radius - 4.0);
    format!(
        r#"<text class="{}" transform="rotate({:.2}) translate({:.2},0) rotate({})" dy="0.35em" text-anchor="middle" font-size="{}px"{}>{}</text>"#,
        if bold { "category" } else { "standard" },
        angle,
        arc.mid_radius(),
        flip,
        font_px,
        if bold { r#" font-weight="bold""# } else { "" },
        escape(&text)
    )
}

/// 表示幅の概算（px）
fn text_width(text: &str, font_px: f64) -> f64 {
    text.width() as f64 * font_px * CHAR_WIDTH_RATIO
}

/// ラベルを最大幅に収める（超える場合は末尾を「…」に置換）
fn fit_label(text: &str, font_px: f64, max_width: f64) -> Cow<'_, str> {
    if text_width(text, font_px) <= max_width {
        return Cow::Borrowed(text);
    }
    let unit = font_px * CHAR_WIDTH_RATIO;
    let budget = ((max_width / unit).floor() as usize).saturating_sub(1);

    let mut fitted = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        fitted.push(c);
    }
    fitted.push('…');
    Cow::Owned(fitted)
}

/// ラベルを単語単位で折り返す（明示的な改行も尊重）
fn wrap_label(text: &str, font_px: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if !line.is_empty() && text_width(&candidate, font_px) > max_width {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            } else {
                line = candidate;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

fn bubble_svg(
    width: u32,
    height: u32,
    x_labels: &[String],
    overflow: usize,
    y_labels: &[String],
    points: &[StyledPoint],
    border_color: &str,
) -> String {
    let (w, h) = (f64::from(width), f64::from(height));

    // 1. 余白（ラベル幅から決定）
    let widest_y = y_labels
        .iter()
        .map(|l| text_width(l, AXIS_LABEL_PX))
        .fold(0.0, f64::max);
    let left = (widest_y + 16.0).clamp(40.0, w * 0.4);
    let (top, right) = (20.0, 20.0);

    let columns = x_labels.len().max(1);
    let column_width = (w - left - right) / columns as f64;
    let widest_x = x_labels
        .iter()
        .map(|l| text_width(l, AXIS_LABEL_PX))
        .fold(0.0, f64::max);
    let rotate_x = widest_x > column_width - 4.0;
    let bottom = if rotate_x {
        (widest_x * 0.71 + 24.0).clamp(32.0, h * 0.35)
    } else {
        32.0
    };

    let plot_bottom = h - bottom;
    let rows = y_labels.len().max(1);
    let row_height = (plot_bottom - top) / rows as f64;
    let x_at = |i: usize| left + (i as f64 + 0.5) * column_width;
    let y_at = |j: usize| top + (j as f64 + 0.5) * row_height;

    let mut svg = svg_open(width, height);
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);

    // 2. あふれ列の背景
    if overflow > 0 {
        let start = x_labels.len() - overflow;
        svg.push_str(&format!(
            r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="#f9fafb"/>"##,
            left + start as f64 * column_width,
            top,
            overflow as f64 * column_width,
            plot_bottom - top
        ));
    }

    // 3. グリッド線
    for i in 0..x_labels.len() {
        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="#e5e7eb" stroke-width="1"/>"##,
            top,
            plot_bottom,
            x = x_at(i)
        ));
    }
    for j in 0..y_labels.len() {
        svg.push_str(&format!(
            r##"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#e5e7eb" stroke-width="1"/>"##,
            left,
            w - right,
            y = y_at(j)
        ));
    }

    // 4. 軸
    svg.push_str(&format!(
        r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#9ca3af" stroke-width="1"/>"##,
        left,
        plot_bottom,
        w - right,
        plot_bottom
    ));
    svg.push_str(&format!(
        r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#9ca3af" stroke-width="1"/>"##,
        left, top, left, plot_bottom
    ));

    // 5. 軸ラベル
    for (i, label) in x_labels.iter().enumerate() {
        let (x, y) = (x_at(i), plot_bottom + 16.0);
        if rotate_x {
            svg.push_str(&format!(
                r##"<text x="{x:.2}" y="{y:.2}" text-anchor="end" font-size="{}" fill="#374151" transform="rotate(-45 {x:.2} {y:.2})">{}</text>"##,
                AXIS_LABEL_PX,
                escape(label.as_str()),
                x = x,
                y = y
            ));
        } else {
            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="{}" fill="#374151">{}</text>"##,
                x,
                y,
                AXIS_LABEL_PX,
                escape(label.as_str())
            ));
        }
    }
    for (j, label) in y_labels.iter().enumerate() {
        let text = fit_label(label, AXIS_LABEL_PX, left - 12.0);
        svg.push_str(&format!(
            r##"<text x="{:.2}" y="{:.2}" dy="0.35em" text-anchor="end" font-size="{}" fill="#374151">{}</text>"##,
            left - 6.0,
            y_at(j),
            AXIS_LABEL_PX,
            escape(&text)
        ));
    }

    // 6. バブル
    for styled in points {
        let point = &styled.point;
        let (Some(i), Some(j)) = (
            x_labels.iter().position(|l| *l == point.x),
            y_labels.iter().position(|l| *l == point.y),
        ) else {
            continue;
        };
        svg.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="0.8" stroke="{}" stroke-width="1"/>"#,
            x_at(i),
            y_at(j),
            point.r.max(0.0),
            escape(styled.color.as_str()),
            escape(border_color)
        ));
    }

    svg.push_str("</svg>");
    svg
}
