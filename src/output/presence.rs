//! Presence Table Renderer
//!
//! 規格ごとに分類エントリへの該当有無を示す存在表を組み立てます。

use tracing::debug;

use crate::api::GroupingField;
use crate::config::DatasetConfig;
use crate::error::StandardsMapError;
use crate::grid::PresenceGrid;
use crate::taxonomy::{matches_anything, Taxonomy};
use crate::types::{Row, Standard};

/// 存在表のグリッドを構築する
///
/// 分類は行の描画前に確定している必要があります（メディアの場合は発見済み）。
/// 該当判定は、行の分割済み値集合との完全一致です。メディアの場合のみ、
/// 予約接頭辞で始まる値を含む行はすべての列を該当とします。
///
/// # 引数
///
/// * `rows` - ヘッダー行を含む全行
/// * `config` - データセット設定
/// * `grouping` - 判定に使う複数値フィールド
/// * `taxonomy` - 列となる分類
pub fn build_presence_grid(
    rows: &[Row],
    config: &DatasetConfig,
    grouping: GroupingField,
    taxonomy: &Taxonomy,
) -> PresenceGrid {
    let layout = &config.layout;
    let label = match grouping {
        GroupingField::Categories => &config.category_table_label,
        GroupingField::Media => &config.media_table_label,
    };
    let mut grid = PresenceGrid::new(label.as_str(), taxonomy.entries().to_vec(), &config.marker);

    for standard in Standard::collect(rows, layout) {
        let values = standard.values_for(grouping);

        let present = if grouping == GroupingField::Media
            && matches_anything(values, &config.reserved_media_prefix)
        {
            vec![true; taxonomy.len()]
        } else {
            taxonomy
                .entries()
                .iter()
                .map(|entry| values.iter().any(|v| v == entry))
                .collect()
        };
        grid.push_row(standard.name, present);
    }

    debug!(
        rows = grid.rows().len(),
        columns = taxonomy.len(),
        ?grouping,
        "presence grid built"
    );
    grid
}

/// 存在表をMarkdownパイプテーブルとして生成する
///
/// 分類は`grouping`から決まります（カテゴリは固定分類、メディアは全行を1回走査して発見）。
pub fn render_presence_table(
    rows: &[Row],
    config: &DatasetConfig,
    grouping: GroupingField,
) -> Result<String, StandardsMapError> {
    let taxonomy = Taxonomy::for_grouping(grouping, rows, config);
    let grid = build_presence_grid(rows, config, grouping, &taxonomy);
    super::OutputFormatter::Markdown.render_to_string(&grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Row {
        Row::from_texts(&[
            "Name", "Categories", "Group", "Standard", "Link", "Status", "Date", "Media",
        ])
    }

    fn row(name: &str, categories: &str, media: &str) -> Row {
        Row::from_texts(&[name, categories, "", "", "", "", "", media])
    }

    #[test]
    fn test_category_table_marks_exact_members() {
        let config = DatasetConfig::default();
        let rows = vec![
            header(),
            row("STD-1", "Content Provenance\nWatermarking", ""),
        ];
        let table = render_presence_table(&rows, &config, GroupingField::Categories).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines[0],
            "| Specification | Content Provenance | Trust and Authenticity | Asset Identifiers | Rights Declarations | Watermarking | Other |"
        );
        assert_eq!(lines[1], "|:-----:|:-----:|:-----:|:-----:|:-----:|:-----:|:-----:|");
        assert_eq!(lines[2], "| STD-1 | X |  |  |  | X |  |");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_category_membership_is_exact_after_trim() {
        let config = DatasetConfig::default();
        let rows = vec![header(), row("A", "  Other \nWatermark", "")];
        let grid = build_presence_grid(
            &rows,
            &config,
            GroupingField::Categories,
            &Taxonomy::categories(&config),
        );
        // "Watermark" は "Watermarking" と一致しない
        assert_eq!(
            grid.rows()[0].present,
            vec![false, false, false, false, false, true]
        );
    }

    #[test]
    fn test_reserved_prefix_does_not_apply_to_categories() {
        let config = DatasetConfig::default();
        let rows = vec![header(), row("A", "Any", "")];
        let grid = build_presence_grid(
            &rows,
            &config,
            GroupingField::Categories,
            &Taxonomy::categories(&config),
        );
        assert!(grid.rows()[0].present.iter().all(|p| !p));
    }

    #[test]
    fn test_media_table_reserved_prefix_marks_all() {
        let config = DatasetConfig::default();
        let rows = vec![
            header(),
            row("A", "", "Image\nVideo"),
            row("B", "", "Anything goes"),
            row("C", "", ""),
        ];
        let table = render_presence_table(&rows, &config, GroupingField::Media).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "| Standard | Image | Video | Others |");
        assert_eq!(lines[2], "| A | X | X |  |");
        assert_eq!(lines[3], "| B | X | X | X |");
        assert_eq!(lines[4], "| C |  |  |  |");
    }

    #[test]
    fn test_presence_skips_unnamed_rows() {
        let config = DatasetConfig::default();
        let rows = vec![header(), row("", "Other", "Image"), row("B", "Other", "")];
        let table = render_presence_table(&rows, &config, GroupingField::Categories).unwrap();
        assert_eq!(table.lines().count(), 3);
        assert!(table.ends_with("| B |  |  |  |  |  | X |\n"));
    }

    #[test]
    fn test_presence_header_only() {
        let config = DatasetConfig::default();
        let table = render_presence_table(&[header()], &config, GroupingField::Media).unwrap();
        assert_eq!(table, "| Standard | Others |\n|:-----:|:-----:|\n");
    }

    #[test]
    fn test_presence_name_is_escaped() {
        let config = DatasetConfig::default();
        let rows = vec![header(), row("A|B\nC", "Other", "")];
        let table = render_presence_table(&rows, &config, GroupingField::Categories).unwrap();
        assert!(table.contains("| A\\|B C |"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_presence_table_is_idempotent(
                entries in proptest::collection::vec(
                    ("[A-Z][a-z]{0,6}", "(Image|Video|Audio|Any|Text)(\n(Image|Video|Text))?"),
                    0..10
                )
            ) {
                let config = DatasetConfig::default();
                let mut rows = vec![header()];
                rows.extend(entries.iter().map(|(name, media)| row(name, "Other", media)));

                for grouping in [GroupingField::Categories, GroupingField::Media] {
                    let first = render_presence_table(&rows, &config, grouping).unwrap();
                    let second = render_presence_table(&rows, &config, grouping).unwrap();
                    prop_assert_eq!(first, second);
                }
            }
        }
    }
}
