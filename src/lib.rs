//! standards-map - Standards spreadsheet to markdown overviews, presence tables and charts
//!
//! This crate reads a spreadsheet where each row describes one standard and produces
//! a set of sibling artifacts from a single base output path:
//!
//! - a markdown overview document (one section per standard)
//! - presence tables against the fixed category taxonomy and the discovered media taxonomy
//! - bubble charts and sunburst charts of the category and media hierarchies
//! - optionally, the hierarchies themselves as JSON
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use standards_map::GeneratorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = GeneratorBuilder::new().build()?;
//!     let report = generator.run(Path::new("standards.xlsx"), Path::new("out/standards.md"))?;
//!
//!     for artifact in report.failures() {
//!         eprintln!("{} failed: {:?}", artifact.kind, artifact.outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use standards_map::{ChartFormat, DatasetConfig, GeneratorBuilder, RadiusPolicy, TableFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatasetConfig::load("dataset.toml")?;
//!     let generator = GeneratorBuilder::new()
//!         .with_dataset_config(config)
//!         .with_bubble_format(ChartFormat::Svg)
//!         .with_table_format(TableFormat::Html)
//!         .with_radius_policy(RadiusPolicy::Scaled { per_unit: 4.0 })
//!         .with_weight_column(9)
//!         .with_hierarchy_json(true)
//!         .build()?;
//!     # let _ = generator;
//!     Ok(())
//! }
//! ```
//!
//! # Building Blocks
//!
//! Each stage is also usable on its own:
//!
//! ```rust
//! use standards_map::{
//!     build_hierarchy, render_overview, render_presence_table, DatasetConfig, GroupingField, Row,
//! };
//!
//! let config = DatasetConfig::default();
//! let rows = vec![
//!     Row::from_texts(&["Name", "Categories", "Group", "Standard", "Link", "Status", "Date", "Media"]),
//!     Row::from_texts(&["C2PA", "Content Provenance", "", "", "", "", "", "Image"]),
//! ];
//!
//! assert!(render_overview(&rows, &config).starts_with("## C2PA\n"));
//!
//! let table = render_presence_table(&rows, &config, GroupingField::Media).unwrap();
//! assert!(table.starts_with("| Standard | Image | Others |"));
//!
//! let root = build_hierarchy(&rows, &config.layout, GroupingField::Categories, None, "Standards");
//! assert_eq!(root.children[0].name, "Content Provenance");
//! ```

mod api;
mod builder;
mod chart;
mod config;
mod error;
mod export;
mod formatter;
mod grid;
mod hierarchy;
mod logging;
mod output;
mod parser;
mod pipeline;
mod security;
mod taxonomy;
mod types;

// 公開API
pub use api::{ChartFormat, Field, GroupingField, RadiusPolicy, TableFormat};
pub use builder::{Generator, GeneratorBuilder};
pub use chart::{
    bubble_axes, bubble_points, partition, Arc, BubbleAxes, BubblePoint, ChartRenderer, ChartSpec,
    PngRenderer, StyledPoint, SvgRenderer,
};
pub use config::{ChartStyle, ColumnLayout, DatasetConfig, FieldTitles};
pub use error::StandardsMapError;
pub use export::{is_markdown_path, DocumentExporter, MarkdownExporter, PandocExporter};
pub use formatter::FieldFormatter;
pub use grid::{PresenceGrid, PresenceRow};
pub use hierarchy::{build_hierarchy, HierarchyNode};
pub use logging::{init_logging, init_logging_with_writer, LogConfig, LogFormat};
pub use output::{
    build_presence_grid, render_overview, render_presence_table, OutputFormatter, OutputPaths,
};
pub use parser::{CalamineReader, SpreadsheetReader};
pub use pipeline::{ArtifactKind, ArtifactReport, RunReport};
pub use taxonomy::{matches_anything, Taxonomy};
pub use types::{split_multi_value, CellValue, Row, Standard};
