//! Command Line Entry Point
//!
//! `standards-map`バイナリのエントリーポイント。
//! 引数を解釈してログを初期化し、生成を実行して終了コードを返します。

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use standards_map::{init_logging, GeneratorBuilder, LogConfig, StandardsMapError};
use tracing::error;

mod cli;

use crate::cli::{Cli, Command, RunArgs};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --versionは成功として終了する
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format.into())
        .with_ansi(io::stderr().is_terminal());
    if let Err(e) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match cli.command {
        Command::Run(args) => match run(&args) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                error!(error = %e, "generation aborted");
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// すべての成果物を生成し、すべて成功したかを返す
fn run(args: &RunArgs) -> Result<bool, StandardsMapError> {
    let mut builder = GeneratorBuilder::new()
        .with_bubble_format(args.bubble_format.into())
        .with_sunburst_format(args.sunburst_format.into())
        .with_table_format(args.table_format.into())
        .with_charts(!args.no_charts)
        .with_hierarchy_json(args.emit_hierarchy_json);
    if let Some(path) = &args.config {
        builder = builder.with_config_file(path);
    }
    if let Some(column) = args.weight_column {
        builder = builder.with_weight_column(column);
    }

    let generator = builder.build()?;
    let report = generator.run(&args.input, &args.output)?;

    for artifact in report.failures() {
        if let Err(e) = &artifact.outcome {
            eprintln!("error: {} ({}): {}", artifact.kind, artifact.path.display(), e);
        }
    }
    Ok(!report.has_errors())
}
