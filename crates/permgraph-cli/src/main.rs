//! permgraph CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use permgraph_cli::{Args, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(args:?, log_level:?; "Parsed arguments");

    match permgraph_cli::run(&args) {
        Ok(summary) => info!(
            input = args.input,
            nodes = summary.nodes,
            ranks = summary.ranks,
            crossings = summary.crossings,
            back_edges = summary.back_edges;
            "Graph laid out"
        ),
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();
            let reportables = to_reportables(&err);

            for reportable in &reportables {
                let mut writer = String::new();
                reporter
                    .render_report(&mut writer, reportable)
                    .expect("Writing to String buffer is infallible");

                error!("{writer}");
            }

            error!(input = args.input, problems = reportables.len(); "No layout written");
            process::exit(1);
        }
    }
}
