/*!
  Binary for the CLI of luadump
*/

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

pub mod cli;
pub mod error;

use std::{path::Path, time::Instant};

use clap::Parser;
use cli::CliApp;
use colored::Colorize;
use error::CliError;
use luadump::{io::source::MySqlSource, ExportPlan, ExportSummary, Exporter};

fn print_finished_message(summary: &ExportSummary, path: &Path, elapsed_ms: u128) {
    println!(
        "Export completed in {}{}. Wrote {} rows to {}.",
        elapsed_ms.to_string().green().bold(),
        "ms".green().bold(),
        summary.total_rows().to_string().green().bold(),
        path.display(),
    );

    let name_len = summary
        .tables()
        .iter()
        .map(|(table, _)| table.len())
        .max()
        .unwrap_or_default()
        + 1; // for the colon

    for (table, rows) in summary.tables() {
        println!("   {0: <name_len$} {rows:>8}", format!("{table}:"));
    }
}

fn run(cli: CliApp) -> Result<(), CliError> {
    let start = Instant::now();

    let output_manager = cli.output.output_manager();
    output_manager.prevent_accidental_overwrite()?;

    let settings = cli.connection.connection_settings();
    log::debug!("Connection settings: {settings:?}");

    let mut source = MySqlSource::connect(&settings).map_err(|source| CliError::Connection {
        host: settings.host.clone(),
        port: settings.port,
        source,
    })?;

    let plan = ExportPlan::fishing();
    log::info!("Exporting tables {:?}", plan.tables());

    let exporter = Exporter::prepare(&mut source, plan)?;
    let summary = output_manager.write_with(|writer| exporter.write_to(writer))?;

    if let Err(err) = source.close() {
        log::warn!("Closing the database connection failed: {err}");
    }

    print_finished_message(&summary, output_manager.path(), start.elapsed().as_millis());

    Ok(())
}

fn main() {
    let cli = CliApp::parse();

    cli.logging.initialize_logging();
    log::info!("Version: {}", clap::crate_version!());
    log::debug!("Output: {:?}", cli.output);

    run(cli).unwrap_or_else(|err| {
        log::error!("{} {err}", "error:".red().bold());
        std::process::exit(1)
    })
}
