//! hostreport CLI - Batch report generation from Ganglia RRD files
//!
//! This binary renders CPU, memory, disk and network reports for each host
//! directory given on the command line.

use anyhow::{anyhow, Result};
use clap::Parser;
use hostreport_backend_rrdtool::{Rrdtool, RrdtoolConfig};
use hostreport_cli::commands::plot::{self, PlotOptions};
use hostreport_spec::{DiskPatterns, ImageFormat, TimeOptions};
use std::process::ExitCode;

mod cli_args;

use cli_args::Cli;

fn time_options(cli: &Cli) -> TimeOptions {
    TimeOptions {
        explicit: cli.start_time.zip(cli.end_time),
        last_day: cli.last_day,
        last_hour: cli.last_hour,
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let patterns = DiskPatterns::new(
        &cli.disk_util_pattern,
        &cli.disk_read_rate_pattern,
        &cli.disk_write_rate_pattern,
    )
    .map_err(|e| anyhow!(e))?;
    let format: ImageFormat = cli.format.parse().map_err(|e: String| anyhow!(e))?;

    let mut config = RrdtoolConfig::default().timeout_secs(cli.timeout_secs);
    if let Some(path) = &cli.rrdtool {
        config = config.rrdtool_path(path);
    }
    let rrdtool = Rrdtool::with_config(config);

    let options = PlotOptions {
        result_dir: cli.result_dir.clone(),
        time: time_options(&cli),
        patterns,
        format,
        verbose: cli.verbose,
        progress: true,
    };

    plot::run(&cli.host_dirs, &options, &rrdtool, cli.dry_run)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
