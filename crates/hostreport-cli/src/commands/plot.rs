//! Plot command implementation
//!
//! Builds and renders every report for each host directory. A failed report
//! does not stop the batch; a host whose time window cannot be resolved
//! skips its remaining reports.

use anyhow::{Context, Result};
use colored::Colorize;
use hostreport_backend_rrdtool::Rrdtool;
use hostreport_spec::{
    host_name, DiskPatterns, GraphSpec, ImageFormat, ReportError, ReportFailure,
    ReportKind, ReportSpecBuilder, Renderer, SeriesStore, TimeOptions,
};
use std::cell::RefCell;
use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

/// Options shared by every host in a batch.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub result_dir: PathBuf,
    pub time: TimeOptions,
    pub patterns: DiskPatterns,
    pub format: ImageFormat,
    /// Print each output path.
    pub verbose: bool,
    /// Print progress lines while plotting.
    pub progress: bool,
}

/// What happened to one report.
#[derive(Debug)]
pub enum ReportStatus {
    Rendered,
    Failed(ReportFailure),
    /// Not attempted because an earlier failure aborted the host.
    Skipped,
}

/// Outcome of one report of one host.
#[derive(Debug)]
pub struct ReportOutcome {
    pub host: String,
    /// `None` when the host itself could not be set up.
    pub kind: Option<ReportKind>,
    pub output: Option<PathBuf>,
    pub status: ReportStatus,
}

impl ReportOutcome {
    pub fn failure(&self) -> Option<&ReportFailure> {
        match &self.status {
            ReportStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Outcomes of a whole batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<ReportOutcome>,
}

impl BatchSummary {
    pub fn rendered(&self) -> usize {
        self.count(|s| matches!(s, ReportStatus::Rendered))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ReportStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ReportStatus::Skipped))
    }

    /// True if no report failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Outcomes for one host.
    pub fn host<'a>(&'a self, host: &'a str) -> impl Iterator<Item = &'a ReportOutcome> + 'a {
        self.outcomes.iter().filter(move |o| o.host == host)
    }

    /// Outcome of one report of one host.
    pub fn report(&self, host: &str, kind: ReportKind) -> Option<&ReportOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.host == host && o.kind == Some(kind))
    }

    fn count(&self, pred: impl Fn(&ReportStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Renderer that keeps specs instead of drawing them.
#[derive(Debug, Default)]
pub struct SpecCollector {
    specs: RefCell<Vec<GraphSpec>>,
}

impl SpecCollector {
    pub fn into_specs(self) -> Vec<GraphSpec> {
        self.specs.into_inner()
    }
}

impl Renderer for SpecCollector {
    type Error = Infallible;

    fn render(&self, spec: GraphSpec) -> Result<(), Self::Error> {
        self.specs.borrow_mut().push(spec);
        Ok(())
    }
}

/// Run the plot command
///
/// # Arguments
/// * `host_dirs` - Host data directories, processed in order
/// * `options` - Batch options
/// * `rrdtool` - The rrdtool orchestrator, used as store and renderer
/// * `dry_run` - Print the specs as JSON instead of rendering
///
/// # Returns
/// Exit code: 0 if every report rendered, 1 otherwise
pub fn run(
    host_dirs: &[PathBuf],
    options: &PlotOptions,
    rrdtool: &Rrdtool,
    dry_run: bool,
) -> Result<ExitCode> {
    if dry_run {
        return run_dry(host_dirs, options, rrdtool);
    }

    let start = Instant::now();
    fs::create_dir_all(&options.result_dir).with_context(|| {
        format!(
            "Failed to create result directory: {}",
            options.result_dir.display()
        )
    })?;

    let summary = plot_hosts(host_dirs, options, rrdtool, rrdtool);
    print_summary(&summary, start.elapsed().as_secs_f64());

    Ok(exit_code(&summary))
}

/// Builds every spec without rendering and prints them as one JSON array.
fn run_dry(host_dirs: &[PathBuf], options: &PlotOptions, store: &Rrdtool) -> Result<ExitCode> {
    let quiet = PlotOptions {
        progress: false,
        ..options.clone()
    };
    let collector = SpecCollector::default();
    let summary = plot_hosts(host_dirs, &quiet, store, &collector);

    let json = serde_json::to_string_pretty(&collector.into_specs())
        .context("Failed to serialize graph specs")?;
    println!("{}", json);

    for outcome in &summary.outcomes {
        if let Some(failure) = outcome.failure() {
            eprintln!("{} {}: {}", "FAILED".red(), describe(outcome), failure);
        }
    }

    Ok(exit_code(&summary))
}

/// Plots every report for every host.
///
/// Specs are built with `store` and handed to `renderer`. Progress is printed
/// to stdout when `options.progress` is set.
pub fn plot_hosts<S, R>(
    host_dirs: &[PathBuf],
    options: &PlotOptions,
    store: &S,
    renderer: &R,
) -> BatchSummary
where
    S: SeriesStore,
    R: Renderer,
{
    let mut summary = BatchSummary::default();
    for host_dir in host_dirs {
        plot_host(host_dir, options, store, renderer, &mut summary);
    }
    summary
}

fn plot_host<S, R>(
    host_dir: &Path,
    options: &PlotOptions,
    store: &S,
    renderer: &R,
    summary: &mut BatchSummary,
) where
    S: SeriesStore,
    R: Renderer,
{
    let label = host_name(host_dir).unwrap_or_else(|_| host_dir.display().to_string());
    if options.progress {
        println!("{} {}", "Plotting".cyan().bold(), label);
    }

    let mut reports = match ReportSpecBuilder::new(
        host_dir,
        &options.result_dir,
        &options.time,
        &options.patterns,
        store,
    ) {
        Ok(reports) => reports.format(options.format),
        Err(e) => {
            let outcome = ReportOutcome {
                host: label,
                kind: None,
                output: None,
                status: ReportStatus::Failed(ReportFailure::from_backend(e)),
            };
            report_progress(&outcome, options);
            summary.outcomes.push(outcome);
            return;
        }
    };

    let mut aborted = false;
    for &kind in ReportKind::all() {
        let output = reports.output_path(kind);
        let status = if aborted {
            ReportStatus::Skipped
        } else {
            match reports.build(kind) {
                Ok(spec) => match renderer.render(spec) {
                    Ok(()) => ReportStatus::Rendered,
                    Err(e) => ReportStatus::Failed(ReportFailure::from_backend(e)),
                },
                Err(e) => {
                    aborted = e.aborts_host();
                    ReportStatus::Failed(ReportFailure::from_backend(e))
                }
            }
        };

        let outcome = ReportOutcome {
            host: label.clone(),
            kind: Some(kind),
            output: Some(output),
            status,
        };
        report_progress(&outcome, options);
        summary.outcomes.push(outcome);
    }
}

fn report_progress(outcome: &ReportOutcome, options: &PlotOptions) {
    if !options.progress {
        return;
    }
    let what = outcome.kind.map(|k| k.as_str()).unwrap_or("host");
    match &outcome.status {
        ReportStatus::Rendered => {
            println!("  {} {}", "SUCCESS".green(), what);
            if options.verbose {
                if let Some(output) = &outcome.output {
                    println!("    {} {}", "->".dimmed(), output.display());
                }
            }
        }
        ReportStatus::Failed(failure) => {
            println!("  {} {} {}", "FAILED".red(), what, failure);
            if failure.downcast_ref::<ReportError>().is_some_and(ReportError::aborts_host) {
                println!(
                    "  {} remaining reports for {}",
                    "SKIPPING".yellow(),
                    outcome.host
                );
            }
        }
        ReportStatus::Skipped => {
            if options.verbose {
                println!("  {} {}", "SKIPPED".yellow(), what);
            }
        }
    }
}

fn describe(outcome: &ReportOutcome) -> String {
    match outcome.kind {
        Some(kind) => format!("{}/{}", outcome.host, kind),
        None => outcome.host.clone(),
    }
}

fn print_summary(summary: &BatchSummary, runtime_secs: f64) {
    println!();
    println!("{}", "======================================".cyan());
    println!("{}", "  Report Summary".cyan());
    println!("{}", "======================================".cyan());
    println!();
    println!("{} {}", "Rendered:".green().bold(), summary.rendered());
    println!("{} {}", "Failed:".red().bold(), summary.failed());
    println!("{} {}", "Skipped:".yellow().bold(), summary.skipped());
    println!("{} {:.2}s", "Total runtime:".blue().bold(), runtime_secs);

    let failed: Vec<_> = summary
        .outcomes
        .iter()
        .filter_map(|o| o.failure().map(|f| (o, f)))
        .collect();
    if !failed.is_empty() {
        println!();
        println!("{}", "Failed reports:".red().bold());
        for (outcome, failure) in failed {
            println!("  - {}: {}", describe(outcome), failure);
        }
    }
}

fn exit_code(summary: &BatchSummary) -> ExitCode {
    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
