//! Command-line entry point for building standalone dbt docs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::builder::{BundleReport, StandaloneDocsBuilder};
use crate::config::{BundleConfig, ProjectLayout};
use crate::encoding::TextEncoding;
use crate::error::BundleError;
use crate::selection::{IgnoredProjects, ProjectMatch};

/// Embed dbt docs manifest and catalog into a single self-contained HTML file.
#[derive(Debug, Parser)]
#[command(name = "dbt-docs-bundler", version, about)]
pub struct Cli {
  /// dbt project directory containing `target/index.html`, `manifest.json` and `catalog.json`.
  #[arg(long = "dbt_project_dir", value_name = "PATH")]
  pub dbt_project_dir: PathBuf,

  /// Existing directory the standalone HTML file is written into.
  #[arg(long = "standalone_html_output_dir", value_name = "PATH")]
  pub standalone_html_output_dir: PathBuf,

  /// File name of the standalone HTML file.
  #[arg(long = "standalone_html_output_filename", value_name = "NAME")]
  pub standalone_html_output_filename: String,

  /// Encoding for all reads and writes, e.g. `utf-8`.
  #[arg(long, value_name = "LABEL")]
  pub encoding: TextEncoding,

  /// Comma-separated list of projects whose entries are removed from the manifest.
  #[arg(long = "ignore_projects", value_name = "CSV", default_value = "")]
  pub ignore_projects: String,

  /// How ignored project names are matched against manifest keys.
  #[arg(long = "project_match", value_enum, default_value_t = ProjectMatch::Pattern)]
  pub project_match: ProjectMatch,
}

impl Cli {
  /// Convert parsed arguments into the run configuration.
  pub fn into_config(self, layout: ProjectLayout) -> Result<BundleConfig, BundleError> {
    Ok(BundleConfig {
      ignored: IgnoredProjects::parse(&self.ignore_projects, self.project_match)?,
      project_dir: self.dbt_project_dir,
      output_dir: self.standalone_html_output_dir,
      output_filename: self.standalone_html_output_filename,
      encoding: self.encoding,
      layout,
    })
  }
}

/// Parse process arguments, run the bundle and map the outcome to an exit code.
pub fn run() -> ExitCode {
  init_tracing();
  let cli = Cli::parse();
  match execute(cli) {
    Ok(_) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

/// Build the configuration from parsed arguments and run the pipeline.
pub fn execute(cli: Cli) -> Result<BundleReport> {
  let layout = ProjectLayout::discover(&cli.dbt_project_dir)
    .context("failed to load project layout")?;
  let config = cli
    .into_config(layout)
    .context("invalid --ignore_projects")?;

  let report = StandaloneDocsBuilder::new(&config)
    .build()
    .with_context(|| {
      format!(
        "failed to bundle docs from {}",
        config.project_dir.display()
      )
    })?;

  tracing::info!(
    output = %report.output_path.display(),
    removed = report.removed.total_removed(),
    marker_replaced = report.marker_replaced,
    "standalone docs ready"
  );
  Ok(report)
}

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .try_init();
}
