//! Standalone docs orchestrator: load, filter, splice and write in one pass.

use std::path::PathBuf;

use crate::config::BundleConfig;
use crate::error::BundleError;
use crate::loader::DocsInputs;
use crate::manifest::{FilterSummary, filter_manifest};
use crate::splice::splice_shell;
use crate::writer::write_output;

/// Outcome of a successful bundle run.
#[derive(Debug, Clone)]
pub struct BundleReport {
  /// File the standalone HTML was written to.
  pub output_path: PathBuf,
  /// Keys removed from each filtered manifest section.
  pub removed: FilterSummary,
  /// Whether the shell contained the fetch marker.
  pub marker_replaced: bool,
}

/// High-level helper that turns a dbt docs target directory into a single HTML file.
pub struct StandaloneDocsBuilder<'a> {
  config: &'a BundleConfig,
}

impl<'a> StandaloneDocsBuilder<'a> {
  /// Create a builder for the provided configuration.
  pub fn new(config: &'a BundleConfig) -> Self {
    Self { config }
  }

  /// Run the pipeline. Any failure aborts the run before the output file is touched,
  /// except for failures of the final write itself.
  pub fn build(&self) -> Result<BundleReport, BundleError> {
    let config = self.config;
    let DocsInputs {
      shell,
      mut manifest,
      catalog,
    } = DocsInputs::load(&config.project_dir, &config.layout, config.encoding)?;

    let removed = filter_manifest(&mut manifest, &config.ignored);
    tracing::debug!(
      ignored = ?config.ignored.names(),
      removed = removed.total_removed(),
      "filtered manifest"
    );

    let spliced = splice_shell(&shell, &manifest, &catalog)?;
    let output_path = write_output(
      &config.output_dir,
      &config.output_filename,
      &spliced.html,
      config.encoding,
    )?;

    Ok(BundleReport {
      output_path,
      removed,
      marker_replaced: spliced.marker_replaced,
    })
  }
}
