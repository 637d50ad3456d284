//! Run configuration and the on-disk layout of a dbt project's docs output.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::encoding::TextEncoding;
use crate::error::BundleError;
use crate::selection::IgnoredProjects;

/// Optional layout override file looked up in the project directory.
pub const LAYOUT_CONFIG_FILE: &str = "docs_bundle.json";

/// Relative names of the files `dbt docs generate` writes into the project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
  /// Directory, relative to the project root, holding the generated docs.
  pub target_dir: String,
  /// Static HTML shell of the docs viewer.
  pub index_html_file: String,
  /// Manifest describing nodes, sources, macros and dependency maps.
  pub manifest_json_file: String,
  /// Catalog describing database objects.
  pub catalog_json_file: String,
}

impl Default for ProjectLayout {
  fn default() -> Self {
    Self {
      target_dir: "target".into(),
      index_html_file: "index.html".into(),
      manifest_json_file: "manifest.json".into(),
      catalog_json_file: "catalog.json".into(),
    }
  }
}

impl ProjectLayout {
  /// Load layout overrides from the project directory.
  ///
  /// A missing override file yields the default layout. A file that exists but cannot be
  /// read or parsed is an error so a typo never silently falls back to the defaults.
  pub fn discover(project_dir: &Path) -> Result<Self, BundleError> {
    Self::load_from_path(project_dir.join(LAYOUT_CONFIG_FILE))
  }

  /// Read layout overrides from a specific JSON file.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, BundleError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
      Err(err) => return Err(BundleError::file_access(path, err)),
    };

    serde_json::from_str(&contents).map_err(|source| BundleError::LayoutConfig {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Directory holding the generated docs for a project.
  pub fn target_path(&self, project_dir: &Path) -> PathBuf {
    project_dir.join(&self.target_dir)
  }

  /// Path of the HTML shell.
  pub fn index_html_path(&self, project_dir: &Path) -> PathBuf {
    self.target_path(project_dir).join(&self.index_html_file)
  }

  /// Path of the manifest JSON file.
  pub fn manifest_path(&self, project_dir: &Path) -> PathBuf {
    self.target_path(project_dir).join(&self.manifest_json_file)
  }

  /// Path of the catalog JSON file.
  pub fn catalog_path(&self, project_dir: &Path) -> PathBuf {
    self.target_path(project_dir).join(&self.catalog_json_file)
  }
}

/// Everything a single bundle run needs, constructed once at process start.
#[derive(Debug, Clone)]
pub struct BundleConfig {
  /// Root of the dbt project containing the docs target directory.
  pub project_dir: PathBuf,
  /// Existing directory the standalone HTML file is written into.
  pub output_dir: PathBuf,
  /// File name of the standalone HTML file.
  pub output_filename: String,
  /// Encoding used for every read and write.
  pub encoding: TextEncoding,
  /// Sub-projects whose manifest entries are dropped.
  pub ignored: IgnoredProjects,
  /// Input file layout inside the project directory.
  pub layout: ProjectLayout,
}

impl BundleConfig {
  /// Create a configuration with the default layout, UTF-8 encoding and no ignored projects.
  pub fn new(
    project_dir: impl Into<PathBuf>,
    output_dir: impl Into<PathBuf>,
    output_filename: impl Into<String>,
  ) -> Self {
    Self {
      project_dir: project_dir.into(),
      output_dir: output_dir.into(),
      output_filename: output_filename.into(),
      encoding: TextEncoding::default(),
      ignored: IgnoredProjects::default(),
      layout: ProjectLayout::default(),
    }
  }

  /// Full path of the file the run writes.
  pub fn output_path(&self) -> PathBuf {
    self.output_dir.join(&self.output_filename)
  }
}
