//! Reading the docs shell and its JSON companions from disk.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::config::ProjectLayout;
use crate::encoding::TextEncoding;
use crate::error::BundleError;

/// Read an entire text file using the configured encoding.
pub fn load_text(path: &Path, encoding: TextEncoding) -> Result<String, BundleError> {
  let bytes = fs::read(path).map_err(|err| BundleError::file_access(path, err))?;
  let text = encoding.decode(path, &bytes)?.into_owned();
  tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded text file");
  Ok(text)
}

/// Read a JSON file whose top-level value must be an object.
pub fn load_json_object(
  path: &Path,
  encoding: TextEncoding,
) -> Result<Map<String, Value>, BundleError> {
  let text = load_text(path, encoding)?;
  let value: Value = serde_json::from_str(&text).map_err(|source| BundleError::Json {
    path: path.to_path_buf(),
    source,
  })?;

  match value {
    Value::Object(map) => Ok(map),
    _ => Err(BundleError::NotAnObject {
      path: path.to_path_buf(),
    }),
  }
}

/// The three inputs of a bundle run, fully materialised in memory.
#[derive(Debug, Clone)]
pub struct DocsInputs {
  /// HTML shell of the docs viewer.
  pub shell: String,
  /// Parsed manifest.
  pub manifest: Map<String, Value>,
  /// Parsed catalog, passed through untouched.
  pub catalog: Map<String, Value>,
}

impl DocsInputs {
  /// Load the shell, manifest and catalog from a project directory.
  pub fn load(
    project_dir: &Path,
    layout: &ProjectLayout,
    encoding: TextEncoding,
  ) -> Result<Self, BundleError> {
    let shell = load_text(&layout.index_html_path(project_dir), encoding)?;
    let manifest = load_json_object(&layout.manifest_path(project_dir), encoding)?;
    let catalog = load_json_object(&layout.catalog_path(project_dir), encoding)?;

    Ok(Self {
      shell,
      manifest,
      catalog,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;
  use tempfile::tempdir;

  #[test]
  fn missing_file_is_a_file_access_error() {
    let temp = tempdir().unwrap();
    let err = load_text(&temp.path().join("nope.html"), TextEncoding::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileAccess);
  }

  #[test]
  fn malformed_json_is_a_format_error() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");
    fs::write(&path, r#"{"nodes": "#).unwrap();

    let err = load_json_object(&path, TextEncoding::default()).unwrap_err();
    assert!(matches!(err, BundleError::Json { .. }));
    assert_eq!(err.kind(), ErrorKind::Format);
  }

  #[test]
  fn non_object_json_is_a_format_error() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("catalog.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let err = load_json_object(&path, TextEncoding::default()).unwrap_err();
    assert!(matches!(err, BundleError::NotAnObject { .. }));
    assert_eq!(err.kind(), ErrorKind::Format);
  }

  #[test]
  fn decodes_using_configured_encoding() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("index.html");
    fs::write(&path, [b'<', b'p', b'>', 0xe9, b'<', b'/', b'p', b'>']).unwrap();

    let encoding = TextEncoding::for_label("windows-1252").unwrap();
    assert_eq!(load_text(&path, encoding).unwrap(), "<p>é</p>");
  }

  #[test]
  fn loads_all_inputs_from_target_dir() {
    let temp = tempdir().unwrap();
    let target = temp.path().join("target");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("index.html"), "<html></html>").unwrap();
    fs::write(target.join("manifest.json"), r#"{"nodes": {}}"#).unwrap();
    fs::write(target.join("catalog.json"), r#"{"sources": {}}"#).unwrap();

    let inputs =
      DocsInputs::load(temp.path(), &ProjectLayout::default(), TextEncoding::default()).unwrap();
    assert_eq!(inputs.shell, "<html></html>");
    assert!(inputs.manifest.contains_key("nodes"));
    assert!(inputs.catalog.contains_key("sources"));
  }
}
