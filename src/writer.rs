//! Writing the standalone HTML document.

use std::fs;
use std::path::{Path, PathBuf};

use crate::encoding::TextEncoding;
use crate::error::BundleError;

/// Write `content` to `<dir>/<filename>`, creating or overwriting the file.
///
/// The directory must already exist; it is never created here.
pub fn write_output(
  dir: &Path,
  filename: &str,
  content: &str,
  encoding: TextEncoding,
) -> Result<PathBuf, BundleError> {
  let path = dir.join(filename);
  let bytes = encoding.encode(&path, content)?;
  fs::write(&path, &bytes).map_err(|err| BundleError::file_access(&path, err))?;
  tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote standalone docs");
  Ok(path)
}
