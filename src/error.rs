//! Error types shared by every stage of the bundle pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`BundleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A file or directory was missing, unreadable or unwritable.
  FileAccess,
  /// Content could not be decoded, parsed or serialised.
  Format,
}

/// Errors raised while loading, filtering, splicing or writing docs output.
#[derive(Debug, Error)]
pub enum BundleError {
  /// Reading or writing a path failed at the filesystem level.
  #[error("failed to access {}: {source}", .path.display())]
  FileAccess {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: io::Error,
  },
  /// The file contents are not valid JSON.
  #[error("failed to parse {}: {source}", .path.display())]
  Json {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
  /// The file is valid JSON but its top-level value is not an object.
  #[error("expected a JSON object at the top level of {}", .path.display())]
  NotAnObject {
    /// Path that caused the error.
    path: PathBuf,
  },
  /// The file bytes are not valid in the configured encoding.
  #[error("{} is not valid {encoding} text", .path.display())]
  Decode {
    /// Path that caused the error.
    path: PathBuf,
    /// Canonical name of the encoding used for decoding.
    encoding: &'static str,
  },
  /// The encoding label is not recognised.
  #[error("unknown text encoding `{0}`")]
  UnknownEncoding(String),
  /// Layout overrides could not be parsed.
  #[error("invalid layout configuration in {}: {source}", .path.display())]
  LayoutConfig {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
  /// The output text contains characters the configured encoding cannot represent.
  #[error("{} cannot be written as {encoding}: text contains unrepresentable characters", .path.display())]
  Unencodable {
    /// Path that was being written.
    path: PathBuf,
    /// Canonical name of the encoding used for encoding.
    encoding: &'static str,
  },
  /// An ignored project name could not be compiled into a key pattern.
  #[error("cannot match ignored project name of {} bytes: {source}", .name.len())]
  ProjectPattern {
    /// Project name that failed to compile.
    name: String,
    /// Source regex error.
    #[source]
    source: regex::Error,
  },
  /// Serialising the embedded payload failed.
  #[error("failed to serialise embedded JSON: {0}")]
  Serialize(#[source] serde_json::Error),
}

impl BundleError {
  /// Classify the error as a file access or format failure.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::FileAccess { .. } => ErrorKind::FileAccess,
      Self::Json { .. }
      | Self::NotAnObject { .. }
      | Self::Decode { .. }
      | Self::Unencodable { .. }
      | Self::ProjectPattern { .. }
      | Self::UnknownEncoding(_)
      | Self::LayoutConfig { .. }
      | Self::Serialize(_) => ErrorKind::Format,
    }
  }

  pub(crate) fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::FileAccess {
      path: path.into(),
      source,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classifies_io_failures_as_file_access() {
    let err = BundleError::file_access(
      "target/manifest.json",
      io::Error::new(io::ErrorKind::NotFound, "missing"),
    );
    assert_eq!(err.kind(), ErrorKind::FileAccess);
    assert!(err.to_string().contains("target/manifest.json"));
  }

  #[test]
  fn classifies_parse_failures_as_format() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = BundleError::Json {
      path: PathBuf::from("catalog.json"),
      source,
    };
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(
      BundleError::UnknownEncoding("klingon".into()).kind(),
      ErrorKind::Format
    );
  }
}
