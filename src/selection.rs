//! Helpers used to decide which manifest entries belong to ignored sub-projects.

use clap::ValueEnum;
use regex::{Regex, RegexBuilder};

use crate::error::BundleError;

/// Compiled size cap for a single project-name pattern.
pub const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Trait describing which manifest keys are dropped from the standalone bundle.
pub trait ProjectInclusion {
  /// Returns `true` when the key belongs to an ignored project.
  fn is_ignored(&self, key: &str) -> bool;
}

/// How an ignored project name is compared against a dotted manifest key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ProjectMatch {
  /// Key matches `^.*\.<name>\.`: the name is any dot-bounded segment after the first.
  #[default]
  Pattern,
  /// The key's second dot-delimited segment equals the name exactly.
  Segment,
}

/// Ordered list of sub-project names whose entries are removed from the manifest.
#[derive(Debug, Clone, Default)]
pub struct IgnoredProjects {
  names: Vec<String>,
  mode: ProjectMatch,
  patterns: Vec<Regex>,
}

impl IgnoredProjects {
  /// Build the list from individual names.
  ///
  /// Fails when a name is too large to compile into a key pattern.
  pub fn new(
    names: impl IntoIterator<Item = impl Into<String>>,
    mode: ProjectMatch,
  ) -> Result<Self, BundleError> {
    let names = normalise_list(names.into_iter().map(Into::into));
    let patterns = match mode {
      ProjectMatch::Pattern => names
        .iter()
        .map(|name| project_pattern(name))
        .collect::<Result<_, _>>()?,
      ProjectMatch::Segment => Vec::new(),
    };

    Ok(Self {
      names,
      mode,
      patterns,
    })
  }

  /// Parse a comma-separated list such as `"proj_a, proj_b"`.
  pub fn parse(list: &str, mode: ProjectMatch) -> Result<Self, BundleError> {
    Self::new(list.split(','), mode)
  }

  /// Normalised project names in their original order.
  pub fn names(&self) -> &[String] {
    &self.names
  }

  /// Matching mode in effect.
  pub fn mode(&self) -> ProjectMatch {
    self.mode
  }

  /// Returns true when no project is ignored.
  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

impl ProjectInclusion for IgnoredProjects {
  fn is_ignored(&self, key: &str) -> bool {
    match self.mode {
      ProjectMatch::Pattern => self.patterns.iter().any(|pattern| pattern.is_match(key)),
      ProjectMatch::Segment => key
        .split('.')
        .nth(1)
        .is_some_and(|segment| self.names.iter().any(|name| name == segment)),
    }
  }
}

fn project_pattern(name: &str) -> Result<Regex, BundleError> {
  RegexBuilder::new(&format!(r"^.*\.{}\.", regex::escape(name)))
    .size_limit(PATTERN_SIZE_LIMIT)
    .build()
    .map_err(|source| BundleError::ProjectPattern {
      name: name.to_string(),
      source,
    })
}

/// Trim names, discard empty entries and drop repeats while keeping first-seen order.
///
/// Without this an empty entry (from `""` or a trailing comma) would compile to `^.*\.\.`
/// and match any key containing `..`.
fn normalise_list(values: impl IntoIterator<Item = String>) -> Vec<String> {
  let mut names: Vec<String> = Vec::new();
  for value in values {
    let value = value.trim();
    if value.is_empty() || names.iter().any(|name| name == value) {
      continue;
    }
    names.push(value.to_string());
  }
  names
}
