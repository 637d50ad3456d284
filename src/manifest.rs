//! Removal of ignored sub-project entries from a dbt manifest.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::selection::ProjectInclusion;

/// Top-level manifest mappings keyed by dotted unique ids that are filtered.
pub const FILTERED_SECTIONS: [&str; 5] = ["nodes", "sources", "macros", "parent_map", "child_map"];

/// Number of keys dropped from each filtered section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
  removed: BTreeMap<&'static str, usize>,
}

impl FilterSummary {
  /// Keys removed from a single section.
  pub fn removed_from(&self, section: &str) -> usize {
    self.removed.get(section).copied().unwrap_or(0)
  }

  /// Keys removed across all sections.
  pub fn total_removed(&self) -> usize {
    self.removed.values().sum()
  }

  /// Iterate over sections that lost at least one key.
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
    self.removed.iter().map(|(section, count)| (*section, *count))
  }
}

/// Drop every entry owned by an ignored project from the recognised manifest sections.
///
/// Sections that are absent or not JSON objects contribute nothing, and all other
/// top-level keys are left as they are. Values of kept entries are never rewritten,
/// so dependency lists may still mention removed ids.
pub fn filter_manifest<S: ProjectInclusion>(
  manifest: &mut Map<String, Value>,
  selection: &S,
) -> FilterSummary {
  let mut summary = FilterSummary::default();

  for section in FILTERED_SECTIONS {
    let Some(Value::Object(entries)) = manifest.get_mut(section) else {
      continue;
    };

    let before = entries.len();
    entries.retain(|key, _| !selection.is_ignored(key));
    let removed = before - entries.len();

    if removed > 0 {
      tracing::debug!(section, removed, "filtered ignored project entries");
      summary.removed.insert(section, removed);
    }
  }

  summary
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::selection::{IgnoredProjects, ProjectMatch};
  use serde_json::json;

  fn object(value: Value) -> Map<String, Value> {
    match value {
      Value::Object(map) => map,
      other => panic!("expected object, got {other}"),
    }
  }

  fn sample_manifest() -> Map<String, Value> {
    object(json!({
      "metadata": {"project_name": "proj_b"},
      "nodes": {
        "model.proj_a.foo": {"name": "foo"},
        "model.proj_b.bar": {"name": "bar"}
      },
      "sources": {
        "source.proj_a.raw.orders": {"name": "orders"},
        "source.proj_b.raw.users": {"name": "users"}
      },
      "macros": {
        "macro.proj_a.helper": {},
        "macro.dbt.run_query": {}
      },
      "parent_map": {
        "model.proj_a.foo": [],
        "model.proj_b.bar": ["model.proj_a.foo"]
      },
      "child_map": {
        "model.proj_a.foo": ["model.proj_b.bar"],
        "model.proj_b.bar": []
      },
      "exposures": {
        "exposure.proj_a.dash": {}
      }
    }))
  }

  #[test]
  fn removes_ignored_project_from_nodes() {
    let mut manifest = object(json!({
      "nodes": {
        "model.proj_a.foo": {"name": "foo"},
        "model.proj_b.bar": {"name": "bar"}
      }
    }));
    let ignored = IgnoredProjects::parse("proj_a", ProjectMatch::Pattern).unwrap();

    filter_manifest(&mut manifest, &ignored);

    let keys: Vec<&String> = manifest["nodes"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["model.proj_b.bar"]);
  }

  #[test]
  fn removes_keys_from_every_recognised_section() {
    let mut manifest = sample_manifest();
    let ignored = IgnoredProjects::parse("proj_a", ProjectMatch::Pattern).unwrap();

    let summary = filter_manifest(&mut manifest, &ignored);

    for section in FILTERED_SECTIONS {
      let entries = manifest[section].as_object().unwrap();
      assert!(entries.keys().all(|key| !key.contains(".proj_a.")), "{section}");
      assert_eq!(summary.removed_from(section), 1, "{section}");
    }
    assert_eq!(summary.total_removed(), 5);
  }

  #[test]
  fn leaves_other_keys_and_values_untouched() {
    let original = sample_manifest();
    let mut manifest = original.clone();
    let ignored = IgnoredProjects::parse("proj_a", ProjectMatch::Pattern).unwrap();

    filter_manifest(&mut manifest, &ignored);

    assert_eq!(manifest["metadata"], original["metadata"]);
    assert_eq!(manifest["exposures"], original["exposures"]);
    assert_eq!(
      manifest["parent_map"]["model.proj_b.bar"],
      json!(["model.proj_a.foo"])
    );
    assert_eq!(
      manifest["macros"]["macro.dbt.run_query"],
      original["macros"]["macro.dbt.run_query"]
    );
  }

  #[test]
  fn empty_ignore_list_is_a_pass_through() {
    let original = sample_manifest();
    let mut manifest = original.clone();

    let summary = filter_manifest(&mut manifest, &IgnoredProjects::parse("", ProjectMatch::Pattern).unwrap());

    assert_eq!(manifest, original);
    assert_eq!(summary, FilterSummary::default());
  }

  #[test]
  fn filtering_is_idempotent() {
    let ignored = IgnoredProjects::parse("proj_a,dbt", ProjectMatch::Pattern).unwrap();
    let mut once = sample_manifest();
    filter_manifest(&mut once, &ignored);

    let mut twice = once.clone();
    let summary = filter_manifest(&mut twice, &ignored);

    assert_eq!(once, twice);
    assert_eq!(summary.total_removed(), 0);
  }

  #[test]
  fn tolerates_missing_and_non_object_sections() {
    let mut manifest = object(json!({
      "nodes": ["model.proj_a.foo"],
      "macros": {"macro.proj_a.helper": {}}
    }));
    let ignored = IgnoredProjects::parse("proj_a", ProjectMatch::Segment).unwrap();

    let summary = filter_manifest(&mut manifest, &ignored);

    assert_eq!(manifest["nodes"], json!(["model.proj_a.foo"]));
    assert!(manifest["macros"].as_object().unwrap().is_empty());
    assert_eq!(summary.iter().collect::<Vec<_>>(), [("macros", 1usize)]);
  }

  #[test]
  fn preserves_key_order_of_kept_entries() {
    let mut manifest = object(json!({
      "nodes": {
        "model.proj_b.zeta": {},
        "model.proj_a.mid": {},
        "model.proj_b.alpha": {}
      }
    }));
    let ignored = IgnoredProjects::parse("proj_a", ProjectMatch::Pattern).unwrap();

    filter_manifest(&mut manifest, &ignored);

    let keys: Vec<&String> = manifest["nodes"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["model.proj_b.zeta", "model.proj_b.alpha"]);
  }
}
