//! Header-to-role resolution.
//!
//! Every workbook names its columns differently (`"Grade Level"`,
//! `"GRADE"`, `"Baitang/Grade"`); headers are normalized once per worksheet
//! and matched against an ordered keyword table, so role precedence is
//! auditable in one place.

use crate::error::{Error, Result};

// ─── Normalization ───────────────────────────────────────────────────────────

/// Lower-case, separators to `_`, parentheses stripped.
pub fn normalize_header(h: &str) -> String {
  h.to_lowercase()
    .replace(' ', "_")
    .replace('-', "_")
    .replace(['(', ')'], "")
    .replace('/', "_")
}

/// First column whose normalized header contains any of `keywords`.
pub fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
  for (i, h) in headers.iter().enumerate() {
    let nh = normalize_header(h);
    if keywords.iter().any(|kw| nh.contains(kw)) {
      return Some(i);
    }
  }
  None
}

// ─── Competency-sheet roles ──────────────────────────────────────────────────

/// Semantic roles a competency-sheet column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
  Code,
  Grade,
  Quarter,
  KeyStage,
  Domain,
  Subdomain,
  Topic,
  Text,
  ContentStandard,
  PerformanceStandard,
  Blooms,
  Type,
  Tags,
  SubA,
  SubB,
  SubC,
}

impl ColumnRole {
  pub fn name(self) -> &'static str {
    match self {
      ColumnRole::Code => "code",
      ColumnRole::Grade => "grade",
      ColumnRole::Quarter => "quarter",
      ColumnRole::KeyStage => "key_stage",
      ColumnRole::Domain => "domain",
      ColumnRole::Subdomain => "subdomain",
      ColumnRole::Topic => "topic",
      ColumnRole::Text => "competency_text",
      ColumnRole::ContentStandard => "content_standard",
      ColumnRole::PerformanceStandard => "performance_standard",
      ColumnRole::Blooms => "blooms_level",
      ColumnRole::Type => "competency_type",
      ColumnRole::Tags => "tags",
      ColumnRole::SubA => "sub_competency_a",
      ColumnRole::SubB => "sub_competency_b",
      ColumnRole::SubC => "sub_competency_c",
    }
  }
}

/// Ordered (role, keyword-set) table for competency sheets. Keyword sets
/// include the Filipino-language headers some workbooks use.
const COMPETENCY_COLUMNS: &[(ColumnRole, &[&str])] = &[
  (ColumnRole::Code, &["lc_id", "lc_code"]),
  (ColumnRole::Grade, &["grade"]),
  (ColumnRole::Quarter, &["quarter"]),
  (ColumnRole::KeyStage, &["key_stage", "keystage"]),
  (ColumnRole::Domain, &["domain", "component", "learning_area"]),
  (ColumnRole::Subdomain, &["subdomain", "sub_domain", "sub_component"]),
  (
    ColumnRole::Topic,
    &["content_topic", "topic", "theme", "content_focus", "nilalaman"],
  ),
  (
    ColumnRole::Text,
    &[
      "learning_competency",
      "competency_text",
      "competency_description",
      "kasanayang",
      "pampagkatuto",
    ],
  ),
  (ColumnRole::ContentStandard, &["content_standard", "pangnilalaman"]),
  (ColumnRole::PerformanceStandard, &["performance_standard", "pagganap"]),
  (ColumnRole::Blooms, &["bloom", "blooms"]),
  (ColumnRole::Type, &["competency_type"]),
  (ColumnRole::Tags, &["ai_tag", "ai_searchable", "tags"]),
  (ColumnRole::SubA, &["sub_competency_a"]),
  (ColumnRole::SubB, &["sub_competency_b"]),
  (ColumnRole::SubC, &["sub_competency_c"]),
];

// ─── Resolved map ────────────────────────────────────────────────────────────

/// Column indices for every competency-sheet role, resolved once per
/// worksheet. Headers are normalized a single time up front.
#[derive(Debug, Clone)]
pub struct HeaderMap {
  resolved: Vec<(ColumnRole, usize)>,
}

impl HeaderMap {
  /// Resolve `headers` against the role table.
  ///
  /// With `strict` set, two roles claiming the same column is an error;
  /// the permissive default keeps whatever each role matched, the way the
  /// source workbooks require.
  pub fn resolve(headers: &[String], strict: bool) -> Result<Self> {
    let normalized: Vec<String> =
      headers.iter().map(|h| normalize_header(h)).collect();

    let mut resolved = Vec::new();
    for &(role, keywords) in COMPETENCY_COLUMNS {
      let hit = normalized
        .iter()
        .position(|nh| keywords.iter().any(|kw| nh.contains(kw)));
      if let Some(column) = hit {
        if strict
          && let Some(&(prior, _)) =
            resolved.iter().find(|&&(_, c)| c == column)
        {
          return Err(Error::AmbiguousColumn {
            first: ColumnRole::name(prior),
            second: role.name(),
            column,
          });
        }
        resolved.push((role, column));
      }
    }

    Ok(Self { resolved })
  }

  /// Column index claimed by `role`, if the sheet has one.
  pub fn get(&self, role: ColumnRole) -> Option<usize> {
    self
      .resolved
      .iter()
      .find(|&&(r, _)| r == role)
      .map(|&(_, c)| c)
  }

  /// Whether any role claimed column `index`.
  pub fn is_claimed(&self, index: usize) -> bool {
    self.resolved.iter().any(|&(_, c)| c == index)
  }
}

#[cfg(test)]
mod tests {
  use super::{ColumnRole, HeaderMap, find_column, normalize_header};
  use crate::error::Error;

  fn headers(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn normalization_collapses_separators() {
    assert_eq!(normalize_header("Grade Level"), "grade_level");
    assert_eq!(normalize_header("Key-Stage"), "key_stage");
    assert_eq!(normalize_header("Content (Topic)"), "content_topic");
    assert_eq!(normalize_header("Baitang/Grade"), "baitang_grade");
  }

  #[test]
  fn resolve_maps_renamed_headers() {
    let h = headers(&[
      "LC_ID",
      "Grade Level",
      "Quarter",
      "Learning Competency",
      "Content Standard",
    ]);
    let map = HeaderMap::resolve(&h, false).unwrap();
    assert_eq!(map.get(ColumnRole::Code), Some(0));
    assert_eq!(map.get(ColumnRole::Grade), Some(1));
    assert_eq!(map.get(ColumnRole::Quarter), Some(2));
    assert_eq!(map.get(ColumnRole::Text), Some(3));
    assert_eq!(map.get(ColumnRole::ContentStandard), Some(4));
    assert_eq!(map.get(ColumnRole::Blooms), None);
  }

  #[test]
  fn filipino_headers_resolve() {
    let h = headers(&["Baitang", "Kasanayang Pampagkatuto", "Pangnilalaman"]);
    let map = HeaderMap::resolve(&h, false).unwrap();
    assert_eq!(map.get(ColumnRole::Text), Some(1));
    assert_eq!(map.get(ColumnRole::ContentStandard), Some(2));
  }

  #[test]
  fn first_matching_column_wins_within_a_role() {
    // "sub_domain" also contains "domain"; the domain role must take the
    // earlier column.
    let h = headers(&["Domain", "Sub-Domain"]);
    let map = HeaderMap::resolve(&h, false).unwrap();
    assert_eq!(map.get(ColumnRole::Domain), Some(0));
    assert_eq!(map.get(ColumnRole::Subdomain), Some(1));
  }

  #[test]
  fn permissive_mode_tolerates_shared_columns() {
    // "Content Standard Topic" matches both the topic and content-standard
    // keyword sets.
    let h = headers(&["Content Standard Topic", "Learning Competency"]);
    let map = HeaderMap::resolve(&h, false).unwrap();
    assert_eq!(map.get(ColumnRole::Topic), Some(0));
    assert_eq!(map.get(ColumnRole::ContentStandard), Some(0));
  }

  #[test]
  fn strict_mode_rejects_shared_columns() {
    let h = headers(&["Content Standard Topic"]);
    let err = HeaderMap::resolve(&h, true).unwrap_err();
    assert!(matches!(err, Error::AmbiguousColumn { column: 0, .. }));
  }

  #[test]
  fn find_column_first_match_wins() {
    let h = headers(&["Approach Name", "Description", "Strategy"]);
    assert_eq!(find_column(&h, &["approach", "name"]), Some(0));
    assert_eq!(find_column(&h, &["description", "definition"]), Some(1));
    assert_eq!(find_column(&h, &["missing"]), None);
  }
}
