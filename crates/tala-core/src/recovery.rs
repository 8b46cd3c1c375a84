//! Query-time display-name recovery for 21st-century skills.
//!
//! The source workbooks store skills inconsistently: some put a real name in
//! the name column, some put a short code there (`CS01`, `21C-01`) with the
//! real name in a side-channel field, some repeat the category as the name of
//! every sub-skill. Rows are stored raw; this module turns them into
//! displayable skills per subject.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::entity::Skill;

// ─── Rejection rules ─────────────────────────────────────────────────────────

/// ID codes like `CS01`, `21C-01`, `21C01`.
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^[A-Z]{2,4}[\-_]?\d{1,3}$|^\d{2}[A-Z]{1,2}[\-_]?\d{1,3}$")
    .expect("code regex")
});

/// Column header strings that leak into data rows as fake skill names.
const HEADER_LABELS: &[&str] = &[
  "skill code",
  "skill category",
  "skill domain",
  "skill_id",
  "skill name",
  "skill sub-category",
  "category",
  "specific skill",
  "skill_name",
  "skill_category",
];

fn is_code(s: &str) -> bool { CODE_RE.is_match(s) }

fn is_header_label(s: &str) -> bool {
  let lower = s.to_lowercase();
  HEADER_LABELS.contains(&lower.as_str())
}

/// A candidate is usable as a display name if it is non-blank, not
/// code-shaped, and not a leaked header label.
fn usable(s: &str) -> bool { !s.is_empty() && !is_code(s) && !is_header_label(s) }

// ─── Output type ─────────────────────────────────────────────────────────────

/// A skill with its display name resolved. `id` is 0 for entries from the
/// universal fallback list (they have no stored row).
#[derive(Debug, Clone, Serialize)]
pub struct RecoveredSkill {
  pub id:          i64,
  pub subject_id:  String,
  pub name:        String,
  pub category:    String,
  pub description: String,
}

// ─── Universal fallback ──────────────────────────────────────────────────────

/// Used when a subject's workbook has no recoverable skill names at all.
const UNIVERSAL_SKILLS: &[(&str, &str, &str)] = &[
  (
    "Critical Thinking",
    "Learning & Innovation",
    "Analyze, evaluate and synthesize information to solve complex problems.",
  ),
  (
    "Creativity",
    "Learning & Innovation",
    "Generate new ideas and approaches to learning challenges.",
  ),
  (
    "Communication",
    "Life & Career",
    "Express ideas clearly and effectively in written, oral, and multimodal forms.",
  ),
  (
    "Collaboration",
    "Life & Career",
    "Work effectively with others toward shared learning goals.",
  ),
  (
    "Information Literacy",
    "Information, Media & Technology",
    "Access, evaluate, and use information effectively and ethically.",
  ),
  (
    "Technology Literacy",
    "Information, Media & Technology",
    "Use digital tools and technology responsibly for learning and communication.",
  ),
];

/// The fixed six-skill list, tagged to `subject_id`.
pub fn universal_fallback(subject_id: &str) -> Vec<RecoveredSkill> {
  UNIVERSAL_SKILLS
    .iter()
    .map(|&(name, category, description)| RecoveredSkill {
      id:          0,
      subject_id:  subject_id.to_string(),
      name:        name.to_string(),
      category:    category.to_string(),
      description: description.to_string(),
    })
    .collect()
}

// ─── Recovery ────────────────────────────────────────────────────────────────

/// Resolve display names for a subject's stored skill rows.
///
/// Per row, in order: reject leaked header rows; prefer a usable
/// `Specific Skill` side-channel value; only when that field is absent or
/// blank, try `Skill Sub-Category`; if the name is still code-shaped, try
/// `Skill Name` / `Skill_Name`; drop rows that end up empty or code-shaped.
/// Survivors are deduplicated case-insensitively (first occurrence wins). If
/// nothing survives, the universal fallback list is returned.
pub fn recover_skills(subject_id: &str, rows: &[Skill]) -> Vec<RecoveredSkill> {
  let mut skills = Vec::new();
  let mut seen: HashSet<String> = HashSet::new();

  for row in rows {
    let raw_name = row.name.trim();

    // A header row that leaked into the data.
    if is_header_label(raw_name) {
      continue;
    }

    let mut name = raw_name.to_string();

    let specific = row.extra.get("Specific Skill").unwrap_or("").trim();
    if usable(specific) {
      name = specific.to_string();
    } else if specific.is_empty() {
      let sub = row.extra.get("Skill Sub-Category").unwrap_or("").trim();
      if usable(sub) {
        name = sub.to_string();
      }
    }

    // Codes stored in the name column proper (some workbooks keep the real
    // name under a "Skill Name" side-channel header).
    if is_code(&name) {
      for key in ["Skill Name", "Skill_Name"] {
        let val = row.extra.get(key).unwrap_or("").trim();
        if usable(val) {
          name = val.to_string();
          break;
        }
      }
    }

    if name.is_empty() || is_code(&name) {
      continue;
    }

    let name_key = name.to_lowercase();
    if !seen.insert(name_key) {
      continue;
    }

    let mut description = row.description.trim().to_string();
    if description.is_empty() {
      description = row
        .extra
        .get("Description")
        .or_else(|| row.extra.get("description"))
        .unwrap_or("")
        .trim()
        .to_string();
    }

    let mut category = row.category.trim().to_string();
    if category.is_empty() {
      category = row
        .extra
        .get("Skill Category")
        .or_else(|| row.extra.get("Skill_Category"))
        .unwrap_or(raw_name)
        .trim()
        .to_string();
    }

    skills.push(RecoveredSkill {
      id: row.id,
      subject_id: row.subject_id.clone(),
      name,
      category,
      description,
    });
  }

  if skills.is_empty() {
    return universal_fallback(subject_id);
  }
  skills
}
