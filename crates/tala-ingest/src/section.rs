//! Parsers for the non-competency sheets: standards, pedagogical approaches,
//! 21st-century skills, crosscutting concepts, and the domain sequence map.
//!
//! These sheets are simpler than the competency sheet — no row grouping, no
//! fallback chains — but every non-blank cell is captured into the
//! side-channel, *including* mapped columns: skill-name recovery reads the
//! name column back out of the side-channel when the name field holds a code.

use tala_core::entity::{
  ExtraFields, NewApproach, NewConcept, NewDomainEntry, NewSkill, NewStandard,
};

use crate::header::find_column;

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// The cell at `idx`, or — when the column is unmapped or the row is short —
/// the row's first cell.
fn cell_or_first<'a>(row: &'a [String], idx: Option<usize>) -> &'a str {
  match idx {
    Some(i) if i < row.len() => &row[i],
    _ => row.first().map(String::as_str).unwrap_or(""),
  }
}

/// The cell at `idx`, or `""`.
fn cell<'a>(row: &'a [String], idx: Option<usize>) -> &'a str {
  idx
    .and_then(|i| row.get(i))
    .map(String::as_str)
    .unwrap_or("")
}

/// Every non-blank cell keyed by its header, in document order.
fn all_cells(headers: &[String], row: &[String]) -> ExtraFields {
  let mut extra = ExtraFields::new();
  for (i, val) in row.iter().enumerate() {
    if !val.is_empty() && i < headers.len() {
      extra.push(headers[i].clone(), val.clone());
    }
  }
  extra
}

fn joined(row: &[String]) -> String {
  row
    .iter()
    .filter(|v| !v.is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(" | ")
}

fn is_blank(row: &[String]) -> bool { row.iter().all(String::is_empty) }

// ─── Standards ───────────────────────────────────────────────────────────────

/// Standards sheets have no reliable column structure at all; the whole row
/// becomes one description.
pub fn parse_standards(rows: &[Vec<String>]) -> Vec<NewStandard> {
  if rows.len() < 2 {
    return Vec::new();
  }
  let headers = &rows[0];

  rows[1..]
    .iter()
    .filter(|row| !is_blank(row))
    .map(|row| NewStandard {
      standard_type: "content".to_string(),
      description:   joined(row),
      extra:         all_cells(headers, row),
    })
    .collect()
}

// ─── Pedagogical approaches ──────────────────────────────────────────────────

pub fn parse_approaches(rows: &[Vec<String>]) -> Vec<NewApproach> {
  if rows.len() < 2 {
    return Vec::new();
  }
  let headers = &rows[0];
  let col_name = find_column(headers, &["approach", "name", "strategy", "method"]);
  let col_desc = find_column(headers, &["description", "definition", "overview"]);

  let mut out = Vec::new();
  for row in &rows[1..] {
    if is_blank(row) {
      continue;
    }
    let name = cell_or_first(row, col_name);
    if name.is_empty() {
      continue;
    }
    out.push(NewApproach {
      name:        name.to_string(),
      description: cell(row, col_desc).to_string(),
      strategies:  String::new(),
      extra:       all_cells(headers, row),
    });
  }
  out
}

// ─── 21st-century skills ─────────────────────────────────────────────────────

/// Skill rows are stored exactly as found; display names are recovered at
/// query time.
pub fn parse_skills(rows: &[Vec<String>]) -> Vec<NewSkill> {
  if rows.len() < 2 {
    return Vec::new();
  }
  let headers = &rows[0];
  let col_name = find_column(headers, &["skill", "name"]);
  let col_cat = find_column(headers, &["category", "cluster", "domain"]);
  let col_desc = find_column(headers, &["description", "definition"]);

  let mut out = Vec::new();
  for row in &rows[1..] {
    if is_blank(row) {
      continue;
    }
    let name = cell_or_first(row, col_name);
    if name.is_empty() {
      continue;
    }
    out.push(NewSkill {
      name:        name.to_string(),
      category:    cell(row, col_cat).to_string(),
      description: cell(row, col_desc).to_string(),
      extra:       all_cells(headers, row),
    });
  }
  out
}

// ─── Crosscutting concepts ───────────────────────────────────────────────────

pub fn parse_concepts(rows: &[Vec<String>]) -> Vec<NewConcept> {
  if rows.len() < 2 {
    return Vec::new();
  }
  let headers = &rows[0];
  let col_name = find_column(headers, &["concept", "name", "big_idea", "theme"]);
  let col_desc =
    find_column(headers, &["description", "definition", "explanation"]);

  let mut out = Vec::new();
  for row in &rows[1..] {
    if is_blank(row) {
      continue;
    }
    let name = cell_or_first(row, col_name);
    if name.is_empty() {
      continue;
    }
    out.push(NewConcept {
      name:        name.to_string(),
      description: cell(row, col_desc).to_string(),
      extra:       all_cells(headers, row),
    });
  }
  out
}

// ─── Domain sequence ─────────────────────────────────────────────────────────

pub fn parse_domain_sequence(rows: &[Vec<String>]) -> Vec<NewDomainEntry> {
  if rows.len() < 2 {
    return Vec::new();
  }
  let headers = &rows[0];

  rows[1..]
    .iter()
    .filter(|row| !is_blank(row))
    .map(|row| NewDomainEntry {
      domain:   row.first().cloned().unwrap_or_default(),
      sequence: joined(row),
      extra:    all_cells(headers, row),
    })
    .collect()
}
