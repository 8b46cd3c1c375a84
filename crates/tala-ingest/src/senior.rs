//! Multi-subject sheet splitting for the senior-high workbook.
//!
//! One worksheet carries six subjects, distinguished by a code column. The
//! sheet has a fixed prelude — title on row 0, subtitle on row 1, real
//! headers on row 2, data from row 3 — so header resolution starts at a
//! known offset instead of the usual row 0.

use std::sync::LazyLock;

use regex::Regex;
use tala_core::entity::{ExtraFields, NewCompetency, NewSubject, SubjectBundle};

use crate::{
  catalog::{SeniorCode, SeniorSource},
  error::Result,
  header::find_column,
};

static DIGITS_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\d+").expect("digit regex"));

/// First run of digits in `raw` (`"Grade 11"` → `"11"`, `"Q2"` → `"2"`);
/// labels with no digits fall back to the trimmed text.
fn digit_run(raw: &str) -> String {
  let trimmed = raw.trim();
  DIGITS_RE
    .find(trimmed)
    .map(|m| m.as_str().to_string())
    .unwrap_or_else(|| trimmed.to_string())
}

fn cell<'a>(row: &'a [String], idx: Option<usize>) -> &'a str {
  idx
    .and_then(|i| row.get(i))
    .map(String::as_str)
    .unwrap_or("")
}

/// Split the senior-high competency sheet into one bundle per known subject
/// code. Rows with unknown codes contribute to no subject; rows with blank
/// competency text are discarded.
pub fn parse_senior_rows(
  rows: &[Vec<String>],
  source: &SeniorSource,
) -> Result<Vec<SubjectBundle>> {
  // Title, subtitle, headers, at least one data row.
  if rows.len() < 4 {
    tracing::warn!(
      file = %source.filename,
      "multi-subject sheet has insufficient rows"
    );
    return Ok(Vec::new());
  }

  let headers = &rows[2];

  let col_code = find_column(headers, &["subject_code"]);
  let col_grade = find_column(headers, &["grade_level", "grade"]);
  let col_quarter = find_column(headers, &["quarter"]);
  let col_id = find_column(headers, &["lc_id", "lc_code"]);
  let col_domain = find_column(headers, &["domain", "strand", "component"]);
  let col_text = find_column(
    headers,
    &["competency_statement", "learning_competency", "competency"],
  );
  let col_bloom = find_column(headers, &["bloom", "blooms"]);
  let col_tags = find_column(headers, &["ai_tag", "ai_searchable", "tags"]);

  let Some(col_code) = col_code else {
    tracing::warn!(
      file = %source.filename,
      "multi-subject sheet has no subject-code column"
    );
    return Ok(Vec::new());
  };

  let mapped: Vec<Option<usize>> = vec![
    Some(col_code),
    col_grade,
    col_quarter,
    col_id,
    col_domain,
    col_text,
    col_bloom,
    col_tags,
  ];

  // Group data rows by code, keeping first-appearance order. Unknown codes
  // contribute to no subject.
  let mut groups: Vec<(&SeniorCode, Vec<&[String]>)> = Vec::new();
  for row in &rows[3..] {
    let row = row.as_slice();
    if row.iter().all(String::is_empty) {
      continue;
    }
    let code = cell(row, Some(col_code));
    let Some(entry) = source.codes.iter().find(|c| c.code == code) else {
      continue;
    };
    match groups.iter_mut().find(|(s, _)| s.code == code) {
      Some((_, rows)) => rows.push(row),
      None => groups.push((entry, vec![row])),
    }
  }

  let mut bundles = Vec::new();
  for (entry, group_rows) in groups {
    let mut bundle = SubjectBundle::new(NewSubject {
      id:           entry.id.clone(),
      display_name: entry.display_name.clone(),
      source_file:  source.filename.clone(),
    });

    for row in group_rows {
      let text = cell(row, col_text);
      if text.is_empty() {
        continue;
      }

      let mut extra = ExtraFields::new();
      for (i, val) in row.iter().enumerate() {
        let claimed = mapped.iter().any(|&m| m == Some(i));
        if !claimed && !val.is_empty() && i < headers.len() {
          extra.push(headers[i].clone(), val.clone());
        }
      }

      bundle.competencies.push(NewCompetency {
        code: cell(row, col_id).to_string(),
        grade: if col_grade.is_some() {
          digit_run(cell(row, col_grade))
        } else {
          String::new()
        },
        quarter: if col_quarter.is_some() {
          digit_run(cell(row, col_quarter))
        } else {
          String::new()
        },
        key_stage: source.key_stage.clone(),
        domain: cell(row, col_domain).to_string(),
        text: text.to_string(),
        blooms_level: cell(row, col_bloom).to_string(),
        tags: cell(row, col_tags).to_string(),
        extra,
        ..Default::default()
      });
    }

    tracing::debug!(
      subject = %bundle.subject.id,
      competencies = bundle.competencies.len(),
      "split multi-subject group"
    );
    bundles.push(bundle);
  }

  Ok(bundles)
}

#[cfg(test)]
mod tests {
  use super::{digit_run, parse_senior_rows};
  use crate::catalog::{SeniorCode, SeniorSource};

  fn source() -> SeniorSource {
    SeniorSource {
      filename:  "SHS_Core.xlsx".into(),
      key_stage: "SHS".into(),
      codes:     vec![
        SeniorCode {
          code:         "GM".into(),
          id:           "SHS_General_Mathematics".into(),
          display_name: "SHS - General Mathematics".into(),
        },
        SeniorCode {
          code:         "GS".into(),
          id:           "SHS_General_Science".into(),
          display_name: "SHS - General Science".into(),
        },
      ],
    }
  }

  fn rows(table: &[&[&str]]) -> Vec<Vec<String>> {
    table
      .iter()
      .map(|r| r.iter().map(|c| c.to_string()).collect())
      .collect()
  }

  fn sheet(data: &[&[&str]]) -> Vec<Vec<String>> {
    let mut table = rows(&[
      &["Senior High School Core Curriculum"],
      &["Consolidated competency reference"],
      &["Subject_Code", "Grade_Level", "Quarter", "Competency_Statement"],
    ]);
    table.extend(rows(data));
    table
  }

  #[test]
  fn digit_runs_extract_and_fall_back() {
    assert_eq!(digit_run("Grade 11"), "11");
    assert_eq!(digit_run("Q2"), "2");
    assert_eq!(digit_run(" 12 "), "12");
    assert_eq!(digit_run("All Grades"), "All Grades");
  }

  #[test]
  fn rows_group_by_code_and_unknown_codes_vanish() {
    let table = sheet(&[
      &["GM", "Grade 11", "Q1", "solves rational equations"],
      &["GS", "11", "Quarter 1", "explains cell theory"],
      &["GM", "Grade 11", "Q2", "graphs rational functions"],
      &["XX", "11", "Q1", "not a real subject"],
    ]);
    let bundles = parse_senior_rows(&table, &source()).unwrap();
    assert_eq!(bundles.len(), 2);

    let gm = &bundles[0];
    assert_eq!(gm.subject.id, "SHS_General_Mathematics");
    assert_eq!(gm.competencies.len(), 2);
    assert_eq!(gm.competencies[0].grade, "11");
    assert_eq!(gm.competencies[0].quarter, "1");
    assert_eq!(gm.competencies[0].key_stage, "SHS");

    let gs = &bundles[1];
    assert_eq!(gs.subject.id, "SHS_General_Science");
    assert_eq!(gs.competencies.len(), 1);
    assert_eq!(gs.competencies[0].quarter, "1");
  }

  #[test]
  fn blank_statements_are_discarded_within_a_group() {
    let table = sheet(&[
      &["GM", "11", "1", "solves problems"],
      &["GM", "11", "1", ""],
    ]);
    let bundles = parse_senior_rows(&table, &source()).unwrap();
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].competencies.len(), 1);
  }

  #[test]
  fn preludes_shorter_than_the_data_offset_yield_nothing() {
    let table = rows(&[
      &["Senior High School Core Curriculum"],
      &["Subject_Code", "Competency_Statement"],
      &["GM", "solves problems"],
    ]);
    assert!(parse_senior_rows(&table, &source()).unwrap().is_empty());
  }

  #[test]
  fn missing_code_column_yields_nothing() {
    let table = sheet(&[&["GM", "11", "1", "solves problems"]]);
    let mut no_code = table.clone();
    no_code[2] = vec!["Grade_Level".into(), "Quarter".into(), "Statement".into()];
    assert!(parse_senior_rows(&no_code, &source()).unwrap().is_empty());
  }
}
