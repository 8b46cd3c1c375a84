//! Workbook-level parsing: open an xlsx file, locate the role sheets, and
//! hand their rows to the section parsers.

use std::path::Path;

use calamine::{Reader, Xlsx, open_workbook};
use tala_core::entity::{NewSubject, SubjectBundle};

use crate::{
  IngestOptions,
  catalog::{SeniorSource, SubjectSource},
  competency::parse_competency_rows,
  error::Result,
  section::{
    parse_approaches, parse_concepts, parse_domain_sequence, parse_skills,
    parse_standards,
  },
  senior::parse_senior_rows,
  sheet::{SheetRole, find_sheet, read_rows},
};

/// Parse one single-subject workbook into a bundle.
///
/// Roles whose sheet is missing contribute empty sections; that is normal
/// for most workbooks and not an error.
pub fn parse_workbook(
  path: &Path,
  source: &SubjectSource,
  opts: &IngestOptions,
) -> Result<SubjectBundle> {
  let mut workbook: Xlsx<_> = open_workbook(path)?;
  let sheet_names = workbook.sheet_names().to_owned();

  let mut bundle = SubjectBundle::new(NewSubject {
    id:           source.id.clone(),
    display_name: source.display_name.clone(),
    source_file:  source.filename.clone(),
  });

  for role in SheetRole::ALL {
    let Some(name) = find_sheet(&sheet_names, role.keywords()) else {
      continue;
    };
    let range = workbook.worksheet_range(name)?;
    let rows = read_rows(&range, opts.blank_row_limit);

    match role {
      SheetRole::Competencies => {
        bundle.competencies = parse_competency_rows(&rows, opts.strict_columns)?;
      }
      SheetRole::Standards => bundle.standards = parse_standards(&rows),
      SheetRole::Approaches => bundle.approaches = parse_approaches(&rows),
      SheetRole::Skills => bundle.skills = parse_skills(&rows),
      SheetRole::Concepts => bundle.concepts = parse_concepts(&rows),
      SheetRole::DomainSequence => {
        bundle.domain_sequence = parse_domain_sequence(&rows);
      }
    }
  }

  tracing::debug!(
    subject = %bundle.subject.id,
    competencies = bundle.competencies.len(),
    standards = bundle.standards.len(),
    approaches = bundle.approaches.len(),
    skills = bundle.skills.len(),
    concepts = bundle.concepts.len(),
    "parsed workbook"
  );

  Ok(bundle)
}

/// Parse the multi-subject senior-high workbook into one bundle per known
/// subject code.
pub fn parse_senior_workbook(
  path: &Path,
  source: &SeniorSource,
  opts: &IngestOptions,
) -> Result<Vec<SubjectBundle>> {
  let mut workbook: Xlsx<_> = open_workbook(path)?;
  let sheet_names = workbook.sheet_names().to_owned();

  // The competency sheet here is named like "S1_Learning_Competencies"; the
  // usual role keywords cover it, with the track prefix as a last resort.
  let found = sheet_names.iter().find(|name| {
    let lower = name.to_lowercase();
    lower.contains("competenc")
      || lower.contains("learning")
      || lower.starts_with("s1")
  });
  let Some(name) = found else {
    tracing::warn!(
      file = %source.filename,
      "no competency sheet in multi-subject workbook"
    );
    return Ok(Vec::new());
  };

  let range = workbook.worksheet_range(name)?;
  let rows = read_rows(&range, opts.blank_row_limit);
  parse_senior_rows(&rows, source)
}
