//! Worksheet location and row reading.
//!
//! Sheet names across the source workbooks are ad hoc
//! (`"Learning_Competencies"`, `"S2 Competencies"`, `"21st Century Skills"`),
//! so each semantic role carries a keyword list and the first sheet whose
//! name contains any keyword wins.

use calamine::{Data, Range};

// ─── Roles ───────────────────────────────────────────────────────────────────

/// The semantic role a worksheet plays within a subject workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRole {
  Competencies,
  Standards,
  Approaches,
  Skills,
  Concepts,
  DomainSequence,
}

impl SheetRole {
  pub const ALL: [SheetRole; 6] = [
    SheetRole::Competencies,
    SheetRole::Standards,
    SheetRole::Approaches,
    SheetRole::Skills,
    SheetRole::Concepts,
    SheetRole::DomainSequence,
  ];

  /// Keywords matched (case-insensitive substring) against sheet names.
  pub fn keywords(self) -> &'static [&'static str] {
    match self {
      SheetRole::Competencies => &["competenc", "learning"],
      SheetRole::Standards => &["standard"],
      SheetRole::Approaches => &["pedagog", "approach"],
      SheetRole::Skills => &["21st", "century", "skill"],
      SheetRole::Concepts => &["crosscut", "big_idea", "concept", "theme"],
      SheetRole::DomainSequence => &["domain", "sequence", "map"],
    }
  }
}

/// First sheet whose name contains any keyword. `None` means the workbook
/// simply has no sheet for this role — the caller skips it, it is not an
/// error.
pub fn find_sheet<'a>(
  sheet_names: &'a [String],
  keywords: &[&str],
) -> Option<&'a str> {
  for name in sheet_names {
    let lower = name.to_lowercase();
    if keywords.iter().any(|kw| lower.contains(kw)) {
      return Some(name);
    }
  }
  None
}

// ─── Cells & rows ────────────────────────────────────────────────────────────

/// Trimmed text for one cell; blank and error cells become `""`.
///
/// Integral floats render without the decimal point so a grade stored as the
/// number 1 reads back as `"1"`.
pub fn cell_text(cell: &Data) -> String {
  match cell {
    Data::Empty | Data::Error(_) => String::new(),
    Data::String(s) => s.trim().to_string(),
    Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
      format!("{}", *f as i64)
    }
    other => other.to_string().trim().to_string(),
  }
}

/// Read all rows of a worksheet as trimmed strings.
///
/// Stops after `blank_run_limit` consecutive fully-blank rows — trailing
/// sheet formatting often leaves long runs of empty rows that must not be
/// read as data. Blank rows below the threshold are skipped, not emitted.
pub fn read_rows(range: &Range<Data>, blank_run_limit: usize) -> Vec<Vec<String>> {
  let mut rows = Vec::new();
  let mut blank_run = 0usize;

  for row in range.rows() {
    let vals: Vec<String> = row.iter().map(cell_text).collect();
    if vals.iter().all(String::is_empty) {
      blank_run += 1;
      if blank_run >= blank_run_limit {
        break;
      }
      continue;
    }
    blank_run = 0;
    rows.push(vals);
  }

  rows
}

#[cfg(test)]
mod tests {
  use calamine::{Data, Range};

  use super::{SheetRole, cell_text, find_sheet, read_rows};

  fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn find_sheet_is_case_insensitive_and_first_wins() {
    let sheets = names(&["Overview", "Learning_Competencies", "LC_Archive"]);
    assert_eq!(
      find_sheet(&sheets, SheetRole::Competencies.keywords()),
      Some("Learning_Competencies")
    );
  }

  #[test]
  fn find_sheet_missing_role_is_none() {
    let sheets = names(&["Overview", "Notes"]);
    assert_eq!(find_sheet(&sheets, SheetRole::Skills.keywords()), None);
  }

  #[test]
  fn integral_floats_lose_the_decimal_point() {
    assert_eq!(cell_text(&Data::Float(1.0)), "1");
    assert_eq!(cell_text(&Data::Float(10.0)), "10");
    assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
  }

  #[test]
  fn blank_and_padded_cells_trim_to_empty() {
    assert_eq!(cell_text(&Data::Empty), "");
    assert_eq!(cell_text(&Data::String("  Grade 3  ".into())), "Grade 3");
  }

  #[test]
  fn a_long_blank_run_ends_the_sheet() {
    let mut range: Range<Data> = Range::new((0, 0), (10, 0));
    range.set_value((0, 0), Data::String("Header".into()));
    range.set_value((1, 0), Data::String("a".into()));
    // Rows 2..=6 stay blank; row 7 is formatting junk past the cutoff.
    range.set_value((7, 0), Data::String("ghost".into()));

    let rows = read_rows(&range, 5);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], ["a"]);
  }

  #[test]
  fn short_blank_runs_are_skipped_not_emitted() {
    let mut range: Range<Data> = Range::new((0, 0), (3, 0));
    range.set_value((0, 0), Data::String("Header".into()));
    range.set_value((2, 0), Data::String("b".into()));

    let rows = read_rows(&range, 5);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], ["b"]);
  }
}
