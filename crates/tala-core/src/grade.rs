//! Grade-label ordering.
//!
//! Grade values are free text in the sources: `"K"`, `"Kinder"`, `"1"`,
//! `"10"`, occasionally something unparseable. Listings must come back with
//! kindergarten first, numeric grades ascending, and everything else last.

/// Sort rank for a grade label. Kindergarten spellings rank below grade 1;
/// non-numeric labels rank after every numeric grade.
pub fn grade_rank(grade: &str) -> u32 {
  let g = grade.trim();
  if g.eq_ignore_ascii_case("K")
    || g.eq_ignore_ascii_case("KINDER")
    || g.eq_ignore_ascii_case("KINDERGARTEN")
  {
    return 0;
  }
  g.parse::<u32>().unwrap_or(999)
}

/// Stable sort by [`grade_rank`]; ties keep their incoming (alphabetical)
/// order.
pub fn sort_grades(grades: &mut [String]) {
  grades.sort_by_key(|g| grade_rank(g));
}

#[cfg(test)]
mod tests {
  use super::{grade_rank, sort_grades};

  #[test]
  fn kindergarten_spellings_rank_lowest() {
    for label in ["K", "k", "Kinder", "KINDERGARTEN", " kindergarten "] {
      assert_eq!(grade_rank(label), 0, "label {label:?}");
    }
    assert!(grade_rank("K") < grade_rank("1"));
  }

  #[test]
  fn numeric_grades_ascend_and_junk_sorts_last() {
    let mut grades: Vec<String> = ["10", "2", "Transition", "K", "1"]
      .into_iter()
      .map(String::from)
      .collect();
    sort_grades(&mut grades);
    assert_eq!(grades, ["K", "1", "2", "10", "Transition"]);
  }
}
