//! Competency-sheet parsing: row-group inheritance, the text fallback chain,
//! and extra-field capture.
//!
//! Source sheets use merged cells for grade/quarter/domain headings, which
//! arrive here as a value on the first row of a group and blanks underneath.
//! [`StickyState`] carries those values forward so every stored row is
//! self-contained.

use tala_core::entity::{ExtraFields, NewCompetency};

use crate::{
  error::Result,
  header::{ColumnRole, HeaderMap},
};

// ─── Row access ──────────────────────────────────────────────────────────────

/// One data row seen through the resolved header map.
struct RowView<'a> {
  row: &'a [String],
  map: &'a HeaderMap,
}

impl RowView<'_> {
  /// The cell for `role`, or `""` when the role is absent or the row is
  /// short.
  fn get(&self, role: ColumnRole) -> &str {
    self
      .map
      .get(role)
      .and_then(|i| self.row.get(i))
      .map(String::as_str)
      .unwrap_or("")
  }
}

// ─── Sticky fields ───────────────────────────────────────────────────────────

/// Last-seen values for the fields that merged cells leave blank on all but
/// the first row of a group.
#[derive(Debug, Clone, Default)]
pub struct StickyState {
  grade:                String,
  quarter:              String,
  key_stage:            String,
  domain:               String,
  topic:                String,
  content_standard:     String,
  performance_standard: String,
}

impl StickyState {
  /// Take every non-blank sticky value the row supplies. Runs for every data
  /// row, including rows that later resolve to no competency text.
  fn absorb(&mut self, view: &RowView) {
    for (role, slot) in [
      (ColumnRole::Grade, &mut self.grade),
      (ColumnRole::Quarter, &mut self.quarter),
      (ColumnRole::KeyStage, &mut self.key_stage),
      (ColumnRole::Domain, &mut self.domain),
      (ColumnRole::Topic, &mut self.topic),
      (ColumnRole::ContentStandard, &mut self.content_standard),
      (ColumnRole::PerformanceStandard, &mut self.performance_standard),
    ] {
      let own = view.get(role);
      if !own.is_empty() {
        *slot = own.to_string();
      }
    }
  }

  /// The row's own value if non-blank, else the carried one.
  fn effective<'a>(&'a self, view: &'a RowView, role: ColumnRole) -> &'a str {
    let own = view.get(role);
    if !own.is_empty() {
      return own;
    }
    match role {
      ColumnRole::Grade => &self.grade,
      ColumnRole::Quarter => &self.quarter,
      ColumnRole::KeyStage => &self.key_stage,
      ColumnRole::Domain => &self.domain,
      ColumnRole::Topic => &self.topic,
      ColumnRole::ContentStandard => &self.content_standard,
      ColumnRole::PerformanceStandard => &self.performance_standard,
      _ => "",
    }
  }
}

// ─── Text resolution ─────────────────────────────────────────────────────────

/// The competency-text fallback chain, first success wins: primary column,
/// then sub-competency parts joined `" | "`, then the effective content
/// standard. `None` means the row contributes no competency at all.
fn resolve_text(view: &RowView, state: &StickyState) -> Option<String> {
  let primary = view.get(ColumnRole::Text);
  if !primary.is_empty() {
    return Some(primary.to_string());
  }

  let parts: Vec<&str> =
    [ColumnRole::SubA, ColumnRole::SubB, ColumnRole::SubC]
      .into_iter()
      .map(|r| view.get(r))
      .filter(|v| !v.is_empty())
      .collect();
  if !parts.is_empty() {
    return Some(parts.join(" | "));
  }

  let cs = state.effective(view, ColumnRole::ContentStandard);
  if !cs.is_empty() {
    return Some(cs.to_string());
  }

  None
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse a competency sheet (headers in row 0, data below) into competency
/// records.
///
/// Rows that resolve to no text are dropped, but their sticky values still
/// feed inheritance for the rows after them. Sheets with fewer than two rows
/// contribute nothing.
pub fn parse_competency_rows(
  rows: &[Vec<String>],
  strict: bool,
) -> Result<Vec<NewCompetency>> {
  if rows.len() < 2 {
    return Ok(Vec::new());
  }

  let headers = &rows[0];
  let map = HeaderMap::resolve(headers, strict)?;
  let mut state = StickyState::default();
  let mut out = Vec::new();

  for row in &rows[1..] {
    if row.is_empty() {
      continue;
    }
    let view = RowView { row, map: &map };

    state.absorb(&view);

    let Some(text) = resolve_text(&view, &state) else {
      continue;
    };

    let mut extra = ExtraFields::new();
    for (i, val) in row.iter().enumerate() {
      if !map.is_claimed(i) && !val.is_empty() && i < headers.len() {
        extra.push(headers[i].clone(), val.clone());
      }
    }

    out.push(NewCompetency {
      code: view.get(ColumnRole::Code).to_string(),
      grade: state.effective(&view, ColumnRole::Grade).to_string(),
      quarter: state.effective(&view, ColumnRole::Quarter).to_string(),
      key_stage: state.effective(&view, ColumnRole::KeyStage).to_string(),
      domain: state.effective(&view, ColumnRole::Domain).to_string(),
      subdomain: view.get(ColumnRole::Subdomain).to_string(),
      topic: state.effective(&view, ColumnRole::Topic).to_string(),
      text,
      content_standard: state
        .effective(&view, ColumnRole::ContentStandard)
        .to_string(),
      performance_standard: state
        .effective(&view, ColumnRole::PerformanceStandard)
        .to_string(),
      blooms_level: view.get(ColumnRole::Blooms).to_string(),
      competency_type: view.get(ColumnRole::Type).to_string(),
      tags: view.get(ColumnRole::Tags).to_string(),
      extra,
    });
  }

  Ok(out)
}
