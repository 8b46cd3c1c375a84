//! Load orchestration: walk the source catalog and parse every workbook that
//! exists.

use crate::{
  IngestOptions,
  catalog::SourceCatalog,
  error::Result,
  workbook::{parse_senior_workbook, parse_workbook},
};
use tala_core::entity::SubjectBundle;

/// Parse every workbook in `catalog` into subject bundles, in catalog order.
///
/// A missing workbook file skips that subject and the load continues; any
/// other failure (unreadable file, malformed archive) aborts the whole load.
pub fn load_catalog(
  catalog: &SourceCatalog,
  opts: &IngestOptions,
) -> Result<Vec<SubjectBundle>> {
  let mut bundles = Vec::new();

  for source in &catalog.subjects {
    let path = catalog.data_dir.join(&source.filename);
    if !path.exists() {
      tracing::warn!(
        subject = %source.id,
        file = %path.display(),
        "source workbook not found; skipping subject"
      );
      continue;
    }

    tracing::info!(subject = %source.id, file = %source.filename, "loading workbook");
    bundles.push(parse_workbook(&path, source, opts)?);
  }

  if let Some(senior) = &catalog.senior {
    let path = catalog.data_dir.join(&senior.filename);
    if path.exists() {
      tracing::info!(file = %senior.filename, "loading multi-subject workbook");
      bundles.extend(parse_senior_workbook(&path, senior, opts)?);
    } else {
      tracing::warn!(
        file = %path.display(),
        "multi-subject workbook not found; skipping"
      );
    }
  }

  Ok(bundles)
}
