//! The `CurriculumStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `tala-store-sqlite`).
//! Consumers (the CLI, the excluded web/AI/export layers) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  entity::{
    Competency, CrosscuttingConcept, DomainSequenceEntry, PedagogicalApproach,
    Standard, Subject, SubjectBundle,
  },
  recovery::RecoveredSkill,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Optional narrowing for [`CurriculumStore::competencies`].
#[derive(Debug, Clone, Default)]
pub struct CompetencyFilter {
  pub grade:   Option<String>,
  pub quarter: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the curriculum store backend.
///
/// A rebuild replaces the entire store; there is no partial or incremental
/// update. All read methods return plain serializable records.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait CurriculumStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Load ──────────────────────────────────────────────────────────────

  /// Drop and recreate every table, then repopulate from `bundles`.
  /// Returns the total number of learning competencies stored.
  ///
  /// The whole rebuild must be atomic from a reader's point of view: a
  /// concurrent query sees either the previous contents or the new ones,
  /// never a partially populated store. On error the previous contents are
  /// kept and the caller retries the full operation.
  fn rebuild(
    &self,
    bundles: Vec<SubjectBundle>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Subjects ──────────────────────────────────────────────────────────

  /// All subjects, sorted by display name.
  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  // ── Competencies ──────────────────────────────────────────────────────

  /// Distinct non-blank grades for a subject, kindergarten first, numeric
  /// grades ascending, non-numeric labels last.
  fn grades<'a>(
    &'a self,
    subject_id: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Distinct non-blank quarters for a subject and grade, ascending.
  fn quarters<'a>(
    &'a self,
    subject_id: &'a str,
    grade: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Competencies for a subject, optionally narrowed by grade and quarter,
  /// ordered by external code.
  fn competencies<'a>(
    &'a self,
    subject_id: &'a str,
    filter: &'a CompetencyFilter,
  ) -> impl Future<Output = Result<Vec<Competency>, Self::Error>> + Send + 'a;

  /// Single competency lookup by row id. Ids are not stable across rebuilds.
  fn competency(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Competency>, Self::Error>> + Send + '_;

  // ── Per-subject listings ──────────────────────────────────────────────

  fn standards<'a>(
    &'a self,
    subject_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Standard>, Self::Error>> + Send + 'a;

  fn approaches<'a>(
    &'a self,
    subject_id: &'a str,
  ) -> impl Future<Output = Result<Vec<PedagogicalApproach>, Self::Error>> + Send + 'a;

  /// Skills for a subject with display names resolved through
  /// [`crate::recovery::recover_skills`]; the stored raw rows are never
  /// returned directly.
  fn skills<'a>(
    &'a self,
    subject_id: &'a str,
  ) -> impl Future<Output = Result<Vec<RecoveredSkill>, Self::Error>> + Send + 'a;

  fn concepts<'a>(
    &'a self,
    subject_id: &'a str,
  ) -> impl Future<Output = Result<Vec<CrosscuttingConcept>, Self::Error>> + Send + 'a;

  fn domain_sequence<'a>(
    &'a self,
    subject_id: &'a str,
  ) -> impl Future<Output = Result<Vec<DomainSequenceEntry>, Self::Error>> + Send + 'a;
}
