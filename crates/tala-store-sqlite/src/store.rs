//! [`SqliteStore`] — the SQLite implementation of [`CurriculumStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use tala_core::{
  entity::{
    Competency, CrosscuttingConcept, DomainSequenceEntry, PedagogicalApproach,
    Skill, Standard, Subject, SubjectBundle,
  },
  grade::sort_grades,
  recovery::{RecoveredSkill, recover_skills},
  store::{CompetencyFilter, CurriculumStore},
};

use crate::{
  Result,
  encode::{
    PreparedBundle, RawApproach, RawCompetency, RawConcept, RawDomainEntry,
    RawSkill, RawStandard, RawSubject, encode_dt,
  },
  schema::{DROP_ALL, PRAGMAS, TABLES},
};

const COMPETENCY_COLUMNS: &str = "id, subject_id, code, grade, quarter, \
   key_stage, domain, subdomain, topic, competency_text, content_standard, \
   performance_standard, blooms_level, competency_type, tags, extra_json";

fn competency_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawCompetency> {
  Ok(RawCompetency {
    id:                   row.get(0)?,
    subject_id:           row.get(1)?,
    code:                 row.get(2)?,
    grade:                row.get(3)?,
    quarter:              row.get(4)?,
    key_stage:            row.get(5)?,
    domain:               row.get(6)?,
    subdomain:            row.get(7)?,
    topic:                row.get(8)?,
    text:                 row.get(9)?,
    content_standard:     row.get(10)?,
    performance_standard: row.get(11)?,
    blooms_level:         row.get(12)?,
    competency_type:      row.get(13)?,
    tags:                 row.get(14)?,
    extra_json:           row.get(15)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A curriculum store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every
/// operation, rebuilds included, is serialized through that one connection,
/// and [`CurriculumStore::rebuild`] does all of its work inside a single
/// transaction: a concurrent reader sees either the previous contents or the
/// finished new ones, never a half-populated store, and two rebuilds cannot
/// interleave. On failure the transaction rolls back and the previous
/// contents stay in place; the caller retries the whole load.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        conn.execute_batch(TABLES)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CurriculumStore impl ────────────────────────────────────────────────────

impl CurriculumStore for SqliteStore {
  type Error = crate::Error;

  // ── Load ──────────────────────────────────────────────────────────────────

  async fn rebuild(&self, bundles: Vec<SubjectBundle>) -> Result<usize> {
    let prepared: Vec<PreparedBundle> = bundles
      .into_iter()
      .map(PreparedBundle::encode)
      .collect::<Result<_>>()?;
    let loaded_at = encode_dt(Utc::now());

    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(DROP_ALL)?;
        tx.execute_batch(TABLES)?;

        let mut count = 0usize;
        for p in &prepared {
          let s = &p.bundle.subject;
          tx.execute(
            "INSERT OR REPLACE INTO subjects (id, display_name, source_file, loaded_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![s.id, s.display_name, s.source_file, loaded_at],
          )?;

          for (c, extra) in
            p.bundle.competencies.iter().zip(&p.competency_extras)
          {
            tx.execute(
              "INSERT INTO learning_competencies (
                 subject_id, code, grade, quarter, key_stage, domain,
                 subdomain, topic, competency_text, content_standard,
                 performance_standard, blooms_level, competency_type, tags,
                 extra_json
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
              rusqlite::params![
                s.id,
                c.code,
                c.grade,
                c.quarter,
                c.key_stage,
                c.domain,
                c.subdomain,
                c.topic,
                c.text,
                c.content_standard,
                c.performance_standard,
                c.blooms_level,
                c.competency_type,
                c.tags,
                extra,
              ],
            )?;
            count += 1;
          }

          for (st, extra) in p.bundle.standards.iter().zip(&p.standard_extras)
          {
            tx.execute(
              "INSERT INTO standards (subject_id, standard_type, description, extra_json)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![s.id, st.standard_type, st.description, extra],
            )?;
          }

          for (a, extra) in p.bundle.approaches.iter().zip(&p.approach_extras)
          {
            tx.execute(
              "INSERT INTO pedagogical_approaches
                 (subject_id, name, description, strategies, extra_json)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![s.id, a.name, a.description, a.strategies, extra],
            )?;
          }

          for (sk, extra) in p.bundle.skills.iter().zip(&p.skill_extras) {
            tx.execute(
              "INSERT INTO twenty_first_century_skills
                 (subject_id, name, category, description, extra_json)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![s.id, sk.name, sk.category, sk.description, extra],
            )?;
          }

          for (c, extra) in p.bundle.concepts.iter().zip(&p.concept_extras) {
            tx.execute(
              "INSERT INTO crosscutting_concepts
                 (subject_id, name, description, extra_json)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![s.id, c.name, c.description, extra],
            )?;
          }

          for (d, extra) in
            p.bundle.domain_sequence.iter().zip(&p.domain_extras)
          {
            tx.execute(
              "INSERT INTO domain_sequence (subject_id, domain, sequence, extra_json)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![s.id, d.domain, d.sequence, extra],
            )?;
          }
        }

        tx.commit()?;
        Ok(count)
      })
      .await?;

    Ok(count)
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn list_subjects(&self) -> Result<Vec<Subject>> {
    let raws: Vec<RawSubject> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, display_name, source_file, loaded_at
           FROM subjects ORDER BY display_name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSubject {
              id:           row.get(0)?,
              display_name: row.get(1)?,
              source_file:  row.get(2)?,
              loaded_at:    row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubject::into_subject).collect()
  }

  // ── Competencies ──────────────────────────────────────────────────────────

  async fn grades(&self, subject_id: &str) -> Result<Vec<String>> {
    let subject = subject_id.to_owned();

    let mut grades: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT grade FROM learning_competencies
           WHERE subject_id = ?1 AND grade != '' ORDER BY grade",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // SQL gives alphabetical order; the stable rank sort puts kindergarten
    // first and numeric grades in numeric order on top of that.
    sort_grades(&mut grades);
    Ok(grades)
  }

  async fn quarters(&self, subject_id: &str, grade: &str) -> Result<Vec<String>> {
    let subject = subject_id.to_owned();
    let grade = grade.to_owned();

    let quarters: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT quarter FROM learning_competencies
           WHERE subject_id = ?1 AND grade = ?2 AND quarter != ''
           ORDER BY quarter",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject, grade], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(quarters)
  }

  async fn competencies(
    &self,
    subject_id: &str,
    filter: &CompetencyFilter,
  ) -> Result<Vec<Competency>> {
    // Conditions and parameters grow together, so positional `?` binding
    // stays aligned no matter which filters are present.
    let mut sql = format!(
      "SELECT {COMPETENCY_COLUMNS} FROM learning_competencies WHERE subject_id = ?"
    );
    let mut params: Vec<String> = vec![subject_id.to_owned()];

    if let Some(grade) = &filter.grade {
      sql.push_str(" AND grade = ?");
      params.push(grade.clone());
    }
    if let Some(quarter) = &filter.quarter {
      sql.push_str(" AND quarter = ?");
      params.push(quarter.clone());
    }
    sql.push_str(" ORDER BY code");

    let raws: Vec<RawCompetency> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            competency_from_row(row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCompetency::into_competency).collect()
  }

  async fn competency(&self, id: i64) -> Result<Option<Competency>> {
    let raw: Option<RawCompetency> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COMPETENCY_COLUMNS} FROM learning_competencies WHERE id = ?1"
              ),
              rusqlite::params![id],
              competency_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCompetency::into_competency).transpose()
  }

  // ── Per-subject listings ──────────────────────────────────────────────────

  async fn standards(&self, subject_id: &str) -> Result<Vec<Standard>> {
    let subject = subject_id.to_owned();

    let raws: Vec<RawStandard> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, subject_id, standard_type, description, extra_json
           FROM standards WHERE subject_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject], |row| {
            Ok(RawStandard {
              id:            row.get(0)?,
              subject_id:    row.get(1)?,
              standard_type: row.get(2)?,
              description:   row.get(3)?,
              extra_json:    row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStandard::into_standard).collect()
  }

  async fn approaches(&self, subject_id: &str) -> Result<Vec<PedagogicalApproach>> {
    let subject = subject_id.to_owned();

    let raws: Vec<RawApproach> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, subject_id, name, description, strategies, extra_json
           FROM pedagogical_approaches WHERE subject_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject], |row| {
            Ok(RawApproach {
              id:          row.get(0)?,
              subject_id:  row.get(1)?,
              name:        row.get(2)?,
              description: row.get(3)?,
              strategies:  row.get(4)?,
              extra_json:  row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawApproach::into_approach).collect()
  }

  async fn skills(&self, subject_id: &str) -> Result<Vec<RecoveredSkill>> {
    let subject = subject_id.to_owned();

    let raws: Vec<RawSkill> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, subject_id, name, category, description, extra_json
           FROM twenty_first_century_skills WHERE subject_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject], |row| {
            Ok(RawSkill {
              id:          row.get(0)?,
              subject_id:  row.get(1)?,
              name:        row.get(2)?,
              category:    row.get(3)?,
              description: row.get(4)?,
              extra_json:  row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let rows: Vec<Skill> = raws
      .into_iter()
      .map(RawSkill::into_skill)
      .collect::<Result<_>>()?;

    Ok(recover_skills(subject_id, &rows))
  }

  async fn concepts(&self, subject_id: &str) -> Result<Vec<CrosscuttingConcept>> {
    let subject = subject_id.to_owned();

    let raws: Vec<RawConcept> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, subject_id, name, description, extra_json
           FROM crosscutting_concepts WHERE subject_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject], |row| {
            Ok(RawConcept {
              id:          row.get(0)?,
              subject_id:  row.get(1)?,
              name:        row.get(2)?,
              description: row.get(3)?,
              extra_json:  row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConcept::into_concept).collect()
  }

  async fn domain_sequence(
    &self,
    subject_id: &str,
  ) -> Result<Vec<DomainSequenceEntry>> {
    let subject = subject_id.to_owned();

    let raws: Vec<RawDomainEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, subject_id, domain, sequence, extra_json
           FROM domain_sequence WHERE subject_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject], |row| {
            Ok(RawDomainEntry {
              id:         row.get(0)?,
              subject_id: row.get(1)?,
              domain:     row.get(2)?,
              sequence:   row.get(3)?,
              extra_json: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDomainEntry::into_entry).collect()
  }
}
