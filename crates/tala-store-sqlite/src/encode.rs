//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings; extra fields are a JSON object (NULL
//! when empty). Reads collect `Raw*` row structs inside the connection
//! closure and convert outside it, so the closures only touch rusqlite.

use chrono::{DateTime, Utc};
use tala_core::entity::{
  Competency, CrosscuttingConcept, DomainSequenceEntry, ExtraFields,
  PedagogicalApproach, Skill, Standard, Subject, SubjectBundle,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Extra fields ────────────────────────────────────────────────────────────

/// `None` when empty, matching the NULL the schema stores for rows without
/// side-channel data.
pub fn encode_extra(extra: &ExtraFields) -> Result<Option<String>> {
  if extra.is_empty() {
    return Ok(None);
  }
  Ok(Some(serde_json::to_string(extra)?))
}

pub fn decode_extra(s: Option<&str>) -> Result<ExtraFields> {
  match s {
    None => Ok(ExtraFields::new()),
    Some(json) => Ok(serde_json::from_str(json)?),
  }
}

// ─── Insert-ready bundles ────────────────────────────────────────────────────

/// A bundle with every extra-fields value pre-encoded to JSON, so the write
/// transaction closure performs no serialization of its own.
pub struct PreparedBundle {
  pub bundle:            SubjectBundle,
  pub competency_extras: Vec<Option<String>>,
  pub standard_extras:   Vec<Option<String>>,
  pub approach_extras:   Vec<Option<String>>,
  pub skill_extras:      Vec<Option<String>>,
  pub concept_extras:    Vec<Option<String>>,
  pub domain_extras:     Vec<Option<String>>,
}

impl PreparedBundle {
  pub fn encode(bundle: SubjectBundle) -> Result<Self> {
    let competency_extras = bundle
      .competencies
      .iter()
      .map(|c| encode_extra(&c.extra))
      .collect::<Result<_>>()?;
    let standard_extras = bundle
      .standards
      .iter()
      .map(|s| encode_extra(&s.extra))
      .collect::<Result<_>>()?;
    let approach_extras = bundle
      .approaches
      .iter()
      .map(|a| encode_extra(&a.extra))
      .collect::<Result<_>>()?;
    let skill_extras = bundle
      .skills
      .iter()
      .map(|s| encode_extra(&s.extra))
      .collect::<Result<_>>()?;
    let concept_extras = bundle
      .concepts
      .iter()
      .map(|c| encode_extra(&c.extra))
      .collect::<Result<_>>()?;
    let domain_extras = bundle
      .domain_sequence
      .iter()
      .map(|d| encode_extra(&d.extra))
      .collect::<Result<_>>()?;

    Ok(Self {
      bundle,
      competency_extras,
      standard_extras,
      approach_extras,
      skill_extras,
      concept_extras,
      domain_extras,
    })
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `subjects` row.
pub struct RawSubject {
  pub id:           String,
  pub display_name: String,
  pub source_file:  String,
  pub loaded_at:    String,
}

impl RawSubject {
  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      id:           self.id,
      display_name: self.display_name,
      source_file:  self.source_file,
      loaded_at:    decode_dt(&self.loaded_at)?,
    })
  }
}

/// Raw strings read directly from a `learning_competencies` row.
pub struct RawCompetency {
  pub id:                   i64,
  pub subject_id:           String,
  pub code:                 String,
  pub grade:                String,
  pub quarter:              String,
  pub key_stage:            String,
  pub domain:               String,
  pub subdomain:            String,
  pub topic:                String,
  pub text:                 String,
  pub content_standard:     String,
  pub performance_standard: String,
  pub blooms_level:         String,
  pub competency_type:      String,
  pub tags:                 String,
  pub extra_json:           Option<String>,
}

impl RawCompetency {
  pub fn into_competency(self) -> Result<Competency> {
    Ok(Competency {
      id:                   self.id,
      subject_id:           self.subject_id,
      code:                 self.code,
      grade:                self.grade,
      quarter:              self.quarter,
      key_stage:            self.key_stage,
      domain:               self.domain,
      subdomain:            self.subdomain,
      topic:                self.topic,
      text:                 self.text,
      content_standard:     self.content_standard,
      performance_standard: self.performance_standard,
      blooms_level:         self.blooms_level,
      competency_type:      self.competency_type,
      tags:                 self.tags,
      extra:                decode_extra(self.extra_json.as_deref())?,
    })
  }
}

pub struct RawStandard {
  pub id:            i64,
  pub subject_id:    String,
  pub standard_type: String,
  pub description:   String,
  pub extra_json:    Option<String>,
}

impl RawStandard {
  pub fn into_standard(self) -> Result<Standard> {
    Ok(Standard {
      id:            self.id,
      subject_id:    self.subject_id,
      standard_type: self.standard_type,
      description:   self.description,
      extra:         decode_extra(self.extra_json.as_deref())?,
    })
  }
}

pub struct RawApproach {
  pub id:          i64,
  pub subject_id:  String,
  pub name:        String,
  pub description: String,
  pub strategies:  String,
  pub extra_json:  Option<String>,
}

impl RawApproach {
  pub fn into_approach(self) -> Result<PedagogicalApproach> {
    Ok(PedagogicalApproach {
      id:          self.id,
      subject_id:  self.subject_id,
      name:        self.name,
      description: self.description,
      strategies:  self.strategies,
      extra:       decode_extra(self.extra_json.as_deref())?,
    })
  }
}

pub struct RawSkill {
  pub id:          i64,
  pub subject_id:  String,
  pub name:        String,
  pub category:    String,
  pub description: String,
  pub extra_json:  Option<String>,
}

impl RawSkill {
  pub fn into_skill(self) -> Result<Skill> {
    Ok(Skill {
      id:          self.id,
      subject_id:  self.subject_id,
      name:        self.name,
      category:    self.category,
      description: self.description,
      extra:       decode_extra(self.extra_json.as_deref())?,
    })
  }
}

pub struct RawConcept {
  pub id:          i64,
  pub subject_id:  String,
  pub name:        String,
  pub description: String,
  pub extra_json:  Option<String>,
}

impl RawConcept {
  pub fn into_concept(self) -> Result<CrosscuttingConcept> {
    Ok(CrosscuttingConcept {
      id:          self.id,
      subject_id:  self.subject_id,
      name:        self.name,
      description: self.description,
      extra:       decode_extra(self.extra_json.as_deref())?,
    })
  }
}

pub struct RawDomainEntry {
  pub id:         i64,
  pub subject_id: String,
  pub domain:     String,
  pub sequence:   String,
  pub extra_json: Option<String>,
}

impl RawDomainEntry {
  pub fn into_entry(self) -> Result<DomainSequenceEntry> {
    Ok(DomainSequenceEntry {
      id:         self.id,
      subject_id: self.subject_id,
      domain:     self.domain,
      sequence:   self.sequence,
      extra:      decode_extra(self.extra_json.as_deref())?,
    })
  }
}
