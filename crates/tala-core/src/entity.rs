//! Entity types — the rows of the unified curriculum model.
//!
//! Parsing produces `New*` values grouped into a [`SubjectBundle`]; the store
//! assigns row ids and the load timestamp when it persists a bundle. Row ids
//! are plain SQLite rowids and are not stable across rebuilds.

use chrono::{DateTime, Utc};
use serde::{
  Deserialize, Deserializer, Serialize, Serializer,
  de::{MapAccess, Visitor},
  ser::SerializeMap,
};

// ─── Extra fields ────────────────────────────────────────────────────────────

/// Ordered `(header, value)` pairs captured from columns the fixed schema has
/// no slot for ("Prerequisites", "Notes", per-subject oddities).
///
/// Serializes as a JSON object in insertion order. Consumers only ever
/// iterate and display these pairs; nothing branches on a specific key except
/// the skill-name recovery in [`crate::recovery`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraFields(Vec<(String, String)>);

impl ExtraFields {
  pub fn new() -> Self { Self(Vec::new()) }

  pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
    self.0.push((header.into(), value.into()));
  }

  /// First value recorded under `header`, if any.
  pub fn get(&self, header: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|(h, _)| h == header)
      .map(|(_, v)| v.as_str())
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(h, v)| (h.as_str(), v.as_str()))
  }
}

impl FromIterator<(String, String)> for ExtraFields {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl Serialize for ExtraFields {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (h, v) in &self.0 {
      map.serialize_entry(h, v)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for ExtraFields {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
      type Value = ExtraFields;

      fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a map of header text to cell value")
      }

      fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
      ) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((h, v)) = access.next_entry::<String, String>()? {
          pairs.push((h, v));
        }
        Ok(ExtraFields(pairs))
      }
    }

    deserializer.deserialize_map(PairsVisitor)
  }
}

// ─── Subjects ────────────────────────────────────────────────────────────────

/// Input to a rebuild: one curriculum subject about to be stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
  /// Stable key, supplied by the source catalog (e.g. `"Mathematics"`).
  pub id:           String,
  pub display_name: String,
  /// Filename of the workbook this subject was read from.
  pub source_file:  String,
}

/// A stored subject. `loaded_at` is stamped by the store, once per rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
  pub id:           String,
  pub display_name: String,
  pub source_file:  String,
  pub loaded_at:    DateTime<Utc>,
}

// ─── Learning competencies ───────────────────────────────────────────────────

/// One learning competency parsed from a workbook row, before storage.
///
/// All fields except `text` and `extra` may be blank; sticky fields (grade,
/// quarter, key stage, domain, topic, both standards) already carry their
/// inherited values when the parser emits this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCompetency {
  /// External code from the source (`lc_id` / `lc_code` column).
  pub code:                 String,
  pub grade:                String,
  pub quarter:              String,
  pub key_stage:            String,
  pub domain:               String,
  pub subdomain:            String,
  pub topic:                String,
  /// Never blank — rows with no resolvable text are dropped at parse time.
  pub text:                 String,
  pub content_standard:     String,
  pub performance_standard: String,
  pub blooms_level:         String,
  pub competency_type:      String,
  pub tags:                 String,
  pub extra:                ExtraFields,
}

/// A stored learning competency — the central fact entity of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competency {
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
  pub extra:                ExtraFields,
}

// ─── Standards ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStandard {
  pub standard_type: String,
  /// All non-blank cells of the source row, joined with `" | "`.
  pub description:   String,
  pub extra:         ExtraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standard {
  pub id:            i64,
  pub subject_id:    String,
  pub standard_type: String,
  pub description:   String,
  pub extra:         ExtraFields,
}

// ─── Pedagogical approaches ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewApproach {
  pub name:        String,
  pub description: String,
  pub strategies:  String,
  pub extra:       ExtraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedagogicalApproach {
  pub id:          i64,
  pub subject_id:  String,
  pub name:        String,
  pub description: String,
  pub strategies:  String,
  pub extra:       ExtraFields,
}

// ─── 21st-century skills ─────────────────────────────────────────────────────

/// A skill row exactly as it appeared in the source. `name` may be a
/// meaningless code (`CS01`) or a repeated category; the display name is only
/// resolved at query time by [`crate::recovery`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSkill {
  pub name:        String,
  pub category:    String,
  pub description: String,
  pub extra:       ExtraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
  pub id:          i64,
  pub subject_id:  String,
  pub name:        String,
  pub category:    String,
  pub description: String,
  pub extra:       ExtraFields,
}

// ─── Crosscutting concepts ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewConcept {
  pub name:        String,
  pub description: String,
  pub extra:       ExtraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrosscuttingConcept {
  pub id:          i64,
  pub subject_id:  String,
  pub name:        String,
  pub description: String,
  pub extra:       ExtraFields,
}

// ─── Domain sequence ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDomainEntry {
  pub domain:   String,
  /// All non-blank cells of the source row, joined with `" | "`.
  pub sequence: String,
  pub extra:    ExtraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSequenceEntry {
  pub id:         i64,
  pub subject_id: String,
  pub domain:     String,
  pub sequence:   String,
  pub extra:      ExtraFields,
}

// ─── Bundle ──────────────────────────────────────────────────────────────────

/// Everything one workbook (or one code group of the multi-subject workbook)
/// contributes to a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectBundle {
  pub subject:         NewSubject,
  pub competencies:    Vec<NewCompetency>,
  pub standards:       Vec<NewStandard>,
  pub approaches:      Vec<NewApproach>,
  pub skills:          Vec<NewSkill>,
  pub concepts:        Vec<NewConcept>,
  pub domain_sequence: Vec<NewDomainEntry>,
}

impl SubjectBundle {
  /// An empty bundle for `subject`; section parsers fill the vectors in.
  pub fn new(subject: NewSubject) -> Self {
    Self {
      subject,
      competencies: Vec::new(),
      standards: Vec::new(),
      approaches: Vec::new(),
      skills: Vec::new(),
      concepts: Vec::new(),
      domain_sequence: Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::ExtraFields;

  #[test]
  fn extra_fields_preserve_insertion_order() {
    let mut extra = ExtraFields::new();
    extra.push("Zebra", "1");
    extra.push("Apple", "2");
    extra.push("Mango", "3");

    let headers: Vec<&str> = extra.iter().map(|(h, _)| h).collect();
    assert_eq!(headers, ["Zebra", "Apple", "Mango"]);
  }

  #[test]
  fn extra_fields_get_returns_first_match() {
    let mut extra = ExtraFields::new();
    extra.push("Notes", "first");
    extra.push("Notes", "second");
    assert_eq!(extra.get("Notes"), Some("first"));
    assert_eq!(extra.get("Absent"), None);
  }
}
