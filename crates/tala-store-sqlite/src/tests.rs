//! Integration tests for `SqliteStore` against an in-memory database.

use tala_core::{
  entity::{
    ExtraFields, NewApproach, NewCompetency, NewConcept, NewDomainEntry,
    NewSkill, NewStandard, NewSubject, SubjectBundle,
  },
  store::{CompetencyFilter, CurriculumStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn subject(id: &str, display_name: &str) -> NewSubject {
  NewSubject {
    id:           id.into(),
    display_name: display_name.into(),
    source_file:  format!("{id}.xlsx"),
  }
}

fn bundle(id: &str, display_name: &str) -> SubjectBundle {
  SubjectBundle::new(subject(id, display_name))
}

fn comp(code: &str, grade: &str, quarter: &str, text: &str) -> NewCompetency {
  NewCompetency {
    code: code.into(),
    grade: grade.into(),
    quarter: quarter.into(),
    text: text.into(),
    ..Default::default()
  }
}

fn extra(pairs: &[(&str, &str)]) -> ExtraFields {
  pairs
    .iter()
    .map(|&(h, v)| (h.to_string(), v.to_string()))
    .collect()
}

// ─── Rebuild ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rebuild_returns_total_competency_count() {
  let s = store().await;

  let mut math = bundle("Mathematics", "Mathematics");
  math.competencies.push(comp("M1", "1", "1", "counts to 100"));
  math.competencies.push(comp("M2", "1", "2", "adds within 20"));

  let mut sci = bundle("Science", "Science");
  sci.competencies.push(comp("S1", "3", "1", "observes weather"));

  let count = s.rebuild(vec![math, sci]).await.unwrap();
  assert_eq!(count, 3);
}

#[tokio::test]
async fn list_subjects_sorted_by_display_name() {
  let s = store().await;
  s.rebuild(vec![
    bundle("Science", "Science"),
    bundle("Araling_Panlipunan", "Araling Panlipunan (Social Studies)"),
    bundle("Mathematics", "Mathematics"),
  ])
  .await
  .unwrap();

  let subjects = s.list_subjects().await.unwrap();
  let names: Vec<&str> =
    subjects.iter().map(|s| s.display_name.as_str()).collect();
  assert_eq!(
    names,
    ["Araling Panlipunan (Social Studies)", "Mathematics", "Science"]
  );
}

#[tokio::test]
async fn rebuild_replaces_previous_contents() {
  let s = store().await;

  let mut old = bundle("Old", "Old Subject");
  old.competencies.push(comp("O1", "1", "1", "obsolete"));
  s.rebuild(vec![old]).await.unwrap();

  let mut new = bundle("New", "New Subject");
  new.competencies.push(comp("N1", "2", "1", "current"));
  let count = s.rebuild(vec![new]).await.unwrap();

  assert_eq!(count, 1);
  let subjects = s.list_subjects().await.unwrap();
  assert_eq!(subjects.len(), 1);
  assert_eq!(subjects[0].id, "New");
  assert!(
    s.competencies("Old", &CompetencyFilter::default())
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn rebuild_is_idempotent() {
  let make = || {
    let mut b = bundle("English", "English");
    b.competencies.push(comp("E1", "1", "1", "names letters"));
    b.competencies.push(comp("E2", "2", "1", "reads words"));
    b.competencies.push(comp("E3", "2", "2", "writes sentences"));
    vec![b]
  };

  let s = store().await;
  let first = s.rebuild(make()).await.unwrap();

  let tuples = |comps: Vec<tala_core::entity::Competency>| {
    comps
      .into_iter()
      .map(|c| (c.subject_id, c.code, c.grade, c.quarter, c.text))
      .collect::<Vec<_>>()
  };
  let before = tuples(
    s.competencies("English", &CompetencyFilter::default())
      .await
      .unwrap(),
  );

  let second = s.rebuild(make()).await.unwrap();
  let after = tuples(
    s.competencies("English", &CompetencyFilter::default())
      .await
      .unwrap(),
  );

  assert_eq!(first, second);
  assert_eq!(before, after);
}

// ─── Grades & quarters ───────────────────────────────────────────────────────

#[tokio::test]
async fn grades_rank_kindergarten_first_and_junk_last() {
  let s = store().await;

  let mut b = bundle("Filipino", "Filipino");
  for (code, grade) in
    [("F1", "10"), ("F2", "2"), ("F3", "K"), ("F4", "1"), ("F5", "Remedial")]
  {
    b.competencies.push(comp(code, grade, "1", "competency"));
  }
  s.rebuild(vec![b]).await.unwrap();

  let grades = s.grades("Filipino").await.unwrap();
  assert_eq!(grades, ["K", "1", "2", "10", "Remedial"]);
}

#[tokio::test]
async fn blank_grades_are_excluded_from_listings() {
  let s = store().await;

  let mut b = bundle("Music_Arts", "Music and Arts");
  b.competencies.push(comp("MA1", "", "1", "sings"));
  b.competencies.push(comp("MA2", "4", "1", "plays rhythm"));
  s.rebuild(vec![b]).await.unwrap();

  assert_eq!(s.grades("Music_Arts").await.unwrap(), ["4"]);
}

#[tokio::test]
async fn quarters_are_distinct_per_subject_and_grade() {
  let s = store().await;

  let mut b = bundle("Science", "Science");
  b.competencies.push(comp("S1", "3", "1", "a"));
  b.competencies.push(comp("S2", "3", "1", "b"));
  b.competencies.push(comp("S3", "3", "2", "c"));
  b.competencies.push(comp("S4", "4", "3", "d"));
  s.rebuild(vec![b]).await.unwrap();

  assert_eq!(s.quarters("Science", "3").await.unwrap(), ["1", "2"]);
  assert_eq!(s.quarters("Science", "4").await.unwrap(), ["3"]);
}

// ─── Competency queries ──────────────────────────────────────────────────────

#[tokio::test]
async fn competencies_filter_by_grade_and_quarter_ordered_by_code() {
  let s = store().await;

  let mut b = bundle("Mathematics", "Mathematics");
  b.competencies.push(comp("M3", "1", "2", "third"));
  b.competencies.push(comp("M1", "1", "1", "first"));
  b.competencies.push(comp("M2", "1", "1", "second"));
  b.competencies.push(comp("M4", "2", "1", "other grade"));
  s.rebuild(vec![b]).await.unwrap();

  let all = s
    .competencies("Mathematics", &CompetencyFilter::default())
    .await
    .unwrap();
  let codes: Vec<&str> = all.iter().map(|c| c.code.as_str()).collect();
  assert_eq!(codes, ["M1", "M2", "M3", "M4"]);

  let g1 = s
    .competencies(
      "Mathematics",
      &CompetencyFilter { grade: Some("1".into()), quarter: None },
    )
    .await
    .unwrap();
  assert_eq!(g1.len(), 3);

  let g1q1 = s
    .competencies(
      "Mathematics",
      &CompetencyFilter {
        grade:   Some("1".into()),
        quarter: Some("1".into()),
      },
    )
    .await
    .unwrap();
  assert_eq!(g1q1.len(), 2);
  assert!(g1q1.iter().all(|c| c.grade == "1" && c.quarter == "1"));
}

#[tokio::test]
async fn competency_lookup_by_id() {
  let s = store().await;

  let mut b = bundle("English", "English");
  b.competencies.push(comp("E1", "1", "1", "names letters"));
  s.rebuild(vec![b]).await.unwrap();

  let listed = s
    .competencies("English", &CompetencyFilter::default())
    .await
    .unwrap();
  let id = listed[0].id;

  let found = s.competency(id).await.unwrap().unwrap();
  assert_eq!(found.text, "names letters");

  assert!(s.competency(id + 1000).await.unwrap().is_none());
}

#[tokio::test]
async fn extra_fields_round_trip_in_document_order() {
  let s = store().await;

  let mut b = bundle("Makabansa", "Makabansa");
  let mut c = comp("MK1", "1", "1", "identifies community helpers");
  c.extra = extra(&[("Prerequisites", "none"), ("Notes", "uses pictures")]);
  b.competencies.push(c);
  s.rebuild(vec![b]).await.unwrap();

  let stored = s
    .competencies("Makabansa", &CompetencyFilter::default())
    .await
    .unwrap();
  let pairs: Vec<(&str, &str)> = stored[0].extra.iter().collect();
  assert_eq!(pairs, [("Prerequisites", "none"), ("Notes", "uses pictures")]);
}

// ─── Section listings ────────────────────────────────────────────────────────

#[tokio::test]
async fn section_listings_are_scoped_to_their_subject() {
  let s = store().await;

  let mut a = bundle("Science", "Science");
  a.standards.push(NewStandard {
    standard_type: "content".into(),
    description:   "KS1 | matter and energy".into(),
    extra:         extra(&[("Standard", "matter and energy")]),
  });
  a.approaches.push(NewApproach {
    name: "Inquiry-Based".into(),
    description: "starts from student questions".into(),
    strategies: String::new(),
    extra: ExtraFields::new(),
  });
  a.concepts.push(NewConcept {
    name: "Patterns".into(),
    description: "recurring regularities".into(),
    extra: ExtraFields::new(),
  });
  a.domain_sequence.push(NewDomainEntry {
    domain: "Living Things".into(),
    sequence: "Living Things | G3 | G4".into(),
    extra: ExtraFields::new(),
  });

  let b = bundle("English", "English");
  s.rebuild(vec![a, b]).await.unwrap();

  assert_eq!(s.standards("Science").await.unwrap().len(), 1);
  assert_eq!(s.approaches("Science").await.unwrap().len(), 1);
  assert_eq!(s.concepts("Science").await.unwrap().len(), 1);
  assert_eq!(s.domain_sequence("Science").await.unwrap().len(), 1);

  assert!(s.standards("English").await.unwrap().is_empty());
  assert!(s.approaches("English").await.unwrap().is_empty());
  assert!(s.concepts("English").await.unwrap().is_empty());
  assert!(s.domain_sequence("English").await.unwrap().is_empty());
}

// ─── Skills ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn skills_recover_names_from_the_side_channel() {
  let s = store().await;

  let mut b = bundle("Mathematics", "Mathematics");
  b.skills.push(NewSkill {
    name: "CS01".into(),
    category: String::new(),
    description: String::new(),
    extra: extra(&[
      ("Skill Code", "CS01"),
      ("Specific Skill", "Critical Thinking"),
    ]),
  });
  b.skills.push(NewSkill {
    name: "Teamwork".into(),
    category: "Life & Career".into(),
    description: String::new(),
    extra: ExtraFields::new(),
  });
  b.skills.push(NewSkill {
    name: "teamwork".into(),
    category: String::new(),
    description: String::new(),
    extra: ExtraFields::new(),
  });
  s.rebuild(vec![b]).await.unwrap();

  let skills = s.skills("Mathematics").await.unwrap();
  let names: Vec<&str> = skills.iter().map(|k| k.name.as_str()).collect();
  assert_eq!(names, ["Critical Thinking", "Teamwork"]);
}

#[tokio::test]
async fn unrecoverable_skills_fall_back_to_the_universal_list() {
  let s = store().await;

  let mut b = bundle("English", "English");
  for code in ["CS01", "CS02", "21C-03"] {
    b.skills.push(NewSkill {
      name: code.into(),
      category: String::new(),
      description: String::new(),
      extra: ExtraFields::new(),
    });
  }
  s.rebuild(vec![b]).await.unwrap();

  let skills = s.skills("English").await.unwrap();
  assert_eq!(skills.len(), 6);
  assert_eq!(skills[0].name, "Critical Thinking");
  assert!(skills.iter().all(|k| k.id == 0 && k.subject_id == "English"));
}
