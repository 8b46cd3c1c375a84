//! The source catalog: which workbook belongs to which subject.
//!
//! The filename-to-subject map is explicit configuration handed to the
//! loader, not process-wide state. The default catalog carries the published
//! MATATAG reference workbooks plus the senior-high core file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ─── Entries ─────────────────────────────────────────────────────────────────

/// One single-subject workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSource {
  pub id:           String,
  pub display_name: String,
  pub filename:     String,
}

/// One subject code within the multi-subject workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeniorCode {
  pub code:         String,
  pub id:           String,
  pub display_name: String,
}

/// The multi-subject workbook: several subjects in one sheet, told apart by
/// a code column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeniorSource {
  pub filename:  String,
  /// Key-stage label stamped on every competency from this file.
  pub key_stage: String,
  pub codes:     Vec<SeniorCode>,
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Everything the loader needs to find its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCatalog {
  /// Directory the filenames below are resolved against.
  #[serde(default = "default_data_dir")]
  pub data_dir: PathBuf,
  #[serde(default)]
  pub subjects: Vec<SubjectSource>,
  #[serde(default)]
  pub senior:   Option<SeniorSource>,
}

fn default_data_dir() -> PathBuf { PathBuf::from(".") }

impl Default for SourceCatalog {
  fn default() -> Self { Self::matatag(default_data_dir()) }
}

impl SourceCatalog {
  /// The published MATATAG reference set: thirteen subject workbooks and the
  /// six-subject senior-high core file.
  pub fn matatag(data_dir: PathBuf) -> Self {
    let subjects = [
      ("Mathematics", "Mathematics", "MATATAG_Math_Curriculum_AI_Reference.xlsx"),
      ("Science", "Science", "MATATAG_Science_CG_AI_Reference.xlsx"),
      ("English", "English", "MATATAG_English_CG_AI_Reference.xlsx"),
      ("Filipino", "Filipino", "MATATAG_Filipino_CG_AI_Reference.xlsx"),
      (
        "GMRC_VE",
        "GMRC / Values Education",
        "MATATAG_GMRC_VE_AI_Reference.xlsx",
      ),
      (
        "Kindergarten",
        "Kindergarten (All Areas)",
        "MATATAG_Kindergarten_CG_AI_Reference.xlsx",
      ),
      (
        "Language_G1",
        "Language (Mother Tongue) - Grade 1",
        "MATATAG_Language_G1_AI_Reference.xlsx",
      ),
      (
        "Music_Arts",
        "Music and Arts (MAPEH)",
        "MATATAG_Music_Arts_AI_Reference.xlsx",
      ),
      (
        "PE_Health",
        "PE and Health (MAPEH)",
        "MATATAG_PE_Health_AI_Curriculum_Reference.xlsx",
      ),
      (
        "Reading_Literacy_G1",
        "Reading & Literacy - Grade 1",
        "MATATAG_RL_G1_AI_Reference.xlsx",
      ),
      (
        "EPP_TLE",
        "EPP / TLE (Technology & Livelihood)",
        "EPP_TLE_MATATAG_AI_Reference_Curriculum.xlsx",
      ),
      (
        "Makabansa",
        "Makabansa (Civics/History/Geography)",
        "Makabansa_G1-3_AI_Curriculum_Reference.xlsx",
      ),
      (
        "Araling_Panlipunan",
        "Araling Panlipunan (Social Studies)",
        "MATATAG_AP_Curriculum_AI_Reference.xlsx",
      ),
    ]
    .into_iter()
    .map(|(id, display_name, filename)| SubjectSource {
      id:           id.to_string(),
      display_name: display_name.to_string(),
      filename:     filename.to_string(),
    })
    .collect();

    let codes = [
      ("EC", "SHS_Effective_Communication", "SHS – Effective Communication (English)"),
      ("MK", "SHS_Mabisang_Komunikasyon", "SHS – Mabisang Komunikasyon (Filipino)"),
      ("GM", "SHS_General_Mathematics", "SHS – General Mathematics"),
      ("GS", "SHS_General_Science", "SHS – General Science"),
      ("LCS", "SHS_Life_and_Career_Skills", "SHS – Life and Career Skills"),
      ("KLP", "SHS_Kasaysayan_at_Lipunan", "SHS – Kasaysayan at Lipunan ng Pilipinas"),
    ]
    .into_iter()
    .map(|(code, id, display_name)| SeniorCode {
      code:         code.to_string(),
      id:           id.to_string(),
      display_name: display_name.to_string(),
    })
    .collect();

    Self {
      data_dir,
      subjects,
      senior: Some(SeniorSource {
        filename: "SSHS_Core_Curriculum_AI_Reference.xlsx".to_string(),
        key_stage: "SHS".to_string(),
        codes,
      }),
    }
  }
}
