//! SQL schema for the Tala SQLite store.
//!
//! `PRAGMAS` and `TABLES` run at connection startup; a rebuild runs
//! `DROP_ALL` + `TABLES` inside its transaction (pragmas cannot change
//! mid-transaction, so they stay out of the rebuild batch).

pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const TABLES: &str = "
CREATE TABLE IF NOT EXISTS subjects (
    id           TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    source_file  TEXT NOT NULL,
    loaded_at    TEXT NOT NULL    -- RFC 3339 UTC; one stamp per rebuild
);

CREATE TABLE IF NOT EXISTS learning_competencies (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id           TEXT NOT NULL REFERENCES subjects(id),
    code                 TEXT NOT NULL DEFAULT '',
    grade                TEXT NOT NULL DEFAULT '',
    quarter              TEXT NOT NULL DEFAULT '',
    key_stage            TEXT NOT NULL DEFAULT '',
    domain               TEXT NOT NULL DEFAULT '',
    subdomain            TEXT NOT NULL DEFAULT '',
    topic                TEXT NOT NULL DEFAULT '',
    competency_text      TEXT NOT NULL,   -- never blank; unresolvable rows are dropped
    content_standard     TEXT NOT NULL DEFAULT '',
    performance_standard TEXT NOT NULL DEFAULT '',
    blooms_level         TEXT NOT NULL DEFAULT '',
    competency_type      TEXT NOT NULL DEFAULT '',
    tags                 TEXT NOT NULL DEFAULT '',
    extra_json           TEXT             -- JSON object, NULL when empty
);

CREATE TABLE IF NOT EXISTS standards (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id    TEXT NOT NULL REFERENCES subjects(id),
    standard_type TEXT NOT NULL DEFAULT '',
    description   TEXT NOT NULL DEFAULT '',
    extra_json    TEXT
);

CREATE TABLE IF NOT EXISTS pedagogical_approaches (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id  TEXT NOT NULL REFERENCES subjects(id),
    name        TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    strategies  TEXT NOT NULL DEFAULT '',
    extra_json  TEXT
);

CREATE TABLE IF NOT EXISTS twenty_first_century_skills (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id  TEXT NOT NULL REFERENCES subjects(id),
    name        TEXT NOT NULL DEFAULT '',   -- raw; may be a code, resolved on read
    category    TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    extra_json  TEXT
);

CREATE TABLE IF NOT EXISTS crosscutting_concepts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id  TEXT NOT NULL REFERENCES subjects(id),
    name        TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    extra_json  TEXT
);

CREATE TABLE IF NOT EXISTS domain_sequence (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id TEXT NOT NULL REFERENCES subjects(id),
    domain     TEXT NOT NULL DEFAULT '',
    sequence   TEXT NOT NULL DEFAULT '',
    extra_json TEXT
);

CREATE INDEX IF NOT EXISTS lc_subject_idx
    ON learning_competencies(subject_id);
CREATE INDEX IF NOT EXISTS lc_subject_grade_idx
    ON learning_competencies(subject_id, grade);
CREATE INDEX IF NOT EXISTS lc_subject_grade_quarter_idx
    ON learning_competencies(subject_id, grade, quarter);
";

/// Children before parents; rebuilds drop everything and start over.
pub const DROP_ALL: &str = "
DROP TABLE IF EXISTS learning_competencies;
DROP TABLE IF EXISTS standards;
DROP TABLE IF EXISTS pedagogical_approaches;
DROP TABLE IF EXISTS twenty_first_century_skills;
DROP TABLE IF EXISTS crosscutting_concepts;
DROP TABLE IF EXISTS domain_sequence;
DROP TABLE IF EXISTS subjects;
";
