//! Core types and trait definitions for the Tala curriculum store.
//!
//! This crate is deliberately free of spreadsheet and database dependencies.
//! All other crates depend on it; it depends on nothing heavier than `serde`,
//! `chrono`, and `regex`.

pub mod entity;
pub mod grade;
pub mod recovery;
pub mod store;
