//! Error type for `tala-ingest`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("spreadsheet error: {0}")]
  Spreadsheet(#[from] calamine::XlsxError),

  /// Two column roles claimed the same header. Only raised when strict
  /// column resolution is enabled; the permissive default tolerates this the
  /// way the source workbooks require.
  #[error("column roles {first} and {second} both resolved to column {column}")]
  AmbiguousColumn {
    first:  &'static str,
    second: &'static str,
    column: usize,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
