//! Output of a manifest run.
//!
//! - [`records`] — the comma-separated record file with its header row.
//! - [`texts`] — the directory of raw license texts referenced from records.
//! - [`terminal`] — colored run summary; respects `--verbose` / `--quiet`.

pub mod records;
pub mod terminal;
pub mod texts;
