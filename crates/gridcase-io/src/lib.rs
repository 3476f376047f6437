//! # gridcase-io: external collaborators of the pipeline
//!
//! - [`importer`] reads a PyPSA CSV-folder export into a
//!   [`gridcase_core::Network`], collecting diagnostics instead of aborting
//!   on structural oddities.
//! - [`writer`] serializes the pipeline's [`gridcase_convert::CaseTables`]
//!   to `;`-delimited files, one header row each, per-snapshot files under
//!   a `series/` subdirectory.

use std::path::Path;

pub mod importer;
pub mod writer;

pub use importer::{load_csv_folder, ImportResult};
pub use writer::write_case;

/// Study-case name derived from the input path (its file stem); names the
/// output subdirectory.
pub fn case_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "case".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_name() {
        assert_eq!(case_name(Path::new("/data/spain_low")), "spain_low");
        assert_eq!(case_name(Path::new("spain_low/")), "spain_low");
    }
}
