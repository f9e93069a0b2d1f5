//! Preset export
//!
//! Writes encoded presets into a caller-chosen directory, one `.pst` file
//! per patch. Batch export keeps going after individual failures and
//! reports them per item; it only fails as a whole when nothing at all
//! could be written.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::patch::{sanitize_filename, Patch};
use crate::pst::{encode, EncodeError, EncoderConfig};

/// Extension of exported preset files.
pub const PST_EXTENSION: &str = "pst";

/// Failure to export a preset.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("patch name {0:?} sanitizes to an empty filename")]
    EmptyFilename(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every item of a batch failed; carries the first failure's message.
    #[error("{0}")]
    AllFailed(String),
}

/// One failed item in a batch export.
#[derive(Debug, Clone, Serialize)]
pub struct FailedExport {
    /// Display name of the patch that failed
    pub name: String,
    /// What went wrong
    pub error: String,
}

/// Outcome of a batch export. `errors` preserves input order.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Number of presets written
    pub success_count: usize,
    /// Per-item failures, in input order
    pub errors: Vec<FailedExport>,
    /// Directory the presets were written into
    pub directory: PathBuf,
}

/// Export a single patch as `<sanitized name>.pst` in `dir`.
///
/// Returns the path of the written file.
pub fn export_patch(
    patch: &Patch,
    config: &EncoderConfig,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let base = sanitize_filename(&patch.name);
    if base.is_empty() {
        return Err(ExportError::EmptyFilename(patch.name.clone()));
    }
    let path = dir.join(format!("{base}.{PST_EXTENSION}"));
    write_preset(patch, config, &path)?;
    Ok(path)
}

/// Export every patch in `patches` into `dir`.
///
/// Never aborts on a single patch: encode and I/O failures are collected
/// per item. Patches whose names sanitize to the same base filename get
/// ` 2`, ` 3`, ... suffixes in input order, so no file written by one batch
/// is clobbered by a later item of the same batch. Returns `Ok` as long as
/// at least one file was written (or the input was empty); when every item
/// fails, the first failure's message becomes the overall error.
pub fn export_batch(
    patches: &[Patch],
    config: &EncoderConfig,
    dir: &Path,
) -> Result<BatchReport, ExportError> {
    let mut success_count = 0;
    let mut errors: Vec<FailedExport> = Vec::new();
    let mut name_uses: HashMap<String, usize> = HashMap::new();

    for patch in patches {
        let base = sanitize_filename(&patch.name);
        if base.is_empty() {
            let error = ExportError::EmptyFilename(patch.name.clone());
            errors.push(FailedExport {
                name: patch.name.clone(),
                error: error.to_string(),
            });
            continue;
        }

        let uses = name_uses.entry(base.clone()).or_insert(0);
        *uses += 1;
        let filename = if *uses == 1 {
            format!("{base}.{PST_EXTENSION}")
        } else {
            format!("{base} {uses}.{PST_EXTENSION}")
        };

        let path = dir.join(filename);
        match write_preset(patch, config, &path) {
            Ok(()) => success_count += 1,
            Err(e) => {
                log::warn!("Failed to export {:?}: {}", patch.name, e);
                errors.push(FailedExport {
                    name: patch.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Exported {}/{} presets to {}",
        success_count,
        patches.len(),
        dir.display()
    );

    if success_count == 0 && !errors.is_empty() {
        return Err(ExportError::AllFailed(errors[0].error.clone()));
    }

    Ok(BatchReport {
        success_count,
        errors,
        directory: dir.to_path_buf(),
    })
}

fn write_preset(patch: &Patch, config: &EncoderConfig, path: &Path) -> Result<(), ExportError> {
    let data = encode(patch, config)?;
    fs::write(path, data).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pst::PST_SIZE;

    fn patch(name: &str, pc: u8) -> Patch {
        Patch {
            name: name.to_string(),
            category: "Test".to_string(),
            pc,
            lsb: 0,
            msb: 104,
        }
    }

    #[test]
    fn test_single_export_writes_376_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_patch(
            &patch("Concert Grand", 0),
            &EncoderConfig::default(),
            dir.path(),
        )
        .unwrap();

        assert_eq!(path.file_name().unwrap(), "Concert Grand.pst");
        assert_eq!(fs::read(&path).unwrap().len(), PST_SIZE);
    }

    #[test]
    fn test_single_export_sanitizes_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_patch(
            &patch("Strings/Brass: Octave", 48),
            &EncoderConfig::default(),
            dir.path(),
        )
        .unwrap();
        assert_eq!(path.file_name().unwrap(), "Strings-Brass- Octave.pst");
    }

    #[test]
    fn test_single_export_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_patch(&patch("   ", 0), &EncoderConfig::default(), dir.path())
            .unwrap_err();
        assert!(matches!(err, ExportError::EmptyFilename(_)));
    }

    #[test]
    fn test_batch_reports_partial_success() {
        let dir = tempfile::tempdir().unwrap();
        let patches = vec![
            patch("First", 0),
            patch("Second", 200), // pc out of range, encode fails
            patch("Third", 2),
        ];

        let report = export_batch(&patches, &EncoderConfig::default(), dir.path()).unwrap();

        assert_eq!(report.success_count, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].name, "Second");
        assert!(dir.path().join("First.pst").exists());
        assert!(!dir.path().join("Second.pst").exists());
        assert!(dir.path().join("Third.pst").exists());
    }

    #[test]
    fn test_batch_fails_when_everything_fails() {
        // Point the batch at a path that is a file, so every write fails
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("occupied");
        fs::write(&not_a_dir, b"").unwrap();

        let patches = vec![patch("First", 0), patch("Second", 1)];
        let err = export_batch(&patches, &EncoderConfig::default(), &not_a_dir).unwrap_err();

        match err {
            ExportError::AllFailed(message) => {
                // the overall message is the first item's failure
                assert!(message.contains("First.pst"), "got: {message}");
            }
            other => panic!("expected AllFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_disambiguates_colliding_names() {
        let dir = tempfile::tempdir().unwrap();
        // all three sanitize to "My Voice"
        let patches = vec![
            patch("My Voice", 0),
            patch("My  Voice", 1),
            patch(" My Voice ", 2),
        ];

        let report = export_batch(&patches, &EncoderConfig::default(), dir.path()).unwrap();

        assert_eq!(report.success_count, 3);
        assert!(report.errors.is_empty());
        assert!(dir.path().join("My Voice.pst").exists());
        assert!(dir.path().join("My Voice 2.pst").exists());
        assert!(dir.path().join("My Voice 3.pst").exists());
    }

    #[test]
    fn test_empty_batch_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let report = export_batch(&[], &EncoderConfig::default(), dir.path()).unwrap();
        assert_eq!(report.success_count, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_name_is_a_per_item_error_in_batch() {
        let dir = tempfile::tempdir().unwrap();
        let patches = vec![patch("  ", 0), patch("Kept", 1)];

        let report = export_batch(&patches, &EncoderConfig::default(), dir.path()).unwrap();

        assert_eq!(report.success_count, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].error.contains("empty filename"));
    }
}
