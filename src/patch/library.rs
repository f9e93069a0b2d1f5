//! Patch library loading and queries
//!
//! The library document is a JSON array of patch records, the format the
//! Genos voice-list scrapers produce. Queries mirror what the browsing UI
//! needs: category listing with counts, category/search filtering, and
//! name lookup for auditioning.

use std::path::Path;

use thiserror::Error;

use super::Patch;

/// A loaded patch library, kept in document order.
#[derive(Debug, Clone, Default)]
pub struct PatchLibrary {
    patches: Vec<Patch>,
}

/// Failure to load a library document.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PatchLibrary {
    /// Load a library from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let data = std::fs::read_to_string(path).map_err(|source| LibraryError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let patches: Vec<Patch> =
            serde_json::from_str(&data).map_err(|source| LibraryError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        log::info!("Loaded {} patches from {}", patches.len(), path.display());
        Ok(Self { patches })
    }

    /// Build a library from patches already in memory.
    pub fn from_patches(patches: Vec<Patch>) -> Self {
        Self { patches }
    }

    /// All patches in document order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Sorted unique category names with their patch counts.
    pub fn categories(&self) -> Vec<(String, usize)> {
        let mut categories: Vec<(String, usize)> = Vec::new();
        for patch in &self.patches {
            match categories.iter_mut().find(|(name, _)| *name == patch.category) {
                Some((_, count)) => *count += 1,
                None => categories.push((patch.category.clone(), 1)),
            }
        }
        categories.sort_by(|a, b| a.0.cmp(&b.0));
        categories
    }

    /// Patches matching an optional category and an optional search string.
    ///
    /// Search is case-insensitive over both name and category, document
    /// order preserved.
    pub fn filter(&self, category: Option<&str>, search: Option<&str>) -> Vec<&Patch> {
        let needle = search.map(str::to_lowercase);
        self.patches
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| {
                needle.as_deref().map_or(true, |q| {
                    p.name.to_lowercase().contains(q) || p.category.to_lowercase().contains(q)
                })
            })
            .collect()
    }

    /// Look up a patch by name: exact match first, then case-insensitive
    /// exact, then a case-insensitive prefix if it is unique.
    pub fn find_by_name(&self, name: &str) -> Option<&Patch> {
        if let Some(patch) = self.patches.iter().find(|p| p.name == name) {
            return Some(patch);
        }

        let lower = name.to_lowercase();
        if let Some(patch) = self
            .patches
            .iter()
            .find(|p| p.name.to_lowercase() == lower)
        {
            return Some(patch);
        }

        let mut prefixed = self
            .patches
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with(&lower));
        match (prefixed.next(), prefixed.next()) {
            (Some(patch), None) => Some(patch),
            _ => None,
        }
    }
}
