use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::BotError;

/// Default location of the catalog, relative to the Lambda task root.
pub const DEFAULT_CATALOG_PATH: &str = "diseases.json";

const INLINE_ORIGIN: &str = "inline";

// On-disk shape of the catalog file.
#[derive(Deserialize)]
struct CatalogFile {
    diseases: Vec<String>,
}

/// Ordered list of disease names loaded for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<String>,
    origin: String,
}

impl Catalog {
    /// Reads and validates the catalog at `path`.
    ///
    /// Never returns an empty catalog: an empty `diseases` array is reported
    /// as [`BotError::EmptyCatalog`], and blank names as
    /// [`BotError::BlankEntry`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BotError> {
        let path = path.as_ref();
        info!("Creating new disease list from file: {}", path.display());

        let raw = std::fs::read(path).map_err(|source| BotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file: CatalogFile = serde_json::from_slice(&raw).map_err(|source| BotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let origin = path.display().to_string();

        if file.diseases.is_empty() {
            return Err(BotError::EmptyCatalog { origin });
        }

        if let Some(index) = file.diseases.iter().position(|d| d.trim().is_empty()) {
            return Err(BotError::BlankEntry { origin, index });
        }

        info!("Loaded {} diseases from {}", file.diseases.len(), origin);

        Ok(Self {
            entries: file.diseases,
            origin,
        })
    }

    /// Builds a catalog in memory without validation.
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self {
            entries,
            origin: INLINE_ORIGIN.to_string(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File path the catalog came from, or `inline`.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}
