//! Where outline-table bytes come from

use layerfont_core::error::{ResourceError, Result};
use layerfont_core::{LayerStyle, Orientation, ResourceSource};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Family name used when none is configured
pub const DEFAULT_FAMILY: &str = "BungeeLayers";

/// Outline tables stored as `<dir>/<Family>[Rotated]-<Style>.svg`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    family: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            family: DEFAULT_FAMILY.to_string(),
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// File that holds the table for one style and orientation
    pub fn path_for(&self, style: LayerStyle, orientation: Orientation) -> PathBuf {
        let rotated = if orientation.is_vertical() { "Rotated" } else { "" };
        self.dir
            .join(format!("{}{}-{}.svg", self.family, rotated, style.title()))
    }
}

impl ResourceSource for DirectorySource {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn load(&self, style: LayerStyle, orientation: Orientation) -> Result<Vec<u8>> {
        let path = self.path_for(style, orientation);
        log::debug!("Reading outline table {}", path.display());
        std::fs::read(&path).map_err(|source| {
            let err = if source.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound {
                    style: style.to_string(),
                    orientation: orientation.to_string(),
                }
            } else {
                ResourceError::Unreadable {
                    path: path.display().to_string(),
                    source,
                }
            };
            err.into()
        })
    }
}

/// Outline tables held in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: RwLock<HashMap<(LayerStyle, Orientation), Vec<u8>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table; replaces any earlier one for the same key
    pub fn insert(&self, style: LayerStyle, orientation: Orientation, bytes: impl Into<Vec<u8>>) {
        self.tables.write().insert((style, orientation), bytes.into());
    }

    pub fn with(self, style: LayerStyle, orientation: Orientation, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(style, orientation, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

impl ResourceSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, style: LayerStyle, orientation: Orientation) -> Result<Vec<u8>> {
        self.tables
            .read()
            .get(&(style, orientation))
            .cloned()
            .ok_or_else(|| {
                ResourceError::NotFound {
                    style: style.to_string(),
                    orientation: orientation.to_string(),
                }
                .into()
            })
    }
}
