//! Process configuration from the environment
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `LAYERFONT_FONT_DIR` | Directory holding the outline tables | `fonts` |
//! | `LAYERFONT_FAMILY` | File-name prefix of the outline tables | `BungeeLayers` |
//! | `LAYERFONT_GSUB` | JSON stylistic-set table | none |
//! | `LAYERFONT_CONVERTER` | Program turning SVG into PNG/PDF | none |
//! | `LAYERFONT_CACHE` | `0`, `false`, `no` or `off` disables the document cache | on |

use crate::pipeline::Pipeline;
use layerfont_core::{error::Result, traits::Exporter};
use layerfont_export::{exporter_for, OutputFormat, CONVERTER_ENV};
use layerfont_outline::{DirectorySource, DEFAULT_FAMILY};
use layerfont_shape::substitution::{SubstitutionTable, GSUB_ENV};
use std::path::PathBuf;
use std::sync::Arc;

pub const FONT_DIR_ENV: &str = "LAYERFONT_FONT_DIR";
pub const FAMILY_ENV: &str = "LAYERFONT_FAMILY";
pub const CACHE_ENV: &str = "LAYERFONT_CACHE";

/// Directory searched for outline tables when nothing is configured
pub const DEFAULT_FONT_DIR: &str = "fonts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub font_dir: PathBuf,
    pub family: String,
    pub gsub: Option<PathBuf>,
    pub converter: Option<PathBuf>,
    pub document_cache: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from(DEFAULT_FONT_DIR),
            family: DEFAULT_FAMILY.to_string(),
            gsub: None,
            converter: None,
            document_cache: true,
        }
    }
}

impl Settings {
    /// Read the `LAYERFONT_*` variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();

        if let Some(dir) = get(FONT_DIR_ENV) {
            settings.font_dir = PathBuf::from(dir);
        }
        if let Some(family) = get(FAMILY_ENV) {
            settings.family = family;
        }
        settings.gsub = get(GSUB_ENV).map(PathBuf::from);
        settings.converter = get(CONVERTER_ENV).map(PathBuf::from);
        if let Some(value) = get(CACHE_ENV) {
            let disabled = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
            if disabled {
                log::info!("Document cache disabled via {}", CACHE_ENV);
            }
            settings.document_cache = !disabled;
        }
        settings
    }

    /// The stylistic-set table these settings point at
    pub fn substitutions(&self) -> Arc<SubstitutionTable> {
        match &self.gsub {
            Some(path) => Arc::new(SubstitutionTable::from_path(path).unwrap_or_else(|e| {
                log::warn!("Ignoring substitution table {}: {}", path.display(), e);
                SubstitutionTable::new()
            })),
            None => SubstitutionTable::global(),
        }
    }

    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(&self.font_dir).with_family(&self.family)
    }

    /// A pipeline over the configured directory
    pub fn pipeline(&self) -> Pipeline {
        let builder = Pipeline::builder().document_cache(self.document_cache);
        builder.build_with(Arc::new(self.source()), self.substitutions())
    }

    /// The exporter for `format`, using the configured converter if needed
    pub fn exporter(&self, format: OutputFormat, pretty: bool) -> Result<Box<dyn Exporter>> {
        exporter_for(format, self.converter.as_deref(), pretty)
    }
}
