//! Load-once access to parsed outline tables
//!
//! Tables are parsed the first time a (style, orientation) pair is asked for
//! and shared from then on. Requests only ever see subset copies.

use crate::table::{FontTable, Subset};
use layerfont_core::cache::{CacheStats, Registry};
use layerfont_core::error::Result;
use layerfont_core::{LayerStyle, Orientation, ResourceSource};
use std::sync::Arc;

type TableKey = (LayerStyle, Orientation);

/// Parses and caches outline tables from one [`ResourceSource`]
pub struct OutlineLoader {
    source: Arc<dyn ResourceSource>,
    tables: Registry<TableKey, FontTable>,
}

impl OutlineLoader {
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self {
            source,
            tables: Registry::new(),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// The full table for a style, loading it on first use
    ///
    /// Failures are not cached; the next call tries the source again.
    pub fn table(&self, style: LayerStyle, orientation: Orientation) -> Result<Arc<FontTable>> {
        self.tables.get_or_load((style, orientation), || {
            let bytes = self.source.load(style, orientation)?;
            let table = FontTable::parse(&bytes)?;
            log::debug!(
                "Loaded {} {} outline table from {} source ({} glyphs)",
                orientation,
                style,
                self.source.name(),
                table.glyph_count()
            );
            Ok(table)
        })
    }

    /// The table restricted to `subset`, or an empty table when unavailable
    ///
    /// An empty table makes the layer drop out of the composition instead of
    /// failing the render.
    pub fn load(&self, style: LayerStyle, orientation: Orientation, subset: &Subset) -> FontTable {
        match self.table(style, orientation) {
            Ok(table) => {
                if !table.is_usable() {
                    log::warn!("{} outline table has no missing-glyph; skipping layer", style);
                }
                table.subset(subset)
            },
            Err(e) => {
                log::warn!("Skipping {} layer ({}): {}", style, orientation, e);
                FontTable::empty()
            },
        }
    }

    /// Parse straight from the source without touching the cache
    pub fn load_uncached(
        &self,
        style: LayerStyle,
        orientation: Orientation,
        subset: &Subset,
    ) -> Result<FontTable> {
        let bytes = self.source.load(style, orientation)?;
        Ok(FontTable::parse(&bytes)?.subset(subset))
    }

    pub fn stats(&self) -> CacheStats {
        self.tables.stats()
    }

    pub fn clear(&self) {
        self.tables.clear();
    }
}

impl std::fmt::Debug for OutlineLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineLoader")
            .field("source", &self.source.name())
            .field("tables", &self.tables.len())
            .finish()
    }
}
