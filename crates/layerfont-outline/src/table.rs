//! Per-style font data: outlines, advances and kerning in design units

use crate::parser::{parse_records, KernSide, Record};
use layerfont_core::{error::Result, types::GlyphId, Decoration};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Units per em assumed when the table does not say
pub const DEFAULT_UNITS_PER_EM: f64 = 1000.0;

/// One drawable glyph
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRecord {
    pub id: GlyphId,
    /// SVG path data in design units, y up; shared with the cached table
    pub path: Arc<str>,
    pub advance: f64,
}

/// Everything one layer style knows about its glyphs
///
/// Immutable once built. Subsetting returns a new table that shares the
/// outline data with this one.
#[derive(Debug, Clone, PartialEq)]
pub struct FontTable {
    pub units_per_em: f64,
    pub ascent: f64,
    pub descent: f64,
    /// Distance from the top of the em box down to the baseline
    pub baseline: f64,
    glyphs: HashMap<GlyphId, GlyphRecord>,
    kerning: HashMap<(GlyphId, GlyphId), f64>,
}

impl Default for FontTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl FontTable {
    /// A table with no glyphs; layers built on it are skipped
    pub fn empty() -> Self {
        Self {
            units_per_em: DEFAULT_UNITS_PER_EM,
            ascent: DEFAULT_UNITS_PER_EM,
            descent: 0.0,
            baseline: DEFAULT_UNITS_PER_EM,
            glyphs: HashMap::new(),
            kerning: HashMap::new(),
        }
    }

    /// Parse an SVG-font outline table
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_records(parse_records(bytes)?))
    }

    /// Assemble a table from parsed records
    ///
    /// The first glyph for a codepoint wins. Glyphs mapped to more than one
    /// character are ligatures and are skipped. Kerning is stored as a pen
    /// adjustment, so SVG's `k` is negated.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Self::empty();
        let mut default_advance = 0.0;
        let mut units_per_em = None;
        let mut ascent = None;
        let mut descent = None;
        let mut names: HashMap<String, GlyphId> = HashMap::new();
        let mut kerns = Vec::new();
        let mut pending_glyphs = Vec::new();
        let mut missing = None;

        for record in records {
            match record {
                Record::FontMeta(meta) => {
                    default_advance = meta.default_advance.unwrap_or(default_advance);
                    units_per_em = meta.units_per_em.or(units_per_em);
                    ascent = meta.ascent.or(ascent);
                    descent = meta.descent.or(descent);
                },
                Record::Glyph(glyph) => {
                    let Some(unicode) = glyph.unicode.as_deref() else {
                        continue;
                    };
                    let mut chars = unicode.chars();
                    let (Some(ch), None) = (chars.next(), chars.next()) else {
                        continue;
                    };
                    let id = GlyphId::Char(ch);
                    if let Some(name) = glyph.name {
                        names.entry(name).or_insert(id);
                    }
                    pending_glyphs.push((id, glyph.advance, glyph.path));
                },
                Record::MissingGlyph(glyph) => {
                    if missing.is_none() {
                        missing = Some((glyph.advance, glyph.path));
                    }
                },
                Record::Kerning(kern) => kerns.push(kern),
            }
        }

        // Advances may inherit a <font> default declared after the glyph
        for (id, advance, path) in pending_glyphs {
            table.glyphs.entry(id).or_insert_with(|| GlyphRecord {
                id,
                path: Arc::from(path.unwrap_or_default()),
                advance: advance.unwrap_or(default_advance),
            });
        }
        if let Some((advance, path)) = missing {
            table.glyphs.insert(
                GlyphId::Missing,
                GlyphRecord {
                    id: GlyphId::Missing,
                    path: Arc::from(path.unwrap_or_default()),
                    advance: advance.unwrap_or(default_advance),
                },
            );
        }

        for kern in kerns {
            let firsts = kern_targets(&kern.first, &names, &table.glyphs);
            let seconds = kern_targets(&kern.second, &names, &table.glyphs);
            for &left in &firsts {
                for &right in &seconds {
                    table.kerning.entry((left, right)).or_insert(-kern.k);
                }
            }
        }

        table.units_per_em = units_per_em.filter(|u| *u > 0.0).unwrap_or(DEFAULT_UNITS_PER_EM);
        table.descent = descent.unwrap_or(0.0);
        table.ascent = ascent.unwrap_or(table.units_per_em + table.descent);
        table.baseline = table.units_per_em + table.descent;

        log::debug!(
            "Built font table: {} glyphs, {} kerning pairs, {} upm",
            table.glyphs.len(),
            table.kerning.len(),
            table.units_per_em
        );
        table
    }

    /// A copy restricted to `subset`; kerning pairs need both ends inside
    pub fn subset(&self, subset: &Subset) -> FontTable {
        let glyphs = self
            .glyphs
            .iter()
            .filter(|(id, _)| subset.contains(**id))
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        let kerning = self
            .kerning
            .iter()
            .filter(|((left, right), _)| subset.contains(*left) && subset.contains(*right))
            .map(|(pair, k)| (*pair, *k))
            .collect();

        FontTable {
            units_per_em: self.units_per_em,
            ascent: self.ascent,
            descent: self.descent,
            baseline: self.baseline,
            glyphs,
            kerning,
        }
    }

    pub fn glyph(&self, id: GlyphId) -> Option<&GlyphRecord> {
        self.glyphs.get(&id)
    }

    pub fn missing(&self) -> Option<&GlyphRecord> {
        self.glyphs.get(&GlyphId::Missing)
    }

    pub fn contains(&self, id: GlyphId) -> bool {
        self.glyphs.contains_key(&id)
    }

    /// Pen adjustment between two glyphs, in design units
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<f64> {
        self.kerning.get(&(left, right)).copied()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn kerning_count(&self) -> usize {
        self.kerning.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Layers need the placeholder glyph to be drawable at all
    pub fn is_usable(&self) -> bool {
        self.missing().is_some()
    }
}

/// Ranges only reach glyphs the table defines
fn kern_targets(
    side: &KernSide,
    names: &HashMap<String, GlyphId>,
    glyphs: &HashMap<GlyphId, GlyphRecord>,
) -> Vec<GlyphId> {
    let mut ids: Vec<GlyphId> = side.chars.iter().map(|&ch| GlyphId::Char(ch)).collect();
    if !side.ranges.is_empty() {
        let mut in_range: Vec<GlyphId> = glyphs
            .keys()
            .filter(|id| match id {
                GlyphId::Char(ch) => !side.chars.contains(ch) && side.covers(*ch),
                GlyphId::Missing => false,
            })
            .copied()
            .collect();
        in_range.sort();
        ids.extend(in_range);
    }
    ids.extend(side.names.iter().filter_map(|name| names.get(name).copied()));
    ids
}

/// The distinct glyphs a request can touch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subset {
    ids: BTreeSet<GlyphId>,
}

impl Subset {
    /// Resolved text, decoration glyphs and the placeholder
    pub fn for_request(resolved: &[char], decoration: &Decoration) -> Self {
        let ids = resolved
            .iter()
            .copied()
            .chain(decoration.glyphs())
            .map(GlyphId::Char)
            .chain(std::iter::once(GlyphId::Missing))
            .collect();
        Self { ids }
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let ids = chars
            .into_iter()
            .map(GlyphId::Char)
            .chain(std::iter::once(GlyphId::Missing))
            .collect();
        Self { ids }
    }

    pub fn contains(&self, id: GlyphId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.ids.iter().copied()
    }
}
