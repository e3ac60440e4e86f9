//! Glyph positioning for every layer of a request
//!
//! All layers share one coordinate space: canvas pixels, y down, origin at
//! the top-left corner of the unrotated canvas. Vertical requests are laid
//! out exactly like horizontal ones (their outline tables are pre-rotated);
//! only the serializer turns the result.

use crate::compose::shade_nudge;
use layerfont_core::types::{GlyphId, LayerLayout, LayerRole, LayoutResult, Placement};
use layerfont_core::{Color, Decoration, LayerStyle, LayoutRequest, FULL_BLOCK};
use layerfont_outline::FontTable;
use std::collections::HashMap;

/// Per-style tables already cut down to the request's subset
pub type LayerTables = HashMap<LayerStyle, FontTable>;

/// Text scale inside block shapes
pub const BLOCK_TEXT_SCALE: f64 = 0.9;

/// Block cell width, in em, when the block glyph gives none
pub const BLOCK_FALLBACK_ADVANCE: f64 = 1.28;

/// Rightward shift of block-mode text, in em, for the block's left sidebearing
pub const BLOCK_SIDEBEARING: f64 = 0.02;

/// Blank margin around the composition, in pixels
pub fn padding(size: u32) -> f64 {
    (f64::from(size) * 0.1 + 18.0).round()
}

/// Styles whose tables a request needs
pub fn required_styles(request: &LayoutRequest) -> Vec<LayerStyle> {
    let mut styles: Vec<LayerStyle> = request.layers.iter().map(|spec| spec.style).collect();
    if !request.decoration.is_none() {
        styles.extend(background_styles(request).into_iter().map(|(style, _)| style));
    }
    styles.sort_by_key(|style| style.paint_rank());
    styles.dedup();
    styles
}

/// Decoration layers, back to front, with their fill
///
/// The sign itself is drawn with the regular outlines in the background
/// color; an outline-style copy sits behind it when the outline layer is on.
pub fn background_styles(request: &LayoutRequest) -> Vec<(LayerStyle, Color)> {
    let mut styles = Vec::new();
    if let Some(color) = request.color_of(LayerStyle::Outline) {
        styles.push((LayerStyle::Outline, color));
    }
    styles.push((LayerStyle::Regular, request.background));
    styles
}

/// Left edges of the banner tiles covering `[start, start + span]`
///
/// Tiles keep their natural width `tile`; their spacing stretches so the
/// last tile ends exactly at `start + span`. A span shorter than one tile
/// gets a single tile starting at `start`, overhanging the span on the
/// right. A non-positive tile width disables tiling.
pub fn tile_positions(start: f64, span: f64, tile: f64) -> Vec<f64> {
    if !(tile > 0.0 && span > 0.0) || !span.is_finite() {
        return Vec::new();
    }
    let count = tile_count(span, tile);
    if count == 1 {
        return vec![start];
    }
    let last = start + span - tile;
    let step = (span - tile) / (count - 1) as f64;
    let mut positions: Vec<f64> = (0..count - 1).map(|i| start + i as f64 * step).collect();
    positions.push(last);
    positions
}

/// `ceil(span / tile)`, treating near-exact multiples as exact
pub fn tile_count(span: f64, tile: f64) -> usize {
    if !(tile > 0.0 && span > 0.0) {
        return 0;
    }
    let ratio = span / tile;
    let nearest = ratio.round();
    let count = if (ratio - nearest).abs() < 1e-9 { nearest } else { ratio.ceil() };
    count.max(1.0) as usize
}

/// Positions glyphs for all layers of one request
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine;

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Lay out `resolved` (the substituted text) for every requested layer
    ///
    /// Layers whose table is unusable are left out; nothing here fails.
    pub fn layout(&self, request: &LayoutRequest, resolved: &[char], tables: &LayerTables) -> LayoutResult {
        let size = f64::from(request.size);
        let padding = padding(request.size);
        let decoration = request.decoration;

        log::debug!(
            "Laying out {} glyphs at {}px ({}, {:?})",
            resolved.len(),
            request.size,
            request.orientation,
            decoration
        );

        let text_tables: Vec<(LayerStyle, Color, &FontTable)> = request
            .layers
            .iter()
            .filter_map(|spec| usable(tables, spec.style).map(|table| (spec.style, spec.color, table)))
            .collect();

        let background_tables: Vec<(LayerStyle, Color, &FontTable)> =
            if decoration.is_none() || text_tables.is_empty() {
                Vec::new()
            } else {
                background_styles(request)
                    .into_iter()
                    .filter_map(|(style, color)| usable(tables, style).map(|table| (style, color, table)))
                    .collect()
            };
        // The sign layer sets the decoration metrics every layer follows
        let sign = background_tables.last().map(|(_, _, table)| *table);

        let (background, text): (Vec<LayerLayout>, Vec<LayerLayout>) = match (decoration, sign) {
            (Decoration::Block(shape), Some(sign)) => {
                let cell = block_advance(sign, shape, size);
                let text = text_tables
                    .iter()
                    .map(|&(style, color, table)| {
                        block_text_layer(style, color, table, resolved, size, padding, cell)
                    })
                    .collect();
                let background = background_tables
                    .iter()
                    .map(|&(style, color, table)| {
                        block_background_layer(style, color, table, shape, resolved.len(), size, padding, cell)
                    })
                    .collect();
                (background, text)
            },
            (Decoration::Banner { begin, end }, Some(sign)) => {
                let scale = size / sign.units_per_em;
                let lead = begin
                    .and_then(|cap| sign.glyph(GlyphId::Char(cap)))
                    .map_or(0.0, |cap| cap.advance * scale);
                let text: Vec<LayerLayout> = text_tables
                    .iter()
                    .map(|&(style, color, table)| {
                        text_layer(style, color, table, resolved, size, padding, padding + lead)
                    })
                    .collect();
                let span = text.iter().map(|layer| layer.advance).fold(0.0, f64::max);
                let banner = Banner {
                    begin,
                    end,
                    start: padding + lead,
                    span,
                };
                let background = background_tables
                    .iter()
                    .map(|&(style, color, table)| banner.layer(style, color, table, size, padding))
                    .collect();
                (background, text)
            },
            _ => {
                let text = text_tables
                    .iter()
                    .map(|&(style, color, table)| text_layer(style, color, table, resolved, size, padding, padding))
                    .collect();
                (Vec::new(), text)
            },
        };

        let mut result = LayoutResult {
            orientation: request.orientation,
            size: request.size,
            padding,
            background,
            text,
            width: 0.0,
            height: 0.0,
        };
        let (width, height) = canvas_extent(&result);
        result.width = width;
        result.height = height;
        result
    }
}

/// Unrotated canvas size: content plus padding on every side
fn canvas_extent(result: &LayoutResult) -> (f64, f64) {
    let size = f64::from(result.size);
    let layers = || result.background.iter().chain(&result.text);
    let right = layers()
        .map(|layer| layer.right + shade_nudge(layer.style, result.size))
        .fold(0.0, f64::max);
    let bottom = layers()
        .map(|layer| layer.bottom + shade_nudge(layer.style, result.size))
        .fold(size, f64::max);
    (2.0 * result.padding + right, 2.0 * result.padding + bottom)
}

/// The style's table if it can be drawn at all
fn usable(tables: &LayerTables, style: LayerStyle) -> Option<&FontTable> {
    match tables.get(&style) {
        Some(table) if table.is_usable() => Some(table),
        _ => {
            log::warn!("No usable {} outlines; layer skipped", style);
            None
        },
    }
}

/// Glyph to draw for `ch`, falling back to the placeholder
fn lookup(table: &FontTable, ch: char) -> GlyphId {
    let id = GlyphId::Char(ch);
    if table.contains(id) {
        id
    } else {
        GlyphId::Missing
    }
}

fn advance_of(table: &FontTable, id: GlyphId) -> f64 {
    table.glyph(id).map_or(0.0, |glyph| glyph.advance)
}

fn empty_layer(style: LayerStyle, role: LayerRole, color: Color, scale: f64, size: f64) -> LayerLayout {
    LayerLayout {
        style,
        role,
        color,
        scale,
        placements: Vec::new(),
        advance: 0.0,
        right: 0.0,
        bottom: size,
    }
}

/// Natural setting: advances plus kerning between resolved neighbours
fn text_layer(
    style: LayerStyle,
    color: Color,
    table: &FontTable,
    text: &[char],
    size: f64,
    padding: f64,
    start: f64,
) -> LayerLayout {
    let scale = size / table.units_per_em;
    let baseline = padding + table.baseline * scale;
    let mut layer = empty_layer(style, LayerRole::Text, color, scale, size);

    let mut pen = start;
    let mut previous: Option<GlyphId> = None;
    for &ch in text {
        let id = lookup(table, ch);
        if let (Some(left), GlyphId::Char(_)) = (previous, id) {
            if let Some(adjustment) = table.kerning(left, id) {
                pen += adjustment * scale;
            }
        }
        layer.placements.push(Placement {
            glyph: id,
            x: pen,
            y: baseline,
        });
        pen += advance_of(table, id) * scale;
        previous = match id {
            GlyphId::Char(_) => Some(id),
            GlyphId::Missing => None,
        };
    }

    layer.advance = pen - start;
    layer.right = pen - padding;
    layer
}

/// Text inside block shapes: one fixed cell per character, no kerning
fn block_text_layer(
    style: LayerStyle,
    color: Color,
    table: &FontTable,
    text: &[char],
    size: f64,
    padding: f64,
    cell: f64,
) -> LayerLayout {
    let scale = BLOCK_TEXT_SCALE * size / table.units_per_em;
    let top = padding + size * (1.0 - BLOCK_TEXT_SCALE) / 2.0;
    let baseline = top + table.baseline * scale;
    let mut layer = empty_layer(style, LayerRole::Text, color, scale, size);

    for (i, &ch) in text.iter().enumerate() {
        let id = lookup(table, ch);
        let width = advance_of(table, id) * scale;
        let cell_left = padding + i as f64 * cell;
        layer.placements.push(Placement {
            glyph: id,
            x: cell_left + (cell - width) / 2.0 + BLOCK_SIDEBEARING * size,
            y: baseline,
        });
    }

    layer.advance = text.len() as f64 * cell;
    layer.right = layer.advance;
    layer
}

/// One block shape per character
#[allow(clippy::too_many_arguments)]
fn block_background_layer(
    style: LayerStyle,
    color: Color,
    table: &FontTable,
    shape: char,
    count: usize,
    size: f64,
    padding: f64,
    cell: f64,
) -> LayerLayout {
    let scale = size / table.units_per_em;
    let baseline = padding + table.baseline * scale;
    let mut layer = empty_layer(style, LayerRole::Background, color, scale, size);

    let id = GlyphId::Char(shape);
    if table.contains(id) {
        layer.placements = (0..count)
            .map(|i| Placement {
                glyph: id,
                x: padding + i as f64 * cell,
                y: baseline,
            })
            .collect();
    } else {
        log::warn!("{} outlines lack block glyph {}; block omitted", style, id);
    }

    layer.advance = count as f64 * cell;
    layer.right = layer.advance;
    layer
}

/// Cell width in block mode, shared by every layer
fn block_advance(sign: &FontTable, shape: char, size: f64) -> f64 {
    let scale = size / sign.units_per_em;
    sign.glyph(GlyphId::Char(shape))
        .map(|glyph| glyph.advance * scale)
        .filter(|advance| *advance > 0.0)
        .unwrap_or(BLOCK_FALLBACK_ADVANCE * size)
}

/// Shared banner geometry for all decoration layers
struct Banner {
    begin: Option<char>,
    end: Option<char>,
    /// Left edge of the tiled span
    start: f64,
    /// Width the tiles must cover
    span: f64,
}

impl Banner {
    fn layer(&self, style: LayerStyle, color: Color, table: &FontTable, size: f64, padding: f64) -> LayerLayout {
        let scale = size / table.units_per_em;
        let baseline = padding + table.baseline * scale;
        let mut layer = empty_layer(style, LayerRole::Background, color, scale, size);
        let place = |glyph: GlyphId, x: f64| Placement {
            glyph,
            x,
            y: baseline,
        };

        if let Some(cap) = self.begin.map(GlyphId::Char) {
            match table.glyph(cap) {
                Some(glyph) => layer.placements.push(place(cap, self.start - glyph.advance * scale)),
                None => log::debug!("{} outlines lack banner begin {}; omitted", style, cap),
            }
        }

        let tile = GlyphId::Char(FULL_BLOCK);
        let tile_width = advance_of(table, tile) * scale;
        // A single tile may overhang a short span; the end cap follows it
        let mut covered = self.span;
        if table.contains(tile) {
            let positions = tile_positions(self.start, self.span, tile_width);
            if let Some(&last) = positions.last() {
                covered = covered.max(last + tile_width - self.start);
            }
            layer.placements.extend(positions.into_iter().map(|x| place(tile, x)));
        } else {
            log::warn!("{} outlines lack the banner tile; tiling disabled", style);
        }

        let mut right = self.start + covered;
        if let Some(cap) = self.end.map(GlyphId::Char) {
            match table.glyph(cap) {
                Some(glyph) => {
                    layer.placements.push(place(cap, right));
                    right += glyph.advance * scale;
                },
                None => log::debug!("{} outlines lack banner end {}; omitted", style, cap),
            }
        }

        layer.advance = covered;
        layer.right = right - padding;
        layer
    }
}
