//! Merging positioned layers into one back-to-front draw list

use crate::layout::LayerTables;
use layerfont_core::types::{GlyphId, LayerLayout, LayerRole, LayoutResult};
use layerfont_core::{Color, LayerStyle, Orientation};
use serde::Serialize;
use std::sync::Arc;

/// Drop-shadow offset of the shade layer, in em, on both axes
pub const SHADE_NUDGE: f64 = 0.04;

/// How far a layer is pushed down and right when composited
pub fn shade_nudge(style: LayerStyle, size: u32) -> f64 {
    if style == LayerStyle::Shade {
        SHADE_NUDGE * f64::from(size)
    } else {
        0.0
    }
}

/// One glyph outline to paint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawItem {
    pub style: LayerStyle,
    pub role: LayerRole,
    pub glyph: GlyphId,
    /// Outline in design units, y up, origin on the baseline
    #[serde(skip)]
    pub path: Arc<str>,
    pub x: f64,
    pub y: f64,
    /// Pixels per design unit
    pub scale: f64,
    pub color: Color,
}

/// Everything the serializer needs, in paint order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawList {
    pub orientation: Orientation,
    /// Unrotated canvas extent in fractional pixels
    pub width: f64,
    pub height: f64,
    pub items: Vec<DrawItem>,
}

impl DrawList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Canvas size in whole pixels, oriented for display
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = layerfont_core::types::round_px(self.width);
        let height = layerfont_core::types::round_px(self.height);
        if self.orientation.is_vertical() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

/// Flatten a layout into a draw list
///
/// Decorations go first in the order the layout produced them, then the
/// text layers in canonical paint order regardless of request order.
pub fn compose(layout: &LayoutResult, tables: &LayerTables) -> DrawList {
    let mut text: Vec<&LayerLayout> = layout.text.iter().collect();
    text.sort_by_key(|layer| layer.style.paint_rank());

    let mut items = Vec::new();
    for layer in layout.background.iter().chain(text) {
        let Some(table) = tables.get(&layer.style) else {
            continue;
        };
        let nudge = shade_nudge(layer.style, layout.size);
        for placement in &layer.placements {
            let Some(glyph) = table.glyph(placement.glyph) else {
                continue;
            };
            items.push(DrawItem {
                style: layer.style,
                role: layer.role,
                glyph: placement.glyph,
                path: Arc::clone(&glyph.path),
                x: placement.x + nudge,
                y: placement.y + nudge,
                scale: layer.scale,
                color: layer.color,
            });
        }
    }

    log::debug!("Composed {} draw items", items.len());
    DrawList {
        orientation: layout.orientation,
        width: layout.width,
        height: layout.height,
        items,
    }
}
