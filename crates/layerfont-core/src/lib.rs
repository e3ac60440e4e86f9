//! Layerfont Core: the shared vocabulary of the chromatic typesetter
//!
//! A render request travels through five components, leaves first:
//!
//! 1. **Outline loading** - SVG font tables become glyph outlines, advances and kerning
//! 2. **Substitution** - each character walks the enabled stylistic-set tables
//! 3. **Layout** - resolved glyphs get absolute positions, decorations get tiled
//! 4. **Composition** - color layers merge into one back-to-front draw list
//! 5. **Serialization** - the draw list becomes a self-contained SVG document
//!
//! This crate holds the types every stage agrees on, the error taxonomy,
//! the seam traits ([`ResourceSource`], [`Exporter`]) and the process-wide
//! caches. The stages themselves live in the sibling crates.

pub mod cache;
pub mod error;
pub mod request;
pub mod traits;

pub use error::{LayerfontError, Result};
pub use request::{LayerSpec, LayoutRequest, RequestParams};
pub use traits::{Exporter, ResourceSource};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The data structures that flow between stages
pub mod types {
    use super::{Color, LayerStyle, Orientation};
    use serde::Serialize;
    use std::fmt;

    /// What a placement refers to inside one layer's font table
    ///
    /// Glyphs are keyed by the codepoint they were resolved to; `Missing`
    /// is the table's placeholder glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
    pub enum GlyphId {
        Missing,
        Char(char),
    }

    impl GlyphId {
        pub fn as_char(self) -> Option<char> {
            match self {
                GlyphId::Char(ch) => Some(ch),
                GlyphId::Missing => None,
            }
        }

        /// Stable identifier fragment, safe inside XML ids
        pub fn label(self) -> String {
            match self {
                GlyphId::Char(ch) => format!("u{:04X}", ch as u32),
                GlyphId::Missing => "missing".to_string(),
            }
        }
    }

    impl fmt::Display for GlyphId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.label())
        }
    }

    /// Whether a layer carries text or the decoration behind it
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LayerRole {
        Background,
        Text,
    }

    /// One glyph dropped at its pen position
    ///
    /// `x` is the left edge of the advance box and `y` the baseline, both in
    /// canvas pixels with y growing downward.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct Placement {
        pub glyph: GlyphId,
        pub x: f64,
        pub y: f64,
    }

    /// Everything one color layer contributes to the canvas
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct LayerLayout {
        pub style: LayerStyle,
        pub role: LayerRole,
        pub color: Color,
        /// Canvas pixels per font design unit for this layer's glyphs
        pub scale: f64,
        pub placements: Vec<Placement>,
        /// Accumulated pen advance, padding excluded
        pub advance: f64,
        /// Right edge of the layer content, padding excluded
        pub right: f64,
        /// Bottom edge of the layer content, padding excluded
        pub bottom: f64,
    }

    /// Positioned layers for one request, before composition
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct LayoutResult {
        pub orientation: Orientation,
        pub size: u32,
        pub padding: f64,
        /// Decoration layers, back to front
        pub background: Vec<LayerLayout>,
        /// Text layers in request order
        pub text: Vec<LayerLayout>,
        /// Unrotated canvas extent in fractional pixels
        pub width: f64,
        pub height: f64,
    }

    impl LayoutResult {
        pub fn is_empty(&self) -> bool {
            self.background.iter().chain(&self.text).all(|layer| layer.placements.is_empty())
        }

        /// Canvas size in whole pixels, already oriented for display
        pub fn pixel_size(&self) -> (u32, u32) {
            let width = round_px(self.width);
            let height = round_px(self.height);
            match self.orientation {
                Orientation::Horizontal => (width, height),
                Orientation::Vertical => (height, width),
            }
        }
    }

    /// Output of the whole pipeline, ready for an exporter
    #[derive(Debug, Clone)]
    pub struct RenderedDocument {
        pub svg: String,
        pub layout: LayoutResult,
        pub width: u32,
        pub height: u32,
    }

    /// Round a fractional pixel extent to a whole, non-negative pixel count
    ///
    /// Extents beyond `u32::MAX` saturate, with a warning.
    pub fn round_px(value: f64) -> u32 {
        if !(value.is_finite() && value > 0.0) {
            return 0;
        }
        let rounded = value.round();
        if rounded > f64::from(u32::MAX) {
            log::warn!("Canvas extent {} exceeds {} px; saturating", rounded, u32::MAX);
            return u32::MAX;
        }
        rounded as u32
    }
}

/// Vertical-forms stylistic set; forced last, suppressed in vertical text
pub const VERTICAL_FORMS: &str = "ss01";

/// Banner tile repeated between the caps
pub const FULL_BLOCK: char = '\u{2588}';

/// Banner begin caps shipped with the typeface
pub const BANNER_BEGIN: [char; 9] = [
    '\u{25D6}', '\u{E15A}', '\u{E165}', '\u{E169}', '\u{E16D}', '\u{E175}', '\u{E17D}', '\u{E185}',
    '\u{E171}',
];

/// Banner end caps shipped with the typeface
pub const BANNER_END: [char; 9] = [
    '\u{25D7}', '\u{27A1}', '\u{E166}', '\u{E16A}', '\u{E16E}', '\u{E176}', '\u{E17E}', '\u{E186}',
    '\u{E172}',
];

/// Block shapes shipped with the typeface
pub const BLOCK_SHAPES: [char; 10] = [
    '\u{2B1B}', '\u{2B24}', '\u{E15D}', '\u{E15E}', '\u{E15F}', '\u{E160}', '\u{E181}', '\u{E182}',
    '\u{E183}', '\u{E184}',
];

/// Writing direction of the composition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        self == Orientation::Vertical
    }

    pub fn name(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Orientation {
    type Err = LayerfontError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" | "horz" => Ok(Orientation::Horizontal),
            "vertical" | "v" | "vert" => Ok(Orientation::Vertical),
            other => Err(LayerfontError::Config(format!("unknown orientation: {}", other))),
        }
    }
}

/// One of the four chromatic drawing styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerStyle {
    Shade,
    Outline,
    Regular,
    Inline,
}

impl LayerStyle {
    /// Canonical back-to-front paint order
    pub const PAINT_ORDER: [LayerStyle; 4] = [
        LayerStyle::Shade,
        LayerStyle::Outline,
        LayerStyle::Regular,
        LayerStyle::Inline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerStyle::Shade => "shade",
            LayerStyle::Outline => "outline",
            LayerStyle::Regular => "regular",
            LayerStyle::Inline => "inline",
        }
    }

    /// Capitalized form used in resource file names
    pub fn title(self) -> &'static str {
        match self {
            LayerStyle::Shade => "Shade",
            LayerStyle::Outline => "Outline",
            LayerStyle::Regular => "Regular",
            LayerStyle::Inline => "Inline",
        }
    }

    pub fn default_color(self) -> Color {
        match self {
            LayerStyle::Shade => Color::rgb(0x51, 0x36, 0x20),
            LayerStyle::Outline => Color::rgb(0xb2, 0xc0, 0x21),
            LayerStyle::Regular => Color::rgb(0xff, 0xff, 0xff),
            LayerStyle::Inline => Color::rgb(0x7e, 0x14, 0x14),
        }
    }

    /// Position in [`LayerStyle::PAINT_ORDER`]
    pub fn paint_rank(self) -> usize {
        match self {
            LayerStyle::Shade => 0,
            LayerStyle::Outline => 1,
            LayerStyle::Regular => 2,
            LayerStyle::Inline => 3,
        }
    }
}

impl fmt::Display for LayerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerStyle {
    type Err = LayerfontError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shade" => Ok(LayerStyle::Shade),
            "outline" => Ok(LayerStyle::Outline),
            "regular" => Ok(LayerStyle::Regular),
            "inline" => Ok(LayerStyle::Inline),
            other => Err(LayerfontError::Config(format!("unknown layer style: {}", other))),
        }
    }
}

/// Background decoration behind the text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    #[default]
    None,
    /// One shape glyph per character
    Block(char),
    /// Optional caps around a run of full-block tiles
    Banner {
        begin: Option<char>,
        end: Option<char>,
    },
}

impl Decoration {
    pub fn is_block(&self) -> bool {
        matches!(self, Decoration::Block(_))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Decoration::None)
    }

    /// Codepoints this decoration draws, in subset order
    pub fn glyphs(&self) -> Vec<char> {
        match *self {
            Decoration::None => Vec::new(),
            Decoration::Block(shape) => vec![shape],
            Decoration::Banner { begin, end } => {
                begin.into_iter().chain(end).chain(Some(FULL_BLOCK)).collect()
            },
        }
    }
}

/// Simple RGBA color that works everywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Lowercase `#rrggbb`, alpha dropped
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}
