//! Turning loosely-typed request parameters into a [`LayoutRequest`]
//!
//! Nothing here fails: a missing or malformed value falls back to its
//! default, so any parameter set yields a renderable request.

use crate::{Color, Decoration, LayerStyle, Orientation, VERTICAL_FORMS};
use percent_encoding::percent_decode_str;
use std::collections::BTreeSet;

/// Text used when the request has none
pub const DEFAULT_TEXT: &str = "Hello!";

/// Point size used when the request has none
pub const DEFAULT_SIZE: u32 = 144;

/// Largest point size a parameter can ask for; larger values are clamped
pub const MAX_SIZE: u32 = 10_000;

/// Color assigned to one requested layer style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerSpec {
    pub style: LayerStyle,
    pub color: Color,
}

/// A single render request, owned by one call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutRequest {
    pub text: String,
    pub size: u32,
    pub orientation: Orientation,
    /// Requested text layers, in paint order
    pub layers: Vec<LayerSpec>,
    /// Fill of the decoration behind the text
    pub background: Color,
    /// Enabled stylistic sets, normalized for the orientation
    pub stylistic_sets: Vec<String>,
    pub decoration: Decoration,
    /// Legacy mode: upper-case the text before resolution
    pub uppercase: bool,
    /// Pretty-printed output, caches bypassed
    pub debug: bool,
}

impl Default for LayoutRequest {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            size: DEFAULT_SIZE,
            orientation: Orientation::Horizontal,
            layers: default_layers(),
            background: LayerStyle::Shade.default_color(),
            stylistic_sets: normalize_stylistic_sets(std::iter::empty::<&str>(), Orientation::Horizontal),
            decoration: Decoration::None,
            uppercase: false,
            debug: false,
        }
    }
}

impl LayoutRequest {
    /// Build a request from `(key, value)` pairs, defaulting anything unusable
    ///
    /// Recognized keys: `text`, `size`, `orientation` (or `vertical=1`),
    /// `layers[<style>]` or `<style>` for colors, `background`, `ss`,
    /// `block`, `begin`, `end`, `uppercase`, `debug`. Unknown keys are ignored.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        let mut colors: Vec<LayerSpec> = Vec::new();
        let mut sets: Vec<String> = Vec::new();
        let mut block = None;
        let mut begin = None;
        let mut end = None;

        for (key, value) in params {
            let key = key.as_ref().trim();
            let value = value.as_ref();
            match key {
                "text" => {
                    if !value.is_empty() {
                        request.text = value.to_string();
                    }
                },
                "size" => {
                    if let Some(size) = parse_size(value) {
                        request.size = size;
                    }
                },
                "orientation" => {
                    if let Ok(orientation) = value.parse() {
                        request.orientation = orientation;
                    }
                },
                "vertical" => {
                    if is_truthy(value) {
                        request.orientation = Orientation::Vertical;
                    }
                },
                "background" => {
                    if let Some(color) = Color::from_hex(value) {
                        request.background = color;
                    }
                },
                "ss" => sets.extend(value.split(',').map(str::to_string)),
                "block" => block = parse_glyph_ref(value),
                "begin" => begin = parse_glyph_ref(value),
                "end" => end = parse_glyph_ref(value),
                "uppercase" => request.uppercase = is_truthy(value),
                "debug" => request.debug = is_truthy(value),
                _ => {
                    if let Some(style) = layer_key(key) {
                        let color = Color::from_hex(value).unwrap_or_else(|| style.default_color());
                        colors.retain(|spec| spec.style != style);
                        colors.push(LayerSpec { style, color });
                    } else {
                        log::debug!("Ignoring unknown request parameter: {}", key);
                    }
                },
            }
        }

        if !colors.is_empty() {
            colors.sort_by_key(|spec| spec.style.paint_rank());
            request.layers = colors;
        }

        request.decoration = match (block, begin, end) {
            (Some(shape), _, _) => Decoration::Block(shape),
            (None, None, None) => Decoration::None,
            (None, begin, end) => Decoration::Banner { begin, end },
        };

        request.stylistic_sets =
            normalize_stylistic_sets(sets.iter().map(String::as_str), request.orientation);
        request
    }

    /// The text as the resolver should see it
    pub fn chars(&self) -> Vec<char> {
        if self.uppercase {
            self.text.to_uppercase().chars().collect()
        } else {
            self.text.chars().collect()
        }
    }

    pub fn has_layer(&self, style: LayerStyle) -> bool {
        self.layers.iter().any(|spec| spec.style == style)
    }

    pub fn color_of(&self, style: LayerStyle) -> Option<Color> {
        self.layers.iter().find(|spec| spec.style == style).map(|spec| spec.color)
    }
}

/// Decoded `key=value` pairs of a raw query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    /// Split and percent-decode `a=1&b=two+words`
    pub fn parse_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let pairs = query
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (key, value) = part.split_once('=').unwrap_or((part, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_request(self) -> LayoutRequest {
        LayoutRequest::from_params(self.pairs)
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// All four styles with their default colors, back to front
pub fn default_layers() -> Vec<LayerSpec> {
    LayerStyle::PAINT_ORDER
        .iter()
        .map(|&style| LayerSpec {
            style,
            color: style.default_color(),
        })
        .collect()
}

/// Deduplicate and sort set ids, then place the vertical-forms set
///
/// Horizontal requests always end with [`VERTICAL_FORMS`]; vertical requests
/// never contain it because the rotated outlines already use those forms.
pub fn normalize_stylistic_sets<'a>(
    raw: impl IntoIterator<Item = &'a str>,
    orientation: Orientation,
) -> Vec<String> {
    let unique: BTreeSet<String> = raw
        .into_iter()
        .map(|id| id.trim().to_ascii_lowercase())
        .filter(|id| !id.is_empty() && id != VERTICAL_FORMS)
        .collect();
    let mut sets: Vec<String> = unique.into_iter().collect();
    if !orientation.is_vertical() {
        sets.push(VERTICAL_FORMS.to_string());
    }
    sets
}

/// A positive pixel size, clamped to [`MAX_SIZE`]
fn parse_size(value: &str) -> Option<u32> {
    let value = value.trim();
    let size = match value.parse::<u64>() {
        Ok(size) => size,
        // Too many digits for u64 is still a huge positive size
        Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => u64::MAX,
        Err(_) => return None,
    };
    if size == 0 {
        return None;
    }
    if size > u64::from(MAX_SIZE) {
        log::debug!("Clamping size {} to {}", value, MAX_SIZE);
    }
    Some(size.min(u64::from(MAX_SIZE)) as u32)
}

/// Read a glyph reference: `57690`, `U+E15A`, `0xE15A`, or a single character
pub fn parse_glyph_ref(value: &str) -> Option<char> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let hex = value
        .strip_prefix("U+")
        .or_else(|| value.strip_prefix("u+"))
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"));
    if let Some(hex) = hex {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse::<u32>().ok().and_then(char::from_u32);
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

fn layer_key(key: &str) -> Option<LayerStyle> {
    let name = key
        .strip_prefix("layers[")
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(key);
    name.parse().ok()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | ""
    )
}
