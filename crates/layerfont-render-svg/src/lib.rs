//! SVG serializer: where the draw list becomes a document
//!
//! Every distinct (style, glyph) outline is written once into `<defs>`;
//! each draw item is then a `<use>` of that definition with its own
//! transform and fill. Vertical compositions are wrapped in a single
//! quarter-turn group, so the document's width and height come out swapped.
//!
//! ```text
//! <svg width height viewBox>
//!   <!-- request text -->
//!   <defs> <path id="regular-u0041" d=.../> ... </defs>
//!   [<g transform="translate(H,0) rotate(90)">]
//!     <use xlink:href="#regular-u0041" transform="matrix(s 0 0 -s x y)" fill=.../>
//!   [</g>]
//! </svg>
//! ```

pub mod node;

use kurbo::Affine;
use layerfont_core::types::round_px;
use layerfont_shape::{DrawItem, DrawList};
use node::{format_number, Element, Node};
use std::collections::HashSet;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Turns a [`DrawList`] into SVG text
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgSerializer {
    pretty: bool,
}

impl SvgSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented, one element per line
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Build the document tree without writing it out
    pub fn document(&self, list: &DrawList, comment: Option<&str>) -> Element {
        let (width, height) = list.pixel_size();
        let mut svg = Element::new("svg")
            .attr("xmlns", SVG_NS)
            .attr("xmlns:xlink", XLINK_NS)
            .attr("version", "1.1")
            .attr("width", width.to_string())
            .attr("height", height.to_string())
            .attr("viewBox", format!("0 0 {} {}", width, height));

        if let Some(text) = comment {
            svg.push(Node::Comment(text.to_string()));
        }

        let mut defs = Element::new("defs");
        let mut defined = HashSet::new();
        let mut body = if list.orientation.is_vertical() {
            // Unrotated height becomes the displayed width
            let turn = round_px(list.height);
            Element::new("g").attr("transform", format!("translate({},0) rotate(90)", turn))
        } else {
            Element::new("g")
        };

        for item in list.items.iter().filter(|item| !item.path.trim().is_empty()) {
            let id = definition_id(item);
            if defined.insert(id.clone()) {
                defs.push(Element::new("path").attr("id", id.clone()).attr("d", item.path.to_string()));
            }
            body.push(placement(item, &id));
        }

        if !defs.is_empty() {
            svg.push(defs);
        }
        if list.orientation.is_vertical() {
            if !body.is_empty() {
                svg.push(body);
            }
        } else {
            for child in body.children() {
                svg.push(child.clone());
            }
        }
        svg
    }

    /// Serialize a draw list, optionally embedding `comment`
    pub fn serialize(&self, list: &DrawList, comment: Option<&str>) -> String {
        let document = self.document(list, comment);
        let mut out = String::with_capacity(256 + list.len() * 96);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        out.push('\n');
        document.write(&mut out, self.pretty);

        log::debug!(
            "Serialized {} draw items into {} bytes of SVG",
            list.len(),
            out.len()
        );
        out
    }
}

fn definition_id(item: &DrawItem) -> String {
    format!("{}-{}", item.style, item.glyph.label())
}

fn placement(item: &DrawItem, id: &str) -> Element {
    let transform = Affine::translate((item.x, item.y)) * Affine::scale_non_uniform(item.scale, -item.scale);
    let coeffs: Vec<String> = transform.as_coeffs().iter().map(|c| format_number(*c)).collect();

    let mut element = Element::new("use")
        .attr("xlink:href", format!("#{}", id))
        .attr("transform", format!("matrix({})", coeffs.join(" ")))
        .attr("fill", item.color.to_hex());
    if !item.color.is_opaque() {
        element = element.attr("fill-opacity", format_number(item.color.opacity()));
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerfont_core::types::{GlyphId, LayerRole};
    use layerfont_core::{Color, LayerStyle, Orientation};
    use std::sync::Arc;

    fn item(style: LayerStyle, ch: char, x: f64) -> DrawItem {
        DrawItem {
            style,
            role: LayerRole::Text,
            glyph: GlyphId::Char(ch),
            path: Arc::from("M0 0h500v700h-500z"),
            x,
            y: 80.0,
            scale: 0.1,
            color: style.default_color(),
        }
    }

    fn list(orientation: Orientation, items: Vec<DrawItem>) -> DrawList {
        DrawList {
            orientation,
            width: 199.6,
            height: 120.2,
            items,
        }
    }

    #[test]
    fn test_defs_are_shared() {
        let items = vec![
            item(LayerStyle::Regular, 'A', 20.0),
            item(LayerStyle::Regular, 'A', 80.0),
            item(LayerStyle::Inline, 'A', 20.0),
        ];
        let svg = SvgSerializer::new().serialize(&list(Orientation::Horizontal, items), None);

        assert_eq!(svg.matches("<path ").count(), 2);
        assert_eq!(svg.matches("<use ").count(), 3);
        assert!(svg.contains(r#"id="regular-u0041""#));
        assert!(svg.contains(r#"id="inline-u0041""#));
        assert!(svg.contains(r##"xlink:href="#regular-u0041" transform="matrix(0.1 0 0 -0.1 80 80)" fill="#ffffff""##));
        assert!(svg.contains(r#"width="200" height="120" viewBox="0 0 200 120""#));
    }

    #[test]
    fn test_vertical_rotates_once() {
        let svg = SvgSerializer::new().serialize(
            &list(Orientation::Vertical, vec![item(LayerStyle::Shade, 'B', 20.0)]),
            None,
        );
        assert!(svg.contains(r#"width="120" height="200""#));
        assert_eq!(svg.matches("rotate(90)").count(), 1);
        assert!(svg.contains(r#"<g transform="translate(120,0) rotate(90)">"#));
    }

    #[test]
    fn test_comment_is_neutralized() {
        let svg = SvgSerializer::new().serialize(
            &list(Orientation::Horizontal, vec![item(LayerStyle::Regular, 'A', 0.0)]),
            Some("x --> <svg onload=alert(1)>"),
        );
        assert_eq!(svg.matches("-->").count(), 1);
        assert_eq!(svg.matches("<svg").count(), 2);
        assert!(svg.contains("<!-- x - -> <svg onload=alert(1)> -->"));
    }

    #[test]
    fn test_empty_outlines_are_skipped() {
        let mut space = item(LayerStyle::Regular, ' ', 0.0);
        space.path = Arc::from("");
        let svg = SvgSerializer::new().serialize(&list(Orientation::Horizontal, vec![space]), None);
        assert!(!svg.contains("<use"));
        assert!(!svg.contains("<defs"));
    }

    #[test]
    fn test_translucent_fill() {
        let mut ghost = item(LayerStyle::Regular, 'A', 0.0);
        ghost.color = Color::rgba(255, 0, 0, 128);
        let svg = SvgSerializer::new().serialize(&list(Orientation::Horizontal, vec![ghost]), None);
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="0.502""##));
    }

    #[test]
    fn test_pretty_output() {
        let items = vec![item(LayerStyle::Regular, 'A', 20.0)];
        let compact = SvgSerializer::new().serialize(&list(Orientation::Horizontal, items.clone()), None);
        let pretty = SvgSerializer::new()
            .pretty(true)
            .serialize(&list(Orientation::Horizontal, items), None);

        assert_eq!(compact.lines().count(), 2);
        assert!(pretty.lines().count() > 4);
        assert!(pretty.contains("\n  <defs>\n    <path "));
        assert_eq!(compact.replace(['\n', ' '], ""), pretty.replace(['\n', ' '], ""));
    }
}
