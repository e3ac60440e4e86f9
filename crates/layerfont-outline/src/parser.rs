//! Typed reader for the SVG-font outline tables
//!
//! The grammar is small. Four record kinds matter, everything else is skipped:
//!
//! ```text
//! <font horiz-adv-x=N>                         -> FontMeta (default advance)
//! <font-face units-per-em=N ascent=N descent=N> -> FontMeta (metrics)
//! <missing-glyph horiz-adv-x=N d=PATH>          -> MissingGlyph
//! <glyph unicode=S glyph-name=S horiz-adv-x=N d=PATH>
//!                                               -> Glyph
//! <hkern u1=LIST u2=LIST g1=LIST g2=LIST k=N>   -> Kerning
//! ```

use layerfont_core::error::{ParseError, Result};
use xml::attribute::OwnedAttribute;
use std::ops::RangeInclusive;
use xml::reader::{ParserConfig, XmlEvent};

/// Font-wide metrics; `<font>` and `<font-face>` each fill part of it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontMeta {
    pub default_advance: Option<f64>,
    pub units_per_em: Option<f64>,
    pub ascent: Option<f64>,
    pub descent: Option<f64>,
}

/// One `<glyph>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphDef {
    pub unicode: Option<String>,
    pub name: Option<String>,
    pub advance: Option<f64>,
    pub path: Option<String>,
}

/// The `<missing-glyph>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingGlyphDef {
    pub advance: Option<f64>,
    pub path: Option<String>,
}

/// Glyphs one side of a kerning pair applies to
///
/// `U+XXXX-YYYY` ranges are kept unexpanded; they can span all of Unicode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KernSide {
    pub chars: Vec<char>,
    pub ranges: Vec<RangeInclusive<char>>,
    pub names: Vec<String>,
}

impl KernSide {
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty() && self.ranges.is_empty() && self.names.is_empty()
    }

    /// Whether `ch` is named by a literal or falls in a range
    pub fn covers(&self, ch: char) -> bool {
        self.chars.contains(&ch) || self.ranges.iter().any(|range| range.contains(&ch))
    }
}

/// One `<hkern>` element; `k` is in SVG sense (positive tightens)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KerningDef {
    pub first: KernSide,
    pub second: KernSide,
    pub k: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    FontMeta(FontMeta),
    Glyph(GlyphDef),
    MissingGlyph(MissingGlyphDef),
    Kerning(KerningDef),
}

/// Read every record of an outline table, in document order
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let reader = ParserConfig::new()
        .trim_whitespace(true)
        .ignore_comments(true)
        .create_reader(bytes);

    let mut records = Vec::new();
    for event in reader {
        let event = event.map_err(|e| ParseError::Xml(e.to_string()))?;
        if let XmlEvent::StartElement {
            name, attributes, ..
        } = event
        {
            if let Some(record) = read_element(&name.local_name, &attributes)? {
                records.push(record);
            }
        }
    }

    log::debug!("Parsed {} outline-table records", records.len());
    Ok(records)
}

fn read_element(element: &str, attributes: &[OwnedAttribute]) -> Result<Option<Record>> {
    let attrs = Attributes { element, attributes };
    let record = match element {
        "font" => Record::FontMeta(FontMeta {
            default_advance: attrs.number("horiz-adv-x")?,
            ..FontMeta::default()
        }),
        "font-face" => Record::FontMeta(FontMeta {
            default_advance: None,
            units_per_em: attrs.number("units-per-em")?,
            ascent: attrs.number("ascent")?,
            descent: attrs.number("descent")?,
        }),
        "missing-glyph" => Record::MissingGlyph(MissingGlyphDef {
            advance: attrs.number("horiz-adv-x")?,
            path: attrs.text("d"),
        }),
        "glyph" => Record::Glyph(GlyphDef {
            unicode: attrs.text("unicode"),
            name: attrs.text("glyph-name"),
            advance: attrs.number("horiz-adv-x")?,
            path: attrs.text("d"),
        }),
        "hkern" => Record::Kerning(KerningDef {
            first: attrs.kern_side("u1", "g1"),
            second: attrs.kern_side("u2", "g2"),
            k: attrs.number("k")?.unwrap_or(0.0),
        }),
        _ => return Ok(None),
    };
    Ok(Some(record))
}

struct Attributes<'a> {
    element: &'a str,
    attributes: &'a [OwnedAttribute],
}

impl Attributes<'_> {
    fn text(&self, key: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|attr| attr.name.local_name == key && attr.name.prefix.is_none())
            .map(|attr| attr.value.clone())
    }

    fn kern_side(&self, unicode: &str, names: &str) -> KernSide {
        let (chars, ranges) = self
            .text(unicode)
            .map(|list| parse_unicode_list(&list))
            .unwrap_or_default();
        KernSide {
            chars,
            ranges,
            names: self.text(names).map(|list| split_list(&list)).unwrap_or_default(),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>> {
        let Some(value) = self.text(key) else {
            return Ok(None);
        };
        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(ParseError::InvalidAttribute {
                element: self.element.to_string(),
                attribute: key.to_string(),
                value,
            }
            .into()),
        }
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a `u1`/`u2` list into characters (literal or `U+XXXX`) and
/// `U+XXXX-YYYY` ranges
fn parse_unicode_list(list: &str) -> (Vec<char>, Vec<RangeInclusive<char>>) {
    let mut chars = Vec::new();
    let mut ranges = Vec::new();
    for item in list.split(',') {
        // A literal comma or space can itself be a kerned character
        if item.chars().count() == 1 {
            chars.extend(item.chars());
            continue;
        }
        let item = item.trim();
        let Some(hex) = item.strip_prefix("U+").or_else(|| item.strip_prefix("u+")) else {
            if item.chars().count() == 1 {
                chars.extend(item.chars());
            } else if !item.is_empty() {
                log::debug!("Skipping kerning entry {:?}", item);
            }
            continue;
        };
        let (start, end) = hex.split_once('-').unwrap_or((hex, hex));
        let codepoint = |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        match (codepoint(start), codepoint(end)) {
            (Some(start), Some(end)) if start == end => chars.push(start),
            (Some(start), Some(end)) if start < end => ranges.push(start..=end),
            _ => log::debug!("Skipping kerning range {:?}", item),
        }
    }
    (chars, ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r##"<?xml version="1.0" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg">
<defs>
<font id="Sample" horiz-adv-x="600">
  <font-face font-family="Sample" units-per-em="1000" ascent="860" descent="-140"/>
  <missing-glyph horiz-adv-x="500" d="M0 0h500v700h-500z"/>
  <glyph glyph-name="A" unicode="A" horiz-adv-x="640" d="M0 0L320 700L640 0z"/>
  <glyph glyph-name="space" unicode=" "/>
  <glyph glyph-name="amp" unicode="&amp;" d="M0 0h10"/>
  <hkern u1="A" u2="V,W" k="40"/>
  <hkern g1="A" g2="space" k="-10"/>
</font>
</defs>
</svg>"##;

    #[test]
    fn test_reads_all_record_kinds() {
        let records = parse_records(TABLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 8);

        assert_eq!(
            records[0],
            Record::FontMeta(FontMeta {
                default_advance: Some(600.0),
                ..FontMeta::default()
            })
        );
        match &records[1] {
            Record::FontMeta(meta) => {
                assert_eq!(meta.units_per_em, Some(1000.0));
                assert_eq!(meta.descent, Some(-140.0));
            },
            other => panic!("unexpected record {:?}", other),
        }
        assert!(matches!(records[2], Record::MissingGlyph(_)));
        match &records[5] {
            Record::Glyph(glyph) => assert_eq!(glyph.unicode.as_deref(), Some("&")),
            other => panic!("unexpected record {:?}", other),
        }
        match &records[6] {
            Record::Kerning(kern) => {
                assert_eq!(kern.first.chars, vec!['A']);
                assert_eq!(kern.second.chars, vec!['V', 'W']);
                assert_eq!(kern.k, 40.0);
            },
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let bad = r#"<svg><font><glyph unicode="A" horiz-adv-x="wide"/></font></svg>"#;
        let err = parse_records(bad.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("horiz-adv-x"));
    }

    #[test]
    fn test_rejects_broken_xml() {
        assert!(parse_records(b"<svg><font></svg>").is_err());
    }

    #[test]
    fn test_unicode_lists() {
        assert_eq!(parse_unicode_list("A,B"), (vec!['A', 'B'], vec![]));
        assert_eq!(parse_unicode_list("U+0041-0043"), (vec![], vec!['A'..='C']));
        assert_eq!(parse_unicode_list("U+E15A,U+0041-0041"), (vec!['\u{E15A}', 'A'], vec![]));
        assert_eq!(parse_unicode_list(" "), (vec![' '], vec![]));
        assert_eq!(parse_unicode_list("AB,U+0043-0041,U+D800-D8FF"), (vec![], vec![]));
    }

    #[test]
    fn test_whole_unicode_range_stays_unexpanded() {
        let (chars, ranges) = parse_unicode_list("U+0000-10FFFF");
        assert!(chars.is_empty());
        assert_eq!(ranges, vec!['\0'..='\u{10FFFF}']);

        let side = KernSide {
            ranges,
            ..KernSide::default()
        };
        assert!(side.covers('A'));
        assert!(side.covers('\u{E15A}'));
        assert!(!side.is_empty());
    }
}
