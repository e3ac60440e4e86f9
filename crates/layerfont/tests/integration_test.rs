//! Whole-pipeline tests over in-memory outline tables

use layerfont::export::{JsonExporter, SvgExporter};
use layerfont::prelude::*;
use layerfont::types::GlyphId;

const FONT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><defs>
<font id="Test" horiz-adv-x="500">
<font-face units-per-em="1000" ascent="800" descent="-200"/>
<missing-glyph horiz-adv-x="500" d="M0 0h500v700h-500z"/>
<glyph unicode=" " horiz-adv-x="250"/>
<glyph unicode="A" horiz-adv-x="600" d="M0 0l300 700l300 -700z"/>
<glyph unicode="B" horiz-adv-x="500" d="M0 0v700h500v-700z"/>
<glyph unicode="C" horiz-adv-x="700" d="M0 0h700v700h-700z"/>
<glyph unicode="&#x2588;" horiz-adv-x="1000" d="M0 -200v1000h1000v-1000z"/>
<glyph unicode="&#x2B1B;" horiz-adv-x="1280" d="M0 -200v1000h1280v-1000z"/>
<glyph unicode="&#x25D6;" horiz-adv-x="300" d="M300 -200v1000a500 500 0 0 1 0 -1000z"/>
<glyph unicode="&#x25D7;" horiz-adv-x="300" d="M0 -200v1000a500 500 0 0 0 0 -1000z"/>
<hkern u1="A" u2="B" k="50"/>
</font></defs></svg>"#;

fn full_source() -> MemorySource {
    let source = MemorySource::new();
    for style in LayerStyle::PAINT_ORDER {
        source.insert(style, Orientation::Horizontal, FONT);
        source.insert(style, Orientation::Vertical, FONT);
    }
    source
}

fn pipeline_over(source: MemorySource) -> Pipeline {
    Pipeline::builder()
        .source(Arc::new(source))
        .substitutions(SubstitutionTable::new().with("ss02", [('A', 'C')]))
        .build()
        .unwrap()
}

fn only(style: LayerStyle) -> Vec<LayerSpec> {
    vec![LayerSpec {
        style,
        color: style.default_color(),
    }]
}

fn request(text: &str, size: u32) -> LayoutRequest {
    LayoutRequest {
        text: text.to_string(),
        size,
        layers: only(LayerStyle::Regular),
        ..LayoutRequest::default()
    }
}

#[test]
fn test_kerned_pair_end_to_end() {
    let pipeline = pipeline_over(full_source());
    let document = pipeline.render(&request("AB", 1000)).unwrap();

    assert_eq!(document.layout.text[0].advance, 1050.0);
    assert_eq!((document.width, document.height), (1286, 1236));
    assert!(document.svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(document.svg.contains(r#"width="1286" height="1236" viewBox="0 0 1286 1236""#));
    assert!(document.svg.contains("<!-- AB -->"));
    assert_eq!(document.svg.matches("<use ").count(), 2);
}

#[test]
fn test_default_colors_in_paint_order() {
    let pipeline = pipeline_over(full_source());
    let request = LayoutRequest {
        text: "A".to_string(),
        ..LayoutRequest::default()
    };
    let svg = &pipeline.render(&request).unwrap().svg;

    let fills: Vec<usize> = ["#513620", "#b2c021", "#ffffff", "#7e1414"]
        .iter()
        .map(|hex| svg.find(&format!(r#"fill="{}""#, hex)).unwrap())
        .collect();
    assert!(fills.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_block_tiles_one_shape_per_character() {
    let pipeline = pipeline_over(full_source());
    let request = LayoutRequest {
        decoration: Decoration::Block('\u{2B1B}'),
        ..request("ABC", 100)
    };
    let document = pipeline.render(&request).unwrap();

    assert_eq!(document.svg.matches(r##"xlink:href="#regular-u2B1B""##).count(), 3);
    // Text is drawn over the shapes
    let last_shape = document.svg.rfind("u2B1B\"").unwrap();
    let first_letter = document.svg.find(r##"xlink:href="#regular-u0041""##).unwrap();
    assert!(last_shape < first_letter);
}

#[test]
fn test_vertical_swaps_dimensions() {
    let pipeline = pipeline_over(full_source());
    let horizontal = pipeline.render(&request("AB", 1000)).unwrap();
    let vertical = pipeline
        .render(&LayoutRequest {
            orientation: Orientation::Vertical,
            ..request("AB", 1000)
        })
        .unwrap();

    assert_eq!((vertical.width, vertical.height), (horizontal.height, horizontal.width));
    assert!(vertical.svg.contains(r#"<g transform="translate(1236,0) rotate(90)">"#));
}

#[test]
fn test_vertical_request_skips_vertical_forms() {
    let pipeline = Pipeline::builder()
        .source(Arc::new(full_source()))
        .substitutions(SubstitutionTable::new().with("ss01", [('A', 'C')]))
        .build()
        .unwrap();
    // Built field by field, so the default sets still name ss01
    let vertical = LayoutRequest {
        orientation: Orientation::Vertical,
        ..request("A", 100)
    };
    assert!(vertical.stylistic_sets.iter().any(|set| set == "ss01"));

    let layout = pipeline.layout(&vertical);
    assert_eq!(layout.text[0].placements[0].glyph, GlyphId::Char('A'));
    let layout = pipeline.layout(&request("A", 100));
    assert_eq!(layout.text[0].placements[0].glyph, GlyphId::Char('C'));
}

#[test]
fn test_rendering_is_deterministic() {
    let first = pipeline_over(full_source()).render(&request("ABBA", 72)).unwrap();
    let second = pipeline_over(full_source()).render(&request("ABBA", 72)).unwrap();
    assert_eq!(first.svg, second.svg);
}

#[test]
fn test_substitution_matches_direct_text() {
    let pipeline = pipeline_over(full_source());
    let substituted = pipeline.layout(&LayoutRequest {
        stylistic_sets: vec!["ss02".to_string()],
        ..request("AB", 200)
    });
    let direct = pipeline.layout(&request("CB", 200));
    assert_eq!(substituted, direct);
}

#[test]
fn test_no_tables_is_an_empty_render() {
    let pipeline = pipeline_over(MemorySource::new());
    let err = pipeline.render(&LayoutRequest::default()).unwrap_err();
    assert!(matches!(err, LayerfontError::EmptyRender));
}

#[test]
fn test_missing_layer_degrades() {
    let source = MemorySource::new().with(LayerStyle::Regular, Orientation::Horizontal, FONT);
    let pipeline = pipeline_over(source);
    let document = pipeline.render(&LayoutRequest::default()).unwrap();

    assert!(document.svg.contains("regular-"));
    assert!(!document.svg.contains("shade-"));
    assert!(!document.svg.contains("inline-"));
}

#[test]
fn test_document_cache() {
    let pipeline = pipeline_over(full_source());
    let request = request("AB", 48);

    let first = pipeline.render(&request).unwrap();
    let second = pipeline.render(&request).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let (tables, documents) = pipeline.cache_stats();
    assert_eq!(documents.hits, 1);
    assert_eq!(documents.misses, 1);
    assert_eq!(tables.entries, 1);

    pipeline.clear_caches();
    let third = pipeline.render(&request).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(first.svg, third.svg);
}

#[test]
fn test_debug_is_pretty_and_uncached() {
    let pipeline = pipeline_over(full_source());
    let plain = pipeline.render(&request("AB", 48)).unwrap();
    let debug_request = LayoutRequest {
        debug: true,
        ..request("AB", 48)
    };
    let first = pipeline.render(&debug_request).unwrap();
    let second = pipeline.render(&debug_request).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(first.svg.lines().count() > plain.svg.lines().count());
    assert_eq!(pipeline.cache_stats().1.entries, 1);
}

#[test]
fn test_render_query() {
    let pipeline = pipeline_over(full_source());
    let document = pipeline
        .render_query("text=A+B&size=100&layers[inline]=ff0000&vertical=0")
        .unwrap();

    assert!(document.svg.contains("<!-- A B -->"));
    assert!(document.svg.contains(r##"fill="#ff0000""##));
    assert!(!document.svg.contains("regular-"));
}

#[test]
fn test_exports() {
    let pipeline = pipeline_over(full_source());
    let request = request("AB", 100);

    let svg = pipeline.export(&request, &SvgExporter::new()).unwrap();
    assert_eq!(svg, pipeline.render(&request).unwrap().svg.as_bytes());

    let json = pipeline.export(&request, &JsonExporter::new()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["width"], 161);
    assert_eq!(value["height"], 156);
    assert_eq!(value["layout"]["text"][0]["style"], "regular");
    assert_eq!(value["layout"]["text"][0]["placements"].as_array().unwrap().len(), 2);
}

#[test]
fn test_settings_pipeline_reads_directory() {
    let dir = std::env::temp_dir().join(format!("layerfont-settings-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("Test-Regular.svg"), FONT).unwrap();

    let dir_value = dir.display().to_string();
    let settings = Settings::from_lookup(|key| match key {
        "LAYERFONT_FONT_DIR" => Some(dir_value.clone()),
        "LAYERFONT_FAMILY" => Some("Test".to_string()),
        _ => None,
    });
    let document = settings.pipeline().render(&request("AB", 1000)).unwrap();
    assert_eq!(document.layout.text[0].advance, 1050.0);

    std::fs::remove_dir_all(&dir).ok();
}
