//! Info command implementation
//!
//! Lists what a request can ask for.

use crate::cli::InfoArgs;
use anyhow::Result;
use layerfont::export::OutputFormat;
use layerfont::{LayerStyle, BANNER_BEGIN, BANNER_END, BLOCK_SHAPES, FULL_BLOCK};

pub fn run(args: &InfoArgs) -> Result<()> {
    // If no specific flags, show all info
    let show_all = !args.styles && !args.decorations && !args.formats && !args.sets;
    let mut sections: Vec<Vec<String>> = Vec::new();

    if show_all || args.styles {
        sections.push(styles());
    }
    if show_all || args.decorations {
        sections.push(decorations());
    }
    if show_all || args.formats {
        sections.push(formats());
    }
    if show_all || args.sets {
        sections.push(sets(args));
    }

    println!("Layerfont v{}", env!("CARGO_PKG_VERSION"));
    for section in sections {
        println!();
        for line in section {
            println!("{}", line);
        }
    }
    Ok(())
}

fn styles() -> Vec<String> {
    let mut lines = vec!["Layer styles (back to front):".to_string()];
    lines.extend(
        LayerStyle::PAINT_ORDER
            .iter()
            .map(|style| format!("  {:<10} default {}", style.name(), style.default_color().to_hex())),
    );
    lines
}

fn glyph_list(glyphs: &[char]) -> String {
    glyphs
        .iter()
        .map(|ch| format!("U+{:04X}", *ch as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

fn decorations() -> Vec<String> {
    vec![
        "Decorations:".to_string(),
        format!("  block      {}", glyph_list(&BLOCK_SHAPES)),
        format!("  begin      {}", glyph_list(&BANNER_BEGIN)),
        format!("  end        {}", glyph_list(&BANNER_END)),
        format!("  banner tile U+{:04X}", FULL_BLOCK as u32),
    ]
}

fn formats() -> Vec<String> {
    let mut lines = vec!["Output formats:".to_string()];
    for format in [OutputFormat::Svg, OutputFormat::Json, OutputFormat::Png, OutputFormat::Pdf] {
        let note = if format.needs_converter() { " (needs --converter)" } else { "" };
        lines.push(format!("  {:<10} {}{}", format.extension(), format.mime_type(), note));
    }
    lines
}

fn sets(args: &InfoArgs) -> Vec<String> {
    let table = super::settings(&args.resources).substitutions();
    let mut lines = vec!["Stylistic sets:".to_string()];
    if table.is_empty() {
        lines.push("  (none loaded - set LAYERFONT_GSUB or pass --gsub)".to_string());
    }
    lines.extend(
        table
            .set_ids()
            .map(|id| format!("  {:<10} {} substitutions", id, table.set_len(id))),
    );
    lines
}
