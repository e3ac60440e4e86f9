//! Command-line argument definitions

use clap::{ArgAction, Parser, Subcommand};
use layerfont::export::OutputFormat;
use std::path::PathBuf;

/// Layerfont - chromatic layered lettering from the command line
#[derive(Parser, Debug)]
#[command(name = "layerfont")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug-level logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render text to a layered SVG (or a converted format)
    #[command(alias = "r")]
    Render(Box<RenderArgs>),

    /// Display layer styles, decorations, formats and stylistic sets
    #[command(alias = "i")]
    Info(InfoArgs),
}

/// Where outline tables and substitutions come from; overrides `LAYERFONT_*`
#[derive(clap::Args, Debug, Default)]
pub struct ResourceArgs {
    /// Directory holding the outline tables
    #[arg(long = "font-dir")]
    pub font_dir: Option<PathBuf>,

    /// File-name prefix of the outline tables
    #[arg(long = "family")]
    pub family: Option<String>,

    /// Stylistic-set substitution table (JSON)
    #[arg(long = "gsub")]
    pub gsub: Option<PathBuf>,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Text to render; `\u{E15A}` escapes are decoded (reads stdin if omitted)
    pub text: Option<String>,

    /// Raw request query, e.g. `text=Hi&size=72&ss=ss02`; other flags override it
    #[arg(long = "query")]
    pub query: Option<String>,

    /// Font size in pixels
    #[arg(short = 's', long = "size")]
    pub size: Option<u32>,

    /// Stack glyphs top to bottom
    #[arg(long = "vertical")]
    pub vertical: bool,

    /// Layer to draw, as `style` or `style=RRGGBB[AA]` (repeatable)
    #[arg(short = 'l', long = "layer", action = ArgAction::Append)]
    pub layers: Vec<String>,

    /// Decoration fill (RRGGBB or RRGGBBAA)
    #[arg(short = 'b', long = "background")]
    pub background: Option<String>,

    /// Stylistic sets to enable (comma separated or repeated)
    #[arg(long = "ss", value_delimiter = ',', action = ArgAction::Append)]
    pub stylistic_sets: Vec<String>,

    /// Block shape behind every character (codepoint, U+XXXX or the glyph)
    #[arg(long = "block", conflicts_with_all = ["begin", "end"])]
    pub block: Option<String>,

    /// Banner start cap
    #[arg(long = "begin")]
    pub begin: Option<String>,

    /// Banner end cap
    #[arg(long = "end")]
    pub end: Option<String>,

    /// Upper-case the text first
    #[arg(long = "uppercase")]
    pub uppercase: bool,

    /// Pretty-printed output, caches bypassed
    #[arg(long = "debug")]
    pub debug: bool,

    /// Output format: svg, json, png, pdf (defaults from the output extension)
    #[arg(short = 'O', long = "format")]
    pub format: Option<OutputFormat>,

    /// Output file path (stdout if omitted)
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    #[command(flatten)]
    pub resources: ResourceArgs,

    /// Program turning SVG into PNG/PDF (reads stdin, writes stdout)
    #[arg(long = "converter")]
    pub converter: Option<PathBuf>,

    /// Disable the document cache
    #[arg(long = "no-cache", action = ArgAction::SetTrue)]
    pub no_cache: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// List layer styles and their default colors
    #[arg(long)]
    pub styles: bool,

    /// List decoration glyphs
    #[arg(long)]
    pub decorations: bool,

    /// List output formats
    #[arg(long)]
    pub formats: bool,

    /// List stylistic sets in the substitution table
    #[arg(long)]
    pub sets: bool,

    #[command(flatten)]
    pub resources: ResourceArgs,
}
