//! Export module for layerfont
//!
//! Turns a [`RenderedDocument`](layerfont_core::types::RenderedDocument)
//! into the bytes a caller asked for. SVG and the layout JSON are produced
//! in-process; anything else goes through an external converter.

use layerfont_core::{
    error::{ExportError, LayerfontError, Result},
    traits::Exporter,
};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub mod convert;
pub mod json;
pub mod svg;

pub use convert::{ConverterExporter, CONVERTER_ENV};
pub use json::JsonExporter;
pub use svg::SvgExporter;

/// Output formats a render can be delivered in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Json => "application/json",
            OutputFormat::Png => "image/png",
            OutputFormat::Pdf => "application/pdf",
        }
    }

    /// Whether producing this format needs the external converter
    pub fn needs_converter(self) -> bool {
        matches!(self, OutputFormat::Png | OutputFormat::Pdf)
    }

    /// Guess from a file name's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = LayerfontError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(ExportError::FormatNotSupported(other.to_string()).into()),
        }
    }
}

/// The exporter for `format`
///
/// Converter formats need `converter`; without one they fail with
/// [`ExportError::ConverterNotConfigured`].
pub fn exporter_for(
    format: OutputFormat,
    converter: Option<&Path>,
    pretty: bool,
) -> Result<Box<dyn Exporter>> {
    match format {
        OutputFormat::Svg => Ok(Box::new(SvgExporter::new())),
        OutputFormat::Json if pretty => Ok(Box::new(JsonExporter::with_pretty_print())),
        OutputFormat::Json => Ok(Box::new(JsonExporter::new())),
        OutputFormat::Png | OutputFormat::Pdf => match converter {
            Some(program) => Ok(Box::new(ConverterExporter::new(program, format))),
            None => Err(ExportError::ConverterNotConfigured(format.to_string()).into()),
        },
    }
}
