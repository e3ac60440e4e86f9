//! SVG export format
//!
//! The document is already SVG; this exporter only hands the bytes over.

use layerfont_core::{error::Result, traits::Exporter, types::RenderedDocument};

/// Pass-through exporter for the serialized document
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgExporter;

impl SvgExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for SvgExporter {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn export(&self, document: &RenderedDocument) -> Result<Vec<u8>> {
        Ok(document.svg.as_bytes().to_vec())
    }

    fn extension(&self) -> &'static str {
        "svg"
    }

    fn mime_type(&self) -> &'static str {
        "image/svg+xml"
    }
}
