//! JSON export format
//!
//! Dumps the positioned layout instead of the drawing, for inspection and
//! for comparing layouts in tests.

use layerfont_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::{LayoutResult, RenderedDocument},
};
use serde::Serialize;

/// Layout dump exporter
///
/// ```ignore
/// use layerfont_export::JsonExporter;
///
/// let json = JsonExporter::with_pretty_print().export(&document)?;
/// println!("{}", String::from_utf8_lossy(&json));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty_print() -> Self {
        Self { pretty: true }
    }
}

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&self, document: &RenderedDocument) -> Result<Vec<u8>> {
        let output = JsonOutput {
            width: document.width,
            height: document.height,
            layout: &document.layout,
        };
        let json = if self.pretty {
            serde_json::to_vec_pretty(&output)
        } else {
            serde_json::to_vec(&output)
        }
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
        Ok(json)
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}

/// Displayed size next to the full layout
#[derive(Serialize)]
struct JsonOutput<'a> {
    width: u32,
    height: u32,
    layout: &'a LayoutResult,
}
