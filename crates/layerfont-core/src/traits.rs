//! The seams where layerfont meets the outside world
//!
//! - [`ResourceSource`] - hands over raw outline-table bytes per style and orientation
//! - [`Exporter`] - turns a finished document into the bytes a caller asked for

use crate::{error::Result, types::RenderedDocument, LayerStyle, Orientation};

/// Where outline tables come from
///
/// Implementations only fetch bytes; parsing and caching happen upstream.
///
/// ```ignore
/// struct Embedded;
///
/// impl ResourceSource for Embedded {
///     fn name(&self) -> &'static str {
///         "embedded"
///     }
///
///     fn load(&self, style: LayerStyle, orientation: Orientation) -> Result<Vec<u8>> {
///         Ok(include_bytes!("Regular.svg").to_vec())
///     }
/// }
/// ```
pub trait ResourceSource: Send + Sync {
    /// Used in logs
    fn name(&self) -> &'static str;

    /// Raw outline-table bytes for one layer style
    ///
    /// Vertical orientation selects the rotated resource variant.
    fn load(&self, style: LayerStyle, orientation: Orientation) -> Result<Vec<u8>>;
}

/// The final step: a document becomes bytes
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Encode the rendered document
    fn export(&self, document: &RenderedDocument) -> Result<Vec<u8>>;

    /// File extension for this format
    fn extension(&self) -> &'static str;

    /// MIME type for this format
    fn mime_type(&self) -> &'static str;
}
