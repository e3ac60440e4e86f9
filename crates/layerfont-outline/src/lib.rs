//! Outline tables for layerfont
//!
//! Each layer style ships as an SVG font. This crate parses those files into
//! [`FontTable`]s (outlines, advances, kerning), caches them per style and
//! orientation, and hands out subset copies sized to a single request.

pub mod loader;
pub mod parser;
pub mod source;
pub mod table;

pub use loader::OutlineLoader;
pub use source::{DirectorySource, MemorySource, DEFAULT_FAMILY};
pub use table::{FontTable, GlyphRecord, Subset};
