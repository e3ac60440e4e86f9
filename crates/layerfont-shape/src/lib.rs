//! Shaping for layerfont: substitution, layout and composition
//!
//! ```text
//! text ──SubstitutionTable──▶ resolved chars ──LayoutEngine──▶ LayoutResult ──compose──▶ DrawList
//! ```
//!
//! The engine never fails. Layers without usable outlines drop out, missing
//! glyphs fall back to the placeholder, and degenerate decorations are not
//! drawn.

pub mod compose;
pub mod layout;
pub mod substitution;

pub use compose::{compose, DrawItem, DrawList};
pub use layout::{LayerTables, LayoutEngine};
pub use substitution::SubstitutionTable;

#[cfg(test)]
mod proptests;
