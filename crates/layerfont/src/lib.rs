//! Layerfont - a chromatic multi-layer typesetter
//!
//! Text goes in, a self-contained layered SVG comes out:
//! 1. Substitution through the enabled stylistic sets
//! 2. Outline-table loading, one table per layer style
//! 3. Layout, including block and banner decorations
//! 4. Composition of all color layers into one draw list
//! 5. SVG serialization, optionally followed by an export step
//!
//! # Example
//!
//! ```ignore
//! use layerfont::prelude::*;
//!
//! let pipeline = Settings::from_env().pipeline();
//! let request = LayoutRequest::from_params([("text", "Bungee"), ("size", "96")]);
//! let document = pipeline.render(&request)?;
//! println!("{}", document.svg);
//! ```
//!
//! # Environment
//!
//! See [`settings`] for the `LAYERFONT_*` variables read by
//! [`Settings::from_env`] and [`global`].

pub mod pipeline;
pub mod settings;

pub use layerfont_core::{
    error, traits, types, Color, Decoration, LayerSpec, LayerStyle, LayoutRequest, Orientation,
    RequestParams, BANNER_BEGIN, BANNER_END, BLOCK_SHAPES, FULL_BLOCK, VERTICAL_FORMS,
};
pub use layerfont_export as export;
pub use layerfont_outline as outline;
pub use layerfont_render_svg as render_svg;
pub use layerfont_shape as shape;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use settings::Settings;

use std::sync::OnceLock;

static GLOBAL: OnceLock<Pipeline> = OnceLock::new();

/// Process-wide pipeline configured from the environment on first use
pub fn global() -> &'static Pipeline {
    GLOBAL.get_or_init(|| {
        let settings = Settings::from_env();
        log::info!(
            "Outline tables from {} ({})",
            settings.font_dir.display(),
            settings.family
        );
        settings.pipeline()
    })
}

/// Common imports for typical usage
pub mod prelude {
    pub use crate::{Pipeline, PipelineBuilder, Settings};
    pub use layerfont_core::{
        error::{LayerfontError, Result},
        traits::{Exporter, ResourceSource},
        types::{LayoutResult, RenderedDocument},
        Color, Decoration, LayerSpec, LayerStyle, LayoutRequest, Orientation, RequestParams,
    };
    pub use layerfont_export::OutputFormat;
    pub use layerfont_outline::{DirectorySource, MemorySource};
    pub use layerfont_shape::SubstitutionTable;
    pub use std::sync::Arc;
}
