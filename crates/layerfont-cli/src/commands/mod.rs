//! Subcommand implementations

pub mod info;
pub mod render;

use crate::cli::ResourceArgs;
use layerfont::Settings;

/// Environment settings with command-line overrides applied
fn settings(resources: &ResourceArgs) -> Settings {
    let mut settings = Settings::from_env();
    if let Some(dir) = &resources.font_dir {
        settings.font_dir = dir.clone();
    }
    if let Some(family) = &resources.family {
        settings.family = family.clone();
    }
    if let Some(gsub) = &resources.gsub {
        settings.gsub = Some(gsub.clone());
    }
    settings
}
