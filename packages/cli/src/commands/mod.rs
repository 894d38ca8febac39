pub mod css_vars;
pub mod init;
pub mod render;
pub mod validate;

pub use css_vars::{css_vars, CssVarsArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use mailcraft_document::{load_template, LoadedTemplate};
use std::path::Path;

/// Read, validate and migrate a template file
pub(crate) fn read_template(path: &Path) -> Result<LoadedTemplate> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    load_template(&json).with_context(|| format!("Invalid template {}", path.display()))
}
