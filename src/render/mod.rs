//! Markdown to terminal text.
//!
//! The pager and the markdown formatter only depend on the [`Renderer`]
//! trait; [`TermRenderer`] is the implementation used at runtime.

pub mod style;
pub mod terminal;

pub use style::{Palette, Role};
pub use terminal::TermRenderer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("wrap width {width} is below the minimum of {min} columns")]
    TooNarrow { width: usize, min: usize },

    #[error("{0}")]
    Failed(String),
}

/// Turns a markdown document into display-ready text.
pub trait Renderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}
