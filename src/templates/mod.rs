//! Embedded configuration templates and their renderer.

pub mod embedded;
pub mod renderer;

pub use renderer::TemplateRenderer;
