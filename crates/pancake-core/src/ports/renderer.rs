/// Content renderer - turns raw markup into safe HTML.
///
/// Implementations must be pure: the same input always yields the same HTML.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, raw: &str) -> Result<String, RenderError>;
}

/// Rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Rendering failed: {0}")]
    Failed(String),
}
