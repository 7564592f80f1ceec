//! Structured error types for gridview.
//!
//! Invalid gestures (out-of-bounds cells, missing anchors) are silent no-ops
//! and never surface here; these variants cover configuration and
//! widget-surface failures only.

/// All errors that can occur when constructing or driving a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Invalid configuration (zero-size estimates, frozen counts past bounds).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Rendering error reported by a drawer.
    #[error("Render error: {0}")]
    Render(String),

    /// Config JSON could not be deserialized (widget surface).
    #[error("Config parse error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
