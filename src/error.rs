//! Error taxonomy for the eyes core and its browser bindings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EyesError {
    /// Non-positive or non-finite sizes / frame rates handed to a configuring call.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The drawing surface (canvas, 2d context) could not be obtained.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("invalid color '{0}'")]
    InvalidColor(String),
    /// A mood / position / emotion name that does not map to any variant.
    #[error("unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },
    #[cfg(feature = "serde_json")]
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl EyesError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EyesError::InvalidConfiguration(msg.into())
    }
}

impl From<EyesError> for wasm_bindgen::JsValue {
    fn from(err: EyesError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EyesError>;
