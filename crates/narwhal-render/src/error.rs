pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] narwhal_core::Error),

    #[error("unknown {kind} strategy: {name:?}")]
    UnknownStrategy { kind: &'static str, name: String },

    #[error("unknown preset: {name:?}")]
    UnknownPreset { name: String },

    #[error("unknown renderer: {name:?}")]
    UnknownRenderer { name: String },

    #[error("invalid scale range [{min}, {max}]: expected 0 < min <= max")]
    InvalidScaleRange { min: f64, max: f64 },

    #[error("node ids exhausted")]
    IdsExhausted,

    #[error("options JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
