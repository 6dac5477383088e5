use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown brand tier: '{value}'")]
    UnknownTier { value: String },

    #[error("No tier recorded for brand '{brand_id}' at store '{store_id}', and no default configured")]
    MissingTier { store_id: String, brand_id: String },

    #[error("Invalid month: {month} (expected 1..=12)")]
    InvalidMonth { month: u32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RagResult<T> = Result<T, EngineError>;
