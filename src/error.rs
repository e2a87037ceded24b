pub type RaybatchResult<T> = Result<T, RaybatchError>;

#[derive(thiserror::Error, Debug)]
pub enum RaybatchError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("scene structure error: {0}")]
    Structure(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RaybatchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
