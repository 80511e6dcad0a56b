use menubot_conversation::GatewayError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DialogError>;

/// Missing or forged registry and resource references.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Unknown quiz topic: {0}")]
    UnknownTopic(String),

    #[error("Unrecognized button payload: {0}")]
    UnknownCallback(String),

    #[error("Missing {kind} template: {key}")]
    MissingTemplate { kind: &'static str, key: String },

    #[error("Cannot read resource {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Session lookup failures. The in-memory store never produces these.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found for user: {0}")]
    NotFound(menubot_core::UserId),
}

#[derive(Debug, Error)]
pub enum DialogError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Message delivery failed: {0}")]
    Delivery(anyhow::Error),
}
