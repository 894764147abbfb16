use thiserror::Error;

use crate::domain::source::UnknownCountry;
use crate::render::RenderError;

#[derive(Error, Debug)]
pub enum BroadsheetError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    UnknownCountry(#[from] UnknownCountry),

    #[error("No articles could be fetched from any source")]
    NothingFetched,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BroadsheetError>;
