//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, info};

/// Error definitions for the dynart application.
#[derive(Debug)]
pub enum ArtError {
    /// The caller sent something we can't work with, the message goes back verbatim
    BadRequest(&'static str),
    /// When a requested file is not found
    NotFound(String),
    /// Rendering, encoding or writing an image failed
    GenerationFailed(String),
    /// Scanning the image directory failed
    ListingFailed(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl std::fmt::Display for ArtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "Bad request: {message}"),
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::GenerationFailed(message) => write!(f, "Image generation failed: {message}"),
            Self::ListingFailed(message) => write!(f, "Image listing failed: {message}"),
            Self::InternalServerError(message) => write!(f, "Internal server error: {message}"),
        }
    }
}

impl std::error::Error for ArtError {}

impl From<std::io::Error> for ArtError {
    fn from(err: std::io::Error) -> Self {
        ArtError::InternalServerError(err.to_string())
    }
}

impl From<image::ImageError> for ArtError {
    fn from(err: image::ImageError) -> Self {
        ArtError::GenerationFailed(err.to_string())
    }
}

impl From<axum::http::Error> for ArtError {
    fn from(err: axum::http::Error) -> Self {
        ArtError::InternalServerError(err.to_string())
    }
}

impl From<url::ParseError> for ArtError {
    fn from(err: url::ParseError) -> Self {
        ArtError::InternalServerError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ArtError {
    fn from(err: tokio::task::JoinError) -> Self {
        ArtError::GenerationFailed(err.to_string())
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": message,
        })),
    )
        .into_response()
}

impl IntoResponse for ArtError {
    fn into_response(self) -> Response {
        match self {
            ArtError::BadRequest(message) => {
                info!("Bad request received: {}", message);
                failure(StatusCode::BAD_REQUEST, message)
            }
            ArtError::NotFound(what) => {
                info!("404 {what}");
                failure(StatusCode::NOT_FOUND, "Not found")
            }
            ArtError::GenerationFailed(message) => {
                error!("Image generation error: {}", message);
                failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate image",
                )
            }
            ArtError::ListingFailed(message) => {
                error!("Image listing error: {}", message);
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list images")
            }
            ArtError::InternalServerError(message) => {
                error!("Internal server error: {}", message);
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
