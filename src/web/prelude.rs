pub(crate) use crate::error::ArtError;
pub(crate) use crate::web::AppState;
pub(crate) use axum::Json;
pub(crate) use axum::extract::{Path, State};
pub(crate) use axum::http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE};
pub(crate) use axum::response::Response;
pub(crate) use chrono::{SecondsFormat, Utc};
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use tracing::{debug, error, info};
