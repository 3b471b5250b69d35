//! Serves stored images with conditional GET support.

use std::io::ErrorKind;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use axum::http::response::Builder;
use httpdate::{fmt_http_date, parse_http_date};

use super::prelude::*;
use crate::constants::IMAGE_CACHE_CONTROL;

/// Validators derived from a stored file's metadata.
#[derive(Clone, Debug)]
pub(crate) struct CacheValidators {
    etag: Option<HeaderValue>,
    last_modified: Option<HeaderValue>,
    modified_secs: Option<u64>,
}

impl CacheValidators {
    pub(crate) fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        let modified_secs = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
            .map(|duration| duration.as_secs());
        let etag = HeaderValue::from_str(&format!(
            "W/\"{:x}-{:x}\"",
            metadata.len(),
            modified_secs.unwrap_or(0)
        ))
        .ok();
        let last_modified = modified_secs.and_then(|secs| {
            let at = UNIX_EPOCH + std::time::Duration::from_secs(secs);
            HeaderValue::from_str(&fmt_http_date(at)).ok()
        });
        Self {
            etag,
            last_modified,
            modified_secs,
        }
    }

    /// True when the client's copy is still current. `If-None-Match` wins over
    /// `If-Modified-Since` when both are sent.
    pub(crate) fn is_fresh(&self, headers: &HeaderMap) -> bool {
        if let Some(if_none_match) = headers.get(IF_NONE_MATCH) {
            let Ok(candidates) = if_none_match.to_str() else {
                return false;
            };
            let Some(etag) = self.etag.as_ref().and_then(|etag| etag.to_str().ok()) else {
                return false;
            };
            return candidates
                .split(',')
                .map(str::trim)
                .any(|candidate| candidate == "*" || candidate == etag);
        }

        let since = headers
            .get(IF_MODIFIED_SINCE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| parse_http_date(value).ok())
            .and_then(|since: SystemTime| since.duration_since(UNIX_EPOCH).ok())
            .map(|duration| duration.as_secs());
        matches!((self.modified_secs, since), (Some(modified), Some(since)) if modified <= since)
    }

    pub(crate) fn apply(&self, mut builder: Builder) -> Builder {
        builder = builder.header(CACHE_CONTROL, IMAGE_CACHE_CONTROL.as_str());
        if let Some(etag) = &self.etag {
            builder = builder.header(ETAG, etag.clone());
        }
        if let Some(last_modified) = &self.last_modified {
            builder = builder.header(LAST_MODIFIED, last_modified.clone());
        }
        builder
    }
}

/// GET /images/{filename}
pub(crate) async fn image_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Result<Response, ArtError> {
    let path = state.store().resolve(&filename)?;
    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(ArtError::NotFound(filename)),
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(ArtError::NotFound(filename)),
        Err(err) => return Err(err.into()),
    };

    let validators = CacheValidators::from_metadata(&metadata);
    if validators.is_fresh(&headers) {
        debug!("{} not modified", filename);
        return validators
            .apply(Response::builder().status(StatusCode::NOT_MODIFIED))
            .body(Body::empty())
            .map_err(ArtError::from);
    }

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(ArtError::NotFound(filename)),
        Err(err) => return Err(err.into()),
    };
    validators
        .apply(Response::builder().header(CONTENT_TYPE, "image/png"))
        .body(Body::from(bytes))
        .map_err(ArtError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validators() -> (tempfile::NamedTempFile, CacheValidators) {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), b"pixels").expect("write");
        let metadata = std::fs::metadata(file.path()).expect("metadata");
        let validators = CacheValidators::from_metadata(&metadata);
        (file, validators)
    }

    #[test]
    fn etag_match_is_fresh() {
        let (_file, validators) = validators();
        let etag = validators.etag.clone().expect("etag");

        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, etag);
        assert!(validators.is_fresh(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, HeaderValue::from_static("W/\"nope\""));
        assert!(!validators.is_fresh(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, HeaderValue::from_static("*"));
        assert!(validators.is_fresh(&headers));
    }

    #[test]
    fn if_modified_since_compares_whole_seconds() {
        let (_file, validators) = validators();
        let last_modified = validators.last_modified.clone().expect("last modified");

        let mut headers = HeaderMap::new();
        headers.insert(IF_MODIFIED_SINCE, last_modified);
        assert!(validators.is_fresh(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(
            IF_MODIFIED_SINCE,
            HeaderValue::from_static("Thu, 01 Jan 1970 00:00:00 GMT"),
        );
        assert!(!validators.is_fresh(&headers));

        assert!(!validators.is_fresh(&HeaderMap::new()));
    }
}
