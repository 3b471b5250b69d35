//! JSON endpoints under `/api`.

use axum::extract::rejection::JsonRejection;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::instrument;

use super::prelude::*;
use super::timestamp;
use crate::compose::encode_png;
use crate::constants::{DEFAULT_STYLE, SERVICE_NAME};
use crate::filename::make_filename;
use crate::palette::StyleSummary;
use crate::store::StoredImage;

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    style: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateResponse {
    success: bool,
    filename: String,
    prompt: String,
    style: String,
    url: String,
    timestamp: String,
    message: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageEntry {
    filename: String,
    url: String,
    created: String,
    size: String,
}

impl From<&StoredImage> for ImageEntry {
    fn from(image: &StoredImage) -> Self {
        Self {
            filename: image.filename.clone(),
            url: image.url.clone(),
            created: timestamp(image.created),
            size: format!("{:.2} KB", image.size_kb()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageListResponse {
    success: bool,
    count: usize,
    images: Vec<ImageEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StylesResponse {
    success: bool,
    styles: Vec<StyleSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: String,
}

/// POST /api/generate
#[instrument(skip_all)]
pub(crate) async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ArtError> {
    let Json(request) = payload.map_err(|err| {
        debug!("Rejected generate body: {}", err);
        ArtError::BadRequest("Invalid request body")
    })?;

    let prompt = request
        .prompt
        .filter(|prompt| !prompt.trim().is_empty())
        .ok_or(ArtError::BadRequest("Prompt is required"))?;
    let style = request
        .style
        .as_deref()
        .map(str::trim)
        .filter(|style| !style.is_empty())
        .unwrap_or(DEFAULT_STYLE)
        .to_string();

    let now = Utc::now();
    // the thread rng can't cross an await, so take what we need from it up front
    let (filename, render_rng) = {
        let mut rng = rand::rng();
        let filename = make_filename(&prompt, &style, now, &mut rng);
        (filename, StdRng::from_rng(&mut rng))
    };
    let url = state.store().url_for(&filename)?.to_string();
    info!(
        "Generating {} for prompt {:?} in style {}",
        filename, prompt, style
    );

    let composer = state.composer().clone();
    let (render_prompt, render_style) = (prompt.trim().to_string(), style.clone());
    let png = tokio::task::spawn_blocking(move || {
        let mut rng = render_rng;
        let image = composer.compose(&render_prompt, &render_style, &mut rng, now.date_naive());
        encode_png(&image)
    })
    .await??;

    state.store().save(&filename, &png).await?;

    Ok(Json(GenerateResponse {
        success: true,
        filename,
        prompt,
        style,
        url,
        timestamp: timestamp(now),
        message: "Image generated successfully",
    }))
}

/// GET /api/images
pub(crate) async fn list_images_handler(
    State(state): State<AppState>,
) -> Result<Json<ImageListResponse>, ArtError> {
    let images: Vec<ImageEntry> = state
        .store()
        .list()
        .await?
        .iter()
        .map(ImageEntry::from)
        .collect();
    Ok(Json(ImageListResponse {
        success: true,
        count: images.len(),
        images,
    }))
}

/// GET /api/styles
pub(crate) async fn list_styles_handler(State(state): State<AppState>) -> Json<StylesResponse> {
    Json(StylesResponse {
        success: true,
        styles: state
            .composer()
            .palettes()
            .styles()
            .iter()
            .map(StyleSummary::from)
            .collect(),
    })
}

/// GET /api/health
pub(crate) async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        service: SERVICE_NAME,
        timestamp: timestamp(Utc::now()),
    })
}
