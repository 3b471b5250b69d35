//! HTTP layer: JSON API plus static serving of generated images.

use std::num::NonZeroU16;

use axum::Router;
use axum::routing::{get, post};
use chrono::DateTime;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::compose::Composer;
use crate::store::ImageStore;

mod api;
mod images;
mod prelude;

use prelude::*;

/// Shared, immutable state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    store: ImageStore,
    composer: Composer,
}

impl AppState {
    /// Bundles the store and composer for the router.
    pub fn new(store: ImageStore, composer: Composer) -> Self {
        Self { store, composer }
    }

    /// Where images are written and listed from.
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Renders the images.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }
}

/// RFC 3339 in UTC with milliseconds, the format every response uses.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Routes without middleware.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/generate", post(api::generate_handler))
        .route("/api/images", get(api::list_images_handler))
        .route("/api/styles", get(api::list_styles_handler))
        .route("/api/health", get(api::health_handler))
        .route("/images/{filename}", get(images::image_handler))
}

/// The full application: routes, state, request tracing and CORS.
pub fn build_app(state: AppState) -> Router {
    create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Makes sure the image directory exists, then serves until Ctrl-C.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    state: AppState,
) -> Result<(), anyhow::Error> {
    state.store().ensure_dir().await?;
    info!("Writing images to {}", state.store().root().display());

    let app = build_app(state);
    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::constants::TEST_BASE_URL;
    use crate::palette::PaletteTable;
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::header::{ETAG, IF_NONE_MATCH};
    use http_body_util::BodyExt;
    use regex::Regex;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn setup_state(dir: &std::path::Path) -> AppState {
        let store = ImageStore::new(dir.join("images"), TEST_BASE_URL).expect("store");
        let composer = Composer::new(PaletteTable::default()).expect("composer");
        AppState::new(store, composer)
    }

    async fn read_json(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn generate_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn generate_writes_an_image_and_serves_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = setup_state(dir.path());
        let app = create_router().with_state(state.clone());

        let response = app
            .clone()
            .oneshot(generate_request(
                json!({"prompt": "a calm lake at dawn", "style": "ocean"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["style"], "ocean");
        assert_eq!(body["prompt"], "a calm lake at dawn");
        assert_eq!(body["message"], "Image generated successfully");

        let filename = body["filename"].as_str().expect("filename");
        let pattern = Regex::new(
            r"^ai-ocean-\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}-a-calm-lake-[a-z0-9]{6}\.png$",
        )
        .unwrap();
        assert!(pattern.is_match(filename), "{filename}");
        assert!(state.store().root().join(filename).is_file());
        assert!(body["timestamp"].as_str().expect("timestamp").ends_with('Z'));

        let url = body["url"].as_str().expect("url");
        assert_eq!(url, format!("{TEST_BASE_URL}/images/{filename}"));
        let path = url::Url::parse(url).unwrap().path().to_string();

        let response = app.clone().oneshot(get_request(&path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "image/png");
        let etag = response.headers().get(ETAG).cloned().expect("etag");
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let decoded = image::load_from_memory(&bytes).expect("png decodes");
        assert_eq!(decoded.width(), 800);
        assert_eq!(decoded.height(), 600);

        let request = Request::builder()
            .method("GET")
            .uri(&path)
            .header(IF_NONE_MATCH, etag)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn blank_or_missing_prompt_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = setup_state(dir.path());
        let app = create_router().with_state(state.clone());

        for body in [json!({"prompt": ""}), json!({"prompt": "   "}), json!({"style": "tech"})] {
            let response = app.clone().oneshot(generate_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = read_json(response).await;
            assert_eq!(body, json!({"success": false, "error": "Prompt is required"}));
        }
        assert!(state.store().list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn prompt_is_echoed_as_sent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = create_router().with_state(setup_state(dir.path()));

        let response = app
            .oneshot(generate_request(json!({"prompt": "  a lake  ", "style": "nature"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["prompt"], "  a lake  ");
        assert!(
            body["filename"]
                .as_str()
                .expect("filename")
                .starts_with("ai-nature-")
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = create_router().with_state(setup_state(dir.path()));

        let request = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn unknown_or_missing_style_still_generates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = create_router().with_state(setup_state(dir.path()));

        let response = app
            .clone()
            .oneshot(generate_request(
                json!({"prompt": "stained glass", "style": "watercolour"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["style"], "watercolour");
        assert!(
            body["filename"]
                .as_str()
                .expect("filename")
                .starts_with("ai-watercolour-")
        );

        let response = app
            .oneshot(generate_request(json!({"prompt": "no style given"})))
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["style"], "abstract");
    }

    #[tokio::test]
    async fn list_images_counts_only_pngs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = setup_state(dir.path());
        let app = create_router().with_state(state.clone());

        let response = app.clone().oneshot(get_request("/api/images")).await.unwrap();
        let body = read_json(response).await;
        assert_eq!(body["count"], 0);

        for prompt in ["first image", "second image"] {
            let response = app
                .clone()
                .oneshot(generate_request(json!({"prompt": prompt, "style": "sunset"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        std::fs::write(state.store().root().join("readme.txt"), b"not an image").unwrap();

        let response = app.oneshot(get_request("/api/images")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);
        let images = body["images"].as_array().expect("images");
        assert_eq!(body["count"], images.len());
        assert_eq!(images.len(), 2);
        for image in images {
            assert!(image["filename"].as_str().unwrap().ends_with(".png"));
            assert!(image["url"].as_str().unwrap().starts_with(TEST_BASE_URL));
            assert!(image["size"].as_str().unwrap().ends_with(" KB"));
            assert!(image["created"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[tokio::test]
    async fn styles_are_listed_and_stable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = create_router().with_state(setup_state(dir.path()));

        let first = read_json(app.clone().oneshot(get_request("/api/styles")).await.unwrap()).await;
        let second = read_json(app.oneshot(get_request("/api/styles")).await.unwrap()).await;
        assert_eq!(first, second);

        let styles = first["styles"].as_array().expect("styles");
        let names: Vec<_> = styles
            .iter()
            .map(|style| style["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["abstract", "nature", "tech", "sunset", "ocean"]);
        let display: Vec<_> = styles
            .iter()
            .map(|style| style["displayName"].as_str().unwrap())
            .collect();
        assert_eq!(display, ["Abstract", "Nature", "Tech", "Sunset", "Ocean"]);
        assert!(styles.iter().all(|style| style["colors"].as_array().unwrap().len() == 5));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = create_router().with_state(setup_state(dir.path()));

        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["service"], "Dynamic Art Generator");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn missing_and_unsafe_images_are_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = create_router().with_state(setup_state(dir.path()));

        for uri in [
            "/images/ai-missing.png",
            "/images/..%2Fsecret.png",
            "/images/notes.txt",
        ] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }
}
