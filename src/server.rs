//! HTTP front end: serves the hydrated page per request.
//!
//! The language preference lives in a cookie, so every request starts its
//! own page session. Everything that is not a page or language route falls
//! through to the static site directory.

use crate::config::Config;
use crate::dom::Document;
use crate::i18n::{CookiePreferences, Language, PreferenceStore};
use crate::session::PageSession;
use crate::source::Loader;
use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    pub loader: Loader,
    pub page_path: PathBuf,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            loader: Loader::from_config(config),
            page_path: config.page_path(),
        }
    }
}

/// Build the router. `site_dir` backs the static fallback.
pub fn router(state: AppState, site_dir: impl Into<PathBuf>) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/language", post(toggle_language))
        .route("/language/:code", post(set_language))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(site_dir.into()))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind `0.0.0.0:{port}` and serve until the process stops.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config);
    let app = router(state, &config.site_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("✓ Listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")
}

/// Handler error: logged and answered with a bare 500.
struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn cookie_preferences(headers: &HeaderMap) -> CookiePreferences {
    CookiePreferences::from_header(headers.get(COOKIE).and_then(|v| v.to_str().ok()))
}

/// Redirect home, carrying a `Set-Cookie` if the preference changed.
fn redirect_home(prefs: &CookiePreferences) -> Response {
    let mut response = Redirect::to("/").into_response();
    if let Some(cookie) = prefs.set_cookie() {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().insert(SET_COOKIE, value);
            }
            Err(e) => warn!("Invalid preference cookie '{}': {}", cookie, e),
        }
    }
    response
}

async fn page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Html<String>, AppError> {
    let markup = tokio::fs::read_to_string(&state.page_path)
        .await
        .with_context(|| format!("Failed to read page {}", state.page_path.display()))?;

    let prefs = cookie_preferences(&headers);
    let mut doc = Document::parse(&markup);
    PageSession::start(&state.loader, &mut doc, &prefs).await;

    Ok(Html(doc.to_html()))
}

async fn toggle_language(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let mut prefs = cookie_preferences(&headers);

    // Same rule as the page's toggle: inert without a dictionary
    let translations = state.loader.translations().await;
    let mut scratch = Document::new();
    let mut session = PageSession::hydrate(&mut scratch, None, translations, &prefs);
    if let Some(lang) = session.toggle(&mut scratch, &mut prefs) {
        info!("Language switched to {}", lang);
    }

    redirect_home(&prefs)
}

async fn set_language(Path(code): Path<String>) -> Response {
    let lang = match Language::from_code(&code) {
        Ok(lang) => lang,
        Err(e) => return (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    };

    let mut prefs = CookiePreferences::default();
    if let Err(e) = prefs.save(lang.code()) {
        warn!("Failed to persist language preference: {}", e);
    }
    redirect_home(&prefs)
}

async fn health() -> &'static str {
    "OK"
}
