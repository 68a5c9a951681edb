use crate::api::AppState;
use crate::config::Config;
use crate::disk::LocalDisk;
use crate::gallery::GalleryService;
use crate::share::Mailer;
use crate::store::GalleryStore;
use axum::{
    Router,
    extract::{Extension, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{any, get},
};
use opentelemetry::{global, propagation::Extractor};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub mod api;
pub mod config;
pub mod disk;
pub mod gallery;
pub mod share;
pub mod store;
pub mod telemetry;
pub mod version;

struct HeaderExtractor<'a>(&'a axum::http::HeaderMap);

impl<'a> Extractor for HeaderExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Builds the full application router.
///
/// `store` holds gallery and photo records, `mailer` delivers share emails and
/// the upload root comes from `config`.
pub fn routes<S, M>(store: S, mailer: M, config: Config) -> Router
where
    S: GalleryStore,
    M: Mailer,
{
    let disk = LocalDisk::new(config.upload_dir());
    let state = AppState::new(
        GalleryService::new(store, disk),
        mailer,
        config.public_base_url().map(str::to_string),
    );

    Router::new()
        .route("/is-health", get(health_check::<S, M>))
        .nest("/api", api::routes::<S, M>())
        .nest_service("/uploads", ServeDir::new(config.upload_dir()))
        .fallback(any(catch_all))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                // Check if the request has a trace context header
                let parent_context = global::get_text_map_propagator(|propagator| {
                    propagator.extract(&HeaderExtractor(request.headers()))
                });

                let span = tracing::info_span!(
                    "http_request",
                    http_request.method = ?request.method(),
                    http_request.uri = ?request.uri(),
                    http_request.version = ?request.version(),
                    http_request.user_agent = ?request.headers().get(axum::http::header::USER_AGENT),
                );

                span.set_parent(parent_context);

                span
            }),
        )
        .layer(Extension(config))
        .with_state(state)
}

async fn health_check<S, M>(
    State(state): State<AppState<S, M>>,
    Extension(config): Extension<Config>,
) -> impl IntoResponse
where
    S: GalleryStore,
    M: Mailer,
{
    let mut response = if state.galleries.store().is_connected().await {
        (StatusCode::OK, "OK").into_response()
    } else {
        (StatusCode::BAD_GATEWAY, "502").into_response()
    };

    let env_value = config.environment().to_string();
    response.headers_mut().insert(
        HeaderName::from_static("x-service-env"),
        HeaderValue::from_str(&env_value).expect("environment header is valid ASCII"),
    );

    let version_value = version::format_version_for_env(config.environment());
    if let Ok(value) = HeaderValue::from_str(&version_value) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-service-version"), value);
    }

    response
}

async fn catch_all() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}
