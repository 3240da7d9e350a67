mod categories;
mod countdown;
mod home;
mod products;
mod views;

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_catalog::{CatalogClient, CatalogError};
use storefront_core::{AppConfig, Clock, FomoSource, NoFomo, RandomFomo, SystemClock};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogClient,
    pub fomo: Arc<dyn FomoSource>,
    pub clock: Arc<dyn Clock>,
    pub countdown_window: Duration,
    pub home_section_limit: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig, catalog: CatalogClient) -> Self {
        let fomo: Arc<dyn FomoSource> = if config.fomo_enabled {
            Arc::new(RandomFomo::default())
        } else {
            Arc::new(NoFomo)
        };
        Self {
            catalog,
            fomo,
            clock: Arc::new(SystemClock),
            countdown_window: Duration::from_secs(config.countdown_window_secs),
            home_section_limit: config.home_section_limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a failed detail fetch to an API error. Unlike list sections, a page
/// whose subject cannot be loaded has nothing to degrade to.
pub(super) fn map_catalog_error(request_id: String, error: &CatalogError) -> ApiError {
    if error.is_not_found() {
        return ApiError::new(request_id, "not_found", error.user_message());
    }
    tracing::error!(error = %error, "catalog request failed");
    ApiError::new(request_id, "upstream_error", error.user_message())
}

/// Parses one optional query parameter. Blank values count as absent.
pub(super) fn parse_param<T>(
    request_id: &str,
    name: &str,
    raw: Option<&str>,
) -> Result<Option<T>, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    value.parse().map(Some).map_err(|e| {
        ApiError::new(
            request_id,
            "bad_request",
            format!("invalid value {value:?} for {name}: {e}"),
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/home", get(home::home_page))
        .route("/api/v1/products", get(products::list_products))
        .route("/api/v1/products/{slug}", get(products::get_product))
        .route("/api/v1/categories", get(categories::list_categories))
        .route("/api/v1/categories/{slug}", get(categories::get_category))
        .route("/api/v1/countdown", get(countdown::countdown_stream))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.catalog.list_categories().await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    catalog: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: catalog unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        catalog: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
