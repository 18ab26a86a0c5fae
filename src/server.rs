//! HTTP front end
//!
//! One GET route per request kind, each taking `q` (plus `e` or `n`) in the
//! query string. Resolution errors map to HTTP statuses; a dispatched
//! command that later fails on the device still answers 200.

use crate::error::ControlError;
use crate::processor::Processor;
use crate::request::{RawParams, Request};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Request kinds exposed as `/<kind>`
pub const ENDPOINTS: &[&str] = &[
    "playmovie",
    "playtvshow",
    "playepisode",
    "playrandomepisode",
    "queuerandomepisode",
    "playnrandomepisodes",
    "playpvrchannelbyname",
    "playpvrchannelbynumber",
    "executeaddon",
    "playpause",
    "stop",
    "mute",
    "volume",
    "activatetv",
];

pub fn create_router(processor: Arc<Processor>) -> Router {
    let mut router = Router::new().route("/health", get(health));

    for &kind in ENDPOINTS {
        router = router.route(
            &format!("/{}", kind),
            get(
                move |State(processor): State<Arc<Processor>>, Query(params): Query<RawParams>| async move {
                    handle(kind, processor, params).await
                },
            ),
        );
    }

    router.with_state(processor)
}

async fn handle(kind: &'static str, processor: Arc<Processor>, params: RawParams) -> Response {
    let result = match Request::parse(kind, &params, processor.normalizer()) {
        Ok(request) => processor.handle(request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            warn!("❌ /{} failed: {}", kind, e);
            e.into_response()
        }
    }
}

async fn health(State(processor): State<Arc<Processor>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "kodi_reachable": processor.device_reachable().await,
    }))
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        let status = match &self {
            e if e.is_device_failure() => StatusCode::BAD_GATEWAY,
            ControlError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
