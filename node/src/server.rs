// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::api::{HealthResponse, NonceResponse};
use crate::chain::ChainClient;
use crate::devchain::DevChain;
use crate::errors::ChainError;
use crate::telemetry;
use axum::{
    body::Body,
    extract::{Path, Request as AxumRequest, State},
    http::{header, header::AUTHORIZATION, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::stream::{BoxStream, StreamExt};
use poe_kernel::{AccountId, Claim, Fingerprint, SignedExtrinsic};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(provided) if provided == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn build_router(chain: DevChain, auth_token: Option<String>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/v1/claims/:fingerprint", get(get_claim))
        .route("/v1/claims/:fingerprint/watch", get(watch_claim))
        .route("/v1/accounts/:account/claims", get(get_account_claims))
        .route("/v1/accounts/:account/nonce", get(get_account_nonce))
        .route("/v1/extrinsics", post(submit_extrinsic))
        // Observability
        .route("/metrics", get(metrics_handler))
        .with_state(chain);

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required");
        app = app.layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    // Browser front-ends are served from other origins.
    app.layer(CorsLayer::permissive())
}

/// Serializes each stream item as one JSON line.
fn ndjson_response<T>(stream: BoxStream<'static, Result<T, ChainError>>) -> Response
where
    T: Serialize + Send + 'static,
{
    let lines = stream.filter_map(|item| async move {
        match item {
            Ok(value) => serde_json::to_string(&value)
                .ok()
                .map(|json| Ok::<_, Infallible>(json + "\n")),
            Err(e) => {
                tracing::warn!("Dropping stream item: {}", e);
                None
            }
        }
    });

    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(lines),
    )
        .into_response()
}

fn parse<T: std::str::FromStr<Err = poe_kernel::KernelError>>(raw: &str) -> Result<T, ChainError> {
    raw.parse().map_err(ChainError::Kernel)
}

async fn health(State(chain): State<DevChain>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        best_number: chain.best_number().await,
        finalized_number: chain.finalized_number().await,
    })
}

async fn get_claim(
    State(chain): State<DevChain>,
    Path(fingerprint): Path<String>,
) -> Result<Json<Option<Claim>>, ChainError> {
    let fingerprint: Fingerprint = parse(&fingerprint)?;
    Ok(Json(chain.query_claim(&fingerprint).await?))
}

async fn watch_claim(
    State(chain): State<DevChain>,
    Path(fingerprint): Path<String>,
) -> Result<Response, ChainError> {
    let fingerprint: Fingerprint = parse(&fingerprint)?;
    tracing::debug!("Watch opened for {}", fingerprint);
    let updates = chain.subscribe_claim(&fingerprint).await?;
    Ok(ndjson_response(updates))
}

async fn get_account_claims(
    State(chain): State<DevChain>,
    Path(account): Path<String>,
) -> Result<Json<Vec<Fingerprint>>, ChainError> {
    let account: AccountId = parse(&account)?;
    Ok(Json(chain.query_account_claims(&account).await?))
}

async fn get_account_nonce(
    State(chain): State<DevChain>,
    Path(account): Path<String>,
) -> Result<Json<NonceResponse>, ChainError> {
    let account: AccountId = parse(&account)?;
    Ok(Json(NonceResponse {
        nonce: chain.account_nonce(&account).await?,
    }))
}

async fn submit_extrinsic(
    State(chain): State<DevChain>,
    Json(extrinsic): Json<SignedExtrinsic>,
) -> Result<Response, ChainError> {
    let statuses = chain.submit_extrinsic(extrinsic).await?;
    Ok(ndjson_response(statuses))
}

async fn metrics_handler() -> String {
    telemetry::get_metrics()
}
