//! Webhook routes

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

use crate::state::AppState;
use github::{verify_signature, WebhookDelivery, SIGNATURE_HEADER};

const EVENT_HEADER: &str = "X-GitHub-Event";
const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

#[derive(Serialize)]
pub struct WebhookResponse {
    ok: bool,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Accept a GitHub delivery.
///
/// Once the signature checks out the response is always 202, whatever
/// happens to the plan job.
pub async fn github(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), StatusCode> {
    let signature = header(&headers, SIGNATURE_HEADER).ok_or_else(|| {
        warn!("Missing X-Hub-Signature-256 header");
        StatusCode::UNAUTHORIZED
    })?;

    if !verify_signature(signature, &state.config.webhook_secret, &body) {
        warn!("Invalid webhook signature");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let event_type = header(&headers, EVENT_HEADER).ok_or_else(|| {
        warn!("Missing X-GitHub-Event header");
        StatusCode::BAD_REQUEST
    })?;
    let delivery_id = header(&headers, DELIVERY_HEADER).map(str::to_string);

    let delivery = WebhookDelivery::parse(event_type, delivery_id, &body).map_err(|e| {
        error!(
            event = %event_type,
            delivery = %header(&headers, DELIVERY_HEADER).unwrap_or_default(),
            error = %e,
            "Failed to parse webhook"
        );
        StatusCode::BAD_REQUEST
    })?;

    state.event_handler.handle(&delivery).await;

    Ok((StatusCode::ACCEPTED, Json(WebhookResponse { ok: true })))
}
