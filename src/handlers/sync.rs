use axum::{extract::State, Json};
use std::sync::Arc;

use crate::models::SyncSummary;
use crate::AppState;
use crate::{becs, dns, netbox};

use super::ApiError;

/// Trigger a NetBox sync run
pub async fn sync_netbox(State(state): State<Arc<AppState>>) -> Result<Json<SyncSummary>, ApiError> {
    if state.config.netbox_url.is_empty() {
        return Err(ApiError::bad_request("NETBOX_URL is not configured"));
    }
    let summary = netbox::run_sync(&state.config, &state.store)
        .await
        .map_err(|e| ApiError::bad_gateway(format!("{:#}", e)))?;
    Ok(Json(summary))
}

/// Trigger a BECS sync run
pub async fn sync_becs(State(state): State<Arc<AppState>>) -> Result<Json<SyncSummary>, ApiError> {
    if state.config.becs_url.is_empty() {
        return Err(ApiError::bad_request("BECS_URL is not configured"));
    }
    let summary = becs::run_sync(&state.config, &state.store)
        .await
        .map_err(|e| ApiError::bad_gateway(format!("{:#}", e)))?;
    Ok(Json(summary))
}

/// Regenerate the DNS records file from the current cache
pub async fn sync_dns(State(state): State<Arc<AppState>>) -> Result<Json<SyncSummary>, ApiError> {
    let summary = dns::run_pipeline(&state.config, &state.store).await?;
    Ok(Json(summary))
}
