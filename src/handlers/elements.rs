use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::Element;
use crate::AppState;

use super::ApiError;

/// All cached elements as a hostname-keyed map
pub async fn list_elements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Element>>, ApiError> {
    let elements = state
        .store
        .list_elements(&state.config.default_domain)
        .await?;

    Ok(Json(
        elements
            .into_iter()
            .map(|element| (element.hostname.clone(), element))
            .collect(),
    ))
}

/// One element by hostname, qualified with the default domain when the
/// request uses a bare name. An unknown hostname yields an empty map.
pub async fn get_element(
    State(state): State<Arc<AppState>>,
    Path(hostname): Path<String>,
) -> Result<Json<BTreeMap<String, Element>>, ApiError> {
    let mut elements = BTreeMap::new();
    if let Some(element) = state
        .store
        .get_element(&hostname, &state.config.default_domain)
        .await?
    {
        elements.insert(element.hostname.clone(), element);
    }
    Ok(Json(elements))
}
