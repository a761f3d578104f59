//! HTTP handlers for vessel endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::vessel::{CreateVesselInput, UpdateVesselInput, VesselService};
use crate::AppState;
use shared::Vessel;

#[derive(Debug, Default, Deserialize)]
pub struct ListVesselsQuery {
    pub active_only: Option<bool>,
    pub search: Option<String>,
}

/// Register a new vessel
pub async fn create_vessel(
    State(state): State<AppState>,
    Json(input): Json<CreateVesselInput>,
) -> AppResult<Json<Vessel>> {
    let service = VesselService::new(state.db);
    let vessel = service.create_vessel(input).await?;
    Ok(Json(vessel))
}

/// Get vessel by ID
pub async fn get_vessel(
    State(state): State<AppState>,
    Path(vessel_id): Path<Uuid>,
) -> AppResult<Json<Vessel>> {
    let service = VesselService::new(state.db);
    let vessel = service.get_vessel(vessel_id).await?;
    Ok(Json(vessel))
}

/// List vessels
pub async fn list_vessels(
    State(state): State<AppState>,
    Query(query): Query<ListVesselsQuery>,
) -> AppResult<Json<Vec<Vessel>>> {
    let service = VesselService::new(state.db);
    let vessels = service
        .list_vessels(query.active_only.unwrap_or(false), query.search)
        .await?;
    Ok(Json(vessels))
}

/// Update a vessel
pub async fn update_vessel(
    State(state): State<AppState>,
    Path(vessel_id): Path<Uuid>,
    Json(input): Json<UpdateVesselInput>,
) -> AppResult<Json<Vessel>> {
    let service = VesselService::new(state.db);
    let vessel = service.update_vessel(vessel_id, input).await?;
    Ok(Json(vessel))
}

/// Deactivate a vessel
pub async fn deactivate_vessel(
    State(state): State<AppState>,
    Path(vessel_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = VesselService::new(state.db);
    service.deactivate_vessel(vessel_id).await?;
    Ok(Json(serde_json::json!({ "deactivated": true })))
}
