//! HTTP handlers for fish type and rate endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::fish_type::{
    AddRateInput, CreateFishTypeInput, FishTypeService, UpdateFishTypeInput,
};
use crate::AppState;
use shared::{FishType, FishTypeRate};

#[derive(Debug, Deserialize)]
pub struct CurrentRateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct CurrentRateResponse {
    pub fish_type_id: Uuid,
    pub date: NaiveDate,
    pub rate_per_kilo: Decimal,
}

/// Create a fish type
pub async fn create_fish_type(
    State(state): State<AppState>,
    Json(input): Json<CreateFishTypeInput>,
) -> AppResult<Json<FishType>> {
    let service = FishTypeService::new(state.db);
    let fish_type = service.create_fish_type(input).await?;
    Ok(Json(fish_type))
}

/// Get fish type by ID
pub async fn get_fish_type(
    State(state): State<AppState>,
    Path(fish_type_id): Path<Uuid>,
) -> AppResult<Json<FishType>> {
    let service = FishTypeService::new(state.db);
    let fish_type = service.get_fish_type(fish_type_id).await?;
    Ok(Json(fish_type))
}

/// List fish types
pub async fn list_fish_types(State(state): State<AppState>) -> AppResult<Json<Vec<FishType>>> {
    let service = FishTypeService::new(state.db);
    let fish_types = service.list_fish_types().await?;
    Ok(Json(fish_types))
}

/// Update a fish type
pub async fn update_fish_type(
    State(state): State<AppState>,
    Path(fish_type_id): Path<Uuid>,
    Json(input): Json<UpdateFishTypeInput>,
) -> AppResult<Json<FishType>> {
    let service = FishTypeService::new(state.db);
    let fish_type = service.update_fish_type(fish_type_id, input).await?;
    Ok(Json(fish_type))
}

/// Add a dated rate record for a fish type
pub async fn add_rate(
    State(state): State<AppState>,
    Path(fish_type_id): Path<Uuid>,
    Json(input): Json<AddRateInput>,
) -> AppResult<Json<FishTypeRate>> {
    let service = FishTypeService::new(state.db);
    let rate = service.add_rate(fish_type_id, input).await?;
    Ok(Json(rate))
}

/// Get the rate history of a fish type
pub async fn list_rates(
    State(state): State<AppState>,
    Path(fish_type_id): Path<Uuid>,
) -> AppResult<Json<Vec<FishTypeRate>>> {
    let service = FishTypeService::new(state.db);
    let rates = service.list_rates(fish_type_id).await?;
    Ok(Json(rates))
}

/// Resolve the effective rate of a fish type on a date
pub async fn current_rate(
    State(state): State<AppState>,
    Path(fish_type_id): Path<Uuid>,
    Query(query): Query<CurrentRateQuery>,
) -> AppResult<Json<CurrentRateResponse>> {
    let service = FishTypeService::new(state.db);
    let rate_per_kilo = service.current_rate(fish_type_id, query.date).await?;
    Ok(Json(CurrentRateResponse {
        fish_type_id,
        date: query.date,
        rate_per_kilo,
    }))
}
