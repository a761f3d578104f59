//! HTTP handlers for trip lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::trip::{
    AddBillInput, AddExpenseInput, AddPurchaseInput, AssignCrewInput, CreateTripInput, TripFilter,
    TripService, TripWithBreakdown, UpdateTripInput,
};
use crate::AppState;
use shared::{Bill, Expense, FishPurchase, Trip, TripAssignment};

/// Create a trip in DRAFT status
pub async fn create_trip(
    State(state): State<AppState>,
    Json(input): Json<CreateTripInput>,
) -> AppResult<Json<Trip>> {
    let service = TripService::new(state.db);
    let trip = service.create_trip(input).await?;
    Ok(Json(trip))
}

/// Get a trip together with its live financial breakdown
pub async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<TripWithBreakdown>> {
    let service = TripService::new(state.db);
    let trip = service.get_trip(trip_id).await?;
    Ok(Json(trip))
}

/// List trips with optional status/vessel/date filters
pub async fn list_trips(
    State(state): State<AppState>,
    Query(filter): Query<TripFilter>,
) -> AppResult<Json<Vec<Trip>>> {
    let service = TripService::new(state.db);
    let trips = service.list_trips(filter).await?;
    Ok(Json(trips))
}

/// Update trip basics
pub async fn update_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(input): Json<UpdateTripInput>,
) -> AppResult<Json<Trip>> {
    let service = TripService::new(state.db);
    let trip = service.update_trip(trip_id, input).await?;
    Ok(Json(trip))
}

/// Replace the trip's crew assignments
pub async fn assign_crew(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(assignments): Json<Vec<AssignCrewInput>>,
) -> AppResult<Json<Vec<TripAssignment>>> {
    let service = TripService::new(state.db);
    let created = service.assign_crew(trip_id, assignments).await?;
    Ok(Json(created))
}

/// Record sale bills against the trip
pub async fn add_bills(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(bills): Json<Vec<AddBillInput>>,
) -> AppResult<Json<Vec<Bill>>> {
    let service = TripService::new(state.db);
    let created = service.add_bills(trip_id, bills).await?;
    Ok(Json(created))
}

/// Record fish purchases against the trip
pub async fn add_purchases(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(purchases): Json<Vec<AddPurchaseInput>>,
) -> AppResult<Json<Vec<FishPurchase>>> {
    let service = TripService::new(state.db);
    let created = service.add_purchases(trip_id, purchases).await?;
    Ok(Json(created))
}

/// Record trip expenses (pending until approved)
pub async fn add_expenses(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(expenses): Json<Vec<AddExpenseInput>>,
) -> AppResult<Json<Vec<Expense>>> {
    let service = TripService::new(state.db);
    let created = service.add_expenses(trip_id, expenses).await?;
    Ok(Json(created))
}

/// Approve a pending expense
pub async fn approve_expense(
    State(state): State<AppState>,
    Path((trip_id, expense_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Expense>> {
    let service = TripService::new(state.db);
    let expense = service.review_expense(trip_id, expense_id, true).await?;
    Ok(Json(expense))
}

/// Reject a pending expense
pub async fn reject_expense(
    State(state): State<AppState>,
    Path((trip_id, expense_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Expense>> {
    let service = TripService::new(state.db);
    let expense = service.review_expense(trip_id, expense_id, false).await?;
    Ok(Json(expense))
}

/// Finalize a draft trip (DRAFT -> ONGOING)
pub async fn finalize_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<Trip>> {
    let service = TripService::new(state.db);
    let trip = service.finalize_trip(trip_id).await?;
    Ok(Json(trip))
}

/// Close a trip (-> CLOSED), making it eligible for weekly aggregation
pub async fn close_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<Trip>> {
    let service = TripService::new(state.db);
    let trip = service.close_trip(trip_id).await?;
    Ok(Json(trip))
}

/// Reopen a closed trip (CLOSED -> ONGOING)
pub async fn reopen_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> AppResult<Json<Trip>> {
    let service = TripService::new(state.db);
    let trip = service.reopen_trip(trip_id).await?;
    Ok(Json(trip))
}
