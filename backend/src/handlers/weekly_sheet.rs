//! HTTP handlers for weekly settlement sheet endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::weekly_sheet::{
    AddCreditInput, AddWeeklyExpenseInput, CreateWeeklySheetInput, MarkPaidInput,
    WeeklySheetDetail, WeeklySheetService,
};
use crate::AppState;
use shared::{CrewCredit, WeeklyBreakdown, WeeklyExpense, WeeklySheet};

#[derive(Debug, Default, Deserialize)]
pub struct ListSheetsQuery {
    pub vessel_id: Option<Uuid>,
}

/// Open a settlement week for a vessel
pub async fn create_sheet(
    State(state): State<AppState>,
    Json(input): Json<CreateWeeklySheetInput>,
) -> AppResult<Json<WeeklySheet>> {
    let service = WeeklySheetService::new(state.db);
    let sheet = service.create_sheet(input).await?;
    Ok(Json(sheet))
}

/// Get a sheet with its records and live aggregation
pub async fn get_sheet(
    State(state): State<AppState>,
    Path(sheet_id): Path<Uuid>,
) -> AppResult<Json<WeeklySheetDetail>> {
    let service = WeeklySheetService::new(state.db);
    let detail = service.get_sheet(sheet_id).await?;
    Ok(Json(detail))
}

/// List weekly sheets
pub async fn list_sheets(
    State(state): State<AppState>,
    Query(query): Query<ListSheetsQuery>,
) -> AppResult<Json<Vec<WeeklySheet>>> {
    let service = WeeklySheetService::new(state.db);
    let sheets = service.list_sheets(query.vessel_id).await?;
    Ok(Json(sheets))
}

/// Attach week-level expenses
pub async fn add_expenses(
    State(state): State<AppState>,
    Path(sheet_id): Path<Uuid>,
    Json(expenses): Json<Vec<AddWeeklyExpenseInput>>,
) -> AppResult<Json<Vec<WeeklyExpense>>> {
    let service = WeeklySheetService::new(state.db);
    let created = service.add_expenses(sheet_id, expenses).await?;
    Ok(Json(created))
}

/// Approve a pending weekly expense
pub async fn approve_expense(
    State(state): State<AppState>,
    Path((sheet_id, expense_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<WeeklyExpense>> {
    let service = WeeklySheetService::new(state.db);
    let expense = service.approve_expense(sheet_id, expense_id).await?;
    Ok(Json(expense))
}

/// Record crew advances against the sheet
pub async fn add_credits(
    State(state): State<AppState>,
    Path(sheet_id): Path<Uuid>,
    Json(credits): Json<Vec<AddCreditInput>>,
) -> AppResult<Json<Vec<CrewCredit>>> {
    let service = WeeklySheetService::new(state.db);
    let created = service.add_credits(sheet_id, credits).await?;
    Ok(Json(created))
}

/// Preview the weekly aggregation without persisting
pub async fn calculate(
    State(state): State<AppState>,
    Path(sheet_id): Path<Uuid>,
) -> AppResult<Json<WeeklyBreakdown>> {
    let service = WeeklySheetService::new(state.db);
    let breakdown = service.calculate(sheet_id).await?;
    Ok(Json(breakdown))
}

/// Finalize the sheet and store payout records
pub async fn finalize(
    State(state): State<AppState>,
    Path(sheet_id): Path<Uuid>,
) -> AppResult<Json<WeeklySheetDetail>> {
    let service = WeeklySheetService::new(state.db);
    let detail = service.finalize(sheet_id).await?;
    Ok(Json(detail))
}

/// Reopen a finalized sheet
pub async fn reopen(
    State(state): State<AppState>,
    Path(sheet_id): Path<Uuid>,
) -> AppResult<Json<WeeklySheet>> {
    let service = WeeklySheetService::new(state.db);
    let sheet = service.reopen(sheet_id).await?;
    Ok(Json(sheet))
}

/// Mark a finalized sheet's payouts as paid
pub async fn mark_paid(
    State(state): State<AppState>,
    Path(sheet_id): Path<Uuid>,
    Json(input): Json<MarkPaidInput>,
) -> AppResult<Json<WeeklySheet>> {
    let service = WeeklySheetService::new(state.db);
    let sheet = service.mark_paid(sheet_id, input).await?;
    Ok(Json(sheet))
}
