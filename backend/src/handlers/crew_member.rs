//! HTTP handlers for crew member endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::crew_member::{
    CreateCrewMemberInput, CrewMemberService, UpdateCrewMemberInput,
};
use crate::AppState;
use shared::CrewMember;

#[derive(Debug, Default, Deserialize)]
pub struct ListCrewMembersQuery {
    pub active_only: Option<bool>,
}

/// Register a new crew member
pub async fn create_crew_member(
    State(state): State<AppState>,
    Json(input): Json<CreateCrewMemberInput>,
) -> AppResult<Json<CrewMember>> {
    let service = CrewMemberService::new(state.db);
    let member = service.create_crew_member(input).await?;
    Ok(Json(member))
}

/// Get crew member by ID
pub async fn get_crew_member(
    State(state): State<AppState>,
    Path(crew_member_id): Path<Uuid>,
) -> AppResult<Json<CrewMember>> {
    let service = CrewMemberService::new(state.db);
    let member = service.get_crew_member(crew_member_id).await?;
    Ok(Json(member))
}

/// List crew members
pub async fn list_crew_members(
    State(state): State<AppState>,
    Query(query): Query<ListCrewMembersQuery>,
) -> AppResult<Json<Vec<CrewMember>>> {
    let service = CrewMemberService::new(state.db);
    let members = service
        .list_crew_members(query.active_only.unwrap_or(false))
        .await?;
    Ok(Json(members))
}

/// Update a crew member
pub async fn update_crew_member(
    State(state): State<AppState>,
    Path(crew_member_id): Path<Uuid>,
    Json(input): Json<UpdateCrewMemberInput>,
) -> AppResult<Json<CrewMember>> {
    let service = CrewMemberService::new(state.db);
    let member = service.update_crew_member(crew_member_id, input).await?;
    Ok(Json(member))
}

/// Deactivate a crew member
pub async fn deactivate_crew_member(
    State(state): State<AppState>,
    Path(crew_member_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = CrewMemberService::new(state.db);
    service.deactivate_crew_member(crew_member_id).await?;
    Ok(Json(serde_json::json!({ "deactivated": true })))
}
