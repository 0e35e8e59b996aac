//! Membership API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::ApiError;
use crate::domain::MemberStatus;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;

/// Request DTO for a membership application
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub name: String,
    pub reason: Option<String>,
}

pub async fn apply(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = claims.user_id()?;
    let member = state
        .membership
        .apply(user_id, payload.name, payload.reason)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "member": member,
            "message": "Application received"
        })),
    ))
}

pub async fn my_membership(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = claims.user_id()?;

    match state.membership.get_by_user_id(user_id).await? {
        Some(member) => Ok((StatusCode::OK, Json(json!({ "member": member })))),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No membership on file" })),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMembersQuery {
    pub status: Option<String>,
}

/// Admin roster, filtered by status (defaults to the pending queue).
pub async fn list_members(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<ListMembersQuery>,
) -> Result<Json<Value>, ApiError> {
    super::require_admin(&claims)?;

    let status: MemberStatus = query.status.as_deref().unwrap_or("pending").parse()?;
    let members = state.membership.list_by_status(status).await?;
    let total = members.len();

    Ok(Json(json!({ "members": members, "total": total })))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

pub async fn set_status(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require_admin(&claims)?;

    let status: MemberStatus = payload.status.parse()?;
    if state.membership.set_status(id, status).await? {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Member status updated" })),
        ))
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Member not found" })),
        ))
    }
}
