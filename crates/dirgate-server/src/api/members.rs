//! Member role/host handlers.

use std::collections::BTreeSet;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use dirgate_authz::UpdateRolesInput;
use dirgate_core::models::role::RoleName;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::error::ApiResult;
use crate::state::AppState;

/// PATCH body. Omitted fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRolesRequest {
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct MemberRolesResponse {
    pub roles: BTreeSet<RoleName>,
    pub hosts: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub role: String,
    pub host: String,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub allowed: bool,
}

/// PATCH /v1/admin/members/{uid}/roles
pub async fn update_roles<C: Connection>(
    State(state): State<AppState<C>>,
    Path(uid): Path<String>,
    Json(payload): Json<UpdateRolesRequest>,
) -> ApiResult<StatusCode> {
    tracing::debug!(member_uid = %uid, "Member roles update requested");

    state
        .assignments
        .update_member_roles_and_hosts(
            &uid,
            UpdateRolesInput {
                roles: payload.roles,
                hosts: payload.hosts,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/admin/members/{uid}/roles
pub async fn get_roles<C: Connection>(
    State(state): State<AppState<C>>,
    Path(uid): Path<String>,
) -> ApiResult<Json<MemberRolesResponse>> {
    let grants = state.assignments.member_grants(&uid).await?;
    Ok(Json(MemberRolesResponse {
        roles: grants.roles,
        hosts: grants.hosts,
    }))
}

/// GET /v1/admin/members/{uid}/access?role=..&host=..
pub async fn check_access<C: Connection>(
    State(state): State<AppState<C>>,
    Path(uid): Path<String>,
    Query(query): Query<AccessQuery>,
) -> ApiResult<Json<AccessResponse>> {
    let role: RoleName = query.role.parse()?;
    let allowed = state.access.can_administer(&uid, role, &query.host).await;
    Ok(Json(AccessResponse { allowed }))
}

/// GET /v1/admin/members/{uid}/demo-days/{slug}/access
pub async fn check_demo_day_access<C: Connection>(
    State(state): State<AppState<C>>,
    Path((uid, slug)): Path<(String, String)>,
) -> Json<AccessResponse> {
    let allowed = state.access.can_administer_demo_day(&uid, &slug).await;
    Json(AccessResponse { allowed })
}
