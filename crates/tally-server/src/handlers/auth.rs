//! Authentication-related handlers

use axum::extract::Request;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{get_user_id, AppState};

/// Response for the /api/me endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    /// The id every record of this caller is stored under
    pub user: String,
    /// How the user was authenticated
    pub auth_method: String,
}

/// GET /api/me - Get the currently authenticated user
pub async fn get_me(State(state): State<Arc<AppState>>, request: Request) -> Json<MeResponse> {
    let user = get_user_id(request.headers());

    let auth_method = match user.as_str() {
        "api-key" => "api_key",
        "local-dev" if !state.config.require_auth => "none",
        "local-dev" => "unknown",
        _ => "cloudflare_header",
    };

    Json(MeResponse {
        user,
        auth_method: auth_method.to_string(),
    })
}
