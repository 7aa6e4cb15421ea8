//! services/api/src/web/auth.rs
//!
//! Endpoints for creating a learner profile and for logging in with id and name.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use learnwell_core::{
    intake::{Preferences, WellbeingInput},
    IntakeError, IntakeWizard,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::web::{
    protocol::{LoginRequest, ProfileSummary, SignupRequest},
    state::AppState,
};

fn rejected(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /signup - Create a learner profile from the four intake steps
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileSummary),
        (status = 400, description = "A step failed validation"),
        (status = 500, description = "The profile could not be saved")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Walk the intake steps in order
    let mut wizard = IntakeWizard::new();
    wizard.submit_basic_info(req.basic.into()).map_err(rejected)?;
    wizard
        .submit_preferences(Preferences::try_from(req.preferences).map_err(rejected)?)
        .map_err(rejected)?;
    wizard
        .submit_wellbeing(WellbeingInput::try_from(req.wellbeing).map_err(rejected)?)
        .map_err(rejected)?;

    // 2. Validate goals and persist
    let profile = wizard
        .finish(req.goals.into(), state.store.as_ref(), Utc::now())
        .await
        .map_err(|e| match e {
            IntakeError::Store(e) => {
                error!("Failed to save new profile: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save profile".to_string(),
                )
            }
            other => rejected(other),
        })?;

    info!(student_id = %profile.id, "Created learner profile.");
    Ok((StatusCode::CREATED, Json(ProfileSummary::from(&profile))))
}

/// POST /login - Look a learner up by id and name
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ProfileSummary),
        (status = 404, description = "No profile with this id and name")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = state
        .store
        .find(&req.student_id, &req.name)
        .await
        .ok_or((
            StatusCode::NOT_FOUND,
            "Student ID not found or name doesn't match".to_string(),
        ))?;

    Ok((StatusCode::OK, Json(ProfileSummary::from(&profile))))
}
