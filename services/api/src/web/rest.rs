//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the learner-facing REST endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Every handler here runs behind `require_student`, which puts the caller's
//! `Profile` into the request extensions.

use crate::web::{
    auth,
    protocol::{
        BasicInfoPayload, CompletionResponse, DifferencePayload, GeneratedResponse,
        GoalsPayload, LoginRequest, MaterialView, OriginView, PreferencesPayload,
        ProfileSummary, SignupRequest, StudyPlanResponse, SupportRequest, UploadResponse,
        WellbeingPayload, WellnessResponse,
    },
    state::AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use learnwell_core::{
    ports::PortError, wellness_messages, Profile, ProfileError, SourceDocument,
};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        me_handler,
        wellness_handler,
        list_materials_handler,
        upload_material_handler,
        complete_material_handler,
        project_ideas_handler,
        study_plan_handler,
        support_handler,
    ),
    components(
        schemas(
            SignupRequest, BasicInfoPayload, PreferencesPayload, WellbeingPayload,
            DifferencePayload, GoalsPayload, LoginRequest, SupportRequest,
            ProfileSummary, MaterialView, UploadResponse, CompletionResponse,
            StudyPlanResponse, WellnessResponse, GeneratedResponse, OriginView
        )
    ),
    tags(
        (name = "LearnWell API", description = "Personalized lessons, study plans and wellbeing support for students.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Helpers
//=========================================================================================

fn store_failure(e: PortError) -> (StatusCode, String) {
    error!("Failed to save profile: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to save profile".to_string(),
    )
}

fn missing_material(e: ProfileError) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, e.to_string())
}

//=========================================================================================
// Profile Handlers
//=========================================================================================

/// The logged-in learner's profile summary.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile summary", body = ProfileSummary),
        (status = 401, description = "Unknown student")
    ),
    params(
        ("x-student-id" = String, Header, description = "The student ID, e.g. STU20250001."),
        ("x-student-name" = String, Header, description = "The student's name.")
    )
)]
pub async fn me_handler(Extension(profile): Extension<Profile>) -> Json<ProfileSummary> {
    Json(ProfileSummary::from(&profile))
}

/// Wellbeing reminders derived from the learner's latest check-in.
#[utoipa::path(
    get,
    path = "/me/wellness",
    responses(
        (status = 200, description = "Advisory messages, never empty", body = WellnessResponse),
        (status = 401, description = "Unknown student")
    )
)]
pub async fn wellness_handler(Extension(profile): Extension<Profile>) -> Json<WellnessResponse> {
    let messages = wellness_messages(&profile)
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(WellnessResponse { messages })
}

//=========================================================================================
// Material Handlers
//=========================================================================================

/// Lists the learner's materials in upload order, without document bytes.
#[utoipa::path(
    get,
    path = "/me/materials",
    responses(
        (status = 200, description = "Materials", body = Vec<MaterialView>),
        (status = 401, description = "Unknown student")
    )
)]
pub async fn list_materials_handler(
    Extension(profile): Extension<Profile>,
) -> Json<Vec<MaterialView>> {
    Json(
        profile
            .materials
            .iter()
            .enumerate()
            .map(|(i, m)| MaterialView::new(i, m))
            .collect(),
    )
}

/// Upload a document and turn it into a personalized lesson.
///
/// Accepts a multipart/form-data request; the first part carrying a file is used.
#[utoipa::path(
    post,
    path = "/me/materials",
    request_body(content_type = "multipart/form-data", description = "The document to learn from."),
    responses(
        (status = 201, description = "Material stored with its lesson", body = UploadResponse),
        (status = 400, description = "Missing or empty file"),
        (status = 401, description = "Unknown student"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_material_handler(
    State(state): State<Arc<AppState>>,
    Extension(mut profile): Extension<Profile>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Read the uploaded file
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        upload = Some((name, data.to_vec()));
        break;
    }
    let (file_name, bytes) = upload.ok_or((
        StatusCode::BAD_REQUEST,
        "Multipart form must include a file".to_string(),
    ))?;
    if bytes.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Uploaded file is empty".to_string()));
    }

    // 2. Generate the lesson
    let document = SourceDocument::from_upload(bytes);
    let lesson = state
        .generator
        .lesson(&profile, &file_name, &document)
        .await;

    // 3. Append and persist
    let index = profile.add_material(
        file_name.clone(),
        Some(document),
        lesson.text.clone(),
        Utc::now(),
    );
    state.store.save(&profile).await.map_err(store_failure)?;
    info!(student_id = %profile.id, material = %file_name, "Stored new material.");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            index,
            name: file_name,
            lesson: lesson.into(),
        }),
    ))
}

/// Mark a material as done. Repeating the call changes nothing.
#[utoipa::path(
    post,
    path = "/me/materials/{index}/done",
    responses(
        (status = 200, description = "Completion recorded", body = CompletionResponse),
        (status = 401, description = "Unknown student"),
        (status = 404, description = "No material at this index")
    ),
    params(("index" = usize, Path, description = "Position of the material in upload order."))
)]
pub async fn complete_material_handler(
    State(state): State<Arc<AppState>>,
    Extension(mut profile): Extension<Profile>,
    Path(index): Path<usize>,
) -> Result<Json<CompletionResponse>, (StatusCode, String)> {
    let newly_completed = profile
        .mark_material_done(index, Utc::now())
        .map_err(missing_material)?;
    if newly_completed {
        state.store.save(&profile).await.map_err(store_failure)?;
    }

    Ok(Json(CompletionResponse {
        index,
        newly_completed,
        completed_count: profile.completed_count,
        study_streak: profile.study_streak,
    }))
}

/// Generate project ideas for a material and store them on it.
#[utoipa::path(
    post,
    path = "/me/materials/{index}/projects",
    responses(
        (status = 200, description = "Project ideas", body = GeneratedResponse),
        (status = 401, description = "Unknown student"),
        (status = 404, description = "No material at this index"),
        (status = 500, description = "Internal server error")
    ),
    params(("index" = usize, Path, description = "Position of the material in upload order."))
)]
pub async fn project_ideas_handler(
    State(state): State<Arc<AppState>>,
    Extension(mut profile): Extension<Profile>,
    Path(index): Path<usize>,
) -> Result<Json<GeneratedResponse>, (StatusCode, String)> {
    let material = profile
        .materials
        .get(index)
        .ok_or_else(|| missing_material(ProfileError::MaterialNotFound(index)))?;
    let ideas = state.generator.project_ideas(&profile, material).await;

    profile
        .record_project_ideas(index, ideas.text.clone(), Utc::now())
        .map_err(missing_material)?;
    state.store.save(&profile).await.map_err(store_failure)?;

    Ok(Json(ideas.into()))
}

//=========================================================================================
// Planning and Support Handlers
//=========================================================================================

/// A weekly study plan covering every material not yet done.
#[utoipa::path(
    post,
    path = "/me/study-plan",
    responses(
        (status = 200, description = "Study plan", body = StudyPlanResponse),
        (status = 401, description = "Unknown student")
    )
)]
pub async fn study_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Json<StudyPlanResponse> {
    let pending = profile.pending_material_names();
    let plan = state.generator.study_plan(&profile, &pending).await;
    Json(StudyPlanResponse {
        pending_materials: pending,
        plan: plan.into(),
    })
}

/// Personalized guidance for one focus area.
#[utoipa::path(
    post,
    path = "/me/support",
    request_body = SupportRequest,
    responses(
        (status = 200, description = "Support guidance", body = GeneratedResponse),
        (status = 400, description = "Blank focus area"),
        (status = 401, description = "Unknown student")
    )
)]
pub async fn support_handler(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Json(req): Json<SupportRequest>,
) -> Result<Json<GeneratedResponse>, (StatusCode, String)> {
    let area = req.area.trim();
    if area.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "A focus area is required".to_string()));
    }
    let guidance = state.generator.support(&profile, area).await;
    Ok(Json(guidance.into()))
}
