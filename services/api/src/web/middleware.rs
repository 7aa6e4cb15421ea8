//! services/api/src/web/middleware.rs
//!
//! Student identification middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::web::state::AppState;

pub const STUDENT_ID_HEADER: &str = "x-student-id";
pub const STUDENT_NAME_HEADER: &str = "x-student-name";

/// Middleware that resolves the student from the id and name headers.
///
/// If both match a stored profile, the `Profile` is inserted into request
/// extensions for handlers to use. Otherwise returns 401 Unauthorized.
pub async fn require_student(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract both identification headers; the borrow of `req` ends here
    let (student_id, student_name) = {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or(StatusCode::UNAUTHORIZED)
        };
        (header(STUDENT_ID_HEADER)?, header(STUDENT_NAME_HEADER)?)
    };

    // 2. Look the profile up; a wrong id and a wrong name look the same from outside
    let profile = state
        .store
        .find(&student_id, &student_name)
        .await
        .ok_or_else(|| {
            debug!(student_id = %student_id, "Rejected request for unknown student.");
            StatusCode::UNAUTHORIZED
        })?;

    // 3. Insert the profile into request extensions
    req.extensions_mut().insert(profile);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>(_: T) {}

    // Checked at compile time: `from_fn_with_state` needs a `Send` future.
    #[allow(dead_code)]
    fn require_student_future_is_send(
        state: State<Arc<AppState>>,
        req: Request,
        next: Next,
    ) {
        assert_send(require_student(state, req, next));
    }
}
