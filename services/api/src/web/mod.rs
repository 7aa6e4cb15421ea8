pub mod auth;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

pub use middleware::require_student;
pub use rest::ApiDoc;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Upper bound for request bodies, uploads included.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Builds the API router: public signup/login plus the student-scoped routes.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no student headers required)
    let public_routes = Router::new()
        .route("/signup", post(auth::signup_handler))
        .route("/login", post(auth::login_handler));

    // Protected routes (student headers required)
    let protected_routes = Router::new()
        .route("/me", get(rest::me_handler))
        .route("/me/wellness", get(rest::wellness_handler))
        .route(
            "/me/materials",
            get(rest::list_materials_handler).post(rest::upload_material_handler),
        )
        .route(
            "/me/materials/{index}/done",
            post(rest::complete_material_handler),
        )
        .route(
            "/me/materials/{index}/projects",
            post(rest::project_ideas_handler),
        )
        .route("/me/study-plan", post(rest::study_plan_handler))
        .route("/me/support", post(rest::support_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_student,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonProfileStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use learnwell_core::{ports::ProfileStore, Backend, ContentGenerator};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(dir: &TempDir) -> Router {
        let state = Arc::new(AppState {
            store: Arc::new(JsonProfileStore::new(dir.path().join("users_database.json"))),
            generator: Arc::new(ContentGenerator::new(Backend::Disabled)),
        });
        router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn signup_body(goal: &str) -> Body {
        Body::from(
            json!({
                "basic": { "name": "Maya Chen", "email": "maya@example.com", "year_of_study": 2, "subject": "Computer Science" },
                "preferences": { "learning_style": "visual", "preferred_study_time": "Evening", "weekly_study_hours": 12 },
                "wellbeing": { "anxiety": 8, "stress": 6, "sleep_hours": 5.5, "sleep_quality": "poor" },
                "goals": { "primary_goal": goal, "barriers": ["Procrastination"] }
            })
            .to_string(),
        )
    }

    async fn sign_up(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::post("/signup")
                    .header("content-type", "application/json")
                    .body(signup_body("Pass algorithms"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }

    fn as_student(builder: axum::http::request::Builder, id: &str) -> axum::http::request::Builder {
        builder
            .header("x-student-id", id)
            .header("x-student-name", "maya CHEN")
    }

    fn upload(id: &str, file_name: &str, content: &str) -> Request<Body> {
        let boundary = "learnwell-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
            b = boundary,
            f = file_name,
            c = content
        );
        as_student(Request::post("/me/materials"), id)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn signup_rejects_a_blank_goal() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(
                Request::post("/signup")
                    .header("content-type", "application/json")
                    .body(signup_body("  "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("users_database.json").exists());
    }

    #[tokio::test]
    async fn signup_fills_omitted_study_fields_with_defaults() {
        let dir = TempDir::new().unwrap();
        let body = json!({
            "basic": { "name": "Sam Okafor", "email": "sam@example.com", "subject": "History" },
            "goals": { "primary_goal": "Finish my dissertation" }
        });
        let response = app(&dir)
            .oneshot(
                Request::post("/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let summary = body_json(response).await;
        assert_eq!(summary["year_of_study"], 1);

        let store = JsonProfileStore::new(dir.path().join("users_database.json"));
        let id = summary["id"].as_str().unwrap();
        let stored = store.find(id, "Sam Okafor").await.unwrap();
        assert_eq!(stored.weekly_study_hours(), 15);
        assert_eq!(stored.anxiety(), 5);
    }

    #[tokio::test]
    async fn login_matches_id_and_normalized_name() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = sign_up(&app).await;

        let login = |name: &str| {
            Request::post("/login")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "student_id": id, "name": name }).to_string()))
                .unwrap()
        };
        let ok = app.clone().oneshot(login(" MAYA CHEN")).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(body_json(ok).await["subject"], "Computer Science");

        let wrong = app.clone().oneshot(login("Someone Else")).await.unwrap();
        assert_eq!(wrong.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_routes_require_known_student() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let response = app
            .clone()
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                as_student(Request::get("/me"), "STU20250099")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wellness_reflects_the_intake_answers() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = sign_up(&app).await;

        let response = app
            .oneshot(
                as_student(Request::get("/me/wellness"), &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let messages = body_json(response).await["messages"]
            .as_array()
            .unwrap()
            .len();
        // High anxiety and short sleep, stress below the threshold.
        assert_eq!(messages, 2);
    }

    #[tokio::test]
    async fn upload_complete_and_plan_flow() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = sign_up(&app).await;

        // Upload produces a template lesson when no backend is configured.
        let response = app
            .clone()
            .oneshot(upload(&id, "graphs.txt", "Breadth-first search visits..."))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let uploaded = body_json(response).await;
        assert_eq!(uploaded["index"], 0);
        assert_eq!(uploaded["lesson"]["origin"], "template");

        // Pending material is planned for.
        let plan = body_json(
            app.clone()
                .oneshot(
                    as_student(Request::post("/me/study-plan"), &id)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(plan["pending_materials"], json!(["graphs.txt"]));

        // Completion is counted once.
        let done = || {
            as_student(Request::post("/me/materials/0/done"), &id)
                .body(Body::empty())
                .unwrap()
        };
        let first = body_json(app.clone().oneshot(done()).await.unwrap()).await;
        assert_eq!(first["newly_completed"], true);
        assert_eq!(first["completed_count"], 1);
        let second = body_json(app.clone().oneshot(done()).await.unwrap()).await;
        assert_eq!(second["newly_completed"], false);
        assert_eq!(second["completed_count"], 1);

        let summary = body_json(
            app.oneshot(as_student(Request::get("/me"), &id).body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(summary["materials_count"], 1);
        assert_eq!(summary["completed_count"], 1);
    }

    #[tokio::test]
    async fn project_ideas_are_stored_on_the_material() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = sign_up(&app).await;
        app.clone()
            .oneshot(upload(&id, "sorting.txt", "Merge sort splits..."))
            .await
            .unwrap();

        let missing = app
            .clone()
            .oneshot(
                as_student(Request::post("/me/materials/3/projects"), &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let ideas = app
            .clone()
            .oneshot(
                as_student(Request::post("/me/materials/0/projects"), &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ideas.status(), StatusCode::OK);
        let ideas = body_json(ideas).await;

        let listed = body_json(
            app.oneshot(
                as_student(Request::get("/me/materials"), &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(listed[0]["project_ideas"], ideas["text"]);
        assert_eq!(listed[0]["has_document"], true);
    }

    #[tokio::test]
    async fn support_requires_a_focus_area() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = sign_up(&app).await;

        let support = |area: &str| {
            as_student(Request::post("/me/support"), &id)
                .header("content-type", "application/json")
                .body(Body::from(json!({ "area": area }).to_string()))
                .unwrap()
        };
        let blank = app.clone().oneshot(support(" ")).await.unwrap();
        assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

        let guidance = body_json(
            app.oneshot(support("Managing my anxiety/stress"))
                .await
                .unwrap(),
        )
        .await;
        assert!(guidance["text"]
            .as_str()
            .unwrap()
            .contains("Managing my anxiety/stress"));
    }
}
