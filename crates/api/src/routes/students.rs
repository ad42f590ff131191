//! Student routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::middleware::auth::app_error_response;
use crate::{AppState, middleware::AuthContext};
use sala_db::repositories::{CreateStudentInput, StudentFilter, StudentRepository};
use sala_shared::AppError;

/// Creates the student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students", post(create_student))
        .route("/students/{student_id}", get(get_student))
}

/// Query parameters for listing students.
#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    /// Filter by grade.
    pub grade: Option<String>,
    /// Include deactivated students.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for registering a student.
#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    /// Campus-unique student code.
    pub student_code: String,
    /// Full name.
    pub full_name: String,
    /// Grade, if known.
    pub grade: Option<String>,
    /// Guardian name, if known.
    pub guardian_name: Option<String>,
    /// Guardian phone, if known.
    pub guardian_phone: Option<String>,
}

/// GET /students - List students in the selected campus.
async fn list_students(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<ListStudentsQuery>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = StudentRepository::new((*state.db).clone());
    let filter = StudentFilter {
        grade: query.grade,
        include_inactive: query.include_inactive,
    };

    match repo.list(campus_id, filter).await {
        Ok(students) => Json(json!({ "students": students })).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list students");
            internal_error("Failed to list students")
        }
    }
}

/// POST /students - Register a student (write access).
async fn create_student(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(payload): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };
    if let Err(err) = ctx.0.require_write(campus_id) {
        return app_error_response(&err);
    }

    if payload.student_code.trim().is_empty() || payload.full_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "student_code and full_name are required"
            })),
        )
            .into_response();
    }

    let repo = StudentRepository::new((*state.db).clone());
    let input = CreateStudentInput {
        campus_id,
        student_code: payload.student_code,
        full_name: payload.full_name,
        grade: payload.grade,
        guardian_name: payload.guardian_name,
        guardian_phone: payload.guardian_phone,
    };

    match repo.create(input).await {
        Ok(student) => {
            info!(student_id = %student.id, campus_id = %campus_id, "Student registered");
            (StatusCode::CREATED, Json(json!({ "student": student }))).into_response()
        }
        Err(e) => {
            if e.to_string().contains("uq_students_code") {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "error": "duplicate_student_code",
                        "message": "A student with this code already exists at the campus"
                    })),
                )
                    .into_response();
            }
            error!(error = %e, "Failed to register student");
            internal_error("Failed to register student")
        }
    }
}

/// GET /students/{student_id} - Fetch one student.
async fn get_student(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(student_id): Path<Uuid>,
) -> impl IntoResponse {
    let campus_id = match ctx.campus() {
        Ok(campus_id) => campus_id,
        Err(response) => return response,
    };

    let repo = StudentRepository::new((*state.db).clone());
    match repo.find(student_id).await {
        Ok(Some(student)) if student.campus_id != campus_id => app_error_response(
            &AppError::Forbidden("Student belongs to another campus".to_string()),
        ),
        Ok(Some(student)) => Json(json!({ "student": student })).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "student_not_found",
                "message": "Student not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch student");
            internal_error("Failed to fetch student")
        }
    }
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error", "message": message })),
    )
        .into_response()
}
