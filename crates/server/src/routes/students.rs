use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use service::students::{CreateStudentInput, Student, UpdateStudentInput};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// `GET /students`
pub async fn list_students(State(state): State<ServerState>) -> Json<Vec<Student>> {
    Json(state.students.list().await)
}

/// `GET /students/:id`
pub async fn get_student(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, JsonApiError> {
    Ok(Json(state.students.get(&id).await?))
}

/// `POST /students`
pub async fn create_student(
    State(state): State<ServerState>,
    payload: Result<Json<CreateStudentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), JsonApiError> {
    let Json(input) = payload?;
    let student = state.students.create(input).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// `PUT /students/:id`
///
/// Every field is optional, so a missing body (or one not sent as JSON) is an
/// empty update and the id lookup alone decides between 200 and 404.
pub async fn update_student(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Student>, JsonApiError> {
    let input = update_input(&headers, &body)?;
    Ok(Json(state.students.update(&id, input).await?))
}

fn update_input(headers: &HeaderMap, body: &[u8]) -> Result<UpdateStudentInput, JsonApiError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpdateStudentInput::default());
    }
    let Json(input) = Json::<UpdateStudentInput>::from_bytes(body)?;
    Ok(input)
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}


/// `DELETE /students/:id`
pub async fn delete_student(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    state.students.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
