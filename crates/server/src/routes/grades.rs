use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// `{"average": number | null}`
#[derive(Debug, Serialize, PartialEq)]
pub struct AverageResponse {
    pub average: Option<f64>,
}

/// `GET /students/:id/average`
pub async fn student_average(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AverageResponse>, JsonApiError> {
    let average = state.students.student_average(&id).await?;
    Ok(Json(AverageResponse { average }))
}

/// `GET /grades/average`
pub async fn class_average(State(state): State<ServerState>) -> Json<AverageResponse> {
    Json(AverageResponse { average: state.students.class_average().await })
}
