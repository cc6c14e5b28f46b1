use axum::{Json, extract::rejection::JsonRejection};
use catalog::DocumentId;
use tracing::debug;

use crate::error::AppError;

/// Unwraps a JSON body, reporting any rejection as a plain 400.
pub fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(payload)| payload).map_err(|rejection| {
        debug!("Rejected body: {rejection}");
        AppError::MalformedPayload
    })
}

pub fn parse_id(raw: &str, what: &str) -> Result<DocumentId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {what} id")))
}
