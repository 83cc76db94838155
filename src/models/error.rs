//! Outward error payload shared by every handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    GenericError,
    GenericUpdateError,
    GenericDeleteError,
    ResourceNotFound,
    InvalidRequest,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    pub code: ErrorCode,
    pub http_status: u16,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: ErrorCode, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            code,
            http_status: status.as_u16(),
        }
    }

    pub fn placement() -> Self {
        Self::new(
            "there was an error placing your order.",
            ErrorCode::GenericError,
            StatusCode::BAD_REQUEST,
        )
    }

    pub fn update() -> Self {
        Self::new(
            "there was an error updating the requested resource",
            ErrorCode::GenericUpdateError,
            StatusCode::BAD_REQUEST,
        )
    }

    pub fn deletion() -> Self {
        Self::new(
            "there was an error deleting the requested resource",
            ErrorCode::GenericDeleteError,
            StatusCode::BAD_REQUEST,
        )
    }

    pub fn not_found() -> Self {
        Self::new(
            "the requested resource was not found",
            ErrorCode::ResourceNotFound,
            StatusCode::NOT_FOUND,
        )
    }

    /// Body could not be parsed into the expected request. `status` is the
    /// client-error status the extractor chose (400, 415 or 422).
    pub fn invalid_request(status: StatusCode) -> Self {
        Self::new("the request body is invalid", ErrorCode::InvalidRequest, status)
    }

    pub fn internal() -> Self {
        Self::new(
            "internal server error",
            ErrorCode::InternalError,
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_value(ApiError::update()).unwrap();

        assert_eq!(json["code"], "GENERIC_UPDATE_ERROR");
        assert_eq!(json["httpStatus"], 400);
        assert_eq!(
            json["message"],
            "there was an error updating the requested resource"
        );
    }

    #[test]
    fn test_internal_is_500() {
        let err = ApiError::internal();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(err).unwrap()["code"],
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_invalid_request_keeps_extractor_status() {
        let err = ApiError::invalid_request(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = serde_json::to_value(err).unwrap();
        assert_eq!(json["code"], "INVALID_REQUEST");
        assert_eq!(json["httpStatus"], 422);
    }
}
