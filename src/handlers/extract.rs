use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use tracing::warn;

use crate::models::error::ApiError;

/// `Json` whose rejections are reported through `ApiError` like every other failure.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                warn!(
                    status = %rejection.status(),
                    "Rejected request body: {}",
                    rejection.body_text()
                );
                Err(ApiError::invalid_request(rejection.status()))
            }
        }
    }
}
