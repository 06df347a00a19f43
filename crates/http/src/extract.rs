//! Request extractors.

use axum::extract::{FromRequest, FromRequestParts, OptionalFromRequest, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body that may be absent.
///
/// A request without a JSON content type yields `JsonBody(None)` so the
/// handler can reject it with its own message. A body that is present but
/// malformed is rejected here as a bad request.
#[derive(Debug)]
pub struct JsonBody<T>(pub Option<T>);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await {
            Ok(body) => Ok(JsonBody(body.map(|Json(value)| value))),
            Err(rejection) => {
                tracing::warn!(reason = %rejection.body_text(), "unreadable request body");
                Err(AppError::bad_request(rejection.body_text()))
            }
        }
    }
}

/// Path parameters whose rejection is reported in the JSON error body.
#[derive(Debug)]
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) if rejection.status().is_server_error() => Err(AppError::internal(
                format!("path extraction failed: {}", rejection.body_text()),
            )),
            Err(rejection) => {
                tracing::warn!(reason = %rejection.body_text(), "unreadable path parameter");
                Err(AppError::bad_request(rejection.body_text()))
            }
        }
    }
}
