//! Request body extraction with `{detail}` rejections

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::DeepvistaError;

/// `Json<T>` whose rejection is a [`DeepvistaError::Validation`], so malformed
/// or mistyped bodies get the same JSON error shape as every other failure.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DeepvistaError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(DeepvistaError::Validation(rejection.body_text())),
        }
    }
}
