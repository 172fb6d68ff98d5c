//! Request extractors.

use axum::{
    Form,
    extract::{FromRequest, Request},
    http::header,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// JSON body extractor whose rejections become `AppError::BadRequest`,
/// so malformed or mistyped bodies answer 400 `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Body extractor for the account forms: URL-encoded when the request
/// says `application/x-www-form-urlencoded`, JSON otherwise.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with(FORM_CONTENT_TYPE));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(Self(value))
        } else {
            let ApiJson(value) = ApiJson::<T>::from_request(req, state).await?;
            Ok(Self(value))
        }
    }
}
