use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::borrow::Cow;
use std::collections::HashMap;

pub type ProfileResult<T, E = ProfileError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("profile not found")]
    ProfileNotFound,

    #[error("email is taken")]
    EmailTaken,

    #[error("missing form field: {0}")]
    MissingField(&'static str),

    #[error("invalid form field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: Cow<'static, str>,
    },

    #[error("malformed form submission: {0}")]
    MalformedForm(String),

    #[error("request body is too large")]
    PayloadTooLarge,

    #[error("uploaded file is not a valid image")]
    ImageDecode(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("could not access image storage")]
    Storage(#[from] std::io::Error),

    #[error("an error occurred with the database")]
    Sqlx(#[from] sqlx::Error),

    #[error("an internal server error occurred")]
    Anyhow(#[from] anyhow::Error),
}

impl ProfileError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedForm(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ImageDecode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        match self {
            Self::ProfileNotFound => (self.status_code(), ()).into_response(),
            Self::EmailTaken => {
                unprocessable_entity_with_errors([("email".into(), vec!["email is taken".into()])])
            }
            Self::MissingField(field) => {
                unprocessable_entity_with_errors([(field.into(), vec!["can't be blank".into()])])
            }
            Self::InvalidField { field, reason } => {
                unprocessable_entity_with_errors([(field.into(), vec![reason])])
            }
            Self::MalformedForm(ref message) => {
                (self.status_code(), message.clone()).into_response()
            }
            Self::PayloadTooLarge => (self.status_code(), self.to_string()).into_response(),
            Self::ImageDecode(ref e) => {
                tracing::error!("Image decode error: {:?}", e);
                (self.status_code(), self.to_string()).into_response()
            }
            Self::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (self.status_code(), self.to_string()).into_response()
            }
            Self::Sqlx(ref e) => {
                tracing::error!("SQLx error: {:?}", e);
                (self.status_code(), self.to_string()).into_response()
            }
            Self::Anyhow(ref e) => {
                tracing::error!("Generic error: {:?}", e);
                (self.status_code(), self.to_string()).into_response()
            }
        }
    }
}

#[derive(serde::Serialize)]
struct JsonErrors {
    errors: HashMap<Cow<'static, str>, Vec<Cow<'static, str>>>,
}

fn unprocessable_entity_with_errors(
    errors: impl Into<HashMap<Cow<'static, str>, Vec<Cow<'static, str>>>>,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(JsonErrors {
            errors: errors.into(),
        }),
    )
        .into_response()
}
