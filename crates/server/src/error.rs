//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error body is JSON: `{ "error": "<code>", "message": "<text>" }`.
//! Validation failures answer `422` and may add a `fields` list.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use glassspire_core::access::AccessDenied;
use glassspire_core::account::ProfileErrors;
use glassspire_core::lifecycle::TransitionRefused;
use glassspire_core::messaging::MessageError;
use glassspire_core::payment::CardErrors;
use glassspire_core::subscription::SubscriptionError;
use glassspire_core::validation::OrderRejection;

use crate::db::RepositoryError;

/// A message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Input the user can fix and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Rejection {
    pub code: &'static str,
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl Rejection {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }
}

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No identity, or one with no profile record.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Identity known but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Retailer without an active subscription.
    #[error("{0}")]
    SubscriptionRequired(AccessDenied),

    /// Resource already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation failed.
    #[error("{0}")]
    Rejected(Rejection),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "<[FieldError]>::is_empty")]
    fields: &'a [FieldError],
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::SubscriptionRequired(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => "not_found",
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => "conflict",
            Self::Database(_) | Self::Internal(_) => "internal",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::SubscriptionRequired(_) => "subscription_required",
            Self::BadRequest(_) => "bad_request",
            Self::Rejected(rejection) => rejection.code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Rejected(rejection) => rejection.message.clone(),
            _ => self.to_string(),
        };

        let fields: &[FieldError] = match &self {
            Self::Rejected(rejection) => rejection.fields.as_slice(),
            _ => &[],
        };

        let body = ErrorBody {
            error: self.code(),
            message,
            fields,
        };
        (status, Json(body)).into_response()
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

/// `Json` whose rejections answer with the JSON error body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => {
                Self::Rejected(Rejection::new("invalid_body", rejection.body_text()))
            }
            _ => Self::BadRequest(rejection.body_text()),
        }
    }
}

impl From<OrderRejection> for AppError {
    fn from(err: OrderRejection) -> Self {
        Self::Rejected(Rejection {
            code: err.code(),
            message: err.to_string(),
            fields: vec![FieldError {
                field: err.field().to_string(),
                message: err.to_string(),
            }],
        })
    }
}

impl From<TransitionRefused> for AppError {
    fn from(err: TransitionRefused) -> Self {
        Self::Forbidden(err.to_string())
    }
}

impl From<AccessDenied> for AppError {
    fn from(err: AccessDenied) -> Self {
        Self::SubscriptionRequired(err)
    }
}

impl From<MessageError> for AppError {
    fn from(err: MessageError) -> Self {
        let code = match err {
            MessageError::EmptyContent => "empty_content",
            MessageError::SelfAddressed => "self_addressed",
            MessageError::SameAccountType { .. } => "same_account_type",
        };
        Self::Rejected(Rejection::new(code, err.to_string()))
    }
}

impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::CustomerPlanNotBilled => {
                Self::Rejected(Rejection::new("customer_plan_not_billed", err.to_string()))
            }
        }
    }
}

impl From<CardErrors> for AppError {
    fn from(errors: CardErrors) -> Self {
        let fields = errors
            .0
            .iter()
            .map(|e| FieldError {
                field: field_name(&e.field()),
                message: e.to_string(),
            })
            .collect();
        Self::Rejected(Rejection {
            code: "invalid_card",
            message: errors.to_string(),
            fields,
        })
    }
}

impl From<ProfileErrors> for AppError {
    fn from(errors: ProfileErrors) -> Self {
        let fields = errors
            .0
            .iter()
            .map(|e| FieldError {
                field: field_name(&e.field()),
                message: e.to_string(),
            })
            .collect();
        Self::Rejected(Rejection {
            code: "invalid_profile",
            message: errors.to_string(),
            fields,
        })
    }
}

/// Wire name of a field enum, as serde writes it.
fn field_name<T: Serialize>(field: &T) -> String {
    match serde_json::to_value(field) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the current request.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use glassspire_core::SubscriptionStatus;
    use glassspire_core::payment::{CardError, CardErrors};

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 12".to_string());
        assert_eq!(err.to_string(), "Not found: order 12");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict("dup".to_string()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_order_rejection_is_422_with_code() {
        let (status, body) = body_json(OrderRejection::MissingThickness.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "missing_thickness");
        assert_eq!(body["message"], "Please select a glass thickness");
        assert_eq!(body["fields"][0]["field"], "glass_thickness");
    }

    #[tokio::test]
    async fn test_card_errors_list_fields() {
        let err: AppError =
            CardErrors(vec![CardError::NumberChecksum, CardError::Expired]).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "invalid_card");
        assert_eq!(body["fields"][0]["field"], "card_number");
        assert_eq!(body["fields"][1]["field"], "expiry");
    }

    #[tokio::test]
    async fn test_subscription_required() {
        let err: AppError = AccessDenied::SubscriptionRequired {
            status: SubscriptionStatus::Trial,
        }
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "subscription_required");
        assert!(body.get("fields").is_none());
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = body_json(AppError::Internal("pool exhausted".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
