//! Error handling - maps every failure onto an `{error, details}` body.

use std::fmt;

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use validator::ValidationErrors;

use quill_core::error::{DomainError, RepoError};
use quill_core::ports::AuthError;
use quill_shared::{ErrorResponse, FieldViolation};

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Validation(Vec<FieldViolation>),
    Unauthorized(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg) => ErrorResponse::new(msg.clone()),
            AppError::Validation(violations) => {
                ErrorResponse::new("Validation failed").with_details(violations.clone())
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::new("Internal server error")
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => {
                AppError::Validation(vec![FieldViolation::new(field, message)])
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(FieldViolation::from_errors(&errors))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        tracing::debug!(error = %err, "Admin authentication failed");
        let msg = match err {
            AuthError::MissingAuth => "Missing bearer token",
            AuthError::InvalidToken(_) => "Invalid admin token",
        };
        AppError::Unauthorized(msg.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        Resource::GENERIC.error(err)
    }
}

/// Names used when a repository failure is reported for one kind of record.
#[derive(Debug, Clone, Copy)]
pub struct Resource {
    name: &'static str,
    conflict: &'static str,
    /// Field blamed when a foreign key points nowhere.
    reference_field: &'static str,
}

impl Resource {
    pub const GENERIC: Resource = Resource {
        name: "Resource",
        conflict: "Resource already exists",
        reference_field: "id",
    };
    pub const POST: Resource = Resource {
        name: "Post",
        conflict: "A post with this slug already exists",
        reference_field: "category_id",
    };
    pub const CATEGORY: Resource = Resource {
        name: "Category",
        conflict: "A category with this name or slug already exists",
        reference_field: "id",
    };
    pub const COMMENT: Resource = Resource {
        name: "Comment",
        conflict: "Comment already exists",
        reference_field: "post_id",
    };

    pub fn not_found(&self) -> AppError {
        tracing::debug!(resource = self.name, "Not found");
        AppError::NotFound(format!("{} not found", self.name))
    }

    pub fn error(&self, err: RepoError) -> AppError {
        match err {
            RepoError::NotFound => self.not_found(),
            RepoError::Constraint(msg) => {
                tracing::debug!(resource = self.name, "Unique constraint rejected write: {}", msg);
                AppError::Conflict(self.conflict.to_string())
            }
            RepoError::Reference(msg) => {
                tracing::debug!(resource = self.name, "Foreign key rejected write: {}", msg);
                AppError::Validation(vec![FieldViolation::new(
                    self.reference_field,
                    "refers to a record that does not exist",
                )])
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Extractor settings that report malformed bodies, queries and paths as 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
    })
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    async fn body_json(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_repo_errors_map_to_statuses() {
        let cases = [
            (RepoError::NotFound, StatusCode::NOT_FOUND),
            (RepoError::Constraint("dup".into()), StatusCode::CONFLICT),
            (RepoError::Reference("fk".into()), StatusCode::BAD_REQUEST),
            (RepoError::Query("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(Resource::POST.error(err).status_code(), status);
        }
    }

    #[actix_web::test]
    async fn test_internal_errors_hide_details() {
        let body = body_json(AppError::Internal("password=hunter2".into())).await;
        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }

    #[actix_web::test]
    async fn test_domain_validation_names_the_field() {
        let err: AppError = DomainError::validation("title", "must contain a letter").into();
        let body = body_json(err).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "title");
    }

    #[actix_web::test]
    async fn test_not_found_names_the_resource() {
        let body = body_json(Resource::CATEGORY.error(RepoError::NotFound)).await;
        assert_eq!(body, serde_json::json!({ "error": "Category not found" }));
    }
}
