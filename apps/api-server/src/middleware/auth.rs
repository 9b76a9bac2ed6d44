//! Admin authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use quill_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the admin bearer token.
///
/// Add it as a handler argument to gate a route:
/// ```ignore
/// async fn delete_post(_admin: Admin, path: web::Path<i32>) -> AppResult<HttpResponse> { .. }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Admin;

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingAuth)
}

impl FromRequest for Admin {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AppError::Internal(
                "Server configuration error".to_string(),
            )));
        };

        let result = bearer_token(req)
            .and_then(|token| state.auth.authenticate(token))
            .map(|()| Admin)
            .map_err(AppError::from);

        ready(result)
    }
}
