//! Request-scoped caller identity.
//!
//! Handlers take an [`AuthContext`] argument instead of reading ambient
//! session state. The context is decoded from the `Authorization: Bearer`
//! header on every request.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use crate::error::AppError;
use crate::models::Role;
use crate::routes::AppState;
use crate::services::Identity;

/// The authenticated caller of the current request
#[derive(Debug, Clone)]
pub struct AuthContext(Identity);

impl AuthContext {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    /// Require the caller to hold `role`, returning their account id
    pub fn require(&self, role: Role) -> Result<i64, AppError> {
        if self.0.role == role {
            Ok(self.0.user_id)
        } else {
            tracing::info!(
                "{} {} tried to use a {} endpoint",
                self.0.role,
                self.0.user_id,
                role
            );
            Err(AppError::Unauthorized(format!("{} login required", role)))
        }
    }

    fn from_request_sync(req: &HttpRequest) -> Result<Self, AppError> {
        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| AppError::Internal("application state missing".to_string()))?;

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized("login required".to_string()))?;

        state
            .tokens
            .verify(token)
            .map(AuthContext)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {}", e);
                AppError::Unauthorized("invalid or expired session".to_string())
            })
    }
}

impl FromRequest for AuthContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_sync(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let ctx = AuthContext(Identity {
            user_id: 3,
            role: Role::Receiver,
            name: "Meera".to_string(),
        });

        assert_eq!(ctx.require(Role::Receiver).unwrap(), 3);
        assert!(matches!(ctx.require(Role::Donor), Err(AppError::Unauthorized(_))));
    }
}
