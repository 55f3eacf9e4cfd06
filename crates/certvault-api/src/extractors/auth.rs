//! `AuthUser` extractor.
//!
//! Identity arrives as trusted headers set by the auth gateway in front
//! of this service: `x-user-id`, `x-user-name`, `x-user-role`, and
//! `x-organization-id`. The extractor also enforces the role's route
//! prefix allowlist, so a client token can never reach audit endpoints
//! no matter what the handlers do.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use uuid::Uuid;

use certvault_core::error::AppError;
use certvault_entity::user::Role;
use certvault_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let user_id = header("x-user-id")
            .ok_or_else(|| AppError::unauthorized("Missing x-user-id header"))?;
        let role = header("x-user-role")
            .ok_or_else(|| AppError::unauthorized("Missing x-user-role header"))?
            .parse::<Role>()?;
        let user_name = header("x-user-name").unwrap_or_else(|| user_id.clone());

        let organization_id = match header("x-organization-id") {
            Some(raw) => Some(
                raw.parse::<Uuid>()
                    .map_err(|_| AppError::validation("Invalid x-organization-id header"))?,
            ),
            None => None,
        };

        let path = parts.uri.path();
        let allowed = role
            .allowed_route_prefixes()
            .iter()
            .any(|prefix| path.starts_with(prefix));
        if !allowed {
            return Err(ApiError(AppError::forbidden(format!(
                "Role '{role}' may not access this endpoint"
            ))));
        }

        let ip = header("x-forwarded-for")
            .and_then(|raw| raw.split(',').next().map(|s| s.trim().to_string()));
        let user_agent = header("user-agent");
        let request_id = header("x-request-id").and_then(|raw| raw.parse::<Uuid>().ok());

        Ok(Self(RequestContext {
            user_id,
            user_name,
            role,
            organization_id,
            ip,
            user_agent,
            request_id,
            request_time: Utc::now(),
        }))
    }
}
