use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use model::entities::user;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::warn;

use crate::error::ApiError;
use crate::schemas::AppState;

/// Header carrying the authenticated caller identity. The authentication
/// layer in front of this service terminates tokens and forwards the
/// resolved email here.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The authenticated user behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                warn!("Authenticated email '{}' does not match any user", email);
                ApiError::Unauthorized("Authentication required".to_string())
            })?;

        Ok(CurrentUser(user))
    }
}
