use crate::api::ApiError;
use crate::features::auth::AuthGateway;
use crate::features::categories::types::Category;

/// Post categories via `GET /blog/categories/`. Public endpoint; the bearer
/// token rides along when a session exists.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn list(gateway: &AuthGateway) -> Result<Vec<Category>, ApiError> {
    gateway.get_json_optional_auth("/blog/categories/").await
}
