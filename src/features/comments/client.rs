use crate::api::ApiError;
use crate::features::auth::AuthGateway;
use crate::features::comments::types::Comment;
use serde::Serialize;

#[derive(Serialize)]
struct NewComment<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<u64>,
}

/// Comments for a post via `GET /blog/posts/{id}/comments/`. The backend is
/// known to emit `null` entries for deleted rows; they are filtered out here
/// so callers only ever see real comments.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn list(gateway: &AuthGateway, post_id: u64) -> Result<Vec<Comment>, ApiError> {
    let raw: Vec<Option<Comment>> = gateway
        .get_json_optional_auth(&format!("/blog/posts/{post_id}/comments/"))
        .await?;

    Ok(raw.into_iter().flatten().collect())
}

/// Post a comment, optionally as a reply to `parent`, via
/// `POST /blog/posts/{id}/comments/`.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
pub async fn create(
    gateway: &AuthGateway,
    post_id: u64,
    content: &str,
    parent: Option<u64>,
) -> Result<Comment, ApiError> {
    gateway
        .post_json(
            &format!("/blog/posts/{post_id}/comments/"),
            &NewComment { content, parent },
        )
        .await
}
