use crate::api::{ApiClient, ApiError};
use crate::features::auth::AuthGateway;
use crate::features::posts::types::{NewPost, Post};
use reqwest::multipart::{Form, Part};
use url::form_urlencoded;

/// List the caller's visible posts via `GET /blog/posts/`.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
pub async fn list(gateway: &AuthGateway) -> Result<Vec<Post>, ApiError> {
    gateway.get_json("/blog/posts/").await
}

/// Fetch one post via `GET /blog/posts/{id}/`.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
pub async fn detail(gateway: &AuthGateway, id: u64) -> Result<Post, ApiError> {
    gateway.get_json(&format!("/blog/posts/{id}/")).await
}

/// Create a post via multipart `POST /blog/posts/`.
///
/// # Errors
/// Returns an error on an unreadable cover image or a rejected request.
pub async fn create(gateway: &AuthGateway, post: &NewPost) -> Result<Post, ApiError> {
    let form = build_form(post).await?;
    gateway.post_multipart("/blog/posts/", form).await
}

/// Update a post via multipart `PUT /blog/posts/{id}/`.
///
/// # Errors
/// Returns an error on an unreadable cover image or a rejected request.
pub async fn update(gateway: &AuthGateway, id: u64, post: &NewPost) -> Result<Post, ApiError> {
    let form = build_form(post).await?;
    gateway.put_multipart(&format!("/blog/posts/{id}/"), form).await
}

/// Delete a post via `DELETE /blog/posts/{id}/`.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
pub async fn delete(gateway: &AuthGateway, id: u64) -> Result<(), ApiError> {
    gateway.delete(&format!("/blog/posts/{id}/")).await
}

/// Toggle the caller's like via `POST /blog/posts/{id}/like/`.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
pub async fn like(gateway: &AuthGateway, id: u64) -> Result<(), ApiError> {
    gateway.post_empty(&format!("/blog/posts/{id}/like/")).await
}

/// Public popular-posts page via `GET /blog/posts/popular/`. Takes the bare
/// client; no session is needed.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn popular(api: &ApiClient, page: u32, page_size: usize) -> Result<Vec<Post>, ApiError> {
    api.get_json(
        &format!("/blog/posts/popular/?page={page}&page_size={page_size}"),
        None,
    )
    .await
}

/// One page of the personalized feed via
/// `GET /blog/posts/ml-personalized-popular/?page=`.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
pub async fn feed(gateway: &AuthGateway, page: u32) -> Result<Vec<Post>, ApiError> {
    gateway
        .get_json(&format!("/blog/posts/ml-personalized-popular/?page={page}"))
        .await
}

/// Full-text search via `GET /blog/search/?q=`.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
pub async fn search(gateway: &AuthGateway, query: &str) -> Result<Vec<Post>, ApiError> {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    gateway.get_json(&format!("/blog/search/?q={encoded}")).await
}

/// Build the multipart body shared by create and update. Tags and location
/// details travel as JSON strings inside single form fields.
async fn build_form(post: &NewPost) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", post.title.clone())
        .text("content", post.content.clone());

    if let Some(summary) = &post.summary {
        form = form.text("summary", summary.clone());
    }
    if let Some(category_id) = post.category_id {
        form = form.text("category_id", category_id.to_string());
    }
    if !post.tags.is_empty() {
        let tags = serde_json::to_string(&post.tags).map_err(|e| ApiError::Parse(e.to_string()))?;
        form = form.text("tags", tags);
    }
    if let Some(location) = &post.location {
        form = form.text("location", location.clone());
    }
    if let Some(latitude) = post.latitude {
        form = form.text("latitude", latitude.to_string());
    }
    if let Some(longitude) = post.longitude {
        form = form.text("longitude", longitude.to_string());
    }
    if let Some(details) = &post.location_details {
        let details =
            serde_json::to_string(details).map_err(|e| ApiError::Parse(e.to_string()))?;
        form = form.text("location_details", details);
    }

    if let Some(path) = &post.cover_image {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::Config(format!("cannot read cover image {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cover_image".to_string());

        form = form.part("cover_image", Part::bytes(bytes).file_name(file_name));
    }

    Ok(form)
}
