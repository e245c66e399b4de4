use crate::api::ApiError;
use crate::features::auth::{AuthGateway, Profile};
use crate::features::profiles::types::{ProfileUpdate, PublicProfile};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

#[derive(Deserialize)]
struct ProfileEnvelope {
    profile: Profile,
}

/// Another user's profile via `GET /users/profile/{username}/`. Works with or
/// without a session; follow state is only meaningful when one exists.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn public_profile(
    gateway: &AuthGateway,
    username: &str,
) -> Result<PublicProfile, ApiError> {
    gateway
        .get_json_optional_auth(&format!("/users/profile/{username}/"))
        .await
}

/// Update the caller's profile via multipart `PUT /users/profile/`. Only the
/// fields set on `update` are sent.
///
/// # Errors
/// `Validation` when the update is empty, `Config` on an unreadable picture,
/// otherwise the request error.
pub async fn update_profile(
    gateway: &AuthGateway,
    update: &ProfileUpdate,
) -> Result<Profile, ApiError> {
    if update.is_empty() {
        return Err(ApiError::Validation {
            status: 400,
            message: "nothing to update".to_string(),
        });
    }

    let mut form = Form::new();

    if let Some(full_name) = &update.full_name {
        form = form.text("full_name", full_name.clone());
    }
    if let Some(email) = &update.email {
        form = form.text("email", email.clone());
    }
    if let Some(bio) = &update.bio {
        form = form.text("bio", bio.clone());
    }
    if let Some(location) = &update.location {
        form = form.text("location", location.clone());
    }
    if let Some(path) = &update.profile_picture {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::Config(format!("cannot read picture {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "profile_picture".to_string());

        form = form.part("profile_picture", Part::bytes(bytes).file_name(file_name));
    }

    let envelope: ProfileEnvelope = gateway.put_multipart("/users/profile/", form).await?;
    Ok(envelope.profile)
}

/// Toggle following a user via `POST /users/{id}/follow/`.
///
/// # Errors
/// Returns an error if the request fails or the session is invalid.
pub async fn follow(gateway: &AuthGateway, user_id: u64) -> Result<(), ApiError> {
    gateway
        .post_empty(&format!("/users/{user_id}/follow/"))
        .await
}
