//! Account endpoints: login, logout notification, registration, and email
//! verification. These are the only calls allowed to handle credentials;
//! everything session-related above them goes through the gateway.

use crate::api::{ApiClient, ApiError};
use crate::features::auth::types::{Profile, TokenPair};
use regex::Regex;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

#[derive(Deserialize)]
struct ProfileEnvelope {
    profile: Profile,
}

#[derive(Deserialize)]
struct RegisterResponse {
    user_id: u64,
}

/// Registration form. Latitude/longitude are sent as plain form fields, the
/// way the backend's multipart parser expects them.
#[derive(Debug)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub profile_picture: Option<PathBuf>,
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Exchange credentials for a token pair via `POST /users/login/`.
///
/// # Errors
/// Returns an error if the request fails or the credentials are rejected.
pub async fn login(
    api: &ApiClient,
    username: &str,
    password: &SecretString,
) -> Result<TokenPair, ApiError> {
    let payload = json!({
        "username": username,
        "password": password.expose_secret(),
    });

    api.post_json("/users/login/", &payload, None).await
}

/// Tell the backend to invalidate the refresh token via `POST /users/logout/`.
/// Local logout must not depend on this call succeeding.
///
/// # Errors
/// Returns an error if the request fails; callers treat it as best-effort.
pub async fn notify_logout(api: &ApiClient, access: &str, refresh: &str) -> Result<(), ApiError> {
    let payload = json!({ "refresh_token": refresh });

    api.post_json_unit("/users/logout/", &payload, Some(access))
        .await
}

/// Fetch the current user's profile via the authorized `GET /users/profile/`.
/// This is the call that confirms a token is still valid.
///
/// # Errors
/// Returns an error if the request fails or the token is rejected.
pub async fn fetch_profile(api: &ApiClient, access: &str) -> Result<Profile, ApiError> {
    let envelope: ProfileEnvelope = api.get_json("/users/profile/", Some(access)).await?;

    Ok(envelope.profile)
}

/// Create an account via multipart `POST /users/register/`. Returns the new
/// user id, which the verification flow needs.
///
/// # Errors
/// Returns an error on an invalid email, an unreadable profile picture, or a
/// rejected request.
pub async fn register(api: &ApiClient, account: &NewAccount) -> Result<u64, ApiError> {
    if !valid_email(&account.email) {
        return Err(ApiError::Validation {
            status: 400,
            message: format!("invalid email address: {}", account.email),
        });
    }

    let mut form = Form::new()
        .text("username", account.username.clone())
        .text("email", account.email.clone())
        .text("password", account.password.expose_secret().to_string())
        .text(
            "confirm_password",
            account.confirm_password.expose_secret().to_string(),
        )
        .text("full_name", account.full_name.clone());

    if let Some(date_of_birth) = &account.date_of_birth {
        form = form.text("date_of_birth", date_of_birth.clone());
    }
    if let Some(location) = &account.location {
        form = form.text("location", location.clone());
    }
    if let Some(latitude) = account.latitude {
        form = form.text("latitude", latitude.to_string());
    }
    if let Some(longitude) = account.longitude {
        form = form.text("longitude", longitude.to_string());
    }

    if let Some(path) = &account.profile_picture {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::Config(format!("cannot read profile picture {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "profile_picture".to_string());

        form = form.part("profile_picture", Part::bytes(bytes).file_name(file_name));
    }

    let response: RegisterResponse = api.post_multipart("/users/register/", form, None).await?;

    debug!("registered user id {}", response.user_id);

    Ok(response.user_id)
}

/// Confirm the emailed verification code via `POST /users/verify-email/`.
///
/// # Errors
/// Returns an error if the code is rejected or the request fails.
pub async fn verify_email(api: &ApiClient, user_id: u64, code: &str) -> Result<(), ApiError> {
    let payload = json!({
        "code": code.trim(),
        "user_id": user_id,
    });

    api.post_json_unit("/users/verify-email/", &payload, None)
        .await
}

/// Request a fresh code via `POST /users/resend-verification-code/`.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn resend_code(api: &ApiClient, user_id: u64) -> Result<(), ApiError> {
    let payload = json!({ "user_id": user_id });

    api.post_json_unit("/users/resend-verification-code/", &payload, None)
        .await
}
