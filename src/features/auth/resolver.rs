use crate::api::ApiClient;
use crate::features::auth::client;
use crate::features::auth::types::Profile;
use tracing::{debug, warn};

/// Outcome of exchanging a stored access token for the current identity.
///
/// Keeping `Invalid` and `Unreachable` apart is the point: only a definitive
/// authorization rejection may burn the stored token pair. A network blip or
/// a backend fault leaves the pair in place for a later attempt.
#[derive(Debug)]
pub enum Resolution {
    Authenticated(Profile),
    Invalid,
    Unreachable,
}

/// Resolve an access token with one authorized profile read.
pub async fn resolve(api: &ApiClient, access: &str) -> Resolution {
    match client::fetch_profile(api, access).await {
        Ok(profile) => {
            debug!("session resolved for {}", profile.username);
            Resolution::Authenticated(profile)
        }
        Err(err) if err.is_auth() => {
            debug!("stored token rejected: {err}");
            Resolution::Invalid
        }
        Err(err) => {
            warn!("session resolution failed without an auth verdict: {err}");
            Resolution::Unreachable
        }
    }
}
