//! # VoyageView client
//!
//! Native client for the VoyageView travel-blogging REST API: session and
//! token lifecycle, typed endpoint wrappers per feature domain, and the
//! pagination/comment-threading logic shared by every consumer.
//!
//! ## Session model
//!
//! Exactly one [`features::auth::AuthGateway`] exists per running client. It
//! owns the session state machine (`Initializing` → `Unauthenticated` |
//! `Authenticated`), is the only component allowed to mutate it, and exposes
//! read-only snapshots plus the shared authenticated-request helper that
//! injects the bearer token and forces logout on an authorization failure.
//!
//! ## Errors
//!
//! All endpoint wrappers return [`api::ApiError`], which distinguishes
//! transport failures from authorization rejections so that a transient
//! network blip never clears a stored session.

pub mod api;
pub mod cli;
pub mod features;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with("voyageview/"));
    }

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }

        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
