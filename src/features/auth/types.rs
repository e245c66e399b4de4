use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Access/refresh credential pair. Always set and cleared together; no state
/// transition leaves one half behind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// The current user's profile record. Only the fields the client reads are
/// typed; everything else the backend sends passes through `extra` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Startup resolution in flight.
    #[default]
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// The client's authentication state. One instance exists per gateway;
/// consumers only ever see cloned snapshots.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub tokens: Option<TokenPair>,
    pub user: Option<Profile>,
    pub state: SessionState,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state == SessionState::Initializing
    }
}
