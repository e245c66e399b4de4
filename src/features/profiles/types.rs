use crate::features::auth::Profile;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Another user's profile page. The envelope carries viewer-relative fields
/// (follow state, counters) next to the profile itself; they are kept as-is
/// since their exact set varies by backend version.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicProfile {
    pub profile: Profile,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl PublicProfile {
    /// Whether the current viewer follows this user, when the backend says.
    #[must_use]
    pub fn is_following(&self) -> Option<bool> {
        self.meta.get("is_following").and_then(Value::as_bool)
    }
}

/// Fields to change on the caller's own profile. Unset fields are left
/// untouched server-side, so partial updates are the norm.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_picture: Option<PathBuf>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.location.is_none()
            && self.profile_picture.is_none()
    }
}
