use crate::features::analyze::AnalyzeSource;
use crate::features::auth::client::NewAccount;
use crate::features::posts::types::NewPost;
use crate::features::profiles::ProfileUpdate;
use secrecy::SecretString;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

#[derive(Debug)]
pub enum Action {
    Login {
        username: String,
        password: SecretString,
    },
    Logout,
    Register(Box<NewAccount>),
    VerifyEmail {
        user_id: u64,
        code: String,
    },
    ResendCode {
        user_id: u64,
    },
    Profile {
        username: Option<String>,
    },
    UpdateProfile(ProfileUpdate),
    Follow {
        user_id: u64,
    },
    Feed {
        pages: u32,
    },
    Popular {
        pages: u32,
        page_size: usize,
    },
    Posts,
    Post {
        id: u64,
    },
    CreatePost(Box<NewPost>),
    EditPost {
        id: u64,
        post: Box<NewPost>,
    },
    DeletePost {
        id: u64,
    },
    Like {
        id: u64,
    },
    Comments {
        post: u64,
    },
    Comment {
        post: u64,
        content: String,
        parent: Option<u64>,
    },
    Categories,
    Search {
        query: String,
    },
    AnalyzeImage(AnalyzeSource),
}

impl Action {
    /// Execute the action against the configured backend.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &crate::cli::globals::GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}
