use crate::features::posts::types::Author;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A comment row. `parent` refers to another comment's id; the backend only
/// supports one level of nesting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user: Option<Author>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
