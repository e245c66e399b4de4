//! Post comments: flat list from the backend, one-level reply threading on
//! the client.

pub mod client;
pub mod thread;
pub mod types;

pub use thread::{organize, CommentThread};
pub use types::Comment;
