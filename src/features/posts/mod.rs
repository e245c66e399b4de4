//! Blog posts: listing, authoring, the discovery surfaces (popular and the
//! personalized feed), likes, and search.

pub mod client;
pub mod pager;
pub mod types;

pub use pager::{FeedPager, PageTicket};
pub use types::{Author, NewPost, Post};
