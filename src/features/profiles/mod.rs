pub mod client;
pub mod types;

pub use types::{ProfileUpdate, PublicProfile};
