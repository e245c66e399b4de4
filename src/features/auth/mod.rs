//! Session and token lifecycle.
//!
//! The flow is store → resolver → gateway: [`TokenStore`] persists the token
//! pair across runs, [`resolver`] turns a stored access token into a
//! confirmed user identity, and [`AuthGateway`] owns the single session state
//! machine everything else reads from.

pub mod client;
pub mod gateway;
pub mod resolver;
pub mod store;
pub mod types;

pub use gateway::AuthGateway;
pub use resolver::Resolution;
pub use store::TokenStore;
pub use types::{Profile, Session, SessionState, TokenPair};
