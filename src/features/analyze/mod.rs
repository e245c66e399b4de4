pub mod client;
pub mod types;

pub use types::{AnalyzeSource, LocationSuggestion, Suggestions};
