use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to analyze: a local image file uploaded as multipart, or the URL of
/// an image the backend already hosts.
#[derive(Clone, Debug)]
pub enum AnalyzeSource {
    Upload(PathBuf),
    Url(String),
}

/// Draft fields the analysis service proposes for a new post. Everything is
/// optional; the model fills in what it can recognize from the image.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub suggested_category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub location: Option<LocationSuggestion>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LocationSuggestion {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}
