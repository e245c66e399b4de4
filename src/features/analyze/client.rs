use crate::api::ApiError;
use crate::features::analyze::types::{AnalyzeSource, Suggestions};
use crate::features::auth::AuthGateway;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

/// The analysis service reports failures inside a 200 response, so success
/// is decided by the `status` field rather than the HTTP code.
#[derive(Deserialize)]
struct AnalyzeEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Suggestions>,
}

/// Run image analysis via `POST /blog/analyze-image/` and return the draft
/// suggestions. Local files go up as multipart `image`, remote ones as a
/// JSON `{image_url}` body.
///
/// # Errors
/// `Config` on an unreadable file, `Validation` when the service reports a
/// non-success status, otherwise the request error.
pub async fn analyze(
    gateway: &AuthGateway,
    source: &AnalyzeSource,
) -> Result<Suggestions, ApiError> {
    let envelope: AnalyzeEnvelope = match source {
        AnalyzeSource::Upload(path) => {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                ApiError::Config(format!("cannot read image {}: {e}", path.display()))
            })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());

            let form = Form::new().part("image", Part::bytes(bytes).file_name(file_name));
            gateway.post_multipart("/blog/analyze-image/", form).await?
        }
        AnalyzeSource::Url(url) => {
            gateway
                .post_json("/blog/analyze-image/", &json!({ "image_url": url }))
                .await?
        }
    };

    if envelope.status == "success" {
        Ok(envelope.data.unwrap_or_default())
    } else {
        Err(ApiError::Validation {
            status: 200,
            message: envelope
                .message
                .unwrap_or_else(|| "image analysis failed".to_string()),
        })
    }
}
