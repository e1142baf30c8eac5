#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Non-JSON response (content-type: {0})")]
    NonJsonResponse(String),

    #[error("Failed to decode response body: {0}")]
    Decode(String),
}
