use gurl_core::LinkRecord;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub key: String,
    pub short_url: String,
    pub target_url: String,
    pub expires_at: Timestamp,
    pub deletion_token: String,
}

impl From<LinkRecord> for CreateLinkResponse {
    fn from(record: LinkRecord) -> Self {
        Self {
            key: record.key.into_string(),
            short_url: record.short_url,
            target_url: record.target_url,
            expires_at: record.expires_at,
            deletion_token: record.deletion_token,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
