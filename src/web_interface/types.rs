use serde::{Deserialize, Serialize};

use crate::catalog::types::NewStory;
use crate::uploads::attachment_store::Attachment;

/// API error payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

/// Raw query string of `GET /api/stories`.
///
/// Kept as strings so unparsable numbers can fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub generation: Option<String>,
    pub search: Option<String>,
}

/// Decoded multipart body of `POST /api/stories`.
#[derive(Debug, Default)]
pub struct Submission {
    pub story: NewStory,
    pub photo: Option<Attachment>,
}
