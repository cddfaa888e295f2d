use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HistoryMessage {
    pub message: String,
}

/// Fields pulled out of the multipart create request before validation.
#[derive(Debug, Default)]
pub(crate) struct CreateHistoryParts {
    pub file: Option<(String, bytes::Bytes)>,
    pub result: Option<String>,
    pub confidence: Option<String>,
}
