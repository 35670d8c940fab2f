//! Shared response bodies for API handlers.

use fwhub_core::types::RecordId;
use serde::Serialize;

/// `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ "id": ..., "message": ... }` returned by create endpoints.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: RecordId,
    pub message: &'static str,
}
