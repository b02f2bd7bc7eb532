// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::provenance::ProvenanceError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage operation failed")
    }
}

impl From<ProvenanceError> for ApiError {
    fn from(err: ProvenanceError) -> Self {
        match err {
            ProvenanceError::KeyDecode(_) => Self::bad_request("malformed device key"),
            ProvenanceError::NotFound(_) => Self::not_found("object not found"),
            // Verification and storage failures map to one generic response.
            // Detail goes to the server log only; unverifiable data is never
            // described to callers, let alone returned.
            ProvenanceError::MissingSalt(_)
            | ProvenanceError::Decryption(_)
            | ProvenanceError::Integrity(_)
            | ProvenanceError::RecordParse(_)
            | ProvenanceError::Store(_) => {
                tracing::warn!(error = %err, "provenance operation failed");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
