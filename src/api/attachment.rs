// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! Attachment retrieval endpoint.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::ApiError, state::AppState};

use super::decode_key;

#[utoipa::path(
    get,
    path = "/v1/attachment/{device_key}/{attachment_id}",
    params(
        ("device_key" = String, Path, description = "URL-safe base64 encoded device key"),
        ("attachment_id" = String, Path, description = "Hex content hash returned at upload time")
    ),
    tag = "Attachments",
    responses(
        (status = 200, description = "Decrypted attachment bytes, Content-Type as stored"),
        (status = 400, description = "Malformed device key"),
        (status = 404, description = "No such attachment for this device")
    )
)]
pub async fn fetch_attachment(
    Path((device_key, attachment_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let key = decode_key(&device_key)?;
    let fetched = state.provenance.fetch_attachment(&key, &attachment_id)?;
    Ok(([(header::CONTENT_TYPE, fetched.content_type)], fetched.bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::DeviceKey;
    use crate::store::ObjectClass;
    use axum::{body::to_bytes, http::StatusCode};

    #[tokio::test]
    async fn fetch_returns_bytes_and_content_type() {
        let state = AppState::default();
        let key = DeviceKey::new(b"k1".to_vec());
        let id = state
            .provenance
            .upload(&key, b"img-bytes", ObjectClass::Attachment, "image/png")
            .expect("upload succeeds");

        let response = fetch_attachment(
            Path((key.encoded(), id)),
            State(state),
        )
        .await
        .expect("fetch succeeds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"img-bytes");
    }

    #[tokio::test]
    async fn fetch_unknown_attachment_is_not_found() {
        let state = AppState::default();
        let key = DeviceKey::new(b"k1".to_vec());

        let err = fetch_attachment(
            Path((key.encoded(), "nonexistent-hash".to_string())),
            State(state),
        )
        .await
        .expect_err("missing attachment rejected");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn fetch_with_malformed_key_is_bad_request() {
        let state = AppState::default();
        let err = fetch_attachment(
            Path(("%%%".to_string(), "aa".repeat(32))),
            State(state),
        )
        .await
        .expect_err("malformed key rejected");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
