// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! Provenance record endpoints: list for a device, store with attachments.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use crate::{
    error::ApiError, models::StoreProvenanceResponse, state::AppState,
};

use super::decode_key;

/// Name of the multipart text field carrying the record JSON.
const RECORD_FIELD: &str = "record";

#[utoipa::path(
    get,
    path = "/v1/provenance/{device_key}",
    params(
        ("device_key" = String, Path, description = "URL-safe base64 encoded device key")
    ),
    tag = "Provenance",
    responses(
        (status = 200, description = "Decoded records for the device, each with its attachments list"),
        (status = 400, description = "Malformed device key")
    )
)]
pub async fn list_provenance(
    Path(device_key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let key = decode_key(&device_key)?;
    let records = state.provenance.list_records(&key)?;
    Ok(Json(records))
}

#[utoipa::path(
    post,
    path = "/v1/provenance/{device_key}",
    params(
        ("device_key" = String, Path, description = "URL-safe base64 encoded device key")
    ),
    request_body(
        content_type = "multipart/form-data",
        description = "One `record` text field (a JSON object) plus zero or more binary attachment parts"
    ),
    tag = "Provenance",
    responses(
        (status = 201, body = StoreProvenanceResponse),
        (status = 400, description = "Malformed device key, multipart body, or record")
    )
)]
pub async fn store_provenance(
    Path(device_key): Path<String>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoreProvenanceResponse>), ApiError> {
    let key = decode_key(&device_key)?;

    let mut record: Option<Map<String, Value>> = None;
    let mut attachments: Vec<(Vec<u8>, String)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("malformed multipart body"))?
    {
        if field.name() == Some(RECORD_FIELD) {
            let text = field
                .text()
                .await
                .map_err(|_| ApiError::bad_request("unreadable record field"))?;
            let value: Value = serde_json::from_str(&text)
                .map_err(|_| ApiError::bad_request("record is not valid JSON"))?;
            let Value::Object(map) = value else {
                return Err(ApiError::bad_request("record must be a JSON object"));
            };
            record = Some(map);
        } else {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request("unreadable attachment part"))?;
            attachments.push((bytes.to_vec(), content_type));
        }
    }

    let record = record.ok_or_else(|| ApiError::bad_request("missing record field"))?;
    let stored = state.provenance.store_provenance(&key, record, &attachments)?;

    Ok((
        StatusCode::CREATED,
        Json(StoreProvenanceResponse {
            record: stored.record_id,
            attachments: stored.attachment_ids,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn list_on_fresh_device_is_empty() {
        let state = AppState::default();
        let key = crate::keys::DeviceKey::new(b"k2".to_vec());

        let Json(records) = list_provenance(Path(key.encoded()), State(state))
            .await
            .expect("listing succeeds");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn list_returns_stored_records() {
        let state = AppState::default();
        let key = crate::keys::DeviceKey::new(b"k1".to_vec());

        let record = match json!({"title": "Belt", "price": 930}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        state
            .provenance
            .store_provenance(&key, record, &[])
            .expect("store succeeds");

        let Json(records) = list_provenance(Path(key.encoded()), State(state))
            .await
            .expect("listing succeeds");
        assert_eq!(
            records,
            vec![json!({"title": "Belt", "price": 930, "attachments": []})]
        );
    }

    #[tokio::test]
    async fn list_with_malformed_key_is_bad_request() {
        let state = AppState::default();
        let err = list_provenance(Path("!!!".to_string()), State(state))
            .await
            .expect_err("malformed key rejected");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
