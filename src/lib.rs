// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! Provenance Vault - Encrypted Content-Addressed Provenance Storage
//!
//! Stores device-keyed provenance records and binary attachments. Every
//! object is encrypted under the caller's device key, named by the SHA-256
//! of its own ciphertext, and verified against a stored plaintext hash on
//! read. Possession of the device key is the sole capability needed to read
//! or write a device's data.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `keys` - Device key codec and namespace derivation
//! - `crypto` - Symmetric cipher and content hashing
//! - `store` - Object store adapter (filesystem and in-memory backends)
//! - `provenance` - Core storage protocol

pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod models;
pub mod provenance;
pub mod state;
pub mod store;
