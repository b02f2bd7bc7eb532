// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory of the object store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the object store root directory.
///
/// Every stored object lives under this directory, laid out as
/// `{device_id}/{attach|prov}/{hash}` with a `.meta.json` sidecar per blob.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default object store root when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default log filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
