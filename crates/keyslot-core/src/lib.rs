// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// keyslot — core types, constants and error definitions shared by the
// store crate and its callers.

pub mod config;
pub mod error;
pub mod status;
pub mod types;

pub use config::StoreConfig;
pub use error::KeyslotError;
pub use status::Status;
pub use types::*;
