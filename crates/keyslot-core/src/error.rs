// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for keyslot.

use thiserror::Error;

/// Top-level error type for all keyslot operations.
///
/// The slot table variants are unit variants on purpose: an owner probing a
/// foreign slot by index must get exactly the same value back as an owner
/// asking for an index past the end of the table.
#[derive(Debug, Error)]
pub enum KeyslotError {
    // -- Slot table --
    #[error("invalid parameter")]
    InvalidParameter,

    #[error("no free slot left in the key store")]
    OutOfSpace,

    #[error("a key with this name already exists for this owner")]
    Duplicated,

    #[error("key not found")]
    NotFound,

    #[error("key is read-only")]
    ReadOnly,

    // -- Record construction --
    #[error("{field} is {len} bytes, at most {max} allowed")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    // -- Bootstrap / configuration --
    #[error("{count} read-only keys do not fit in {capacity} slots")]
    TooManyKeys { count: usize, capacity: usize },

    #[error("invalid bootstrap manifest: {0}")]
    Manifest(String),

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KeyslotError>;
