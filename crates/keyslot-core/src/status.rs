// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Numeric status codes for callers that talk to the key store across a
// C-style boundary (IPC shims, RPC stubs) and need a plain integer.
//
// The rich taxonomy is canonical.  Older consumers only distinguish success
// from failure; `Status::coarse` gives them exactly that view.

use crate::error::KeyslotError;

/// Result code of a key store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    None = 0,
    Generic = -1,
    InvalidParameter = -2,
    OutOfSpace = -3,
    Duplicated = -4,
    NotFound = -5,
    ReadOnly = -6,
}

impl Status {
    /// The raw integer code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Parse a raw integer code.  Unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            -1 => Some(Self::Generic),
            -2 => Some(Self::InvalidParameter),
            -3 => Some(Self::OutOfSpace),
            -4 => Some(Self::Duplicated),
            -5 => Some(Self::NotFound),
            -6 => Some(Self::ReadOnly),
            _ => None,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::None
    }

    /// Collapse every failure into `Generic`.
    pub fn coarse(self) -> Self {
        if self.is_ok() { Self::None } else { Self::Generic }
    }

    /// Status of an operation result.
    pub fn of<T>(result: &Result<T, KeyslotError>) -> Self {
        match result {
            Ok(_) => Self::None,
            Err(e) => Self::from(e),
        }
    }
}

impl From<&KeyslotError> for Status {
    fn from(err: &KeyslotError) -> Self {
        match err {
            KeyslotError::InvalidParameter => Self::InvalidParameter,
            KeyslotError::OutOfSpace => Self::OutOfSpace,
            KeyslotError::Duplicated => Self::Duplicated,
            KeyslotError::NotFound => Self::NotFound,
            KeyslotError::ReadOnly => Self::ReadOnly,

            // Oversized fields never reach the table; they are rejected while
            // the caller builds the record, which is a bad argument.
            KeyslotError::FieldTooLong { .. } => Self::InvalidParameter,

            KeyslotError::TooManyKeys { .. }
            | KeyslotError::Manifest(_)
            | KeyslotError::IntegrityMismatch { .. }
            | KeyslotError::Config(_)
            | KeyslotError::Io(_)
            | KeyslotError::Serialization(_) => Self::Generic,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Generic => "generic",
            Self::InvalidParameter => "invalid-parameter",
            Self::OutOfSpace => "out-of-space",
            Self::Duplicated => "duplicated",
            Self::NotFound => "not-found",
            Self::ReadOnly => "read-only",
        };
        write!(f, "{label} ({})", self.code())
    }
}
