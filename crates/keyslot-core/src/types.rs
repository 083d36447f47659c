// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the keyslot store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::KeyslotError;

/// Width in bytes of every key name.
pub const NAME_SIZE: usize = 17;

/// Width in bytes of every key payload.
pub const DATA_SIZE: usize = 2048;

/// Largest valid owner identifier (inclusive).
pub const MAX_OWNER_ID: u32 = 255;

/// Identifier of the application or component that owns a key.
///
/// Any `u32` can be represented so that out-of-range identifiers coming in
/// from a caller reach the store and are rejected there with
/// `InvalidParameter`, exactly like every other bad argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub u32);

impl OwnerId {
    pub const MAX: Self = Self(MAX_OWNER_ID);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// True when `0 <= id <= MAX_OWNER_ID`.
    pub const fn is_valid(self) -> bool {
        self.0 <= MAX_OWNER_ID
    }
}

impl From<u32> for OwnerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-width key name.
///
/// Names are opaque bytes compared over the full width.  They are not
/// C strings: an embedded zero byte is as significant as any other byte, so
/// `b"ab\0c"` and `b"ab"` are different names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Zeroize)]
pub struct KeyName([u8; NAME_SIZE]);

impl KeyName {
    /// Build a name from up to `NAME_SIZE` bytes, zero-padding the rest.
    pub fn new(bytes: &[u8]) -> Result<Self, KeyslotError> {
        if bytes.len() > NAME_SIZE {
            return Err(KeyslotError::FieldTooLong {
                field: "key name",
                len: bytes.len(),
                max: NAME_SIZE,
            });
        }
        let mut name = [0u8; NAME_SIZE];
        name[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(name))
    }

    /// Wrap an already full-width name verbatim.
    pub const fn from_array(bytes: [u8; NAME_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NAME_SIZE] {
        &self.0
    }

    /// The name with trailing zero padding removed.
    pub fn trimmed(&self) -> &[u8] {
        let end = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        &self.0[..end]
    }
}

impl Default for KeyName {
    fn default() -> Self {
        Self([0u8; NAME_SIZE])
    }
}

impl FromStr for KeyName {
    type Err = KeyslotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for KeyName {
    type Error = KeyslotError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl std::fmt::Display for KeyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let trimmed = self.trimmed();
        match std::str::from_utf8(trimmed) {
            Ok(s) if s.chars().all(|c| !c.is_control()) => write!(f, "{s}"),
            _ => {
                for b in trimmed {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for KeyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyName({self})")
    }
}

/// Fixed-width key payload with an explicit used length.
///
/// Storage is always `DATA_SIZE` bytes; bytes past `len` are zero.  The
/// buffer is wiped when the value is dropped, so copies handed out to
/// callers do not linger in memory.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyData {
    bytes: [u8; DATA_SIZE],
    len: usize,
}

impl KeyData {
    /// Build a payload from up to `DATA_SIZE` bytes.
    pub fn new(bytes: &[u8]) -> Result<Self, KeyslotError> {
        if bytes.len() > DATA_SIZE {
            return Err(KeyslotError::FieldTooLong {
                field: "key data",
                len: bytes.len(),
                max: DATA_SIZE,
            });
        }
        let mut data = Self::default();
        data.bytes[..bytes.len()].copy_from_slice(bytes);
        data.len = bytes.len();
        Ok(data)
    }

    /// Wrap a full-width payload; the used length is `DATA_SIZE`.
    pub fn from_array(bytes: [u8; DATA_SIZE]) -> Self {
        Self {
            bytes,
            len: DATA_SIZE,
        }
    }

    /// The used prefix of the payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The whole fixed-width buffer, padding included.
    pub fn as_full_bytes(&self) -> &[u8; DATA_SIZE] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for KeyData {
    fn default() -> Self {
        Self {
            bytes: [0u8; DATA_SIZE],
            len: 0,
        }
    }
}

impl std::fmt::Debug for KeyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyData([REDACTED; {}])", self.len)
    }
}

/// A key as seen by callers: name, payload and the read-only flag.
///
/// `read_only` is set by the store (only bootstrap-loaded keys are read
/// only); whatever the caller puts there on `add` is ignored.  Copies
/// handed out by the store wipe their name and payload when dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyRecord {
    pub name: KeyName,
    pub data: KeyData,
    pub read_only: bool,
}

impl KeyRecord {
    pub fn new(name: KeyName, data: KeyData) -> Self {
        Self {
            name,
            data,
            read_only: false,
        }
    }

    /// Convenience constructor from raw byte slices.
    pub fn from_parts(name: &[u8], data: &[u8]) -> Result<Self, KeyslotError> {
        Ok(Self::new(KeyName::new(name)?, KeyData::new(data)?))
    }
}
