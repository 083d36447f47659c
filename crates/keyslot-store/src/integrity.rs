// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Payload integrity — SHA-256 digests for manifest verification and for the
// short fingerprints that stand in for key material in log output.

use keyslot_core::error::KeyslotError;
use sha2::{Digest, Sha256};

/// Number of hex characters kept by [`fingerprint`].
const FINGERPRINT_LEN: usize = 16;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Verify that `data` matches the expected SHA-256 hex digest.
///
/// The comparison is case-insensitive on the expected value so that
/// digests copied from tools printing uppercase hex are accepted.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<(), KeyslotError> {
    let actual = hash_bytes(data);
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(())
    } else {
        Err(KeyslotError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

/// Short, non-reversible identifier for a payload, safe to log.
pub fn fingerprint(data: &[u8]) -> String {
    let mut digest = hash_bytes(data);
    digest.truncate(FINGERPRINT_LEN);
    digest
}
