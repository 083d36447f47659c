// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! keyslot-store — fixed-capacity, in-memory store for per-owner secret keys.
//!
//! The store lives entirely in a buffer of [`Slot`]s handed in by the caller
//! and never allocates on its own.  Keys are addressed by `(owner, name)`;
//! keys provisioned at start-up are read-only and survive [`SlotTable::wipe`].
//!
//! A [`SlotTable`] is not synchronised.  Callers that share one between
//! threads must serialise access themselves.

pub mod integrity;
pub mod manifest;
pub mod slot;
pub mod table;

// PUBLIC API: Re-export the store and its bootstrap helpers
pub use integrity::{fingerprint, hash_bytes, verify_hash};
pub use manifest::{Manifest, ManifestKey};
pub use slot::Slot;
pub use table::SlotTable;
