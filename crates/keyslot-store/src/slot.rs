// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One cell of the caller-provided backing buffer.

use keyslot_core::{KeyName, KeyRecord, OwnerId};
use zeroize::Zeroize;

/// Bookkeeping half of a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SlotAdmin {
    is_free: bool,
    owner: OwnerId,
}

/// A fixed-position cell of the key store.
///
/// The buffer of slots belongs to the caller; a [`SlotTable`] only borrows
/// it.  Slots are opaque outside this crate apart from a few read-only
/// accessors, so the table invariants cannot be broken by poking at the
/// buffer between operations.
///
/// [`SlotTable`]: crate::SlotTable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    admin: SlotAdmin,
    key: KeyRecord,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            admin: SlotAdmin {
                is_free: true,
                owner: OwnerId::default(),
            },
            key: KeyRecord::default(),
        }
    }
}

impl Slot {
    /// Allocate a heap buffer of `capacity` free slots.
    ///
    /// Environments without an allocator embed `[Slot; N]` somewhere static
    /// instead and hand the table a slice of it.
    pub fn new_buffer(capacity: usize) -> Box<[Slot]> {
        vec![Slot::default(); capacity].into_boxed_slice()
    }

    pub fn is_free(&self) -> bool {
        self.admin.is_free
    }

    pub fn owner(&self) -> OwnerId {
        self.admin.owner
    }

    pub fn is_read_only(&self) -> bool {
        self.key.read_only
    }

    pub(crate) fn record(&self) -> &KeyRecord {
        &self.key
    }

    /// True for an occupied slot holding `name` for `owner`.
    pub(crate) fn holds(&self, owner: OwnerId, name: &KeyName) -> bool {
        !self.admin.is_free && self.admin.owner == owner && self.key.name == *name
    }

    pub(crate) fn occupy(&mut self, owner: OwnerId, record: &KeyRecord, read_only: bool) {
        self.admin.is_free = false;
        self.admin.owner = owner;
        self.key.name = record.name;
        self.key.data.clone_from(&record.data);
        self.key.read_only = read_only;
    }

    /// Return the slot to the free state, wiping the key material.
    pub(crate) fn release(&mut self) {
        self.admin.is_free = true;
        self.admin.owner = OwnerId::default();
        self.key.zeroize();
    }
}
