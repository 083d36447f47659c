// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-capacity slot table holding per-owner key records.
//
// The table never allocates.  It borrows a caller-provided buffer of slots
// and mutates it in place; every operation is a bounded linear scan over
// that buffer.  Allocation is first-fit, so the index handed out by `add`
// is the lowest free one and stays put until the key is deleted.
//
// Concurrency: the table does no locking of its own.  All mutating
// operations take `&mut self`, so sharing one table between threads
// requires the caller to wrap it in a lock (e.g. `Mutex<SlotTable>`).

use keyslot_core::error::{KeyslotError, Result};
use keyslot_core::{KeyName, KeyRecord, OwnerId};
use tracing::{debug, instrument, warn};

use crate::integrity::fingerprint;
use crate::slot::Slot;

/// Key store over a caller-owned buffer of [`Slot`]s.
#[derive(Debug)]
pub struct SlotTable<'a> {
    slots: &'a mut [Slot],
    free_slots: usize,
}

impl<'a> SlotTable<'a> {
    /// Take over `slots` as an empty store.
    ///
    /// Every slot is wiped, whatever it held before.  The capacity of the
    /// store is the length of the buffer.
    pub fn init(slots: &'a mut [Slot]) -> Self {
        let mut table = Self {
            slots,
            free_slots: 0,
        };
        table.reset();
        debug!(capacity = table.capacity(), "key store initialised");
        table
    }

    /// Take over `slots` and provision `keys[k]` for `owners[k]` at slot `k`
    /// as read-only keys.
    ///
    /// Provisioning is all-or-nothing.  When it fails the returned table is
    /// exactly what [`SlotTable::init`] would have produced and the second
    /// element carries the reason:
    ///
    /// - `InvalidParameter` if the two lists differ in length or an owner is
    ///   out of range,
    /// - `TooManyKeys` if there are more keys than slots,
    /// - `Duplicated` if two keys share the same owner and name.
    #[must_use = "a failed bootstrap leaves the store empty"]
    #[instrument(level = "debug", skip_all, fields(capacity = slots.len(), keys = keys.len()))]
    pub fn init_with_read_only_keys(
        slots: &'a mut [Slot],
        owners: &[OwnerId],
        keys: &[KeyRecord],
    ) -> (Self, Result<()>) {
        let mut table = Self {
            slots,
            free_slots: 0,
        };

        let outcome = table.load_read_only(owners, keys);
        match &outcome {
            Ok(()) => debug!(free_slots = table.free_slots, "read-only keys provisioned"),
            Err(e) => {
                warn!(error = %e, "read-only key provisioning rolled back");
                table.reset();
            }
        }
        (table, outcome)
    }

    fn load_read_only(&mut self, owners: &[OwnerId], keys: &[KeyRecord]) -> Result<()> {
        if owners.len() != keys.len() || owners.iter().any(|owner| !owner.is_valid()) {
            return Err(KeyslotError::InvalidParameter);
        }
        let count = keys.len();
        if count > self.capacity() {
            return Err(KeyslotError::TooManyKeys {
                count,
                capacity: self.capacity(),
            });
        }

        for (k, (&owner, key)) in owners.iter().zip(keys).enumerate() {
            // Only the prefix placed so far can hold a duplicate.
            if self.find_by_key(owner, &key.name, k).is_some() {
                return Err(KeyslotError::Duplicated);
            }
            self.slots[k].occupy(owner, key, true);
        }

        for slot in &mut self.slots[count..] {
            slot.release();
        }
        self.free_slots = self.capacity() - count;
        Ok(())
    }

    /// Free every slot, read-only ones included.
    fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.release();
        }
        self.free_slots = self.slots.len();
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_slots(&self) -> usize {
        self.free_slots
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.capacity() - self.free_slots
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.free_slots == 0
    }

    /// Lowest-index free slot.
    fn find_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_free)
    }

    /// Index of the occupied slot holding `name` for `owner`, looking only
    /// at the first `limit` slots.
    fn find_by_key(&self, owner: OwnerId, name: &KeyName, limit: usize) -> Option<usize> {
        self.slots
            .iter()
            .take(limit)
            .position(|slot| slot.holds(owner, name))
    }

    /// Store `record` for `owner` and return the slot index it landed in.
    ///
    /// The `read_only` flag of `record` is ignored; keys added at runtime
    /// are always deletable.
    #[instrument(level = "debug", skip_all, fields(%owner, name = %record.name))]
    pub fn add(&mut self, owner: OwnerId, record: &KeyRecord) -> Result<usize> {
        if !owner.is_valid() {
            return Err(KeyslotError::InvalidParameter);
        }
        if self.free_slots == 0 {
            return Err(KeyslotError::OutOfSpace);
        }
        if self
            .find_by_key(owner, &record.name, self.capacity())
            .is_some()
        {
            return Err(KeyslotError::Duplicated);
        }

        let index = self.find_free_slot().ok_or(KeyslotError::OutOfSpace)?;

        self.free_slots -= 1;
        self.slots[index].occupy(owner, record, false);

        debug!(
            index,
            data = %fingerprint(record.data.as_bytes()),
            free_slots = self.free_slots,
            "key added"
        );
        Ok(index)
    }

    /// Look up `name` for `owner`; returns a copy of the record and its
    /// slot index.
    #[instrument(level = "debug", skip_all, fields(%owner, %name))]
    pub fn get(&self, owner: OwnerId, name: &KeyName) -> Result<(KeyRecord, usize)> {
        if !owner.is_valid() {
            return Err(KeyslotError::InvalidParameter);
        }

        let index = self
            .find_by_key(owner, name, self.capacity())
            .ok_or(KeyslotError::NotFound)?;

        let slot = &self.slots[index];
        if slot.owner() != owner {
            return Err(KeyslotError::NotFound);
        }

        debug!(index, "key found");
        Ok((slot.record().clone(), index))
    }

    /// Read the record at `index` on behalf of `owner`.
    ///
    /// A slot owned by someone else yields `InvalidParameter`, the same as
    /// an index past the end of the table, so that an owner cannot map out
    /// which slots other owners occupy.
    #[instrument(level = "debug", skip(self))]
    pub fn get_by_index(&self, owner: OwnerId, index: usize) -> Result<KeyRecord> {
        if index >= self.capacity() || !owner.is_valid() {
            return Err(KeyslotError::InvalidParameter);
        }

        let slot = &self.slots[index];
        if slot.is_free() {
            return Err(KeyslotError::NotFound);
        }
        if slot.owner() != owner {
            return Err(KeyslotError::InvalidParameter);
        }

        Ok(slot.record().clone())
    }

    /// Remove `name` for `owner`, wiping its slot.
    #[instrument(level = "debug", skip_all, fields(%owner, %name))]
    pub fn delete(&mut self, owner: OwnerId, name: &KeyName) -> Result<()> {
        if !owner.is_valid() {
            return Err(KeyslotError::InvalidParameter);
        }

        let index = self
            .find_by_key(owner, name, self.capacity())
            .ok_or(KeyslotError::NotFound)?;

        if self.slots[index].is_read_only() {
            return Err(KeyslotError::ReadOnly);
        }

        self.slots[index].release();
        self.free_slots += 1;

        debug!(index, free_slots = self.free_slots, "key deleted");
        Ok(())
    }

    /// Delete every key that was not provisioned read-only.
    #[instrument(level = "debug", skip_all)]
    pub fn wipe(&mut self) {
        let mut wiped = 0usize;
        for slot in self.slots.iter_mut() {
            if !slot.is_free() && !slot.is_read_only() {
                slot.release();
                wiped += 1;
            }
        }
        self.free_slots += wiped;

        debug!(wiped, free_slots = self.free_slots, "key store wiped");
    }
}
