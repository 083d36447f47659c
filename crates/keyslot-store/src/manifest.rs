// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bootstrap manifest — the JSON description of the read-only keys a store
// is provisioned with at start-up.
//
// Format:
//   {
//     "keys": [
//       {
//         "owner":    1,                  -- owner identifier
//         "name":     "device-root",      -- UTF-8 name, or
//         "name_hex": "0a0b",             -- raw name bytes (exactly one of the two)
//         "data_hex": "…",                -- payload, hex encoded
//         "sha256":   "…"                 -- optional digest of the decoded payload
//       }
//     ]
//   }

use std::path::Path;

use keyslot_core::StoreConfig;
use keyslot_core::error::{KeyslotError, Result};
use keyslot_core::{KeyData, KeyName, KeyRecord, OwnerId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use zeroize::{Zeroize, Zeroizing};

use crate::integrity::verify_hash;
use crate::slot::Slot;
use crate::table::SlotTable;

/// Parsed bootstrap manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub keys: Vec<ManifestKey>,
}

/// One read-only key as written in the manifest.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestKey {
    pub owner: OwnerId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_hex: Option<String>,
    pub data_hex: String,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl Drop for ManifestKey {
    fn drop(&mut self) {
        self.data_hex.zeroize();
    }
}

impl std::fmt::Debug for ManifestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestKey")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("name_hex", &self.name_hex)
            .field("data_hex", &"[REDACTED]")
            .field("sha256", &self.sha256)
            .finish()
    }
}

impl ManifestKey {
    fn key_name(&self, position: usize) -> Result<KeyName> {
        match (&self.name, &self.name_hex) {
            (Some(name), None) => name.parse(),
            (None, Some(raw)) => {
                let bytes = hex::decode(raw).map_err(|e| {
                    KeyslotError::Manifest(format!("key {position}: name_hex: {e}"))
                })?;
                KeyName::new(&bytes)
            }
            _ => Err(KeyslotError::Manifest(format!(
                "key {position}: exactly one of `name` or `name_hex` is required"
            ))),
        }
    }

    fn key_data(&self, position: usize) -> Result<KeyData> {
        let bytes = Zeroizing::new(
            hex::decode(&self.data_hex)
                .map_err(|e| KeyslotError::Manifest(format!("key {position}: data_hex: {e}")))?,
        );
        if let Some(expected) = &self.sha256 {
            verify_hash(&bytes, expected)?;
        }
        KeyData::new(&bytes)
    }

    /// Decode into the record the store will hold.
    pub fn to_record(&self, position: usize) -> Result<KeyRecord> {
        Ok(KeyRecord::new(
            self.key_name(position)?,
            self.key_data(position)?,
        ))
    }
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = Zeroizing::new(std::fs::read_to_string(path.as_ref())?);
        let manifest = Self::from_json(&raw)?;
        info!(keys = manifest.keys.len(), "bootstrap manifest loaded");
        Ok(manifest)
    }

    /// Decode every entry into the parallel owner / record lists expected by
    /// [`SlotTable::init_with_read_only_keys`].
    pub fn seeds(&self) -> Result<(Vec<OwnerId>, Vec<KeyRecord>)> {
        let mut owners = Vec::with_capacity(self.keys.len());
        let mut records = Vec::with_capacity(self.keys.len());
        for (position, key) in self.keys.iter().enumerate() {
            owners.push(key.owner);
            records.push(key.to_record(position)?);
        }
        Ok((owners, records))
    }
}

impl<'a> SlotTable<'a> {
    /// Take over `slots` and provision the keys listed in `manifest`.
    ///
    /// A manifest that cannot be decoded is treated like a failed bootstrap:
    /// the table comes back empty together with the decoding error.
    #[must_use = "a failed bootstrap leaves the store empty"]
    pub fn provision(slots: &'a mut [Slot], manifest: &Manifest) -> (Self, Result<()>) {
        match manifest.seeds() {
            Ok((owners, records)) => Self::init_with_read_only_keys(slots, &owners, &records),
            Err(e) => (Self::init(slots), Err(e)),
        }
    }

    /// Build a store as described by `config`.
    ///
    /// `slots` must hold exactly `config.capacity` slots.  On error the
    /// buffer is either untouched (bad configuration or unreadable
    /// manifest) or wiped to the empty state (failed provisioning).
    #[instrument(skip_all, fields(capacity = config.capacity))]
    pub fn from_config(slots: &'a mut [Slot], config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        if slots.len() != config.capacity {
            return Err(KeyslotError::Config(format!(
                "buffer holds {} slots, configuration expects {}",
                slots.len(),
                config.capacity
            )));
        }

        match &config.bootstrap_manifest {
            None => Ok(Self::init(slots)),
            Some(path) => {
                let manifest = Manifest::from_file(path)?;
                let (table, outcome) = Self::provision(slots, &manifest);
                outcome.map(|()| table)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use keyslot_core::DATA_SIZE;

    use super::*;
    use crate::integrity::hash_bytes;

    fn write_file(dir: &tempfile::TempDir, file: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(file);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn decodes_names_and_payloads() {
        let manifest = Manifest::from_json(
            r#"{ "keys": [
                { "owner": 1, "name": "device-root", "data_hex": "deadbeef" },
                { "owner": 2, "name_hex": "00ff", "data_hex": "" }
            ] }"#,
        )
        .unwrap();

        let (owners, records) = manifest.seeds().unwrap();
        assert_eq!(owners, vec![OwnerId::new(1), OwnerId::new(2)]);
        assert_eq!(records[0].name, "device-root".parse::<KeyName>().unwrap());
        assert_eq!(records[0].data.as_bytes(), b"\xde\xad\xbe\xef");
        assert_eq!(records[1].name, KeyName::new(&[0x00, 0xff]).unwrap());
        assert!(records[1].data.is_empty());
    }

    #[test]
    fn checks_payload_digest() {
        let good = format!(
            r#"{{ "keys": [ {{ "owner": 0, "name": "k", "data_hex": "0102", "sha256": "{}" }} ] }}"#,
            hash_bytes(&[1, 2])
        );
        assert!(Manifest::from_json(&good).unwrap().seeds().is_ok());

        let bad = r#"{ "keys": [ { "owner": 0, "name": "k", "data_hex": "0102", "sha256": "00" } ] }"#;
        let err = Manifest::from_json(bad).unwrap().seeds().unwrap_err();
        assert!(matches!(err, KeyslotError::IntegrityMismatch { .. }));
    }

    #[test]
    fn rejects_ambiguous_or_missing_name() {
        let both = r#"{ "keys": [ { "owner": 0, "name": "a", "name_hex": "61", "data_hex": "" } ] }"#;
        let none = r#"{ "keys": [ { "owner": 0, "data_hex": "" } ] }"#;
        for json in [both, none] {
            let err = Manifest::from_json(json).unwrap().seeds().unwrap_err();
            assert!(matches!(err, KeyslotError::Manifest(_)), "{json}");
        }
    }

    #[test]
    fn rejects_bad_hex_and_oversized_fields() {
        let bad_hex = r#"{ "keys": [ { "owner": 0, "name": "a", "data_hex": "zz" } ] }"#;
        assert!(matches!(
            Manifest::from_json(bad_hex).unwrap().seeds().unwrap_err(),
            KeyslotError::Manifest(_)
        ));

        let long_name = r#"{ "keys": [ { "owner": 0, "name": "this-name-is-far-too-long", "data_hex": "" } ] }"#;
        assert!(matches!(
            Manifest::from_json(long_name).unwrap().seeds().unwrap_err(),
            KeyslotError::FieldTooLong { .. }
        ));

        let long_data = format!(
            r#"{{ "keys": [ {{ "owner": 0, "name": "a", "data_hex": "{}" }} ] }}"#,
            "00".repeat(DATA_SIZE + 1)
        );
        assert!(matches!(
            Manifest::from_json(&long_data).unwrap().seeds().unwrap_err(),
            KeyslotError::FieldTooLong { .. }
        ));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            Manifest::from_json("{ keys: ").unwrap_err(),
            KeyslotError::Serialization(_)
        ));
        assert!(matches!(
            Manifest::from_json(r#"{ "keys": [], "extra": 1 }"#).unwrap_err(),
            KeyslotError::Serialization(_)
        ));
    }

    #[test]
    fn debug_output_hides_payload() {
        let manifest =
            Manifest::from_json(r#"{ "keys": [ { "owner": 0, "name": "a", "data_hex": "c0ffee" } ] }"#)
                .unwrap();
        assert!(!format!("{manifest:?}").contains("c0ffee"));
    }

    #[test]
    fn provision_loads_read_only_keys() {
        let manifest = Manifest::from_json(
            r#"{ "keys": [
                { "owner": 7, "name": "root", "data_hex": "01" },
                { "owner": 8, "name": "root", "data_hex": "02" }
            ] }"#,
        )
        .unwrap();

        let mut buffer = Slot::new_buffer(4);
        let (mut table, outcome) = SlotTable::provision(&mut buffer, &manifest);
        outcome.unwrap();

        let name: KeyName = "root".parse().unwrap();
        let (record, index) = table.get(OwnerId::new(8), &name).unwrap();
        assert_eq!(index, 1);
        assert!(record.read_only);
        assert!(matches!(
            table.delete(OwnerId::new(7), &name),
            Err(KeyslotError::ReadOnly)
        ));
    }

    #[test]
    fn provision_with_undecodable_manifest_yields_empty_store() {
        let manifest =
            Manifest::from_json(r#"{ "keys": [ { "owner": 0, "name": "a", "data_hex": "x" } ] }"#)
                .unwrap();

        let mut buffer = Slot::new_buffer(4);
        let (table, outcome) = SlotTable::provision(&mut buffer, &manifest);
        assert!(matches!(outcome, Err(KeyslotError::Manifest(_))));
        assert!(table.is_empty());
        assert_eq!(table.free_slots(), 4);
    }

    #[test]
    fn from_config_without_manifest_is_empty() {
        let mut buffer = Slot::new_buffer(16);
        let table = SlotTable::from_config(&mut buffer, &StoreConfig::default()).unwrap();
        assert_eq!(table.capacity(), 16);
        assert!(table.is_empty());
    }

    #[test]
    fn from_config_rejects_mismatched_buffer() {
        let mut buffer = Slot::new_buffer(8);
        let err = SlotTable::from_config(&mut buffer, &StoreConfig::default()).unwrap_err();
        assert!(matches!(err, KeyslotError::Config(_)));
    }

    #[test]
    fn from_config_provisions_manifest_keys() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir,
            "seeds.json",
            r#"{ "keys": [ { "owner": 3, "name": "attest", "data_hex": "aa55" } ] }"#,
        );
        let config_path = write_file(
            &dir,
            "store.json",
            r#"{ "capacity": 4, "bootstrap_manifest": "seeds.json" }"#,
        );
        let config = StoreConfig::from_file(&config_path).unwrap();

        let mut buffer = Slot::new_buffer(config.capacity);
        let mut table = SlotTable::from_config(&mut buffer, &config).unwrap();
        assert_eq!(table.len(), 1);

        let name: KeyName = "attest".parse().unwrap();
        let record = table.get_by_index(OwnerId::new(3), 0).unwrap();
        assert_eq!(record.name, name);
        assert_eq!(record.data.as_bytes(), b"\xaa\x55");

        table.wipe();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn from_config_reports_duplicate_seeds() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = write_file(
            &dir,
            "seeds.json",
            r#"{ "keys": [
                { "owner": 3, "name": "attest", "data_hex": "01" },
                { "owner": 3, "name": "attest", "data_hex": "02" }
            ] }"#,
        );
        let config = StoreConfig {
            capacity: 4,
            bootstrap_manifest: Some(manifest_path),
        };

        let mut buffer = Slot::new_buffer(4);
        let err = SlotTable::from_config(&mut buffer, &config).unwrap_err();
        assert!(matches!(err, KeyslotError::Duplicated));
        assert!(buffer.iter().all(Slot::is_free));
    }

    #[test]
    fn from_config_with_missing_manifest_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            capacity: 2,
            bootstrap_manifest: Some(dir.path().join("absent.json")),
        };
        let mut buffer = Slot::new_buffer(2);
        assert!(matches!(
            SlotTable::from_config(&mut buffer, &config).unwrap_err(),
            KeyslotError::Io(_)
        ));
    }
}
