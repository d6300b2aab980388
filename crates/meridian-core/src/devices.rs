//! # Device Registry
//!
//! The engine's read-only view of enumerable device records.
//!
//! The engine itself only ever reasons about device *ids* (linking them to
//! inventory batches); the remaining fields are passthrough for the console's
//! search-and-pick modal. Search takes a single filter key, matching how the
//! backend exposes its device listing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Device Record
// =============================================================================

/// One device as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub id: String,
    pub serial_number: String,
    pub key: String,
    pub hardware_model: String,
    pub firmware_version: String,
}

// =============================================================================
// Device Query
// =============================================================================

/// A single-filter device search.
///
/// Matching is case-insensitive substring containment on the chosen field;
/// `All` returns every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", tag = "by", content = "term")]
pub enum DeviceQuery {
    All,
    SerialNumber(String),
    Key(String),
    HardwareModel(String),
    FirmwareVersion(String),
}

impl DeviceQuery {
    /// Checks whether a record matches this query.
    pub fn matches(&self, device: &DeviceRecord) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        match self {
            DeviceQuery::All => true,
            DeviceQuery::SerialNumber(term) => contains(&device.serial_number, term),
            DeviceQuery::Key(term) => contains(&device.key, term),
            DeviceQuery::HardwareModel(term) => contains(&device.hardware_model, term),
            DeviceQuery::FirmwareVersion(term) => contains(&device.firmware_version, term),
        }
    }
}

// =============================================================================
// Device Registry Trait
// =============================================================================

/// Read-only, pull-based, filterable device listing.
///
/// Implemented over the REST backend by the console shell.
pub trait DeviceRegistry {
    /// Returns all devices matching the query.
    fn search(&self, query: &DeviceQuery) -> Vec<DeviceRecord>;
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// A `DeviceRegistry` backed by a plain vector, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeviceRegistry {
    devices: Vec<DeviceRecord>,
}

impl InMemoryDeviceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-loaded with the given devices.
    pub fn with_devices(devices: impl IntoIterator<Item = DeviceRecord>) -> Self {
        InMemoryDeviceRegistry {
            devices: devices.into_iter().collect(),
        }
    }

    /// Adds a device record.
    pub fn insert(&mut self, device: DeviceRecord) {
        self.devices.push(device);
    }
}

impl DeviceRegistry for InMemoryDeviceRegistry {
    fn search(&self, query: &DeviceQuery) -> Vec<DeviceRecord> {
        self.devices
            .iter()
            .filter(|d| query.matches(d))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, serial: &str, model: &str) -> DeviceRecord {
        DeviceRecord {
            id: id.to_string(),
            serial_number: serial.to_string(),
            key: format!("KEY-{}", id),
            hardware_model: model.to_string(),
            firmware_version: "1.4.2".to_string(),
        }
    }

    #[test]
    fn test_search_all() {
        let registry = InMemoryDeviceRegistry::with_devices([
            device("d1", "SN-1001", "M90"),
            device("d2", "SN-1002", "M90"),
        ]);
        assert_eq!(registry.search(&DeviceQuery::All).len(), 2);
    }

    #[test]
    fn test_search_by_serial_is_case_insensitive() {
        let registry = InMemoryDeviceRegistry::with_devices([
            device("d1", "SN-1001", "M90"),
            device("d2", "SN-2002", "M90"),
        ]);

        let hits = registry.search(&DeviceQuery::SerialNumber("sn-10".to_string()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "d1");
    }

    #[test]
    fn test_search_by_model_and_firmware() {
        let registry = InMemoryDeviceRegistry::with_devices([
            device("d1", "SN-1001", "M90"),
            device("d2", "SN-1002", "X200"),
        ]);

        let hits = registry.search(&DeviceQuery::HardwareModel("x2".to_string()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "d2");

        let hits = registry.search(&DeviceQuery::FirmwareVersion("9.9".to_string()));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_query_serializes_with_tag_and_term() {
        let json = serde_json::to_value(DeviceQuery::SerialNumber("SN-1".to_string())).unwrap();
        assert_eq!(json["by"], "serialNumber");
        assert_eq!(json["term"], "SN-1");
    }
}
