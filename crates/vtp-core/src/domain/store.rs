//! Device state store: one [`DeviceState`] per device id, created on demand.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tracing::debug;

use crate::domain::device::{DeviceHandle, DeviceState};

/// In-memory registry of every simulated device.
///
/// Devices are created lazily on first reference and never removed.
#[derive(Debug, Default)]
pub struct DeviceStore {
    devices: DashMap<String, DeviceHandle>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `device_id`, creating default state if absent.
    ///
    /// Repeated calls for the same id return clones of the same `Arc`.
    /// The entry API holds the shard lock across check-and-insert, so two
    /// sessions racing on a new id still end up sharing one record.
    pub fn get_or_create(&self, device_id: &str) -> DeviceHandle {
        if let Some(handle) = self.devices.get(device_id) {
            return handle.value().clone();
        }

        let entry = self.devices.entry(device_id.to_string()).or_insert_with(|| {
            debug!(device = device_id, "created device state");
            Arc::new(Mutex::new(DeviceState::new(device_id)))
        });
        entry.value().clone()
    }

    /// Number of devices referenced so far.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mode::VtpMode;

    #[test]
    fn test_get_or_create_returns_default_state() {
        let store = DeviceStore::new();

        let handle = store.get_or_create("SW1");

        let device = handle.lock().unwrap();
        assert_eq!(device.device_id(), "SW1");
        assert_eq!(device.mode(), VtpMode::Server);
    }

    #[test]
    fn test_get_or_create_returns_same_instance() {
        // Arrange
        let store = DeviceStore::new();
        let first = store.get_or_create("SW1");

        // Act
        first.lock().unwrap().set_mode(VtpMode::Client);
        let second = store.get_or_create("SW1");

        // Assert
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().unwrap().mode(), VtpMode::Client);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_distinct_ids_get_distinct_state() {
        let store = DeviceStore::new();

        let a = store.get_or_create("SW1");
        let b = store.get_or_create("SW2");

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_concurrent_get_or_create_yields_one_instance() {
        let store = Arc::new(DeviceStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.get_or_create("SW1"))
            })
            .collect();
        let results: Vec<DeviceHandle> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(store.len(), 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
