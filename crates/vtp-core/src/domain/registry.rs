//! The shared domain registry: what each domain's server last advertised.
//!
//! # Concurrency
//!
//! Records live in a [`DashMap`], which shards its keys across independent
//! `RwLock`s.  A publish replaces a whole record under its shard's write
//! lock, and a pull clones a whole record under the read lock, so a reader
//! can never observe a half-copied VLAN map.  Two domains that hash to
//! different shards never contend.
//!
//! There is no arbitration between servers: the most recent publish into a
//! domain wins, whatever its revision.

use dashmap::DashMap;
use tracing::debug;

use crate::domain::device::DeviceState;
use crate::domain::mode::{sync_action, SyncAction, SyncTrigger, VtpMode};
use crate::domain::vlan::VlanDatabase;

/// Snapshot of a domain's advertised configuration.
///
/// Always an owned copy; never shares storage with any device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainRecord {
    pub revision: u32,
    pub vlans: VlanDatabase,
}

/// Process-wide table of domain records keyed by domain name.
///
/// Share it between sessions by wrapping it in an `Arc`.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    domains: DashMap<String, DomainRecord>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the record for `domain`, or `None` for an empty or
    /// unknown name.
    pub fn lookup(&self, domain: &str) -> Option<DomainRecord> {
        if domain.is_empty() {
            return None;
        }
        self.domains.get(domain).map(|record| record.clone())
    }

    /// Advertises a server's revision and VLANs into its domain.
    ///
    /// No-op unless the device is in server mode with a domain set.  Returns
    /// `true` if the record was written.
    pub fn publish(&self, device: &DeviceState) -> bool {
        if device.mode() != VtpMode::Server || device.domain().is_empty() {
            return false;
        }

        let record = DomainRecord {
            revision: device.revision(),
            vlans: device.vlan_database().clone(),
        };
        debug!(
            device = device.device_id(),
            domain = device.domain(),
            revision = record.revision,
            vlans = record.vlans.len(),
            "published VLAN database"
        );
        self.domains.insert(device.domain().to_string(), record);
        true
    }

    /// Overwrites a client's revision and VLANs from its domain's record.
    ///
    /// No-op unless the device is in client mode, has a domain set, and that
    /// domain has been published.  Returns `true` if the device was updated.
    pub fn pull(&self, device: &mut DeviceState) -> bool {
        if device.mode() != VtpMode::Client {
            return false;
        }
        let Some(record) = self.lookup(device.domain()) else {
            return false;
        };

        debug!(
            device = device.device_id(),
            domain = device.domain(),
            revision = record.revision,
            vlans = record.vlans.len(),
            "pulled VLAN database"
        );
        device.adopt(record.revision, record.vlans);
        true
    }

    /// Looks up the action for the device's current mode and performs it.
    ///
    /// Returns the action that was selected (even if publish/pull then
    /// declined because no domain is set).
    pub fn synchronize(&self, device: &mut DeviceState, trigger: SyncTrigger) -> SyncAction {
        let action = sync_action(device.mode(), trigger);
        match action {
            SyncAction::Publish => {
                self.publish(device);
            }
            SyncAction::Pull => {
                self.pull(device);
            }
            SyncAction::None => {}
        }
        action
    }

    /// Number of domains that have been published at least once.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
