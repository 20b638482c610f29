//! Per-device VTP configuration state and its rendered views.

use std::sync::{Arc, Mutex};

use crate::command::error::CommandError;
use crate::domain::mode::VtpMode;
use crate::domain::vlan::{Vlan, VlanDatabase, VlanId, VlanKind};

/// Maximum number of VLANs a simulated switch reports supporting.
pub const MAX_LOCAL_VLANS: usize = 1005;

/// VTP version reported in `show vtp status`.
pub const VTP_VERSION: u8 = 2;

/// Shared handle to one device's state.
///
/// The [`DeviceStore`](crate::domain::store::DeviceStore) hands out clones of
/// the same `Arc`, so every caller for a device id mutates the same record.
pub type DeviceHandle = Arc<Mutex<DeviceState>>;

/// VTP configuration of one simulated switch.
///
/// Fields are private so the revision-reset rule in [`set_domain`] cannot be
/// bypassed.
///
/// [`set_domain`]: DeviceState::set_domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    device_id: String,
    mode: VtpMode,
    domain: String,
    password: Option<String>,
    revision: u32,
    pruning_enabled: bool,
    vlan_database: VlanDatabase,
}

impl DeviceState {
    /// Creates the factory-default state: server mode, no domain, revision 0.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            mode: VtpMode::default(),
            domain: String::new(),
            password: None,
            revision: 0,
            pruning_enabled: false,
            vlan_database: VlanDatabase::new(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn mode(&self) -> VtpMode {
        self.mode
    }

    /// Domain name; empty when not configured.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn pruning_enabled(&self) -> bool {
        self.pruning_enabled
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn vlan_database(&self) -> &VlanDatabase {
        &self.vlan_database
    }

    pub fn set_mode(&mut self, mode: VtpMode) {
        self.mode = mode;
    }

    /// Sets the domain name, resetting the revision only if the name changed.
    ///
    /// Returns `true` if the name changed.
    pub fn set_domain(&mut self, domain: impl Into<String>) -> bool {
        let domain = domain.into();
        let changed = self.domain != domain;
        if changed {
            self.domain = domain;
            self.revision = 0;
        }
        changed
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    pub fn set_pruning(&mut self, enabled: bool) {
        self.pruning_enabled = enabled;
    }

    /// Increments the configuration revision after a server-side VLAN edit.
    pub fn bump_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }

    /// Creates each listed VLAN if missing; renames all of them when `name`
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::VlanLimitExceeded`] if the new VLANs would take
    /// the database past [`MAX_LOCAL_VLANS`].  Nothing is changed on error.
    pub fn define_vlans(&mut self, ids: &[VlanId], name: Option<&str>) -> Result<(), CommandError> {
        self.ensure_capacity(ids)?;
        for &id in ids {
            let vlan = self.vlan_database.entry(id).or_default();
            if let Some(name) = name {
                vlan.name = Some(name.to_string());
            }
        }
        Ok(())
    }

    /// Sets the private-VLAN role of `id`, creating the VLAN if missing.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::VlanLimitExceeded`] if creating the VLAN would
    /// exceed [`MAX_LOCAL_VLANS`].
    pub fn set_vlan_kind(&mut self, id: VlanId, kind: VlanKind) -> Result<(), CommandError> {
        self.ensure_capacity(&[id])?;
        self.vlan_database.entry(id).or_default().kind = kind;
        Ok(())
    }

    /// Removes the listed VLANs.  Returns the ids that actually existed.
    pub fn remove_vlans(&mut self, ids: &[VlanId]) -> Vec<VlanId> {
        ids.iter()
            .copied()
            .filter(|id| self.vlan_database.remove(id).is_some())
            .collect()
    }

    fn ensure_capacity(&self, ids: &[VlanId]) -> Result<(), CommandError> {
        let added = ids
            .iter()
            .filter(|&&id| !self.vlan_database.contains_key(&id))
            .count();
        if self.vlan_database.len() + added > MAX_LOCAL_VLANS {
            return Err(CommandError::VlanLimitExceeded {
                max: MAX_LOCAL_VLANS,
            });
        }
        Ok(())
    }

    /// Inserts or replaces a single VLAN.
    pub fn insert_vlan(&mut self, id: VlanId, vlan: Vlan) {
        self.vlan_database.insert(id, vlan);
    }

    /// Replaces revision and VLANs with a snapshot taken from the registry.
    pub(crate) fn adopt(&mut self, revision: u32, vlans: VlanDatabase) {
        self.revision = revision;
        self.vlan_database = vlans;
    }

    /// Renders the `show vtp status` block.
    pub fn status_text(&self) -> String {
        let domain = if self.domain.is_empty() {
            "not configured"
        } else {
            &self.domain
        };
        let pruning = if self.pruning_enabled {
            "Enabled"
        } else {
            "Disabled"
        };

        [
            format!("VTP Version: {VTP_VERSION}"),
            format!("Configuration Revision: {}", self.revision),
            format!("Maximum VLANs supported locally: {MAX_LOCAL_VLANS}"),
            format!("Number of existing VLANs: {}", self.vlan_database.len()),
            format!("VTP Operating Mode: {}", self.mode),
            format!("VTP Domain Name: {domain}"),
            format!("VTP Pruning Mode: {pruning}"),
        ]
        .join("\n")
    }

    /// Renders the `show vtp password` line.  Never includes the value.
    pub fn password_status_text(&self) -> String {
        if self.has_password() {
            "VTP Password: <not displayed> (configured)".to_string()
        } else {
            "VTP Password: not configured".to_string()
        }
    }

    /// Renders the `show vlan brief` table.
    pub fn vlan_table_text(&self) -> String {
        if self.vlan_database.is_empty() {
            return "No VLANs configured".to_string();
        }

        let mut lines = vec![
            format!("{:<4} {:<32} {}", "VLAN", "Name", "Type"),
            format!("{} {} {}", "-".repeat(4), "-".repeat(32), "-".repeat(9)),
        ];
        lines.extend(self.vlan_database.iter().map(|(id, vlan)| {
            format!("{:<4} {:<32} {}", id, vlan.display_name(*id), vlan.kind)
        }));
        lines.join("\n")
    }
}
