//! VtpService: applies typed commands to device state and the registry.
//!
//! The service is a cheap-to-clone handle around the two shared tables.
//! Every WebSocket session gets a clone, so all sessions see the same
//! devices and the same domains.
//!
//! # Lock order
//!
//! A command locks exactly one device, then (optionally) touches the
//! registry.  The registry never calls back into a device lock, so the order
//! is always device → registry shard.

use std::sync::{Arc, MutexGuard, PoisonError};

use tracing::debug;

use crate::command::error::CommandError;
use crate::command::parse::{parse_config_command, parse_show_command, ConfigCommand, ShowCommand};
use crate::domain::device::{DeviceHandle, DeviceState};
use crate::domain::mode::{sync_action, SyncAction, SyncTrigger, VtpMode};
use crate::domain::registry::DomainRegistry;
use crate::domain::store::DeviceStore;
use crate::domain::vlan::VlanId;

/// Entry point for VTP configuration and show commands.
#[derive(Debug, Clone, Default)]
pub struct VtpService {
    devices: Arc<DeviceStore>,
    registry: Arc<DomainRegistry>,
}

impl VtpService {
    /// Creates a service with an empty device store and registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service over existing shared tables.
    pub fn with_parts(devices: Arc<DeviceStore>, registry: Arc<DomainRegistry>) -> Self {
        Self { devices, registry }
    }

    pub fn devices(&self) -> &Arc<DeviceStore> {
        &self.devices
    }

    pub fn registry(&self) -> &Arc<DomainRegistry> {
        &self.registry
    }

    /// Returns the shared state handle for `device_id`, creating it if needed.
    pub fn device(&self, device_id: &str) -> DeviceHandle {
        self.devices.get_or_create(device_id)
    }

    /// Parses and applies a configuration command, returning one line of
    /// confirmation or rejection text.
    pub fn handle_config_command(&self, device_id: &str, text: &str) -> String {
        match parse_config_command(text).and_then(|cmd| self.execute_config(device_id, cmd)) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(device = device_id, error = %e, "config command rejected");
                e.to_string()
            }
        }
    }

    /// Parses and answers a show command.
    pub fn handle_show_command(&self, device_id: &str, text: &str) -> String {
        match parse_show_command(text) {
            Ok(cmd) => self.execute_show(device_id, cmd),
            Err(e) => {
                debug!(device = device_id, error = %e, "show command rejected");
                e.to_string()
            }
        }
    }

    /// Applies an already-parsed configuration command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::VlanConfigNotAllowed`] for VLAN edits on a
    /// client-mode device and [`CommandError::VlanLimitExceeded`] for edits
    /// past the local VLAN limit.  State is unchanged on error.
    pub fn execute_config(&self, device_id: &str, cmd: ConfigCommand) -> Result<String, CommandError> {
        debug!(device = device_id, command = cmd.kind_name(), "applying config command");

        let handle = self.device(device_id);
        let mut device = lock(&handle);

        let reply = match cmd {
            ConfigCommand::SetMode(mode) => {
                device.set_mode(mode);
                self.registry.synchronize(&mut device, SyncTrigger::ModeSet);
                format!("VTP mode set to {mode}")
            }
            ConfigCommand::SetDomain(domain) => {
                let changed = device.set_domain(domain);
                self.registry.synchronize(&mut device, SyncTrigger::DomainSet);
                let shown = if device.domain().is_empty() {
                    "not configured"
                } else {
                    device.domain()
                };
                let suffix = if changed { " (changed)" } else { "" };
                format!("VTP domain name set to {shown}{suffix}")
            }
            ConfigCommand::SetPassword(password) => {
                device.set_password(password);
                "VTP password configured".to_string()
            }
            ConfigCommand::EnablePruning => {
                device.set_pruning(true);
                "VTP pruning enabled".to_string()
            }
            ConfigCommand::DisablePruning => {
                device.set_pruning(false);
                "VTP pruning disabled".to_string()
            }
            ConfigCommand::DefineVlans { ids, name } => {
                ensure_vlan_edit_allowed(&device)?;
                device.define_vlans(&ids, name.as_deref())?;
                self.commit_vlan_edit(&mut device);
                match name {
                    Some(name) => format!("VLAN {} defined with name {name}", join_ids(&ids)),
                    None => format!("VLAN {} defined", join_ids(&ids)),
                }
            }
            ConfigCommand::RemoveVlans(ids) => {
                ensure_vlan_edit_allowed(&device)?;
                let removed = device.remove_vlans(&ids);
                if removed.is_empty() {
                    "No matching VLANs to remove".to_string()
                } else {
                    self.commit_vlan_edit(&mut device);
                    format!("VLAN {} removed", join_ids(&removed))
                }
            }
            ConfigCommand::SetPrivateVlan { id, kind } => {
                ensure_vlan_edit_allowed(&device)?;
                device.set_vlan_kind(id, kind)?;
                self.commit_vlan_edit(&mut device);
                format!("VLAN {id} set as {kind} private VLAN")
            }
        };

        Ok(reply)
    }

    /// Answers an already-parsed show command.
    ///
    /// Client-mode devices pull from their domain before rendering so the
    /// output reflects the latest publish.
    pub fn execute_show(&self, device_id: &str, cmd: ShowCommand) -> String {
        let handle = self.device(device_id);
        let mut device = lock(&handle);

        match cmd {
            ShowCommand::VtpStatus => {
                self.registry.synchronize(&mut device, SyncTrigger::StatusShown);
                device.status_text()
            }
            ShowCommand::VtpPassword => device.password_status_text(),
            ShowCommand::Vlans => {
                self.registry.synchronize(&mut device, SyncTrigger::StatusShown);
                device.vlan_table_text()
            }
        }
    }

    /// Bumps the revision if the edit will be advertised, then syncs.
    fn commit_vlan_edit(&self, device: &mut DeviceState) {
        if sync_action(device.mode(), SyncTrigger::VlanEdited) == SyncAction::Publish {
            device.bump_revision();
        }
        self.registry.synchronize(device, SyncTrigger::VlanEdited);
    }
}

fn ensure_vlan_edit_allowed(device: &DeviceState) -> Result<(), CommandError> {
    if device.mode() == VtpMode::Client {
        return Err(CommandError::VlanConfigNotAllowed(device.mode()));
    }
    Ok(())
}

fn join_ids(ids: &[VlanId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

/// Locks a device, recovering from poisoning.
///
/// Every mutation completes before any fallible step, so a poisoned lock
/// still guards consistent state.
fn lock(handle: &DeviceHandle) -> MutexGuard<'_, DeviceState> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vlan::VlanKind;

    fn run(service: &VtpService, device: &str, lines: &[&str]) -> Vec<String> {
        lines
            .iter()
            .map(|line| service.handle_config_command(device, line))
            .collect()
    }

    #[test]
    fn test_set_mode_confirms() {
        let service = VtpService::new();
        assert_eq!(
            service.handle_config_command("SW1", "vtp mode transparent"),
            "VTP mode set to transparent"
        );
        assert_eq!(lock(&service.device("SW1")).mode(), VtpMode::Transparent);
    }

    #[test]
    fn test_invalid_mode_leaves_mode_unchanged() {
        // Arrange
        let service = VtpService::new();
        service.handle_config_command("SW1", "vtp mode client");

        // Act
        let reply = service.handle_config_command("SW1", "vtp mode bogus");

        // Assert
        assert_eq!(reply, "Invalid VTP mode: bogus");
        assert_eq!(lock(&service.device("SW1")).mode(), VtpMode::Client);
    }

    #[test]
    fn test_set_domain_reports_change_only_when_changed() {
        let service = VtpService::new();

        let replies = run(&service, "SW1", &["vtp domain CORP", "vtp domain CORP"]);

        assert_eq!(replies[0], "VTP domain name set to CORP (changed)");
        assert_eq!(replies[1], "VTP domain name set to CORP");
    }

    #[test]
    fn test_password_and_pruning_replies() {
        let service = VtpService::new();

        let replies = run(
            &service,
            "SW1",
            &["vtp password cisco", "vtp pruning", "no vtp pruning"],
        );

        assert_eq!(
            replies,
            vec!["VTP password configured", "VTP pruning enabled", "VTP pruning disabled"]
        );
        let handle = service.device("SW1");
        let device = lock(&handle);
        assert!(device.has_password());
        assert!(!device.pruning_enabled());
    }

    #[test]
    fn test_incomplete_and_unsupported_replies() {
        let service = VtpService::new();

        let replies = run(&service, "SW1", &["vtp domain", "vtp frobnicate", "interface g0/1"]);

        assert_eq!(
            replies,
            vec!["Incomplete VTP command", "Unsupported VTP command", "Invalid VTP command"]
        );
        assert_eq!(*lock(&service.device("SW1")), DeviceState::new("SW1"));
    }

    #[test]
    fn test_server_vlan_edit_bumps_revision_and_publishes() {
        let service = VtpService::new();

        let replies = run(&service, "SW1", &["vtp domain CORP", "vlan 10 name users"]);

        assert_eq!(replies[1], "VLAN 10 defined with name users");
        assert_eq!(lock(&service.device("SW1")).revision(), 1);
        let record = service.registry().lookup("CORP").unwrap();
        assert_eq!(record.revision, 1);
        assert_eq!(record.vlans.len(), 1);
    }

    #[test]
    fn test_client_vlan_edit_is_rejected() {
        let service = VtpService::new();
        run(&service, "SW1", &["vtp mode client"]);

        let reply = service.handle_config_command("SW1", "vlan 10");

        assert_eq!(
            reply,
            "VTP VLAN configuration not allowed when device is in CLIENT mode."
        );
        assert!(lock(&service.device("SW1")).vlan_database().is_empty());
    }

    #[test]
    fn test_transparent_vlan_edit_is_local_only() {
        let service = VtpService::new();
        run(&service, "SW1", &["vtp domain CORP", "vtp mode transparent"]);

        let reply = service.handle_config_command("SW1", "vlan 10-11");

        assert_eq!(reply, "VLAN 10,11 defined");
        let handle = service.device("SW1");
        let device = lock(&handle);
        assert_eq!(device.revision(), 0);
        assert_eq!(device.vlan_database().len(), 2);
        // The earlier server-mode domain set published an empty database.
        assert!(service.registry().lookup("CORP").unwrap().vlans.is_empty());
    }

    #[test]
    fn test_remove_vlans() {
        let service = VtpService::new();
        run(&service, "SW1", &["vtp domain CORP", "vlan 10,20"]);

        let replies = run(&service, "SW1", &["no vlan 10", "no vlan 99"]);

        assert_eq!(replies, vec!["VLAN 10 removed", "No matching VLANs to remove"]);
        assert_eq!(lock(&service.device("SW1")).revision(), 2);
        assert_eq!(service.registry().lookup("CORP").unwrap().revision, 2);
    }

    #[test]
    fn test_remove_reports_only_existing_ids() {
        // Arrange
        let service = VtpService::new();
        run(&service, "SW1", &["vlan 10,20"]);

        // Act
        let reply = service.handle_config_command("SW1", "no vlan 10,99");

        // Assert
        assert_eq!(reply, "VLAN 10 removed");
        assert_eq!(
            lock(&service.device("SW1")).vlan_database().keys().copied().collect::<Vec<_>>(),
            vec![20]
        );
    }

    #[test]
    fn test_vlan_range_past_local_limit_is_rejected() {
        let service = VtpService::new();
        run(&service, "SW1", &["vtp domain CORP"]);

        let reply = service.handle_config_command("SW1", "vlan 1-4094");

        assert_eq!(reply, "VLAN limit exceeded: at most 1005 VLANs supported locally");
        let handle = service.device("SW1");
        let device = lock(&handle);
        assert!(device.vlan_database().is_empty());
        assert_eq!(device.revision(), 0, "rejected edit must not bump the revision");
        assert!(service.registry().lookup("CORP").unwrap().vlans.is_empty());
    }

    #[test]
    fn test_private_vlan_on_server_publishes_role() {
        // Arrange
        let service = VtpService::new();
        run(&service, "SW1", &["vtp domain CORP", "vlan 100 name PVLAN"]);

        // Act
        let replies = run(
            &service,
            "SW1",
            &["private-vlan primary 100", "private-vlan community 101"],
        );

        // Assert
        assert_eq!(
            replies,
            vec![
                "VLAN 100 set as primary private VLAN",
                "VLAN 101 set as community private VLAN",
            ]
        );
        let record = service.registry().lookup("CORP").unwrap();
        assert_eq!(record.revision, 3);
        assert_eq!(record.vlans[&100].kind, VlanKind::Primary);
        assert_eq!(record.vlans[&100].name.as_deref(), Some("PVLAN"));
        assert_eq!(record.vlans[&101].kind, VlanKind::Community);

        let table = service.handle_show_command("SW1", "show vlan");
        assert!(table.contains("community"), "{table}");
    }

    #[test]
    fn test_private_vlan_on_client_is_rejected() {
        let service = VtpService::new();
        run(&service, "SW1", &["vtp mode client"]);

        let reply = service.handle_config_command("SW1", "private-vlan isolated 30");

        assert_eq!(
            reply,
            "VTP VLAN configuration not allowed when device is in CLIENT mode."
        );
        assert!(lock(&service.device("SW1")).vlan_database().is_empty());
    }

    #[test]
    fn test_private_vlan_on_transparent_is_local_only() {
        let service = VtpService::new();
        run(&service, "SW1", &["vtp domain CORP", "vtp mode transparent"]);

        let reply = service.handle_config_command("SW1", "private-vlan isolated 30");

        assert_eq!(reply, "VLAN 30 set as isolated private VLAN");
        assert_eq!(lock(&service.device("SW1")).revision(), 0);
        assert!(service.registry().lookup("CORP").unwrap().vlans.is_empty());
    }

    #[test]
    fn test_show_password_hides_value() {
        let service = VtpService::new();
        run(&service, "SW1", &["vtp password topsecret"]);

        let reply = service.handle_show_command("SW1", "show vtp password");

        assert_eq!(reply, "VTP Password: <not displayed> (configured)");
    }

    #[test]
    fn test_show_unsupported_target() {
        let service = VtpService::new();
        assert_eq!(
            service.handle_show_command("SW1", "show vtp devices"),
            "Unsupported VTP show command"
        );
    }

    #[test]
    fn test_show_vlan_on_client_pulls_first() {
        let service = VtpService::new();
        run(&service, "SRV", &["vtp domain CORP", "vlan 30 name voice"]);
        run(&service, "CLI", &["vtp mode client", "vtp domain CORP"]);
        run(&service, "SRV", &["vlan 40"]);

        let table = service.handle_show_command("CLI", "show vlan brief");

        assert!(table.contains("voice"));
        assert!(table.contains("VLAN0040"));
    }
}
