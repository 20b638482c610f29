//! VTP operating modes and the mode-dependent synchronization table.
//!
//! Every place in the command layer that might touch the domain registry asks
//! [`sync_action`] what to do instead of branching on the mode itself.  Adding
//! a mode means adding one enum variant and one row to the table.

use std::fmt;
use std::str::FromStr;

use crate::command::error::CommandError;

/// The four VTP operating modes a switch can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VtpMode {
    /// Authors the domain's VLAN database and advertises it.
    #[default]
    Server,
    /// Adopts whatever the domain's server last advertised.
    Client,
    /// Keeps a local VLAN database and ignores domain advertisements.
    Transparent,
    /// VTP disabled.
    Off,
}

impl VtpMode {
    /// All modes, in the order they are listed in usage text.
    pub const ALL: [VtpMode; 4] = [
        VtpMode::Server,
        VtpMode::Client,
        VtpMode::Transparent,
        VtpMode::Off,
    ];

    /// Lower-case keyword used in commands and in `show vtp status`.
    pub fn as_str(self) -> &'static str {
        match self {
            VtpMode::Server => "server",
            VtpMode::Client => "client",
            VtpMode::Transparent => "transparent",
            VtpMode::Off => "off",
        }
    }
}

impl fmt::Display for VtpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VtpMode {
    type Err = CommandError;

    /// Parses a mode keyword case-insensitively.
    ///
    /// The error carries the token exactly as the user typed it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VtpMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CommandError::InvalidMode(s.to_string()))
    }
}

/// The state changes that can cause a device to talk to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// `vtp mode <m>` completed.
    ModeSet,
    /// `vtp domain <d>` completed.
    DomainSet,
    /// `show vtp status` or `show vlan` is about to render.
    StatusShown,
    /// The local VLAN database was edited.
    VlanEdited,
}

/// What a device should do with the registry after a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy the device's revision and VLANs into the registry.
    Publish,
    /// Copy the registry's revision and VLANs into the device.
    Pull,
    /// Leave the registry alone.
    None,
}

/// The `{mode, trigger} → action` dispatch table.
///
/// Publish and pull are additionally gated inside [`DomainRegistry`] on a
/// non-empty domain name, so the table only has to encode the mode rules.
///
/// [`DomainRegistry`]: crate::domain::registry::DomainRegistry
pub fn sync_action(mode: VtpMode, trigger: SyncTrigger) -> SyncAction {
    use SyncTrigger::{DomainSet, ModeSet, StatusShown, VlanEdited};

    match (mode, trigger) {
        (VtpMode::Server, ModeSet | DomainSet | VlanEdited) => SyncAction::Publish,
        (VtpMode::Server, StatusShown) => SyncAction::None,
        (VtpMode::Client, ModeSet | DomainSet | StatusShown) => SyncAction::Pull,
        // Client-mode VLAN edits are rejected before they reach the table.
        (VtpMode::Client, VlanEdited) => SyncAction::None,
        (VtpMode::Transparent | VtpMode::Off, _) => SyncAction::None,
    }
}
