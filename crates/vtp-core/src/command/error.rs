//! Command rejection errors.
//!
//! Every variant is local and recoverable: the handler renders it as a
//! one-line rejection and leaves device and registry state untouched.  The
//! `Display` text is exactly what the user sees.

use thiserror::Error;

use crate::domain::mode::VtpMode;

/// Reasons a command line is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// `vtp mode` was given a token that is not a VTP mode.
    #[error("Invalid VTP mode: {0}")]
    InvalidMode(String),

    /// A subcommand is missing its required argument (e.g. `vtp domain`).
    #[error("Incomplete VTP command")]
    IncompleteCommand,

    /// Unrecognized `vtp` subcommand.
    #[error("Unsupported VTP command")]
    UnsupportedCommand,

    /// Unrecognized `show` target.
    #[error("Unsupported VTP show command")]
    UnsupportedShow,

    /// The configuration handler was given a line that is not a VTP or VLAN
    /// configuration command at all.
    #[error("Invalid VTP command")]
    NotVtpCommand,

    /// A `vlan` / `no vlan` list could not be parsed.
    #[error("Invalid VLAN list: {0}")]
    InvalidVlanList(String),

    /// VLAN edits are refused while the device mirrors its domain's server.
    #[error(
        "VTP VLAN configuration not allowed when device is in {} mode.",
        .0.as_str().to_ascii_uppercase()
    )]
    VlanConfigNotAllowed(VtpMode),

    /// The edit would grow the VLAN database past what the switch supports.
    #[error("VLAN limit exceeded: at most {max} VLANs supported locally")]
    VlanLimitExceeded { max: usize },

    /// `private-vlan` was given a role other than primary, community, or
    /// isolated.
    #[error("Invalid private VLAN type: {0}")]
    InvalidPrivateVlanType(String),

    /// The line was blank.
    #[error("Empty command")]
    EmptyCommand,

    /// The line matched no known command family.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Coarse classification of [`CommandError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidMode,
    IncompleteCommand,
    UnsupportedCommand,
    /// An argument was present but malformed.
    InvalidArgument,
    /// The command is valid but not allowed in the device's current mode.
    NotPermitted,
    /// Rejected by the router before reaching a handler.
    Routing,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::InvalidMode(_) => ErrorKind::InvalidMode,
            CommandError::IncompleteCommand => ErrorKind::IncompleteCommand,
            CommandError::UnsupportedCommand
            | CommandError::UnsupportedShow
            | CommandError::NotVtpCommand => ErrorKind::UnsupportedCommand,
            CommandError::InvalidVlanList(_) | CommandError::InvalidPrivateVlanType(_) => {
                ErrorKind::InvalidArgument
            }
            CommandError::VlanConfigNotAllowed(_) | CommandError::VlanLimitExceeded { .. } => {
                ErrorKind::NotPermitted
            }
            CommandError::EmptyCommand | CommandError::UnknownCommand(_) => ErrorKind::Routing,
        }
    }
}
