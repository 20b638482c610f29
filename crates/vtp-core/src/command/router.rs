//! First-word dispatch of a raw command line.
//!
//! The transport hands every line it receives to [`route_command`], which
//! decides whether it is a configuration command, a show command, a ping, or
//! nothing the simulator understands.

use tracing::debug;

use crate::command::error::CommandError;
use crate::command::handler::VtpService;

/// Ping target used when `ping` is given without an argument.
pub const DEFAULT_PING_TARGET: &str = "R1";

/// Outcome of routing one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Text produced by the VTP configuration or show handler.
    Reply(String),
    /// The router itself rejected the line.
    Rejected(CommandError),
    /// `ping <target>`: the caller plays the scripted exchange.
    Ping { target: String },
}

/// Command family of a line, decided from its leading keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandClass {
    Empty,
    Config,
    Show,
    Ping,
    Unknown,
}

/// Classifies a line without touching any state.
pub fn classify(line: &str) -> CommandClass {
    let lower = line.trim().to_ascii_lowercase();

    if lower.is_empty() {
        CommandClass::Empty
    } else if lower.starts_with("vtp ")
        || lower == "vtp pruning"
        || lower.starts_with("no vtp pruning")
        || lower.starts_with("vlan ")
        || lower.starts_with("no vlan ")
        || lower.starts_with("private-vlan")
    {
        CommandClass::Config
    } else if lower.starts_with("show vtp") || lower.starts_with("show vlan") {
        CommandClass::Show
    } else if lower.starts_with("ping") {
        CommandClass::Ping
    } else {
        CommandClass::Unknown
    }
}

/// Routes `line` for `device_id` to the matching handler.
pub fn route_command(service: &VtpService, device_id: &str, line: &str) -> Routed {
    let line = line.trim();
    let class = classify(line);
    debug!(device = device_id, ?class, "routing command");

    match class {
        CommandClass::Empty => Routed::Rejected(CommandError::EmptyCommand),
        CommandClass::Config => Routed::Reply(service.handle_config_command(device_id, line)),
        CommandClass::Show => Routed::Reply(service.handle_show_command(device_id, line)),
        CommandClass::Ping => Routed::Ping {
            target: line
                .split_whitespace()
                .nth(1)
                .unwrap_or(DEFAULT_PING_TARGET)
                .to_string(),
        },
        CommandClass::Unknown => Routed::Rejected(CommandError::UnknownCommand(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_config_lines() {
        for line in [
            "vtp mode client",
            "VTP Pruning",
            "no vtp pruning",
            "vlan 10",
            "no vlan 10",
            "private-vlan isolated 30",
        ] {
            assert_eq!(classify(line), CommandClass::Config, "{line:?}");
        }
    }

    #[test]
    fn test_classify_show_lines() {
        assert_eq!(classify("show vtp status"), CommandClass::Show);
        assert_eq!(classify("Show Vlan brief"), CommandClass::Show);
    }

    #[test]
    fn test_classify_bare_vtp_is_unknown() {
        assert_eq!(classify("vtp"), CommandClass::Unknown);
    }

    #[test]
    fn test_classify_blank_is_empty() {
        assert_eq!(classify("   "), CommandClass::Empty);
    }

    #[test]
    fn test_route_empty_line() {
        let service = VtpService::new();
        let routed = route_command(&service, "SW1", "");
        assert_eq!(routed, Routed::Rejected(CommandError::EmptyCommand));
        assert!(service.devices().is_empty(), "empty line must not create a device");
    }

    #[test]
    fn test_route_unknown_line() {
        let service = VtpService::new();
        match route_command(&service, "SW1", "  foo bar ") {
            Routed::Rejected(e) => assert_eq!(e.to_string(), "Unknown command: foo bar"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_route_ping_target() {
        let service = VtpService::new();
        assert_eq!(
            route_command(&service, "PC1", "ping PC2"),
            Routed::Ping {
                target: "PC2".to_string()
            }
        );
        assert_eq!(
            route_command(&service, "PC1", "ping"),
            Routed::Ping {
                target: DEFAULT_PING_TARGET.to_string()
            }
        );
    }

    #[test]
    fn test_route_config_and_show() {
        let service = VtpService::new();

        let set = route_command(&service, "SW1", "vtp domain SALES");
        let show = route_command(&service, "SW1", "show vtp status");

        assert_eq!(set, Routed::Reply("VTP domain name set to SALES (changed)".to_string()));
        match show {
            Routed::Reply(text) => assert!(text.contains("VTP Domain Name: SALES")),
            other => panic!("expected reply, got {other:?}"),
        }
    }
}
