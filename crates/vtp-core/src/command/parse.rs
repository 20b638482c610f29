//! Tokenizing command text into typed commands.
//!
//! Keywords are matched case-insensitively.  Arguments keep the case the
//! user typed, except mode names, which are normalized to lower case.

use crate::command::error::CommandError;
use crate::domain::mode::VtpMode;
use crate::domain::vlan::{parse_vlan_list, VlanId, VlanKind};

/// A configuration-mode command that may change device state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// `vtp mode <server|client|transparent|off>`
    SetMode(VtpMode),
    /// `vtp domain <name>`
    SetDomain(String),
    /// `vtp password <words...>`
    SetPassword(String),
    /// `vtp pruning`
    EnablePruning,
    /// `no vtp pruning`
    DisablePruning,
    /// `vlan <list> [name <words...>]`
    DefineVlans {
        ids: Vec<VlanId>,
        name: Option<String>,
    },
    /// `no vlan <list>`
    RemoveVlans(Vec<VlanId>),
    /// `private-vlan <primary|community|isolated> <id>`
    SetPrivateVlan { id: VlanId, kind: VlanKind },
}

impl ConfigCommand {
    /// Short variant name for logs.  Never includes argument values, so a
    /// password cannot leak into log output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigCommand::SetMode(_) => "SetMode",
            ConfigCommand::SetDomain(_) => "SetDomain",
            ConfigCommand::SetPassword(_) => "SetPassword",
            ConfigCommand::EnablePruning => "EnablePruning",
            ConfigCommand::DisablePruning => "DisablePruning",
            ConfigCommand::DefineVlans { .. } => "DefineVlans",
            ConfigCommand::RemoveVlans(_) => "RemoveVlans",
            ConfigCommand::SetPrivateVlan { .. } => "SetPrivateVlan",
        }
    }
}

/// A read-only `show` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    /// `show vtp status`
    VtpStatus,
    /// `show vtp password`
    VtpPassword,
    /// `show vlan` / `show vlan brief`
    Vlans,
}

/// Parses a configuration command line.
///
/// # Errors
///
/// - [`CommandError::NotVtpCommand`] for a blank line or one that does not
///   start with `vtp`, `no vtp pruning`, `vlan`, `no vlan`, or `private-vlan`.
/// - [`CommandError::IncompleteCommand`] when a subcommand lacks its argument.
/// - [`CommandError::InvalidMode`] for an unknown mode keyword.
/// - [`CommandError::InvalidVlanList`] for a malformed VLAN list.
/// - [`CommandError::InvalidPrivateVlanType`] for an unknown private-VLAN role.
/// - [`CommandError::UnsupportedCommand`] for an unknown `vtp` subcommand.
pub fn parse_config_command(text: &str) -> Result<ConfigCommand, CommandError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let lower: Vec<String> = tokens.iter().map(|t| t.to_ascii_lowercase()).collect();
    let keywords: Vec<&str> = lower.iter().map(String::as_str).collect();

    match keywords.as_slice() {
        [] => Err(CommandError::NotVtpCommand),
        ["no", "vtp", "pruning", ..] => Ok(ConfigCommand::DisablePruning),
        ["no", "vlan", ..] => parse_remove_vlans(&tokens[2..]),
        ["vlan", ..] => parse_define_vlans(&tokens[1..]),
        ["private-vlan", ..] => parse_private_vlan(&tokens[1..]),
        ["vtp"] => Err(CommandError::IncompleteCommand),
        ["vtp", sub, ..] => parse_vtp_subcommand(sub, &tokens[2..]),
        _ => Err(CommandError::NotVtpCommand),
    }
}

fn parse_vtp_subcommand(sub: &str, args: &[&str]) -> Result<ConfigCommand, CommandError> {
    match sub {
        "mode" => {
            let token = args.first().ok_or(CommandError::IncompleteCommand)?;
            Ok(ConfigCommand::SetMode(token.to_ascii_lowercase().parse()?))
        }
        "domain" => {
            let name = args.first().ok_or(CommandError::IncompleteCommand)?;
            Ok(ConfigCommand::SetDomain((*name).to_string()))
        }
        "password" => {
            if args.is_empty() {
                return Err(CommandError::IncompleteCommand);
            }
            Ok(ConfigCommand::SetPassword(args.join(" ")))
        }
        "pruning" => Ok(ConfigCommand::EnablePruning),
        _ => Err(CommandError::UnsupportedCommand),
    }
}

fn parse_define_vlans(args: &[&str]) -> Result<ConfigCommand, CommandError> {
    if args.is_empty() {
        return Err(CommandError::IncompleteCommand);
    }
    if args[0].eq_ignore_ascii_case("dot1q") {
        return Err(CommandError::UnsupportedCommand);
    }

    let name_at = args.iter().position(|t| t.eq_ignore_ascii_case("name"));
    let (list_tokens, name) = match name_at {
        Some(i) => {
            let words = &args[i + 1..];
            if words.is_empty() {
                return Err(CommandError::IncompleteCommand);
            }
            (&args[..i], Some(words.join(" ")))
        }
        None => (args, None),
    };
    if list_tokens.is_empty() {
        return Err(CommandError::IncompleteCommand);
    }

    let ids = parse_vlan_list(&list_tokens.concat())?;
    Ok(ConfigCommand::DefineVlans { ids, name })
}

fn parse_remove_vlans(args: &[&str]) -> Result<ConfigCommand, CommandError> {
    if args.is_empty() {
        return Err(CommandError::IncompleteCommand);
    }
    Ok(ConfigCommand::RemoveVlans(parse_vlan_list(&args.concat())?))
}

fn parse_private_vlan(args: &[&str]) -> Result<ConfigCommand, CommandError> {
    let (role, rest) = args.split_first().ok_or(CommandError::IncompleteCommand)?;
    let kind = match role.to_ascii_lowercase().as_str() {
        "primary" => VlanKind::Primary,
        "community" => VlanKind::Community,
        "isolated" => VlanKind::Isolated,
        other => return Err(CommandError::InvalidPrivateVlanType(other.to_string())),
    };
    if rest.is_empty() {
        return Err(CommandError::IncompleteCommand);
    }

    let id_expr = rest.concat();
    match parse_vlan_list(&id_expr)?.as_slice() {
        [id] => Ok(ConfigCommand::SetPrivateVlan { id: *id, kind }),
        _ => Err(CommandError::InvalidVlanList(id_expr)),
    }
}

/// Parses a `show` command line.
///
/// # Errors
///
/// Returns [`CommandError::UnsupportedShow`] for anything other than
/// `show vtp status`, `show vtp password`, `show vlan`, or `show vlan brief`.
pub fn parse_show_command(text: &str) -> Result<ShowCommand, CommandError> {
    let lower: Vec<String> = text
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();
    let keywords: Vec<&str> = lower.iter().map(String::as_str).collect();

    match keywords.as_slice() {
        ["show", "vtp", "status", ..] => Ok(ShowCommand::VtpStatus),
        ["show", "vtp", "password", ..] => Ok(ShowCommand::VtpPassword),
        ["show", "vlan"] | ["show", "vlan", "brief"] => Ok(ShowCommand::Vlans),
        _ => Err(CommandError::UnsupportedShow),
    }
}
