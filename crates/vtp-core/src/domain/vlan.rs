//! VLAN identifiers, attributes, and the per-device VLAN database.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::command::error::CommandError;

/// IEEE 802.1Q VLAN identifier.
pub type VlanId = u16;

/// Lowest assignable VLAN id.
pub const MIN_VLAN_ID: VlanId = 1;

/// Highest assignable VLAN id (4095 is reserved).
pub const MAX_VLAN_ID: VlanId = 4094;

/// Ordered VLAN id → attributes map.
///
/// A `BTreeMap` keeps `show vlan` output sorted without an extra sort step.
pub type VlanDatabase = BTreeMap<VlanId, Vlan>;

/// Private-VLAN role of a VLAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VlanKind {
    #[default]
    Normal,
    Primary,
    Community,
    Isolated,
}

impl fmt::Display for VlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VlanKind::Normal => "normal",
            VlanKind::Primary => "primary",
            VlanKind::Community => "community",
            VlanKind::Isolated => "isolated",
        })
    }
}

/// Attributes of one VLAN.
///
/// VTP treats these as opaque: they are copied wholesale on publish and pull.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vlan {
    /// Optional administrator-assigned name.
    pub name: Option<String>,
    pub kind: VlanKind,
}

impl Vlan {
    /// Creates a normal VLAN with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: VlanKind::Normal,
        }
    }

    /// Name shown in `show vlan`: the configured one, or `VLAN0010` style.
    pub fn display_name(&self, id: VlanId) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("VLAN{id:04}"),
        }
    }
}

/// Parses a VLAN list expression such as `10`, `10,20`, or `10,20-22`.
///
/// Returns the ids in ascending order without duplicates.
///
/// # Errors
///
/// Returns [`CommandError::InvalidVlanList`] if the expression is empty, a
/// token is not a number, an id is outside `1..=4094`, or a range is
/// reversed.
pub fn parse_vlan_list(expr: &str) -> Result<Vec<VlanId>, CommandError> {
    let invalid = || CommandError::InvalidVlanList(expr.to_string());
    let mut ids = BTreeSet::new();

    for part in expr.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(invalid());
        }

        let (start, end) = match part.split_once('-') {
            Some((lo, hi)) => (parse_id(lo).ok_or_else(invalid)?, parse_id(hi).ok_or_else(invalid)?),
            None => {
                let id = parse_id(part).ok_or_else(invalid)?;
                (id, id)
            }
        };

        if start > end {
            return Err(invalid());
        }
        ids.extend(start..=end);
    }

    Ok(ids.into_iter().collect())
}

fn parse_id(token: &str) -> Option<VlanId> {
    token
        .trim()
        .parse::<VlanId>()
        .ok()
        .filter(|id| (MIN_VLAN_ID..=MAX_VLAN_ID).contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_id() {
        assert_eq!(parse_vlan_list("10").unwrap(), vec![10]);
    }

    #[test]
    fn test_parse_comma_list_is_sorted_and_deduplicated() {
        assert_eq!(parse_vlan_list("30,10,30").unwrap(), vec![10, 30]);
    }

    #[test]
    fn test_parse_range_is_inclusive() {
        assert_eq!(parse_vlan_list("20-23").unwrap(), vec![20, 21, 22, 23]);
    }

    #[test]
    fn test_parse_mixed_list_and_range() {
        assert_eq!(parse_vlan_list("5,10-12").unwrap(), vec![5, 10, 11, 12]);
    }

    #[test]
    fn test_parse_rejects_zero_and_reserved_ids() {
        assert!(parse_vlan_list("0").is_err());
        assert!(parse_vlan_list("4095").is_err());
        assert!(parse_vlan_list("4094").is_ok());
    }

    #[test]
    fn test_parse_rejects_reversed_range() {
        let err = parse_vlan_list("20-10").unwrap_err();
        assert_eq!(err, CommandError::InvalidVlanList("20-10".to_string()));
    }

    #[test]
    fn test_parse_rejects_garbage_and_empty_parts() {
        assert!(parse_vlan_list("").is_err());
        assert!(parse_vlan_list("ten").is_err());
        assert!(parse_vlan_list("10,,20").is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_padded_id() {
        assert_eq!(Vlan::default().display_name(7), "VLAN0007");
        assert_eq!(Vlan::named("users").display_name(7), "users");
    }
}
