//! Domain entities for the VTP simulator.
//!
//! This module contains pure state and rules with no infrastructure
//! dependencies: nothing here opens a socket, spawns a task, or reads a file.
//!
//! # How the pieces fit together
//!
//! ```text
//!  DeviceStore ──get_or_create──► DeviceState (one per switch)
//!                                     │
//!                     sync_action(mode, trigger)
//!                                     │
//!                      ┌──────────────┴──────────────┐
//!                   publish                         pull
//!                      ▼                              ▲
//!                 DomainRegistry (one record per domain name)
//! ```
//!
//! A device never holds a reference to its domain record, only the domain
//! name.  Every transfer between the two is a full value copy.

pub mod device;
pub mod mode;
pub mod registry;
pub mod store;
pub mod vlan;
