//! # vtp-core
//!
//! Device-state model and domain-synchronization logic for the VTP simulator.
//!
//! This crate has zero dependencies on sockets, async runtimes, or UI
//! frameworks.  The WebSocket server (`vtp-server`) is just one caller.
//!
//! # Architecture overview (for beginners)
//!
//! The VLAN Trunking Protocol lets one switch (a *server*) advertise its VLAN
//! database to every other switch in the same *domain*.  Switches in *client*
//! mode adopt whatever the server advertised; *transparent* and *off*
//! switches ignore the protocol entirely.
//!
//! - **`domain`** – The state itself.  A [`DeviceStore`] holds one
//!   [`DeviceState`] per simulated switch, and a [`DomainRegistry`] holds the
//!   last VLAN database published into each domain.  The [`sync_action`]
//!   table decides when a device publishes or pulls.
//!
//! - **`command`** – Switch-style command text.  Lines such as
//!   `vtp mode client` are parsed into typed commands, applied to the store
//!   by [`VtpService`], and answered with one human-readable line.

pub mod command;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `vtp_core::VtpService` instead of `vtp_core::command::handler::VtpService`.
pub use command::error::{CommandError, ErrorKind};
pub use command::handler::VtpService;
pub use command::router::{route_command, Routed};
pub use domain::device::{DeviceHandle, DeviceState};
pub use domain::mode::{sync_action, SyncAction, SyncTrigger, VtpMode};
pub use domain::registry::{DomainRecord, DomainRegistry};
pub use domain::store::DeviceStore;
pub use domain::vlan::{Vlan, VlanDatabase, VlanId, VlanKind};
