//! Switch-style command handling.
//!
//! ```text
//! raw line ──router::route_command──► parse ──► handler::VtpService ──► reply text
//! ```
//!
//! - **`router`**  – picks the command family from the leading keywords.
//! - **`parse`**   – turns text into [`ConfigCommand`] / [`ShowCommand`].
//! - **`handler`** – applies commands to the device store and registry.
//! - **`error`**   – rejection reasons, rendered verbatim to the user.
//!
//! [`ConfigCommand`]: parse::ConfigCommand
//! [`ShowCommand`]: parse::ShowCommand

pub mod error;
pub mod handler;
pub mod parse;
pub mod router;
