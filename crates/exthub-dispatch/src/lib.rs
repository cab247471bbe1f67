//! Probe/dispatch layer for the hub.
//!
//! Translates a registered extension's base URL into live protocol
//! data and forwards action invocations, normalizing every outcome
//! into the uniform success/error envelope:
//!
//! - [`ExtensionClient`] performs the three protocol interactions
//!   (`/info`, `/capabilities`, `/execute`) under bounded timeouts.
//! - [`validate_and_preview`] gates registration on the minimum
//!   protocol contract.
//! - [`Aggregator`] fans queries out across every registered extension
//!   and merges results without letting one dead extension degrade the
//!   whole response.

pub mod aggregate;
pub mod client;
pub mod validate;

pub use aggregate::{Aggregator, CapabilityProbe, DueItem, REMINDERS_ACTION};
pub use client::{DispatchConfig, ExtensionClient};
pub use validate::{validate_and_preview, RegistrationPreview};
