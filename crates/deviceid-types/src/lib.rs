//! # deviceid Types
//!
//! Wire-format models shared by the deviceid collector and client.
//!
//! This crate sits at the bottom of the dependency graph:
//!
//! ```text
//!          deviceid-types (this crate)
//!                  │
//!         ┌────────┴────────┐
//!         ▼                 ▼
//!   deviceid-core    deviceid-client
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde using the exact key names the identification
//!   service expects on the wire
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod models;

pub use models::{
    AuthRequest, DeviceProfile, IdentificationResponse, IdentifyRequest, Violation,
};
