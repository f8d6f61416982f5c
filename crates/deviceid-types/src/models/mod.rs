//! Domain models for the deviceid identification flow.
//!
//! Wire key names are pinned to what the identification service expects;
//! do not rename serde attributes without a matching server-side change.

mod identification;
mod profile;

// Re-export all models
pub use identification::{IdentificationResponse, Violation};
pub use profile::{AuthRequest, DeviceProfile, IdentifyRequest};
