//! # deviceid Core
//!
//! Device profile collection for the deviceid identification client.
//!
//! ```text
//! deviceid-core/src/
//! ├── provider.rs   # DeviceInfoProvider trait + SystemInfo / FakeDeviceInfo
//! ├── secrets.rs    # SecretStore trait + file-backed / in-memory stores
//! └── collector.rs  # ProfileCollector: providers -> DeviceProfile
//! ```
//!
//! The collector queries an injected [`DeviceInfoProvider`] and
//! [`SecretStore`] exactly once and produces an immutable
//! [`DeviceProfile`](deviceid_types::DeviceProfile). It never fails:
//! unavailable accessors degrade to documented fallback values.

pub mod collector;
pub mod provider;
pub mod secrets;

// Re-export commonly used types
pub use collector::ProfileCollector;
pub use provider::{DeviceInfoProvider, FakeDeviceInfo, SystemInfo};
pub use secrets::{
    FileSecretStore, MemorySecretStore, SecretStore, StoreError, TOKEN_ACCOUNT, TOKEN_SERVICE,
};
