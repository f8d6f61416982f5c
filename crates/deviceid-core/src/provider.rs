//! Device and environment signal providers.
//!
//! The collector never talks to platform APIs directly; it goes through
//! [`DeviceInfoProvider`] so each target platform supplies one
//! implementation and tests inject a deterministic fake. Accessors that
//! can legitimately be absent on a platform return `Option`; the
//! collector substitutes the documented fallback for `None`.

use std::fs;
use std::path::Path;

use sysinfo::{Disks, System};
use uuid::Uuid;

/// Filename for the persisted per-install vendor identifier.
const VENDOR_ID_FILE: &str = "vendor_id";

/// Read-only access to the device and environment signals that make up a
/// profile snapshot.
pub trait DeviceInfoProvider: Send + Sync {
    /// Stable per-install identifier, `None` when unavailable.
    fn vendor_id(&self) -> Option<String>;
    /// User-visible device name.
    fn device_name(&self) -> String;
    /// Operating system family name.
    fn system_name(&self) -> String;
    /// Operating system version.
    fn system_version(&self) -> String;
    /// Full platform version string.
    fn platform_version(&self) -> String;
    /// Screen dimensions in points, `[width, height]`.
    fn screen_resolution(&self) -> [f64; 2];
    /// Pixel density multiplier.
    fn screen_scale(&self) -> f64;
    /// Physical memory in bytes.
    fn physical_memory(&self) -> u64;
    /// Active processor core count.
    fn core_count(&self) -> usize;
    /// Available disk space, already formatted as decimal gigabytes
    /// without a unit. `None` when the query is unavailable.
    fn available_space(&self) -> Option<String>;
    /// Network host name.
    fn host_name(&self) -> String;
    /// IANA timezone identifier, `None` when unavailable.
    fn timezone(&self) -> Option<String>;
    /// Locale identifier, `None` when unavailable.
    fn locale(&self) -> Option<String>;
    /// Carrier mobile country code, `None` when unavailable.
    fn mobile_country_code(&self) -> Option<String>;
    /// Carrier mobile network code, `None` when unavailable.
    fn mobile_network_code(&self) -> Option<String>;
    /// UI appearance style raw value (0 = unspecified).
    fn interface_style(&self) -> i32;
    /// Device supports any owner authentication (passcode or biometric).
    fn can_authenticate(&self) -> bool;
    /// Device supports biometric authentication specifically.
    fn can_authenticate_biometric(&self) -> bool;
}

/// Format a byte count as decimal gigabytes with one fractional digit and
/// no unit, trimming a trailing `.0` (e.g. `12_300_000_000` -> "12.3",
/// `12_000_000_000` -> "12").
pub fn format_gb(bytes: u64) -> String {
    let gb = bytes as f64 / 1e9;
    let formatted = format!("{gb:.1}");
    match formatted.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => formatted,
    }
}

/// Native provider sampling the host system once at construction.
///
/// Memory, cores, host name, and OS strings come from sysinfo; locale and
/// timezone from the process environment; the vendor identifier is a
/// UUID generated once and persisted under `~/.deviceid/vendor_id`.
/// Display metrics, carrier codes, and biometric capability have no
/// portable source here and report their unavailable values.
pub struct SystemInfo {
    vendor_id: Option<String>,
    host_name: String,
    system_name: String,
    system_version: String,
    platform_version: String,
    memory: u64,
    cores: usize,
    available_space: Option<String>,
    timezone: Option<String>,
    locale: Option<String>,
}

impl SystemInfo {
    /// Sample the host system. All signals are captured here; the trait
    /// methods only return the stored snapshot.
    pub fn new() -> Self {
        let sys = System::new_all();
        let host_name = System::host_name().unwrap_or_default();
        Self {
            vendor_id: persistent_vendor_id(),
            system_name: System::name().unwrap_or_default(),
            system_version: System::os_version().unwrap_or_default(),
            platform_version: System::long_os_version().unwrap_or_default(),
            memory: sys.total_memory(),
            cores: sys.cpus().len(),
            available_space: largest_disk_available(),
            timezone: env_timezone(),
            locale: env_locale(),
            host_name,
        }
    }
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceInfoProvider for SystemInfo {
    fn vendor_id(&self) -> Option<String> {
        self.vendor_id.clone()
    }

    fn device_name(&self) -> String {
        self.host_name.clone()
    }

    fn system_name(&self) -> String {
        self.system_name.clone()
    }

    fn system_version(&self) -> String {
        self.system_version.clone()
    }

    fn platform_version(&self) -> String {
        self.platform_version.clone()
    }

    fn screen_resolution(&self) -> [f64; 2] {
        // No portable display API; headless hosts report zero.
        [0.0, 0.0]
    }

    fn screen_scale(&self) -> f64 {
        1.0
    }

    fn physical_memory(&self) -> u64 {
        self.memory
    }

    fn core_count(&self) -> usize {
        self.cores
    }

    fn available_space(&self) -> Option<String> {
        self.available_space.clone()
    }

    fn host_name(&self) -> String {
        self.host_name.clone()
    }

    fn timezone(&self) -> Option<String> {
        self.timezone.clone()
    }

    fn locale(&self) -> Option<String> {
        self.locale.clone()
    }

    fn mobile_country_code(&self) -> Option<String> {
        None
    }

    fn mobile_network_code(&self) -> Option<String> {
        None
    }

    fn interface_style(&self) -> i32 {
        0
    }

    fn can_authenticate(&self) -> bool {
        false
    }

    fn can_authenticate_biometric(&self) -> bool {
        false
    }
}

/// Available space of the largest attached disk, formatted for the wire.
fn largest_disk_available() -> Option<String> {
    let disks = Disks::new_with_refreshed_list();
    let largest = disks.iter().max_by_key(|disk| disk.total_space())?;
    Some(format_gb(largest.available_space()))
}

/// Timezone from the environment, falling back to /etc/timezone.
fn env_timezone() -> Option<String> {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() {
            return Some(tz);
        }
    }
    let content = fs::read_to_string("/etc/timezone").ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Locale from LC_ALL/LANG, with any codeset suffix stripped
/// ("en_US.UTF-8" -> "en_US").
fn env_locale() -> Option<String> {
    let raw = std::env::var("LC_ALL").or_else(|_| std::env::var("LANG")).ok()?;
    let locale = raw.split('.').next().unwrap_or_default();
    if locale.is_empty() || locale == "C" || locale == "POSIX" {
        None
    } else {
        Some(locale.to_string())
    }
}

/// Vendor identifier generated once and persisted under the data dir so
/// it stays stable across launches.
fn persistent_vendor_id() -> Option<String> {
    let home = dirs::home_dir()?;
    let data_dir = home.join(".deviceid");
    if !data_dir.exists() {
        if let Err(e) = fs::create_dir_all(&data_dir) {
            tracing::warn!("vendor_id_dir_create_failed: {}", e);
            return None;
        }
    }
    read_or_create_vendor_id(&data_dir.join(VENDOR_ID_FILE))
}

fn read_or_create_vendor_id(path: &Path) -> Option<String> {
    if let Ok(existing) = fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    let id = Uuid::new_v4().to_string();
    match fs::write(path, &id) {
        Ok(()) => Some(id),
        Err(e) => {
            tracing::warn!("vendor_id_write_failed: {}", e);
            None
        },
    }
}

/// Deterministic provider for tests.
///
/// `FakeDeviceInfo::unavailable()` reports every optional signal as
/// absent, exercising the collector's fallback paths;
/// `FakeDeviceInfo::sample()` reports a fully populated handset.
#[derive(Debug, Clone)]
pub struct FakeDeviceInfo {
    pub vendor_id: Option<String>,
    pub device_name: String,
    pub system_name: String,
    pub system_version: String,
    pub platform_version: String,
    pub resolution: [f64; 2],
    pub scale: f64,
    pub memory: u64,
    pub cores: usize,
    pub available_space: Option<String>,
    pub host_name: String,
    pub timezone: Option<String>,
    pub locale: Option<String>,
    pub mobile_country_code: Option<String>,
    pub mobile_network_code: Option<String>,
    pub interface_style: i32,
    pub auth: bool,
    pub bio_auth: bool,
}

impl FakeDeviceInfo {
    /// Every optional accessor unavailable.
    pub fn unavailable() -> Self {
        Self {
            vendor_id: None,
            device_name: String::new(),
            system_name: String::new(),
            system_version: String::new(),
            platform_version: String::new(),
            resolution: [0.0, 0.0],
            scale: 0.0,
            memory: 0,
            cores: 0,
            available_space: None,
            host_name: String::new(),
            timezone: None,
            locale: None,
            mobile_country_code: None,
            mobile_network_code: None,
            interface_style: 0,
            auth: false,
            bio_auth: false,
        }
    }

    /// A fully populated handset.
    pub fn sample() -> Self {
        Self {
            vendor_id: Some("550e8400-e29b-41d4-a716-446655440000".to_string()),
            device_name: "test-device".to_string(),
            system_name: "iOS".to_string(),
            system_version: "16.4".to_string(),
            platform_version: "Version 16.4 (Build 20E247)".to_string(),
            resolution: [390.0, 844.0],
            scale: 3.0,
            memory: 6_144_000_000,
            cores: 6,
            available_space: Some("12.3".to_string()),
            host_name: "test-host".to_string(),
            timezone: Some("Pacific/Auckland".to_string()),
            locale: Some("en_NZ".to_string()),
            mobile_country_code: Some("530".to_string()),
            mobile_network_code: Some("24".to_string()),
            interface_style: 1,
            auth: true,
            bio_auth: true,
        }
    }
}

impl DeviceInfoProvider for FakeDeviceInfo {
    fn vendor_id(&self) -> Option<String> {
        self.vendor_id.clone()
    }

    fn device_name(&self) -> String {
        self.device_name.clone()
    }

    fn system_name(&self) -> String {
        self.system_name.clone()
    }

    fn system_version(&self) -> String {
        self.system_version.clone()
    }

    fn platform_version(&self) -> String {
        self.platform_version.clone()
    }

    fn screen_resolution(&self) -> [f64; 2] {
        self.resolution
    }

    fn screen_scale(&self) -> f64 {
        self.scale
    }

    fn physical_memory(&self) -> u64 {
        self.memory
    }

    fn core_count(&self) -> usize {
        self.cores
    }

    fn available_space(&self) -> Option<String> {
        self.available_space.clone()
    }

    fn host_name(&self) -> String {
        self.host_name.clone()
    }

    fn timezone(&self) -> Option<String> {
        self.timezone.clone()
    }

    fn locale(&self) -> Option<String> {
        self.locale.clone()
    }

    fn mobile_country_code(&self) -> Option<String> {
        self.mobile_country_code.clone()
    }

    fn mobile_network_code(&self) -> Option<String> {
        self.mobile_network_code.clone()
    }

    fn interface_style(&self) -> i32 {
        self.interface_style
    }

    fn can_authenticate(&self) -> bool {
        self.auth
    }

    fn can_authenticate_biometric(&self) -> bool {
        self.bio_auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_gb() {
        assert_eq!(format_gb(12_300_000_000), "12.3");
        assert_eq!(format_gb(12_000_000_000), "12");
        assert_eq!(format_gb(0), "0");
        assert_eq!(format_gb(512_000_000), "0.5");
    }

    #[test]
    fn test_read_or_create_vendor_id_is_stable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("vendor_id");

        let first = read_or_create_vendor_id(&path).unwrap();
        let second = read_or_create_vendor_id(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 36);
    }

    #[test]
    fn test_system_info_snapshot_does_not_resample() {
        let info = SystemInfo::new();
        // Trait methods return the captured snapshot verbatim.
        assert_eq!(info.physical_memory(), info.physical_memory());
        assert_eq!(info.host_name(), info.device_name());
    }
}
