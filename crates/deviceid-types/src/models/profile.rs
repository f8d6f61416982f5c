//! Device profile snapshot and request payloads.
//!
//! `DeviceProfile` is captured exactly once per process and never
//! re-sampled. Per-call state (session token, request id, tag) lives on
//! `IdentifyRequest`, built fresh for every identify call so concurrent
//! calls never share mutable fields.

use serde::{Deserialize, Serialize};

/// Credentials payload for the authenticate ("load") endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthRequest {
    /// API key issued to the integrating application.
    pub key: String,
    /// Shared secret paired with the API key.
    pub secret: String,
}

impl AuthRequest {
    /// Create a new credentials payload.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { key: key.into(), secret: secret.into() }
    }
}

/// Immutable snapshot of local device and environment attributes.
///
/// Every field is captured once at collection time. Accessors that are
/// unavailable on the running platform contribute documented fallback
/// values instead of failing: `"0"` for carrier codes, locale, timezone
/// and disk size, `"0000"` for a missing stable vendor identifier, and
/// an empty string for an unset persisted token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    /// BCP 47 locale identifier (e.g. "en_NZ"), `"0"` when unavailable.
    pub locale_identifier: String,
    /// UI appearance style raw value (0 = unspecified).
    pub interface_style: i32,
    /// User-visible device name.
    pub device_name: String,
    /// Stable per-install identifier, `"0000"` when unavailable.
    #[serde(rename = "vendorID")]
    pub vendor_id: String,
    /// Operating system family name.
    pub system_name: String,
    /// Operating system version.
    pub system_version: String,
    /// Full platform version string.
    #[serde(rename = "macOSVersion")]
    pub platform_version: String,
    /// Screen dimensions in points, `[width, height]`.
    pub resolution: [f64; 2],
    /// Pixel density multiplier.
    pub scale: f64,
    /// Physical memory in bytes.
    pub memory: u64,
    /// Active processor core count.
    pub cores: usize,
    /// Available disk space in decimal gigabytes without a unit
    /// (e.g. "12.3"), `"0"` when the query is unavailable.
    pub available_space: String,
    /// Network host name.
    pub host_name: String,
    /// IANA timezone identifier, `"0"` when unavailable.
    pub timezone: String,
    /// Carrier mobile country code, `"0"` when unavailable.
    pub mobile_country_code: String,
    /// Carrier mobile network code, `"0"` when unavailable.
    pub mobile_network_code: String,
    /// Device supports any owner authentication (passcode or biometric).
    pub auth: bool,
    /// Device supports biometric authentication specifically.
    pub bio_auth: bool,
    /// Token previously persisted to the secret store, `""` when none.
    pub saved: String,
    /// Snapshot creation time, Unix epoch milliseconds.
    pub start: i64,
}

/// Request body for the identify endpoint, built fresh per call.
///
/// Flattens the device profile and carries the per-call fields the
/// identification service reads alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentifyRequest {
    /// The immutable device snapshot.
    #[serde(flatten)]
    pub profile: DeviceProfile,
    /// Current session token, `""` before a successful authenticate.
    pub token: String,
    /// Caller-supplied request correlation id, echoed by the service.
    pub request_id: String,
    /// Caller-supplied opaque tag, echoed by the service.
    pub data: String,
}

impl IdentifyRequest {
    /// Assemble an identify payload from a profile snapshot and the
    /// per-call fields. Absent tag/request id default to empty strings.
    pub fn new(
        profile: DeviceProfile,
        token: impl Into<String>,
        tag: Option<&str>,
        request_id: Option<&str>,
    ) -> Self {
        Self {
            profile,
            token: token.into(),
            request_id: request_id.unwrap_or_default().to_string(),
            data: tag.unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> DeviceProfile {
        DeviceProfile {
            locale_identifier: "en_NZ".to_string(),
            interface_style: 0,
            device_name: "test-device".to_string(),
            vendor_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            system_name: "iOS".to_string(),
            system_version: "16.4".to_string(),
            platform_version: "Version 16.4 (Build 20E247)".to_string(),
            resolution: [390.0, 844.0],
            scale: 3.0,
            memory: 6_144_000_000,
            cores: 6,
            available_space: "12.3".to_string(),
            host_name: "test-host".to_string(),
            timezone: "Pacific/Auckland".to_string(),
            mobile_country_code: "530".to_string(),
            mobile_network_code: "24".to_string(),
            auth: true,
            bio_auth: true,
            saved: String::new(),
            start: 1_686_614_400_000,
        }
    }

    #[test]
    fn test_profile_wire_keys() {
        let json = serde_json::to_value(sample_profile()).unwrap();
        let obj = json.as_object().unwrap();

        // Keys the service matches byte-for-byte.
        for key in [
            "localeIdentifier",
            "interfaceStyle",
            "deviceName",
            "vendorID",
            "systemName",
            "systemVersion",
            "macOSVersion",
            "resolution",
            "scale",
            "memory",
            "cores",
            "availableSpace",
            "hostName",
            "timezone",
            "mobileCountryCode",
            "mobileNetworkCode",
            "auth",
            "bioAuth",
            "saved",
            "start",
        ] {
            assert!(obj.contains_key(key), "missing wire key {key}");
        }
        assert!(!obj.contains_key("vendorId"));
        assert!(!obj.contains_key("platformVersion"));
    }

    #[test]
    fn test_profile_roundtrip() {
        let profile = sample_profile();
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: DeviceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, parsed);
    }

    #[test]
    fn test_identify_request_flattens_profile() {
        let request = IdentifyRequest::new(
            sample_profile(),
            "tok123",
            Some("checkout"),
            Some("req-42"),
        );
        let json = serde_json::to_value(&request).unwrap();
        let obj = json.as_object().unwrap();

        // Profile keys sit at the top level next to the per-call fields.
        assert_eq!(obj["vendorID"], "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(obj["token"], "tok123");
        assert_eq!(obj["request_id"], "req-42");
        assert_eq!(obj["data"], "checkout");
    }

    #[test]
    fn test_identify_request_defaults_empty() {
        let request = IdentifyRequest::new(sample_profile(), "", None, None);
        assert_eq!(request.token, "");
        assert_eq!(request.request_id, "");
        assert_eq!(request.data, "");
    }

    #[test]
    fn test_auth_request_wire_format() {
        let auth = AuthRequest::new("api-key", "api-secret");
        let json = serde_json::to_value(&auth).unwrap();
        assert_eq!(json, serde_json::json!({"key": "api-key", "secret": "api-secret"}));
    }
}
