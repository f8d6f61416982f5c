//! Identification service response types.

use serde::{Deserialize, Serialize};

/// Result of a successful identify call, immutable once parsed.
///
/// One response per call; responses are never cached or merged across
/// calls. Field names mirror the service's JSON schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentificationResponse {
    /// Identifier of this visit.
    pub visit_id: String,
    /// Identifier of the recognized device.
    pub device_id: String,
    /// Whether the device was already known to the service.
    pub device_found: bool,
    /// Uniqueness score for the submitted fingerprint.
    pub unique: f32,
    /// Operating system family reported by the service.
    pub os: String,
    /// Operating system version reported by the service.
    pub os_version: String,
    /// Server-computed fraud-risk indicator.
    pub threat: i64,
    /// Tampering verdict for the submitted profile.
    pub violation: Violation,
    /// Whether the service blocked this device.
    pub blocked: bool,
    /// First time this device was seen, as a service-formatted timestamp.
    pub first_seen: String,
    /// Most recent time this device was seen.
    pub last_seen: String,
    /// Source IP the service observed.
    pub ip: String,
    /// Echo of the request id sent with the identify call.
    pub request_id: String,
    /// Echo of the opaque tag sent with the identify call.
    pub data: String,
}

/// Tampering verdict nested in an identification response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    /// Whether the profile looks tampered with.
    // Wire key is misspelled server-side; keep it as-is.
    #[serde(rename = "tempered")]
    pub tampered: bool,
    /// Confidence of the tampering verdict, 0.0 to 1.0.
    pub confidence: f32,
}
