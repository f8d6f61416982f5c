//! Profile collection: providers in, one immutable snapshot out.

use chrono::Utc;
use deviceid_types::DeviceProfile;

use crate::provider::DeviceInfoProvider;
use crate::secrets::{SecretStore, TOKEN_ACCOUNT, TOKEN_SERVICE};

/// Fallback for unavailable carrier codes, locale, timezone, and disk
/// size.
const UNAVAILABLE: &str = "0";
/// Fallback for a missing stable vendor identifier.
const NO_VENDOR_ID: &str = "0000";

/// Builds a [`DeviceProfile`] from injected accessors.
///
/// Each accessor is queried exactly once per [`collect`](Self::collect)
/// call; callers keep one snapshot per process lifetime. Collection
/// never fails: every unavailable signal degrades to its documented
/// fallback value.
pub struct ProfileCollector<'a> {
    provider: &'a dyn DeviceInfoProvider,
    store: &'a dyn SecretStore,
}

impl<'a> ProfileCollector<'a> {
    /// Create a collector over the given provider and secret store.
    pub fn new(provider: &'a dyn DeviceInfoProvider, store: &'a dyn SecretStore) -> Self {
        Self { provider, store }
    }

    /// Capture the device snapshot.
    ///
    /// Reads the secret store once (read-only) for a previously saved
    /// token under `("deviceID-token", "multi")`; an absent or
    /// non-UTF-8 value degrades to an empty string.
    pub fn collect(&self) -> DeviceProfile {
        let p = self.provider;

        let vendor_id = p.vendor_id().unwrap_or_else(|| {
            tracing::warn!("vendor_id_unavailable, using fallback");
            NO_VENDOR_ID.to_string()
        });

        DeviceProfile {
            locale_identifier: fallback(p.locale(), "locale"),
            interface_style: p.interface_style(),
            device_name: p.device_name(),
            vendor_id,
            system_name: p.system_name(),
            system_version: p.system_version(),
            platform_version: p.platform_version(),
            resolution: p.screen_resolution(),
            scale: p.screen_scale(),
            memory: p.physical_memory(),
            cores: p.core_count(),
            available_space: fallback(p.available_space(), "available_space"),
            host_name: p.host_name(),
            timezone: fallback(p.timezone(), "timezone"),
            mobile_country_code: fallback(p.mobile_country_code(), "mobile_country_code"),
            mobile_network_code: fallback(p.mobile_network_code(), "mobile_network_code"),
            auth: p.can_authenticate(),
            bio_auth: p.can_authenticate_biometric(),
            saved: self.saved_token(),
            start: Utc::now().timestamp_millis(),
        }
    }

    fn saved_token(&self) -> String {
        match self.store.get(TOKEN_SERVICE, TOKEN_ACCOUNT) {
            Some(bytes) => match String::from_utf8(bytes) {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!("saved_token_not_utf8: {}", e);
                    String::new()
                },
            },
            None => String::new(),
        }
    }
}

fn fallback(value: Option<String>, signal: &str) -> String {
    match value {
        Some(v) => v,
        None => {
            tracing::debug!("{}_unavailable, using fallback", signal);
            UNAVAILABLE.to_string()
        },
    }
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod collector_tests;
