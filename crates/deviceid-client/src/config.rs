//! Client configuration.

/// Configuration for the identification client.
///
/// The service exposes two fixed endpoints: the load endpoint exchanges
/// API credentials for a session token, the identify endpoint consumes
/// the device profile. Defaults point at the production service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the authenticate ("load") endpoint.
    pub auth_url: String,
    /// Full URL of the identify endpoint.
    pub identify_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_url: "https://freelancecloud.ddns.net:3001/load".to_string(),
            identify_url: "https://freelancecloud.ddns.net/ios".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Defaults with `DEVICEID_AUTH_URL` / `DEVICEID_IDENTIFY_URL`
    /// overrides applied when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DEVICEID_AUTH_URL") {
            config.auth_url = url;
        }
        if let Ok(url) = std::env::var("DEVICEID_IDENTIFY_URL") {
            config.identify_url = url;
        }
        config
    }

    /// Both endpoints derived from one base URL (`{base}/load` and
    /// `{base}/ios`). Used against local or staging deployments.
    pub fn for_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            auth_url: format!("{base}/load"),
            identify_url: format!("{base}/ios"),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_production() {
        let config = ClientConfig::default();
        assert!(config.auth_url.ends_with("/load"));
        assert!(config.identify_url.ends_with("/ios"));
    }

    #[test]
    fn test_for_base_url_derives_both_endpoints() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.auth_url, "http://127.0.0.1:8080/load");
        assert_eq!(config.identify_url, "http://127.0.0.1:8080/ios");
    }
}
