use crate::core::{LedgerError, Result};
use std::time::Duration;

/// Largest batch the hosted table accepts in one write request.
pub const MAX_BATCH_SIZE: usize = 10;

/// Remote table configuration
///
/// Identifies the hosted table and how to talk to it.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// API root, without the version segment
    pub endpoint_url: String,

    /// Bearer token
    pub api_key: String,

    /// Base (workspace) identifier
    pub base_id: String,

    /// Table name inside the base
    pub table_name: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Records per write request
    pub max_batch_size: usize,
}

impl Default for RemoteConfig {
    /// Hosted endpoint and table with no credentials; set `api_key` and
    /// `base_id` before use.
    fn default() -> Self {
        Self::new("", "")
    }
}

impl RemoteConfig {
    /// Create a configuration for the given base with default settings
    pub fn new(api_key: &str, base_id: &str) -> Self {
        Self {
            endpoint_url: "https://api.airtable.com".to_string(),
            api_key: api_key.to_string(),
            base_id: base_id.to_string(),
            table_name: "Table 1".to_string(),
            request_timeout: Duration::from_secs(30),
            max_batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Set the bearer token
    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = key.to_string();
        self
    }

    /// Set the base identifier
    pub fn base_id(mut self, base: &str) -> Self {
        self.base_id = base.to_string();
        self
    }

    /// Set the API root
    pub fn endpoint_url(mut self, url: &str) -> Self {
        self.endpoint_url = url.to_string();
        self
    }

    /// Set the table name
    pub fn table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set records per write request
    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Read the configuration from `BIDBOOK_*` environment variables
    ///
    /// `BIDBOOK_API_KEY` and `BIDBOOK_BASE_ID` are required;
    /// `BIDBOOK_TABLE`, `BIDBOOK_ENDPOINT` and `BIDBOOK_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| LedgerError::Config(format!("{} is not set", key)))
        };

        let mut config = Self::new(&required("BIDBOOK_API_KEY")?, &required("BIDBOOK_BASE_ID")?);

        if let Some(table) = lookup("BIDBOOK_TABLE") {
            config = config.table_name(&table);
        }
        if let Some(endpoint) = lookup("BIDBOOK_ENDPOINT") {
            config = config.endpoint_url(&endpoint);
        }
        if let Some(secs) = lookup("BIDBOOK_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                LedgerError::Config(format!("BIDBOOK_TIMEOUT_SECS is not a number: '{}'", secs))
            })?;
            config = config.request_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Human readable description with the key masked
    pub fn describe(&self) -> String {
        format!(
            "{}/v0/{}/{} (key: ***)",
            self.endpoint_url.trim_end_matches('/'),
            self.base_id,
            self.table_name
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(LedgerError::Config("api_key cannot be empty".to_string()));
        }

        if self.base_id.is_empty() {
            return Err(LedgerError::Config("base_id cannot be empty".to_string()));
        }

        if self.table_name.is_empty() {
            return Err(LedgerError::Config("table_name cannot be empty".to_string()));
        }

        if self.max_batch_size == 0 || self.max_batch_size > MAX_BATCH_SIZE {
            return Err(LedgerError::Config(format!(
                "max_batch_size must be between 1 and {}",
                MAX_BATCH_SIZE
            )));
        }

        reqwest::Url::parse(&self.endpoint_url).map_err(|e| {
            LedgerError::Config(format!("invalid endpoint '{}': {}", self.endpoint_url, e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RemoteConfig::new("key", "app123");
        assert_eq!(config.endpoint_url, "https://api.airtable.com");
        assert_eq!(config.table_name, "Table 1");
        assert_eq!(config.max_batch_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_needs_credentials() {
        let config = RemoteConfig::default();
        assert_eq!(config.endpoint_url, "https://api.airtable.com");
        assert_eq!(config.table_name, "Table 1");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(matches!(config.validate(), Err(LedgerError::Config(_))));

        let config = config.api_key("key").base_id("app123");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_id, "app123");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RemoteConfig::new("key", "app123")
            .endpoint_url("http://127.0.0.1:9000")
            .table_name("Lots")
            .request_timeout(Duration::from_secs(5))
            .max_batch_size(4);

        assert_eq!(config.endpoint_url, "http://127.0.0.1:9000");
        assert_eq!(config.table_name, "Lots");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_batch_size, 4);
    }

    #[test]
    fn test_validate() {
        assert!(RemoteConfig::new("", "app").validate().is_err());
        assert!(RemoteConfig::new("key", "").validate().is_err());
        assert!(RemoteConfig::new("key", "app").table_name("").validate().is_err());
        assert!(RemoteConfig::new("key", "app").max_batch_size(0).validate().is_err());
        assert!(RemoteConfig::new("key", "app").max_batch_size(11).validate().is_err());
        assert!(RemoteConfig::new("key", "app").endpoint_url("not a url").validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = RemoteConfig::from_lookup(lookup(&[
            ("BIDBOOK_API_KEY", "secret"),
            ("BIDBOOK_BASE_ID", "app1"),
            ("BIDBOOK_TABLE", "Silent Auction"),
            ("BIDBOOK_TIMEOUT_SECS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.table_name, "Silent Auction");
        assert_eq!(config.request_timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_from_lookup_requires_key_and_base() {
        let missing = RemoteConfig::from_lookup(lookup(&[("BIDBOOK_BASE_ID", "app1")]));
        assert!(matches!(missing, Err(LedgerError::Config(_))));

        let bad_timeout = RemoteConfig::from_lookup(lookup(&[
            ("BIDBOOK_API_KEY", "k"),
            ("BIDBOOK_BASE_ID", "app1"),
            ("BIDBOOK_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(bad_timeout, Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_describe_hides_key() {
        let config = RemoteConfig::new("secret123", "app1");
        let text = config.describe();
        assert!(!text.contains("secret123"));
        assert!(text.contains("***"));
        assert!(text.contains("app1/Table 1"));
    }
}
