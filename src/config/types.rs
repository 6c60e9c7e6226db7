use serde::{Deserialize, Serialize};

use crate::posts::FetchPolicy;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Remote posts API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST collection (e.g., "https://jsonplaceholder.typicode.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Client-side store behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// What a failed update request does to local state.
    #[serde(default)]
    pub update_failure: UpdateFailurePolicy,
    /// How fetch-all responses are merged with concurrent local changes.
    #[serde(default)]
    pub fetch_policy: FetchPolicy,
    /// Capacity of the store's command channel (default: 64).
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

/// Outcome of an update whose request failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFailurePolicy {
    /// Apply the submitted post locally as if the server had accepted it.
    #[default]
    Optimistic,
    /// Leave state untouched and return the error to the caller.
    Reject,
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_command_buffer() -> usize {
    64
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            update_failure: UpdateFailurePolicy::default(),
            fetch_policy: FetchPolicy::default(),
            command_buffer: default_command_buffer(),
        }
    }
}
