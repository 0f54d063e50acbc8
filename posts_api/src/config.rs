use std::net::SocketAddr;
use std::time::Duration;

use redact::Secret;
use serde::Deserialize;

/// Service configuration, read from raw environment variables
/// (`SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY`, ...).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub supabase_url: String,

    /// Privileged key; bypasses row level security.
    pub supabase_service_role_key: Secret<String>,

    #[serde(default = "default_posts_table")]
    pub posts_table: String,

    #[serde(default = "default_store_timeout_seconds")]
    pub store_timeout_seconds: u64,

    /// Only used when serving locally in debug builds.
    #[serde(default = "default_local_addr")]
    pub local_addr: SocketAddr,
}

fn default_posts_table() -> String {
    "posts".to_string()
}

const fn default_store_timeout_seconds() -> u64 {
    10
}

fn default_local_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3030))
}

impl Config {
    pub const fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }
}
