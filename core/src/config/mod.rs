//! Device inventory configuration types.
//!
//! One [`DeviceConfig`] per managed switch. The agent loads a list of
//! these from the inventory file and hands each one to its collector;
//! the core never reads credentials itself.

use serde::{Deserialize, Serialize};

/// Connection and classification settings for one network device.
///
/// - `port`: defaults to 22.
/// - `auth_method`: `"password"`, `"key"`, or `"agent"` (defaults to
///   `"password"`).
/// - `platform`: software train hint, informational only — field
///   extraction is driven by the output text, not by this value.
/// - `site`/`role`: free-form tags used to narrow a maintenance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default = "default_auth_method")]
    pub auth_method: String,
    pub password: Option<String>,
    pub key_path: Option<String>,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub role: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            host: String::new(),
            port: default_port(),
            username: String::new(),
            auth_method: default_auth_method(),
            password: None,
            key_path: None,
            platform: default_platform(),
            vendor: String::new(),
            site: String::new(),
            role: String::new(),
        }
    }
}

impl DeviceConfig {
    /// Case-insensitive tag match; an empty wanted value matches everything.
    pub fn matches_site(&self, site: &str) -> bool {
        site.is_empty() || self.site.eq_ignore_ascii_case(site)
    }

    /// Case-insensitive tag match; an empty wanted value matches everything.
    pub fn matches_role(&self, role: &str) -> bool {
        role.is_empty() || self.role.eq_ignore_ascii_case(role)
    }
}

// --- Default value functions ---

fn default_port() -> u16 {
    22
}

fn default_auth_method() -> String {
    "password".to_string()
}

fn default_platform() -> String {
    "cisco_ios".to_string()
}
