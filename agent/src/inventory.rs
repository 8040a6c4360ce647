//! Device inventory loading and filtering.
//!
//! The inventory is a YAML file with a `devices` list; see
//! [`DeviceConfig`] for the per-device fields. Credentials may use
//! `${VAR}` environment placeholders, and key paths may start with `~` —
//! both are expanded at load time so the rest of the agent only ever
//! sees resolved values.

use std::path::Path;

use serde::Deserialize;

use netvitals_core::config::DeviceConfig;
use netvitals_core::errors::InventoryError;

#[derive(Debug, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    devices: Vec<DeviceConfig>,
}

/// Load and expand the device inventory.
pub fn load(path: &Path) -> Result<Vec<DeviceConfig>, InventoryError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(InventoryError::NotFound(path.display().to_string()))
        }
        Err(err) => return Err(InventoryError::Io(err)),
    };

    let file: InventoryFile =
        serde_yaml::from_str(&text).map_err(|err| InventoryError::Parse(err.to_string()))?;
    if file.devices.is_empty() {
        return Err(InventoryError::Empty);
    }

    Ok(file.devices.into_iter().map(expand_credentials).collect())
}

/// Keep only devices matching the wanted site/role tags. Empty filters
/// match everything.
pub fn filter(devices: Vec<DeviceConfig>, site: &str, role: &str) -> Vec<DeviceConfig> {
    devices
        .into_iter()
        .filter(|device| device.matches_site(site) && device.matches_role(role))
        .collect()
}

/// Expand `${VAR}` placeholders in credentials and `~` in key paths.
/// Unresolvable placeholders are left as-is rather than failing the
/// whole inventory.
fn expand_credentials(mut device: DeviceConfig) -> DeviceConfig {
    device.password = device
        .password
        .map(|password| expand_env(&password).unwrap_or(password));
    device.key_path = device.key_path.map(|key_path| {
        let expanded = expand_env(&key_path).unwrap_or(key_path);
        shellexpand::tilde(&expanded).into_owned()
    });
    device
}

fn expand_env(value: &str) -> Option<String> {
    shellexpand::env(value).ok().map(|cow| cow.into_owned())
}
