//! Health data types shared between the core and the agent.

use serde::{Deserialize, Serialize};

/// Sentinel value for a field that could not be extracted.
pub const UNKNOWN: &str = "unknown";

/// Reserved entry key carrying the device address alongside the command
/// output. It is metadata, never corpus text.
pub const DEVICE_IP_KEY: &str = "device_ip";

/// The fixed, ordered command set a maintenance run requests from each
/// device. Corpus assembly preserves this order; the extraction rules
/// only care that the matching lines appear somewhere in the corpus.
pub const COMMAND_SET: [&str; 6] = [
    "show hardware",
    "show env all",
    "show env",
    "show processes cpu",
    "show processes mem",
    "show run | inc hostname",
];

/// Raw per-device command output, in execution order.
///
/// One instance per device per run. Commands that produced no output are
/// recorded as `None` — absent output is valid input, not an error. The
/// reserved [`DEVICE_IP_KEY`] entry is routed to the address slot instead
/// of the output list, so it can never leak into line scanning.
#[derive(Debug, Clone, Default)]
pub struct CommandOutputs {
    address: Option<String>,
    outputs: Vec<(String, Option<String>)>,
}

impl CommandOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one command's output. `DEVICE_IP_KEY` entries set the
    /// address instead of contributing corpus text.
    pub fn push(&mut self, command: impl Into<String>, output: Option<String>) {
        let command = command.into();
        if command == DEVICE_IP_KEY {
            self.address = output;
        } else {
            self.outputs.push((command, output));
        }
    }

    /// Build from an ordered (command, output) list, honoring the
    /// reserved address entry.
    pub fn from_pairs(pairs: Vec<(String, Option<String>)>) -> Self {
        let mut outputs = Self::new();
        for (command, output) in pairs {
            outputs.push(command, output);
        }
        outputs
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = Some(address.into());
    }

    /// The externally resolved device address, if present.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Raw text blocks in execution order (reserved entry excluded).
    pub fn blocks(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.outputs
            .iter()
            .map(|(command, output)| (command.as_str(), output.as_deref()))
    }
}

/// Normalized health record for one device — the ten-column output row.
///
/// Every field is either an extracted value or the literal `"unknown"`;
/// numeric fields are stored as their decimal string form for downstream
/// tabular consumption. Fields use `camelCase` serialization to match
/// the JSON convention used across the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub address: String,
    pub hostname: String,
    pub model: String,
    pub os_version: String,
    pub uptime: String,
    pub cpu_idle_percent: String,
    pub mem_free_percent: String,
    pub fan: String,
    pub temperature: String,
    pub power_supply: String,
}

impl HealthRecord {
    /// Report column headers, in output order.
    pub const COLUMNS: [&'static str; 10] = [
        "address",
        "hostname",
        "model",
        "os_version",
        "uptime",
        "cpu_idle_percent",
        "mem_free_percent",
        "fan",
        "temperature",
        "power_supply",
    ];

    /// A record for a device that produced no usable output: the address
    /// is preserved, every other field is the sentinel.
    pub fn unknown(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            hostname: UNKNOWN.to_string(),
            model: UNKNOWN.to_string(),
            os_version: UNKNOWN.to_string(),
            uptime: UNKNOWN.to_string(),
            cpu_idle_percent: UNKNOWN.to_string(),
            mem_free_percent: UNKNOWN.to_string(),
            fan: UNKNOWN.to_string(),
            temperature: UNKNOWN.to_string(),
            power_supply: UNKNOWN.to_string(),
        }
    }

    /// Field values in [`Self::COLUMNS`] order.
    pub fn values(&self) -> [&str; 10] {
        [
            &self.address,
            &self.hostname,
            &self.model,
            &self.os_version,
            &self.uptime,
            &self.cpu_idle_percent,
            &self.mem_free_percent,
            &self.fan,
            &self.temperature,
            &self.power_supply,
        ]
    }
}
