//! The extraction core: raw command output in, health record out.

pub mod corpus;
mod fields;
mod numeric;
pub mod types;

pub use corpus::Corpus;
pub use types::{CommandOutputs, HealthRecord, COMMAND_SET, DEVICE_IP_KEY, UNKNOWN};

/// Extract a best-effort health record from one device's raw command
/// output.
///
/// Pure and stateless: the same input always yields the same record,
/// per-field failures degrade to [`UNKNOWN`] without touching the other
/// fields, and nothing here ever returns an error. A record that is all
/// `"unknown"` is the legitimate result for a device whose output
/// matched no known pattern.
pub fn extract_record(outputs: &CommandOutputs) -> HealthRecord {
    let corpus = Corpus::assemble(outputs);
    let field = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN.to_string());
    HealthRecord {
        address: field(outputs.address().map(str::to_string)),
        hostname: field(fields::HOSTNAME.scan(&corpus)),
        model: field(fields::MODEL.scan(&corpus)),
        os_version: field(fields::OS_VERSION.scan(&corpus)),
        uptime: field(fields::UPTIME.scan(&corpus)),
        cpu_idle_percent: field(numeric::cpu_idle_percent(&corpus)),
        mem_free_percent: field(numeric::mem_free_percent(&corpus)),
        fan: field(fields::FAN.scan(&corpus)),
        temperature: field(fields::TEMPERATURE.scan(&corpus)),
        power_supply: field(fields::power_supply(&corpus)),
    }
}
