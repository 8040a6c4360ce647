//! Per-device health collection over SSH.
//!
//! Opens one SSH connection per device, executes the fixed maintenance
//! command set, and hands the raw output to the extraction core. Every
//! failure mode degrades rather than aborts: a failed command
//! contributes no output, and a device that cannot be reached at all
//! still produces a record with its address and all fields unknown.

use std::io::Read;
use std::net::TcpStream;

use tracing::{debug, warn};

use netvitals_core::config::DeviceConfig;
use netvitals_core::errors::CollectError;
use netvitals_core::health::{extract_record, CommandOutputs, HealthRecord, COMMAND_SET};

/// Run diagnostic commands on a device.
///
/// Implementations are synchronous; the agent wraps collection in
/// `tokio::task::spawn_blocking` when fanning out.
pub trait CommandRunner: Send {
    /// Execute one command and return its raw output.
    fn run(&mut self, command: &str) -> Result<String, CollectError>;
}

/// Collect one device's health record using an established runner.
///
/// Commands that fail or return nothing are recorded as absent output —
/// the extraction core treats that the same as a no-match.
pub fn collect_device<R: CommandRunner>(runner: &mut R, device: &DeviceConfig) -> HealthRecord {
    let mut outputs = CommandOutputs::new();
    outputs.set_address(&device.host);

    for command in COMMAND_SET {
        match runner.run(command) {
            Ok(text) if !text.trim().is_empty() => outputs.push(command, Some(text)),
            Ok(_) => {
                debug!(device = %device.name, command, "command returned no output");
                outputs.push(command, None);
            }
            Err(err) => {
                warn!(device = %device.name, command, %err, "command failed, output skipped");
                outputs.push(command, None);
            }
        }
    }

    extract_record(&outputs)
}

/// Connect to a device and collect its record. Connection or
/// authentication failures yield an all-unknown record with the address
/// preserved.
pub fn collect_host(device: &DeviceConfig) -> HealthRecord {
    match SshRunner::connect(device) {
        Ok(mut runner) => collect_device(&mut runner, device),
        Err(err) => {
            warn!(device = %device.name, host = %device.host, %err, "collection failed");
            HealthRecord::unknown(&device.host)
        }
    }
}

// ── SSH runner ──────────────────────────────────────────────────────

/// Executes commands on a remote device via SSH exec channels over one
/// persistent session.
pub struct SshRunner {
    session: ssh2::Session,
}

// ssh2::Session contains raw pointers but is safe to send between
// threads when access is serialized (each runner is owned by a single
// collection task).
unsafe impl Send for SshRunner {}

impl SshRunner {
    /// Open and authenticate a new SSH connection to the device.
    pub fn connect(device: &DeviceConfig) -> Result<Self, CollectError> {
        let addr = format!("{}:{}", device.host, device.port);

        let tcp = TcpStream::connect(&addr)
            .map_err(|err| CollectError::ConnectionFailed(format!("TCP connect to {addr}: {err}")))?;

        let mut session = ssh2::Session::new()
            .map_err(|err| CollectError::ConnectionFailed(format!("session init: {err}")))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|err| CollectError::ConnectionFailed(format!("handshake: {err}")))?;
        session.set_blocking(true);

        match device.auth_method.as_str() {
            "key" => {
                let key_path = device.key_path.as_deref().unwrap_or("~/.ssh/id_rsa");
                let expanded = shellexpand::tilde(key_path);
                session
                    .userauth_pubkey_file(
                        &device.username,
                        None,
                        std::path::Path::new(expanded.as_ref()),
                        None,
                    )
                    .map_err(|err| CollectError::AuthFailed(format!("key auth: {err}")))?;
            }
            "password" => {
                let password = device.password.as_deref().unwrap_or("");
                session
                    .userauth_password(&device.username, password)
                    .map_err(|err| CollectError::AuthFailed(format!("password auth: {err}")))?;
            }
            "agent" => {
                session
                    .userauth_agent(&device.username)
                    .map_err(|err| CollectError::AuthFailed(format!("agent auth: {err}")))?;
            }
            other => return Err(CollectError::UnknownAuthMethod(other.to_string())),
        }

        if !session.authenticated() {
            return Err(CollectError::AuthFailed("not authenticated".to_string()));
        }

        debug!(host = %device.host, user = %device.username, "SSH session established");
        Ok(Self { session })
    }
}

impl CommandRunner for SshRunner {
    fn run(&mut self, command: &str) -> Result<String, CollectError> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(|err| CollectError::CommandFailed(format!("channel open: {err}")))?;

        channel
            .exec(command)
            .map_err(|err| CollectError::CommandFailed(format!("exec: {err}")))?;

        let mut output = String::new();
        channel
            .read_to_string(&mut output)
            .map_err(|err| CollectError::CommandFailed(format!("read: {err}")))?;

        channel.wait_close().ok();

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netvitals_core::health::UNKNOWN;
    use std::collections::HashMap;

    /// Canned-output runner standing in for a live device.
    struct MockRunner {
        responses: HashMap<&'static str, &'static str>,
        calls: Vec<String>,
    }

    impl MockRunner {
        fn new(responses: HashMap<&'static str, &'static str>) -> Self {
            Self {
                responses,
                calls: Vec::new(),
            }
        }
    }

    impl CommandRunner for MockRunner {
        fn run(&mut self, command: &str) -> Result<String, CollectError> {
            self.calls.push(command.to_string());
            match self.responses.get(command) {
                Some(output) => Ok((*output).to_string()),
                None => Err(CollectError::CommandFailed("no response".to_string())),
            }
        }
    }

    fn device(host: &str) -> DeviceConfig {
        DeviceConfig {
            name: "sw-test".into(),
            host: host.into(),
            username: "admin".into(),
            ..DeviceConfig::default()
        }
    }

    #[test]
    fn collect_device_runs_full_command_set_in_order() {
        let mut runner = MockRunner::new(HashMap::new());
        let _ = collect_device(&mut runner, &device("10.0.0.1"));
        assert_eq!(runner.calls, COMMAND_SET);
    }

    #[test]
    fn collect_device_extracts_from_responses() {
        let mut responses = HashMap::new();
        responses.insert(
            "show run | inc hostname",
            "hostname SW-TEST-1\r\n",
        );
        responses.insert(
            "show processes cpu",
            "CPU utilization for five seconds: 25%/2%; one minute: 20%; five minutes: 18%\r\n",
        );
        let mut runner = MockRunner::new(responses);
        let record = collect_device(&mut runner, &device("10.0.0.1"));
        assert_eq!(record.address, "10.0.0.1");
        assert_eq!(record.hostname, "SW-TEST-1");
        assert_eq!(record.cpu_idle_percent, "75");
        // Commands without responses degrade to unknown fields.
        assert_eq!(record.fan, UNKNOWN);
        assert_eq!(record.power_supply, UNKNOWN);
    }

    #[test]
    fn collect_device_tolerates_all_commands_failing() {
        let mut runner = MockRunner::new(HashMap::new());
        let record = collect_device(&mut runner, &device("10.9.9.9"));
        assert_eq!(record, HealthRecord::unknown("10.9.9.9"));
    }

    #[test]
    fn collect_host_unreachable_device_degrades_to_unknown_record() {
        let mut cfg = device("127.0.0.1");
        cfg.port = 1; // nothing listens here
        let record = collect_host(&cfg);
        assert_eq!(record, HealthRecord::unknown("127.0.0.1"));
    }
}
