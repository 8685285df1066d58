//! Single-shot command execution against one device.

use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};

use crate::device::DeviceDescriptor;
use crate::driver::{DEFAULT_READ_TIMEOUT, Driver, GenericDriver};
use crate::error::Result;
use crate::interface::{INTERFACE_LISTING_COMMAND, augment_records};
use crate::request::CommandRequest;
use crate::structured::{CommandOutput, TemplateIndex, structure_output};

/// Opens sessions to devices.
pub trait Connector {
    type Session: Driver;

    /// Connect and log in; the returned session is open.
    fn connect(
        &self,
        device: DeviceDescriptor,
        read_timeout: Duration,
    ) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// Connector producing SSH sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SshConnector;

impl Connector for SshConnector {
    type Session = GenericDriver;

    async fn connect(&self, device: DeviceDescriptor, read_timeout: Duration) -> Result<GenericDriver> {
        let mut driver = device.into_driver(read_timeout)?;
        driver.open().await?;
        Ok(driver)
    }
}

/// Settings shared by every request a runner handles.
#[derive(Debug)]
pub struct RunnerOptions {
    /// How long one command may take to return to the prompt.
    pub read_timeout: Duration,
    /// Template index for structured output.
    pub templates: TemplateIndex,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            templates: TemplateIndex::builtin(),
        }
    }
}

/// Run one command request.
///
/// Once a session is open it is closed before returning, whatever the
/// outcome. A failing close is logged and does not change the result.
pub async fn run_command<C: Connector>(
    connector: &C,
    request: CommandRequest,
    options: &RunnerOptions,
) -> Result<CommandOutput> {
    let CommandRequest {
        device,
        command,
        use_textfsm,
    } = request;

    info!("Connecting to {} and running: {}", device.host, command);
    let mut session = connector.connect(device, options.read_timeout).await?;

    let outcome = execute(&mut session, &command, use_textfsm, options).await;

    if let Err(e) = session.close().await {
        warn!("failed to close session: {}", e);
    }
    outcome
}

async fn execute<D: Driver>(
    session: &mut D,
    command: &str,
    use_textfsm: bool,
    options: &RunnerOptions,
) -> Result<CommandOutput> {
    let response = session
        .send_command_timeout(command, options.read_timeout)
        .await?;
    if let Some(pattern) = &response.failure {
        warn!("output of {:?} contains failure pattern {:?}", command, pattern);
    }
    debug!("{:?} completed in {:?}", command, response.elapsed);

    let mut output = if use_textfsm {
        structure_output(
            &options.templates,
            session.platform_name(),
            command,
            response.into_output(),
        )
    } else {
        CommandOutput::Text(response.into_output())
    };

    if command == INTERFACE_LISTING_COMMAND {
        if let Some(records) = output.records_mut() {
            augment_records(records)?;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use serde_json::json;

    use crate::driver::Response;
    use crate::error::{ChannelError, ErrorKind, TransportError};
    use crate::structured::INDEX_FILE;

    const SHOW_INTERFACE: &str = "\
GigabitEthernet0/1 is up, line protocol is up
Vlan10 is administratively down, line protocol is down
";

    #[derive(Default)]
    struct Tracker {
        closed: AtomicBool,
        commands: AtomicUsize,
    }

    struct FakeDriver {
        output: String,
        fail_send: bool,
        tracker: Arc<Tracker>,
    }

    impl Driver for FakeDriver {
        async fn open(&mut self) -> Result<()> {
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            self.tracker.closed.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn send_command_timeout(&mut self, command: &str, _timeout: Duration) -> Result<Response> {
            self.tracker.commands.fetch_add(1, Ordering::SeqCst);
            if self.fail_send {
                return Err(ChannelError::PatternTimeout(Duration::from_secs(1)).into());
            }
            Ok(Response::new(command, self.output.clone(), Duration::ZERO))
        }

        async fn acquire_privilege(&mut self, _privilege: &str) -> Result<()> {
            Ok(())
        }

        fn is_open(&self) -> bool {
            !self.tracker.closed.load(Ordering::SeqCst)
        }

        fn timeout(&self) -> Duration {
            DEFAULT_READ_TIMEOUT
        }

        fn platform_name(&self) -> &str {
            "cisco_ios"
        }

        fn current_privilege(&self) -> Option<&str> {
            Some("privilege_exec")
        }
    }

    struct FakeConnector {
        output: String,
        fail_connect: bool,
        fail_send: bool,
        tracker: Arc<Tracker>,
    }

    impl FakeConnector {
        fn new(output: &str) -> Self {
            Self {
                output: output.to_string(),
                fail_connect: false,
                fail_send: false,
                tracker: Arc::default(),
            }
        }
    }

    impl Connector for FakeConnector {
        type Session = FakeDriver;

        async fn connect(&self, _device: DeviceDescriptor, _read_timeout: Duration) -> Result<FakeDriver> {
            if self.fail_connect {
                return Err(TransportError::AuthenticationFailed {
                    user: "netops".into(),
                }
                .into());
            }
            Ok(FakeDriver {
                output: self.output.clone(),
                fail_send: self.fail_send,
                tracker: self.tracker.clone(),
            })
        }
    }

    fn request(command: &str, use_textfsm: bool) -> CommandRequest {
        let raw = json!({
            "device": {"device_type": "cisco_ios", "host": "10.0.0.1", "username": "netops", "password": "x"},
            "command": command,
            "use_textfsm": use_textfsm,
        });
        CommandRequest::from_json(&raw.to_string()).unwrap()
    }

    fn options_with_templates(dir: &tempfile::TempDir, template: &str) -> RunnerOptions {
        fs::write(
            dir.path().join(INDEX_FILE),
            "Template, Hostname, Platform, Command\n\
             cisco_ios_show_interface.textfsm, .*, cisco_ios, sh[[ow]] int[[erface]]\n",
        )
        .unwrap();
        fs::write(dir.path().join("cisco_ios_show_interface.textfsm"), template).unwrap();
        RunnerOptions {
            templates: TemplateIndex::load(dir.path()).unwrap(),
            ..RunnerOptions::default()
        }
    }

    const INTERFACE_TEMPLATE: &str = r#"Value INTERFACE (\S+)
Value LINK_STATUS (up|down|administratively down)

Start
  ^${INTERFACE} is ${LINK_STATUS}, -> Record
"#;

    #[tokio::test]
    async fn test_raw_output_without_textfsm() {
        let connector = FakeConnector::new(SHOW_INTERFACE);
        let output = run_command(&connector, request("show interface", false), &RunnerOptions::default())
            .await
            .unwrap();
        assert_eq!(output, CommandOutput::Text(SHOW_INTERFACE.to_string()));
        assert!(connector.tracker.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_raw_output_when_no_template_matches() {
        let connector = FakeConnector::new("Cisco IOS Software");
        let output = run_command(&connector, request("show version", true), &RunnerOptions::default())
            .await
            .unwrap();
        assert_eq!(output, CommandOutput::Text("Cisco IOS Software".into()));
    }

    #[tokio::test]
    async fn test_default_options_structure_show_interface() {
        let device_output = "\
GigabitEthernet0/1 is up, line protocol is up 
  Hardware is iGbE, address is 5254.0012.3456 (bia 5254.0012.3456)
  MTU 1500 bytes, BW 1000000 Kbit/sec, DLY 10 usec, 
Vlan10 is administratively down, line protocol is down 
  Hardware is EtherSVI, address is 5254.0012.3400 (bia 5254.0012.3400)
  Internet address is 10.10.0.1/24
";
        let connector = FakeConnector::new(device_output);

        let output = run_command(&connector, request("show interface", true), &RunnerOptions::default())
            .await
            .unwrap();
        let records = match output {
            CommandOutput::Records(records) => records,
            other => panic!("expected records, got {:?}", other),
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["interface"], "GigabitEthernet0/1");
        assert_eq!(records[0]["interface_short"], "Gi0/1");
        assert_eq!(records[0]["mtu"], "1500");
        assert_eq!(records[1]["interface_short"], "Vl10");
        assert_eq!(records[1]["ip_address"], "10.10.0.1");
        assert!(connector.tracker.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_show_interface_records_are_augmented() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_with_templates(&dir, INTERFACE_TEMPLATE);
        let connector = FakeConnector::new(SHOW_INTERFACE);

        let output = run_command(&connector, request("show interface", true), &options)
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!([
                {"interface": "GigabitEthernet0/1", "link_status": "up", "interface_short": "Gi0/1"},
                {"interface": "Vlan10", "link_status": "administratively down", "interface_short": "Vl10"},
            ])
        );
        assert!(connector.tracker.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_other_commands_are_not_augmented() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_with_templates(&dir, INTERFACE_TEMPLATE);
        let connector = FakeConnector::new(SHOW_INTERFACE);

        // Same template via the abbreviated command, but not the literal one
        let output = run_command(&connector, request("sh int", true), &options)
            .await
            .unwrap();
        let records = match output {
            CommandOutput::Records(records) => records,
            other => panic!("expected records, got {:?}", other),
        };
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.contains_key("interface_short")));
    }

    #[tokio::test]
    async fn test_empty_parse_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_with_templates(&dir, INTERFACE_TEMPLATE);
        let connector = FakeConnector::new("% Invalid input detected at '^' marker.");

        let output = run_command(&connector, request("show interface", true), &options)
            .await
            .unwrap();
        assert_eq!(output, CommandOutput::Records(vec![]));
    }

    #[tokio::test]
    async fn test_record_without_interface_fails_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let template = r#"Value PORT (\S+)

Start
  ^${PORT} is -> Record
"#;
        let options = options_with_templates(&dir, template);
        let connector = FakeConnector::new(SHOW_INTERFACE);

        let err = run_command(&connector, request("show interface", true), &options)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing field 'interface' in parsed record");
        assert!(connector.tracker.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_command_timeout_closes_session() {
        let mut connector = FakeConnector::new("");
        connector.fail_send = true;

        let err = run_command(&connector, request("show version", false), &RunnerOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(connector.tracker.commands.load(Ordering::SeqCst), 1);
        assert!(connector.tracker.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_connect_failure_runs_nothing() {
        let mut connector = FakeConnector::new("");
        connector.fail_connect = true;

        let err = run_command(&connector, request("show version", false), &RunnerOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(connector.tracker.commands.load(Ordering::SeqCst), 0);
    }
}
