//! Request documents read from standard input.
//!
//! Both tools receive exactly one JSON document. Parsing and the presence
//! checks happen here, before any connection or table is touched.

use serde_json::Value;

use crate::device::DeviceDescriptor;
use crate::error::{Error, RequestError, Result};

/// Message used when either `device` or `command` is missing.
pub const COMMAND_FIELDS_REQUIRED: &str = "Both 'device' and 'command' fields are required.";

/// Message used when `mac_address` is missing.
pub const MAC_ADDRESS_REQUIRED: &str = "MAC address is required";

/// A command runner request.
#[derive(Debug)]
pub struct CommandRequest {
    pub device: DeviceDescriptor,
    pub command: String,
    /// Parse the output with TextFSM templates (default `true`).
    pub use_textfsm: bool,
}

/// A vendor lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorLookupRequest {
    pub mac_address: String,
}

impl CommandRequest {
    /// Parse and validate a command request document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value = parse_document(raw)?;

        let device = value.get("device").filter(|v| is_present(v));
        let command = value.get("command").filter(|v| is_present(v));
        let (Some(device), Some(command)) = (device, command) else {
            return Err(Error::validation(COMMAND_FIELDS_REQUIRED));
        };

        let command = command
            .as_str()
            .ok_or_else(|| Error::validation("'command' must be a string"))?
            .to_string();

        let use_textfsm = match value.get("use_textfsm") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => return Err(Error::validation("'use_textfsm' must be a boolean")),
        };

        let device: DeviceDescriptor = serde_json::from_value(device.clone())
            .map_err(|e| Error::validation(format!("Invalid device descriptor: {}", e)))?;

        Ok(Self {
            device,
            command,
            use_textfsm,
        })
    }
}

impl VendorLookupRequest {
    /// Parse and validate a vendor lookup document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value = parse_document(raw)?;

        let mac_address = value
            .get("mac_address")
            .filter(|v| is_present(v))
            .ok_or_else(|| Error::validation(MAC_ADDRESS_REQUIRED))?;

        let mac_address = mac_address
            .as_str()
            .ok_or_else(|| Error::validation("MAC address must be a string"))?
            .to_string();

        Ok(Self { mac_address })
    }
}

fn parse_document(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).map_err(RequestError::MalformedInput)?;
    if !value.is_object() {
        return Err(Error::validation("Input must be a JSON object"));
    }
    Ok(value)
}

/// Presence in the loose sense callers rely on: null, false, zero and
/// empty strings/arrays/objects all count as missing.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const DEVICE: &str = r#"{"device_type": "cisco_ios", "host": "10.0.0.1", "username": "netops", "password": "x"}"#;

    #[test]
    fn test_command_request_defaults_to_textfsm() {
        let raw = format!(r#"{{"device": {}, "command": "show version"}}"#, DEVICE);
        let request = CommandRequest::from_json(&raw).unwrap();
        assert_eq!(request.command, "show version");
        assert!(request.use_textfsm);
        assert_eq!(request.device.host, "10.0.0.1");
    }

    #[test]
    fn test_command_request_textfsm_disabled() {
        let raw = format!(
            r#"{{"device": {}, "command": "show interface", "use_textfsm": false}}"#,
            DEVICE
        );
        assert!(!CommandRequest::from_json(&raw).unwrap().use_textfsm);
    }

    #[test]
    fn test_missing_or_empty_fields() {
        for raw in [
            r#"{"command": "show version"}"#.to_string(),
            format!(r#"{{"device": {}}}"#, DEVICE),
            format!(r#"{{"device": {}, "command": ""}}"#, DEVICE),
            r#"{"device": {}, "command": "show version"}"#.to_string(),
            r#"{"device": null, "command": "show version"}"#.to_string(),
        ] {
            let err = CommandRequest::from_json(&raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{raw}");
            assert_eq!(err.to_string(), COMMAND_FIELDS_REQUIRED);
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = CommandRequest::from_json("{\"device\": ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().starts_with("Invalid JSON input: "));

        let err = VendorLookupRequest::from_json("not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_wrong_types() {
        let raw = format!(r#"{{"device": {}, "command": 42}}"#, DEVICE);
        assert_eq!(
            CommandRequest::from_json(&raw).unwrap_err().to_string(),
            "'command' must be a string"
        );

        let raw = format!(
            r#"{{"device": {}, "command": "show version", "use_textfsm": "yes"}}"#,
            DEVICE
        );
        assert_eq!(
            CommandRequest::from_json(&raw).unwrap_err().kind(),
            ErrorKind::Validation
        );

        let err = CommandRequest::from_json(r#"{"device": {"host": "10.0.0.1"}, "command": "show version"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().starts_with("Invalid device descriptor: "));

        assert_eq!(
            CommandRequest::from_json("[1, 2]").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_vendor_lookup_request() {
        let request = VendorLookupRequest::from_json(r#"{"mac_address": "00:1b:54:aa:bb:cc"}"#).unwrap();
        assert_eq!(request.mac_address, "00:1b:54:aa:bb:cc");

        for raw in [r#"{}"#, r#"{"mac_address": ""}"#, r#"{"mac_address": null}"#] {
            let err = VendorLookupRequest::from_json(raw).unwrap_err();
            assert_eq!(err.to_string(), MAC_ADDRESS_REQUIRED);
        }
    }
}
