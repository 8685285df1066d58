//! Interface name abbreviation.
//!
//! Devices report long interface names (`GigabitEthernet0/1`) while most
//! other tables and humans use the short form (`Gi0/1`). The mapping is a
//! fixed, ordered prefix table so the matching rule can be read in one place.
//!
//! Abbreviating is not idempotent in general: `Gi0/1` is not itself a known
//! prefix, so it comes back unchanged rather than being recognised.

use serde_json::{Map, Value};

use crate::error::RecordError;

/// The literal interface-listing command whose records get `interface_short`.
pub const INTERFACE_LISTING_COMMAND: &str = "show interface";

/// Field holding the device-native interface name.
pub const INTERFACE_FIELD: &str = "interface";

/// Field added with the abbreviated name.
pub const INTERFACE_SHORT_FIELD: &str = "interface_short";

/// Long prefix to abbreviation. Where one prefix extends another the
/// longer one comes first, so the first match is the longest.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("HundredGigabitEthernet", "Hu"),
    ("HundredGigE", "Hu"),
    ("FortyGigabitEthernet", "Fo"),
    ("TwentyFiveGigabitEthernet", "Twe"),
    ("TwentyFiveGigE", "Twe"),
    ("TenGigabitEthernet", "Te"),
    ("TenGigE", "Te"),
    ("FiveGigabitEthernet", "Fi"),
    ("TwoGigabitEthernet", "Tw"),
    ("AppGigabitEthernet", "Ap"),
    ("GigabitEthernet", "Gi"),
    ("FastEthernet", "Fa"),
    ("Ethernet", "Eth"),
    ("Port-channel", "Po"),
    ("Bundle-Ether", "BE"),
    ("Loopback", "Lo"),
    ("Vlan", "Vl"),
    ("Tunnel", "Tu"),
    ("Serial", "Se"),
    ("MgmtEth", "Mg"),
    ("Management", "Ma"),
    ("Dialer", "Di"),
    ("Multilink", "Mu"),
    ("Virtual-Template", "Vt"),
    ("Virtual-Access", "Vi"),
    ("BDI", "BD"),
    ("Async", "As"),
    ("Null", "Nu"),
    ("nve", "nve"),
];

/// Abbreviate a device-native interface name.
///
/// The prefix is matched case-insensitively and the remainder is kept as
/// is. Unknown names are returned unchanged.
pub fn normalize(name: &str) -> String {
    ABBREVIATIONS
        .iter()
        .find_map(|(long, short)| {
            let head = name.get(..long.len())?;
            head.eq_ignore_ascii_case(long)
                .then(|| format!("{}{}", short, &name[long.len()..]))
        })
        .unwrap_or_else(|| name.to_string())
}

/// Add `interface_short` to every parsed interface record.
///
/// A record without a string `interface` field fails the whole call.
pub fn augment_records(records: &mut [Map<String, Value>]) -> Result<(), RecordError> {
    for record in records.iter_mut() {
        let name = record
            .get(INTERFACE_FIELD)
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingField {
                field: INTERFACE_FIELD,
            })?;
        let short = normalize(name);
        record.insert(INTERFACE_SHORT_FIELD.to_string(), Value::String(short));
    }
    Ok(())
}
