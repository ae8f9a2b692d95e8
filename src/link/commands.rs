//! AT command vocabulary — wire format for the ESP32 co-processor.
//!
//! Every command line is terminated `\r\n`; raw publish payload bytes are
//! sent without an added terminator. The formats here are interoperability
//! contracts and must be reproduced byte-exact.
//!
//! The AT language embeds SSIDs, credentials, hostnames, and topics inside
//! quoted fields with no escaping mechanism, so any field containing a
//! quote, backslash, or line terminator is rejected before formatting —
//! such input would otherwise splice into the command structure.

use core::fmt::Write as _;

use crate::error::LinkError;

/// `ATE0` — disable command echo. Best-effort; with echo left on, our own
/// command text would land in the receive buffer and could false-match.
pub const DISABLE_ECHO: &[u8] = b"ATE0\r\n";

/// `AT+CWMODE=1` — station (client) mode.
pub const SET_STATION_MODE: &[u8] = b"AT+CWMODE=1\r\n";

/// `AT+MQTTDISCONN=0` — drop the broker connection on link 0.
pub const MQTT_DISCONNECT: &[u8] = b"AT+MQTTDISCONN=0\r\n";

/// Success keyword terminating most responses.
pub const OK: &str = "OK";

/// Prompt printed once the co-processor is ready to take raw payload
/// bytes after `AT+MQTTPUBRAW`.
pub const PROMPT: &str = ">";

/// Reject `value` if it cannot be embedded in a quoted AT field.
fn check_field(value: &str, name: &'static str) -> Result<(), LinkError> {
    if value
        .bytes()
        .any(|b| matches!(b, b'"' | b'\\' | b'\r' | b'\n'))
    {
        return Err(LinkError::InvalidField(name));
    }
    Ok(())
}

/// `AT+CWJAP="ssid","password"` — join an access point.
pub fn join_network(ssid: &str, password: &str) -> Result<heapless::String<128>, LinkError> {
    check_field(ssid, "ssid")?;
    check_field(password, "password")?;
    let mut cmd = heapless::String::new();
    write!(cmd, "AT+CWJAP=\"{ssid}\",\"{password}\"\r\n").map_err(|_| LinkError::CommandTooLong)?;
    Ok(cmd)
}

/// `AT+MQTTUSERCFG=0,1,"client","user","key",0,0,""` — MQTT credentials
/// on link 0, scheme 1 (TCP, no TLS).
pub fn mqtt_user_config(
    client_id: &str,
    username: &str,
    key: &str,
) -> Result<heapless::String<256>, LinkError> {
    check_field(client_id, "client_id")?;
    check_field(username, "username")?;
    check_field(key, "key")?;
    let mut cmd = heapless::String::new();
    write!(
        cmd,
        "AT+MQTTUSERCFG=0,1,\"{client_id}\",\"{username}\",\"{key}\",0,0,\"\"\r\n"
    )
    .map_err(|_| LinkError::CommandTooLong)?;
    Ok(cmd)
}

/// `AT+MQTTCONN=0,"host",port,0` — connect to the broker, no auto-reconnect.
pub fn mqtt_connect(host: &str, port: u16) -> Result<heapless::String<128>, LinkError> {
    check_field(host, "host")?;
    let mut cmd = heapless::String::new();
    write!(cmd, "AT+MQTTCONN=0,\"{host}\",{port},0\r\n").map_err(|_| LinkError::CommandTooLong)?;
    Ok(cmd)
}

/// `AT+MQTTPUBRAW=0,"topic",len,0,0` — announce a raw publish of exactly
/// `len` bytes at QoS 0, no retain. The co-processor answers with the
/// `>` prompt when it is ready for the payload.
pub fn mqtt_publish_raw(topic: &str, len: usize) -> Result<heapless::String<256>, LinkError> {
    check_field(topic, "topic")?;
    let mut cmd = heapless::String::new();
    write!(cmd, "AT+MQTTPUBRAW=0,\"{topic}\",{len},0,0\r\n")
        .map_err(|_| LinkError::CommandTooLong)?;
    Ok(cmd)
}
