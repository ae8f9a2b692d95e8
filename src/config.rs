//! System configuration parameters
//!
//! All tunable parameters for the Hygrolink node: broker credentials,
//! feed names, and the per-operation AT link timeout classes. Values can
//! be overridden at provisioning time; defaults match the Adafruit IO
//! deployment profile.

use serde::{Deserialize, Serialize};

/// Node configuration: credentials, broker endpoint, feed names, cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- WiFi ---
    /// Access point SSID.
    pub wifi_ssid: heapless::String<32>,
    /// Access point password (WPA2 personal).
    pub wifi_password: heapless::String<64>,

    // --- MQTT broker ---
    /// Broker hostname.
    pub broker_host: heapless::String<64>,
    /// Broker port (1883 = plain MQTT).
    pub broker_port: u16,
    /// MQTT client identifier (must be unique per broker account).
    pub client_id: heapless::String<32>,
    /// Broker username (Adafruit IO account name).
    pub username: heapless::String<32>,
    /// Broker key/password.
    pub key: heapless::String<64>,

    // --- Feeds ---
    /// Feed name for the temperature reading.
    pub temperature_feed: heapless::String<32>,
    /// Feed name for the humidity reading.
    pub humidity_feed: heapless::String<32>,

    // --- Timing ---
    /// Interval between sensor-read/publish cycles (milliseconds).
    pub publish_interval_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        fn s<const N: usize>(v: &str) -> heapless::String<N> {
            let mut out = heapless::String::new();
            let _ = out.push_str(v);
            out
        }
        Self {
            wifi_ssid: s("Your_WiFi_SSID"),
            wifi_password: s("Your_WiFi_Password"),
            broker_host: s("io.adafruit.com"),
            broker_port: 1883,
            client_id: s("HygrolinkNode"),
            username: s("Your_AIO_Username"),
            key: s("Your_AIO_Key"),
            temperature_feed: s("temperature"),
            humidity_feed: s("humidity"),
            publish_interval_ms: 30_000, // every 30 seconds
        }
    }
}

/// Per-operation timeout classes for the AT link (milliseconds).
///
/// Joining an access point and connecting to the broker take orders of
/// magnitude longer than a local command like `ATE0`, so each protocol
/// step carries its own budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinkTimeouts {
    /// Basic local AT commands (echo off).
    pub command_ms: u32,
    /// Station-mode selection.
    pub mode_ms: u32,
    /// WiFi access-point join (DHCP included).
    pub wifi_join_ms: u32,
    /// MQTT credential configuration.
    pub mqtt_config_ms: u32,
    /// MQTT broker TCP+CONNECT handshake.
    pub mqtt_connect_ms: u32,
    /// MQTT publish completion (both prompt and payload confirmation).
    pub mqtt_publish_ms: u32,
}

impl Default for LinkTimeouts {
    fn default() -> Self {
        Self {
            command_ms: 1_000,
            mode_ms: 2_000,
            wifi_join_ms: 20_000,
            mqtt_config_ms: 5_000,
            mqtt_connect_ms: 10_000,
            mqtt_publish_ms: 5_000,
        }
    }
}
