//! Protocol sequencer — named operations composed from transport calls.
//!
//! Each operation is a fixed sequence of [`AtTransport::send_await`]
//! calls with operation-specific formatting, expected markers, and
//! timeout classes. A failing step short-circuits the rest of its
//! operation, and [`ConnectionState`] only advances after every step of
//! an operation has matched.

use log::{info, warn};

use super::commands;
use super::transport::AtTransport;
use crate::app::ports::{SerialTx, TimePort};
use crate::config::LinkTimeouts;
use crate::error::LinkError;

/// Where the link currently stands. Transitions only move forward on
/// success; a failed operation leaves the state where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    WifiJoined,
    MqttConfigured,
    MqttConnected,
}

/// Pause between the `>` prompt and the raw payload bytes. The
/// co-processor needs a moment to switch its parser into raw mode.
const PUBLISH_PHASE_SETTLE_MS: u32 = 100;

/// The ESP32 AT modem, driven over one UART link.
pub struct AtModem<'a, T, C> {
    transport: AtTransport<'a, T, C>,
    timeouts: LinkTimeouts,
    state: ConnectionState,
}

impl<'a, T: SerialTx, C: TimePort> AtModem<'a, T, C> {
    pub fn new(transport: AtTransport<'a, T, C>, timeouts: LinkTimeouts) -> Self {
        Self {
            transport,
            timeouts,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Join the WiFi access point.
    ///
    /// Steps: disable echo (best-effort), select station mode (fatal on
    /// failure), then `AT+CWJAP` with the long join budget — DHCP is
    /// included in that window.
    pub fn join_network(&mut self, ssid: &str, password: &str) -> Result<(), LinkError> {
        // Echo-off failing is survivable: matching still works, it just
        // has to wade through our own echoed command text.
        if let Err(e) =
            self.transport
                .send_await(commands::DISABLE_ECHO, Some(commands::OK), self.timeouts.command_ms)
        {
            warn!("ATE0 failed ({e}), continuing with echo on");
        }

        self.transport.send_await(
            commands::SET_STATION_MODE,
            Some(commands::OK),
            self.timeouts.mode_ms,
        )?;

        info!("joining WiFi network '{ssid}'");
        let cmd = commands::join_network(ssid, password)?;
        self.transport
            .send_await(cmd.as_bytes(), Some(commands::OK), self.timeouts.wifi_join_ms)?;

        info!("WiFi joined");
        self.state = ConnectionState::WifiJoined;
        Ok(())
    }

    /// Configure MQTT credentials on the co-processor.
    pub fn configure(
        &mut self,
        client_id: &str,
        username: &str,
        key: &str,
    ) -> Result<(), LinkError> {
        let cmd = commands::mqtt_user_config(client_id, username, key)?;
        self.transport.send_await(
            cmd.as_bytes(),
            Some(commands::OK),
            self.timeouts.mqtt_config_ms,
        )?;

        info!("MQTT credentials configured (client '{client_id}')");
        self.state = ConnectionState::MqttConfigured;
        Ok(())
    }

    /// Connect to the MQTT broker.
    pub fn connect(&mut self, host: &str, port: u16) -> Result<(), LinkError> {
        info!("connecting to broker {host}:{port}");
        let cmd = commands::mqtt_connect(host, port)?;
        self.transport.send_await(
            cmd.as_bytes(),
            Some(commands::OK),
            self.timeouts.mqtt_connect_ms,
        )?;

        info!("broker connected");
        self.state = ConnectionState::MqttConnected;
        Ok(())
    }

    /// Publish `payload` to `topic`, at-most-once.
    ///
    /// Two phases, because the wire protocol separates "announce size"
    /// from "send bytes": `AT+MQTTPUBRAW` with the exact byte length is
    /// answered by the `>` prompt, then the raw payload (no added
    /// terminator) is confirmed by a final `OK` line. A failure in
    /// either phase aborts the publish; nothing partial is retained.
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        if payload.is_empty() {
            return Err(LinkError::EmptyPayload);
        }

        let announce = commands::mqtt_publish_raw(topic, payload.len())?;
        self.transport.send_await(
            announce.as_bytes(),
            Some(commands::PROMPT),
            self.timeouts.mqtt_publish_ms,
        )?;

        self.transport.sleep_ms(PUBLISH_PHASE_SETTLE_MS);

        // Phase B reuses the line-matching transport: confirmation is
        // the terminal `+MQTTPUB:OK` line. With echo disabled the
        // payload itself never enters the receive buffer, but a payload
        // carrying a marker substring is worth flagging in case a
        // firmware revision echoes raw input.
        if contains_marker(payload) {
            warn!("publish payload contains a protocol marker substring");
        }
        self.transport
            .send_await(payload, Some(commands::OK), self.timeouts.mqtt_publish_ms)?;

        info!("published {} bytes to '{topic}'", payload.len());
        Ok(())
    }

    /// Drop the broker connection.
    pub fn disconnect(&mut self) -> Result<(), LinkError> {
        self.transport.send_await(
            commands::MQTT_DISCONNECT,
            Some(commands::OK),
            self.timeouts.mqtt_config_ms,
        )?;

        info!("broker disconnected");
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    /// Cooperative delay, exposed for pacing between publishes.
    pub fn sleep_ms(&mut self, ms: u32) {
        self.transport.sleep_ms(ms);
    }
}

/// True if `payload` contains a substring the line matcher treats as a
/// verdict keyword.
fn contains_marker(payload: &[u8]) -> bool {
    [commands::OK.as_bytes(), super::transport::ERROR_MARKER.as_bytes()]
        .iter()
        .any(|m| payload.windows(m.len()).any(|w| w == *m))
}
