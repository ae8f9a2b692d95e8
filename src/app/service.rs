//! Application service — one sensor-read/publish cycle.
//!
//! Owns the modem sequencer and the sensor port. `bring_up` runs once at
//! boot (WiFi join + MQTT credential configuration); `run_cycle` runs on
//! the publish interval. A failed cycle publishes nothing and carries no
//! state into the next one — the outer loop simply tries again on the
//! next interval.

use core::fmt::Write as _;

use log::{error, info, warn};

use super::ports::{SensorPort, SerialTx, TimePort};
use crate::config::NodeConfig;
use crate::error::{LinkError, Result};
use crate::link::{AtModem, ConnectionState};

/// Pause between the temperature and humidity publishes. Adafruit IO
/// rate-limits bursts from the same client.
const INTER_PUBLISH_DELAY_MS: u32 = 500;

/// Publish-loop core, generic over the hardware ports.
pub struct AppService<'a, T, C, S> {
    modem: AtModem<'a, T, C>,
    sensor: S,
    config: NodeConfig,
}

impl<'a, T: SerialTx, C: TimePort, S: SensorPort> AppService<'a, T, C, S> {
    pub fn new(modem: AtModem<'a, T, C>, sensor: S, config: NodeConfig) -> Self {
        Self {
            modem,
            sensor,
            config,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.modem.state()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// One-time session bring-up: join the access point and configure
    /// broker credentials. Broker connect/disconnect happens per cycle.
    pub fn bring_up(&mut self) -> Result<()> {
        self.modem
            .join_network(&self.config.wifi_ssid, &self.config.wifi_password)?;
        self.modem.configure(
            &self.config.client_id,
            &self.config.username,
            &self.config.key,
        )?;
        Ok(())
    }

    /// One full cycle: read sensor, connect, publish both feeds,
    /// disconnect. Returns the first failure; later steps still run
    /// where that matches the wire protocol (both feeds are attempted,
    /// the disconnect is always attempted once connected).
    pub fn run_cycle(&mut self) -> Result<()> {
        let reading = self.sensor.read()?;
        info!(
            "read OK: temp={:.2} C, humid={:.1} %RH",
            reading.temperature_c, reading.humidity_rh
        );

        let mut temp_payload: heapless::String<16> = heapless::String::new();
        let mut humid_payload: heapless::String<16> = heapless::String::new();
        write!(temp_payload, "{:.2}", reading.temperature_c)
            .map_err(|_| LinkError::CommandTooLong)?;
        write!(humid_payload, "{:.1}", reading.humidity_rh)
            .map_err(|_| LinkError::CommandTooLong)?;

        let temp_topic = feed_topic(&self.config.username, &self.config.temperature_feed)?;
        let humid_topic = feed_topic(&self.config.username, &self.config.humidity_feed)?;

        self.modem
            .connect(&self.config.broker_host, self.config.broker_port)?;

        // Attempt both feeds even if the first fails; the cycle still
        // reports the failure after cleaning up the connection.
        let temp_result = self.modem.publish(&temp_topic, temp_payload.as_bytes());
        if let Err(e) = temp_result {
            error!("temperature publish failed: {e}");
        }
        self.modem.sleep_ms(INTER_PUBLISH_DELAY_MS);

        let humid_result = self.modem.publish(&humid_topic, humid_payload.as_bytes());
        if let Err(e) = humid_result {
            error!("humidity publish failed: {e}");
        }
        self.modem.sleep_ms(INTER_PUBLISH_DELAY_MS);

        if let Err(e) = self.modem.disconnect() {
            warn!("broker disconnect failed: {e}");
        }

        temp_result?;
        humid_result?;
        Ok(())
    }
}

/// Adafruit IO topic layout: `{username}/feeds/{feed}`.
fn feed_topic(
    username: &str,
    feed: &str,
) -> core::result::Result<heapless::String<96>, LinkError> {
    let mut topic = heapless::String::new();
    write!(topic, "{username}/feeds/{feed}").map_err(|_| LinkError::CommandTooLong)?;
    Ok(topic)
}
