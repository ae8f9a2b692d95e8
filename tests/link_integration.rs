//! Integration tests: AppService → AtModem → AtTransport against a
//! scripted co-processor.
//!
//! The scripted serial adapter answers each command the way the ESP32
//! AT firmware would, delivering response bytes into the shared
//! `LineReceiver` as the ISR does on hardware. Time is virtual, so
//! timeout scenarios run instantly and deterministically.

#![cfg(not(feature = "stm32"))]

use hygrolink::LinkError;
use hygrolink::adapters::sim::{Rule, SimSerial, Transcript};
use hygrolink::app::ports::{Reading, SensorPort, TimePort};
use hygrolink::app::service::AppService;
use hygrolink::config::{LinkTimeouts, NodeConfig};
use hygrolink::link::{AtModem, AtTransport, ConnectionState, LineReceiver};
use hygrolink::{Error, SensorError};

// ── Mock implementations ──────────────────────────────────────

/// Virtual clock: `sleep_ms` advances time without waiting.
struct VirtualClock {
    now: u64,
}

impl VirtualClock {
    fn new() -> Self {
        Self { now: 0 }
    }
}

impl TimePort for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.now += u64::from(ms);
    }
}

struct FixedSensor {
    reading: Option<Reading>,
}

impl SensorPort for FixedSensor {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.reading.ok_or(SensorError::BusReadFailed)
    }
}

fn short_timeouts() -> LinkTimeouts {
    LinkTimeouts {
        command_ms: 50,
        mode_ms: 50,
        wifi_join_ms: 100,
        mqtt_config_ms: 50,
        mqtt_connect_ms: 100,
        mqtt_publish_ms: 100,
    }
}

/// The full happy-path script for one bring-up plus one publish cycle.
/// The `>` prompt after `AT+MQTTPUBRAW` arrives in the same burst as
/// the `OK` line, exactly as it does at 115200 baud.
fn happy_script() -> Vec<Rule> {
    vec![
        Rule { when: b"ATE0", respond: b"OK\r\n" },
        Rule { when: b"AT+CWMODE=1", respond: b"OK\r\n" },
        Rule {
            when: b"AT+CWJAP=",
            respond: b"WIFI CONNECTED\r\nWIFI GOT IP\r\nOK\r\n",
        },
        Rule { when: b"AT+MQTTUSERCFG=", respond: b"OK\r\n" },
        Rule { when: b"AT+MQTTCONN=", respond: b"+MQTTCONNECTED:0\r\nOK\r\n" },
        Rule { when: b"AT+MQTTPUBRAW=", respond: b"OK\r\n\r\n> " },
        Rule { when: b"23.51", respond: b"+MQTTPUB:OK\r\n" },
        Rule { when: b"48.2", respond: b"+MQTTPUB:OK\r\n" },
        Rule { when: b"AT+MQTTDISCONN=", respond: b"OK\r\n" },
    ]
}

fn test_config() -> NodeConfig {
    let mut c = NodeConfig::default();
    c.wifi_ssid = "HomeNet".try_into().unwrap();
    c.wifi_password = "hunter22".try_into().unwrap();
    c.username = "alice".try_into().unwrap();
    c.publish_interval_ms = 1_000;
    c
}

fn reading() -> Option<Reading> {
    Some(Reading {
        temperature_c: 23.51,
        humidity_rh: 48.2,
    })
}

type Service<'a> = AppService<'a, SimSerial<'a>, VirtualClock, FixedSensor>;

fn service<'a>(
    rx: &'a LineReceiver,
    script: Vec<Rule>,
    sensor: Option<Reading>,
) -> (Service<'a>, Transcript) {
    let serial = SimSerial::new(rx, script);
    let transcript = serial.transcript();
    let transport = AtTransport::new(serial, VirtualClock::new(), rx);
    let modem = AtModem::new(transport, short_timeouts());
    let svc = AppService::new(modem, FixedSensor { reading: sensor }, test_config());
    (svc, transcript)
}

fn was_sent(transcript: &Transcript, prefix: &[u8]) -> bool {
    transcript.borrow().iter().any(|cmd| cmd.starts_with(prefix))
}

// ── Bring-up ──────────────────────────────────────────────────

#[test]
fn bring_up_walks_join_then_configure() {
    let rx = LineReceiver::new();
    let (mut svc, transcript) = service(&rx, happy_script(), reading());
    svc.bring_up().unwrap();
    assert_eq!(svc.connection_state(), ConnectionState::MqttConfigured);

    let sent = transcript.borrow();
    assert_eq!(sent[0], b"ATE0\r\n");
    assert_eq!(sent[1], b"AT+CWMODE=1\r\n");
    assert_eq!(sent[2], b"AT+CWJAP=\"HomeNet\",\"hunter22\"\r\n");
    assert!(sent[3].starts_with(b"AT+MQTTUSERCFG=0,1,"));
}

#[test]
fn station_mode_rejection_short_circuits_join() {
    let rx = LineReceiver::new();
    let script = vec![
        Rule { when: b"ATE0", respond: b"OK\r\n" },
        Rule { when: b"AT+CWMODE=1", respond: b"ERROR\r\n" },
    ];
    let (mut svc, transcript) = service(&rx, script, reading());
    assert_eq!(svc.bring_up(), Err(Error::Link(LinkError::ErrorMarker)));
    assert_eq!(svc.connection_state(), ConnectionState::Disconnected);
    // Short-circuit: the join command never reached the wire.
    assert!(!was_sent(&transcript, b"AT+CWJAP"));
}

#[test]
fn echo_disable_failure_is_tolerated() {
    let rx = LineReceiver::new();
    let mut script = happy_script();
    script[0] = Rule { when: b"ATE0", respond: b"ERROR\r\n" };
    let (mut svc, _) = service(&rx, script, reading());
    svc.bring_up().unwrap();
    assert_eq!(svc.connection_state(), ConnectionState::MqttConfigured);
}

#[test]
fn join_timeout_reported_when_ap_never_answers() {
    let rx = LineReceiver::new();
    let script = vec![
        Rule { when: b"ATE0", respond: b"OK\r\n" },
        Rule { when: b"AT+CWMODE=1", respond: b"OK\r\n" },
        // No rule for AT+CWJAP — the join window expires silently.
    ];
    let (mut svc, _) = service(&rx, script, reading());
    assert_eq!(svc.bring_up(), Err(Error::Link(LinkError::TimedOut)));
    assert_eq!(svc.connection_state(), ConnectionState::Disconnected);
}

// ── Publish cycle ─────────────────────────────────────────────

#[test]
fn full_cycle_publishes_both_feeds_and_disconnects() {
    let rx = LineReceiver::new();
    let (mut svc, transcript) = service(&rx, happy_script(), reading());
    svc.bring_up().unwrap();
    svc.run_cycle().unwrap();
    assert_eq!(svc.connection_state(), ConnectionState::Disconnected);

    // Both announces carry the topic and the exact payload byte count,
    // and the raw payloads went out verbatim with no added terminator.
    assert!(was_sent(
        &transcript,
        b"AT+MQTTPUBRAW=0,\"alice/feeds/temperature\",5,0,0\r\n"
    ));
    assert!(was_sent(&transcript, b"AT+MQTTPUBRAW=0,\"alice/feeds/humidity\",4,0,0\r\n"));
    assert!(transcript.borrow().iter().any(|c| c.as_slice() == b"23.51"));
    assert!(transcript.borrow().iter().any(|c| c.as_slice() == b"48.2"));
    assert!(was_sent(&transcript, b"AT+MQTTDISCONN=0"));
}

#[test]
fn sensor_failure_skips_the_whole_cycle() {
    let rx = LineReceiver::new();
    let (mut svc, transcript) = service(&rx, happy_script(), None);
    svc.bring_up().unwrap();
    assert_eq!(
        svc.run_cycle(),
        Err(Error::Sensor(SensorError::BusReadFailed))
    );
    // Broker was never contacted.
    assert!(!was_sent(&transcript, b"AT+MQTTCONN"));
    assert_eq!(svc.connection_state(), ConnectionState::MqttConfigured);
}

// ── Modem-level scenarios ─────────────────────────────────────

fn modem<'a>(
    rx: &'a LineReceiver,
    script: Vec<Rule>,
) -> (AtModem<'a, SimSerial<'a>, VirtualClock>, Transcript) {
    let serial = SimSerial::new(rx, script);
    let transcript = serial.transcript();
    let transport = AtTransport::new(serial, VirtualClock::new(), rx);
    (AtModem::new(transport, short_timeouts()), transcript)
}

#[test]
fn empty_payload_rejected_before_any_transmit() {
    let rx = LineReceiver::new();
    let (mut m, transcript) = modem(&rx, happy_script());
    assert_eq!(
        m.publish("alice/feeds/temperature", b""),
        Err(LinkError::EmptyPayload)
    );
    // Nothing touched the wire and no receive window was opened.
    assert!(transcript.borrow().is_empty());
    assert!(rx.is_empty());
}

#[test]
fn publish_phase_b_timeout_aborts_publish() {
    let rx = LineReceiver::new();
    let script = vec![
        Rule { when: b"AT+MQTTPUBRAW=", respond: b"OK\r\n\r\n> " },
        // No rule for the payload bytes — confirmation never arrives.
    ];
    let (mut m, transcript) = modem(&rx, script);
    assert_eq!(
        m.publish("alice/feeds/temperature", b"23.51"),
        Err(LinkError::TimedOut)
    );
    // Phase A completed: the payload did go out before the timeout.
    assert!(transcript.borrow().iter().any(|c| c.as_slice() == b"23.51"));
}

#[test]
fn publish_retries_cleanly_after_phase_b_timeout() {
    let rx = LineReceiver::new();
    let script = vec![
        Rule { when: b"AT+MQTTPUBRAW=", respond: b"OK\r\n\r\n> " },
        Rule { when: b"23.51", respond: b"+MQTTPUB:OK\r\n" },
    ];
    let (mut m, _) = modem(&rx, script);
    // First attempt sends a payload the script never confirms.
    assert_eq!(
        m.publish("alice/feeds/temperature", b"99.99"),
        Err(LinkError::TimedOut)
    );
    // No partial-publish state: a fresh attempt completes normally.
    m.publish("alice/feeds/temperature", b"23.51").unwrap();
}

#[test]
fn transmit_fault_surfaces_as_transmit_failed() {
    let rx = LineReceiver::new();
    let mut serial = SimSerial::new(&rx, happy_script());
    serial.fail_next_write = true;
    let transport = AtTransport::new(serial, VirtualClock::new(), &rx);
    let mut m = AtModem::new(transport, short_timeouts());
    assert_eq!(
        m.connect("io.adafruit.com", 1883),
        Err(LinkError::TransmitFailed)
    );
    assert_eq!(m.state(), ConnectionState::Disconnected);
}

#[test]
fn quoted_field_injection_rejected_before_transmit() {
    let rx = LineReceiver::new();
    let (mut m, transcript) = modem(&rx, happy_script());
    assert_eq!(
        m.join_network("Home\"Net", "pw"),
        Err(LinkError::InvalidField("ssid"))
    );
    // ATE0 and CWMODE ran, but the join line itself was never formatted.
    assert!(!was_sent(&transcript, b"AT+CWJAP"));
}

#[test]
fn same_script_twice_gives_identical_outcomes() {
    for _ in 0..2 {
        let rx = LineReceiver::new();
        let (mut svc, _) = service(&rx, happy_script(), reading());
        assert_eq!(svc.bring_up(), Ok(()));
        assert_eq!(svc.run_cycle(), Ok(()));
        assert_eq!(svc.connection_state(), ConnectionState::Disconnected);
    }
}
