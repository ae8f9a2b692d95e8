//! SHT31 temperature/humidity driver (Sensirion, I2C).
//!
//! Single-shot high-repeatability measurement without clock stretching:
//! trigger (`0x24 0x00`), wait out the conversion, read six bytes
//! (temperature word + CRC, humidity word + CRC). Each word is guarded
//! by the sensor's CRC-8 (polynomial 0x31, init 0xFF).

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::{Reading, SensorPort};
use crate::error::SensorError;

/// Default I2C address (ADDR pin low).
pub const SHT31_I2C_ADDR: u8 = 0x44;

/// Single shot, high repeatability, clock stretching disabled.
const CMD_MEASURE_HIGHREP: [u8; 2] = [0x24, 0x00];

/// High-repeatability conversion takes at most 15 ms; 20 gives margin.
const MEASUREMENT_DELAY_MS: u32 = 20;

pub struct Sht31<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
}

impl<I2C: I2c, D: DelayNs> Sht31<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, SHT31_I2C_ADDR)
    }

    /// For boards strapping the ADDR pin high (0x45).
    pub fn with_address(i2c: I2C, delay: D, addr: u8) -> Self {
        Self { i2c, delay, addr }
    }

    /// Trigger a measurement and return the converted reading.
    pub fn read(&mut self) -> Result<Reading, SensorError> {
        self.i2c
            .write(self.addr, &CMD_MEASURE_HIGHREP)
            .map_err(|_| SensorError::BusWriteFailed)?;

        self.delay.delay_ms(MEASUREMENT_DELAY_MS);

        let mut buf = [0u8; 6];
        self.i2c
            .read(self.addr, &mut buf)
            .map_err(|_| SensorError::BusReadFailed)?;

        if crc8(&buf[0..2]) != buf[2] || crc8(&buf[3..5]) != buf[5] {
            return Err(SensorError::CrcMismatch);
        }

        let raw_temp = u16::from_be_bytes([buf[0], buf[1]]);
        let raw_humid = u16::from_be_bytes([buf[3], buf[4]]);

        Ok(Reading {
            temperature_c: convert_temperature(raw_temp),
            humidity_rh: convert_humidity(raw_humid),
        })
    }
}

impl<I2C: I2c, D: DelayNs> SensorPort for Sht31<I2C, D> {
    fn read(&mut self) -> Result<Reading, SensorError> {
        Sht31::read(self)
    }
}

/// Datasheet conversion: T = -45 + 175 * raw / (2^16 - 1).
fn convert_temperature(raw: u16) -> f32 {
    -45.0 + 175.0 * f32::from(raw) / 65535.0
}

/// Datasheet conversion: RH = 100 * raw / (2^16 - 1), clamped to 0..=100.
fn convert_humidity(raw: u16) -> f32 {
    (100.0 * f32::from(raw) / 65535.0).clamp(0.0, 100.0)
}

/// Sensirion CRC-8: polynomial 0x31, init 0xFF, no reflection, no xorout.
fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}
