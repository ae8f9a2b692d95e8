//! Hygrolink — STM32F103 entry point.
//!
//! Wires the hardware to the port traits and runs the publish loop:
//!
//! - USART1 (PA9/PA10) ↔ ESP32 AT modem. TX goes through the blocking
//!   [`UsartTx`] adapter; RX is interrupt-driven, one byte per IRQ, fed
//!   straight into the `static` [`LineReceiver`]. Reception stays armed
//!   for the whole process lifetime — reading the data register in the
//!   handler re-arms the RXNE interrupt.
//! - I2C1 (PB6/PB7) ↔ SHT31 sensor.
//! - SysTick at 1 kHz drives the millisecond clock the transport's
//!   timeout loop measures against.

#![no_std]
#![no_main]

use panic_halt as _;

use core::cell::RefCell;
use cortex_m::interrupt::Mutex;
use cortex_m_rt::{entry, exception};
use stm32f1xx_hal::{
    i2c::{BlockingI2c, DutyCycle, Mode},
    pac::{self, interrupt, USART1},
    prelude::*,
    serial::{Config, Event, Rx, Serial},
};

use hygrolink::adapters::time::{SysTickClock, systick_tick};
use hygrolink::adapters::uart::UsartTx;
use hygrolink::app::service::AppService;
use hygrolink::config::{LinkTimeouts, NodeConfig};
use hygrolink::link::{AtModem, AtTransport, LineReceiver};
use hygrolink::sensors::Sht31;

/// Retry cadence when session bring-up fails (AP down, bad credentials).
const BRING_UP_RETRY_MS: u32 = 10_000;

/// Shared with the USART1 interrupt handler — the single writer.
static ESP_RX: LineReceiver = LineReceiver::new();

/// Receive half of USART1, parked where the interrupt handler can reach it.
static RX_HANDLE: Mutex<RefCell<Option<Rx<USART1>>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = pac::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let rcc = dp.RCC.constrain();
    let clocks = rcc
        .cfgr
        .use_hse(8.MHz())
        .sysclk(72.MHz())
        .pclk1(36.MHz())
        .freeze(&mut flash.acr);

    // 1 kHz SysTick → millisecond counter.
    let mut syst = cp.SYST;
    syst.set_clock_source(cortex_m::peripheral::syst::SystClkSource::Core);
    syst.set_reload(72_000 - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();

    let mut afio = dp.AFIO.constrain();
    let mut gpioa = dp.GPIOA.split();
    let mut gpiob = dp.GPIOB.split();

    // USART1 → ESP32 AT firmware at its default rate.
    let tx_pin = gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh);
    let rx_pin = gpioa.pa10;
    let mut serial = Serial::new(
        dp.USART1,
        (tx_pin, rx_pin),
        &mut afio.mapr,
        Config::default().baudrate(115_200.bps()),
        &clocks,
    );
    serial.listen(Event::Rxne);
    let (tx, rx) = serial.split();

    cortex_m::interrupt::free(|cs| RX_HANDLE.borrow(cs).replace(Some(rx)));
    unsafe { pac::NVIC::unmask(pac::Interrupt::USART1) };

    // I2C1 → SHT31.
    let scl = gpiob.pb6.into_alternate_open_drain(&mut gpiob.crl);
    let sda = gpiob.pb7.into_alternate_open_drain(&mut gpiob.crl);
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (scl, sda),
        &mut afio.mapr,
        Mode::Fast {
            frequency: 400.kHz(),
            duty_cycle: DutyCycle::Ratio2to1,
        },
        clocks,
        1_000,
        10,
        1_000,
        1_000,
    );
    let sensor = Sht31::new(i2c, dp.TIM2.delay_us(&clocks));

    let transport = AtTransport::new(UsartTx::new(tx), SysTickClock::new(), &ESP_RX);
    let modem = AtModem::new(transport, LinkTimeouts::default());
    let mut service = AppService::new(modem, sensor, NodeConfig::default());

    let mut pacer = SysTickClock::new();

    // Session bring-up, retried until the network lets us in.
    while service.bring_up().is_err() {
        pacer.sleep_ms(BRING_UP_RETRY_MS);
    }

    loop {
        // A failed cycle publishes nothing; the next interval retries.
        let _ = service.run_cycle();
        let interval = service.config().publish_interval_ms;
        pacer.sleep_ms(interval);
    }
}

/// One byte per interrupt. Reading the data register clears RXNE, so
/// reception is re-armed by the read itself. Must stay bounded-time:
/// no logging, no waiting, just the receiver append.
#[interrupt]
fn USART1() {
    cortex_m::interrupt::free(|cs| {
        if let Some(rx) = RX_HANDLE.borrow(cs).borrow_mut().as_mut() {
            if let Ok(b) = rx.read() {
                ESP_RX.on_byte(b);
            }
        }
    });
}

#[exception]
fn SysTick() {
    systick_tick();
}
