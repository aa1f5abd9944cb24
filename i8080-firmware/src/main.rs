//! i8080 - SSD1963 Command-Dispatch Firmware
//!
//! Firmware binary for STM32F2 boards with an SSD1963-class LCD on the FSMC.
//! The host drives the display through Klipper-style object commands sent
//! over UART; this firmware turns them into I8080 bus strobes.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::peripherals::USART1;
use embassy_stm32::usart::{self, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use i8080_core::Dispatcher;
use i8080_hal_stm32f2::{FsmcBus, FsmcEnable, GpioFactory};

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<USART1>;
});

// DMA ring for host RX (must live forever). A fill of factor 255 keeps the
// dispatcher busy for about 10 ms, roughly 250 bytes at 250 kbaud.
static RX_DMA_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("i8080 firmware starting...");

    let p = embassy_stm32::init(Default::default());

    // Host link (PA9=TX, PA10=RX)
    let uart = Uart::new(
        p.USART1,
        p.PA10, // RX
        p.PA9,  // TX
        Irqs,
        p.DMA2_CH7,
        p.DMA2_CH2,
        board::UART.to_embassy(),
    )
    .unwrap();
    let (tx, rx) = uart.split();
    // Keeps receiving while a long burst holds up the RX task
    let rx = rx.into_ring_buffered(RX_DMA_BUF.init([0u8; 1024]));
    info!("Host UART at {} baud", board::UART.baudrate);

    // The bus is enabled lazily by the first config_i8080
    let dispatcher = Dispatcher::new(
        FsmcBus::new(),
        FsmcEnable::new(board::READ_TIMING, board::WRITE_TIMING),
        GpioFactory::new(),
        board::DEVICE_DEFAULTS,
    );
    debug!(
        "Device defaults: backlight={} cs={} rs={}",
        board::DEVICE_DEFAULTS.backlight,
        board::DEVICE_DEFAULTS.cs,
        board::DEVICE_DEFAULTS.rs
    );

    spawner.spawn(tasks::host_rx_task(rx, dispatcher)).unwrap();
    spawner.spawn(tasks::host_tx_task(tx)).unwrap();

    info!("All tasks spawned, firmware running");
}
