//! Board configuration
//!
//! Values are validated by build.rs from `board.toml` and compiled in.

use i8080_core::DeviceDefaults;
use i8080_hal::PinId;
use i8080_hal_stm32f2::uart::UartConfig;
use i8080_hal_stm32f2::FsmcTiming;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

/// Pins assigned to every configured display object
pub const DEVICE_DEFAULTS: DeviceDefaults = DeviceDefaults {
    backlight: PinId::from_raw(generated::BACKLIGHT_PIN),
    cs: PinId::from_raw(generated::CS_PIN),
    rs: PinId::from_raw(generated::RS_PIN),
};

pub const READ_TIMING: FsmcTiming = timing(generated::READ_TIMING);
pub const WRITE_TIMING: FsmcTiming = timing(generated::WRITE_TIMING);

pub const UART: UartConfig = UartConfig {
    baudrate: generated::UART_BAUDRATE,
};

const fn timing((data, address_hold, address_setup): (u8, u8, u8)) -> FsmcTiming {
    FsmcTiming::mode_a(data, address_hold, address_setup)
}
