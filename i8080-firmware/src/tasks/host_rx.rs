//! Host UART receive task
//!
//! Receives frames from the host, runs each command on the dispatcher and
//! queues any reply for the TX task.

use defmt::*;
use embassy_stm32::usart::RingBufferedUartRx;
use embassy_time::{Duration, Timer};

use i8080_core::{DispatchError, Dispatcher, RunState};
use i8080_hal_stm32f2::uart::UartBusError;
use i8080_hal_stm32f2::{FsmcBus, FsmcEnable, GpioFactory};
use i8080_protocol::{Frame, FrameParser, HostCommand, McuReply, ShutdownReason};

use crate::channels::REPLY_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

pub type FirmwareDispatcher = Dispatcher<FsmcBus, FsmcEnable, GpioFactory>;

/// Host RX task - parses frames and dispatches commands
#[embassy_executor::task]
pub async fn host_rx_task(mut rx: RingBufferedUartRx<'static>, mut dispatcher: FirmwareDispatcher) {
    info!("Host RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => handle_frame(&mut dispatcher, &frame).await,
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Err(e) => {
                let e = UartBusError::from(e);
                warn!("UART read error: {:?}", e);

                // The DMA ring wrapped; lost bytes may have split a burst
                if e == UartBusError::Overrun {
                    abort(&mut dispatcher, ShutdownReason::Fault).await;
                }
                parser.reset();
                Timer::after(Duration::from_millis(10)).await;
            }
        }
    }
}

/// Decode and run one frame
async fn handle_frame(dispatcher: &mut FirmwareDispatcher, frame: &Frame) {
    let command = match HostCommand::from_frame(frame) {
        Ok(command) => command,
        Err(e) => {
            warn!("Failed to parse host command: {:?}", e);
            return;
        }
    };

    if let HostCommand::Config { oid } = command {
        // Handled here so the shared-bus hazard can be logged
        match dispatcher.configure(oid) {
            Ok(configured) => {
                info!("config_i8080 oid={}", configured.oid);
                if configured.shared_bus_reconfigured {
                    warn!(
                        "oid {} reprogrammed the shared FSMC bus of another display",
                        oid
                    );
                }
            }
            Err(DispatchError::Shutdown) => {
                warn!("config_i8080 oid={} rejected: shut down", oid)
            }
            Err(e) => error!("config_i8080 oid={} failed: {:?}", oid, e),
        }
        return;
    }

    trace!("Command: {:?}", command);
    match dispatcher.handle(&command) {
        Ok(Some(reply)) => {
            if let McuReply::Shutdown(reason) = reply {
                warn!("Shutdown: {:?}", reason);
            }
            REPLY_CHANNEL.send(reply).await;
        }
        Ok(None) => {}
        Err(DispatchError::Alloc(e)) => error!("Object error: {:?}", e),
        Err(DispatchError::Frame(e)) => warn!("Frame error: {:?}", e),
        Err(DispatchError::Shutdown) => warn!("Rejected while shut down"),
    }
}

/// Enter shutdown from a firmware-side fault and tell the host
async fn abort(dispatcher: &mut FirmwareDispatcher, reason: ShutdownReason) {
    if dispatcher.shutdown(reason) {
        error!("Shutdown: {:?}", reason);
        REPLY_CHANNEL.send(McuReply::Shutdown(reason)).await;
    } else if let RunState::Shutdown(first) = dispatcher.state() {
        debug!("Already shut down ({:?})", first);
    }
}
