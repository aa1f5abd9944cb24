//! Host UART transmit task
//!
//! Encodes queued replies and writes them to the host.

use defmt::*;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::UartTx;

use i8080_hal_stm32f2::uart::UartBusError;
use i8080_protocol::{McuReply, MAX_FRAME_SIZE};

use crate::channels::REPLY_CHANNEL;

/// Host TX task - drains the reply channel
#[embassy_executor::task]
pub async fn host_tx_task(mut tx: UartTx<'static, Async>) {
    info!("Host TX task started");

    loop {
        let reply = REPLY_CHANNEL.receive().await;
        send_reply(&mut tx, &reply).await;
    }
}

async fn send_reply(tx: &mut UartTx<'static, Async>, reply: &McuReply) {
    let frame = match reply.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to encode reply: {:?}", e);
            return;
        }
    };

    let mut buf = [0u8; MAX_FRAME_SIZE];
    match frame.encode(&mut buf) {
        Ok(len) => {
            if let Err(e) = tx.write(&buf[..len]).await {
                warn!("Failed to send reply: {:?}", UartBusError::from(e));
            } else {
                trace!("Reply sent: {:?}", reply);
            }
        }
        Err(e) => warn!("Failed to frame reply: {:?}", e),
    }
}
