//! Inter-task communication channels

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use i8080_protocol::McuReply;

/// Replies queued for the host; the RX task waits when it is full
const REPLY_CHANNEL_SIZE: usize = 4;

/// Replies from the dispatcher to the host TX task
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, McuReply, REPLY_CHANNEL_SIZE> =
    Channel::new();
