//! Message types for the host command link
//!
//! Message types are divided into two categories:
//! - Host → MCU: object configuration and bus commands
//! - MCU → Host: readback results and completion notices

use crate::frame::{Frame, FrameError, PayloadReader, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Message type IDs: Host → MCU
pub const MSG_CONFIG: u8 = 0x01;
pub const MSG_SEND_CMD: u8 = 0x02;
pub const MSG_SEND_CMD_PARAM: u8 = 0x03;
pub const MSG_READ_DATA: u8 = 0x04;
pub const MSG_FILL: u8 = 0x05;
pub const MSG_SEND_DATA16: u8 = 0x06;
pub const MSG_SEND_FILL: u8 = 0x07;
pub const MSG_EMERGENCY_STOP: u8 = 0x0F;

// Message type IDs: MCU → Host
pub const MSG_READ_DATA_OUT: u8 = 0x81;
pub const MSG_FILL_DONE: u8 = 0x82;
pub const MSG_SHUTDOWN: u8 = 0x8F;

/// Number of word fields in a `read_data_out` reply
pub const READ_DATA_WORDS: usize = 8;

/// Commands from the host, borrowing byte-string arguments from the frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand<'a> {
    /// Bind `oid` to an i8080 bus device
    Config { oid: u8 },
    /// Register-select strobe only
    SendCmd { oid: u8, cmd: u16 },
    /// Register-select strobe followed by a parameter burst
    SendCmdParam { oid: u8, cmd: u16, param: &'a [u8] },
    /// Register-select strobe followed by up to 8 read strobes
    ReadData { oid: u8, cmd: u8, count: u8 },
    /// Square fill demo with the given scale factor
    Fill { oid: u8, factor: u8 },
    /// Raw data burst; each big-endian byte pair is one word
    SendData16 { oid: u8, data: &'a [u8] },
    /// Repeat one data word `count` times
    SendFill { oid: u8, color: u16, count: u16 },
    /// Enter shutdown
    EmergencyStop,
}

impl<'a> HostCommand<'a> {
    /// Parse a command from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let mut r = PayloadReader::new(&frame.payload);

        let cmd = match frame.msg_type {
            MSG_CONFIG => HostCommand::Config { oid: r.u8()? },
            MSG_SEND_CMD => HostCommand::SendCmd {
                oid: r.u8()?,
                cmd: r.u16()?,
            },
            MSG_SEND_CMD_PARAM => HostCommand::SendCmdParam {
                oid: r.u8()?,
                cmd: r.u16()?,
                param: r.bytes()?,
            },
            MSG_READ_DATA => HostCommand::ReadData {
                oid: r.u8()?,
                cmd: r.u8()?,
                count: r.u8()?,
            },
            MSG_FILL => HostCommand::Fill {
                oid: r.u8()?,
                factor: r.u8()?,
            },
            MSG_SEND_DATA16 => {
                let oid = r.u8()?;
                let data = r.bytes()?;
                if data.len() % 2 != 0 {
                    return Err(FrameError::InvalidFrame);
                }
                HostCommand::SendData16 { oid, data }
            }
            MSG_SEND_FILL => HostCommand::SendFill {
                oid: r.u8()?,
                color: r.u16()?,
                count: r.u16()?,
            },
            MSG_EMERGENCY_STOP => HostCommand::EmergencyStop,
            other => return Err(FrameError::UnknownMessage(other)),
        };

        r.finish()?;
        Ok(cmd)
    }

    /// Encode this command into a frame (host side and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        let msg_type = match self {
            HostCommand::Config { oid } => {
                push(&mut payload, &[*oid])?;
                MSG_CONFIG
            }
            HostCommand::SendCmd { oid, cmd } => {
                push(&mut payload, &[*oid])?;
                push(&mut payload, &cmd.to_le_bytes())?;
                MSG_SEND_CMD
            }
            HostCommand::SendCmdParam { oid, cmd, param } => {
                push(&mut payload, &[*oid])?;
                push(&mut payload, &cmd.to_le_bytes())?;
                push_bytes(&mut payload, param)?;
                MSG_SEND_CMD_PARAM
            }
            HostCommand::ReadData { oid, cmd, count } => {
                push(&mut payload, &[*oid, *cmd, *count])?;
                MSG_READ_DATA
            }
            HostCommand::Fill { oid, factor } => {
                push(&mut payload, &[*oid, *factor])?;
                MSG_FILL
            }
            HostCommand::SendData16 { oid, data } => {
                push(&mut payload, &[*oid])?;
                push_bytes(&mut payload, data)?;
                MSG_SEND_DATA16
            }
            HostCommand::SendFill { oid, color, count } => {
                push(&mut payload, &[*oid])?;
                push(&mut payload, &color.to_le_bytes())?;
                push(&mut payload, &count.to_le_bytes())?;
                MSG_SEND_FILL
            }
            HostCommand::EmergencyStop => MSG_EMERGENCY_STOP,
        };
        Ok(Frame { msg_type, payload })
    }
}

fn push(payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>, bytes: &[u8]) -> Result<(), FrameError> {
    payload
        .extend_from_slice(bytes)
        .map_err(|_| FrameError::PayloadTooLarge)
}

fn push_bytes(payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>, bytes: &[u8]) -> Result<(), FrameError> {
    let len = u8::try_from(bytes.len()).map_err(|_| FrameError::PayloadTooLarge)?;
    push(payload, &[len])?;
    push(payload, bytes)
}

/// Why the MCU entered shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShutdownReason {
    /// Host sent `emergency_stop`
    EmergencyStop,
    /// Firmware-detected fault (serial link failure)
    Fault,
}

impl ShutdownReason {
    pub fn to_byte(self) -> u8 {
        match self {
            ShutdownReason::EmergencyStop => 0x01,
            ShutdownReason::Fault => 0x02,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(ShutdownReason::EmergencyStop),
            0x02 => Some(ShutdownReason::Fault),
            _ => None,
        }
    }
}

/// Replies from the MCU to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum McuReply {
    /// Readback result: register code and 8 word slots, zero-padded
    ReadDataOut {
        cmd: u8,
        words: [u16; READ_DATA_WORDS],
    },
    /// Fill demo finished
    FillDone,
    /// MCU has entered shutdown
    Shutdown(ShutdownReason),
}

impl McuReply {
    /// Encode this reply into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            McuReply::ReadDataOut { cmd, words } => {
                // Payload: [cmd][d1 lo][d1 hi]...[d8 lo][d8 hi]
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                push(&mut payload, &[*cmd])?;
                for word in words {
                    push(&mut payload, &word.to_le_bytes())?;
                }
                Ok(Frame {
                    msg_type: MSG_READ_DATA_OUT,
                    payload,
                })
            }
            McuReply::FillDone => Ok(Frame::empty(MSG_FILL_DONE)),
            McuReply::Shutdown(reason) => Frame::new(MSG_SHUTDOWN, &[reason.to_byte()]),
        }
    }

    /// Parse a reply from a frame (host side and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let mut r = PayloadReader::new(&frame.payload);

        let reply = match frame.msg_type {
            MSG_READ_DATA_OUT => {
                let cmd = r.u8()?;
                let mut words = [0u16; READ_DATA_WORDS];
                for word in words.iter_mut() {
                    *word = r.u16()?;
                }
                McuReply::ReadDataOut { cmd, words }
            }
            MSG_FILL_DONE => McuReply::FillDone,
            MSG_SHUTDOWN => {
                let reason = ShutdownReason::from_byte(r.u8()?).ok_or(FrameError::InvalidFrame)?;
                McuReply::Shutdown(reason)
            }
            other => return Err(FrameError::UnknownMessage(other)),
        };

        r.finish()?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_send_cmd_param() {
        let frame = Frame::new(MSG_SEND_CMD_PARAM, &[1, 0x2A, 0x00, 4, 0, 1, 0, 2]).unwrap();
        let cmd = HostCommand::from_frame(&frame).unwrap();
        assert_eq!(
            cmd,
            HostCommand::SendCmdParam {
                oid: 1,
                cmd: 0x2A,
                param: &[0, 1, 0, 2],
            }
        );
    }

    #[test]
    fn test_decode_read_data() {
        let frame = Frame::new(MSG_READ_DATA, &[2, 0xA1, 5]).unwrap();
        assert_eq!(
            HostCommand::from_frame(&frame),
            Ok(HostCommand::ReadData {
                oid: 2,
                cmd: 0xA1,
                count: 5,
            })
        );
    }

    #[test]
    fn test_decode_emergency_stop() {
        let frame = Frame::empty(MSG_EMERGENCY_STOP);
        let cmd = HostCommand::from_frame(&frame).unwrap();
        assert_eq!(cmd, HostCommand::EmergencyStop);
    }

    #[test]
    fn test_decode_truncated_command() {
        let frame = Frame::new(MSG_SEND_CMD, &[1, 0x2A]).unwrap();
        assert_eq!(HostCommand::from_frame(&frame), Err(FrameError::Truncated));
    }

    #[test]
    fn test_decode_trailing_bytes_rejected() {
        let frame = Frame::new(MSG_FILL, &[1, 4, 9]).unwrap();
        assert_eq!(HostCommand::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_decode_unknown_type() {
        let frame = Frame::empty(0x42);
        assert_eq!(
            HostCommand::from_frame(&frame),
            Err(FrameError::UnknownMessage(0x42))
        );
    }

    #[test]
    fn test_decode_send_data16_odd_length() {
        let frame = Frame::new(MSG_SEND_DATA16, &[1, 3, 0x07, 0x60, 0x00]).unwrap();
        assert_eq!(HostCommand::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_read_data_out_layout() {
        let reply = McuReply::ReadDataOut {
            cmd: 0xB1,
            words: [0x1234, 2, 3, 0, 0, 0, 0, 0],
        };
        let frame = reply.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_READ_DATA_OUT);
        assert_eq!(frame.payload.len(), 1 + 2 * READ_DATA_WORDS);
        assert_eq!(&frame.payload[..5], &[0xB1, 0x34, 0x12, 2, 0]);
        assert_eq!(McuReply::from_frame(&frame), Ok(reply));
    }

    #[test]
    fn test_fill_done_is_empty() {
        let frame = McuReply::FillDone.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_FILL_DONE);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_shutdown_reply() {
        let frame = McuReply::Shutdown(ShutdownReason::EmergencyStop).to_frame().unwrap();
        assert_eq!(frame.payload.as_slice(), &[0x01]);
        assert_eq!(
            McuReply::from_frame(&frame),
            Ok(McuReply::Shutdown(ShutdownReason::EmergencyStop))
        );
    }

    proptest! {
        #[test]
        fn prop_send_cmd_param_survives_framing(
            oid in any::<u8>(),
            cmd in any::<u16>(),
            param in proptest::collection::vec(any::<u8>(), 0..200),
        ) {
            let original = HostCommand::SendCmdParam { oid, cmd, param: &param };
            let frame = original.to_frame().unwrap();
            prop_assert_eq!(HostCommand::from_frame(&frame).unwrap(), original);
        }
    }
}
