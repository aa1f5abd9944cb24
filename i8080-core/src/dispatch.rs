//! Command dispatch
//!
//! Maps decoded host commands onto bus strobes. Every handler runs to
//! completion before returning; a large `fill` therefore holds up whatever
//! command comes next, including an emergency stop.
//!
//! # Preconditions
//!
//! Data commands (`send_cmd`, `send_cmd_param`, `read_data`, `fill`,
//! `send_data16`, `send_fill`) do not check that their object id was
//! configured. They drive the bus regardless, against whatever electrical
//! setup is in effect. The host must issue `config` first.

use i8080_hal::{BusEnable, I8080Bus, OutputFactory};
use i8080_protocol::{Frame, FrameError, HostCommand, McuReply, ShutdownReason, READ_DATA_WORDS};

use crate::config::{DeviceDefaults, MAX_OBJECTS};
use crate::device::I8080Device;
use crate::objects::{AllocError, ObjectKind, ObjectTable};
use crate::ssd1963::{cmd, Window, FILL_COLOR};
use crate::state::RunState;

/// Object kind created by `config_i8080`
pub const I8080_KIND: ObjectKind = ObjectKind::new("config_i8080");

/// Errors surfaced by dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Object table rejected the id
    Alloc(AllocError),
    /// Frame could not be decoded into a command
    Frame(FrameError),
    /// Configuration was refused because the firmware is shut down
    Shutdown,
}

impl From<AllocError> for DispatchError {
    fn from(e: AllocError) -> Self {
        DispatchError::Alloc(e)
    }
}

impl From<FrameError> for DispatchError {
    fn from(e: FrameError) -> Self {
        DispatchError::Frame(e)
    }
}

/// Outcome of a successful `config_i8080`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configured {
    pub oid: u8,
    /// A different object id had already enabled the shared bus; its
    /// timing has just been reprogrammed.
    pub shared_bus_reconfigured: bool,
}

/// Owns the bus, its collaborators and the object table
pub struct Dispatcher<B, E, G, const N: usize = MAX_OBJECTS>
where
    G: OutputFactory,
{
    bus: B,
    enable: E,
    gpio: G,
    defaults: DeviceDefaults,
    objects: ObjectTable<I8080Device<G::Output>, N>,
    state: RunState,
    bus_owner: Option<u8>,
}

impl<B, E, G, const N: usize> Dispatcher<B, E, G, N>
where
    B: I8080Bus,
    E: BusEnable,
    G: OutputFactory,
{
    pub fn new(bus: B, enable: E, gpio: G, defaults: DeviceDefaults) -> Self {
        Self {
            bus,
            enable,
            gpio,
            defaults,
            objects: ObjectTable::new(),
            state: RunState::Active,
            bus_owner: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_enable(&self) -> &E {
        &self.enable
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Resolve a configured device
    pub fn device(&self, oid: u8) -> Result<&I8080Device<G::Output>, DispatchError> {
        Ok(self.objects.lookup(oid, I8080_KIND)?)
    }

    /// `config_i8080`: bind `oid` to a device and enable the bus for it
    ///
    /// Re-running for the same id re-creates the device and enables the bus
    /// again. Running it for a second id reprograms the shared bus timing.
    /// Refused once shut down, so quiesced devices stay quiesced.
    pub fn configure(&mut self, oid: u8) -> Result<Configured, DispatchError> {
        if self.state.is_shutdown() {
            return Err(DispatchError::Shutdown);
        }

        let defaults = self.defaults;
        let gpio = &mut self.gpio;
        let device = self
            .objects
            .allocate(oid, I8080_KIND, || I8080Device::setup(gpio, &defaults))?;

        self.enable.enable_bus(device.cs_pin(), device.rs_pin());

        let previous = self.bus_owner.replace(oid);
        Ok(Configured {
            oid,
            shared_bus_reconfigured: previous.is_some_and(|p| p != oid),
        })
    }

    /// `send_cmd`: one register-select strobe
    pub fn send_cmd(&mut self, _oid: u8, cmd: u16) {
        self.bus.write_register(cmd);
    }

    /// `send_cmd_param`: register strobe, then all but the last parameter
    ///
    /// Each parameter byte is one data word. The burst length is the
    /// declared length minus one, so the final byte is never sent.
    pub fn send_cmd_param(&mut self, _oid: u8, cmd: u16, param: &[u8]) {
        self.bus.write_register(cmd);

        let sent = param.len().saturating_sub(1);
        for &byte in &param[..sent] {
            self.bus.write_data(u16::from(byte));
        }
    }

    /// `read_data`: select `cmd` and read up to 8 words back
    ///
    /// Slots past `count` are reported as zero.
    pub fn read_data(&mut self, _oid: u8, cmd: u8, count: u8) -> McuReply {
        let count = usize::from(count).min(READ_DATA_WORDS);
        let mut words = [0u16; READ_DATA_WORDS];
        self.bus
            .read_register_then_data(u16::from(cmd), &mut words[..count]);
        McuReply::ReadDataOut { cmd, words }
    }

    /// `fill`: paint the square `[f, f] .. [2f, 2f]` with the demo colour
    ///
    /// Issues `11 + f * f` strobes with no chunking: two window selects with
    /// four coordinate words each, the memory-write select, then the pixels.
    pub fn fill(&mut self, _oid: u8, factor: u8) -> McuReply {
        let window = Window::square(factor);

        self.bus.write_register(cmd::SET_COLUMN_ADDRESS);
        self.bus.write_data_burst(&window.column_words());
        self.bus.write_register(cmd::SET_PAGE_ADDRESS);
        self.bus.write_data_burst(&window.page_words());
        self.bus.write_register(cmd::WRITE_MEMORY_START);

        let pixels = u32::from(factor) * u32::from(factor);
        self.bus.write_data_repeat(FILL_COLOR, pixels);

        McuReply::FillDone
    }

    /// `send_data16`: one data strobe per big-endian byte pair
    pub fn send_data16(&mut self, _oid: u8, data: &[u8]) {
        for pair in data.chunks_exact(2) {
            self.bus.write_data(u16::from_be_bytes([pair[0], pair[1]]));
        }
    }

    /// `send_fill`: repeat `color` for `count` data strobes
    pub fn send_fill(&mut self, _oid: u8, color: u16, count: u16) {
        self.bus.write_data_repeat(color, u32::from(count));
    }

    /// Abort event: quiesce every configured device
    ///
    /// Clears each device's cs/rs pin ids. The backlight and the bus
    /// electrical setup are left as they are. Returns `false` if already
    /// shut down, in which case nothing changes.
    pub fn shutdown(&mut self, reason: ShutdownReason) -> bool {
        if self.state.is_shutdown() {
            return false;
        }
        self.state = self.state.abort(reason);

        for (_, device) in self.objects.iter_kind_mut(I8080_KIND) {
            device.quiesce();
        }
        true
    }

    /// Execute one decoded command, returning the reply to send, if any
    pub fn handle(&mut self, command: &HostCommand<'_>) -> Result<Option<McuReply>, DispatchError> {
        let reply = match *command {
            HostCommand::Config { oid } => {
                self.configure(oid)?;
                None
            }
            HostCommand::SendCmd { oid, cmd } => {
                self.send_cmd(oid, cmd);
                None
            }
            HostCommand::SendCmdParam { oid, cmd, param } => {
                self.send_cmd_param(oid, cmd, param);
                None
            }
            HostCommand::ReadData { oid, cmd, count } => Some(self.read_data(oid, cmd, count)),
            HostCommand::Fill { oid, factor } => Some(self.fill(oid, factor)),
            HostCommand::SendData16 { oid, data } => {
                self.send_data16(oid, data);
                None
            }
            HostCommand::SendFill { oid, color, count } => {
                self.send_fill(oid, color, count);
                None
            }
            HostCommand::EmergencyStop => self
                .shutdown(ShutdownReason::EmergencyStop)
                .then_some(McuReply::Shutdown(ShutdownReason::EmergencyStop)),
        };
        Ok(reply)
    }

    /// Decode and execute one frame
    pub fn handle_frame(&mut self, frame: &Frame) -> Result<Option<McuReply>, DispatchError> {
        let command = HostCommand::from_frame(frame)?;
        self.handle(&command)
    }
}
