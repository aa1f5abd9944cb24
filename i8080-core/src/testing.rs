//! Host-side stand-ins for the bus, bus enable and GPIO collaborators

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use i8080_hal::{BusEnable, I8080Bus, Level, OutputFactory, OutputPin, PinId};

/// One recorded bus cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strobe {
    Register(u16),
    Data(u16),
    Read(u16),
}

/// Bus that records every strobe and serves reads from a queue
///
/// Once the queue is empty, reads return `floating`, like an undriven bus.
#[derive(Debug, Default)]
pub struct RecordingBus {
    pub log: Vec<Strobe>,
    pub reads: VecDeque<u16>,
    pub floating: u16,
}

impl RecordingBus {
    pub fn with_reads(words: &[u16]) -> Self {
        Self {
            reads: words.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn register_strobes(&self) -> usize {
        self.log
            .iter()
            .filter(|s| matches!(s, Strobe::Register(_)))
            .count()
    }

    pub fn data_strobes(&self) -> usize {
        self.log.iter().filter(|s| matches!(s, Strobe::Data(_))).count()
    }

    pub fn read_strobes(&self) -> usize {
        self.log.iter().filter(|s| matches!(s, Strobe::Read(_))).count()
    }
}

impl I8080Bus for RecordingBus {
    fn write_register(&mut self, cmd: u16) {
        self.log.push(Strobe::Register(cmd));
    }

    fn write_data(&mut self, word: u16) {
        self.log.push(Strobe::Data(word));
    }

    fn read_data(&mut self) -> u16 {
        let word = self.reads.pop_front().unwrap_or(self.floating);
        self.log.push(Strobe::Read(word));
        word
    }
}

#[derive(Debug, Default)]
pub struct RecordingEnable {
    pub calls: Vec<(PinId, PinId)>,
}

impl BusEnable for RecordingEnable {
    fn enable_bus(&mut self, cs_pin: PinId, rs_pin: PinId) {
        self.calls.push((cs_pin, rs_pin));
    }
}

/// Pin event seen by [`MockGpio`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioEvent {
    Setup(PinId, Level),
    /// The output was dropped and its pin returned to the pool
    Release(PinId),
}

type EventLog = Rc<RefCell<Vec<GpioEvent>>>;

/// Output that logs its own release when dropped
#[derive(Debug)]
pub struct MockOutput {
    pub pin: PinId,
    pub high: bool,
    events: EventLog,
}

impl OutputPin for MockOutput {
    fn set_high(&mut self) {
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

impl Drop for MockOutput {
    fn drop(&mut self) {
        self.events.borrow_mut().push(GpioEvent::Release(self.pin));
    }
}

#[derive(Debug, Default)]
pub struct MockGpio {
    events: EventLog,
}

impl MockGpio {
    /// Every setup and release, in order
    pub fn events(&self) -> Vec<GpioEvent> {
        self.events.borrow().clone()
    }

    pub fn setups(&self) -> Vec<(PinId, Level)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match *e {
                GpioEvent::Setup(pin, level) => Some((pin, level)),
                GpioEvent::Release(_) => None,
            })
            .collect()
    }
}

impl OutputFactory for MockGpio {
    type Output = MockOutput;

    fn setup_output(&mut self, pin: PinId, initial: Level) -> MockOutput {
        self.events.borrow_mut().push(GpioEvent::Setup(pin, initial));
        MockOutput {
            pin,
            high: initial == Level::High,
            events: Rc::clone(&self.events),
        }
    }
}
