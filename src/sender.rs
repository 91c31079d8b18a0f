//! Built-in sender
//! If you want to drive the controller through something other than a PCF8574 backpack,
//! implement [`SendCommand`] for it

use embedded_hal::delay::DelayNs;

use crate::command::{Command, State};

mod i2c_sender;

pub use i2c_sender::{I2cSender, DEFAULT_ADDRESS};

/// Settle time after every raw bus write, in microseconds
pub const WRITE_SETTLE_US: u32 = 200;
/// How long Enable stays high, in microseconds
pub const STROBE_HIGH_US: u32 = 500;
/// Wait after Enable drops, in microseconds
pub const STROBE_LOW_US: u32 = 200;

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
///
/// There is no busy flag read back, a sender paces itself with fixed delays only.
pub trait SendCommand<Delayer: DelayNs> {
    /// Error of the underlying transport
    type Error;

    /// Transmit one [`Command`] to the controller
    fn send(&mut self, command: Command, delayer: &mut Delayer) -> Result<(), Self::Error>;

    /// Send command, then wait specific duration
    fn send_and_delay(
        &mut self,
        command: Command,
        delayer: &mut Delayer,
        delay_us: u32,
    ) -> Result<(), Self::Error> {
        self.send(command, delayer)?;
        delayer.delay_us(delay_us);
        Ok(())
    }

    /// Backlight state the sender currently applies
    fn get_backlight(&self) -> State;

    /// Switch the backlight.
    ///
    /// Note:
    /// If a driver has no backlight control, just record the state and return `Ok`
    fn set_backlight(&mut self, backlight: State, delayer: &mut Delayer)
        -> Result<(), Self::Error>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory bus, delayer and sender shared by the unit tests

    use core::cell::RefCell;
    use std::vec::Vec;

    use embedded_hal::{
        delay::DelayNs,
        i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress},
    };

    use super::SendCommand;
    use crate::{
        command::{Command, CommandSet, State},
        error::Error,
    };

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Event {
        Write(u8, u8),
        DelayUs(u32),
        Command(Command),
        Backlight(State),
    }

    /// Shared, ordered log of everything that reached the fakes
    #[derive(Default)]
    pub(crate) struct Recorder {
        events: RefCell<Vec<Event>>,
        // number of successful operations before the fakes start failing
        fail_after: RefCell<Option<usize>>,
    }

    impl Recorder {
        pub(crate) fn fail_after(&self, successes: usize) {
            *self.fail_after.borrow_mut() = Some(successes);
        }

        pub(crate) fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        pub(crate) fn clear(&self) {
            self.events.borrow_mut().clear();
        }

        pub(crate) fn writes(&self) -> Vec<u8> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    Event::Write(_, byte) => Some(byte),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn commands(&self) -> Vec<Command> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    Event::Command(command) => Some(command),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn total_delay_us(&self) -> u32 {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    Event::DelayUs(us) => Some(us),
                    _ => None,
                })
                .sum()
        }

        fn record(&self, event: Event) -> Result<(), ErrorKind> {
            let mut fail_after = self.fail_after.borrow_mut();
            if let Some(remaining) = fail_after.as_mut() {
                if *remaining == 0 {
                    return Err(ErrorKind::Other);
                }
                *remaining -= 1;
            }
            self.events.borrow_mut().push(event);
            Ok(())
        }

        fn record_delay(&self, us: u32) {
            self.events.borrow_mut().push(Event::DelayUs(us));
        }
    }

    pub(crate) fn bytes_of(commands: &[CommandSet]) -> Vec<u8> {
        commands
            .iter()
            .map(|&command| Command::from(command).get_byte())
            .collect()
    }

    pub(crate) struct FakeBus<'r>(pub(crate) &'r Recorder);

    impl ErrorType for FakeBus<'_> {
        type Error = ErrorKind;
    }

    impl I2c<SevenBitAddress> for FakeBus<'_> {
        fn transaction(
            &mut self,
            address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for operation in operations {
                if let Operation::Write(bytes) = operation {
                    for &byte in bytes.iter() {
                        self.0.record(Event::Write(address, byte))?;
                    }
                }
            }
            Ok(())
        }
    }

    pub(crate) struct FakeDelay<'r>(pub(crate) &'r Recorder);

    impl DelayNs for FakeDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.0.record_delay(ns / 1_000);
        }

        fn delay_us(&mut self, us: u32) {
            self.0.record_delay(us);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.0.record_delay(ms * 1_000);
        }
    }

    /// Sender that logs whole commands instead of bus bytes
    pub(crate) struct RecordingSender<'r> {
        recorder: &'r Recorder,
        backlight: State,
    }

    impl<'r> RecordingSender<'r> {
        pub(crate) fn new(recorder: &'r Recorder) -> Self {
            Self {
                recorder,
                backlight: State::On,
            }
        }
    }

    impl<D: DelayNs> SendCommand<D> for RecordingSender<'_> {
        type Error = Error<ErrorKind>;

        fn send(&mut self, command: Command, _delayer: &mut D) -> Result<(), Self::Error> {
            self.recorder
                .record(Event::Command(command))
                .map_err(Error::Bus)
        }

        fn get_backlight(&self) -> State {
            self.backlight
        }

        fn set_backlight(&mut self, backlight: State, _delayer: &mut D) -> Result<(), Self::Error> {
            self.backlight = backlight;
            self.recorder
                .record(Event::Backlight(backlight))
                .map_err(Error::Bus)
        }
    }
}
