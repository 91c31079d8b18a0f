use embedded_hal::delay::DelayNs;

use crate::{
    charset::CharTable,
    command::{CommandSet, DataWidth, Font, LineMode, MoveDirection, ShiftType, State},
    lcd::Lcd,
    sender::SendCommand,
    state::LcdState,
};

/// Wait after each of the three "back to 8 bit" resets, the datasheet asks for more than 4.1 ms
pub const RESET_DELAY_US: u32 = 5_000;
/// Wait after switching to 4 bit mode
pub const FOUR_BIT_SETTLE_MS: u32 = 100;
/// Wait after the whole init sequence
pub const INIT_SETTLE_MS: u32 = 200;

/// [`Config`] is the init config of a [`Lcd`]
#[derive(Default)]
pub struct Config {
    state: LcdState,
    char_table: CharTable,
}

#[allow(missing_docs)]
impl Config {
    pub fn get_rows(&self) -> u8 {
        self.state.get_rows()
    }

    /// Row count, clamped to `1..=4`
    pub fn set_rows(mut self, rows: u8) -> Self {
        self.state.set_rows(rows);
        self
    }

    pub fn get_cols(&self) -> u8 {
        self.state.get_cols()
    }

    pub fn set_cols(mut self, cols: u8) -> Self {
        self.state.set_cols(cols);
        self
    }

    pub fn get_backlight(&self) -> State {
        self.state.get_backlight()
    }

    pub fn set_backlight(mut self, backlight: State) -> Self {
        self.state.set_backlight(backlight);
        self
    }

    pub fn get_char_table(&self) -> CharTable {
        self.char_table
    }

    pub fn set_char_table(mut self, char_table: CharTable) -> Self {
        self.char_table = char_table;
        self
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and init LCD hardware
    ///
    /// The display comes up on, cursor hidden, cleared, writing left to right.
    pub fn new(
        sender: &'a mut Sender,
        delayer: &'b mut Delayer,
        config: Config,
    ) -> Result<Self, Sender::Error> {
        let Config { state, char_table } = config;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "lcd init: {} rows x {} cols",
            state.get_rows(),
            state.get_cols()
        );

        // the backlight bit rides along with every nibble, so settle it first
        if sender.get_backlight() != state.get_backlight() {
            sender.set_backlight(state.get_backlight(), delayer)?;
        }

        // whatever mode the controller powered up in, three resets put it
        // in 8 bit mode and the fourth byte drops it into 4 bit mode;
        // this order must not change
        for _ in 0..3 {
            sender.send_and_delay(CommandSet::ResetTo8Bit.into(), delayer, RESET_DELAY_US)?;
        }
        sender.send_and_delay(
            CommandSet::SetTo4Bit.into(),
            delayer,
            FOUR_BIT_SETTLE_MS * 1_000,
        )?;

        sender.send(
            CommandSet::FunctionSet(DataWidth::Bit4, LineMode::TwoLine, Font::Font5x8).into(),
            delayer,
        )?;

        sender.send(
            CommandSet::DisplayOnOff {
                display: State::On,
                cursor: State::Off,
                cursor_blink: State::Off,
            }
            .into(),
            delayer,
        )?;

        sender.send(CommandSet::ClearDisplay.into(), delayer)?;

        sender.send_and_delay(
            CommandSet::EntryModeSet(MoveDirection::LeftToRight, ShiftType::CursorOnly).into(),
            delayer,
            INIT_SETTLE_MS * 1_000,
        )?;

        Ok(Lcd {
            sender,
            delayer,
            state,
            char_table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        charset::CYRILLIC,
        command::{Command, CursorMode},
        sender::fake::{bytes_of, Event, FakeDelay, Recorder, RecordingSender},
    };

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.get_rows(), 4);
        assert_eq!(config.get_cols(), 16);
        assert_eq!(config.get_backlight(), State::On);
        assert!(config.get_char_table().is_empty());
    }

    #[test]
    fn config_clamps_rows() {
        let config = Config::default()
            .set_rows(9)
            .set_cols(20)
            .set_char_table(CYRILLIC);
        assert_eq!(config.get_rows(), 4);
        assert_eq!(config.get_cols(), 20);
        assert_eq!(config.get_char_table().len(), 66);
    }

    #[test]
    fn init_handshake_order_and_delays() {
        let recorder = Recorder::default();
        let mut sender = RecordingSender::new(&recorder);
        let mut delay = FakeDelay(&recorder);

        let lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        assert_eq!(lcd.get_cursor_pos(), (0, 0));
        assert_eq!(lcd.get_display_state(), State::On);
        assert_eq!(lcd.get_cursor_mode(), CursorMode::Hidden);

        let reset = Command::from(CommandSet::ResetTo8Bit);
        let four_bit = Command::from(CommandSet::SetTo4Bit);
        let events = recorder.events();

        assert_eq!(
            events[..8],
            [
                Event::Command(reset),
                Event::DelayUs(RESET_DELAY_US),
                Event::Command(reset),
                Event::DelayUs(RESET_DELAY_US),
                Event::Command(reset),
                Event::DelayUs(RESET_DELAY_US),
                Event::Command(four_bit),
                Event::DelayUs(FOUR_BIT_SETTLE_MS * 1_000),
            ]
        );
        assert_eq!(events.last(), Some(&Event::DelayUs(INIT_SETTLE_MS * 1_000)));

        let bytes: Vec<u8> = recorder.commands().iter().map(|c| c.get_byte()).collect();
        let mut expected = vec![0x03, 0x03, 0x03, 0x02];
        expected.extend(bytes_of(&[
            CommandSet::FunctionSet(DataWidth::Bit4, LineMode::TwoLine, Font::Font5x8),
            CommandSet::DisplayOnOff {
                display: State::On,
                cursor: State::Off,
                cursor_blink: State::Off,
            },
            CommandSet::ClearDisplay,
            CommandSet::EntryModeSet(MoveDirection::LeftToRight, ShiftType::CursorOnly),
        ]));
        assert_eq!(bytes, expected);
        assert_eq!(bytes[4..], [0x28u8, 0x0C, 0x01, 0x06]);
    }

    #[test]
    fn backlight_off_is_applied_before_handshake() {
        let recorder = Recorder::default();
        let mut sender = RecordingSender::new(&recorder);
        let mut delay = FakeDelay(&recorder);

        let lcd = Lcd::new(
            &mut sender,
            &mut delay,
            Config::default().set_backlight(State::Off),
        )
        .unwrap();

        assert_eq!(lcd.get_backlight(), State::Off);
        assert_eq!(recorder.events()[0], Event::Backlight(State::Off));
    }

    #[test]
    fn failed_handshake_is_reported() {
        let recorder = Recorder::default();
        recorder.fail_after(2);
        let mut sender = RecordingSender::new(&recorder);
        let mut delay = FakeDelay(&recorder);

        assert!(Lcd::new(&mut sender, &mut delay, Config::default()).is_err());
        assert_eq!(recorder.commands().len(), 2);
    }
}
