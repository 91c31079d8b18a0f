use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::{
    charset::CharTable,
    command::{CommandSet, CursorMode, MoveDirection, ShiftType, State},
    sender::SendCommand,
    state::{cgram_slot_addr, LcdState},
};

mod init;

pub use init::{Config, FOUR_BIT_SETTLE_MS, INIT_SETTLE_MS, RESET_DELAY_US};

/// Wait after return home or clear, the controller's slowest instructions
pub const HOME_DELAY_MS: u32 = 1_000;
/// Wait after the cursor mode changes
pub const CURSOR_MODE_DELAY_MS: u32 = 50;

/// A character display session.
///
/// It borrows the sender and the delayer for its whole life and keeps a soft
/// copy of the cursor position and display modes. Any `Err` leaves that copy
/// ahead of the hardware; call [`Lcd::set_cursor_pos`] to bring them back in line.
pub struct Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    state: LcdState,
    char_table: CharTable,
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    fn send(&mut self, command: CommandSet) -> Result<(), Sender::Error> {
        self.sender.send(command.into(), self.delayer)
    }

    fn send_and_delay_ms(&mut self, command: CommandSet, ms: u32) -> Result<(), Sender::Error> {
        self.sender
            .send_and_delay(command.into(), self.delayer, ms * 1_000)
    }

    fn write_codes(&mut self, codes: impl Iterator<Item = u8>) -> Result<(), Sender::Error> {
        for code in codes {
            self.send(CommandSet::WriteDataToRAM(code))?;
        }
        Ok(())
    }

    /// Write `text` starting at `(row, col)`.
    ///
    /// Row is clamped to the last row, col is sent as is.
    pub fn write_str_at(&mut self, text: &str, row: u8, col: u8) -> Result<(), Sender::Error> {
        let addr = self.state.move_to(row, col);
        self.state.advance(text.chars().count());

        self.send(CommandSet::SetDDRAM(addr))?;

        let table = self.char_table;
        self.write_codes(table.encode(text))
    }

    /// Write `text` wherever the controller's address counter points
    pub fn write_str_at_cursor(&mut self, text: &str) -> Result<(), Sender::Error> {
        self.state.advance(text.chars().count());

        let table = self.char_table;
        self.write_codes(table.encode(text))
    }

    /// Write one character at `(row, col)`, through the character table
    pub fn write_localized_char_at(
        &mut self,
        ch: char,
        row: u8,
        col: u8,
    ) -> Result<(), Sender::Error> {
        let code = self.char_table.remap(ch);
        let addr = self.state.move_to(row, col);
        self.state.advance(1);

        self.send(CommandSet::SetDDRAM(addr))?;
        self.send(CommandSet::WriteDataToRAM(code))
    }

    /// Fill the first two rows from their first column
    pub fn write_localized_lines(&mut self, line1: &str, line2: &str) -> Result<(), Sender::Error> {
        self.write_str_at(line1, 0, 0)?;
        self.write_str_at(line2, 1, 0)
    }

    /// Move the cursor to `(row, col)`; row is clamped, col is not checked
    pub fn set_cursor_pos(&mut self, row: u8, col: u8) -> Result<(), Sender::Error> {
        let addr = self.state.move_to(row, col);

        #[cfg(feature = "defmt")]
        defmt::trace!("cursor -> {}", self.state.get_cursor_pos());

        self.send(CommandSet::SetDDRAM(addr))
    }

    /// (row, col) of the last commanded position
    pub fn get_cursor_pos(&self) -> (u8, u8) {
        self.state.get_cursor_pos()
    }

    #[allow(missing_docs)]
    pub fn get_row(&self) -> u8 {
        self.state.get_cursor_pos().0
    }

    #[allow(missing_docs)]
    pub fn get_col(&self) -> u8 {
        self.state.get_cursor_pos().1
    }

    /// Return cursor and display window to the top left corner
    pub fn home(&mut self) -> Result<(), Sender::Error> {
        self.state.return_home();
        self.send_and_delay_ms(CommandSet::ReturnHome, HOME_DELAY_MS)
    }

    /// Blank the display and return home
    pub fn clear(&mut self) -> Result<(), Sender::Error> {
        self.state.return_home();
        self.send(CommandSet::ClearDisplay)?;
        self.send_and_delay_ms(CommandSet::ReturnHome, HOME_DELAY_MS)
    }

    /// Show the cursor in `mode`.
    ///
    /// The display-on bit always goes out with the cursor flags, so this also
    /// turns a switched-off display back on.
    pub fn set_cursor_mode(&mut self, mode: CursorMode) -> Result<(), Sender::Error> {
        self.state.set_cursor_mode(mode);
        self.state.set_display_state(State::On);

        #[cfg(feature = "defmt")]
        defmt::trace!("cursor mode -> {}", mode);

        let (cursor, cursor_blink) = mode.flags();
        self.send_and_delay_ms(
            CommandSet::DisplayOnOff {
                display: State::On,
                cursor,
                cursor_blink,
            },
            CURSOR_MODE_DELAY_MS,
        )
    }

    #[allow(missing_docs)]
    pub fn get_cursor_mode(&self) -> CursorMode {
        self.state.get_cursor_mode()
    }

    #[allow(missing_docs)]
    pub fn cursor_on(&mut self) -> Result<(), Sender::Error> {
        self.set_cursor_mode(CursorMode::Solid)
    }

    #[allow(missing_docs)]
    pub fn cursor_blink(&mut self) -> Result<(), Sender::Error> {
        self.set_cursor_mode(CursorMode::Blinking)
    }

    #[allow(missing_docs)]
    pub fn cursor_off(&mut self) -> Result<(), Sender::Error> {
        self.set_cursor_mode(CursorMode::Hidden)
    }

    /// Switch the whole display on or off, DDRAM content is kept.
    ///
    /// The command carries no cursor flags: after switching back on, call one of
    /// the cursor methods again if the cursor should be visible.
    pub fn set_display_state(&mut self, display: State) -> Result<(), Sender::Error> {
        self.state.set_display_state(display);

        self.send(CommandSet::DisplayOnOff {
            display,
            cursor: State::Off,
            cursor_blink: State::Off,
        })
    }

    #[allow(missing_docs)]
    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    #[allow(missing_docs)]
    pub fn display_on(&mut self) -> Result<(), Sender::Error> {
        self.set_display_state(State::On)
    }

    #[allow(missing_docs)]
    pub fn display_off(&mut self) -> Result<(), Sender::Error> {
        self.set_display_state(State::Off)
    }

    /// Switch the backlight LED
    pub fn set_backlight(&mut self, backlight: State) -> Result<(), Sender::Error> {
        self.state.set_backlight(backlight);

        #[cfg(feature = "defmt")]
        defmt::trace!("backlight -> {}", backlight);

        self.sender.set_backlight(backlight, self.delayer)
    }

    #[allow(missing_docs)]
    pub fn get_backlight(&self) -> State {
        self.state.get_backlight()
    }

    #[allow(missing_docs)]
    pub fn backlight_on(&mut self) -> Result<(), Sender::Error> {
        self.set_backlight(State::On)
    }

    #[allow(missing_docs)]
    pub fn backlight_off(&mut self) -> Result<(), Sender::Error> {
        self.set_backlight(State::Off)
    }

    /// Shift the whole display window one cell to the left
    pub fn move_display_left(&mut self) -> Result<(), Sender::Error> {
        self.shift_display(MoveDirection::RightToLeft)
    }

    /// Shift the whole display window one cell to the right
    pub fn move_display_right(&mut self) -> Result<(), Sender::Error> {
        self.shift_display(MoveDirection::LeftToRight)
    }

    fn shift_display(&mut self, dir: MoveDirection) -> Result<(), Sender::Error> {
        self.state.shift_display(dir);
        self.send(CommandSet::CursorOrDisplayShift(
            ShiftType::CursorAndDisplay,
            dir,
        ))
    }

    /// How many cells the display window is shifted right, `0..40`
    pub fn get_display_offset(&self) -> u8 {
        self.state.get_display_offset()
    }

    /// Store a 5x8 glyph in CGRAM slot `slot & 7`.
    ///
    /// The controller is left addressing CGRAM: position the cursor before
    /// writing text at the cursor again.
    pub fn define_custom_char(&mut self, slot: u8, pattern: &[u8; 8]) -> Result<(), Sender::Error> {
        self.send(CommandSet::SetCGRAM(cgram_slot_addr(slot)))?;
        self.write_codes(pattern.iter().copied())
    }

    #[allow(missing_docs)]
    pub fn get_rows(&self) -> u8 {
        self.state.get_rows()
    }

    #[allow(missing_docs)]
    pub fn get_cols(&self) -> u8 {
        self.state.get_cols()
    }

    /// Base DDRAM address of each row
    pub fn get_row_offsets(&self) -> [u8; 4] {
        self.state.get_row_offsets()
    }

    /// Change the column count; row offsets follow
    pub fn set_cols(&mut self, cols: u8) {
        self.state.set_cols(cols);
    }

    #[allow(missing_docs)]
    pub fn get_char_table(&self) -> CharTable {
        self.char_table
    }

    /// Swap the table used by every text method
    pub fn set_char_table(&mut self, char_table: CharTable) {
        self.char_table = char_table;
    }

    /// Wait for specified milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }
}

impl<Sender, Delayer> fmt::Write for Lcd<'_, '_, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_str_at_cursor(s).map_err(|_| fmt::Error)
    }
}
