use crate::command::{CursorMode, MoveDirection, State};

/// Most rows a HD44780 can address
pub(crate) const MAX_ROWS: u8 = 4;

/// DDRAM cells per line in two line mode, the period of a display shift
pub(crate) const LINE_CAPACITY: u8 = 40;

/// Soft mirror of what the controller was last told.
///
/// Nothing here is read back from hardware. Every method only computes the
/// next state; the session is the one that sends the matching command.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LcdState {
    rows: u8,
    cols: u8,
    row_offsets: [u8; 4],
    backlight: State,
    display: State,
    cursor: CursorMode,
    // (row, col)
    cursor_pos: (u8, u8),
    display_offset: u8,
}

impl Default for LcdState {
    fn default() -> Self {
        Self::new(MAX_ROWS, 16)
    }
}

impl LcdState {
    pub(crate) fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows: clamp_rows(rows),
            cols,
            row_offsets: row_offsets(cols),
            backlight: State::On,
            display: State::On,
            cursor: CursorMode::Hidden,
            cursor_pos: (0, 0),
            display_offset: 0,
        }
    }

    pub(crate) fn get_rows(&self) -> u8 {
        self.rows
    }

    pub(crate) fn set_rows(&mut self, rows: u8) {
        self.rows = clamp_rows(rows);
        self.cursor_pos.0 = self.clamp_row(self.cursor_pos.0);
    }

    pub(crate) fn get_cols(&self) -> u8 {
        self.cols
    }

    pub(crate) fn set_cols(&mut self, cols: u8) {
        self.cols = cols;
        self.row_offsets = row_offsets(cols);
    }

    pub(crate) fn get_row_offsets(&self) -> [u8; 4] {
        self.row_offsets
    }

    pub(crate) fn get_backlight(&self) -> State {
        self.backlight
    }

    pub(crate) fn set_backlight(&mut self, backlight: State) {
        self.backlight = backlight;
    }

    pub(crate) fn get_display_state(&self) -> State {
        self.display
    }

    pub(crate) fn set_display_state(&mut self, display: State) {
        self.display = display;
    }

    pub(crate) fn get_cursor_mode(&self) -> CursorMode {
        self.cursor
    }

    pub(crate) fn set_cursor_mode(&mut self, cursor: CursorMode) {
        self.cursor = cursor;
    }

    pub(crate) fn get_cursor_pos(&self) -> (u8, u8) {
        self.cursor_pos
    }

    pub(crate) fn get_display_offset(&self) -> u8 {
        self.display_offset
    }

    /// Rows past the last one land on the last one
    pub(crate) fn clamp_row(&self, row: u8) -> u8 {
        row.min(self.rows - 1)
    }

    /// DDRAM address of `(row, col)`, row clamped, col taken as is
    pub(crate) fn ddram_addr(&self, row: u8, col: u8) -> u8 {
        self.row_offsets[self.clamp_row(row) as usize].wrapping_add(col)
    }

    /// Track a jump to `(row, col)` and return the DDRAM address to send
    pub(crate) fn move_to(&mut self, row: u8, col: u8) -> u8 {
        let row = self.clamp_row(row);
        self.cursor_pos = (row, col);
        self.ddram_addr(row, col)
    }

    /// Track `count` characters written from the current position
    pub(crate) fn advance(&mut self, count: usize) {
        let count = u8::try_from(count).unwrap_or(u8::MAX);
        self.cursor_pos.1 = self.cursor_pos.1.saturating_add(count);
    }

    pub(crate) fn return_home(&mut self) {
        self.cursor_pos = (0, 0);
        self.display_offset = 0;
    }

    /// Track a one step shift of the whole display window.
    ///
    /// The column moves against the window, so it stays an approximation of
    /// where the next character lands on screen, not of the DDRAM address.
    pub(crate) fn shift_display(&mut self, dir: MoveDirection) {
        let col = self.cursor_pos.1;
        match dir {
            MoveDirection::RightToLeft => {
                self.cursor_pos.1 = col.saturating_sub(1);
                self.display_offset = match self.display_offset {
                    0 => LINE_CAPACITY - 1,
                    offset => offset - 1,
                };
            }
            MoveDirection::LeftToRight => {
                self.cursor_pos.1 = col.saturating_add(1);
                self.display_offset = (self.display_offset + 1) % LINE_CAPACITY;
            }
        }
    }
}

/// Row count is kept within `1..=4`
pub(crate) fn clamp_rows(rows: u8) -> u8 {
    rows.clamp(1, MAX_ROWS)
}

/// Base DDRAM address of each row.
///
/// Rows 2 and 3 continue where rows 0 and 1 end, which is how 16x4 and 20x4
/// modules wire their second half.
pub(crate) fn row_offsets(cols: u8) -> [u8; 4] {
    [0x00, 0x40, cols, 0x40u8.wrapping_add(cols)]
}

/// CGRAM address of a custom glyph slot, slot taken modulo 8
pub(crate) fn cgram_slot_addr(slot: u8) -> u8 {
    (slot & 0b111) << 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn row_offsets_follow_column_count() {
        let mut state = LcdState::new(4, 20);
        assert_eq!(state.get_row_offsets(), [0x00, 0x40, 0x14, 0x54]);

        state.set_cols(16);
        assert_eq!(state.get_row_offsets(), [0x00, 0x40, 0x10, 0x50]);
    }

    #[test]
    fn row_count_is_clamped() {
        assert_eq!(LcdState::new(7, 16).get_rows(), 4);
        assert_eq!(LcdState::new(0, 16).get_rows(), 1);
        assert_eq!(LcdState::new(2, 16).get_rows(), 2);
    }

    #[test]
    fn shrinking_rows_pulls_cursor_in() {
        let mut state = LcdState::new(4, 20);
        state.move_to(3, 5);
        state.set_rows(2);
        assert_eq!(state.get_cursor_pos(), (1, 5));
    }

    #[test]
    fn cgram_slot_is_masked() {
        assert_eq!(cgram_slot_addr(1), 0x08);
        assert_eq!(cgram_slot_addr(9), cgram_slot_addr(1));
        assert_eq!(cgram_slot_addr(7), 0x38);
    }

    #[test]
    fn return_home_resets_position_and_window() {
        let mut state = LcdState::new(2, 16);
        state.move_to(1, 9);
        state.shift_display(MoveDirection::LeftToRight);
        state.return_home();
        assert_eq!(state.get_cursor_pos(), (0, 0));
        assert_eq!(state.get_display_offset(), 0);
    }

    #[test]
    fn display_shift_moves_column_against_window() {
        let mut state = LcdState::new(2, 16);
        state.move_to(0, 0);

        state.shift_display(MoveDirection::RightToLeft);
        assert_eq!(state.get_cursor_pos(), (0, 0));
        assert_eq!(state.get_display_offset(), LINE_CAPACITY - 1);

        state.shift_display(MoveDirection::LeftToRight);
        state.shift_display(MoveDirection::LeftToRight);
        assert_eq!(state.get_cursor_pos(), (0, 2));
        assert_eq!(state.get_display_offset(), 1);
    }

    #[test]
    fn advance_saturates() {
        let mut state = LcdState::new(2, 16);
        state.move_to(0, 250);
        state.advance(300);
        assert_eq!(state.get_cursor_pos(), (0, u8::MAX));
    }

    proptest! {
        #[test]
        fn valid_positions_round_trip(rows in 1u8..=4, row in any::<u8>(), col in any::<u8>()) {
            let row = row % rows;
            let mut state = LcdState::new(rows, 16);
            state.move_to(row, col);
            prop_assert_eq!(state.get_cursor_pos(), (row, col));
        }

        #[test]
        fn rows_past_the_end_clamp_to_last(rows in 1u8..=4, row: u8, col: u8) {
            prop_assume!(row >= rows);
            let mut state = LcdState::new(rows, 16);
            state.move_to(row, col);
            prop_assert_eq!(state.get_cursor_pos(), (rows - 1, col));
        }

        #[test]
        fn ddram_addr_is_offset_plus_col(cols in 1u8..=40, row in 0u8..4, col in 0u8..40) {
            let state = LcdState::new(4, cols);
            prop_assert_eq!(state.ddram_addr(row, col), row_offsets(cols)[row as usize].wrapping_add(col));
        }
    }
}
