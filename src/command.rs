//! Controller commands and their flags
//!
//! Every byte the HD44780 receives is built here: a [`CommandSet`] names the
//! instruction, and converting it into a [`Command`] ORs the opcode with the
//! flags carried by the variant.

use crate::utils::BitOps;

/// Instructions understood by the controller
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSet {
    ClearDisplay,
    ReturnHome,
    EntryModeSet(MoveDirection, ShiftType),
    DisplayOnOff {
        display: State,
        cursor: State,
        cursor_blink: State,
    },
    CursorOrDisplayShift(ShiftType, MoveDirection),
    FunctionSet(DataWidth, LineMode, Font),
    SetCGRAM(u8),
    SetDDRAM(u8),
    WriteDataToRAM(u8),
    // not datasheet instructions, these are the raw bytes of the power-on
    // handshake that forces the controller through 8 bit mode into 4 bit mode
    ResetTo8Bit,
    SetTo4Bit,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveDirection {
    RightToLeft,
    #[default]
    LeftToRight,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftType {
    #[default]
    CursorOnly,
    CursorAndDisplay,
}

/// On/off state of the backlight, the display, or a single display flag
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Off,
    #[default]
    On,
}

/// How the cursor is shown
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CursorMode {
    /// No cursor
    #[default]
    Hidden,
    /// Underline cursor
    Solid,
    /// Blinking block cursor
    Blinking,
}

impl CursorMode {
    /// The (cursor, blink) flag pair of a display on/off command
    pub fn flags(self) -> (State, State) {
        match self {
            CursorMode::Hidden => (State::Off, State::Off),
            CursorMode::Solid => (State::On, State::Off),
            CursorMode::Blinking => (State::Off, State::On),
        }
    }
}

#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    #[default]
    Bit4,
    Bit8,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    OneLine,
    #[default]
    TwoLine,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    #[default]
    Font5x8,
    Font5x10,
}

/// Which controller register a byte goes to
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterSelection {
    /// Instruction register (RS low)
    Command,
    /// Data register (RS high)
    Data,
}

/// An encoded byte ready for the sender
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    rs: RegisterSelection,
    byte: u8,
}

impl Command {
    pub(crate) fn new(rs: RegisterSelection, byte: u8) -> Self {
        Self { rs, byte }
    }

    /// Register the byte is latched into
    pub fn get_register_selection(&self) -> RegisterSelection {
        self.rs
    }

    /// Raw byte
    pub fn get_byte(&self) -> u8 {
        self.byte
    }

    /// High nibble first, then low nibble, both right-aligned
    pub fn nibbles(&self) -> [u8; 2] {
        [self.byte >> 4, self.byte & 0x0F]
    }
}

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        match command {
            CommandSet::ClearDisplay => Self::new(RegisterSelection::Command, 0b0000_0001),

            CommandSet::ReturnHome => Self::new(RegisterSelection::Command, 0b0000_0010),

            CommandSet::EntryModeSet(dir, st) => {
                let mut raw_bits: u8 = 0b0000_0100;

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(1),
                    MoveDirection::LeftToRight => raw_bits.set_bit(1),
                };

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(0),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(0),
                };

                Self::new(RegisterSelection::Command, raw_bits)
            }

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => {
                let mut raw_bits: u8 = 0b0000_1000;

                raw_bits.put_bit(2, display);
                raw_bits.put_bit(1, cursor);
                raw_bits.put_bit(0, cursor_blink);

                Self::new(RegisterSelection::Command, raw_bits)
            }

            CommandSet::CursorOrDisplayShift(st, dir) => {
                let mut raw_bits: u8 = 0b0001_0000;

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(3),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(3),
                };

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(2),
                    MoveDirection::LeftToRight => raw_bits.set_bit(2),
                };

                Self::new(RegisterSelection::Command, raw_bits)
            }

            CommandSet::FunctionSet(width, line, font) => {
                let mut raw_bits: u8 = 0b0010_0000;

                match width {
                    DataWidth::Bit4 => raw_bits.clear_bit(4),
                    DataWidth::Bit8 => raw_bits.set_bit(4),
                };

                match line {
                    LineMode::OneLine => raw_bits.clear_bit(3),
                    LineMode::TwoLine => raw_bits.set_bit(3),
                };

                match font {
                    Font::Font5x8 => raw_bits.clear_bit(2),
                    Font::Font5x10 => raw_bits.set_bit(2),
                };

                Self::new(RegisterSelection::Command, raw_bits)
            }

            // CGRAM address is 6 bit wide; DDRAM address goes out as given,
            // the controller wraps it within its own address space
            CommandSet::SetCGRAM(addr) => {
                Self::new(RegisterSelection::Command, 0b0100_0000 | (addr & 0b0011_1111))
            }

            CommandSet::SetDDRAM(addr) => Self::new(RegisterSelection::Command, 0b1000_0000 | addr),

            CommandSet::WriteDataToRAM(data) => Self::new(RegisterSelection::Data, data),

            CommandSet::ResetTo8Bit => Self::new(RegisterSelection::Command, 0b0000_0011),

            CommandSet::SetTo4Bit => Self::new(RegisterSelection::Command, 0b0000_0010),
        }
    }
}
