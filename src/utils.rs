//! Common tools

use crate::command::State;

/// Simple bit ops on a backpack or controller byte
pub trait BitOps {
    #[allow(missing_docs)]
    fn set_bit(&mut self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn clear_bit(&mut self, pos: u8) -> Self;
    /// Set the bit when `state` is [`State::On`], clear it otherwise
    fn put_bit(&mut self, pos: u8, state: State) -> Self;
}

impl BitOps for u8 {
    fn set_bit(&mut self, pos: u8) -> Self {
        *self |= 1u8 << (pos & 0b111);
        *self
    }

    fn clear_bit(&mut self, pos: u8) -> Self {
        *self &= !(1u8 << (pos & 0b111));
        *self
    }

    fn put_bit(&mut self, pos: u8, state: State) -> Self {
        match state {
            State::On => self.set_bit(pos),
            State::Off => self.clear_bit(pos),
        }
    }
}
