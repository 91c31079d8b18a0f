use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

use super::{SendCommand, STROBE_HIGH_US, STROBE_LOW_US, WRITE_SETTLE_US};
use crate::{
    command::{Command, RegisterSelection, State},
    error::Error,
    utils::BitOps,
};

// I2C to parallel:
// P7 -> P0
// DB7/DB6/DB5/DB4/BL/EN/RW/RS
const RS_BIT: u8 = 0;
const EN_BIT: u8 = 2;
const BL_BIT: u8 = 3;

/// Address most PCF8574 backpacks ship with (A0..A2 pulled high)
pub const DEFAULT_ADDRESS: SevenBitAddress = 0x27;

/// Drives the controller through a PCF8574 backpack, one nibble per strobe.
///
/// The sender borrows the bus for as long as it lives.
pub struct I2cSender<'a, I2cLcd: I2c> {
    i2c: &'a mut I2cLcd,
    addr: SevenBitAddress,
    backlight: State,
}

impl<'a, I2cLcd: I2c> I2cSender<'a, I2cLcd> {
    /// Wrap the bus and the backpack address; backlight starts on
    pub fn new(i2c: &'a mut I2cLcd, addr: SevenBitAddress) -> Self {
        Self {
            i2c,
            addr,
            backlight: State::On,
        }
    }

    /// Backpack address
    pub fn get_address(&self) -> SevenBitAddress {
        self.addr
    }

    fn write_raw(
        &mut self,
        byte: u8,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Error<I2cLcd::Error>> {
        self.i2c.write(self.addr, &[byte]).map_err(Error::Bus)?;
        delayer.delay_us(WRITE_SETTLE_US);
        Ok(())
    }

    fn pulse_enable(
        &mut self,
        mut byte: u8,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Error<I2cLcd::Error>> {
        self.write_raw(byte.set_bit(EN_BIT), delayer)?;
        delayer.delay_us(STROBE_HIGH_US);

        self.write_raw(byte.clear_bit(EN_BIT), delayer)?;
        delayer.delay_us(STROBE_LOW_US);
        Ok(())
    }

    /// Present one nibble on DB7..DB4 and latch it
    pub(crate) fn send_nibble(
        &mut self,
        rs: RegisterSelection,
        nibble: u8,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Error<I2cLcd::Error>> {
        let byte = nibble_byte(rs, nibble, self.backlight);
        self.write_raw(byte, delayer)?;
        self.pulse_enable(byte, delayer)
    }
}

/// Backpack byte carrying `nibble` with Enable low
pub(crate) fn nibble_byte(rs: RegisterSelection, nibble: u8, backlight: State) -> u8 {
    let mut byte = (nibble & 0x0F) << 4;

    byte.put_bit(BL_BIT, backlight);

    if rs == RegisterSelection::Data {
        byte.set_bit(RS_BIT);
    }

    byte
}

impl<I2cLcd: I2c, Delayer: DelayNs> SendCommand<Delayer> for I2cSender<'_, I2cLcd> {
    type Error = Error<I2cLcd::Error>;

    fn send(&mut self, command: Command, delayer: &mut Delayer) -> Result<(), Self::Error> {
        let rs = command.get_register_selection();

        for nibble in command.nibbles() {
            self.send_nibble(rs, nibble, delayer)?;
        }

        Ok(())
    }

    fn get_backlight(&self) -> State {
        self.backlight
    }

    // the backlight is a plain output of the backpack, not a controller
    // command, so it is a single write without a strobe
    fn set_backlight(&mut self, backlight: State, delayer: &mut Delayer) -> Result<(), Self::Error> {
        self.backlight = backlight;

        let mut byte = 0u8;
        byte.put_bit(BL_BIT, backlight);

        self.write_raw(byte, delayer)
    }
}
