/*!
# LCD 1602 I2C Driver

Drives a HD44780 character LCD through a PCF8574 "I2C backpack", where the
controller only sees the upper 4 data lines and every byte goes out as two
strobed nibbles.

Basic Usage:

1. Wrap your `embedded-hal` I2C bus in a [`sender::I2cSender`] with the backpack address <br/>
    (usually [`sender::DEFAULT_ADDRESS`]). Anything implementing [`sender::SendCommand`] works as well.
<br/>
<br/>
2. Use [`lcd::Lcd::new()`] with a [`lcd::Config`] to create a [`lcd::Lcd`], this runs the
    controller's 4 bit init handshake
<br/>
<br/>
3. use any methods provide by [`lcd::Lcd`] to control the display

```ignore
let mut sender = I2cSender::new(&mut i2c, DEFAULT_ADDRESS);
let config = Config::default().set_rows(2).set_cols(16).set_char_table(CYRILLIC);
let mut lcd = Lcd::new(&mut sender, &mut delay, config)?;

lcd.write_str_at("Hello", 0, 0)?;
lcd.write_localized_lines("Привет", "мир")?;
```

Timing is purely delay based, there is no busy flag read back. Invalid rows
and custom glyph slots are clamped, never rejected; the only error is a
failed bus write, see [`error::Error`].

Enable the `defmt` feature to get `defmt::Format` on public types and debug logging.
*/

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod charset;
pub mod command;
pub mod error;
pub mod lcd;
pub mod sender;
mod state;
pub mod utils;
