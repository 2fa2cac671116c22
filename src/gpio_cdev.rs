//! GPIO character-device lines for the panel driver.

use crate::display::DisplayError;
use crate::inky_ac073::{GpioPin, InputPin};
use linux_embedded_hal::gpio_cdev::{Chip, LineHandle, LineRequestFlags};
use std::path::Path;

const CONSUMER: &str = "inky-dashboard";

pub struct CdevOutputPin {
    line: LineHandle,
}

pub struct CdevInputPin {
    line: LineHandle,
}

pub fn open_chip(path: &Path) -> Result<Chip, DisplayError> {
    Chip::new(path).map_err(transport)
}

impl CdevOutputPin {
    pub fn new(chip: &mut Chip, offset: u32, initial: u8) -> Result<Self, DisplayError> {
        let line = chip
            .get_line(offset)
            .map_err(transport)?
            .request(LineRequestFlags::OUTPUT, initial, CONSUMER)
            .map_err(transport)?;
        Ok(Self { line })
    }
}

impl CdevInputPin {
    pub fn new(chip: &mut Chip, offset: u32) -> Result<Self, DisplayError> {
        let line = chip
            .get_line(offset)
            .map_err(transport)?
            .request(LineRequestFlags::INPUT, 0, CONSUMER)
            .map_err(transport)?;
        Ok(Self { line })
    }
}

impl GpioPin for CdevOutputPin {
    fn set_high(&mut self) -> Result<(), DisplayError> {
        self.line.set_value(1).map_err(transport)
    }
    fn set_low(&mut self) -> Result<(), DisplayError> {
        self.line.set_value(0).map_err(transport)
    }
}

impl InputPin for CdevInputPin {
    fn is_high(&self) -> Result<bool, DisplayError> {
        Ok(self.line.get_value().map_err(transport)? == 1)
    }
}

fn transport(e: linux_embedded_hal::gpio_cdev::Error) -> DisplayError {
    DisplayError::Transport(format!("gpio: {}", e))
}
