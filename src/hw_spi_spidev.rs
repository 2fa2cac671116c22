//! Linux spidev transport for the panel driver.

use crate::display::DisplayError;
use crate::inky_ac073::SpiBus;
use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};
use std::io::Write;
use std::path::Path;

pub struct SpidevBus {
    dev: Spidev,
}

impl SpidevBus {
    pub fn open(path: &Path, speed_hz: u32) -> Result<Self, DisplayError> {
        let mut dev = Spidev::open(path).map_err(transport)?;
        let opts = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        dev.configure(&opts).map_err(transport)?;
        Ok(Self { dev })
    }
}

impl SpiBus for SpidevBus {
    fn write(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dev.write_all(data).map_err(transport)
    }
}

fn transport(e: std::io::Error) -> DisplayError {
    DisplayError::Transport(format!("spidev: {}", e))
}
