//! Inky Impression 7.3" (AC073TC1A) 7-colour panel driver
//!
//! The controller takes a 4-bit palette index per pixel, packed two pixels per
//! byte with the left pixel in the high nibble. Every `show()` re-runs the
//! full reset and register setup before uploading the frame, then powers the
//! panel on, refreshes and powers it off again.
//!
//! SPI and GPIO access go through the small traits below, so the driver runs
//! against mocks in tests and against Linux `spidev`/`gpio-cdev` devices with
//! the `hardware` feature.

use crate::canvas::{Canvas, InkyColor};
use crate::display::{check_resolution, log_frame_stats, DisplayAdapter, DisplayError};
use log::{debug, info, warn};
use std::thread;
use std::time::{Duration, Instant};

/// Panel dimensions
pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 480;

/// Largest single SPI transfer accepted by spidev's default buffer.
pub const SPI_CHUNK_SIZE: usize = 4096;

const BUSY_POLL: Duration = Duration::from_millis(10);
const POWER_TIMEOUT: Duration = Duration::from_millis(400);
const REFRESH_TIMEOUT: Duration = Duration::from_secs(45);
const RESET_TIMEOUT: Duration = Duration::from_secs(1);

/// Controller commands
pub mod cmd {
    pub const PSR: u8 = 0x00;
    pub const PWR: u8 = 0x01;
    pub const POF: u8 = 0x02;
    pub const POFS: u8 = 0x03;
    pub const PON: u8 = 0x04;
    pub const BTST1: u8 = 0x05;
    pub const BTST2: u8 = 0x06;
    pub const BTST3: u8 = 0x08;
    pub const DTM: u8 = 0x10;
    pub const DRF: u8 = 0x12;
    pub const IPC: u8 = 0x13;
    pub const PLL: u8 = 0x30;
    pub const TSE: u8 = 0x41;
    pub const CDI: u8 = 0x50;
    pub const TCON: u8 = 0x60;
    pub const TRES: u8 = 0x61;
    pub const VDCS: u8 = 0x82;
    pub const T_VDCS: u8 = 0x84;
    pub const AGID: u8 = 0x86;
    pub const CMDH: u8 = 0xAA;
    pub const CCSET: u8 = 0xE0;
    pub const PWS: u8 = 0xE3;
    pub const TSSET: u8 = 0xE6;
}

/// Register setup sent after every reset, in order.
const SETUP_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::CMDH, &[0x49, 0x55, 0x20, 0x08, 0x09, 0x18]),
    (cmd::PWR, &[0x3F, 0x00, 0x32, 0x2A, 0x0E, 0x2A]),
    (cmd::PSR, &[0x5F, 0x69]),
    (cmd::POFS, &[0x00, 0x54, 0x00, 0x44]),
    (cmd::BTST1, &[0x40, 0x1F, 0x1F, 0x2C]),
    (cmd::BTST2, &[0x6F, 0x1F, 0x16, 0x25]),
    (cmd::BTST3, &[0x6F, 0x1F, 0x1F, 0x22]),
    (cmd::IPC, &[0x00, 0x04]),
    (cmd::PLL, &[0x02]),
    (cmd::TSE, &[0x00]),
    (cmd::CDI, &[0x3F]),
    (cmd::TCON, &[0x02, 0x00]),
    // 800 x 480
    (cmd::TRES, &[0x03, 0x20, 0x01, 0xE0]),
    (cmd::VDCS, &[0x1E]),
    (cmd::T_VDCS, &[0x00]),
    (cmd::AGID, &[0x00]),
    (cmd::PWS, &[0x2F]),
    (cmd::CCSET, &[0x00]),
    (cmd::TSSET, &[0x00]),
];

/// Write-only SPI bus (chip select handled by the bus)
pub trait SpiBus {
    fn write(&mut self, data: &[u8]) -> Result<(), DisplayError>;
}

/// Output GPIO line
pub trait GpioPin {
    fn set_high(&mut self) -> Result<(), DisplayError>;
    fn set_low(&mut self) -> Result<(), DisplayError>;
}

/// Input GPIO line
pub trait InputPin {
    fn is_high(&self) -> Result<bool, DisplayError>;
}

/// Pack palette indices two per byte, left pixel in the high nibble.
pub fn pack_pixels(pixels: &[InkyColor]) -> Vec<u8> {
    pixels
        .chunks(2)
        .map(|pair| {
            let high = pair[0].index() << 4;
            let low = pair.get(1).map_or(0, |c| c.index() & 0x0F);
            high | low
        })
        .collect()
}

/// AC073TC1A display driver
pub struct InkyAc073<SPI, DC, RST, BUSY> {
    spi: SPI,
    dc_pin: DC,
    rst_pin: RST,
    busy_pin: BUSY,
    frame: Canvas,
}

impl<SPI, DC, RST, BUSY> InkyAc073<SPI, DC, RST, BUSY>
where
    SPI: SpiBus,
    DC: GpioPin,
    RST: GpioPin,
    BUSY: InputPin,
{
    pub fn new(spi: SPI, dc_pin: DC, rst_pin: RST, busy_pin: BUSY) -> Self {
        Self {
            spi,
            dc_pin,
            rst_pin,
            busy_pin,
            frame: Canvas::new(WIDTH, HEIGHT, InkyColor::White),
        }
    }

    /// The pending frame.
    pub fn frame(&self) -> &Canvas {
        &self.frame
    }

    fn reset(&mut self) -> Result<(), DisplayError> {
        debug!("🔄 Performing hardware reset...");
        self.rst_pin.set_low()?;
        thread::sleep(Duration::from_millis(100));
        self.rst_pin.set_high()?;
        thread::sleep(Duration::from_millis(100));
        self.busy_wait(RESET_TIMEOUT)
    }

    /// Send a command byte followed by its data bytes.
    fn send_command(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.dc_pin.set_low()?; // Command mode
        self.spi.write(&[command])?;
        if !data.is_empty() {
            self.dc_pin.set_high()?; // Data mode
            for chunk in data.chunks(SPI_CHUNK_SIZE) {
                self.spi.write(chunk)?;
            }
        }
        Ok(())
    }

    /// Wait for BUSY to go high (ready). A timeout is logged, not fatal.
    fn busy_wait(&mut self, timeout: Duration) -> Result<(), DisplayError> {
        let started = Instant::now();
        while !self.busy_pin.is_high()? {
            if started.elapsed() >= timeout {
                warn!("⚠️  BUSY still low after {:?}, continuing", timeout);
                return Ok(());
            }
            thread::sleep(BUSY_POLL);
        }
        debug!("   ✅ Display ready after {:?}", started.elapsed());
        Ok(())
    }

    /// Reset the controller and program its registers.
    pub fn setup(&mut self) -> Result<(), DisplayError> {
        self.reset()?;
        for &(command, data) in SETUP_SEQUENCE {
            self.send_command(command, data)?;
        }
        debug!("   ✅ Controller setup complete");
        Ok(())
    }

    /// Upload `packed` frame data and run the refresh.
    fn update(&mut self, packed: &[u8]) -> Result<(), DisplayError> {
        self.send_command(cmd::DTM, packed)?;

        self.send_command(cmd::PON, &[])?;
        self.busy_wait(POWER_TIMEOUT)?;

        info!("🔆 Refreshing panel...");
        self.send_command(cmd::DRF, &[0x00])?;
        self.busy_wait(REFRESH_TIMEOUT)?;

        self.send_command(cmd::POF, &[0x00])?;
        self.busy_wait(POWER_TIMEOUT)
    }
}

impl<SPI, DC, RST, BUSY> DisplayAdapter for InkyAc073<SPI, DC, RST, BUSY>
where
    SPI: SpiBus,
    DC: GpioPin,
    RST: GpioPin,
    BUSY: InputPin,
{
    fn resolution(&self) -> (u32, u32) {
        (WIDTH, HEIGHT)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: InkyColor) {
        self.frame.set_pixel(x, y, color);
    }

    fn set_image(&mut self, canvas: &Canvas) -> Result<(), DisplayError> {
        check_resolution(canvas, self.resolution())?;
        self.frame.clone_from(canvas);
        Ok(())
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        log_frame_stats(&self.frame);
        self.setup()?;
        let packed = pack_pixels(self.frame.pixels());
        debug!("   📤 Sending {} bytes of frame data", packed.len());
        self.update(&packed)?;
        info!("✅ Panel updated");
        Ok(())
    }
}

/// Open the panel on the configured Linux SPI device and GPIO chip.
#[cfg(feature = "hardware")]
pub fn open(
    config: &crate::config::HardwareConfig,
) -> Result<
    InkyAc073<
        crate::hw_spi_spidev::SpidevBus,
        crate::gpio_cdev::CdevOutputPin,
        crate::gpio_cdev::CdevOutputPin,
        crate::gpio_cdev::CdevInputPin,
    >,
    DisplayError,
> {
    use crate::gpio_cdev::{open_chip, CdevInputPin, CdevOutputPin};
    use crate::hw_spi_spidev::SpidevBus;

    info!(
        "🔌 Opening panel on {} (DC={}, RESET={}, BUSY={})",
        config.spi_device.display(),
        config.dc_pin,
        config.reset_pin,
        config.busy_pin
    );
    let spi = SpidevBus::open(&config.spi_device, config.spi_speed_hz)?;
    let mut chip = open_chip(&config.gpio_chip)?;
    let dc = CdevOutputPin::new(&mut chip, config.dc_pin, 0)?;
    let rst = CdevOutputPin::new(&mut chip, config.reset_pin, 1)?;
    let busy = CdevInputPin::new(&mut chip, config.busy_pin)?;
    Ok(InkyAc073::new(spi, dc, rst, busy))
}
