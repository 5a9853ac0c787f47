// Waveshare 2.13" panel over spidev + gpio-cdev (epd feature)

use anyhow::{Context, Result};
use epd_waveshare::epd2in13_v2::Epd2in13;
use epd_waveshare::prelude::*;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};

use super::Panel;

// Standard Waveshare e-paper HAT wiring (BCM numbering); CS is spidev CE0.
const SPI_DEV: &str = "/dev/spidev0.0";
const GPIO_CHIP: &str = "/dev/gpiochip0";
const PIN_RST: u32 = 17;
const PIN_DC: u32 = 25;
const PIN_BUSY: u32 = 24;

const SPI_SPEED_HZ: u32 = 4_000_000;

/// Waveshare 2.13" V2/V3 panel. Full refreshes run the full LUT; partial
/// refreshes switch to the quick LUT and back on the next full refresh.
pub struct EpdPanel {
    spi: SpidevDevice,
    delay: Delay,
    epd: Epd2in13<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>,
}

// Driver errors carry the embedded-hal SPI/GPIO error types, which only
// guarantee Debug.
fn epd_err(err: impl core::fmt::Debug) -> anyhow::Error {
    anyhow::anyhow!("EPD I/O error: {err:?}")
}

impl EpdPanel {
    /// Opens the SPI device and GPIO lines and resets the panel.
    pub fn open() -> Result<Self> {
        let mut spi = SpidevDevice::open(SPI_DEV).with_context(|| format!("opening {SPI_DEV}"))?;
        spi.0
            .configure(
                &SpidevOptions::new()
                    .bits_per_word(8)
                    .max_speed_hz(SPI_SPEED_HZ)
                    .mode(SpiModeFlags::SPI_MODE_0)
                    .build(),
            )
            .context("configuring SPI")?;

        let mut chip = Chip::new(GPIO_CHIP).with_context(|| format!("opening {GPIO_CHIP}"))?;
        let busy = CdevPin::new(
            chip.get_line(PIN_BUSY)?
                .request(LineRequestFlags::INPUT, 0, "epd-busy")?,
        )?;
        let dc = CdevPin::new(
            chip.get_line(PIN_DC)?
                .request(LineRequestFlags::OUTPUT, 0, "epd-dc")?,
        )?;
        let rst = CdevPin::new(
            chip.get_line(PIN_RST)?
                .request(LineRequestFlags::OUTPUT, 1, "epd-rst")?,
        )?;

        let mut delay = Delay {};
        let epd = Epd2in13::new(&mut spi, busy, dc, rst, &mut delay, None).map_err(epd_err)?;
        Ok(Self { spi, delay, epd })
    }
}

impl Panel for EpdPanel {
    fn init(&mut self) -> Result<()> {
        self.epd
            .wake_up(&mut self.spi, &mut self.delay)
            .map_err(epd_err)?;
        self.epd
            .clear_frame(&mut self.spi, &mut self.delay)
            .map_err(epd_err)?;
        tracing::info!(spi = SPI_DEV, "EPD panel initialized");
        Ok(())
    }

    fn display_full(&mut self, frame: &[u8]) -> Result<()> {
        self.epd
            .set_refresh(&mut self.spi, &mut self.delay, RefreshLut::Full)
            .map_err(epd_err)?;
        self.epd
            .update_and_display_frame(&mut self.spi, frame, &mut self.delay)
            .map_err(epd_err)
    }

    fn display_partial(&mut self, frame: &[u8]) -> Result<()> {
        self.epd
            .set_refresh(&mut self.spi, &mut self.delay, RefreshLut::Quick)
            .map_err(epd_err)?;
        self.epd
            .update_and_display_frame(&mut self.spi, frame, &mut self.delay)
            .map_err(epd_err)
    }

    fn sleep(&mut self) -> Result<()> {
        self.epd
            .sleep(&mut self.spi, &mut self.delay)
            .map_err(epd_err)
    }
}
