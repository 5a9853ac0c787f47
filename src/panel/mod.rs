// Display backends behind one object-safe trait

#[cfg(feature = "epd")]
mod epd2in13;
mod pbm;

#[cfg(feature = "epd")]
pub use epd2in13::EpdPanel;
pub use pbm::PbmPanel;

use anyhow::Result;

use crate::config::{DisplayConfig, PanelDriver};
use crate::framebuffer::{EPD_2IN13_HEIGHT, EPD_2IN13_WIDTH};

/// A display backend. Frames are packed 1-bit buffers in the panel's native
/// orientation (see `Framebuffer`), 1 = white.
pub trait Panel {
    fn init(&mut self) -> Result<()>;
    /// Full refresh: redraws the whole panel. Slow, clears ghosting.
    fn display_full(&mut self, frame: &[u8]) -> Result<()>;
    /// Partial refresh: fast update used between full refreshes.
    fn display_partial(&mut self, frame: &[u8]) -> Result<()>;
    /// Puts the panel into deep sleep. Called once on shutdown.
    fn sleep(&mut self) -> Result<()>;
}

pub fn from_config(config: &DisplayConfig) -> Result<Box<dyn Panel + Send>> {
    match config.driver {
        PanelDriver::Pbm => {
            let path = config.pbm_path.clone().ok_or_else(|| {
                anyhow::anyhow!("display.pbm_path is required for the pbm driver")
            })?;
            Ok(Box::new(PbmPanel::new(
                path,
                EPD_2IN13_WIDTH,
                EPD_2IN13_HEIGHT,
            )))
        }
        #[cfg(feature = "epd")]
        PanelDriver::Epd2in13 => Ok(Box::new(EpdPanel::open()?)),
        #[cfg(not(feature = "epd"))]
        PanelDriver::Epd2in13 => {
            anyhow::bail!("built without the `epd` feature; rebuild with `--features epd`")
        }
    }
}
