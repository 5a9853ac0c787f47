// Frame dump backend: binary PBM files, for development without a panel

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::Panel;

/// Writes every frame to one PBM (P4) file, overwritten in place. PBM uses
/// 1 = black, the inverse of the panel wire format, so bits are flipped on
/// the way out. Row padding to whole bytes matches between the two formats.
pub struct PbmPanel {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl PbmPanel {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    fn write_frame(&self, frame: &[u8]) -> Result<()> {
        let mut out = Vec::with_capacity(frame.len() + 16);
        write!(out, "P4\n{} {}\n", self.width, self.height)?;
        out.extend(frame.iter().map(|&b| !b));
        fs::write(&self.path, &out)
            .with_context(|| format!("writing frame to {}", self.path.display()))
    }
}

impl Panel for PbmPanel {
    fn init(&mut self) -> Result<()> {
        tracing::info!(path = %self.path.display(), "pbm panel ready");
        Ok(())
    }

    fn display_full(&mut self, frame: &[u8]) -> Result<()> {
        self.write_frame(frame)
    }

    fn display_partial(&mut self, frame: &[u8]) -> Result<()> {
        self.write_frame(frame)
    }

    fn sleep(&mut self) -> Result<()> {
        Ok(())
    }
}
