use super::frame::{PanelFrame, PANEL_HEIGHT, PANEL_WIDTH};
use super::DisplaySink;
use crate::error::{display_error, AppResult};
use crate::render::PanelColor;
use std::path::PathBuf;
use tracing::{debug, info};

/// Virtual panel that writes every frame it is shown to a PNG file
#[derive(Debug)]
pub struct PngPanel {
    path: PathBuf,
    awake: bool,
}

impl PngPanel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            awake: false,
        }
    }

    fn write(&self, frame: &PanelFrame) -> AppResult<()> {
        if !self.awake {
            return Err(display_error("Panel is asleep, call init first"));
        }

        frame.to_image().save(&self.path)?;
        info!("Wrote frame to {}", self.path.display());
        Ok(())
    }
}

impl DisplaySink for PngPanel {
    fn width(&self) -> u32 {
        PANEL_WIDTH
    }

    fn height(&self) -> u32 {
        PANEL_HEIGHT
    }

    fn init(&mut self) -> AppResult<()> {
        debug!("Initializing virtual panel at {}", self.path.display());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(display_error(&format!(
                    "Output directory {} does not exist",
                    parent.display()
                )));
            }
        }
        self.awake = true;
        Ok(())
    }

    fn display(&mut self, frame: &PanelFrame) -> AppResult<()> {
        if (frame.width(), frame.height()) != (PANEL_WIDTH, PANEL_HEIGHT) {
            return Err(display_error(&format!(
                "Frame is {}x{}, panel is {}x{}",
                frame.width(),
                frame.height(),
                PANEL_WIDTH,
                PANEL_HEIGHT
            )));
        }
        self.write(frame)
    }

    fn clear(&mut self) -> AppResult<()> {
        debug!("Clearing virtual panel");
        self.write(&PanelFrame::filled(
            PANEL_WIDTH,
            PANEL_HEIGHT,
            PanelColor::White,
        ))
    }

    fn sleep(&mut self) -> AppResult<()> {
        debug!("Virtual panel going to sleep");
        self.awake = false;
        Ok(())
    }

    fn release(&mut self) {
        info!("Releasing virtual panel");
        self.awake = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("picalendar-{}-{}.png", name, std::process::id()))
    }

    #[test]
    fn test_display_requires_init() {
        let mut panel = PngPanel::new(temp_path("asleep"));
        let frame = PanelFrame::filled(PANEL_WIDTH, PANEL_HEIGHT, PanelColor::White);
        assert!(matches!(panel.display(&frame).unwrap_err(), Error::Display(_)));
    }

    #[test]
    fn test_clear_writes_white_frame() {
        let path = temp_path("clear");
        let mut panel = PngPanel::new(&path);
        panel.init().unwrap();
        panel.clear().unwrap();
        panel.sleep().unwrap();

        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (PANEL_WIDTH, PANEL_HEIGHT));
        assert_eq!(*written.get_pixel(400, 240), PanelColor::White.rgb());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_rejects_wrong_frame_size() {
        let mut panel = PngPanel::new(temp_path("size"));
        panel.init().unwrap();
        let frame = PanelFrame::filled(10, 10, PanelColor::White);
        assert!(panel.display(&frame).is_err());
    }
}
