pub mod frame;
pub mod png_panel;

pub use frame::{PanelFrame, PANEL_HEIGHT, PANEL_WIDTH};
pub use png_panel::PngPanel;

use crate::error::AppResult;

/// A panel that can show finished frames.
///
/// Implementations talk to hardware or stand in for it. Errors from these
/// calls are reported but never stop the program.
pub trait DisplaySink {
    /// Native width in pixels
    fn width(&self) -> u32;

    /// Native height in pixels
    fn height(&self) -> u32;

    /// Wake the panel
    fn init(&mut self) -> AppResult<()>;

    fn display(&mut self, frame: &PanelFrame) -> AppResult<()>;

    /// Blank the panel to white
    fn clear(&mut self) -> AppResult<()>;

    /// Low-power state. `init` is required before the next frame.
    fn sleep(&mut self) -> AppResult<()>;

    /// Best-effort release of the underlying resource on interrupt
    fn release(&mut self);
}
