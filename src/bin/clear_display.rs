use picalendar::display::{DisplaySink, PngPanel};
use picalendar::error::AppResult;
use picalendar::{shutdown, startup};
use tracing::{error, info};

fn clear(panel: &mut PngPanel) -> AppResult<()> {
    info!("Clearing screen...");
    panel.init()?;

    // Sleep even when the clear fails
    let result = panel.clear();
    if let Err(e) = panel.sleep() {
        error!("Failed to put display to sleep: {}", e);
        panel.release();
    }
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let config = startup::load_config()?;
    let mut panel = PngPanel::new(&config.output_path);

    let outcome = tokio::select! {
        result = async { clear(&mut panel) } => Some(result),
        _ = shutdown::wait_for_signal() => None,
    };

    match outcome {
        Some(Ok(())) => info!("Clear complete"),
        Some(Err(e)) => error!("Failed to clear display: {}", e),
        None => shutdown::release_display(&mut panel),
    }

    Ok(())
}
