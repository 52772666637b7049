use picalendar::display::PngPanel;
use picalendar::{shutdown, startup};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting picalendar");

    // Missing or invalid configuration exits with status 1
    let config = startup::load_config()?;
    let mut panel = PngPanel::new(&config.output_path);

    let outcome = tokio::select! {
        result = startup::run(&config, &mut panel) => Some(result),
        _ = shutdown::wait_for_signal() => None,
    };

    match outcome {
        Some(result) => Ok(result?),
        None => {
            shutdown::release_display(&mut panel);
            Ok(())
        }
    }
}
