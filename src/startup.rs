use crate::config::{Config, ExcludeList};
use crate::display::{DisplaySink, PanelFrame};
use crate::error::{other_error, AppResult};
use crate::render::{render_calendar, Canvas, ColorMap, Fonts, ImageCanvas, LayoutSummary};
use crate::sources::{EventSource, FixtureSource, GoogleCalendarSource};
use crate::utils::network::{local_ip_address, OFFLINE};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use image::RgbImage;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> AppResult<Config> {
    match Config::load() {
        Ok(config) => {
            debug!(
                "Loaded configuration: resources={}, fake_events={}, timezone={}",
                config.resources_dir.display(),
                config.fake_events,
                config.timezone
            );
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e)
        }
    }
}

/// Pick the event source the configuration asks for
pub fn event_source(config: &Config, excludes: ExcludeList) -> AppResult<Box<dyn EventSource>> {
    if config.fake_events {
        return Ok(Box::new(FixtureSource));
    }

    if !excludes.is_empty() {
        info!("Excluding {} calendars", excludes.len());
    }
    Ok(Box::new(GoogleCalendarSource::new(config, excludes)?))
}

/// One full render: load resources, then fetch, sort, lay out and show.
///
/// Configuration and fetch failures are returned. Display failures are
/// logged and the run still counts as finished.
pub async fn run(config: &Config, panel: &mut dyn DisplaySink) -> AppResult<()> {
    let colors = config.load_color_map()?;
    if colors.is_empty() {
        warn!("Color map is empty, every event will be black");
    } else {
        info!("Loaded {} calendar colors", colors.len());
    }
    // The exclusion file is required even when fixtures are rendered
    let excludes = config.load_excludes()?;
    let fonts = Fonts::load(&config.resources_dir)?;
    let source = event_source(config, excludes)?;
    let now = Utc::now().with_timezone(&config.tz()?);

    let canvas = ImageCanvas::new(
        config.layout.canvas_width,
        config.layout.canvas_height,
        &fonts,
    );
    run_with(config, source.as_ref(), &colors, now, canvas, panel).await
}

/// The pipeline after resources are loaded, drawing into `canvas`.
///
/// Once `init` succeeds the panel is put to sleep on every path out,
/// and released if it cannot sleep.
pub async fn run_with<C>(
    config: &Config,
    source: &dyn EventSource,
    colors: &ColorMap,
    now: DateTime<Tz>,
    canvas: C,
    panel: &mut dyn DisplaySink,
) -> AppResult<()>
where
    C: Canvas + Into<RgbImage>,
{
    if let Err(e) = panel.init() {
        error!("Failed to initialize display: {}", e);
        return Ok(());
    }

    let result = fetch_and_show(config, source, colors, now, canvas, panel).await;

    if let Err(e) = panel.sleep() {
        error!("Failed to put display to sleep: {}", e);
        panel.release();
    }

    result
}

async fn fetch_and_show<C>(
    config: &Config,
    source: &dyn EventSource,
    colors: &ColorMap,
    now: DateTime<Tz>,
    mut canvas: C,
    panel: &mut dyn DisplaySink,
) -> AppResult<()>
where
    C: Canvas + Into<RgbImage>,
{
    info!("Fetching events from {}", source.name());
    let events = source.fetch_events(now).await?;

    let address = local_ip_address(&config.network_probe)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|e| {
            warn!("Could not determine local address: {}", e);
            OFFLINE.to_string()
        });

    let summary = render_calendar(&mut canvas, events, &now, &config.layout, colors, &address);
    log_summary(&summary);

    let image: RgbImage = canvas.into();
    if let Err(e) = show(panel, &image) {
        error!("Display error: {}", e);
    }

    Ok(())
}

/// Convert to the panel format and send it
pub fn show(panel: &mut dyn DisplaySink, image: &RgbImage) -> AppResult<()> {
    let frame = PanelFrame::from_image(image, panel.width(), panel.height())?;
    panel.display(&frame)
}

fn log_summary(summary: &LayoutSummary) {
    info!(
        "Drew {} days, {} events, {} empty days{}",
        summary.days_drawn,
        summary.events_drawn,
        summary.placeholders_drawn,
        if summary.truncated { " (canvas full)" } else { "" }
    );
}
