use async_trait::async_trait;
use chrono::{DateTime, Days, TimeZone, Utc};
use chrono_tz::Tz;
use image::RgbImage;
use picalendar::calendar::PiEvent;
use picalendar::config::Config;
use picalendar::display::{DisplaySink, PanelFrame, PngPanel, PANEL_HEIGHT, PANEL_WIDTH};
use picalendar::error::{display_error, google_calendar_error, AppResult};
use picalendar::render::canvas::FontStyle;
use picalendar::render::{
    render_calendar, Canvas, ColorMap, LayoutConfig, PanelColor, Point, RecordingCanvas,
};
use picalendar::sources::{EventSource, FixtureSource};
use picalendar::startup;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock event source returning a fixed list, or failing like an unreachable API
struct MockEventSource {
    events: Vec<PiEvent>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockEventSource {
    fn new(now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
        let start = now.timezone().from_local_datetime(&tomorrow.and_hms_opt(10, 0, 0).unwrap());
        let start = start.single().unwrap().fixed_offset();

        Self {
            events: vec![
                PiEvent::timed("Work", "Standup", start, start + chrono::Duration::minutes(15)),
                PiEvent::all_day("Family", "Dentist", today),
            ],
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            events: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_events(&self, _now: DateTime<Tz>) -> AppResult<Vec<PiEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(google_calendar_error("HTTP 503 Service Unavailable"));
        }
        Ok(self.events.clone())
    }
}

fn now() -> DateTime<Tz> {
    Utc.with_ymd_and_hms(2024, 6, 10, 14, 3, 0)
        .unwrap()
        .with_timezone(&chrono_tz::America::Los_Angeles)
}

#[tokio::test]
async fn test_mock_source_renders() {
    let now = now();
    let source: Box<dyn EventSource> = Box::new(MockEventSource::new(&now));
    let events = source.fetch_events(now).await.unwrap();
    assert_eq!(events.len(), 2);

    let colors = ColorMap::parse("Work=blue\nFamily=red").unwrap();
    let mut canvas = RecordingCanvas::new();
    let summary = render_calendar(
        &mut canvas,
        events,
        &now,
        &LayoutConfig::default(),
        &colors,
        "10.0.0.2",
    );

    assert_eq!(summary.events_drawn, 2);
    let texts = canvas.texts();
    assert!(texts.contains(&"Dentist"));
    assert!(texts.contains(&"10AM - 10:15AM"));
    assert!(texts.contains(&"Last updated: 06/10 07:03"));
}

#[tokio::test]
async fn test_fixture_source() {
    let events = FixtureSource.fetch_events(now()).await.unwrap();
    assert_eq!(events.len(), 7);
    assert!(events.iter().any(PiEvent::is_all_day));
}

#[test]
fn test_show_writes_panel_png() {
    let path = std::env::temp_dir().join(format!("picalendar-{}.png", uuid::Uuid::new_v4()));
    let mut panel = PngPanel::new(&path);
    panel.init().unwrap();

    // Portrait canvas, rotated onto the landscape panel
    let image = RgbImage::from_pixel(PANEL_HEIGHT, PANEL_WIDTH, image::Rgb([255, 255, 255]));
    startup::show(&mut panel, &image).unwrap();

    let written = image::open(&path).unwrap();
    assert_eq!((written.width(), written.height()), (PANEL_WIDTH, PANEL_HEIGHT));
    let _ = std::fs::remove_file(&path);
}

/// Panel that records the calls it gets and fails where told to
#[derive(Default)]
struct TrackingPanel {
    fail_init: bool,
    fail_display: bool,
    fail_sleep: bool,
    inited: bool,
    frames: usize,
    slept: bool,
    released: bool,
}

impl DisplaySink for TrackingPanel {
    fn width(&self) -> u32 {
        PANEL_WIDTH
    }

    fn height(&self) -> u32 {
        PANEL_HEIGHT
    }

    fn init(&mut self) -> AppResult<()> {
        if self.fail_init {
            return Err(display_error("SPI bus unavailable"));
        }
        self.inited = true;
        Ok(())
    }

    fn display(&mut self, _frame: &PanelFrame) -> AppResult<()> {
        if self.fail_display {
            return Err(display_error("busy pin timed out"));
        }
        self.frames += 1;
        Ok(())
    }

    fn clear(&mut self) -> AppResult<()> {
        Ok(())
    }

    fn sleep(&mut self) -> AppResult<()> {
        if self.fail_sleep {
            return Err(display_error("panel did not answer"));
        }
        self.slept = true;
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Records draw calls, flushes to a blank portrait image
#[derive(Default)]
struct BlankCanvas {
    recorded: RecordingCanvas,
}

impl Canvas for BlankCanvas {
    fn rounded_rectangle(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        radius: i32,
        fill: PanelColor,
    ) {
        self.recorded
            .rounded_rectangle(top_left, bottom_right, radius, fill);
    }

    fn text(&mut self, at: Point, text: &str, font: FontStyle, color: PanelColor) {
        self.recorded.text(at, text, font, color);
    }

    fn line(&mut self, from: Point, to: Point, width: i32, color: PanelColor) {
        self.recorded.line(from, to, width, color);
    }
}

impl From<BlankCanvas> for RgbImage {
    fn from(_: BlankCanvas) -> Self {
        RgbImage::from_pixel(PANEL_HEIGHT, PANEL_WIDTH, PanelColor::White.rgb())
    }
}

fn test_config() -> Config {
    Config {
        resources_dir: std::env::temp_dir(),
        fake_events: false,
        timezone: "America/Los_Angeles".to_string(),
        output_path: std::env::temp_dir().join("picalendar-unused.png"),
        max_results: 10,
        redirect_port: 8080,
        network_probe: "127.0.0.1:9".to_string(),
        google_client_id: None,
        google_client_secret: None,
        layout: LayoutConfig::default(),
    }
}

async fn run_pipeline(source: &MockEventSource, panel: &mut TrackingPanel) -> AppResult<()> {
    let colors = ColorMap::parse("Work=blue\nFamily=red").unwrap();
    startup::run_with(
        &test_config(),
        source,
        &colors,
        now(),
        BlankCanvas::default(),
        panel,
    )
    .await
}

#[tokio::test]
async fn test_run_shows_frame_and_sleeps() {
    let source = MockEventSource::new(&now());
    let mut panel = TrackingPanel::default();

    run_pipeline(&source, &mut panel).await.unwrap();

    assert!(panel.inited);
    assert_eq!(panel.frames, 1);
    assert!(panel.slept);
    assert!(!panel.released);
}

#[tokio::test]
async fn test_fetch_failure_is_fatal_without_partial_render() {
    let source = MockEventSource::failing();
    let mut panel = TrackingPanel::default();

    let err = run_pipeline(&source, &mut panel).await.unwrap_err();

    assert!(err.to_string().contains("503"));
    assert_eq!(panel.frames, 0);
    // The panel still goes to sleep on the way out
    assert!(panel.slept);
}

#[tokio::test]
async fn test_display_failure_is_swallowed() {
    let source = MockEventSource::new(&now());
    let mut panel = TrackingPanel {
        fail_display: true,
        ..Default::default()
    };

    run_pipeline(&source, &mut panel).await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(panel.frames, 0);
    assert!(panel.slept);
}

#[tokio::test]
async fn test_init_failure_ends_run_before_fetching() {
    let source = MockEventSource::new(&now());
    let mut panel = TrackingPanel {
        fail_init: true,
        ..Default::default()
    };

    run_pipeline(&source, &mut panel).await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    assert_eq!(panel.frames, 0);
    assert!(!panel.slept);
}

#[tokio::test]
async fn test_panel_released_when_sleep_fails() {
    let source = MockEventSource::failing();
    let mut panel = TrackingPanel {
        fail_sleep: true,
        ..Default::default()
    };

    assert!(run_pipeline(&source, &mut panel).await.is_err());
    assert!(panel.released);
}
