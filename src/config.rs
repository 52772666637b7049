use crate::error::{config_error, env_error, AppResult};
use crate::render::{ColorMap, LayoutConfig};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default zone for "now". The UTC calendar correction assumes US Pacific time.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

pub const COLOR_MAP_FILE: &str = "color-map.txt";
pub const EXCLUDES_FILE: &str = "excludes.txt";
pub const CREDENTIALS_FILE: &str = "credentials.json";
pub const TOKEN_FILE: &str = "token.json";
pub const LAYOUT_FILE: &str = "layout.toml";

/// Main configuration structure for a render run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding color map, exclusions, credentials, token and fonts
    pub resources_dir: PathBuf,
    /// Render the fixture events instead of calling Google
    pub fake_events: bool,
    /// Time zone for "now" and daylight-saving decisions
    pub timezone: String,
    /// Where the virtual panel writes frames
    pub output_path: PathBuf,
    /// Upcoming events requested per calendar
    pub max_results: u32,
    /// Port the OAuth consent callback listens on
    pub redirect_port: u16,
    /// Remote address used to find the outbound local address
    pub network_probe: String,
    /// Overrides `credentials.json` when set
    pub google_client_id: Option<String>,
    /// Overrides `credentials.json` when set
    pub google_client_secret: Option<String>,
    pub layout: LayoutConfig,
}

impl Config {
    /// Load configuration from environment and the optional layout file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let resources_dir =
            PathBuf::from(env::var("PICAL_RESOURCES_DIR").unwrap_or_else(|_| "resources".into()));

        let fake_events = match env::var("PICAL_FAKE_EVENTS") {
            Ok(value) => parse_flag(&value).ok_or_else(|| env_error("PICAL_FAKE_EVENTS"))?,
            Err(_) => false,
        };

        let timezone = env::var("PICAL_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());

        let output_path = env::var("PICAL_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| resources_dir.join("frame.png"));

        let max_results = env::var("PICAL_MAX_RESULTS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|_| env_error("PICAL_MAX_RESULTS"))?;

        let redirect_port = env::var("PICAL_REDIRECT_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| env_error("PICAL_REDIRECT_PORT"))?;

        let network_probe =
            env::var("PICAL_NETWORK_PROBE").unwrap_or_else(|_| "8.8.8.8:80".to_string());

        let google_client_id = env::var("GOOGLE_CLIENT_ID").ok();
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET").ok();

        let layout = load_layout(&resources_dir.join(LAYOUT_FILE))?;

        let config = Config {
            resources_dir,
            fake_events,
            timezone,
            output_path,
            max_results,
            redirect_port,
            network_probe,
            google_client_id,
            google_client_secret,
            layout,
        };

        // Fail early on a bad zone name
        config.tz()?;
        Ok(config)
    }

    /// Configured time zone
    pub fn tz(&self) -> AppResult<Tz> {
        Tz::from_str(&self.timezone)
            .map_err(|_| config_error(&format!("Unknown time zone: {}", self.timezone)))
    }

    pub fn resource(&self, name: &str) -> PathBuf {
        self.resources_dir.join(name)
    }

    pub fn token_path(&self) -> PathBuf {
        self.resource(TOKEN_FILE)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.resource(CREDENTIALS_FILE)
    }

    /// Read and parse the calendar color map
    pub fn load_color_map(&self) -> AppResult<ColorMap> {
        ColorMap::parse(&read_resource(&self.resource(COLOR_MAP_FILE))?)
    }

    /// Read the names of calendars to skip
    pub fn load_excludes(&self) -> AppResult<ExcludeList> {
        Ok(ExcludeList::parse(&read_resource(
            &self.resource(EXCLUDES_FILE),
        )?))
    }
}

/// Calendar names that are never fetched
#[derive(Debug, Clone, Default)]
pub struct ExcludeList {
    names: HashSet<String>,
}

impl ExcludeList {
    /// One calendar name per line
    pub fn parse(content: &str) -> Self {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn contains(&self, calendar_name: &str) -> bool {
        self.names.contains(calendar_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn read_resource(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            config_error(&format!("The file {} was not found", path.display()))
        }
        _ => config_error(&format!("Failed to read {}: {}", path.display(), e)),
    })
}

/// Layout defaults, with any fields from the optional overrides file applied
fn load_layout(path: &Path) -> AppResult<LayoutConfig> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str::<LayoutConfig>(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LayoutConfig::default()),
        Err(e) => Err(config_error(&format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("picalendar-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config_in(dir: PathBuf) -> Config {
        Config {
            output_path: dir.join("frame.png"),
            resources_dir: dir,
            fake_events: true,
            timezone: DEFAULT_TIMEZONE.to_string(),
            max_results: 10,
            redirect_port: 8080,
            network_probe: "8.8.8.8:80".to_string(),
            google_client_id: None,
            google_client_secret: None,
            layout: LayoutConfig::default(),
        }
    }

    #[test]
    fn test_exclude_list() {
        let excludes = ExcludeList::parse("Holidays in United States\n\n  Birthdays  \n");
        assert_eq!(excludes.len(), 2);
        assert!(excludes.contains("Birthdays"));
        assert!(excludes.contains("Holidays in United States"));
        assert!(!excludes.contains(""));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_missing_resource_files_are_config_errors() {
        let config = config_in(temp_dir("missing"));

        let err = config.load_color_map().unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(_)));
        assert!(err.to_string().contains("color-map.txt was not found"));

        let err = config.load_excludes().unwrap_err();
        assert!(err.to_string().contains("excludes.txt was not found"));
    }

    #[test]
    fn test_resource_files_load() {
        let dir = temp_dir("present");
        fs::write(dir.join(COLOR_MAP_FILE), "Family=yellow\n").unwrap();
        fs::write(dir.join(EXCLUDES_FILE), "Spam\n").unwrap();
        let config = config_in(dir);

        assert_eq!(config.load_color_map().unwrap().len(), 1);
        assert!(config.load_excludes().unwrap().contains("Spam"));
    }

    #[test]
    fn test_layout_overrides() {
        let dir = temp_dir("layout");
        let path = dir.join(LAYOUT_FILE);

        assert_eq!(load_layout(&path).unwrap(), LayoutConfig::default());

        fs::write(&path, "max_y = 500\nevent_char_limit = 30\n").unwrap();
        let layout = load_layout(&path).unwrap();
        assert_eq!(layout.max_y, 500);
        assert_eq!(layout.event_char_limit, 30);
        assert_eq!(layout.origin_y, 20);

        fs::write(&path, "max_y = \"tall\"\n").unwrap();
        assert!(load_layout(&path).is_err());
    }

    #[test]
    fn test_timezone() {
        let mut config = config_in(temp_dir("tz"));
        assert_eq!(config.tz().unwrap(), chrono_tz::America::Los_Angeles);
        config.timezone = "Mars/Olympus".to_string();
        assert!(config.tz().is_err());
    }
}
