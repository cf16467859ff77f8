use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BOOKMARK_DATA_DIR";

/// Environment variable setting the fetch timeout in seconds.
pub const FETCH_TIMEOUT_ENV: &str = "BOOKMARK_FETCH_TIMEOUT";

/// Data directory used when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "./dataBookmarks";

/// User agent sent with every metadata request.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:44.0) Gecko/20100101 Firefox/44.0";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub user_agent: String,
    /// `None` means requests never time out.
    pub fetch_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            user_agent: USER_AGENT.to_string(),
            fetch_timeout: None,
        }
    }
}

impl Config {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn fetch_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.fetch_timeout = secs.map(Duration::from_secs);
        self
    }
}
