use std::path::PathBuf;
use std::time::Duration;

pub const APP_NAME: &str = "commodity-overview";

/// Datastream Web Service REST endpoint (JSON flavour).
pub const DSWS_BASE_URL: &str = "https://product.datastream.com/DSWSClient/V1/DSService.svc/rest";

pub const ENV_USERNAME: &str = "DSWS_USERNAME";
pub const ENV_PASSWORD: &str = "DSWS_PASSWORD";
pub const ENV_BASE_URL: &str = "DSWS_BASE_URL";

pub const CREDENTIALS_FILE: &str = "credentials.json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Tokens are renewed this long before the expiry reported by the service.
pub const TOKEN_RENEW_MARGIN: Duration = Duration::from_secs(5 * 60);

pub const GRID_ROWS: usize = 4;
pub const GRID_COLS: usize = 3;
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLS;

pub fn default_config_dir() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join(APP_NAME)
    } else {
        PathBuf::from(".commodity-overview")
    }
}

pub fn default_credentials_path() -> PathBuf {
    default_config_dir().join(CREDENTIALS_FILE)
}
