//! Runtime configuration resolved from CLI flags and the environment.

use crate::cli::Cli;
use crate::core::TimestampPolicy;
use crate::error::{Error, Result};
use crate::location::{DEFAULT_GEOCODE_TIMEOUT, GeoPoint};
use std::path::PathBuf;
use std::time::Duration;

/// Owner used when no user name can be found.
pub const UNKNOWN_OWNER: &str = "Unknown";

/// Gazetteer file looked up under the user config directory.
pub const GAZETTEER_FILE: &str = "munch/gazetteer.json";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Database file.
    pub db_path: PathBuf,
    /// Owner recorded on new lists.
    pub owner: String,
    /// Handling of unreadable stored timestamps.
    pub timestamp_policy: TimestampPolicy,
    /// Address table for geocoding.
    pub gazetteer: Option<PathBuf>,
    /// Device position for distances.
    pub device_location: Option<GeoPoint>,
    /// Bounded wait for one geocoding call.
    pub geocode_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(crate::storage::DEFAULT_DB_PATH),
            owner: default_owner(),
            timestamp_policy: TimestampPolicy::default(),
            gazetteer: None,
            device_location: None,
            geocode_timeout: DEFAULT_GEOCODE_TIMEOUT,
        }
    }
}

impl Config {
    /// Resolves the configuration for a parsed command line.
    ///
    /// Gazetteer resolution order:
    /// 1. `--gazetteer` flag or `MUNCH_GAZETTEER`
    /// 2. `<config dir>/munch/gazetteer.json` if it exists
    ///
    /// # Errors
    ///
    /// Returns an error if the device position is out of range or the
    /// owner is blank.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let owner = match cli.owner.as_deref().map(str::trim) {
            Some("") => {
                return Err(Error::Config {
                    message: "owner must not be empty".to_string(),
                });
            }
            Some(owner) => owner.to_string(),
            None => default_owner(),
        };

        let device_location = match (cli.device_lat, cli.device_lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)?),
            (None, None) => None,
            _ => {
                return Err(Error::Config {
                    message: "--device-lat and --device-lon must be given together".to_string(),
                });
            }
        };

        let gazetteer = cli.gazetteer.clone().or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join(GAZETTEER_FILE))
                .filter(|path| path.is_file())
        });

        Ok(Self {
            db_path: cli.get_db_path(),
            owner,
            timestamp_policy: if cli.strict_timestamps {
                TimestampPolicy::Strict
            } else {
                TimestampPolicy::SubstituteNow
            },
            gazetteer,
            device_location,
            geocode_timeout: Duration::from_millis(cli.geocode_timeout_ms),
        })
    }
}

/// OS user name, or [`UNKNOWN_OWNER`].
#[must_use]
pub fn default_owner() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_OWNER.to_string())
}
