use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = "./mr-transform.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Opcode used when the command line does not name one.
    pub opcode: Option<u8>,
    /// Print matrices as floats instead of raw fixed point.
    pub float_output: bool,
    /// Samples taken by `sweep`.
    pub steps: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            opcode: None,
            float_output: false,
            steps: 8,
        }
    }
}

impl Config {
    pub fn parse(data: &str) -> Self {
        match toml::from_str(data) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to parse config file: {}", e);
                Default::default()
            }
        }
    }

    /// Loads `path`, or the default location. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG));
        match fs::read_to_string(path) {
            Ok(data) => Self::parse(&data),
            Err(e) if explicit => {
                warn!("couldn't read config `{}`: {}", path.display(), e);
                Default::default()
            }
            Err(_) => {
                debug!("no config at `{}`, using defaults", path.display());
                Default::default()
            }
        }
    }
}
