use crate::error::ConfigError;
use crate::rename::Alphabet;
use crate::version::{validate_version, LATEST};

/// Options for `minify` and `transform`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Leave every binding with its original name.
    pub keep_var_names: bool,
    /// ECMAScript edition year the output must run on, or 0 for the latest.
    pub version: u16,
    pub alphabet: Alphabet,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keep_var_names: false,
            version: LATEST,
            alphabet: Alphabet::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_version(self.version)
    }
}
