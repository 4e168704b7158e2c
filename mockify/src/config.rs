// vim: tw=80
//! Per-session configuration.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{Error, Result};

/// What to do when a mock is called and no expectation matches.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum UninterestedCallStrategy {
    /// Return an error.
    #[default]
    Fail,
    /// Log a warning through `tracing` and return `None`.
    Warn,
    /// Silently return `None`.
    Ignore,
}

impl UninterestedCallStrategy {
    const NAMES: [(&'static str, UninterestedCallStrategy); 3] = [
        ("fail", UninterestedCallStrategy::Fail),
        ("warn", UninterestedCallStrategy::Warn),
        ("ignore", UninterestedCallStrategy::Ignore),
    ];
}

impl FromStr for UninterestedCallStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::NAMES.iter()
            .find(|(name, _)| *name == s)
            .map(|(_, strategy)| *strategy)
            .ok_or_else(|| Error::InvalidConfig {
                option: UNINTERESTED_CALL_STRATEGY.to_owned(),
                value: s.to_owned()
            })
    }
}

impl Display for UninterestedCallStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = Self::NAMES.iter()
            .find(|(_, strategy)| strategy == self)
            .map(|(name, _)| *name)
            .unwrap_or_default();
        f.write_str(name)
    }
}

const UNINTERESTED_CALL_STRATEGY: &str = "uninterested_call_strategy";

/// Session options.
///
/// Options may be set through the typed fields, or by name with
/// [`set`](Config::set), which accepts the same strings that
/// [`get`](Config::get) returns.
///
/// ```
/// # use mockify::*;
/// let mut config = Config::default();
/// config.set("uninterested_call_strategy", "warn").unwrap();
/// assert_eq!(config.uninterested_call_strategy,
///            UninterestedCallStrategy::Warn);
/// assert!(config.set("uninterested_call_strategy", "panic").is_err());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    pub uninterested_call_strategy: UninterestedCallStrategy,
}

impl Config {
    /// Names of every known option.
    pub fn options() -> impl Iterator<Item = &'static str> {
        [UNINTERESTED_CALL_STRATEGY].into_iter()
    }

    /// Set an option from its string form.
    pub fn set(&mut self, option: &str, value: &str) -> Result<()> {
        match option {
            UNINTERESTED_CALL_STRATEGY => {
                self.uninterested_call_strategy = value.parse()?;
                Ok(())
            }
            _ => Err(Error::UnknownConfigOption(option.to_owned()))
        }
    }

    /// Get the string form of an option's current value.
    pub fn get(&self, option: &str) -> Result<String> {
        match option {
            UNINTERESTED_CALL_STRATEGY =>
                Ok(self.uninterested_call_strategy.to_string()),
            _ => Err(Error::UnknownConfigOption(option.to_owned()))
        }
    }

    /// Restore an option to its default value.
    pub fn reset(&mut self, option: &str) -> Result<()> {
        let default = Config::default();
        match option {
            UNINTERESTED_CALL_STRATEGY => {
                self.uninterested_call_strategy =
                    default.uninterested_call_strategy;
                Ok(())
            }
            _ => Err(Error::UnknownConfigOption(option.to_owned()))
        }
    }
}
