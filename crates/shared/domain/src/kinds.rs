//! Fixed value sets selected by configuration strings.

use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend relational store (`DB_TYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbType {
    Sqlite,
    Postgresql,
}

impl DbType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgresql => "postgresql",
        }
    }
}

impl FromStr for DbType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(Self::Sqlite),
            "postgresql" => Ok(Self::Postgresql),
            other => Err(SelectionError::unknown("database type", other)),
        }
    }
}

/// Where uploaded files live (`FILE_HANDLER_TYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileHandlerType {
    Local,
    S3Bucket,
}

impl FileHandlerType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3Bucket => "s3bucket",
        }
    }
}

impl FromStr for FileHandlerType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "s3bucket" => Ok(Self::S3Bucket),
            other => Err(SelectionError::unknown("FileHandler type", other)),
        }
    }
}

/// Supported UI languages. Each one has a translation catalog next to the templates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Cs,
    Sk,
}

impl Locale {
    pub const ALL: [Self; 3] = [Self::En, Self::Cs, Self::Sk];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Cs => "cs",
            Self::Sk => "sk",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "cs" => Ok(Self::Cs),
            "sk" => Ok(Self::Sk),
            other => Err(SelectionError::unknown("locale", other)),
        }
    }
}

/// Severity names accepted by `LOGGER_LEVEL` (the classic syslog-style ladder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    pub const ALL: [Self; 8] = [
        Self::Debug,
        Self::Info,
        Self::Notice,
        Self::Warning,
        Self::Error,
        Self::Critical,
        Self::Alert,
        Self::Emergency,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Alert => "ALERT",
            Self::Emergency => "EMERGENCY",
        }
    }

    /// Closest `tracing` filter directive. Levels above `ERROR` collapse into it.
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info | Self::Notice => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical | Self::Alert | Self::Emergency => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| SelectionError::unknown("log level", s))
    }
}
