//! # Database Infrastructure
//!
//! Turns the database section of the settings into a [`ConnectionDescriptor`]: the driver
//! name plus the credentials the mapping layer needs to open a connection. Opening the
//! connection itself belongs to that layer.
//!
//! ## Example
//!
//! ```rust
//! use kissj_database::ConnectionDescriptor;
//!
//! let descriptor = ConnectionDescriptor::sqlite("/var/lib/kissj/db.sqlite");
//! assert_eq!(descriptor.driver(), "sqlite3");
//! assert_eq!(descriptor.to_string(), "sqlite3:///var/lib/kissj/db.sqlite");
//! ```

mod error;

pub use error::{DatabaseError, DatabaseErrorExt};

use kissj_domain::DbType;
use kissj_domain::settings::DatabaseSettings;
use secrecy::SecretString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub const SQLITE_DRIVER: &str = "sqlite3";
pub const POSTGRE_DRIVER: &str = "postgre";

/// Everything needed to open a connection. Secrets stay redacted in `Debug` and `Display`.
#[derive(Debug, Clone)]
pub enum ConnectionDescriptor {
    Sqlite { database: PathBuf },
    Postgre { host: String, username: String, password: SecretString, database: String },
}

impl ConnectionDescriptor {
    pub fn sqlite(database: impl Into<PathBuf>) -> Self {
        Self::Sqlite { database: database.into() }
    }

    pub fn driver(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => SQLITE_DRIVER,
            Self::Postgre { .. } => POSTGRE_DRIVER,
        }
    }

    /// The sqlite file, for descriptors that have one.
    pub fn sqlite_path(&self) -> Option<&Path> {
        match self {
            Self::Sqlite { database } => Some(database),
            Self::Postgre { .. } => None,
        }
    }

    /// Descriptor for an already typed backend.
    pub fn for_type(db_type: DbType, settings: &DatabaseSettings) -> Self {
        match db_type {
            DbType::Sqlite => Self::sqlite(&settings.full_path),
            DbType::Postgresql => Self::Postgre {
                host: settings.host.clone(),
                username: settings.user.clone(),
                password: settings.password.clone(),
                database: settings.name.clone(),
            },
        }
    }

    /// Builds the descriptor for the configured `DB_TYPE`.
    pub fn from_settings(settings: &DatabaseSettings) -> Self {
        Self::for_type(settings.db_type, settings)
    }

    /// Selects a backend from a raw `DB_TYPE` value.
    ///
    /// # Errors
    /// Returns [`DatabaseError::Selection`] naming `db_type` when it is not `sqlite` or
    /// `postgresql`.
    #[instrument(skip(settings))]
    pub fn select(db_type: &str, settings: &DatabaseSettings) -> Result<Self, DatabaseError> {
        let db_type: DbType = db_type.parse()?;
        let descriptor = Self::for_type(db_type, settings);
        debug!(driver = descriptor.driver(), "Database descriptor selected");
        Ok(descriptor)
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite { database } => write!(f, "{SQLITE_DRIVER}://{}", database.display()),
            Self::Postgre { host, username, database, .. } => {
                write!(f, "{POSTGRE_DRIVER}://{username}@{host}/{database}")
            },
        }
    }
}
