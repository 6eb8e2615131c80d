use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::settings::Settings;

/// Keys the portal keeps in the database.
pub mod keys {
    pub const REPORTS: &str = "reports";
    pub const NEWS: &str = "news";
    pub const DOCUMENTS: &str = "documents";
    pub const AUTHORITIES: &str = "authorities";
    pub const SLIDER_ITEMS: &str = "slider_items";
    pub const SITE_TEXTS: &str = "site_texts";
    pub const LOGO_PATH: &str = "logo_path";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error at key {key:?}: {source}")]
    Database {
        key: String,
        #[source]
        source: sled::Error,
    },
    #[error("could not decode value at key {key:?}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode value for key {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON records in a sled tree, one record per key.
///
/// `load` and `save` never fail towards the caller: problems are logged and
/// the default is returned or the write is dropped. Every key is written on
/// its own and flushed right away; there is no transaction spanning keys.
#[derive(Debug, Clone)]
pub struct Storage {
    database: sled::Db,
}

impl Storage {
    pub fn open(settings: &Settings) -> Result<Self, sled::Error> {
        Self::open_path(&settings.database_name, settings.db_compression_enabled)
    }

    pub fn open_path(path: impl AsRef<Path>, compression: bool) -> Result<Self, sled::Error> {
        let database = sled::Config::default()
            .use_compression(compression)
            .flush_every_ms(None)
            .path(path)
            .open()?;
        log::info!("Database was recovered: {}", database.was_recovered());
        Ok(Storage { database })
    }

    /// A database that disappears when the last handle is dropped.
    pub fn temporary() -> Result<Self, sled::Error> {
        let database = sled::Config::default().temporary(true).open()?;
        Ok(Storage { database })
    }

    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw = self
            .database
            .get(key)
            .map_err(|source| StorageError::Database {
                key: key.to_string(),
                source,
            })?;
        match raw {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| StorageError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                log::error!("Error loading {} from storage: {}", key, e);
                default
            }
        }
    }

    pub fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        let database_error = |source| StorageError::Database {
            key: key.to_string(),
            source,
        };
        self.database.insert(key, encoded).map_err(database_error)?;
        self.database.flush().map_err(database_error)?;
        Ok(())
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            log::error!("Error saving {} to storage: {}", key, e);
        }
    }

    /// Write raw bytes at `key`, bypassing encoding.
    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.database
            .insert(key, value)
            .map(|_| ())
            .map_err(|source| StorageError::Database {
                key: key.to_string(),
                source,
            })
    }
}
