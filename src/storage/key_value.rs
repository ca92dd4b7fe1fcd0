//! String-keyed durable storage.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use rusqlite::{Connection, OptionalExtension};

use crate::Error;

/// A durable store that maps string keys to string values.
pub trait KeyValueStore {
    /// Get the value stored under `key`, or `None` if nothing has been stored.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// A [KeyValueStore] backed by a table in a SQLite database.
#[derive(Debug)]
pub struct SqliteKeyValueStore {
    connection: Connection,
}

impl SqliteKeyValueStore {
    /// Create a store on `connection`, adding the key-value table if needed.
    ///
    /// # Errors
    /// Returns an error if the table cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_key_value_table(&connection)?;

        Ok(Self { connection })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.connection
            .query_row(
                "SELECT value FROM key_value WHERE key = :key",
                &[(":key", key)],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::from)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.connection.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;

        Ok(())
    }
}

/// Create the key-value table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// A [KeyValueStore] that only lives as long as the process.
///
/// Clones share the same map, so a clone can observe what the ledger writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        // Values are only ever replaced whole, so a poisoned map is still consistent.
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());

        Ok(())
    }
}
