//! Local settings store and the installation API key kept in it

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use fjall::Keyspace;
use tokio::sync::RwLock;
use tokio::task;
use uuid::Uuid;

use crate::{LocationError, Result};

/// Settings key under which the installation API key is stored
pub const API_KEY_SETTING: &str = "API_KEY";

/// Device-local key-value store for string settings
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Settings persisted in a fjall keyspace
pub struct FjallSettingsStore {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> anyhow::Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

fn storage_err(err: impl fmt::Display) -> LocationError {
    LocationError::storage(err.to_string())
}

impl FjallSettingsStore {
    /// Open (or create) the settings database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(path.as_ref())
            .open()
            .map_err(storage_err)?;
        let items = db
            .keyspace("settings", fjall::KeyspaceCreateOptions::default)
            .map_err(storage_err)?;
        Ok(Self { store: items })
    }
}

#[async_trait]
impl SettingsStore for FjallSettingsStore {
    #[tracing::instrument(name = "read_setting", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(storage_err)?
            .map_err(storage_err)?;

        match maybe_bytes {
            Some(bytes) => {
                let value = String::from_utf8(bytes).map_err(storage_err)?;
                Ok(Some(value))
            }
            None => {
                tracing::debug!("Setting not found");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(name = "write_setting", level = "debug", skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let bytes = value.as_bytes().to_vec();

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(storage_err)?
            .map_err(storage_err)?;
        Ok(())
    }
}

/// Settings kept only for the lifetime of the process
#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Per-installation credential sent as `X-Api-Key`
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the stored key, generating and storing a new one when absent.
    pub async fn load_or_create(store: &dyn SettingsStore) -> Result<Self> {
        if let Some(existing) = store.get(API_KEY_SETTING).await? {
            if !existing.trim().is_empty() {
                tracing::debug!("Using stored installation API key");
                return Ok(Self(existing));
            }
        }

        let key = Uuid::new_v4().to_string();
        store.set(API_KEY_SETTING, &key).await?;
        tracing::info!("Generated new installation API key");
        Ok(Self(key))
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
