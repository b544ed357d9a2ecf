// ABOUTME: Test utilities for yiyi-store, including an in-memory key-value client.
// ABOUTME: Lets the hosted medium run without a network, and lets tests plant corrupted values.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::kv::{KvClient, KvError};

/// An in-memory key-value client.
///
/// Values set through the trait are stored as JSON strings, the way the
/// REST backend stores them. `insert_raw` plants any value directly, which
/// is how tests reproduce structured or corrupted entries.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, Value>>,
    fail_writes: AtomicBool,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value under `key`, bypassing serialization.
    pub async fn insert_raw(&self, key: &str, value: Value) {
        self.entries.lock().await.insert(key.to_string(), value);
    }

    /// The raw value currently stored under `key`.
    pub async fn raw(&self, key: &str) -> Option<Value> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Make every subsequent `set` and `del` fail, simulating an outage.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), KvError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Command("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KvClient for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        Ok(self.raw(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.check_writable()?;
        self.insert_raw(key, Value::String(value.to_string())).await;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), KvError> {
        self.check_writable()?;
        self.entries.lock().await.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
