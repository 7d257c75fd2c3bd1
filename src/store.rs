// src/store.rs
// File-backed per-user location store with whole-store read/modify/write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// Last known place for one user. Overwritten by location-set commands and
/// shared-location events; never auto-expired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserLocation {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
}

/// One JSON file mapping user id to location. All access goes through a
/// single writer lock so concurrent set commands for different users cannot
/// lose each other's update. Network fetches must never run while the lock
/// is held.
pub struct UserLocationStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl UserLocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub async fn get(&self, user_id: &str) -> Option<UserLocation> {
        let _guard = self.lock.lock().await;
        self.load_unlocked().await.remove(user_id)
    }

    /// Load-mutate-save for one user's entry, serialized by the store lock.
    pub async fn set(&self, user_id: &str, location: UserLocation) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut store = self.load_unlocked().await;
        store.insert(user_id.to_string(), location);
        self.save_unlocked(&store).await
    }

    /// A missing or corrupt file reads as an empty store. Losing a corrupt
    /// store is accepted; it is logged rather than treated as fatal.
    async fn load_unlocked(&self) -> HashMap<String, UserLocation> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(map) => map,
                Err(e) => {
                    warn!("location store {} is corrupt, starting empty: {}", self.path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        }
    }

    async fn save_unlocked(&self, store: &HashMap<String, UserLocation>) -> Result<()> {
        let json = serde_json::to_string(store)?;
        atomic_write(&self.path, json.as_bytes()).await?;
        Ok(())
    }
}

/// Temp-file + fsync + rename so a crash mid-write never leaves a partial
/// store. The temp file lives in the destination directory (rename must stay
/// on one filesystem).
async fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let pid = std::process::id();
        let mut tmp = path.to_path_buf();
        tmp.set_extension(format!("tmp.{}.{}", pid, ts));
        tmp
    };

    // Create the temp exclusively to avoid races with another writer.
    let mut file = tokio::fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&temp_path)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&temp_path, path).await?;

    // Fsync the directory entry to reduce metadata loss on crash.
    if let Some(parent) = path.parent()
        && let Ok(dir) = std::fs::File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lon: f64, city: &str) -> UserLocation {
        UserLocation {
            lat,
            lon,
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserLocationStore::new(dir.path().join("store.json"));

        store.set("u1", loc(35.68, 139.69, "東京")).await.unwrap();
        assert_eq!(store.get("u1").await, Some(loc(35.68, 139.69, "東京")));
        assert_eq!(store.get("u2").await, None);
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = UserLocationStore::new(&path);
        assert_eq!(store.get("u1").await, None);

        // And it recovers on the next write.
        store.set("u1", loc(1.0, 2.0, "x")).await.unwrap();
        assert_eq!(store.get("u1").await, Some(loc(1.0, 2.0, "x")));
    }

    #[tokio::test]
    async fn concurrent_sets_for_different_users_both_survive() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(UserLocationStore::new(dir.path().join("store.json")));

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.set("alice", loc(1.0, 1.0, "a")).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.set("bob", loc(2.0, 2.0, "b")).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(store.get("alice").await, Some(loc(1.0, 1.0, "a")));
        assert_eq!(store.get("bob").await, Some(loc(2.0, 2.0, "b")));
    }
}
