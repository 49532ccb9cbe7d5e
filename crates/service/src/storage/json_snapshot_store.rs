use std::{marker::PhantomData, path::{Path, PathBuf}};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::{fs, sync::Mutex};
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// Generic JSON file-backed collection store.
///
/// Persists a `Vec<T>` as a single snapshot file. Nothing is cached: every call
/// reads the file, applies the caller's closure and, for mutations, writes the
/// whole collection back. The internal mutex serialises these cycles so two
/// requests in the same process cannot interleave a load and a save.
pub struct JsonSnapshotStore<T> {
    file_path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSnapshotStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open the store at `path`. Creates the file with an empty array if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        if fs::metadata(&file_path).await.is_err() {
            write_snapshot::<T>(&file_path, &[]).await?;
            debug!(path = %file_path.display(), "created empty snapshot");
        }
        Ok(Self { file_path, lock: Mutex::new(()), _marker: PhantomData })
    }

    /// Load the current snapshot and hand it to `f`.
    pub async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        let _guard = self.lock.lock().await;
        let items = load_snapshot(&self.file_path).await;
        f(&items)
    }

    /// Load, mutate, save. The snapshot is only written when `f` succeeds.
    pub async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let _guard = self.lock.lock().await;
        let mut items = load_snapshot(&self.file_path).await;
        let out = f(&mut items)?;
        write_snapshot(&self.file_path, &items).await?;
        Ok(out)
    }
}

/// Missing, unreadable or unparseable snapshots load as an empty collection.
/// Records are decoded one by one; an entry that cannot be decoded is skipped
/// and logged, the rest still load.
async fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot unreadable; using empty collection");
            return Vec::new();
        }
    };
    let raw: Vec<Value> = match serde_json::from_slice(&bytes) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot corrupt; using empty collection");
            return Vec::new();
        }
    };
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(path = %path.display(), index, error = %e, "skipping undecodable snapshot record");
                None
            }
        })
        .collect()
}

async fn write_snapshot<T: Serialize>(path: &Path, items: &[T]) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(items)?;
    fs::write(path, data).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        key: String,
        value: u32,
    }

    fn tmp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("snapshot_store_{tag}_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn creates_empty_snapshot_when_missing() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("create");
        let store = JsonSnapshotStore::<Item>::new(&tmp).await?;
        assert_eq!(tokio::fs::read_to_string(&tmp).await?, "[]");
        assert!(store.read(|items| items.is_empty()).await);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_persists_and_reloads() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("persist");
        let store = JsonSnapshotStore::<Item>::new(&tmp).await?;
        store
            .update(|items| {
                items.push(Item { key: "a".into(), value: 1 });
                items.push(Item { key: "b".into(), value: 2 });
                Ok(())
            })
            .await?;

        let reopened = JsonSnapshotStore::<Item>::new(&tmp).await?;
        let items = reopened.read(|items| items.to_vec()).await;
        assert_eq!(
            items,
            vec![Item { key: "a".into(), value: 1 }, Item { key: "b".into(), value: 2 }]
        );
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_does_not_write() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("rollback");
        let store = JsonSnapshotStore::<Item>::new(&tmp).await?;
        let res: Result<(), ServiceError> = store
            .update(|items| {
                items.push(Item { key: "x".into(), value: 9 });
                Err(ServiceError::validation("nope"))
            })
            .await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(store.read(|items| items.len()).await, 0);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_snapshot_reads_as_empty() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("corrupt");
        tokio::fs::write(&tmp, b"{ not json").await?;
        let store = JsonSnapshotStore::<Item>::new(&tmp).await?;
        assert_eq!(store.read(|items| items.len()).await, 0);

        // next write replaces the corrupt file with a valid snapshot
        store
            .update(|items| {
                items.push(Item { key: "k".into(), value: 3 });
                Ok(())
            })
            .await?;
        let raw = tokio::fs::read(&tmp).await?;
        let parsed: Vec<Item> = serde_json::from_slice(&raw)?;
        assert_eq!(parsed.len(), 1);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn undecodable_record_does_not_hide_the_others() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("partial");
        tokio::fs::write(&tmp, br#"[{"key":"a","value":1},{"key":"b","value":"two"},{"key":"c","value":3}]"#).await?;
        let store = JsonSnapshotStore::<Item>::new(&tmp).await?;
        let keys = store.read(|items| items.iter().map(|i| i.key.clone()).collect::<Vec<_>>()).await;
        assert_eq!(keys, vec!["a".to_string(), "c".to_string()]);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_updates_are_not_lost() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("concurrent");
        let store = std::sync::Arc::new(JsonSnapshotStore::<Item>::new(&tmp).await?);
        let mut handles = Vec::new();
        for i in 0..16u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(|items| {
                        items.push(Item { key: format!("k{i}"), value: i });
                        Ok(())
                    })
                    .await
            }));
        }
        for h in handles {
            h.await??;
        }
        assert_eq!(store.read(|items| items.len()).await, 16);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
