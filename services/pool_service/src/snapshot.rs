//! Snapshot files
//!
//! The pool state is written with `bincode` to a sibling temp file and
//! renamed into place, so a crash mid-write leaves the previous snapshot.

use anyhow::{Context, Result};
use std::path::Path;
use swap_amm::PoolState;
use tracing::info;

pub async fn save(path: &Path, state: &PoolState) -> Result<()> {
    let bytes = state.encode().context("Failed to encode pool state")?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create snapshot directory {:?}", dir))?;
    }

    let staging = path.with_extension("tmp");
    tokio::fs::write(&staging, &bytes)
        .await
        .with_context(|| format!("Failed to write snapshot {:?}", staging))?;
    tokio::fs::rename(&staging, path)
        .await
        .with_context(|| format!("Failed to move snapshot into place at {:?}", path))?;

    info!(
        "💾 Saved pool snapshot to {:?} (sequence {})",
        path, state.sequence
    );
    Ok(())
}

/// `None` when no snapshot has been written yet
pub async fn load(path: &Path) -> Result<Option<PoolState>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read snapshot {:?}", path))
        }
    };
    let state = PoolState::decode(&bytes)
        .with_context(|| format!("Corrupt pool snapshot {:?}", path))?;
    info!(
        "📂 Loaded pool snapshot from {:?} (sequence {})",
        path, state.sequence
    );
    Ok(Some(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use swap_types::Address;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("pool.bin");
        let state = PoolState {
            sequence: 4,
            reserve_base: 1000,
            reserve_quote: 2000,
            total_shares: 1414,
            positions: BTreeMap::from([(Address::from_low_u64_be(1), 1414)]),
        };

        save(&path, &state).await.unwrap();
        assert_eq!(load(&path).await.unwrap(), Some(state));
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(load(&dir.path().join("none.bin")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pool.bin");
        tokio::fs::write(&path, b"xx").await.unwrap();
        assert!(load(&path).await.is_err());
    }
}
