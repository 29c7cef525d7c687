// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Snapshots this node can serve claims for, keyed by root.
//!
//! Tree construction is CPU-bound and runs on the blocking pool. With a data
//! directory configured, every snapshot is also written as a binary artifact
//! and reloaded at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snapclaim_kernel::snapshot::decode::decode_snapshot;
use snapclaim_kernel::snapshot::encode::encode_snapshot;
use snapclaim_kernel::snapshot::SnapshotPayload;
use snapclaim_kernel::types::digest_to_hex;
use snapclaim_kernel::{CommitmentScheme, Digest, HolderEntry, Snapshot};
use tokio::sync::RwLock;

use crate::errors::NodeError;
use crate::sync_guard::unix_now;

pub const ARTIFACT_EXTENSION: &str = "sncl";

pub struct SnapshotRegistry {
    snapshots: RwLock<HashMap<Digest, Arc<Snapshot>>>,
    data_dir: Option<PathBuf>,
}

impl SnapshotRegistry {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
            data_dir,
        }
    }

    /// Reads every artifact in the data directory. A corrupt artifact fails startup.
    pub async fn load(&self) -> Result<usize, NodeError> {
        let Some(dir) = &self.data_dir else {
            return Ok(0);
        };
        tokio::fs::create_dir_all(dir).await?;

        let mut loaded = 0;
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ARTIFACT_EXTENSION) {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            let snapshot = decode_snapshot(&bytes).map_err(|e| {
                tracing::error!("Failed to restore snapshot {:?}: {}", path, e);
                NodeError::from(e)
            })?;
            tracing::info!("Restored snapshot {} from {:?}", digest_to_hex(&snapshot.root()), path);
            self.insert(Arc::new(snapshot)).await;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Builds and registers a snapshot over `holders`.
    pub async fn build(&self, scheme: CommitmentScheme, holders: Vec<HolderEntry>) -> Result<Arc<Snapshot>, NodeError> {
        let created_at = unix_now();
        let count = holders.len();
        let snapshot = tokio::task::spawn_blocking(move || Snapshot::build(scheme, &holders, created_at))
            .await
            .map_err(|e| NodeError::Internal(format!("snapshot build task failed: {e}")))??;

        let snapshot = Arc::new(snapshot);
        self.persist(&snapshot).await?;
        self.insert(snapshot.clone()).await;

        tracing::info!("Built snapshot {} over {} holders ({})", digest_to_hex(&snapshot.root()), count, scheme);
        metrics::counter!("snapclaim_snapshots_built_total", 1, "scheme" => scheme.tag());
        Ok(snapshot)
    }

    /// Registers a snapshot published elsewhere, after re-verifying every proof
    /// and rebuilding the root from the holder list.
    pub async fn import(&self, payload: SnapshotPayload, scheme: CommitmentScheme) -> Result<Arc<Snapshot>, NodeError> {
        let snapshot = tokio::task::spawn_blocking(move || -> Result<Snapshot, NodeError> {
            let snapshot = Snapshot::from_payload_expecting(&payload, scheme)?;
            let failures = snapshot.audit();
            if !failures.is_empty() {
                return Err(NodeError::InvalidInput(format!(
                    "{} of {} proofs do not verify against the root",
                    failures.len(),
                    snapshot.len()
                )));
            }
            // Must round-trip through the artifact decoder on the next start.
            snapshot.check_root()?;
            Ok(snapshot)
        })
        .await
        .map_err(|e| NodeError::Internal(format!("snapshot import task failed: {e}")))??;

        let snapshot = Arc::new(snapshot);
        self.persist(&snapshot).await?;
        self.insert(snapshot.clone()).await;
        Ok(snapshot)
    }

    pub async fn get(&self, root: &Digest) -> Option<Arc<Snapshot>> {
        self.snapshots.read().await.get(root).cloned()
    }

    pub async fn get_or_err(&self, root: &Digest) -> Result<Arc<Snapshot>, NodeError> {
        self.get(root)
            .await
            .ok_or_else(|| NodeError::SnapshotNotFound(digest_to_hex(root)))
    }

    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    async fn insert(&self, snapshot: Arc<Snapshot>) {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(snapshot.root(), snapshot);
        metrics::gauge!("snapclaim_snapshots_loaded", snapshots.len() as f64);
    }

    /// Atomic write: temp file then rename.
    async fn persist(&self, snapshot: &Snapshot) -> Result<(), NodeError> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        let bytes = encode_snapshot(snapshot)?;
        let path = artifact_path(dir, &snapshot.root());
        let tmp = path.with_extension("tmp");

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::debug!("Snapshot saved to {:?} ({} bytes)", path, bytes.len());
        Ok(())
    }
}

pub fn artifact_path(dir: &Path, root: &Digest) -> PathBuf {
    dir.join(format!("{}.{}", digest_to_hex(root), ARTIFACT_EXTENSION))
}
