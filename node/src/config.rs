// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use snapclaim_kernel::config::DEFAULT_SCHEME;
use snapclaim_kernel::CommitmentScheme;

use crate::errors::NodeError;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Ledger gateway base URL. `None` runs the in-memory dev ledger.
    pub ledger_url: Option<String>,
    pub ledger_timeout: Duration,
    pub auth_token: Option<String>,
    pub scheme: CommitmentScheme,
    /// Cached claim views older than this are drift.
    pub cache_max_age_secs: u64,
    /// Where built snapshots are persisted as artifacts. `None` keeps them in memory only.
    pub data_dir: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            ledger_url: None,
            ledger_timeout: Duration::from_millis(5_000),
            auth_token: None,
            scheme: DEFAULT_SCHEME,
            cache_max_age_secs: 30,
            data_dir: None,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, NodeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NodeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("SNAPCLAIM_BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .map_err(|_| NodeError::Config(format!("SNAPCLAIM_BIND_ADDR: invalid socket address {addr:?}")))?;
        }
        cfg.ledger_url = get("SNAPCLAIM_LEDGER_URL");
        cfg.auth_token = get("SNAPCLAIM_AUTH_TOKEN");

        if let Some(scheme) = get("SNAPCLAIM_SCHEME") {
            cfg.scheme = scheme
                .parse()
                .map_err(|_| NodeError::Config(format!("SNAPCLAIM_SCHEME: unknown scheme {scheme:?}")))?;
        }
        if let Some(secs) = get("SNAPCLAIM_CACHE_MAX_AGE_SECS") {
            cfg.cache_max_age_secs = secs
                .parse()
                .map_err(|_| NodeError::Config(format!("SNAPCLAIM_CACHE_MAX_AGE_SECS: not a number {secs:?}")))?;
        }
        if let Some(ms) = get("SNAPCLAIM_LEDGER_TIMEOUT_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|_| NodeError::Config(format!("SNAPCLAIM_LEDGER_TIMEOUT_MS: not a number {ms:?}")))?;
            if ms == 0 {
                return Err(NodeError::Config("SNAPCLAIM_LEDGER_TIMEOUT_MS must be positive".to_string()));
            }
            cfg.ledger_timeout = Duration::from_millis(ms);
        }
        cfg.data_dir = get("SNAPCLAIM_DATA_DIR").map(PathBuf::from);

        Ok(cfg)
    }
}
