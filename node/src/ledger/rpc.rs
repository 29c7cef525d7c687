// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snapclaim_kernel::claim::{ClaimInstruction, ClaimRecord, ClaimRejection, CommitmentRecord};
use snapclaim_kernel::types::digest_to_hex;
use snapclaim_kernel::{Address, Amount, Digest};

use super::{DestinationLedger, LedgerError, SubmitReceipt, ABSENT_RECORD};

#[derive(Debug, Deserialize)]
pub(crate) struct VaultBalance {
    pub balance: Amount,
}

#[derive(Debug, Deserialize)]
struct GatewayMiss {
    error: String,
}

/// JSON client for a destination ledger gateway.
#[derive(Debug, Clone)]
pub struct RpcLedgerClient {
    base_url: String,
    client: Client,
}

impl RpcLedgerClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn commitment_url(&self, root: &Digest) -> String {
        format!("{}/v1/commitments/{}", self.base_url, digest_to_hex(root))
    }

    /// GET returning `None` when the gateway says the record does not exist.
    async fn get_optional<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, LedgerError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            return match serde_json::from_str::<GatewayMiss>(&body) {
                Ok(miss) if miss.error == ABSENT_RECORD => Ok(None),
                _ => Err(LedgerError::Status { status: 404, body }),
            };
        }
        if !resp.status().is_success() {
            return Err(unexpected(resp).await);
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| LedgerError::Decode(e.to_string()))
    }
}

async fn unexpected(resp: reqwest::Response) -> LedgerError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    LedgerError::Status { status, body }
}

impl DestinationLedger for RpcLedgerClient {
    async fn fetch_commitment(&self, root: &Digest) -> Result<Option<CommitmentRecord>, LedgerError> {
        self.get_optional(&self.commitment_url(root)).await
    }

    async fn fetch_claim_record(&self, root: &Digest, address: &Address) -> Result<Option<ClaimRecord>, LedgerError> {
        let url = format!("{}/claims/{}", self.commitment_url(root), address.to_base58());
        self.get_optional(&url).await
    }

    async fn fetch_vault_balance(&self, root: &Digest) -> Result<Option<Amount>, LedgerError> {
        let url = format!("{}/vault", self.commitment_url(root));
        let vault: Option<VaultBalance> = self.get_optional(&url).await?;
        Ok(vault.map(|v| v.balance))
    }

    async fn submit_claim(&self, instruction: &ClaimInstruction) -> Result<SubmitReceipt, LedgerError> {
        let url = format!("{}/claims", self.commitment_url(&instruction.root));
        let resp = self
            .client
            .post(&url)
            .json(instruction)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => resp.json().await.map_err(|e| LedgerError::Decode(e.to_string())),
            // Refusals carry the rejection itself.
            StatusCode::NOT_FOUND
            | StatusCode::CONFLICT
            | StatusCode::UNPROCESSABLE_ENTITY
            | StatusCode::SERVICE_UNAVAILABLE => {
                let rejection: ClaimRejection = resp.json().await.map_err(|e| LedgerError::Decode(e.to_string()))?;
                Err(LedgerError::Rejected(rejection))
            }
            _ => Err(unexpected(resp).await),
        }
    }
}
