// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use snapclaim_kernel::claim::ClaimRejection;
use snapclaim_kernel::error::KernelError;
use thiserror::Error;

use crate::ledger::LedgerError;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Malformed input: {0}")]
    Kernel(#[from] KernelError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Snapshot {0} not found")]
    SnapshotNotFound(String),
    #[error("Address {0} is not part of the snapshot")]
    AddressNotInSnapshot(String),
    #[error("Claim rejected: {0}")]
    Rejected(ClaimRejection),
    #[error("Ledger error: {0}")]
    Ledger(LedgerError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LedgerError> for NodeError {
    fn from(e: LedgerError) -> Self {
        match e {
            // The ledger's own atomic check refused the claim.
            LedgerError::Rejected(rejection) => NodeError::Rejected(rejection),
            other => NodeError::Ledger(other),
        }
    }
}

/// HTTP status for a claim rejection.
pub fn rejection_status(rejection: &ClaimRejection) -> StatusCode {
    match rejection {
        ClaimRejection::CommitmentNotFound => StatusCode::NOT_FOUND,
        ClaimRejection::CommitmentInactive { .. } => StatusCode::CONFLICT,
        ClaimRejection::AlreadyClaimed => StatusCode::CONFLICT,
        ClaimRejection::InvalidProof => StatusCode::UNPROCESSABLE_ENTITY,
        ClaimRejection::InsufficientReserve { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl NodeError {
    pub fn status(&self) -> StatusCode {
        match self {
            NodeError::Kernel(_) | NodeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            NodeError::SnapshotNotFound(_) | NodeError::AddressNotInSnapshot(_) => StatusCode::NOT_FOUND,
            NodeError::Rejected(rejection) => rejection_status(rejection),
            NodeError::Ledger(_) => StatusCode::BAD_GATEWAY,
            NodeError::Config(_) | NodeError::Io(_) | NodeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            NodeError::Kernel(_) | NodeError::InvalidInput(_) => "malformed_input",
            NodeError::SnapshotNotFound(_) => "snapshot_not_found",
            NodeError::AddressNotInSnapshot(_) => "address_not_in_snapshot",
            NodeError::Rejected(rejection) => rejection.reason_code(),
            NodeError::Ledger(_) => "ledger_unavailable",
            NodeError::Config(_) | NodeError::Io(_) | NodeError::Internal(_) => "internal",
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            NodeError::Rejected(rejection) => rejection.is_retryable(),
            NodeError::Ledger(_) => true,
            _ => false,
        }
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            NodeError::Rejected(rejection) => rejection.user_message().to_string(),
            NodeError::Ledger(e) => {
                tracing::warn!("Destination ledger failure: {}", e);
                "Destination ledger unavailable".to_string()
            }
            NodeError::Io(_) | NodeError::Internal(_) => {
                tracing::error!("{}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "reason": self.reason(),
            "retryable": self.is_retryable(),
        }));

        (status, body).into_response()
    }
}
