// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alloc::string::String;

use crate::config::DIGEST_LEN;
use crate::error::{KernelError, Result};

/// A leaf, internal node or root.
pub type Digest = [u8; DIGEST_LEN];

pub fn digest_from_slice(bytes: &[u8]) -> Result<Digest> {
    bytes.try_into().map_err(|_| KernelError::InvalidDigestLength {
        expected: DIGEST_LEN,
        found: bytes.len(),
    })
}

/// Parses a 32-byte digest from hex, with or without a `0x` prefix.
pub fn digest_from_hex(text: &str) -> Result<Digest> {
    let text = text.trim();
    let stripped = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let bytes = hex::decode(stripped).map_err(|_| KernelError::InvalidHex)?;
    digest_from_slice(&bytes)
}

/// Bare lowercase hex (root form in published payloads).
pub fn digest_to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}

/// `0x`-prefixed lowercase hex (proof element form in published payloads).
pub fn digest_to_prefixed_hex(digest: &Digest) -> String {
    let mut out = String::with_capacity(2 + DIGEST_LEN * 2);
    out.push_str("0x");
    out.push_str(&hex::encode(digest));
    out
}

/// `#[serde(with = "...")]` adapter: digests travel as `0x` hex in text formats.
pub mod serde_hex {
    use alloc::string::String;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{digest_from_hex, digest_to_prefixed_hex, Digest};

    pub fn serialize<S: Serializer>(digest: &Digest, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&digest_to_prefixed_hex(digest))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Digest, D::Error> {
        let text = String::deserialize(deserializer)?;
        digest_from_hex(&text).map_err(D::Error::custom)
    }
}
