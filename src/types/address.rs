// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Destination-ledger addresses.
//!
//! An address is always the raw 32-byte key. Text is only a transport form:
//! base58 (the ledger's own display format) or 64 hex characters. Leaves are
//! built from the raw bytes, never from the text.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ADDRESS_LEN;
use crate::error::{KernelError, Result};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| KernelError::InvalidAddressLength {
            expected: ADDRESS_LEN,
            found: bytes.len(),
        })?;
        Ok(Self(raw))
    }

    /// Parses base58, `0x`-prefixed hex or bare 64-character hex.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(stripped) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return Self::from_hex(stripped);
        }
        if text.len() == ADDRESS_LEN * 2 && text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::from_hex(text);
        }
        let bytes = bs58::decode(text)
            .into_vec()
            .map_err(|_| KernelError::InvalidAddress(text.to_string()))?;
        Self::from_slice(&bytes)
    }

    fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text).map_err(|_| KernelError::InvalidHex)?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::parse(&text).map_err(D::Error::custom)
    }
}
