// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use crate::config::HASH_LEN;
use crate::error::KernelError;
use core::fmt;
use core::str::FromStr;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub [u8; HASH_LEN]);

        impl $name {
            pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
                &self.0
            }

            /// Hex without the `0x` prefix.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = KernelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                    .unwrap_or(trimmed);
                let mut out = [0u8; HASH_LEN];
                hex::decode_to_slice(digits, &mut out).map_err(|_| KernelError::InvalidHex {
                    kind: $kind,
                    input: s.to_string(),
                })?;
                Ok(Self(out))
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = KernelError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let arr: [u8; HASH_LEN] = bytes.try_into().map_err(|_| KernelError::InvalidHex {
                    kind: $kind,
                    input: hex::encode(bytes),
                })?;
                Ok(Self(arr))
            }
        }

        impl From<[u8; HASH_LEN]> for $name {
            fn from(bytes: [u8; HASH_LEN]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

hex_id!(
    /// BLAKE3-256 digest of a file's exact bytes.
    Fingerprint,
    "fingerprint"
);

hex_id!(
    /// An ed25519 public key identifying a chain account.
    AccountId,
    "account id"
);

hex_id!(
    /// Block or transaction hash.
    H256,
    "hash"
);
