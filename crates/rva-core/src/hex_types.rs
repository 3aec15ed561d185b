//! Strict lowercase-hex codec and validated newtypes for the fixed-size
//! byte values that flow through the registry: digests, keys, and
//! signatures.
//!
//! All internal computations operate on the decoded byte forms; textual hex
//! is an I/O concern confined to this module's `from_hex`/`to_hex`.

use std::fmt;

use crate::errors::{RvaError, RvaResult};

fn decode_fixed<const N: usize>(s: &str) -> RvaResult<[u8; N]> {
    if s.len() != N * 2 {
        return Err(RvaError::InvalidLength {
            expected: N * 2,
            actual: s.len(),
        });
    }
    if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(RvaError::InvalidHex(format!(
            "expected strictly lowercase hex, got {s:?}"
        )));
    }
    let bytes = hex::decode(s).map_err(|e| RvaError::InvalidHex(e.to_string()))?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

macro_rules! fixed_hex_type {
    ($name:ident, $len:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            /// Parse from strictly lowercase hex. Rejects uppercase and any
            /// length other than `LEN * 2`.
            pub fn from_hex(s: &str) -> RvaResult<Self> {
                Ok(Self(decode_fixed::<$len>(s)?))
            }

            /// Construct directly from raw bytes (already validated by the
            /// caller, e.g. a cryptographic primitive's output).
            pub fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.to_hex()).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_hex_type!(Digest, 32, "A 32-byte SHA-256 digest, textual form `^[a-f0-9]{64}$`.");
fixed_hex_type!(PublicKey, 32, "A 32-byte Ed25519 public key, textual form `^[a-f0-9]{64}$`.");
fixed_hex_type!(Seed, 32, "A 32-byte Ed25519 seed, textual form `^[a-f0-9]{64}$`.");
fixed_hex_type!(Signature, 64, "A 64-byte Ed25519 signature, textual form `^[a-f0-9]{128}$`.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_round_trips() {
        let hex64 = "a".repeat(64);
        let d = Digest::from_hex(&hex64).unwrap();
        assert_eq!(d.to_hex(), hex64);
    }

    #[test]
    fn digest_rejects_uppercase() {
        let hex64 = "A".repeat(64);
        assert!(Digest::from_hex(&hex64).is_err());
    }

    #[test]
    fn digest_rejects_wrong_length() {
        assert!(matches!(
            Digest::from_hex("ab"),
            Err(RvaError::InvalidLength { expected: 64, actual: 2 })
        ));
    }

    #[test]
    fn signature_is_128_chars() {
        let hex128 = "b".repeat(128);
        let s = Signature::from_hex(&hex128).unwrap();
        assert_eq!(s.to_hex(), hex128);
    }

    #[test]
    fn signature_rejects_64_char_input() {
        assert!(Signature::from_hex(&"b".repeat(64)).is_err());
    }
}
