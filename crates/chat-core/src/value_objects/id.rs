//! Id - 26 character opaque identifier token
//!
//! Generated ids are the 16 bytes of a random v4 UUID encoded in
//! lowercase base32 with the padding stripped. Any 26 character ASCII
//! alphanumeric string is accepted when parsing, since ids may be minted
//! by other subsystems.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of every identifier token
pub const ID_LENGTH: usize = 26;

/// Base32 alphabet used for generated ids
const ENCODING: &[u8; 32] = b"ybndrfg8ejkmcpqxot1uwisza345h769";

/// Opaque 26 character identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id([u8; ID_LENGTH]);

impl Id {
    /// Generate a new random Id
    pub fn generate() -> Self {
        Self(encode(uuid::Uuid::new_v4().as_bytes()))
    }

    /// Parse an Id from its string form
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != ID_LENGTH {
            return Err(IdParseError::InvalidLength(s.chars().count()));
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(IdParseError::InvalidCharacter(c));
        }

        let mut raw = [0u8; ID_LENGTH];
        raw.copy_from_slice(bytes);
        Ok(Self(raw))
    }

    /// Check whether a string is a well-formed Id without allocating one
    #[inline]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Borrow the Id as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        // Only ever built from validated ASCII
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

fn encode(bytes: &[u8; 16]) -> [u8; ID_LENGTH] {
    let mut out = [0u8; ID_LENGTH];
    let mut buffer: u64 = 0;
    let mut bits = 0u32;
    let mut idx = 0;

    for &b in bytes {
        buffer = (buffer << 8) | u64::from(b);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out[idx] = ENCODING[((buffer >> bits) & 0x1F) as usize];
            idx += 1;
            buffer &= (1 << bits) - 1;
        }
    }
    if bits > 0 {
        out[idx] = ENCODING[((buffer << (5 - bits)) & 0x1F) as usize];
    }

    out
}

/// Error when parsing an Id from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("expected {ID_LENGTH} characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Id {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::parse(s)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Id::parse(&raw).map_err(serde::de::Error::custom)
    }
}
