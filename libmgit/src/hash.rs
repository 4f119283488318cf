use std::{fmt::{Debug, Display, Formatter}, str::FromStr};

use crate::error::Error;

pub type RawObjectHash = [u8; 20];

/// A SHA-1 wrapper type used to uniquely identify content in the repository.
///
/// Hashes render as the full 40-character lowercase hex string, which is
/// also the form they take in object filenames, tree entries, commit
/// headers and the HEAD file.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct ObjectHash(RawObjectHash);

impl ObjectHash {
    /// Get the full hash as a 40-character hex string.
    pub fn full(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the individual bytes that make up this `ObjectHash`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<RawObjectHash> for ObjectHash {
    fn from(value: RawObjectHash) -> Self {
        Self(value)
    }
}

impl Display for ObjectHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full())
    }
}

impl Debug for ObjectHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full())
    }
}

impl FromStr for ObjectHash {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(value)
            .map_err(|_| Error::InvalidHash(value.to_string()))?;

        let raw: RawObjectHash = bytes
            .try_into()
            .map_err(|_| Error::InvalidHash(value.to_string()))?;

        Ok(ObjectHash(raw))
    }
}
