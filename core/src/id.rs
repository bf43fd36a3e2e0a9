//! Collection-assigned document identifiers.
//!
//! # Design
//! `ObjectId` wraps a UUIDv7: the leading 48 bits are a millisecond timestamp
//! and the generator is monotonic within a process, so ids sort in creation
//! order and are never handed out twice. Only the collection mints new ids;
//! everything else obtains one by parsing a client-supplied string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MalformedId;

/// Opaque, immutable identifier of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Mint a fresh identifier.
    pub(crate) fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for ObjectId {
    type Err = MalformedId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| MalformedId(s.to_string()))
    }
}
