//! Built-in hash functions.
//!
//! Any `fn(&[u8]) -> u64` works as a [`HashFn`]; these cover the common
//! choices. [`fnv1_64`] reproduces the placement of rings built with the Go
//! `hash/fnv` `New64` hasher.

use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;

use crate::config::HashFn;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1 (multiply, then xor).
pub fn fnv1_64(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u64::from(byte)
    })
}

/// 64-bit FNV-1a (xor, then multiply).
pub fn fnv1a_64(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// xxHash64 with seed 0.
pub fn xxh64(data: &[u8]) -> u64 {
    xxhash_rust::xxh64::xxh64(data, 0)
}

/// XXH3 64-bit.
pub fn xxh3(data: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(data)
}

/// SipHash-1-3 with zero keys.
pub fn sip13(data: &[u8]) -> u64 {
    let mut hasher = SipHasher13::new();
    hasher.write(data);
    hasher.finish()
}

/// Names the built-in hashers, for configuration files and command lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinHasher {
    Fnv1,
    Fnv1a,
    Xxh64,
    Xxh3,
    Sip13,
}

impl BuiltinHasher {
    pub const ALL: [BuiltinHasher; 5] = [
        BuiltinHasher::Fnv1,
        BuiltinHasher::Fnv1a,
        BuiltinHasher::Xxh64,
        BuiltinHasher::Xxh3,
        BuiltinHasher::Sip13,
    ];

    pub fn hash_fn(self) -> HashFn {
        match self {
            BuiltinHasher::Fnv1 => fnv1_64,
            BuiltinHasher::Fnv1a => fnv1a_64,
            BuiltinHasher::Xxh64 => xxh64,
            BuiltinHasher::Xxh3 => xxh3,
            BuiltinHasher::Sip13 => sip13,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinHasher::Fnv1 => "fnv1",
            BuiltinHasher::Fnv1a => "fnv1a",
            BuiltinHasher::Xxh64 => "xxh64",
            BuiltinHasher::Xxh3 => "xxh3",
            BuiltinHasher::Sip13 => "sip13",
        }
    }
}

impl fmt::Display for BuiltinHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown hasher name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hasher '{0}', expected one of fnv1, fnv1a, xxh64, xxh3, sip13")]
pub struct UnknownHasher(pub String);

impl FromStr for BuiltinHasher {
    type Err = UnknownHasher;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinHasher::ALL
            .into_iter()
            .find(|h| h.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownHasher(s.to_string()))
    }
}
